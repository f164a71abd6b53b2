use teleop_core::{PeerId, PeerRole, SignalMessage};

/// Commands delivered to a room by the signaling sockets.
#[derive(Debug)]
pub enum RoomCommand {
    /// Take the given seat.
    Join { peer_id: PeerId, role: PeerRole },

    /// Forward a description, candidate or camera metadata to the counterpart.
    Relay {
        peer_id: PeerId,
        message: SignalMessage,
    },

    /// The peer's socket went away.
    Leave { peer_id: PeerId },
}
