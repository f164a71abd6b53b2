use crate::room::room_command::RoomCommand;
use crate::signaling::SignalingOutput;
use std::collections::HashMap;
use std::sync::Arc;
use teleop_core::{PeerId, PeerRole, RoomName, SignalMessage};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// One rendezvous room: an operator seat and a robot seat.
pub struct Room {
    name: RoomName,
    seats: HashMap<PeerRole, PeerId>,
    command_rx: mpsc::Receiver<RoomCommand>,
    signaling: Arc<dyn SignalingOutput>,
}

impl Room {
    pub fn new(
        name: RoomName,
        command_rx: mpsc::Receiver<RoomCommand>,
        signaling: Arc<dyn SignalingOutput>,
    ) -> Self {
        Self {
            name,
            seats: HashMap::new(),
            command_rx,
            signaling,
        }
    }

    /// Runs until every sender is dropped or the last seated peer leaves
    /// with nothing queued behind it.
    pub async fn run(mut self) {
        info!(room = %self.name, "Room event loop started");

        while let Some(cmd) = self.command_rx.recv().await {
            let leaving = matches!(cmd, RoomCommand::Leave { .. });
            self.handle_command(cmd).await;

            if leaving && self.seats.is_empty() && self.command_rx.is_empty() {
                info!(room = %self.name, "Room is empty. Shutting down room.");
                self.shut_down().await;
                break;
            }
        }

        info!(room = %self.name, "Room event loop finished");
    }

    /// Refuses new commands, then turns away joins that were accepted by
    /// the channel after the emptiness check.
    async fn shut_down(&mut self) {
        self.command_rx.close();
        while let Ok(cmd) = self.command_rx.try_recv() {
            if let RoomCommand::Join { peer_id, .. } = cmd {
                warn!(room = %self.name, "Join from {} raced the room closing", peer_id);
                let reason = format!("room '{}' closed, join again", self.name);
                self.signaling
                    .send_signal(peer_id, SignalMessage::Error { reason })
                    .await;
            }
        }
    }

    async fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join { peer_id, role } => self.join(peer_id, role).await,

            RoomCommand::Relay { peer_id, message } => self.relay(peer_id, message).await,

            RoomCommand::Leave { peer_id } => self.leave(&peer_id).await,
        }
    }

    async fn join(&mut self, peer_id: PeerId, role: PeerRole) {
        if let Some(occupant) = self.seats.get(&role) {
            if occupant != &peer_id {
                warn!(room = %self.name, %role, "Seat already taken, rejecting {}", peer_id);
                let reason = format!("role '{}' is already taken in room '{}'", role, self.name);
                self.signaling
                    .send_signal(peer_id, SignalMessage::Error { reason })
                    .await;
                return;
            }
        }

        if let Some(previous) = self.role_of(&peer_id) {
            if previous != role {
                warn!(room = %self.name, "Peer {} switched seat {} -> {}", peer_id, previous, role);
                self.seats.remove(&previous);
            }
        }

        info!(room = %self.name, %role, "Peer {} took seat", peer_id);
        self.seats.insert(role, peer_id.clone());
        self.signaling
            .send_signal(
                peer_id.clone(),
                SignalMessage::Joined {
                    room: self.name.clone(),
                    role,
                    peer_id: peer_id.clone(),
                },
            )
            .await;

        let counterpart = role.counterpart();
        let Some(other) = self.seats.get(&counterpart).cloned() else {
            debug!(room = %self.name, "Waiting for {}", counterpart);
            return;
        };

        info!(room = %self.name, "Both seats filled");
        self.signaling
            .send_signal(peer_id, SignalMessage::PeerJoined { role: counterpart })
            .await;
        self.signaling
            .send_signal(other, SignalMessage::PeerJoined { role })
            .await;
    }

    async fn relay(&mut self, peer_id: PeerId, message: SignalMessage) {
        if !message.is_relayed() {
            warn!(room = %self.name, "Refusing to relay control message from {}: {:?}", peer_id, message);
            return;
        }

        let Some(role) = self.role_of(&peer_id) else {
            warn!(room = %self.name, "Relay from unseated peer {}", peer_id);
            return;
        };

        let Some(target) = self.seats.get(&role.counterpart()).cloned() else {
            warn!(room = %self.name, %role, "No counterpart seated, dropping relayed signal");
            return;
        };

        self.signaling.send_signal(target, message).await;
    }

    async fn leave(&mut self, peer_id: &PeerId) {
        let Some(role) = self.role_of(peer_id) else {
            return;
        };
        self.seats.remove(&role);
        info!(room = %self.name, %role, "Peer {} left", peer_id);

        let Some(other) = self.seats.get(&role.counterpart()).cloned() else {
            return;
        };
        self.signaling
            .send_signal(other, SignalMessage::PeerLeft { role })
            .await;
    }

    fn role_of(&self, peer_id: &PeerId) -> Option<PeerRole> {
        self.seats
            .iter()
            .find_map(|(role, id)| (id == peer_id).then_some(*role))
    }
}
