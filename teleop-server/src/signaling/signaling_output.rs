use async_trait::async_trait;
use teleop_core::{PeerId, SignalMessage};

/// Lets a room push signaling frames back to the sockets of its peers.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    async fn send_signal(&self, peer_id: PeerId, msg: SignalMessage);
}
