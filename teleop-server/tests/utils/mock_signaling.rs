use async_trait::async_trait;
use std::sync::Arc;
use teleop_core::{PeerId, SignalMessage};
use teleop_server::SignalingOutput;
use tokio::sync::{Mutex, mpsc};

/// A signal as the room addressed it.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivered {
    pub peer_id: PeerId,
    pub message: SignalMessage,
}

/// Mock SignalingOutput that captures all outgoing signals.
#[derive(Clone)]
pub struct MockSignalingOutput {
    tx: mpsc::UnboundedSender<Delivered>,
    signals: Arc<Mutex<Vec<Delivered>>>,
}

impl MockSignalingOutput {
    /// Create a new MockSignalingOutput and its receiver channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Delivered>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let signaling = Self {
            tx,
            signals: Arc::new(Mutex::new(Vec::new())),
        };
        (signaling, rx)
    }

    /// All signals addressed to one peer, in delivery order.
    pub async fn signals_for(&self, peer_id: &PeerId) -> Vec<SignalMessage> {
        self.signals
            .lock()
            .await
            .iter()
            .filter(|d| &d.peer_id == peer_id)
            .map(|d| d.message.clone())
            .collect()
    }
}

#[async_trait]
impl SignalingOutput for MockSignalingOutput {
    async fn send_signal(&self, peer_id: PeerId, message: SignalMessage) {
        tracing::debug!("[MockSignaling] {:?} -> {}", message, peer_id);

        let delivered = Delivered { peer_id, message };
        self.signals.lock().await.push(delivered.clone());
        let _ = self.tx.send(delivered);
    }
}
