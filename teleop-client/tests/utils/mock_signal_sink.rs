use async_trait::async_trait;
use std::sync::Arc;
use teleop_client::SignalSink;
use teleop_core::{SdpKind, SignalMessage};
use tokio::sync::{Mutex, mpsc};

/// Mock SignalSink that captures all outgoing rendezvous frames.
#[derive(Clone)]
pub struct MockSignalSink {
    tx: mpsc::UnboundedSender<SignalMessage>,
    signals: Arc<Mutex<Vec<SignalMessage>>>,
}

impl MockSignalSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SignalMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = Self {
            tx,
            signals: Arc::new(Mutex::new(Vec::new())),
        };
        (sink, rx)
    }

    pub async fn signals(&self) -> Vec<SignalMessage> {
        self.signals.lock().await.clone()
    }
}

#[async_trait]
impl SignalSink for MockSignalSink {
    async fn send_signal(&self, msg: SignalMessage) -> anyhow::Result<()> {
        tracing::debug!("[MockSignalSink] {:?}", msg);
        self.signals.lock().await.push(msg.clone());
        let _ = self.tx.send(msg);
        Ok(())
    }
}

/// Waits for the next session description of `kind`, skipping candidates.
pub async fn next_description(
    rx: &mut mpsc::UnboundedReceiver<SignalMessage>,
    kind: SdpKind,
) -> SignalMessage {
    loop {
        let msg = tokio::time::timeout(std::time::Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for a description")
            .expect("signal sink closed");
        if let SignalMessage::Description { kind: k, .. } = &msg {
            if *k == kind {
                return msg;
            }
        }
    }
}
