use crate::robot::RobotChannel;
use crate::session::SessionState;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};
use webrtc::data_channel::RTCDataChannel;

/// Feeds the control channel from one task so frames leave in call order.
#[derive(Clone)]
pub struct ChannelWriter {
    state: watch::Receiver<SessionState>,
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelWriter {
    pub(crate) fn spawn(
        data_channel: Arc<RTCDataChannel>,
        state: watch::Receiver<SessionState>,
    ) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        tokio::spawn(async move {
            while let Some(text) = rx.recv().await {
                if let Err(e) = data_channel.send_text(text).await {
                    warn!("Control channel write failed: {}", e);
                }
            }
            debug!("Control channel writer stopped");
        });

        Self { state, tx }
    }
}

impl RobotChannel for ChannelWriter {
    fn is_ready(&self) -> bool {
        *self.state.borrow() == SessionState::Connected
    }

    fn send_text(&self, text: String) {
        if self.tx.send(text).is_err() {
            debug!("Control channel writer gone, frame dropped");
        }
    }
}
