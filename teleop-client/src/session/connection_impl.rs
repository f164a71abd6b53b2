use crate::session::{LifecycleEvent, PeerSession, SessionState};
use anyhow::{Context, Result};
use teleop_core::{RoomName, SignalMessage};
use tracing::{debug, info, warn};
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;

type Transition = Option<(SessionState, SessionState)>;

impl PeerSession {
    pub async fn join(&mut self, room: RoomName) -> Result<()> {
        info!(room = %room, role = %self.role, "Joining room");
        self.signaling
            .send_signal(SignalMessage::Join {
                room,
                role: self.role,
            })
            .await
            .context("Failed to send join")?;
        self.lifecycle.apply(LifecycleEvent::Joined);
        Ok(())
    }

    pub async fn on_transport_state(&mut self, state: RTCPeerConnectionState) -> Transition {
        let event = match state {
            RTCPeerConnectionState::Connected => LifecycleEvent::TransportConnected,
            RTCPeerConnectionState::Disconnected => LifecycleEvent::TransportDisconnected,
            RTCPeerConnectionState::Failed | RTCPeerConnectionState::Closed => {
                LifecycleEvent::TransportFailed
            }
            other => {
                debug!(state = %other, "Transport state");
                return None;
            }
        };
        self.apply(event).await
    }

    pub async fn on_channel_opened(&mut self) -> Transition {
        info!("Control channel open");
        self.apply(LifecycleEvent::ChannelOpened).await
    }

    pub async fn on_channel_closed(&mut self) -> Transition {
        self.apply(LifecycleEvent::ChannelClosed).await
    }

    /// Best-effort teardown, valid in any state.
    pub async fn hangup(&mut self) {
        info!(state = %self.state(), "Hanging up");
        self.lifecycle.apply(LifecycleEvent::Hangup);
        self.release().await;
    }

    pub(super) async fn apply(&mut self, event: LifecycleEvent) -> Transition {
        let transition = self.lifecycle.apply(event);
        if let Some((_, SessionState::Closed)) = transition {
            self.release().await;
        }
        transition
    }

    async fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        if let Err(e) = self.data_channel.close().await {
            debug!("Control channel close: {}", e);
        }
        if let Err(e) = self.peer_connection.close().await {
            warn!("Failed to close peer connection: {}", e);
        }
    }
}
