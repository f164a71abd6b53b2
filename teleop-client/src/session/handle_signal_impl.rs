use crate::session::PeerSession;
use anyhow::{Result, anyhow};
use teleop_core::SignalMessage;
use tracing::{debug, info, warn};
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;

impl PeerSession {
    /// Applies one rendezvous frame. `CameraInfo` and `IceConfig` belong to
    /// the owner and are ignored here.
    pub async fn handle_signal(&mut self, msg: SignalMessage) -> Result<()> {
        match msg {
            SignalMessage::Description { kind, sdp } => self.handle_description(kind, sdp).await,

            SignalMessage::IceCandidate {
                candidate,
                sdp_mid,
                sdp_m_line_index,
            } => {
                let init = RTCIceCandidateInit {
                    candidate,
                    sdp_mid,
                    sdp_mline_index: sdp_m_line_index,
                    username_fragment: None,
                };
                self.add_candidate(init).await;
                Ok(())
            }

            SignalMessage::Joined { room, role, peer_id } => {
                info!(room = %room, role = %role, peer_id = %peer_id, "Joined room");
                Ok(())
            }

            SignalMessage::PeerJoined { role } => {
                info!(role = %role, "Counterpart joined");
                self.counterpart_present = true;
                self.make_offer().await
            }

            SignalMessage::PeerLeft { role } => {
                warn!(role = %role, "Counterpart left");
                self.counterpart_present = false;
                Ok(())
            }

            SignalMessage::Error { reason } => Err(anyhow!("Rendezvous refused: {reason}")),

            SignalMessage::IceConfig { .. }
            | SignalMessage::CameraInfo { .. }
            | SignalMessage::Join { .. } => Ok(()),
        }
    }

    async fn add_candidate(&mut self, init: RTCIceCandidateInit) {
        if self.peer_connection.remote_description().await.is_none() {
            debug!("Candidate before remote description, holding");
            self.pending_candidates.push(init);
            return;
        }

        if let Err(e) = self.peer_connection.add_ice_candidate(init).await {
            if self.negotiator.ignoring_offer() {
                debug!("Candidate for ignored offer dropped: {}", e);
            } else {
                warn!("Failed to add remote candidate: {}", e);
            }
        }
    }

    pub(super) async fn flush_candidates(&mut self) {
        for init in std::mem::take(&mut self.pending_candidates) {
            if let Err(e) = self.peer_connection.add_ice_candidate(init).await {
                warn!("Failed to add held candidate: {}", e);
            }
        }
    }
}
