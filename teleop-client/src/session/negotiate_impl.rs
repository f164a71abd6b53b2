use crate::session::{LifecycleEvent, PeerSession, RemoteDescriptionAction, SignalingPhase};
use anyhow::{Context, Result};
use teleop_core::{SdpKind, SignalMessage};
use tracing::{debug, error, info, warn};
use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::peer_connection::signaling_state::RTCSignalingState;

fn phase_of(state: RTCSignalingState) -> SignalingPhase {
    match state {
        RTCSignalingState::HaveLocalOffer | RTCSignalingState::HaveRemotePranswer => {
            SignalingPhase::HaveLocalOffer
        }
        RTCSignalingState::HaveRemoteOffer | RTCSignalingState::HaveLocalPranswer => {
            SignalingPhase::HaveRemoteOffer
        }
        _ => SignalingPhase::Stable,
    }
}

impl PeerSession {
    /// Starts a negotiation round once the counterpart is in the room.
    ///
    /// Dropped requests are not lost: the connection raises negotiation
    /// needed again whenever it returns to stable with changes outstanding,
    /// and the impolite peer always offers when the counterpart arrives.
    pub async fn on_negotiation_needed(&mut self) -> Result<()> {
        if !self.counterpart_present {
            debug!("Negotiation needed, waiting for counterpart");
            return Ok(());
        }
        self.make_offer().await
    }

    pub async fn make_offer(&mut self) -> Result<()> {
        if !self.negotiator.may_initiate() {
            debug!("Waiting for the counterpart's first offer");
            return Ok(());
        }
        if !self.negotiator.begin_offer() {
            debug!(phase = ?self.negotiator.phase(), "Negotiation already in flight");
            return Ok(());
        }

        let pc = self.peer_connection.clone();
        let offer = async {
            let offer = pc.create_offer(None).await.context("Failed to create offer")?;
            pc.set_local_description(offer.clone())
                .await
                .context("Failed to apply local offer")?;
            Ok::<_, anyhow::Error>(offer.sdp)
        }
        .await;

        let sdp = match offer {
            Ok(sdp) => sdp,
            Err(e) => {
                self.negotiator.offer_abandoned();
                self.sync_phase();
                return Err(e);
            }
        };

        self.negotiator.offer_applied();
        info!(role = %self.role, "Sending offer");
        self.signaling
            .send_signal(SignalMessage::Description {
                kind: SdpKind::Offer,
                sdp,
            })
            .await
    }

    pub(super) async fn handle_description(&mut self, kind: SdpKind, sdp: String) -> Result<()> {
        let (rollback, answer) = match self.negotiator.on_remote_description(kind) {
            RemoteDescriptionAction::Ignore => {
                match kind {
                    SdpKind::Offer => info!("Offer collision, keeping our own offer"),
                    SdpKind::Answer => warn!("Stray answer ignored"),
                }
                return Ok(());
            }
            RemoteDescriptionAction::Apply { rollback, answer } => (rollback, answer),
        };

        let result = self.apply_remote(kind, sdp, rollback, answer).await;
        if result.is_err() {
            self.sync_phase();
        }
        result
    }

    async fn apply_remote(
        &mut self,
        kind: SdpKind,
        sdp: String,
        rollback: bool,
        answer: bool,
    ) -> Result<()> {
        if rollback {
            info!("Offer collision, rolling back our offer");
            if let Err(e) = self.rollback_local_offer().await {
                // Without a rollback we stay in have-local-offer waiting for
                // an answer the impolite side will never send.
                error!("{:#}, ending session", e);
                self.apply(LifecycleEvent::NegotiationFailed).await;
                return Err(e);
            }
        }

        let description = match kind {
            SdpKind::Offer => RTCSessionDescription::offer(sdp),
            SdpKind::Answer => RTCSessionDescription::answer(sdp),
        }
        .context("Invalid remote description")?;
        self.peer_connection
            .set_remote_description(description)
            .await
            .context("Failed to apply remote description")?;
        self.flush_candidates().await;

        if answer {
            let local = self
                .peer_connection
                .create_answer(None)
                .await
                .context("Failed to create answer")?;
            self.peer_connection
                .set_local_description(local.clone())
                .await
                .context("Failed to apply local answer")?;
            self.negotiator.answer_applied();
            info!(role = %self.role, "Sending answer");
            self.signaling
                .send_signal(SignalMessage::Description {
                    kind: SdpKind::Answer,
                    sdp: local.sdp,
                })
                .await?;
        }
        Ok(())
    }

    async fn rollback_local_offer(&self) -> Result<()> {
        let mut rollback = RTCSessionDescription::default();
        rollback.sdp_type = RTCSdpType::Rollback;
        if let Some(pending) = self.peer_connection.pending_local_description().await {
            rollback.sdp = pending.sdp;
        }
        self.peer_connection
            .set_local_description(rollback)
            .await
            .context("Failed to roll back local offer")
    }

    fn sync_phase(&mut self) {
        let phase = phase_of(self.peer_connection.signaling_state());
        self.negotiator.sync(phase);
    }
}
