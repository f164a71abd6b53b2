use teleop_core::{Politeness, SdpKind};

/// Mirror of the signaling state that matters for offer collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalingPhase {
    Stable,
    HaveLocalOffer,
    HaveRemoteOffer,
}

/// What the session must do with an incoming description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteDescriptionAction {
    /// Drop it. Either we are impolite and our own offer wins, or it is an
    /// answer nobody asked for.
    Ignore,
    /// Apply it as the remote description. `rollback` withdraws our pending
    /// offer first; `answer` means a local answer must be created and sent.
    Apply { rollback: bool, answer: bool },
}

/// Perfect-negotiation bookkeeping for one peer.
///
/// Holds no connection handle; the session feeds it every step and
/// executes the returned decisions. The impolite peer opens the first
/// round; the polite peer only offers once a round has completed, so the
/// initial exchange never collides.
#[derive(Debug)]
pub struct Negotiator {
    politeness: Politeness,
    making_offer: bool,
    ignore_offer: bool,
    phase: SignalingPhase,
    settled_once: bool,
}

impl Negotiator {
    pub fn new(politeness: Politeness) -> Self {
        Self {
            politeness,
            making_offer: false,
            ignore_offer: false,
            phase: SignalingPhase::Stable,
            settled_once: false,
        }
    }

    pub fn politeness(&self) -> Politeness {
        self.politeness
    }

    pub fn phase(&self) -> SignalingPhase {
        self.phase
    }

    pub fn is_making_offer(&self) -> bool {
        self.making_offer
    }

    /// True while the last remote offer was dropped; candidate errors for
    /// that offer are expected.
    pub fn ignoring_offer(&self) -> bool {
        self.ignore_offer
    }

    /// Whether this peer may originate an offer at all.
    pub fn may_initiate(&self) -> bool {
        self.politeness == Politeness::Impolite || self.settled_once
    }

    /// Returns `false` when a negotiation round is already in flight.
    pub fn begin_offer(&mut self) -> bool {
        if self.making_offer || self.phase != SignalingPhase::Stable {
            return false;
        }
        self.making_offer = true;
        true
    }

    /// The local offer has been applied and is about to be sent.
    pub fn offer_applied(&mut self) {
        self.making_offer = false;
        self.phase = SignalingPhase::HaveLocalOffer;
    }

    pub fn offer_abandoned(&mut self) {
        self.making_offer = false;
    }

    pub fn on_remote_description(&mut self, kind: SdpKind) -> RemoteDescriptionAction {
        match kind {
            SdpKind::Offer => {
                let collision = self.making_offer || self.phase != SignalingPhase::Stable;
                self.ignore_offer = collision && self.politeness == Politeness::Impolite;
                if self.ignore_offer {
                    return RemoteDescriptionAction::Ignore;
                }

                let rollback = collision && self.phase == SignalingPhase::HaveLocalOffer;
                self.making_offer = false;
                self.phase = SignalingPhase::HaveRemoteOffer;
                RemoteDescriptionAction::Apply {
                    rollback,
                    answer: true,
                }
            }
            SdpKind::Answer => {
                if self.phase != SignalingPhase::HaveLocalOffer {
                    return RemoteDescriptionAction::Ignore;
                }
                self.phase = SignalingPhase::Stable;
                self.settled_once = true;
                RemoteDescriptionAction::Apply {
                    rollback: false,
                    answer: false,
                }
            }
        }
    }

    /// Our answer has been applied locally; the round is complete.
    pub fn answer_applied(&mut self) {
        self.phase = SignalingPhase::Stable;
        self.settled_once = true;
    }

    /// Re-align with the connection after a failed step.
    pub fn sync(&mut self, phase: SignalingPhase) {
        self.making_offer = false;
        self.phase = phase;
    }
}
