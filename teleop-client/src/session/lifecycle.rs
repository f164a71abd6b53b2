use std::fmt;
use tokio::sync::watch;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Negotiating,
    Connected,
    Reconnecting,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Negotiating => "negotiating",
            Self::Connected => "connected",
            Self::Reconnecting => "reconnecting",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Observations that drive the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Joined,
    TransportConnected,
    TransportDisconnected,
    TransportFailed,
    ChannelOpened,
    ChannelClosed,
    /// Offer/answer exchange reached a state it cannot leave.
    NegotiationFailed,
    Hangup,
}

type Hook = Box<dyn FnOnce() + Send>;

/// Session state plus the two one-shot hooks hung off it.
///
/// `Connected` requires both transport connectivity and an open control
/// channel, observed in either order. `Closed` is terminal.
pub struct Lifecycle {
    state: SessionState,
    transport_up: bool,
    channel_open: bool,
    on_channel_open: Option<Hook>,
    on_connection_end: Option<Hook>,
    state_tx: watch::Sender<SessionState>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        let (state_tx, _) = watch::channel(SessionState::Idle);
        Self {
            state: SessionState::Idle,
            transport_up: false,
            channel_open: false,
            on_channel_open: None,
            on_connection_end: None,
            state_tx,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Runs once, on the first transition into `Connected`.
    pub fn on_channel_open(&mut self, hook: impl FnOnce() + Send + 'static) {
        self.on_channel_open = Some(Box::new(hook));
    }

    /// Runs once, on the transition into `Closed`.
    pub fn on_connection_end(&mut self, hook: impl FnOnce() + Send + 'static) {
        self.on_connection_end = Some(Box::new(hook));
    }

    /// Feeds one observation. Returns `(from, to)` when the state changed.
    pub fn apply(&mut self, event: LifecycleEvent) -> Option<(SessionState, SessionState)> {
        use LifecycleEvent::*;
        use SessionState::*;

        if self.state == Closed {
            debug!(?event, "Session closed, event dropped");
            return None;
        }

        match event {
            TransportConnected => self.transport_up = true,
            TransportDisconnected | TransportFailed => self.transport_up = false,
            ChannelOpened => self.channel_open = true,
            ChannelClosed => self.channel_open = false,
            Joined | NegotiationFailed | Hangup => {}
        }

        let next = match (self.state, event) {
            (_, Hangup) => Closed,
            (Idle, Joined) => Negotiating,
            (Negotiating, TransportConnected | ChannelOpened)
                if self.transport_up && self.channel_open =>
            {
                Connected
            }
            (Connected, TransportDisconnected) => Reconnecting,
            (Reconnecting, TransportConnected) if self.channel_open => Connected,
            (
                Negotiating | Connected | Reconnecting,
                TransportFailed | ChannelClosed | NegotiationFailed,
            ) => Closed,
            _ => return None,
        };

        let prev = self.state;
        self.state = next;
        self.state_tx.send_replace(next);
        info!(from = %prev, to = %next, "Session state changed");

        match next {
            Connected => {
                if let Some(hook) = self.on_channel_open.take() {
                    hook();
                }
            }
            Closed => {
                self.on_channel_open = None;
                if let Some(hook) = self.on_connection_end.take() {
                    hook();
                }
            }
            _ => {}
        }

        Some((prev, next))
    }
}
