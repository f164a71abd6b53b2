use crate::signaling::SignalSink;
use std::fmt;
use std::sync::Arc;
use teleop_core::{IceServerConfig, PeerRole};
use tokio::sync::watch;
use webrtc::data_channel::RTCDataChannel;
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::track::track_remote::TrackRemote;

mod channel_writer;
mod connection_impl;
mod create_pc_impl;
mod handle_signal_impl;
mod lifecycle;
mod negotiate_impl;
mod negotiator;

pub use channel_writer::ChannelWriter;
pub use lifecycle::{Lifecycle, LifecycleEvent, SessionState};
pub use negotiator::{Negotiator, RemoteDescriptionAction, SignalingPhase};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub role: PeerRole,
    pub ice_servers: Vec<IceServerConfig>,
    /// Receive-only video transceivers offered up front.
    pub video_tracks: usize,
}

/// Connection callbacks, funneled into the owner's event loop.
pub enum SessionEvent {
    TransportState(RTCPeerConnectionState),
    ChannelOpened,
    ChannelClosed,
    Message(String),
    Track {
        stream_id: String,
        track: Arc<TrackRemote>,
    },
    NegotiationNeeded,
}

impl fmt::Debug for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransportState(state) => f.debug_tuple("TransportState").field(state).finish(),
            Self::ChannelOpened => f.write_str("ChannelOpened"),
            Self::ChannelClosed => f.write_str("ChannelClosed"),
            Self::Message(text) => f.debug_tuple("Message").field(text).finish(),
            Self::Track { stream_id, .. } => {
                f.debug_struct("Track").field("stream_id", stream_id).finish()
            }
            Self::NegotiationNeeded => f.write_str("NegotiationNeeded"),
        }
    }
}

/// One end-to-end connection between operator and robot.
///
/// Created once per room join and never reused after it closes. All
/// methods are meant to be called from a single event loop.
pub struct PeerSession {
    role: PeerRole,
    peer_connection: Arc<RTCPeerConnection>,
    data_channel: Arc<RTCDataChannel>,
    signaling: Arc<dyn SignalSink>,
    negotiator: Negotiator,
    lifecycle: Lifecycle,
    writer: ChannelWriter,
    pending_candidates: Vec<RTCIceCandidateInit>,
    counterpart_present: bool,
    released: bool,
}

impl PeerSession {
    pub fn role(&self) -> PeerRole {
        self.role
    }

    pub fn state(&self) -> SessionState {
        self.lifecycle.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.lifecycle.subscribe()
    }

    /// Serialized writer for the control channel, gated on `Connected`.
    pub fn channel_writer(&self) -> ChannelWriter {
        self.writer.clone()
    }

    pub fn on_channel_open(&mut self, hook: impl FnOnce() + Send + 'static) {
        self.lifecycle.on_channel_open(hook);
    }

    pub fn on_connection_end(&mut self, hook: impl FnOnce() + Send + 'static) {
        self.lifecycle.on_connection_end(hook);
    }
}
