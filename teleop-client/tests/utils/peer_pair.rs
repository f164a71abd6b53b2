use std::sync::Arc;
use std::time::Duration;
use teleop_client::session::{PeerSession, SessionConfig, SessionEvent, SessionState};
use teleop_core::{PeerRole, RoomName, SdpKind, SignalMessage};
use tokio::sync::mpsc;

use crate::utils::MockSignalSink;

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// A real peer session plus everything its owner loop would see.
pub struct TestPeer {
    pub session: PeerSession,
    pub sink: MockSignalSink,
    pub outbound: mpsc::UnboundedReceiver<SignalMessage>,
    pub events: mpsc::UnboundedReceiver<SessionEvent>,
}

impl TestPeer {
    pub async fn new(role: PeerRole, video_tracks: usize) -> Self {
        let (sink, outbound) = MockSignalSink::new();
        let (events_tx, events) = mpsc::unbounded_channel();
        let session = PeerSession::new(
            SessionConfig {
                role,
                ice_servers: vec![],
                video_tracks,
            },
            Arc::new(sink.clone()),
            events_tx,
        )
        .await
        .unwrap();
        Self {
            session,
            sink,
            outbound,
            events,
        }
    }

    /// Joins `room`, the way the rendezvous would have seated us.
    pub async fn seated(role: PeerRole, video_tracks: usize, room: &str) -> Self {
        let mut peer = Self::new(role, video_tracks).await;
        peer.session.join(RoomName::from(room)).await.unwrap();
        peer
    }

    pub async fn counterpart_joined(&mut self) {
        let role = self.session.role().counterpart();
        self.session
            .handle_signal(SignalMessage::PeerJoined { role })
            .await
            .unwrap();
    }

    /// Kinds of the descriptions this peer has sent so far, in order.
    pub async fn sent_descriptions(&self) -> Vec<SdpKind> {
        self.sink
            .signals()
            .await
            .into_iter()
            .filter_map(|msg| match msg {
                SignalMessage::Description { kind, .. } => Some(kind),
                _ => None,
            })
            .collect()
    }
}

async fn drive(session: &mut PeerSession, event: SessionEvent) -> anyhow::Result<()> {
    match event {
        SessionEvent::TransportState(state) => {
            session.on_transport_state(state).await;
        }
        SessionEvent::ChannelOpened => {
            session.on_channel_opened().await;
        }
        SessionEvent::ChannelClosed => {
            session.on_channel_closed().await;
        }
        SessionEvent::NegotiationNeeded => session.on_negotiation_needed().await?,
        SessionEvent::Message(_) | SessionEvent::Track { .. } => {}
    }
    Ok(())
}

async fn relay(session: &mut PeerSession, msg: SignalMessage) -> anyhow::Result<()> {
    if matches!(msg, SignalMessage::Join { .. }) {
        return Ok(());
    }
    session.handle_signal(msg).await
}

/// Relays signals and connection callbacks between the two peers until
/// both report `Connected`. Returns every error either side raised.
pub async fn pump_until_connected(a: &mut TestPeer, b: &mut TestPeer) -> Vec<anyhow::Error> {
    let mut errors = Vec::new();
    let pump = async {
        while a.session.state() != SessionState::Connected
            || b.session.state() != SessionState::Connected
        {
            let result = tokio::select! {
                Some(msg) = a.outbound.recv() => relay(&mut b.session, msg).await,
                Some(msg) = b.outbound.recv() => relay(&mut a.session, msg).await,
                Some(event) = a.events.recv() => drive(&mut a.session, event).await,
                Some(event) = b.events.recv() => drive(&mut b.session, event).await,
            };
            if let Err(e) = result {
                tracing::warn!("peer pair error: {:#}", e);
                errors.push(e);
            }
        }
    };
    let connected = tokio::time::timeout(CONNECT_TIMEOUT, pump).await.is_ok();
    assert!(
        connected,
        "peers did not connect: a={} b={}",
        a.session.state(),
        b.session.state()
    );
    errors
}
