use crate::session::{
    ChannelWriter, Lifecycle, Negotiator, PeerSession, SessionConfig, SessionEvent,
};
use crate::signaling::SignalSink;
use anyhow::{Context, Result};
use bytes::Bytes;
use std::sync::Arc;
use teleop_core::utils::{CONTROL_CHANNEL_ID, CONTROL_CHANNEL_LABEL};
use teleop_core::{IceServerConfig, PeerRole, SignalMessage};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_init::RTCDataChannelInit;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::ice_transport::ice_candidate::RTCIceCandidate;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::rtp_transceiver::RTCRtpTransceiverInit;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::rtp_transceiver::rtp_transceiver_direction::RTCRtpTransceiverDirection;

fn rtc_ice_servers(servers: &[IceServerConfig]) -> Vec<RTCIceServer> {
    servers
        .iter()
        .map(|server| RTCIceServer {
            urls: server.urls.clone(),
            username: server.username.clone().unwrap_or_default(),
            credential: server.credential.clone().unwrap_or_default(),
        })
        .collect()
}

fn text_frame(data: &Bytes) -> Option<String> {
    std::str::from_utf8(data).ok().map(str::to_owned)
}

impl PeerSession {
    pub async fn new(
        config: SessionConfig,
        signaling: Arc<dyn SignalSink>,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> Result<Self> {
        let mut media_engine = MediaEngine::default();
        media_engine
            .register_default_codecs()
            .context("Failed to register codecs")?;
        let registry = register_default_interceptors(Registry::new(), &mut media_engine)
            .context("Failed to register interceptors")?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: rtc_ice_servers(&config.ice_servers),
            ..Default::default()
        };

        let peer_connection = Arc::new(
            api.new_peer_connection(rtc_config)
                .await
                .context("Failed to create peer connection")?,
        );

        if config.role == PeerRole::Operator {
            for _ in 0..config.video_tracks {
                peer_connection
                    .add_transceiver_from_kind(
                        RTPCodecType::Video,
                        Some(RTCRtpTransceiverInit {
                            direction: RTCRtpTransceiverDirection::Recvonly,
                            send_encodings: vec![],
                        }),
                    )
                    .await
                    .context("Failed to add video transceiver")?;
            }
        }

        // Opened out of band on both sides; neither peer waits for an
        // announcement, so glare never produces a second channel.
        let data_channel = peer_connection
            .create_data_channel(
                CONTROL_CHANNEL_LABEL,
                Some(RTCDataChannelInit {
                    ordered: Some(true),
                    negotiated: Some(CONTROL_CHANNEL_ID),
                    ..Default::default()
                }),
            )
            .await
            .context("Failed to create control channel")?;

        Self::wire_connection(&peer_connection, signaling.clone(), events.clone());
        Self::wire_channel(&data_channel, events);

        let lifecycle = Lifecycle::new();
        let writer = ChannelWriter::spawn(data_channel.clone(), lifecycle.subscribe());

        info!(
            role = %config.role,
            politeness = ?config.role.politeness(),
            video_tracks = config.video_tracks,
            "Peer session created"
        );

        Ok(Self {
            role: config.role,
            peer_connection,
            data_channel,
            signaling,
            negotiator: Negotiator::new(config.role.politeness()),
            lifecycle,
            writer,
            pending_candidates: Vec::new(),
            counterpart_present: false,
            released: false,
        })
    }

    fn wire_connection(
        pc: &Arc<RTCPeerConnection>,
        signaling: Arc<dyn SignalSink>,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) {
        let tx = events.clone();
        pc.on_peer_connection_state_change(Box::new(move |state: RTCPeerConnectionState| {
            let tx = tx.clone();
            Box::pin(async move {
                let _ = tx.send(SessionEvent::TransportState(state));
            })
        }));

        let tx = events.clone();
        pc.on_negotiation_needed(Box::new(move || {
            let tx = tx.clone();
            Box::pin(async move {
                let _ = tx.send(SessionEvent::NegotiationNeeded);
            })
        }));

        let tx = events;
        pc.on_track(Box::new(move |track, _receiver, _transceiver| {
            let tx = tx.clone();
            Box::pin(async move {
                let stream_id = track.stream_id();
                debug!(stream_id = %stream_id, kind = ?track.kind(), "Remote track");
                let _ = tx.send(SessionEvent::Track { stream_id, track });
            })
        }));

        pc.on_ice_candidate(Box::new(move |candidate: Option<RTCIceCandidate>| {
            let signaling = signaling.clone();
            Box::pin(async move {
                let Some(candidate) = candidate else {
                    return;
                };
                let init = match candidate.to_json() {
                    Ok(init) => init,
                    Err(e) => {
                        warn!("Failed to serialize local candidate: {}", e);
                        return;
                    }
                };
                let msg = SignalMessage::IceCandidate {
                    candidate: init.candidate,
                    sdp_mid: init.sdp_mid,
                    sdp_m_line_index: init.sdp_mline_index,
                };
                if let Err(e) = signaling.send_signal(msg).await {
                    warn!("Failed to send local candidate: {}", e);
                }
            })
        }));
    }

    fn wire_channel(dc: &Arc<RTCDataChannel>, events: mpsc::UnboundedSender<SessionEvent>) {
        let tx = events.clone();
        dc.on_open(Box::new(move || {
            Box::pin(async move {
                let _ = tx.send(SessionEvent::ChannelOpened);
            })
        }));

        let tx = events.clone();
        dc.on_close(Box::new(move || {
            let tx = tx.clone();
            Box::pin(async move {
                let _ = tx.send(SessionEvent::ChannelClosed);
            })
        }));

        let tx = events;
        dc.on_message(Box::new(move |msg: DataChannelMessage| {
            let tx = tx.clone();
            Box::pin(async move {
                match text_frame(&msg.data) {
                    Some(text) => {
                        let _ = tx.send(SessionEvent::Message(text));
                    }
                    None => warn!(len = msg.data.len(), "Dropping non-UTF-8 control frame"),
                }
            })
        }));
    }
}
