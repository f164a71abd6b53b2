use crate::config::ConsoleConfig;
use crate::robot::RobotChannel;
use crate::session::{ChannelWriter, PeerSession, SessionConfig, SessionEvent};
use crate::signaling::{ICE_CONFIG_WAIT, SignalSink, SignalingClient, resolve_ice_servers};
use crate::simulator::{SimulatedRobot, default_camera_streams};
use anyhow::{Context, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use teleop_core::{PeerRole, RobotCommand, SignalMessage, decode_frames, encode};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

const TELEMETRY_PERIOD: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotExit {
    Hangup,
    PeerLeft,
    Closed,
}

/// Robot side of a room join, backed by [`SimulatedRobot`].
///
/// Serves the control channel only. Camera info is announced so the
/// operator's track registry has names, but no video tracks are added.
pub struct RobotConsole {
    config: ConsoleConfig,
    robot: SimulatedRobot,
    protocol_errors: usize,
}

impl RobotConsole {
    pub fn new(config: ConsoleConfig) -> Self {
        Self {
            config,
            robot: SimulatedRobot::new(),
            protocol_errors: 0,
        }
    }

    pub fn robot(&self) -> &SimulatedRobot {
        &self.robot
    }

    /// Decodes one operator frame and writes any replies to `writer`.
    pub fn handle_frame(&mut self, text: &str, writer: &dyn RobotChannel) {
        let frames = match decode_frames::<RobotCommand>(text) {
            Ok(frames) => frames,
            Err(e) => {
                self.protocol_errors += 1;
                error!("Bad frame from operator: {}", e);
                return;
            }
        };
        for frame in frames {
            let cmd = match frame {
                Ok(cmd) => cmd,
                Err(e) => {
                    self.protocol_errors += 1;
                    error!("Bad command from operator: {}", e);
                    return;
                }
            };
            for reply in self.robot.handle_command(cmd) {
                match encode(&reply) {
                    Ok(text) => writer.send_text(text),
                    Err(e) => warn!("Failed to encode telemetry: {}", e),
                }
            }
        }
    }

    fn publish_joint_state(&self, writer: &ChannelWriter) {
        if !writer.is_ready() {
            return;
        }
        match encode(&self.robot.joint_state()) {
            Ok(text) => writer.send_text(text),
            Err(e) => warn!("Failed to encode joint state: {}", e),
        }
    }

    pub async fn run(mut self, shutdown: impl Future<Output = ()>) -> Result<RobotExit> {
        let (client, mut signals) = SignalingClient::connect(&self.config.signaling_url)
            .await
            .context("Failed to reach rendezvous")?;
        let ice_servers =
            resolve_ice_servers(&mut signals, ICE_CONFIG_WAIT, &self.config.ice_servers).await;

        let (events_tx, mut events) = mpsc::unbounded_channel();
        let mut session = PeerSession::new(
            SessionConfig {
                role: PeerRole::Robot,
                ice_servers,
                video_tracks: 0,
            },
            Arc::new(client.clone()),
            events_tx,
        )
        .await?;

        let (closed_tx, mut closed_rx) = mpsc::unbounded_channel::<()>();
        session.on_connection_end(move || {
            let _ = closed_tx.send(());
        });
        session.join(self.config.room.clone()).await?;

        let writer = session.channel_writer();
        let mut telemetry = tokio::time::interval(TELEMETRY_PERIOD);
        tokio::pin!(shutdown);

        let outcome = loop {
            tokio::select! {
                _ = &mut shutdown => break Ok(RobotExit::Hangup),

                Some(()) = closed_rx.recv() => break Ok(RobotExit::Closed),

                _ = telemetry.tick() => self.publish_joint_state(&writer),

                signal = signals.recv() => match signal {
                    Some(SignalMessage::PeerLeft { role }) => {
                        info!(role = %role, "Operator left, restarting session");
                        break Ok(RobotExit::PeerLeft);
                    }
                    Some(SignalMessage::Error { reason }) => {
                        break Err(anyhow::anyhow!("Rendezvous refused: {reason}"));
                    }
                    Some(msg) => {
                        let announce = matches!(msg, SignalMessage::PeerJoined { .. });
                        if let Err(e) = session.handle_signal(msg).await {
                            warn!("Signal handling failed: {:#}", e);
                        }
                        if announce {
                            let streams = default_camera_streams();
                            let published =
                                client.send_signal(SignalMessage::CameraInfo { streams }).await;
                            if let Err(e) = published {
                                warn!("Failed to publish camera info: {:#}", e);
                            }
                        }
                    }
                    None => break Err(anyhow::anyhow!("Rendezvous connection closed")),
                },

                Some(event) = events.recv() => match event {
                    SessionEvent::TransportState(state) => {
                        session.on_transport_state(state).await;
                    }
                    SessionEvent::ChannelOpened => {
                        session.on_channel_opened().await;
                    }
                    SessionEvent::ChannelClosed => {
                        session.on_channel_closed().await;
                    }
                    SessionEvent::Message(text) => self.handle_frame(&text, &writer),
                    SessionEvent::Track { stream_id, .. } => {
                        warn!(stream_id = %stream_id, "Robot does not consume tracks");
                    }
                    SessionEvent::NegotiationNeeded => {
                        if let Err(e) = session.on_negotiation_needed().await {
                            error!("Negotiation failed: {:#}", e);
                        }
                    }
                },
            }
        };

        session.hangup().await;
        info!(protocol_errors = self.protocol_errors, "Robot session stopped");
        outcome
    }
}
