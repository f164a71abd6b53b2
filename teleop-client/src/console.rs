use crate::config::ConsoleConfig;
use crate::health::HealthMonitor;
use crate::providers::{
    ActionMode, ButtonFunctionProvider, PredictiveDisplayFunctionProvider, SessionContext,
    UnderVideoFunctionProvider, UnknownAction, VoiceCommand, VoiceFunctionProvider,
};
use crate::robot::{RemoteRobot, RobotChannel, check_frame, dispatch_frame};
use crate::session::{PeerSession, SessionConfig, SessionEvent};
use crate::signaling::{ICE_CONFIG_WAIT, SignalingClient, resolve_ice_servers};
use crate::tracks::TrackRegistry;
use anyhow::{Context, Result, anyhow};
use std::future::Future;
use std::sync::Arc;
use teleop_core::{PeerRole, RobotMode, SignalMessage};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use webrtc::track::track_remote::TrackRemote;

/// Why a console run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleExit {
    /// Local shutdown was requested.
    Hangup,
    /// The session reached `Closed` after having started.
    Closed,
    /// The health monitor gave up on the session.
    Reload,
}

/// Outcome of one line of operator input.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleInput {
    VelocityScale(f64),
    ActionMode(ActionMode),
    Voice(VoiceCommand),
}

/// Operator side of one room join: session, providers and track bindings.
///
/// A console runs a single session. Reloading means building a new one.
pub struct OperatorConsole {
    config: ConsoleConfig,
    ctx: Arc<SessionContext>,
    buttons: Arc<ButtonFunctionProvider>,
    under_video: Arc<UnderVideoFunctionProvider>,
    voice: Arc<VoiceFunctionProvider>,
    predictive: Arc<PredictiveDisplayFunctionProvider>,
    tracks: TrackRegistry<Arc<TrackRemote>>,
    protocol_errors: usize,
}

impl OperatorConsole {
    pub fn new(config: ConsoleConfig) -> Self {
        let ctx = Arc::new(SessionContext::new(config.provider_settings()));
        Self {
            buttons: Arc::new(ButtonFunctionProvider::new(ctx.clone())),
            under_video: Arc::new(UnderVideoFunctionProvider::new(ctx.clone())),
            voice: Arc::new(VoiceFunctionProvider::new(ctx.clone())),
            predictive: Arc::new(PredictiveDisplayFunctionProvider::new(ctx.clone())),
            ctx,
            config,
            tracks: TrackRegistry::new(),
            protocol_errors: 0,
        }
    }

    pub fn context(&self) -> &Arc<SessionContext> {
        &self.ctx
    }

    pub fn buttons(&self) -> &Arc<ButtonFunctionProvider> {
        &self.buttons
    }

    pub fn under_video(&self) -> &Arc<UnderVideoFunctionProvider> {
        &self.under_video
    }

    pub fn voice(&self) -> &Arc<VoiceFunctionProvider> {
        &self.voice
    }

    pub fn predictive(&self) -> &Arc<PredictiveDisplayFunctionProvider> {
        &self.predictive
    }

    pub fn tracks(&self) -> &TrackRegistry<Arc<TrackRemote>> {
        &self.tracks
    }

    /// Inbound frames rejected by the codec so far.
    pub fn protocol_errors(&self) -> usize {
        self.protocol_errors
    }

    /// Builds the robot facade over `channel` and hands it to the providers.
    ///
    /// Runs from the session's channel-open hook. Puts the robot in
    /// navigation mode and routes joint state to the button pad.
    pub fn initialize_operator(
        ctx: &SessionContext,
        buttons: Arc<ButtonFunctionProvider>,
        channel: Arc<dyn RobotChannel>,
    ) {
        let robot = Arc::new(RemoteRobot::new(channel));
        robot.set_robot_mode(RobotMode::Navigation);
        robot.set_sensor_listener(Arc::new(move |in_limits: &[bool], in_collision: &[bool]| {
            buttons.update_joint_states(in_limits, in_collision)
        }));
        if let Err(e) = ctx.attach_robot(robot) {
            warn!("{}", e);
        }
    }

    /// Applies one line typed by the operator.
    ///
    /// `speed <x>` and `mode <name>` adjust provider settings. Anything else
    /// is treated as a recognized voice phrase.
    pub fn handle_input(&self, line: &str) -> Result<ConsoleInput, UnknownAction> {
        let line = line.trim();
        if let Some(value) = line.strip_prefix("speed ") {
            let scale: f64 = value
                .trim()
                .parse()
                .map_err(|_| UnknownAction::new("velocity scale", value))?;
            self.ctx.set_velocity_scale(scale);
            return Ok(ConsoleInput::VelocityScale(self.ctx.velocity_scale()));
        }
        if let Some(value) = line.strip_prefix("mode ") {
            let mode: ActionMode = value.parse()?;
            self.ctx.set_action_mode(mode);
            return Ok(ConsoleInput::ActionMode(mode));
        }
        self.voice.handle_phrase(line).map(ConsoleInput::Voice)
    }

    /// Handles one data-channel frame. Bad frames are counted and logged;
    /// they never end the session.
    pub fn handle_frame(&mut self, text: &str) {
        let result = match self.ctx.robot() {
            Some(robot) => dispatch_frame(robot, text),
            None => check_frame(text).inspect(|valid| {
                debug!(elements = *valid, "Frame before robot attached, dropped");
            }),
        };
        if let Err(e) = result {
            self.protocol_errors += 1;
            error!(errors = self.protocol_errors, "Bad frame from robot: {}", e);
        }
    }

    pub async fn run(
        mut self,
        shutdown: impl Future<Output = ()>,
        input: &mut mpsc::UnboundedReceiver<String>,
    ) -> Result<ConsoleExit> {
        let (client, mut signals) = SignalingClient::connect(&self.config.signaling_url)
            .await
            .context("Failed to reach rendezvous")?;
        let ice_servers =
            resolve_ice_servers(&mut signals, ICE_CONFIG_WAIT, &self.config.ice_servers).await;

        let (events_tx, mut events) = mpsc::unbounded_channel();
        let mut session = PeerSession::new(
            SessionConfig {
                role: PeerRole::Operator,
                ice_servers,
                video_tracks: self.config.video_tracks,
            },
            Arc::new(client),
            events_tx,
        )
        .await?;

        let (exit_tx, mut exit_rx) = mpsc::unbounded_channel::<ConsoleExit>();

        let ctx = self.ctx.clone();
        let buttons = self.buttons.clone();
        let writer: Arc<dyn RobotChannel> = Arc::new(session.channel_writer());
        session.on_channel_open(move || Self::initialize_operator(&ctx, buttons, writer));

        let tx = exit_tx.clone();
        session.on_connection_end(move || {
            let _ = tx.send(ConsoleExit::Closed);
        });

        let health = HealthMonitor::spawn(
            session.subscribe(),
            self.config.grace_period(),
            Arc::new(move || {
                let _ = exit_tx.send(ConsoleExit::Reload);
            }),
        );

        if let Err(e) = session.join(self.config.room.clone()).await {
            health.abort();
            session.hangup().await;
            return Err(e);
        }

        tokio::pin!(shutdown);
        let mut signaling_open = true;
        let mut input_open = true;

        let outcome = loop {
            tokio::select! {
                _ = &mut shutdown => break Ok(ConsoleExit::Hangup),

                Some(exit) = exit_rx.recv() => break Ok(exit),

                signal = signals.recv(), if signaling_open => match signal {
                    Some(SignalMessage::CameraInfo { streams }) => {
                        info!(cameras = streams.len(), "Camera info received");
                        self.tracks.bind_all(&streams);
                    }
                    Some(SignalMessage::Error { reason }) => {
                        break Err(anyhow!("Rendezvous refused: {reason}"));
                    }
                    Some(msg) => {
                        if let Err(e) = session.handle_signal(msg).await {
                            warn!("Signal handling failed: {:#}", e);
                        }
                    }
                    None => {
                        warn!("Rendezvous connection closed");
                        signaling_open = false;
                    }
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
                    SessionEvent::Message(text) => self.handle_frame(&text),
                    SessionEvent::Track { stream_id, track } => {
                        self.tracks.add_track(&stream_id, track);
                    }
                    SessionEvent::NegotiationNeeded => {
                        if let Err(e) = session.on_negotiation_needed().await {
                            error!("Negotiation failed: {:#}", e);
                        }
                    }
                },

                line = input.recv(), if input_open => match line {
                    Some(line) => match self.handle_input(&line) {
                        Ok(applied) => info!(?applied, "Operator input"),
                        Err(e) => warn!("{}", e),
                    },
                    None => input_open = false,
                },
            }
        };

        health.abort();
        session.hangup().await;
        info!(
            protocol_errors = self.protocol_errors,
            cameras = ?self.tracks.names(),
            "Console stopped"
        );
        outcome
    }
}
