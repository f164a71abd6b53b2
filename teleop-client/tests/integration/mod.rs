pub mod provider_tests;

use std::sync::Arc;
use teleop_client::providers::{
    ButtonFunctionProvider, PredictiveDisplayFunctionProvider, SessionContext,
    UnderVideoFunctionProvider,
};
use teleop_client::session::{Lifecycle, LifecycleEvent, SessionState};
use teleop_client::{ConsoleConfig, OperatorConsole};
use tracing::Level;

use crate::utils::RecordingChannel;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// An operator console whose control channel is a recorder driven by a
/// bare lifecycle instead of a live peer connection.
pub struct TestConsole {
    pub console: OperatorConsole,
    pub lifecycle: Lifecycle,
    pub channel: Arc<RecordingChannel>,
}

pub fn create_test_console() -> TestConsole {
    init_tracing();
    let console = OperatorConsole::new(ConsoleConfig::default());
    let mut lifecycle = Lifecycle::new();
    let channel = Arc::new(RecordingChannel::new(lifecycle.subscribe()));

    let ctx = console.context().clone();
    let buttons = console.buttons().clone();
    let hook_channel = channel.clone();
    lifecycle.on_channel_open(move || {
        OperatorConsole::initialize_operator(&ctx, buttons, hook_channel)
    });

    TestConsole {
        console,
        lifecycle,
        channel,
    }
}

impl TestConsole {
    /// Drives the lifecycle to `Connected` and drops the init traffic.
    pub fn connect(&mut self) {
        self.lifecycle.apply(LifecycleEvent::Joined);
        self.lifecycle.apply(LifecycleEvent::TransportConnected);
        self.lifecycle.apply(LifecycleEvent::ChannelOpened);
        assert_eq!(self.lifecycle.state(), SessionState::Connected);
        self.channel.clear();
    }

    pub fn ctx(&self) -> &Arc<SessionContext> {
        self.console.context()
    }

    pub fn buttons(&self) -> &Arc<ButtonFunctionProvider> {
        self.console.buttons()
    }

    pub fn under_video(&self) -> &Arc<UnderVideoFunctionProvider> {
        self.console.under_video()
    }

    pub fn predictive(&self) -> &Arc<PredictiveDisplayFunctionProvider> {
        self.console.predictive()
    }
}
