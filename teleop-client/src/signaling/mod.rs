mod ice_config;
mod signal_sink;
mod signaling_client;

pub use ice_config::{ICE_CONFIG_WAIT, resolve_ice_servers};
pub use signal_sink::SignalSink;
pub use signaling_client::SignalingClient;
