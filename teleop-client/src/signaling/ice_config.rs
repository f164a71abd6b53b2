use std::time::Duration;
use teleop_core::{IceServerConfig, SignalMessage};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// How long a client waits for the rendezvous greeting.
pub const ICE_CONFIG_WAIT: Duration = Duration::from_secs(2);

/// Waits for the rendezvous greeting and picks the ICE servers to use.
///
/// A non-empty list from the rendezvous wins over `fallback`.
pub async fn resolve_ice_servers(
    signals: &mut mpsc::UnboundedReceiver<SignalMessage>,
    wait: Duration,
    fallback: &[IceServerConfig],
) -> Vec<IceServerConfig> {
    match tokio::time::timeout(wait, signals.recv()).await {
        Ok(Some(SignalMessage::IceConfig { ice_servers })) if !ice_servers.is_empty() => {
            info!("Using {} ICE servers from rendezvous", ice_servers.len());
            ice_servers
        }
        Ok(Some(SignalMessage::IceConfig { .. })) => fallback.to_vec(),
        Ok(Some(other)) => {
            warn!(?other, "Expected ICE config first");
            fallback.to_vec()
        }
        Ok(None) | Err(_) => {
            warn!("No ICE config from rendezvous, using configured servers");
            fallback.to_vec()
        }
    }
}
