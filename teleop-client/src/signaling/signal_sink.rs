use async_trait::async_trait;
use teleop_core::SignalMessage;

/// Outbound half of the signaling channel.
#[async_trait]
pub trait SignalSink: Send + Sync {
    async fn send_signal(&self, msg: SignalMessage) -> anyhow::Result<()>;
}
