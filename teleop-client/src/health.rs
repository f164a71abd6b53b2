use crate::session::SessionState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(4);

/// Restarts the console with a fresh room join.
pub trait Reloader: Send + Sync {
    fn reload(&self);
}

impl<F> Reloader for F
where
    F: Fn() + Send + Sync,
{
    fn reload(&self) {
        self()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthVerdict {
    Healthy,
    Reloaded,
}

/// One-shot connection watchdog.
pub struct HealthMonitor;

impl HealthMonitor {
    /// Looks at the session once, `grace` after spawning. Anything but
    /// `Connected` triggers exactly one reload.
    pub fn spawn(
        state: watch::Receiver<SessionState>,
        grace: Duration,
        reloader: Arc<dyn Reloader>,
    ) -> JoinHandle<HealthVerdict> {
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;

            let current = *state.borrow();
            if current == SessionState::Connected {
                info!("Session connected within {:?}", grace);
                return HealthVerdict::Healthy;
            }

            warn!(state = %current, "Session not connected after {:?}, reloading", grace);
            reloader.reload();
            HealthVerdict::Reloaded
        })
    }
}
