pub mod config;
pub mod console;
pub mod health;
pub mod providers;
pub mod robot;
pub mod session;
pub mod signaling;
pub mod simulator;
pub mod tracks;

pub use config::{ConfigError, ConsoleConfig, StorageConfig};
pub use console::{ConsoleExit, ConsoleInput, OperatorConsole};
pub use health::{DEFAULT_GRACE_PERIOD, HealthMonitor, HealthVerdict, Reloader};
pub use robot::{RemoteRobot, RobotChannel, SensorListener, dispatch_frame};
pub use session::{PeerSession, SessionConfig, SessionEvent, SessionState};
pub use signaling::{SignalSink, SignalingClient};
pub use simulator::{RobotConsole, RobotExit, SimulatedRobot};
pub use tracks::{TrackBinding, TrackRegistry};
