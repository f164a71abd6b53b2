mod dispatch;
mod remote_robot;
mod robot_channel;

pub use dispatch::{check_frame, dispatch_frame};
pub use remote_robot::{RemoteRobot, SensorListener};
pub use robot_channel::RobotChannel;
