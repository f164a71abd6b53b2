mod robot_console;
mod simulated_robot;

pub use robot_console::{RobotConsole, RobotExit};
pub use simulated_robot::{SimulatedRobot, default_camera_streams, joint_limits};
