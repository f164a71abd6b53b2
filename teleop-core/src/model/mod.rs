mod command;
mod peer;
mod pose;
mod room;
mod signaling;
mod telemetry;

pub use command::{Camera, Joint, Perspective, RobotCommand, RobotMode, ToggleFeature};
pub use peer::PeerId;
pub use pose::{
    PosePreset, REALSENSE_BASE_POSE, REALSENSE_FORWARD_POSE, REALSENSE_GRIPPER_POSE, STOW_POSE,
};
pub use room::{PeerRole, Politeness, RoomName};
pub use signaling::{IceServerConfig, SdpKind, SignalMessage};
pub use telemetry::{JOINT_STATE_ORDER, RobotTelemetry};
