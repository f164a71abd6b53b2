use crate::model::command::Joint;
use std::collections::BTreeMap;

/// A named, fixed joint-space configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosePreset {
    pub name: &'static str,
    pub joints: &'static [(Joint, f64)],
}

impl PosePreset {
    pub fn to_target(&self) -> BTreeMap<Joint, f64> {
        self.joints.iter().copied().collect()
    }
}

pub const REALSENSE_FORWARD_POSE: PosePreset = PosePreset {
    name: "look-forward",
    joints: &[(Joint::JointHeadPan, 0.0), (Joint::JointHeadTilt, 0.0)],
};

pub const REALSENSE_BASE_POSE: PosePreset = PosePreset {
    name: "look-at-base",
    joints: &[(Joint::JointHeadPan, 0.0), (Joint::JointHeadTilt, -1.1)],
};

pub const REALSENSE_GRIPPER_POSE: PosePreset = PosePreset {
    name: "look-at-gripper",
    joints: &[(Joint::JointHeadPan, -1.5), (Joint::JointHeadTilt, -1.0)],
};

/// Arm tucked over the base, gripper facing inward.
pub const STOW_POSE: PosePreset = PosePreset {
    name: "stow",
    joints: &[
        (Joint::JointLift, 0.2),
        (Joint::WristExtension, 0.0),
        (Joint::JointWristYaw, 3.4),
    ],
};
