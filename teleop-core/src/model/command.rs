use crate::error::ProtocolError;
use crate::traits::Envelope;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Joints addressable by motion commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    TranslateMobileBase,
    RotateMobileBase,
    JointLift,
    WristExtension,
    JointWristYaw,
    JointGripperFingerLeft,
    JointHeadPan,
    JointHeadTilt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotMode {
    Navigation,
    Manipulation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Camera {
    Overhead,
    Realsense,
    Gripper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Perspective {
    Nav,
    Manip,
}

/// Robot-side features switched on and off from the operator console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToggleFeature {
    #[serde(rename = "setFollowGripper")]
    FollowGripper,
    #[serde(rename = "setDepthSensing")]
    DepthSensing,
}

/// Operator -> robot envelopes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum RobotCommand {
    DriveBase { lin_vel: f64, ang_vel: f64 },
    IncrementalMove { joint: Joint, increment: f64 },
    StopTrajectory,
    PoseTarget { pose: BTreeMap<Joint, f64> },
    ModeSelect { mode: RobotMode },
    ToggleFeature { feature: ToggleFeature, toggle: bool },
    CameraPerspective { camera: Camera, mode: Perspective },
    LookAtGripper,
}

impl Envelope for RobotCommand {
    const TAGS: &'static [&'static str] = &[
        "drive-base",
        "incremental-move",
        "stop-trajectory",
        "pose-target",
        "mode-select",
        "toggle-feature",
        "camera-perspective",
        "look-at-gripper",
    ];

    fn tag(&self) -> &'static str {
        match self {
            Self::DriveBase { .. } => "drive-base",
            Self::IncrementalMove { .. } => "incremental-move",
            Self::StopTrajectory => "stop-trajectory",
            Self::PoseTarget { .. } => "pose-target",
            Self::ModeSelect { .. } => "mode-select",
            Self::ToggleFeature { .. } => "toggle-feature",
            Self::CameraPerspective { .. } => "camera-perspective",
            Self::LookAtGripper => "look-at-gripper",
        }
    }

    fn validate(&self) -> Result<(), ProtocolError> {
        let invalid = |reason: &str| ProtocolError::InvalidPayload {
            tag: self.tag().to_owned(),
            reason: reason.to_owned(),
        };

        match self {
            Self::DriveBase { lin_vel, ang_vel } => {
                if !lin_vel.is_finite() || !ang_vel.is_finite() {
                    return Err(invalid("velocities must be finite"));
                }
            }
            Self::IncrementalMove { increment, .. } => {
                if !increment.is_finite() {
                    return Err(invalid("increment must be finite"));
                }
            }
            Self::PoseTarget { pose } => {
                if pose.is_empty() {
                    return Err(invalid("pose has no joints"));
                }
                if pose.values().any(|v| !v.is_finite()) {
                    return Err(invalid("joint positions must be finite"));
                }
            }
            _ => {}
        }
        Ok(())
    }
}
