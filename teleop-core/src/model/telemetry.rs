use crate::error::ProtocolError;
use crate::model::command::{Joint, ToggleFeature};
use crate::traits::Envelope;
use serde::{Deserialize, Serialize};

/// Joints covered by `validJointState`, in the order the flags are sent.
pub const JOINT_STATE_ORDER: [Joint; 3] =
    [Joint::JointLift, Joint::WristExtension, Joint::JointWristYaw];

/// Robot -> operator envelopes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RobotTelemetry {
    /// Per-joint flags, in the robot's joint order.
    #[serde(rename = "validJointState", rename_all = "camelCase")]
    ValidJointState {
        joints_in_limits: Vec<bool>,
        joints_in_collision: Vec<bool>,
    },
    /// Authoritative value of a toggle feature.
    #[serde(rename = "featureState")]
    FeatureState { feature: ToggleFeature, enabled: bool },
}

impl Envelope for RobotTelemetry {
    const TAGS: &'static [&'static str] = &["validJointState", "featureState"];

    fn tag(&self) -> &'static str {
        match self {
            Self::ValidJointState { .. } => "validJointState",
            Self::FeatureState { .. } => "featureState",
        }
    }

    fn validate(&self) -> Result<(), ProtocolError> {
        Ok(())
    }
}
