use crate::providers::{ActionFunctions, FunctionProvider, SessionContext, UnknownAction};
use std::str::FromStr;
use std::sync::Arc;
use teleop_core::{Camera, Perspective, REALSENSE_BASE_POSE, ToggleFeature};

/// Buttons shown under the camera views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnderVideoButton {
    DriveView,
    GripperView,
    LookAtGripper,
    LookAtBase,
    FollowGripper,
    DepthSensing,
}

/// Perspectives of the overhead camera.
pub const OVERHEAD_BUTTONS: [UnderVideoButton; 2] =
    [UnderVideoButton::DriveView, UnderVideoButton::GripperView];

/// Perspectives of the realsense camera.
pub const REALSENSE_BUTTONS: [UnderVideoButton; 2] =
    [UnderVideoButton::LookAtBase, UnderVideoButton::LookAtGripper];

impl UnderVideoButton {
    pub const ALL: [Self; 6] = [
        Self::DriveView,
        Self::GripperView,
        Self::LookAtGripper,
        Self::LookAtBase,
        Self::FollowGripper,
        Self::DepthSensing,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::DriveView => "Drive View",
            Self::GripperView => "Gripper View",
            Self::LookAtGripper => "Look At Gripper",
            Self::LookAtBase => "Look At Base",
            Self::FollowGripper => "Follow Gripper",
            Self::DepthSensing => "Depth Sensing",
        }
    }
}

impl FromStr for UnderVideoButton {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.label() == s)
            .ok_or_else(|| UnknownAction::new("under-video button", s))
    }
}

pub struct UnderVideoFunctionProvider {
    ctx: Arc<SessionContext>,
}

impl UnderVideoFunctionProvider {
    pub fn new(ctx: Arc<SessionContext>) -> Self {
        Self { ctx }
    }

    fn click(&self, f: impl Fn(&SessionContext) + Send + Sync + 'static) -> ActionFunctions {
        let ctx = self.ctx.clone();
        ActionFunctions {
            on_click: Some(Arc::new(move || f(&ctx))),
            ..Default::default()
        }
    }

    fn check(&self, feature: ToggleFeature) -> ActionFunctions {
        let ctx = self.ctx.clone();
        ActionFunctions {
            on_check: Some(Arc::new(move |toggle| {
                ctx.with_robot(|robot| robot.set_toggle(feature, toggle))
            })),
            ..Default::default()
        }
    }
}

impl FunctionProvider for UnderVideoFunctionProvider {
    type Action = UnderVideoButton;

    fn provide_functions(&self, button: UnderVideoButton) -> ActionFunctions {
        match button {
            UnderVideoButton::DriveView => self.click(|ctx| {
                ctx.with_robot(|r| r.set_camera_perspective(Camera::Overhead, Perspective::Nav))
            }),
            UnderVideoButton::GripperView => self.click(|ctx| {
                ctx.with_robot(|r| r.set_camera_perspective(Camera::Overhead, Perspective::Manip))
            }),
            UnderVideoButton::LookAtBase => {
                self.click(|ctx| ctx.with_robot(|r| r.set_robot_pose(&REALSENSE_BASE_POSE)))
            }
            UnderVideoButton::LookAtGripper => {
                self.click(|ctx| ctx.with_robot(|r| r.look_at_gripper()))
            }
            UnderVideoButton::FollowGripper => self.check(ToggleFeature::FollowGripper),
            UnderVideoButton::DepthSensing => self.check(ToggleFeature::DepthSensing),
        }
    }

    fn parse_action(&self, label: &str) -> Result<UnderVideoButton, UnknownAction> {
        label.parse()
    }
}
