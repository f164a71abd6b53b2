use crate::providers::{
    ActionFunctions, ActionMode, Callback, FunctionProvider, SessionContext, UnknownAction,
};
use crate::robot::RemoteRobot;
use parking_lot::{Mutex, RwLock};
use std::str::FromStr;
use std::sync::Arc;
use teleop_core::{JOINT_STATE_ORDER, Joint};
use tracing::debug;

const BASE_TRANSLATE_STEP: f64 = 0.1;
const BASE_ROTATE_STEP: f64 = 0.2;
const LIFT_STEP: f64 = 0.05;
const ARM_STEP: f64 = 0.05;
const WRIST_STEP: f64 = 0.2;
const GRIPPER_STEP: f64 = 0.05;

const BASE_LINEAR_VELOCITY: f64 = 0.3;
const BASE_ANGULAR_VELOCITY: f64 = 0.6;

/// Held joint motion asks for this many steps at once; release stops it
/// early and the robot clamps at the joint limit.
const CONTINUOUS_TRAVEL_STEPS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonPadAction {
    BaseForward,
    BaseReverse,
    BaseRotateRight,
    BaseRotateLeft,
    ArmLift,
    ArmLower,
    ArmExtend,
    ArmRetract,
    GripperOpen,
    GripperClose,
    WristRotateIn,
    WristRotateOut,
}

impl ButtonPadAction {
    pub const ALL: [Self; 12] = [
        Self::BaseForward,
        Self::BaseReverse,
        Self::BaseRotateRight,
        Self::BaseRotateLeft,
        Self::ArmLift,
        Self::ArmLower,
        Self::ArmExtend,
        Self::ArmRetract,
        Self::GripperOpen,
        Self::GripperClose,
        Self::WristRotateIn,
        Self::WristRotateOut,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::BaseForward => "Base Forward",
            Self::BaseReverse => "Base Reverse",
            Self::BaseRotateRight => "Base Rotate Right",
            Self::BaseRotateLeft => "Base Rotate Left",
            Self::ArmLift => "Arm Lift",
            Self::ArmLower => "Arm Lower",
            Self::ArmExtend => "Arm Extend",
            Self::ArmRetract => "Arm Retract",
            Self::GripperOpen => "Gripper Open",
            Self::GripperClose => "Gripper Close",
            Self::WristRotateIn => "Wrist Rotate In",
            Self::WristRotateOut => "Wrist Rotate Out",
        }
    }

    /// The joint this button moves and the signed size of one step.
    pub fn step(self) -> (Joint, f64) {
        match self {
            Self::BaseForward => (Joint::TranslateMobileBase, BASE_TRANSLATE_STEP),
            Self::BaseReverse => (Joint::TranslateMobileBase, -BASE_TRANSLATE_STEP),
            Self::BaseRotateRight => (Joint::RotateMobileBase, -BASE_ROTATE_STEP),
            Self::BaseRotateLeft => (Joint::RotateMobileBase, BASE_ROTATE_STEP),
            Self::ArmLift => (Joint::JointLift, LIFT_STEP),
            Self::ArmLower => (Joint::JointLift, -LIFT_STEP),
            Self::ArmExtend => (Joint::WristExtension, ARM_STEP),
            Self::ArmRetract => (Joint::WristExtension, -ARM_STEP),
            Self::GripperOpen => (Joint::JointGripperFingerLeft, GRIPPER_STEP),
            Self::GripperClose => (Joint::JointGripperFingerLeft, -GRIPPER_STEP),
            Self::WristRotateIn => (Joint::JointWristYaw, WRIST_STEP),
            Self::WristRotateOut => (Joint::JointWristYaw, -WRIST_STEP),
        }
    }
}

impl FromStr for ButtonPadAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.label() == s)
            .ok_or_else(|| UnknownAction::new("button pad action", s))
    }
}

/// Latest `validJointState` flags, indexed by [`JOINT_STATE_ORDER`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JointStates {
    pub in_limits: Vec<bool>,
    pub in_collision: Vec<bool>,
}

impl JointStates {
    /// Joints the robot does not report on are never blocked.
    pub fn is_blocked(&self, joint: Joint) -> bool {
        let Some(index) = JOINT_STATE_ORDER.iter().position(|j| *j == joint) else {
            return false;
        };
        let in_limits = self.in_limits.get(index).copied().unwrap_or(true);
        let in_collision = self.in_collision.get(index).copied().unwrap_or(false);
        !in_limits || in_collision
    }
}

#[derive(Default)]
struct ButtonState {
    active: Mutex<Option<ButtonPadAction>>,
    joint_states: RwLock<Option<JointStates>>,
}

pub struct ButtonFunctionProvider {
    ctx: Arc<SessionContext>,
    state: Arc<ButtonState>,
}

impl ButtonFunctionProvider {
    pub fn new(ctx: Arc<SessionContext>) -> Self {
        Self {
            ctx,
            state: Arc::new(ButtonState::default()),
        }
    }

    pub fn update_joint_states(&self, in_limits: &[bool], in_collision: &[bool]) {
        *self.state.joint_states.write() = Some(JointStates {
            in_limits: in_limits.to_vec(),
            in_collision: in_collision.to_vec(),
        });
    }

    pub fn joint_states(&self) -> Option<JointStates> {
        self.state.joint_states.read().clone()
    }

    /// Whether the UI should mark this button as pushing into a limit or a
    /// collision.
    pub fn is_blocked(&self, action: ButtonPadAction) -> bool {
        let (joint, _) = action.step();
        self.state
            .joint_states
            .read()
            .as_ref()
            .is_some_and(|states| states.is_blocked(joint))
    }

    /// The button currently running in click-click mode.
    pub fn active_action(&self) -> Option<ButtonPadAction> {
        *self.state.active.lock()
    }
}

fn step_once(robot: &RemoteRobot, action: ButtonPadAction, scale: f64) {
    let (joint, step) = action.step();
    robot.incremental_move(joint, step * scale);
}

fn start_motion(robot: &RemoteRobot, action: ButtonPadAction, scale: f64) {
    let (joint, step) = action.step();
    match joint {
        Joint::TranslateMobileBase => {
            robot.drive_base(step.signum() * BASE_LINEAR_VELOCITY * scale, 0.0)
        }
        Joint::RotateMobileBase => {
            robot.drive_base(0.0, step.signum() * BASE_ANGULAR_VELOCITY * scale)
        }
        joint => robot.incremental_move(joint, step * CONTINUOUS_TRAVEL_STEPS * scale),
    }
}

fn stop_motion(robot: &RemoteRobot, action: ButtonPadAction) {
    match action.step().0 {
        Joint::TranslateMobileBase | Joint::RotateMobileBase => robot.drive_base(0.0, 0.0),
        _ => robot.stop_trajectory(),
    }
}

impl FunctionProvider for ButtonFunctionProvider {
    type Action = ButtonPadAction;

    fn provide_functions(&self, action: ButtonPadAction) -> ActionFunctions {
        let ctx = self.ctx.clone();
        match ctx.action_mode() {
            ActionMode::StepActuate => ActionFunctions {
                on_click: Some(Arc::new(move || {
                    let scale = ctx.velocity_scale();
                    ctx.with_robot(|robot| step_once(robot, action, scale));
                })),
                ..Default::default()
            },
            ActionMode::PressRelease => {
                let stop: Callback = {
                    let ctx = ctx.clone();
                    Arc::new(move || ctx.with_robot(|robot| stop_motion(robot, action)))
                };
                ActionFunctions {
                    on_click: Some(Arc::new(move || {
                        let scale = ctx.velocity_scale();
                        ctx.with_robot(|robot| start_motion(robot, action, scale));
                    })),
                    on_release: Some(stop.clone()),
                    on_leave: Some(stop),
                    ..Default::default()
                }
            }
            ActionMode::ClickClick => {
                let state = self.state.clone();
                let leave_ctx = ctx.clone();
                let leave_state = self.state.clone();
                ActionFunctions {
                    on_click: Some(Arc::new(move || {
                        let scale = ctx.velocity_scale();
                        let mut active = state.active.lock();
                        let running = *active;
                        ctx.with_robot(|robot| {
                            if running == Some(action) {
                                stop_motion(robot, action);
                                *active = None;
                                return;
                            }
                            if let Some(previous) = running {
                                stop_motion(robot, previous);
                            }
                            start_motion(robot, action, scale);
                            *active = Some(action);
                        });
                    })),
                    on_leave: Some(Arc::new(move || {
                        let mut active = leave_state.active.lock();
                        if *active == Some(action) {
                            debug!(?action, "Pointer left running button");
                            leave_ctx.with_robot(|robot| stop_motion(robot, action));
                            *active = None;
                        }
                    })),
                    ..Default::default()
                }
            }
        }
    }

    fn parse_action(&self, label: &str) -> Result<ButtonPadAction, UnknownAction> {
        label.parse()
    }
}
