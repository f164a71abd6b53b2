use crate::providers::{
    ActionFunctions, ButtonPadAction, FunctionProvider, SessionContext, UnknownAction,
};
use crate::robot::RemoteRobot;
use std::str::FromStr;
use std::sync::Arc;
use teleop_core::{Camera, Perspective, REALSENSE_BASE_POSE, RobotMode, STOW_POSE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoiceCommand {
    DriveForward,
    DriveBackward,
    TurnLeft,
    TurnRight,
    LiftUp,
    LiftDown,
    ExtendArm,
    RetractArm,
    OpenGripper,
    CloseGripper,
    RotateWristIn,
    RotateWristOut,
    Stop,
    DriveView,
    GripperView,
    LookAtBase,
    LookAtGripper,
    Stow,
    NavigationMode,
    ManipulationMode,
}

const PHRASES: &[(&str, VoiceCommand)] = &[
    ("drive forward", VoiceCommand::DriveForward),
    ("move forward", VoiceCommand::DriveForward),
    ("forward", VoiceCommand::DriveForward),
    ("drive backward", VoiceCommand::DriveBackward),
    ("move backward", VoiceCommand::DriveBackward),
    ("backward", VoiceCommand::DriveBackward),
    ("reverse", VoiceCommand::DriveBackward),
    ("turn left", VoiceCommand::TurnLeft),
    ("rotate left", VoiceCommand::TurnLeft),
    ("turn right", VoiceCommand::TurnRight),
    ("rotate right", VoiceCommand::TurnRight),
    ("lift up", VoiceCommand::LiftUp),
    ("raise arm", VoiceCommand::LiftUp),
    ("arm up", VoiceCommand::LiftUp),
    ("lift down", VoiceCommand::LiftDown),
    ("lower arm", VoiceCommand::LiftDown),
    ("arm down", VoiceCommand::LiftDown),
    ("extend arm", VoiceCommand::ExtendArm),
    ("extend", VoiceCommand::ExtendArm),
    ("retract arm", VoiceCommand::RetractArm),
    ("retract", VoiceCommand::RetractArm),
    ("open gripper", VoiceCommand::OpenGripper),
    ("close gripper", VoiceCommand::CloseGripper),
    ("rotate wrist in", VoiceCommand::RotateWristIn),
    ("wrist in", VoiceCommand::RotateWristIn),
    ("rotate wrist out", VoiceCommand::RotateWristOut),
    ("wrist out", VoiceCommand::RotateWristOut),
    ("stop", VoiceCommand::Stop),
    ("halt", VoiceCommand::Stop),
    ("drive view", VoiceCommand::DriveView),
    ("gripper view", VoiceCommand::GripperView),
    ("look at base", VoiceCommand::LookAtBase),
    ("look at gripper", VoiceCommand::LookAtGripper),
    ("stow", VoiceCommand::Stow),
    ("stow arm", VoiceCommand::Stow),
    ("navigation mode", VoiceCommand::NavigationMode),
    ("manipulation mode", VoiceCommand::ManipulationMode),
];

/// Lowercases, strips punctuation and the word "please".
fn normalize(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|word| !word.is_empty() && word != "please")
        .collect::<Vec<_>>()
        .join(" ")
}

impl VoiceCommand {
    /// Button equivalent for motion commands.
    pub fn button(self) -> Option<ButtonPadAction> {
        let action = match self {
            Self::DriveForward => ButtonPadAction::BaseForward,
            Self::DriveBackward => ButtonPadAction::BaseReverse,
            Self::TurnLeft => ButtonPadAction::BaseRotateLeft,
            Self::TurnRight => ButtonPadAction::BaseRotateRight,
            Self::LiftUp => ButtonPadAction::ArmLift,
            Self::LiftDown => ButtonPadAction::ArmLower,
            Self::ExtendArm => ButtonPadAction::ArmExtend,
            Self::RetractArm => ButtonPadAction::ArmRetract,
            Self::OpenGripper => ButtonPadAction::GripperOpen,
            Self::CloseGripper => ButtonPadAction::GripperClose,
            Self::RotateWristIn => ButtonPadAction::WristRotateIn,
            Self::RotateWristOut => ButtonPadAction::WristRotateOut,
            _ => return None,
        };
        Some(action)
    }

    fn execute(self, robot: &RemoteRobot, scale: f64) {
        if let Some(action) = self.button() {
            let (joint, step) = action.step();
            robot.incremental_move(joint, step * scale);
            return;
        }
        match self {
            Self::Stop => robot.stop_trajectory(),
            Self::DriveView => robot.set_camera_perspective(Camera::Overhead, Perspective::Nav),
            Self::GripperView => {
                robot.set_camera_perspective(Camera::Overhead, Perspective::Manip)
            }
            Self::LookAtBase => robot.set_robot_pose(&REALSENSE_BASE_POSE),
            Self::LookAtGripper => robot.look_at_gripper(),
            Self::Stow => robot.set_robot_pose(&STOW_POSE),
            Self::NavigationMode => robot.set_robot_mode(RobotMode::Navigation),
            Self::ManipulationMode => robot.set_robot_mode(RobotMode::Manipulation),
            _ => {}
        }
    }
}

impl FromStr for VoiceCommand {
    type Err = UnknownAction;

    fn from_str(phrase: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(phrase);
        PHRASES
            .iter()
            .find(|(p, _)| *p == normalized)
            .map(|(_, command)| *command)
            .ok_or_else(|| UnknownAction::new("voice command", phrase))
    }
}

pub struct VoiceFunctionProvider {
    ctx: Arc<SessionContext>,
}

impl VoiceFunctionProvider {
    pub fn new(ctx: Arc<SessionContext>) -> Self {
        Self { ctx }
    }

    /// Parses a recognized phrase and runs it.
    pub fn handle_phrase(&self, phrase: &str) -> Result<VoiceCommand, UnknownAction> {
        let command: VoiceCommand = phrase.parse()?;
        self.provide_functions(command).click();
        Ok(command)
    }
}

impl FunctionProvider for VoiceFunctionProvider {
    type Action = VoiceCommand;

    fn provide_functions(&self, command: VoiceCommand) -> ActionFunctions {
        let ctx = self.ctx.clone();
        ActionFunctions {
            on_click: Some(Arc::new(move || {
                let scale = ctx.velocity_scale();
                ctx.with_robot(|robot| command.execute(robot, scale));
            })),
            ..Default::default()
        }
    }

    fn parse_action(&self, phrase: &str) -> Result<VoiceCommand, UnknownAction> {
        phrase.parse()
    }
}
