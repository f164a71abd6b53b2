use std::collections::{BTreeMap, HashMap};
use teleop_core::{
    Camera, JOINT_STATE_ORDER, Joint, Perspective, RobotCommand, RobotMode, RobotTelemetry,
    ToggleFeature,
};
use tracing::{debug, info};

/// Travel range of each positional joint, `(min, max)`.
pub fn joint_limits(joint: Joint) -> Option<(f64, f64)> {
    let limits = match joint {
        Joint::JointLift => (0.0, 1.1),
        Joint::WristExtension => (0.0, 0.52),
        Joint::JointWristYaw => (-1.75, 4.0),
        Joint::JointGripperFingerLeft => (-0.37, 0.17),
        Joint::JointHeadPan => (-4.04, 1.73),
        Joint::JointHeadTilt => (-1.53, 0.79),
        Joint::TranslateMobileBase | Joint::RotateMobileBase => return None,
    };
    Some(limits)
}

/// Stream id -> camera name the simulator advertises.
///
/// Metadata only: the simulator sends no media, so an operator binds these
/// names but never receives a track for them.
pub fn default_camera_streams() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("sim-overhead".to_owned(), "overhead".to_owned()),
        ("sim-realsense".to_owned(), "realsense".to_owned()),
        ("sim-gripper".to_owned(), "gripper".to_owned()),
    ])
}

/// Kinematic stand-in for the robot: joints jump to their clamped targets.
#[derive(Debug, Clone)]
pub struct SimulatedRobot {
    positions: BTreeMap<Joint, f64>,
    base_velocity: (f64, f64),
    mode: RobotMode,
    perspectives: HashMap<Camera, Perspective>,
    toggles: HashMap<ToggleFeature, bool>,
}

impl Default for SimulatedRobot {
    fn default() -> Self {
        let positions = BTreeMap::from([
            (Joint::JointLift, 0.6),
            (Joint::WristExtension, 0.1),
            (Joint::JointWristYaw, 0.0),
            (Joint::JointGripperFingerLeft, 0.0),
            (Joint::JointHeadPan, 0.0),
            (Joint::JointHeadTilt, 0.0),
        ]);
        Self {
            positions,
            base_velocity: (0.0, 0.0),
            mode: RobotMode::Navigation,
            perspectives: HashMap::new(),
            toggles: HashMap::new(),
        }
    }
}

impl SimulatedRobot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self, joint: Joint) -> Option<f64> {
        self.positions.get(&joint).copied()
    }

    pub fn base_velocity(&self) -> (f64, f64) {
        self.base_velocity
    }

    pub fn mode(&self) -> RobotMode {
        self.mode
    }

    pub fn perspective(&self, camera: Camera) -> Option<Perspective> {
        self.perspectives.get(&camera).copied()
    }

    /// Applies one command and returns the telemetry it provokes.
    pub fn handle_command(&mut self, cmd: RobotCommand) -> Vec<RobotTelemetry> {
        debug!(?cmd, "Simulated robot command");
        match cmd {
            RobotCommand::DriveBase { lin_vel, ang_vel } => {
                self.base_velocity = (lin_vel, ang_vel);
            }
            RobotCommand::IncrementalMove { joint, increment } => match joint {
                Joint::TranslateMobileBase => self.base_velocity = (increment, 0.0),
                Joint::RotateMobileBase => self.base_velocity = (0.0, increment),
                joint => {
                    let current = self.positions.get(&joint).copied().unwrap_or(0.0);
                    self.move_joint(joint, current + increment);
                }
            },
            RobotCommand::StopTrajectory => self.base_velocity = (0.0, 0.0),
            RobotCommand::PoseTarget { pose } => {
                for (joint, target) in pose {
                    self.move_joint(joint, target);
                }
            }
            RobotCommand::ModeSelect { mode } => {
                info!(?mode, "Robot mode");
                self.mode = mode;
            }
            RobotCommand::ToggleFeature { feature, toggle } => {
                self.toggles.insert(feature, toggle);
                return vec![RobotTelemetry::FeatureState {
                    feature,
                    enabled: toggle,
                }];
            }
            RobotCommand::CameraPerspective { camera, mode } => {
                self.perspectives.insert(camera, mode);
            }
            RobotCommand::LookAtGripper => {
                self.move_joint(Joint::JointHeadPan, -1.5);
                self.move_joint(Joint::JointHeadTilt, -1.0);
            }
        }
        Vec::new()
    }

    /// Reports a joint as out of limits once it sits on either end stop.
    pub fn joint_state(&self) -> RobotTelemetry {
        let joints_in_limits = JOINT_STATE_ORDER
            .iter()
            .map(|joint| {
                let position = self.positions.get(joint).copied().unwrap_or(0.0);
                joint_limits(*joint).is_none_or(|(min, max)| position > min && position < max)
            })
            .collect();
        RobotTelemetry::ValidJointState {
            joints_in_limits,
            joints_in_collision: vec![false; JOINT_STATE_ORDER.len()],
        }
    }

    fn move_joint(&mut self, joint: Joint, target: f64) {
        let clamped = match joint_limits(joint) {
            Some((min, max)) => target.clamp(min, max),
            None => target,
        };
        self.positions.insert(joint, clamped);
    }
}
