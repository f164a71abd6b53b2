use crate::providers::UnknownAction;
use crate::robot::RemoteRobot;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_VELOCITY_SCALE: f64 = 0.8;
const MIN_VELOCITY_SCALE: f64 = 0.01;

/// How button pads turn pointer input into motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionMode {
    /// Each click moves one scaled step.
    #[default]
    #[serde(alias = "Step-Actuate")]
    StepActuate,
    /// Motion runs while the button is held.
    #[serde(alias = "Press-Release")]
    PressRelease,
    /// First click starts motion, the second click stops it.
    #[serde(alias = "Click-Click")]
    ClickClick,
}

impl fmt::Display for ActionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::StepActuate => "step-actuate",
            Self::PressRelease => "press-release",
            Self::ClickClick => "click-click",
        };
        f.write_str(name)
    }
}

impl FromStr for ActionMode {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "step-actuate" => Ok(Self::StepActuate),
            "press-release" => Ok(Self::PressRelease),
            "click-click" => Ok(Self::ClickClick),
            _ => Err(UnknownAction::new("action mode", s)),
        }
    }
}

/// Clamps into `(0, 1]`. Non-finite input falls back to the default.
pub fn clamp_velocity_scale(scale: f64) -> f64 {
    if !scale.is_finite() {
        warn!(scale, "Velocity scale is not finite, using default");
        return DEFAULT_VELOCITY_SCALE;
    }
    scale.clamp(MIN_VELOCITY_SCALE, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProviderSettings {
    pub velocity_scale: f64,
    pub action_mode: ActionMode,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            velocity_scale: DEFAULT_VELOCITY_SCALE,
            action_mode: ActionMode::default(),
        }
    }
}

#[derive(Debug, Error)]
#[error("a remote robot is already attached to this session")]
pub struct AttachError;

/// State shared by every function provider of one console.
///
/// The robot slot is written once, when the control channel first opens.
/// Until then every provider callback is a no-op.
#[derive(Default)]
pub struct SessionContext {
    robot: OnceLock<Arc<RemoteRobot>>,
    settings: RwLock<ProviderSettings>,
}

impl SessionContext {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            robot: OnceLock::new(),
            settings: RwLock::new(ProviderSettings {
                velocity_scale: clamp_velocity_scale(settings.velocity_scale),
                ..settings
            }),
        }
    }

    pub fn attach_robot(&self, robot: Arc<RemoteRobot>) -> Result<(), AttachError> {
        self.robot.set(robot).map_err(|_| AttachError)?;
        info!("Remote robot attached");
        Ok(())
    }

    pub fn robot(&self) -> Option<&Arc<RemoteRobot>> {
        self.robot.get()
    }

    /// Runs `f` against the attached robot, if any.
    pub fn with_robot(&self, f: impl FnOnce(&RemoteRobot)) {
        match self.robot.get() {
            Some(robot) => f(robot),
            None => debug!("No robot attached, action ignored"),
        }
    }

    pub fn settings(&self) -> ProviderSettings {
        *self.settings.read()
    }

    pub fn velocity_scale(&self) -> f64 {
        self.settings.read().velocity_scale
    }

    pub fn action_mode(&self) -> ActionMode {
        self.settings.read().action_mode
    }

    pub fn set_velocity_scale(&self, scale: f64) {
        self.settings.write().velocity_scale = clamp_velocity_scale(scale);
    }

    pub fn set_action_mode(&self, mode: ActionMode) {
        self.settings.write().action_mode = mode;
    }
}
