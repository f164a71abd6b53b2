use crate::robot::RobotChannel;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use teleop_core::{
    Camera, Envelope, Joint, Perspective, PosePreset, RobotCommand, RobotMode, RobotTelemetry,
    ToggleFeature, encode,
};
use tracing::{debug, error, info};

/// Receives `validJointState` flags exactly as the robot sent them:
/// `(joints_in_limits, joints_in_collision)`.
pub type SensorListener = Arc<dyn Fn(&[bool], &[bool]) + Send + Sync>;

/// Typed command surface over the control channel.
///
/// Every call is a no-op while the channel is not ready. Nothing is queued
/// for later delivery.
pub struct RemoteRobot {
    channel: Arc<dyn RobotChannel>,
    sensor_listener: RwLock<Option<SensorListener>>,
    toggles: Mutex<HashMap<ToggleFeature, bool>>,
}

impl RemoteRobot {
    pub fn new(channel: Arc<dyn RobotChannel>) -> Self {
        Self {
            channel,
            sensor_listener: RwLock::new(None),
            toggles: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.channel.is_ready()
    }

    pub fn set_robot_mode(&self, mode: RobotMode) {
        self.send(RobotCommand::ModeSelect { mode });
    }

    pub fn set_camera_perspective(&self, camera: Camera, mode: Perspective) {
        self.send(RobotCommand::CameraPerspective { camera, mode });
    }

    pub fn set_robot_pose(&self, preset: &PosePreset) {
        debug!(pose = preset.name, "Moving to preset");
        self.send(RobotCommand::PoseTarget {
            pose: preset.to_target(),
        });
    }

    /// Records the value optimistically; `featureState` telemetry has the
    /// final word.
    pub fn set_toggle(&self, feature: ToggleFeature, enabled: bool) {
        let sent = self.send(RobotCommand::ToggleFeature {
            feature,
            toggle: enabled,
        });
        if sent {
            self.toggles.lock().insert(feature, enabled);
        }
    }

    pub fn look_at_gripper(&self) {
        self.send(RobotCommand::LookAtGripper);
    }

    pub fn drive_base(&self, lin_vel: f64, ang_vel: f64) {
        self.send(RobotCommand::DriveBase { lin_vel, ang_vel });
    }

    pub fn incremental_move(&self, joint: Joint, increment: f64) {
        self.send(RobotCommand::IncrementalMove { joint, increment });
    }

    pub fn stop_trajectory(&self) {
        self.send(RobotCommand::StopTrajectory);
    }

    /// Replaces any previously registered listener.
    pub fn set_sensor_listener(&self, listener: SensorListener) {
        *self.sensor_listener.write() = Some(listener);
    }

    pub fn toggle_state(&self, feature: ToggleFeature) -> Option<bool> {
        self.toggles.lock().get(&feature).copied()
    }

    pub fn handle_telemetry(&self, msg: RobotTelemetry) {
        match msg {
            RobotTelemetry::ValidJointState {
                joints_in_limits,
                joints_in_collision,
            } => {
                // Cloned out so the listener may re-register itself.
                let listener = self.sensor_listener.read().clone();
                match listener {
                    Some(listener) => listener(&joints_in_limits, &joints_in_collision),
                    None => debug!("Joint state received with no listener"),
                }
            }
            RobotTelemetry::FeatureState { feature, enabled } => {
                let previous = self.toggles.lock().insert(feature, enabled);
                if previous.is_some_and(|p| p != enabled) {
                    info!(?feature, enabled, "Robot overrode toggle");
                }
            }
        }
    }

    fn send(&self, cmd: RobotCommand) -> bool {
        if !self.channel.is_ready() {
            debug!(tag = cmd.tag(), "Control channel not ready, command dropped");
            return false;
        }
        match encode(&cmd) {
            Ok(text) => {
                self.channel.send_text(text);
                true
            }
            Err(e) => {
                error!(tag = cmd.tag(), error = %e, "Refusing to send invalid command");
                false
            }
        }
    }
}
