use crate::providers::{
    ActionFunctions, ActionMode, FunctionProvider, SessionContext, Stroke, UnknownAction,
};
use crate::robot::RemoteRobot;
use parking_lot::Mutex;
use std::str::FromStr;
use std::sync::Arc;

const MAX_LINEAR_VELOCITY: f64 = 0.3;
const MAX_ANGULAR_VELOCITY: f64 = 0.6;

/// Press-and-hold driving on the overhead view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredictiveDisplayAction {
    Trajectory,
}

impl PredictiveDisplayAction {
    pub fn label(self) -> &'static str {
        "Predictive Display"
    }
}

impl FromStr for PredictiveDisplayAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::Trajectory.label() {
            Ok(Self::Trajectory)
        } else {
            Err(UnknownAction::new("predictive display action", s))
        }
    }
}

#[derive(Debug, Default)]
struct Trajectory {
    active: bool,
    stroke: Option<Stroke>,
}

pub struct PredictiveDisplayFunctionProvider {
    ctx: Arc<SessionContext>,
    trajectory: Arc<Mutex<Trajectory>>,
}

fn drive_along(robot: &RemoteRobot, stroke: Stroke, scale: f64) {
    let linear = stroke.y * MAX_LINEAR_VELOCITY * scale;
    let angular = -stroke.x * MAX_ANGULAR_VELOCITY * scale;
    robot.drive_base(linear, angular);
}

fn stop(robot: &RemoteRobot) {
    robot.drive_base(0.0, 0.0);
}

impl PredictiveDisplayFunctionProvider {
    pub fn new(ctx: Arc<SessionContext>) -> Self {
        Self {
            ctx,
            trajectory: Arc::new(Mutex::new(Trajectory::default())),
        }
    }

    pub fn is_driving(&self) -> bool {
        self.trajectory.lock().active
    }
}

impl FunctionProvider for PredictiveDisplayFunctionProvider {
    type Action = PredictiveDisplayAction;

    fn provide_functions(&self, _action: PredictiveDisplayAction) -> ActionFunctions {
        let mode = self.ctx.action_mode();

        let (ctx, trajectory) = (self.ctx.clone(), self.trajectory.clone());
        let on_click = Arc::new(move || {
            let mut t = trajectory.lock();
            if mode == ActionMode::ClickClick && t.active {
                t.active = false;
                ctx.with_robot(stop);
                return;
            }
            t.active = true;
            if let Some(stroke) = t.stroke {
                let scale = ctx.velocity_scale();
                ctx.with_robot(|robot| drive_along(robot, stroke, scale));
            }
        });

        let (ctx, trajectory) = (self.ctx.clone(), self.trajectory.clone());
        let on_move = Arc::new(move |stroke: Stroke| {
            let mut t = trajectory.lock();
            t.stroke = Some(stroke);
            if t.active {
                let scale = ctx.velocity_scale();
                ctx.with_robot(|robot| drive_along(robot, stroke, scale));
            }
        });

        let (ctx, trajectory) = (self.ctx.clone(), self.trajectory.clone());
        let on_release = Arc::new(move || {
            let mut t = trajectory.lock();
            if mode != ActionMode::ClickClick && t.active {
                t.active = false;
                ctx.with_robot(stop);
            }
        });

        let (ctx, trajectory) = (self.ctx.clone(), self.trajectory.clone());
        let on_leave = Arc::new(move || {
            let mut t = trajectory.lock();
            t.stroke = None;
            if t.active {
                t.active = false;
                ctx.with_robot(stop);
            }
        });

        ActionFunctions {
            on_click: Some(on_click),
            on_move: Some(on_move),
            on_release: Some(on_release),
            on_leave: Some(on_leave),
            ..Default::default()
        }
    }

    fn parse_action(&self, label: &str) -> Result<PredictiveDisplayAction, UnknownAction> {
        label.parse()
    }
}
