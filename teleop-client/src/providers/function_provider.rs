use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub type Callback = Arc<dyn Fn() + Send + Sync>;
pub type CheckCallback = Arc<dyn Fn(bool) + Send + Sync>;
pub type MoveCallback = Arc<dyn Fn(Stroke) + Send + Sync>;

/// Pointer position over the overhead view, relative to the robot base.
/// `x` is lateral (right positive), `y` is forward; both in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub x: f64,
    pub y: f64,
}

impl Stroke {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: x.clamp(-1.0, 1.0),
            y: y.clamp(-1.0, 1.0),
        }
    }
}

/// Callbacks a UI control binds to. Absent entries mean the control does
/// not react to that interaction.
#[derive(Clone, Default)]
pub struct ActionFunctions {
    pub on_click: Option<Callback>,
    pub on_check: Option<CheckCallback>,
    pub on_release: Option<Callback>,
    pub on_leave: Option<Callback>,
    pub on_move: Option<MoveCallback>,
}

impl ActionFunctions {
    pub fn click(&self) {
        if let Some(f) = &self.on_click {
            f();
        }
    }

    pub fn check(&self, toggle: bool) {
        if let Some(f) = &self.on_check {
            f(toggle);
        }
    }

    pub fn release(&self) {
        if let Some(f) = &self.on_release {
            f();
        }
    }

    pub fn leave(&self) {
        if let Some(f) = &self.on_leave {
            f();
        }
    }

    pub fn move_to(&self, stroke: Stroke) {
        if let Some(f) = &self.on_move {
            f(stroke);
        }
    }
}

impl fmt::Debug for ActionFunctions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionFunctions")
            .field("on_click", &self.on_click.is_some())
            .field("on_check", &self.on_check.is_some())
            .field("on_release", &self.on_release.is_some())
            .field("on_leave", &self.on_leave.is_some())
            .field("on_move", &self.on_move.is_some())
            .finish()
    }
}

/// A label that names no action of the provider. Raised by the UI layer,
/// never by the robot or the transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{label}`")]
pub struct UnknownAction {
    pub kind: &'static str,
    pub label: String,
}

impl UnknownAction {
    pub fn new(kind: &'static str, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
        }
    }
}

/// Adapter from UI actions to facade calls.
pub trait FunctionProvider {
    type Action: Copy + fmt::Debug;

    fn provide_functions(&self, action: Self::Action) -> ActionFunctions;

    /// Resolves a persisted label or spoken phrase.
    fn parse_action(&self, label: &str) -> Result<Self::Action, UnknownAction>;

    fn provide_functions_for(&self, label: &str) -> Result<ActionFunctions, UnknownAction> {
        let action = self.parse_action(label)?;
        Ok(self.provide_functions(action))
    }
}
