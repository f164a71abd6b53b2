mod button_function_provider;
mod function_provider;
mod predictive_display_function_provider;
mod session_context;
mod under_video_function_provider;
mod voice_function_provider;

pub use button_function_provider::{ButtonFunctionProvider, ButtonPadAction, JointStates};
pub use function_provider::{
    ActionFunctions, Callback, CheckCallback, FunctionProvider, MoveCallback, Stroke, UnknownAction,
};
pub use predictive_display_function_provider::{
    PredictiveDisplayAction, PredictiveDisplayFunctionProvider,
};
pub use session_context::{
    ActionMode, AttachError, DEFAULT_VELOCITY_SCALE, ProviderSettings, SessionContext,
    clamp_velocity_scale,
};
pub use under_video_function_provider::{
    OVERHEAD_BUTTONS, REALSENSE_BUTTONS, UnderVideoButton, UnderVideoFunctionProvider,
};
pub use voice_function_provider::{VoiceCommand, VoiceFunctionProvider};
