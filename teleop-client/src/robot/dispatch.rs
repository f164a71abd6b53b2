use crate::robot::RemoteRobot;
use teleop_core::{ProtocolError, RobotTelemetry, decode_frames};

/// Feeds one inbound data-channel frame to the facade.
///
/// Array frames are expanded and each element is handled fully, in order,
/// before the next one is decoded. The first bad element stops the frame;
/// elements before it have already been delivered. Returns how many
/// elements were handled.
pub fn dispatch_frame(robot: &RemoteRobot, text: &str) -> Result<usize, ProtocolError> {
    let mut handled = 0;
    for frame in decode_frames::<RobotTelemetry>(text)? {
        robot.handle_telemetry(frame?);
        handled += 1;
    }
    Ok(handled)
}

/// Decodes a frame with nowhere to deliver it. Returns how many elements
/// were valid, or the first error.
pub fn check_frame(text: &str) -> Result<usize, ProtocolError> {
    let mut valid = 0;
    for frame in decode_frames::<RobotTelemetry>(text)? {
        frame?;
        valid += 1;
    }
    Ok(valid)
}
