/// Where the facade sends encoded commands.
pub trait RobotChannel: Send + Sync {
    /// The session is connected and the control channel is open.
    fn is_ready(&self) -> bool;

    /// Queues one encoded frame. Frames leave in call order.
    fn send_text(&self, text: String);
}
