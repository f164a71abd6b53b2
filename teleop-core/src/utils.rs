pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_2: &str = "stun:stun1.l.google.com:19302";

/// Label of the single application data channel.
pub const CONTROL_CHANNEL_LABEL: &str = "control";

/// Both peers open the control channel out of band with this id, so a
/// session never ends up with two channels regardless of who offered.
pub const CONTROL_CHANNEL_ID: u16 = 0;
