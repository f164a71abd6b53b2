mod room;
mod signaling;

pub use room::*;
pub use signaling::*;
