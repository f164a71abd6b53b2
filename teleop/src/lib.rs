pub use teleop_core::{PeerRole, ProtocolError, RoomName};

pub mod model {
    pub use teleop_core::model::*;
}

pub mod codec {
    pub use teleop_core::codec::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use teleop_server::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use teleop_client::*;
}
