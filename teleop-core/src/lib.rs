pub mod codec;
pub mod error;
pub mod model;
pub mod traits;
pub mod utils;

pub use codec::{Frames, decode_frames, decode_one, encode, encode_batch};
pub use error::ProtocolError;
pub use model::*;
pub use traits::Envelope;
