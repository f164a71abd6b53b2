use crate::error::ProtocolError;
use serde::{Serialize, de::DeserializeOwned};

/// A closed, `type`-tagged message set carried on the data channel.
pub trait Envelope: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Every tag this build knows how to encode and decode.
    const TAGS: &'static [&'static str];

    fn tag(&self) -> &'static str;

    /// Checks the payload against its tag before it goes on the wire.
    fn validate(&self) -> Result<(), ProtocolError> {
        Ok(())
    }
}
