use thiserror::Error;

/// Failures of the data-channel envelope protocol.
///
/// These never tear the session down; they mean the two peers disagree about
/// the message set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("envelope is not a JSON object")]
    NotAnObject,

    #[error("envelope has no string `type` tag")]
    MissingTag,

    #[error("unrecognized envelope tag `{0}`")]
    UnknownTag(String),

    #[error("malformed `{tag}` payload: {reason}")]
    MalformedPayload { tag: String, reason: String },

    #[error("invalid `{tag}` payload: {reason}")]
    InvalidPayload { tag: String, reason: String },

    #[error("failed to encode envelope: {0}")]
    Encode(String),
}
