use crate::error::ProtocolError;
use crate::traits::Envelope;
use serde_json::Value;
use std::marker::PhantomData;

pub fn encode<T: Envelope>(msg: &T) -> Result<String, ProtocolError> {
    check_outbound(msg)?;
    serde_json::to_string(msg).map_err(|e| ProtocolError::Encode(e.to_string()))
}

/// Encodes several envelopes as one JSON array frame.
pub fn encode_batch<T: Envelope>(msgs: &[T]) -> Result<String, ProtocolError> {
    for msg in msgs {
        check_outbound(msg)?;
    }
    serde_json::to_string(msgs).map_err(|e| ProtocolError::Encode(e.to_string()))
}

fn check_outbound<T: Envelope>(msg: &T) -> Result<(), ProtocolError> {
    let tag = msg.tag();
    if !T::TAGS.contains(&tag) {
        return Err(ProtocolError::UnknownTag(tag.to_owned()));
    }
    msg.validate()
}

/// Parses one data-channel frame, a single envelope or an array of them.
///
/// Elements are decoded lazily and in order, so a caller can dispatch each
/// one fully before looking at the next.
pub fn decode_frames<T: Envelope>(text: &str) -> Result<Frames<T>, ProtocolError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ProtocolError::InvalidJson(e.to_string()))?;

    let mut items = Vec::new();
    flatten(value, &mut items);

    Ok(Frames {
        items: items.into_iter(),
        _marker: PhantomData,
    })
}

/// Decodes a frame that must hold exactly one envelope.
pub fn decode_one<T: Envelope>(text: &str) -> Result<T, ProtocolError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ProtocolError::InvalidJson(e.to_string()))?;
    decode_value(value)
}

fn flatten(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten(item, out);
            }
        }
        other => out.push(other),
    }
}

fn decode_value<T: Envelope>(value: Value) -> Result<T, ProtocolError> {
    let Value::Object(map) = &value else {
        return Err(ProtocolError::NotAnObject);
    };
    let tag = match map.get("type") {
        Some(Value::String(tag)) => tag.clone(),
        _ => return Err(ProtocolError::MissingTag),
    };
    if !T::TAGS.contains(&tag.as_str()) {
        return Err(ProtocolError::UnknownTag(tag));
    }

    let msg: T = serde_json::from_value(value).map_err(|e| ProtocolError::MalformedPayload {
        tag,
        reason: e.to_string(),
    })?;
    msg.validate()?;
    Ok(msg)
}

/// Envelopes of one frame, in wire order.
pub struct Frames<T> {
    items: std::vec::IntoIter<Value>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Frames<T> {
    pub fn remaining(&self) -> usize {
        self.items.len()
    }
}

impl<T: Envelope> Iterator for Frames<T> {
    type Item = Result<T, ProtocolError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next().map(decode_value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}
