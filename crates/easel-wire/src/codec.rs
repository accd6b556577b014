//! Message codec.
//!
//! Outgoing: every argument becomes one byte buffer.
//! - raw buffers (pixel data, encoded images) pass through untouched
//! - numbers and strings become their plain text form
//! - records become deterministic JSON (field names fixed, declaration order)
//! - text is carried as UTF-8
//!
//! Incoming: a response is either a text status, a text value, or a raw
//! buffer, depending on the operation (see [`crate::op::Reply`]).

use std::fmt::Display;

use serde::{ser, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::handle::SurfaceId;

/// Status text meaning success.
pub const STATUS_OK: &str = "0";

/// Status/value text meaning "no value".
pub const NO_VALUE: &str = "n";

/// Single-byte buffer meaning "no value" for pixel read-back.
pub const BUFFER_ABSENT: u8 = b'1';

/// One call argument before encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg<'a> {
    /// Sent verbatim.
    Bytes(&'a [u8]),
    /// Sent as UTF-8.
    Text(String),
}

impl<'a> Arg<'a> {
    #[inline]
    pub fn bytes(buf: &'a [u8]) -> Self {
        Arg::Bytes(buf)
    }

    #[inline]
    pub fn text(s: impl Into<String>) -> Self {
        Arg::Text(s.into())
    }

    /// Plain textual form of a number (`12`, `0.5`, `-3`).
    #[inline]
    pub fn number<T: Display>(v: T) -> Self {
        Arg::Text(v.to_string())
    }

    /// Structural JSON form of a record.
    ///
    /// Wire records have no optional fields, so a `null` anywhere means a
    /// non-finite float (`serde_json` writes NaN and infinities as `null`).
    /// Such a record is rejected here rather than by the engine.
    pub fn record<T: Serialize + ?Sized>(v: &T) -> Result<Self> {
        if has_null(&serde_json::to_value(v)?) {
            return Err(Error::Encode(ser::Error::custom("record contains a non-finite number")));
        }
        Ok(Arg::Text(serde_json::to_string(v)?))
    }

    fn into_buffer(self) -> Vec<u8> {
        match self {
            Arg::Bytes(b) => b.to_vec(),
            Arg::Text(s) => encode_text(&s),
        }
    }
}

macro_rules! numeric_arg {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Arg<'_> {
                #[inline]
                fn from(v: $t) -> Self {
                    Arg::number(v)
                }
            }
        )*
    };
}

numeric_arg!(u8, u32, i32, f32);

impl From<SurfaceId> for Arg<'_> {
    #[inline]
    fn from(id: SurfaceId) -> Self {
        Arg::number(id.get())
    }
}

impl From<&str> for Arg<'_> {
    #[inline]
    fn from(s: &str) -> Self {
        Arg::text(s)
    }
}

impl From<String> for Arg<'_> {
    #[inline]
    fn from(s: String) -> Self {
        Arg::Text(s)
    }
}

fn has_null(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Array(items) => items.iter().any(has_null),
        Value::Object(fields) => fields.values().any(has_null),
        _ => false,
    }
}

/// An encoded call: opcode plus one buffer per argument, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub opcode: u32,
    pub args: Vec<Vec<u8>>,
}

/// Encodes a call's arguments, preserving order.
pub fn encode(opcode: u32, args: Vec<Arg<'_>>) -> Frame {
    Frame {
        opcode,
        args: args.into_iter().map(Arg::into_buffer).collect(),
    }
}

#[inline]
pub fn encode_text(s: &str) -> Vec<u8> {
    s.as_bytes().to_vec()
}

/// Inverse of [`encode_text`]. Fails only on bytes that are not UTF-8.
#[inline]
pub fn decode_text(buf: Vec<u8>) -> Result<String> {
    Ok(String::from_utf8(buf)?)
}

/// Classified status response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    NoValue,
    Failure(String),
}

/// `"0"` → success, `"n"` → no value, anything else → failure carrying the text.
pub fn decode_status(text: &str) -> Outcome {
    match text {
        STATUS_OK => Outcome::Success,
        NO_VALUE => Outcome::NoValue,
        other => Outcome::Failure(other.to_owned()),
    }
}

/// Buffer response: exactly one byte equal to `absent` is "no value".
///
/// Any other payload, including an empty one, is the result itself.
pub fn decode_buffer(buf: Vec<u8>, absent: u8) -> Option<Vec<u8>> {
    if buf.len() == 1 && buf[0] == absent { None } else { Some(buf) }
}
