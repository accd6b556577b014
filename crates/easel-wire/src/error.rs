use thiserror::Error;

use crate::handle::SurfaceId;
use crate::op::Op;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    /// The engine answered with a non-success status. The surface stays live.
    #[error("{op} failed: {detail}")]
    Failed { op: Op, detail: String },

    /// A status-only operation answered with the no-value sentinel.
    #[error("{op} returned no value")]
    NoValue { op: Op },

    /// The handle was destroyed; no call was issued.
    #[error("surface {0} has been destroyed")]
    Destroyed(SurfaceId),

    /// The engine refused to create a surface; its id went back to the registry.
    #[error("surface creation failed: {detail}")]
    CreateFailed { detail: String },

    #[error("engine does not know operation `{0}`")]
    Unbound(String),

    #[error("{op} returned a malformed response: {text:?}")]
    Malformed { op: Op, text: String },

    #[error("response is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("failed to encode argument record")]
    Encode(#[from] serde_json::Error),

    #[error("channel transport failed")]
    Channel(#[source] anyhow::Error),

    /// File paths cross the channel as UTF-8 text; this one has no such form.
    #[error("path {0:?} is not valid UTF-8")]
    NonUtf8Path(std::path::PathBuf),

    #[error("dispatch session lock poisoned")]
    Poisoned,
}
