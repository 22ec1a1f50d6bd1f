//! Errors raised at the decoding boundary.
//!
//! Nothing inside the interaction or render paths returns these: those paths
//! degrade to no-ops. Only decoders of externally supplied payloads
//! (persisted cell lists, terrain arrays, configuration) are fallible.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    /// A revealed-cell key was not of the form `"x,y"`.
    #[error("invalid cell key {0:?}, expected \"x,y\"")]
    InvalidCellKey(String),

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = MapError> = std::result::Result<T, E>;
