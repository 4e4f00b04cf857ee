//! Serialization error types.

use thiserror::Error;

/// Errors that can occur while writing or reading snapshots.
#[derive(Debug, Error)]
pub enum SerdeError {
    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Bincode decoding error.
    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::error::DecodeError),

    /// Bincode encoding error.
    #[error("bincode encode error: {0}")]
    BincodeEncode(#[from] bincode::error::EncodeError),

    /// The decoded snapshot could not be turned back into an automaton.
    #[error("model error: {0}")]
    Model(#[from] talus_automata::ModelError),
}
