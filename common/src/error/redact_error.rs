//! Raised when a redacted credential is about to leave the process.

use crate::ErrorLocation;

use thiserror::Error as ThisError;

/// Refusal to serialize a [`RedactedPassword`](crate::RedactedPassword):
/// the GUI-RPC password only ever leaves this process as a nonce digest,
/// never inside a serialized document.
#[derive(Debug, ThisError)]
pub enum RedactError {
    #[error("Serialization Error: {message} {location}")]
    Serialization {
        message: String,
        location: ErrorLocation,
    },
}
