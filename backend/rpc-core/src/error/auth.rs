use crate::error::transport::TransportError;

use common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum AuthError {
    /// The client answered `<unauthorized/>`. Retrying with the same
    /// credentials is pointless; the caller must intervene.
    #[error("Unauthorized: client rejected the nonce hash {location}")]
    Unauthorized { location: ErrorLocation },

    /// The handshake reply was malformed (no nonce, no verdict).
    #[error("Handshake Error: {message} {location}")]
    Handshake {
        message: String,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),
}
