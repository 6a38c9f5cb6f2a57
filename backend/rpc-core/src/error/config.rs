use common::ErrorLocation;

use std::io::Error as IoError;
use std::path::PathBuf;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("Read Error: {path} {location}: {source}")]
    ReadError {
        location: ErrorLocation,
        path: PathBuf,
        source: IoError,
    },

    #[error("Parse Error: {path}: {reason} {location}")]
    ParseError {
        location: ErrorLocation,
        path: PathBuf,
        reason: String,
    },

    #[error("Serialize Error: {reason} {location}")]
    SerializeError {
        location: ErrorLocation,
        reason: String,
    },

    #[error("Write Error: {path} {location}: {source}")]
    WriteError {
        location: ErrorLocation,
        path: PathBuf,
        source: IoError,
    },

    #[error("Validation Error: {reason} {location}")]
    ValidationError {
        location: ErrorLocation,
        reason: String,
    },
}
