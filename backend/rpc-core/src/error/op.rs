use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum OpError {
    /// The client refused the submit verb outright; no poll was attempted.
    #[error("Submit Rejected: {verb} {location}")]
    Rejected {
        verb: &'static str,
        location: ErrorLocation,
    },

    /// A poll returned no decodable reply. Hard failure, no further polls.
    #[error("No Reply: {verb} poll produced no data {location}")]
    NoReply {
        verb: &'static str,
        location: ErrorLocation,
    },

    /// A chained operation came back terminal with a nonzero error_num.
    #[error("Operation Failed: {verb} error_num={error_num} {location}")]
    Failed {
        verb: &'static str,
        error_num: i32,
        location: ErrorLocation,
    },

    #[error("Cancelled: {verb} {location}")]
    Cancelled {
        verb: &'static str,
        location: ErrorLocation,
    },

    #[error("Invalid Url: {message} {location}")]
    InvalidUrl {
        message: String,
        location: ErrorLocation,
    },

    /// The background polling task died before producing a result.
    #[error("Task Error: {message} {location}")]
    Task {
        message: String,
        location: ErrorLocation,
    },
}

impl From<url::ParseError> for OpError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        OpError::InvalidUrl {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
