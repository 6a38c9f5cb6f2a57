//! Shared types for the BOINC GUI-RPC front-end.
//!
//! This crate contains pure data structures with no business logic - they're
//! just values that can be passed between layers.
//!
//! ## Architecture
//!
//! - **common** (this crate): error location capture, credential holders
//! - **rpc-core**: the GUI-RPC protocol client operating on these types
//!
//! The presentation layer consumes rpc-core; it never reaches into this crate
//! beyond the re-exports below.

pub mod error;
pub mod redacted_password;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use redacted_password::RedactedPassword;
