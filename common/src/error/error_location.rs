//! Caller-location capture for error values.
//!
//! Every error enum in this workspace carries the source position of the
//! point that raised it, captured via `#[track_caller]` `From` impls. RPC
//! failures surface asynchronously, cycles after the exchange that caused
//! them; the location is usually the only thread back to that exchange.

use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FormatResult};
use std::panic::Location as PanicLocation;

/// Source position embedded in an error, displayed as
/// `[file:line:column]`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ErrorLocation {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

impl ErrorLocation {
    pub const fn from(location: &'static PanicLocation<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
            column: location.column(),
        }
    }
}

impl Display for ErrorLocation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        write!(formatter, "[{}:{}:{}]", self.file, self.line, self.column)
    }
}
