//! Secure GUI-RPC password handling with redacted Debug output.
//!
//! The GUI-RPC protocol never transmits the password itself - only an
//! MD5(nonce + password) digest crosses the wire. This type keeps the
//! cleartext out of logs and serialized output on our side too.

use crate::{ErrorLocation, RedactError};

use std::fmt;
use std::panic::Location;

use serde::ser::Error;
use zeroize::Zeroize;

/// A GUI-RPC password that never exposes its value in logs or debug output.
#[derive(Clone)]
pub struct RedactedPassword {
    inner: String,
}

impl RedactedPassword {
    /// Create a new redacted password.
    pub fn new(password: String) -> Self {
        Self { inner: password }
    }

    /// Get the actual password value for digest computation.
    ///
    /// # Security Note
    /// Only call this when feeding the authentication digest.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Get the password length (safe to log).
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the password is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl From<&str> for RedactedPassword {
    fn from(password: &str) -> Self {
        Self::new(password.to_string())
    }
}

impl fmt::Debug for RedactedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RedactedPassword([REDACTED])")
    }
}

impl fmt::Display for RedactedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED PASSWORD]")
    }
}

impl Drop for RedactedPassword {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

// Prevent accidental serialization
impl serde::Serialize for RedactedPassword {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Err(S::Error::custom(RedactError::Serialization {
            message: String::from(
                "RedactedPassword cannot be serialized - use as_str() explicitly",
            ),
            location: ErrorLocation::from(Location::caller()),
        }))
    }
}
