//! Two-phase nonce/hash authentication.
//!
//! Executed once per connection before any privileged call:
//!
//! 1. `<auth1/>` - the client answers with a one-time `<nonce>`.
//! 2. `<auth2>` carrying MD5(nonce + password) - the client answers
//!    `<authorized/>` or `<unauthorized/>`.
//!
//! The password itself never crosses the wire.

use common::RedactedPassword;

/// Digest sent in `<nonce_hash>`: lowercase hex MD5 of the raw
/// concatenation nonce + password.
pub fn nonce_hash(nonce: &str, password: &RedactedPassword) -> String {
    format!(
        "{:x}",
        md5::compute(format!("{}{}", nonce, password.as_str()))
    )
}

pub(crate) fn auth2_body(hash: &str) -> String {
    format!("<auth2>\n<nonce_hash>{hash}</nonce_hash>\n</auth2>\n")
}
