// Unit tests for the nonce/hash handshake primitives.
// The full two-message exchange is covered in integration_tests/auth.rs.

use crate::transport::auth::{auth2_body, nonce_hash};

use common::RedactedPassword;

/// **VALUE**: Verifies the digest is MD5(nonce + password) in that order.
///
/// **WHY THIS MATTERS**: The compute client computes the same concatenation
/// on its side; swapping the operands or hashing the password alone produces
/// a hash that looks valid but never authorizes.
///
/// **BUG THIS CATCHES**: Operand order regressions and accidental salting.
#[test]
fn given_nonce_and_password_when_hashed_then_digest_is_md5_of_concatenation() {
    let password = RedactedPassword::from("secret");

    let hash = nonce_hash("abc123", &password);

    assert_eq!(hash, format!("{:x}", md5::compute("abc123secret")));
    assert_ne!(hash, format!("{:x}", md5::compute("secretabc123")));
}

#[test]
fn given_any_nonce_when_hashed_then_digest_is_lowercase_hex() {
    let hash = nonce_hash("1754402980.8434", &RedactedPassword::from("pw"));

    assert_eq!(hash.len(), 32);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn given_hash_when_auth2_body_built_then_wraps_nonce_hash_element() {
    let body = auth2_body("deadbeef");

    assert_eq!(body, "<auth2>\n<nonce_hash>deadbeef</nonce_hash>\n</auth2>\n");
}

/// Password hygiene: the credential must never leak through Debug output.
#[test]
fn given_redacted_password_when_debug_formatted_then_value_is_hidden() {
    let password = RedactedPassword::from("hunter2");

    assert!(!format!("{password:?}").contains("hunter2"));
    assert!(!format!("{password}").contains("hunter2"));
}
