//! Integration tests against a scripted stub of the compute client.
//!
//! Every test here goes through a real TCP socket with real ETX framing;
//! nothing is mocked below the wire.

mod helpers;

mod auth;
mod client;
mod ops;
mod transport;
