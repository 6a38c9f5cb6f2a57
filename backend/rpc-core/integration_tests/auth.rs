//! The two-message nonce/hash handshake against the stub.

use crate::helpers::{StubServer, reply};

use rpc_core::error::auth::AuthError;
use rpc_core::rpc_client::RpcClient;

use common::RedactedPassword;

/// **VALUE**: Verifies the full auth1/auth2 exchange, including the exact
/// hash the second request carries.
///
/// **WHY THIS MATTERS**: The handshake is the only gate in front of every
/// privileged verb; a wrong digest locks the whole client out.
///
/// **BUG THIS CATCHES**: Hashing the wrong concatenation, or sending the
/// digest outside `<nonce_hash>`.
#[tokio::test]
async fn given_correct_password_when_authorized_then_handshake_succeeds() {
    let server = StubServer::start(vec![
        reply("<nonce>1754402980.8434</nonce>"),
        reply("<authorized/>"),
    ])
    .await;
    let client = RpcClient::connect(server.address()).await.unwrap();

    client
        .authorize(&RedactedPassword::from("secret"))
        .await
        .unwrap();

    let requests = server.requests().await;
    assert!(requests[0].contains("<auth1/>"));
    let expected = format!("{:x}", md5::compute("1754402980.8434secret"));
    assert!(requests[1].contains(&format!("<nonce_hash>{expected}</nonce_hash>")));
}

#[tokio::test]
async fn given_rejected_hash_then_authorize_reports_unauthorized() {
    let server = StubServer::start(vec![
        reply("<nonce>42</nonce>"),
        reply("<unauthorized/>"),
    ])
    .await;
    let client = RpcClient::connect(server.address()).await.unwrap();

    let result = client.authorize(&RedactedPassword::from("wrong")).await;

    assert!(matches!(result, Err(AuthError::Unauthorized { .. })));
}

#[tokio::test]
async fn given_reply_without_nonce_then_authorize_reports_handshake_failure() {
    let server = StubServer::start(vec![reply("<shrug/>")]).await;
    let client = RpcClient::connect(server.address()).await.unwrap();

    let result = client.authorize(&RedactedPassword::from("pw")).await;

    assert!(matches!(result, Err(AuthError::Handshake { .. })));
}

#[tokio::test]
async fn given_verdictless_auth2_reply_then_authorize_reports_handshake_failure() {
    let server = StubServer::start(vec![reply("<nonce>42</nonce>"), reply("<shrug/>")]).await;
    let client = RpcClient::connect(server.address()).await.unwrap();

    let result = client.authorize(&RedactedPassword::from("pw")).await;

    assert!(matches!(result, Err(AuthError::Handshake { .. })));
}

#[tokio::test]
async fn given_peer_that_dies_mid_handshake_then_error_is_transport() {
    let server = StubServer::start(vec![reply("<nonce>42</nonce>"), String::new()]).await;
    let client = RpcClient::connect(server.address()).await.unwrap();

    let result = client.authorize(&RedactedPassword::from("pw")).await;

    assert!(matches!(result, Err(AuthError::Transport(_))));
}
