//! Submit/poll operations end to end through the stub.
//!
//! These run against the production one-second poll interval, so each
//! in-progress reply in a script costs a real second of test time. Scripts
//! are kept to one or two polls for that reason.

use crate::helpers::{StubServer, reply, success};

use rpc_core::config::ClientConfig;
use rpc_core::error::op::OpError;
use rpc_core::models::AccountIn;
use rpc_core::ops::CancelToken;
use rpc_core::rpc_client::RpcClient;

use common::RedactedPassword;

use std::time::{Duration, Instant};

/// **VALUE**: Verifies a whole attach: submit, one in-progress poll, one
/// terminal poll, reply handed back to the caller.
///
/// **WHY THIS MATTERS**: This is the protocol every long-running verb
/// follows; if the chain breaks anywhere, attaching a project silently
/// never completes.
///
/// **BUG THIS CATCHES**: The driver forgetting to resubmit polls, or
/// swallowing the terminal reply.
#[tokio::test]
async fn given_attach_in_progress_then_driver_polls_to_the_terminal_reply() {
    let server = StubServer::start(vec![
        success(),
        reply("<project_attach_reply>\n<error_num>-204</error_num>\n</project_attach_reply>"),
        reply("<project_attach_reply>\n<error_num>0</error_num>\n</project_attach_reply>"),
    ])
    .await;
    let client = RpcClient::connect(server.address()).await.unwrap();

    let result = client
        .attach_project(
            "https://a.example/",
            "auth_key",
            "Project A",
            &CancelToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(result.error_num, 0);
    let requests = server.requests().await;
    assert_eq!(requests.len(), 3);
    assert!(requests[0].contains("<project_attach>"));
    assert!(requests[0].contains("<authenticator>auth_key</authenticator>"));
    assert!(requests[1].contains("<project_attach_poll/>"));
    assert!(requests[2].contains("<project_attach_poll/>"));
}

/// **VALUE**: Verifies `op_poll_interval_ms` from the connection config is
/// what actually paces the poll loop.
///
/// **WHY THIS MATTERS**: The knob is validated and persisted; if the
/// operations keep polling at the built-in second regardless, the setting
/// is a lie.
///
/// **BUG THIS CATCHES**: Concrete operations hardcoding the default
/// interval instead of reading the configured one.
#[tokio::test]
async fn given_configured_poll_interval_then_operations_poll_at_that_pace() {
    let server = StubServer::start(vec![
        success(),
        reply("<project_attach_reply>\n<error_num>-204</error_num>\n</project_attach_reply>"),
        reply("<project_attach_reply>\n<error_num>0</error_num>\n</project_attach_reply>"),
    ])
    .await;
    let (host, port) = server.address().rsplit_once(':').unwrap();
    let config = ClientConfig {
        host: host.to_string(),
        port: port.parse().unwrap(),
        op_poll_interval_ms: 150,
        ..ClientConfig::default()
    };
    let client = RpcClient::connect_with(&config).await.unwrap();
    assert_eq!(client.poll_interval(), Duration::from_millis(150));

    let started = Instant::now();
    let result = client
        .attach_project("https://a.example/", "k", "A", &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(result.error_num, 0);
    // two polls at 150 ms each; the built-in second per poll would need two
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn given_terminal_project_error_then_reply_is_returned_not_an_error() {
    let server = StubServer::start(vec![
        success(),
        reply(
            "<project_attach_reply>\n<error_num>-161</error_num>\n<message>no such project</message>\n</project_attach_reply>",
        ),
    ])
    .await;
    let client = RpcClient::connect(server.address()).await.unwrap();

    let result = client
        .attach_project("https://a.example/", "k", "A", &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(result.error_num, -161);
    assert_eq!(result.messages, vec!["no such project"]);
}

#[tokio::test]
async fn given_invalid_master_url_then_attach_fails_before_any_request() {
    let server = StubServer::start(vec![]).await;
    let client = RpcClient::connect(server.address()).await.unwrap();

    let result = client
        .attach_project("not a url", "k", "A", &CancelToken::new())
        .await;

    assert!(matches!(result, Err(OpError::InvalidUrl { .. })));
    assert!(server.requests().await.is_empty());
}

#[tokio::test]
async fn given_rejected_submit_then_operation_fails_without_polling() {
    let server = StubServer::start(vec![reply("<error>busy</error>")]).await;
    let client = RpcClient::connect(server.address()).await.unwrap();

    let account = AccountIn::new(
        "https://a.example/",
        "user@example.org",
        RedactedPassword::from("pw"),
    );
    let result = client.lookup_account_op(&account, &CancelToken::new()).await;

    assert!(matches!(result, Err(OpError::Rejected { .. })));
    assert_eq!(server.requests().await.len(), 1);
}

#[tokio::test]
async fn given_lookup_submit_then_request_carries_hash_never_the_password() {
    let server = StubServer::start(vec![
        success(),
        reply("<account_out>\n<authenticator>k_123</authenticator>\n</account_out>"),
    ])
    .await;
    let client = RpcClient::connect(server.address()).await.unwrap();

    let account = AccountIn::new(
        "https://a.example/",
        "User@Example.org",
        RedactedPassword::from("pw"),
    );
    let out = client
        .lookup_account_op(&account, &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(out.authenticator, "k_123");
    let submit = &server.requests().await[0];
    // MD5(password + lowercase email)
    let expected = format!("{:x}", md5::compute("pwuser@example.org"));
    assert!(submit.contains(&format!("<passwd_hash>{expected}</passwd_hash>")));
    assert!(!submit.contains("pw</"));
}

/// **VALUE**: Verifies the account-manager chain stops at a failed config
/// fetch; the `acct_mgr_rpc` leg is never submitted.
///
/// **WHY THIS MATTERS**: Submitting the RPC against a manager whose config
/// could not be fetched leaves the client half-attached to a URL nobody
/// validated.
///
/// **BUG THIS CATCHES**: Running the second leg unconditionally.
#[tokio::test]
async fn given_failed_config_fetch_then_acct_mgr_rpc_is_never_submitted() {
    let server = StubServer::start(vec![
        success(),
        reply("<project_config>\n<error_num>-224</error_num>\n</project_config>"),
    ])
    .await;
    let client = RpcClient::connect(server.address()).await.unwrap();

    let result = client
        .synchronize_acct_mgr(
            "https://am.example/",
            "user",
            &RedactedPassword::from("pw"),
            &CancelToken::new(),
        )
        .await;

    assert!(matches!(
        result,
        Err(OpError::Failed {
            error_num: -224,
            ..
        })
    ));
    for request in server.requests().await {
        assert!(!request.contains("<acct_mgr_rpc>"));
    }
}

#[tokio::test]
async fn given_clean_config_fetch_then_acct_mgr_rpc_runs_to_completion() {
    let server = StubServer::start(vec![
        success(), // get_project_config
        reply("<project_config>\n<error_num>0</error_num>\n<name>Manager</name>\n</project_config>"),
        success(), // acct_mgr_rpc
        reply("<acct_mgr_rpc_reply>\n<error_num>0</error_num>\n</acct_mgr_rpc_reply>"),
    ])
    .await;
    let client = RpcClient::connect(server.address()).await.unwrap();

    let result = client
        .synchronize_acct_mgr(
            "https://am.example/",
            "user",
            &RedactedPassword::from("pw"),
            &CancelToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(result.error_num, 0);
    let requests = server.requests().await;
    assert!(requests.iter().any(|r| r.contains("<get_project_config>")));
    assert!(requests.iter().any(|r| r.contains("<acct_mgr_rpc>")));
}
