//! Getter and mutation verbs end to end through the stub.

use crate::helpers::{StubServer, reply, success};

use rpc_core::models::modes::RunMode;
use rpc_core::rpc_client::{ProjectOp, RpcClient, TaskOp};

#[tokio::test]
async fn given_cc_status_reply_then_getter_decodes_it() {
    let server = StubServer::start(vec![reply(
        "<cc_status>\n<task_mode>2</task_mode>\n<task_suspend_reason>0</task_suspend_reason>\n<network_mode>2</network_mode>\n</cc_status>",
    )])
    .await;
    let client = RpcClient::connect(server.address()).await.unwrap();

    let status = client.get_cc_status().await.unwrap();

    assert_eq!(status.task_mode, 2);
    assert_eq!(status.network_mode, 2);
}

#[tokio::test]
async fn given_project_list_reply_then_getter_returns_all_projects() {
    let server = StubServer::start(vec![reply(
        "<projects>\n<project>\n<master_url>https://a.example/</master_url>\n<project_name>A</project_name>\n</project>\n<project>\n<master_url>https://b.example/</master_url>\n</project>\n</projects>",
    )])
    .await;
    let client = RpcClient::connect(server.address()).await.unwrap();

    let projects = client.get_project_status().await.unwrap();

    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].name(), "A");
    // no project_name: display name falls back to the URL
    assert_eq!(projects[1].name(), "https://b.example/");
}

#[tokio::test]
async fn given_successful_mutation_then_true_and_request_carries_the_url() {
    let server = StubServer::start(vec![success()]).await;
    let client = RpcClient::connect(server.address()).await.unwrap();

    let accepted = client
        .project_op(ProjectOp::Suspend, "https://a.example/")
        .await;

    assert!(accepted);
    let requests = server.requests().await;
    assert!(requests[0].contains("<project_suspend>"));
    assert!(requests[0].contains("<project_url>https://a.example/</project_url>"));
}

#[tokio::test]
async fn given_error_reply_then_mutation_returns_false() {
    let server = StubServer::start(vec![reply("<error>unrecognized op</error>")]).await;
    let client = RpcClient::connect(server.address()).await.unwrap();

    assert!(!client.task_op(TaskOp::Abort, "https://a.example/", "wu_1").await);
}

#[tokio::test]
async fn given_unauthorized_reply_then_mutation_returns_false() {
    let server = StubServer::start(vec![reply("<unauthorized/>")]).await;
    let client = RpcClient::connect(server.address()).await.unwrap();

    assert!(!client.set_run_mode(RunMode::Never, 0.0).await);
}

#[tokio::test]
async fn given_run_mode_request_then_body_uses_the_mode_token() {
    let server = StubServer::start(vec![success()]).await;
    let client = RpcClient::connect(server.address()).await.unwrap();

    client.set_run_mode(RunMode::Auto, 3600.0).await;

    let requests = server.requests().await;
    assert!(requests[0].contains("<set_run_mode>"));
    assert!(requests[0].contains("<auto/>"));
    assert!(requests[0].contains("<duration>3600</duration>"));
}

/// **VALUE**: Verifies a snapshot is assembled from the five getters in a
/// fixed order and carries every piece.
///
/// **WHY THIS MATTERS**: The reconciler consumes snapshots whole; a piece
/// wired to the wrong verb would corrupt every derived status downstream.
///
/// **BUG THIS CATCHES**: Reordered or dropped verbs in the snapshot
/// assembly.
#[tokio::test]
async fn given_five_replies_then_snapshot_is_assembled_in_verb_order() {
    let server = StubServer::start(vec![
        reply("<cc_status><task_mode>3</task_mode><network_mode>2</network_mode></cc_status>"),
        reply("<client_state>\n<host_info><domain_name>box</domain_name></host_info>\n<project><master_url>https://a.example/</master_url></project>\n<result><name>wu_1</name></result>\n</client_state>"),
        reply("<file_transfers></file_transfers>"),
        reply("<acct_mgr_info><acct_mgr_url>https://am.example/</acct_mgr_url></acct_mgr_info>"),
        reply("<notices><notice><seqno>3</seqno></notice></notices>"),
    ])
    .await;
    let client = RpcClient::connect(server.address()).await.unwrap();

    let snapshot = client.fetch_snapshot(0).await.unwrap();

    assert_eq!(snapshot.cc_status.task_mode, 3);
    assert_eq!(snapshot.host_info.domain_name, "box");
    assert_eq!(snapshot.projects.len(), 1);
    assert_eq!(snapshot.results.len(), 1);
    assert!(snapshot.transfers.is_empty());
    assert!(snapshot.acct_mgr_info.is_attached());
    assert_eq!(snapshot.notices[0].seqno, 3);

    let verbs: Vec<String> = server.requests().await;
    assert!(verbs[0].contains("<get_cc_status/>"));
    assert!(verbs[1].contains("<get_state/>"));
    assert!(verbs[2].contains("<get_file_transfers/>"));
    assert!(verbs[3].contains("<acct_mgr_info/>"));
    assert!(verbs[4].contains("<get_notices>"));
}

#[tokio::test]
async fn given_dead_peer_mid_snapshot_then_whole_snapshot_is_none() {
    let server = StubServer::start(vec![
        reply("<cc_status><task_mode>2</task_mode></cc_status>"),
        String::new(), // dies on get_state
    ])
    .await;
    let client = RpcClient::connect(server.address()).await.unwrap();

    assert!(client.fetch_snapshot(0).await.is_none());
}

#[tokio::test]
async fn given_message_count_reply_then_seqno_is_extracted() {
    let server = StubServer::start(vec![reply("<seqno>417</seqno>")]).await;
    let client = RpcClient::connect(server.address()).await.unwrap();

    assert_eq!(client.get_message_count().await, Some(417));
}

#[tokio::test]
async fn given_notices_request_then_body_carries_the_watermark() {
    let server = StubServer::start(vec![reply("<notices></notices>")]).await;
    let client = RpcClient::connect(server.address()).await.unwrap();

    let notices = client.get_notices(17).await.unwrap();

    assert!(notices.is_empty());
    assert!(server.requests().await[0].contains("<seqno>17</seqno>"));
}

#[tokio::test]
async fn given_exchange_versions_reply_then_server_version_is_decoded() {
    let server = StubServer::start(vec![reply(
        "<server_version><major>7</major><minor>24</minor><release>1</release></server_version>",
    )])
    .await;
    let client = RpcClient::connect(server.address()).await.unwrap();

    let version = client.exchange_versions().await.unwrap();

    assert_eq!((version.major, version.minor, version.release), (7, 24, 1));
}
