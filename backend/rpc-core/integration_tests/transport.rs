//! Wire framing and liveness over a real socket.

use crate::helpers::{StubServer, reply};

use rpc_core::error::transport::TransportError;
use rpc_core::rpc_client::RpcClient;
use rpc_core::transport::{EOM, Transport};

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// **VALUE**: Verifies the exact request bytes on the wire: wrapper, body,
/// wrapper, ETX.
///
/// **WHY THIS MATTERS**: The peer's parser is unforgiving; a missing
/// newline after the wrapper or a lost terminator hangs the exchange
/// rather than erroring.
///
/// **BUG THIS CATCHES**: Any drift in the framing constants.
#[tokio::test]
async fn given_request_when_sent_then_wire_carries_wrapped_terminated_bytes() {
    let server = StubServer::start(vec![reply("<ack/>")]).await;
    let mut transport = Transport::new();
    transport.open(server.address()).await.unwrap();

    transport.send_request("<get_cc_status/>").await.unwrap();
    let answer = transport.receive_reply().await.unwrap();

    assert!(answer.contains("<ack/>"));
    assert!(!answer.ends_with('\u{3}')); // terminator stripped
    let requests = server.requests().await;
    assert_eq!(
        requests[0],
        "<boinc_gui_rpc_request>\n<get_cc_status/></boinc_gui_rpc_request>\n"
    );
}

/// Replies bigger than one read arrive in pieces; the reader must keep
/// accumulating until the terminator shows up.
#[tokio::test]
async fn given_reply_split_across_writes_then_receiver_reassembles_it() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut sink = [0u8; 1024];
        while socket.read(&mut sink).await.unwrap() > 0 {
            if sink[..].contains(&EOM) {
                break;
            }
        }
        for piece in ["<boinc_gui_rpc_reply><big>", "0123456789", "</big></boinc_gui_rpc_reply>"] {
            socket.write_all(piece.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        socket.write_all(&[EOM]).await.unwrap();
    });

    let mut transport = Transport::new();
    transport.open(&address).await.unwrap();
    transport.send_request("<get_state/>").await.unwrap();
    let answer = transport.receive_reply().await.unwrap();

    assert!(answer.contains("<big>0123456789</big>"));
}

#[tokio::test]
async fn given_peer_that_hangs_up_then_liveness_probe_reports_dead() {
    // empty script entry: the stub reads the probe and drops the connection
    let server = StubServer::start(vec![String::new()]).await;
    let client = RpcClient::connect(server.address()).await.unwrap();

    assert!(!client.is_alive().await);
}

#[tokio::test]
async fn given_answering_peer_then_liveness_probe_reports_alive() {
    let server = StubServer::start(vec![reply("<cc_status></cc_status>")]).await;
    let client = RpcClient::connect(server.address()).await.unwrap();

    assert!(client.is_alive().await);
}

#[tokio::test]
async fn given_silent_peer_then_reply_read_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();
    tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        // hold the socket open, never answer
        tokio::time::sleep(Duration::from_secs(30)).await;
        drop(socket);
    });

    let mut transport = Transport::with_timeouts(Duration::from_secs(5), Duration::from_millis(200));
    transport.open(&address).await.unwrap();
    transport.send_request("<get_cc_status/>").await.unwrap();
    let result = transport.receive_reply().await;

    assert!(matches!(result, Err(TransportError::Timeout { .. })));
}

/// **VALUE**: Verifies a timed-out read discards the socket, so a reply
/// that arrives late can never be read as the answer to a later request.
///
/// **WHY THIS MATTERS**: The protocol has no request IDs. If the socket
/// outlives a timed-out exchange, the next verb on the same connection
/// reads the stale reply as its own and every exchange after it is off by
/// one.
///
/// **BUG THIS CATCHES**: Keeping the stream open after a receive failure.
#[tokio::test]
async fn given_timed_out_read_then_late_reply_cannot_reach_the_next_exchange() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut sink = [0u8; 1024];
        let _ = socket.read(&mut sink).await;
        // answer well after the client's read timeout
        tokio::time::sleep(Duration::from_millis(400)).await;
        let _ = socket
            .write_all(b"<boinc_gui_rpc_reply><nonce>LATE</nonce></boinc_gui_rpc_reply>\x03")
            .await;
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let mut transport =
        Transport::with_timeouts(Duration::from_secs(5), Duration::from_millis(100));
    transport.open(&address).await.unwrap();
    transport.send_request("<auth1/>").await.unwrap();

    let first = transport.receive_reply().await;
    assert!(matches!(first, Err(TransportError::Timeout { .. })));

    // the connection is gone; a fresh request cannot pick up the stale reply
    assert!(!transport.is_open());
    let second = transport.send_request("<get_cc_status/>").await;
    assert!(matches!(second, Err(TransportError::Closed { .. })));
}

#[tokio::test]
async fn given_nobody_listening_then_connect_fails_with_connect_error() {
    // bind then drop to get a port that actively refuses
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();
    drop(listener);

    let mut transport = Transport::new();
    let result = transport.open(&address).await;

    assert!(matches!(result, Err(TransportError::Connect { .. })));
    assert!(!transport.is_open());
}

#[tokio::test]
async fn given_closed_transport_then_send_reports_closed() {
    let mut transport = Transport::new();

    let result = transport.send_request("<get_cc_status/>").await;

    assert!(matches!(result, Err(TransportError::Closed { .. })));
}
