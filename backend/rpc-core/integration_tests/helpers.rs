//! Scripted stub of the compute client's GUI-RPC listener.
//!
//! The stub accepts one connection and walks a fixed script: for each
//! incoming request (read up to the ETX terminator) it records the request
//! text and sends the next scripted reply, ETX-terminated. An empty script
//! entry makes the stub drop the connection without answering, which is how
//! the real client behaves towards unauthorized callers.

use rpc_core::transport::EOM;

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

pub struct StubServer {
    address: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    /// Bind on an ephemeral port and serve `replies` to the first
    /// connection, one per request.
    pub async fn start(replies: Vec<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            for scripted in replies {
                let Some(request) = read_request(&mut socket).await else {
                    return;
                };
                log.lock().await.push(request);
                if scripted.is_empty() {
                    // hang up without answering
                    return;
                }
                socket.write_all(scripted.as_bytes()).await.unwrap();
                socket.write_all(&[EOM]).await.unwrap();
            }
        });

        Self { address, requests }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Requests seen so far, terminators stripped.
    pub async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }
}

async fn read_request(socket: &mut TcpStream) -> Option<String> {
    let mut raw = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        raw.extend_from_slice(&chunk[..n]);
        if raw.last() == Some(&EOM) {
            raw.pop();
            break;
        }
    }
    Some(String::from_utf8_lossy(&raw).into_owned())
}

/// Wrap a reply body in the wire's reply envelope.
pub fn reply(body: &str) -> String {
    format!("<boinc_gui_rpc_reply>\n{body}\n</boinc_gui_rpc_reply>\n")
}

pub fn success() -> String {
    reply("<success/>")
}
