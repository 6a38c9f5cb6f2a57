//! GUI-RPC socket transport and framing.
//!
//! One socket per [`Transport`], one request outstanding at a time. Framing
//! is purely terminator-based: every request and every reply ends with a
//! single ETX byte (0x03); there is no length prefix, so replies are buffered
//! incrementally with no size assumption. The peer is a separate and
//! sometimes slow process, so connect and read timeouts are mandatory and a
//! timeout surfaces as a connection failure, not a protocol error.
//!
//! Reconnection is caller-driven: when [`Transport::is_alive`] reports false
//! the caller closes, reopens and re-authenticates. Nothing here retries on
//! its own.

pub mod auth;

use crate::error::transport::TransportError;

use common::ErrorLocation;

use std::panic::Location;
use std::time::Duration;

use log::{debug, trace, warn};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

pub(crate) const REQUEST_OPEN: &str = "<boinc_gui_rpc_request>\n";
pub(crate) const REQUEST_CLOSE: &str = "</boinc_gui_rpc_request>\n";

/// End-of-message terminator shared by requests and replies.
pub const EOM: u8 = 0x03;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(15);

const READ_CHUNK: usize = 2048;

/// Owns the one socket to the compute client.
pub struct Transport {
    stream: Option<TcpStream>,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl Transport {
    pub fn new() -> Self {
        Self::with_timeouts(DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT)
    }

    pub fn with_timeouts(connect_timeout: Duration, read_timeout: Duration) -> Self {
        Self {
            stream: None,
            connect_timeout,
            read_timeout,
        }
    }

    /// Open the socket to `address` (`host:port`).
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Timeout`] when the peer does not accept
    /// within the connect timeout, [`TransportError::Connect`] on refusal.
    pub async fn open(&mut self, address: &str) -> Result<(), TransportError> {
        debug!("Connecting to GUI-RPC endpoint {address}");
        let stream = timeout(self.connect_timeout, TcpStream::connect(address))
            .await
            .map_err(|_| TransportError::Timeout {
                message: format!("connect to {address}"),
                location: ErrorLocation::from(Location::caller()),
            })?
            .map_err(|e| TransportError::Connect {
                message: format!("{address}: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })?;
        stream.set_nodelay(true)?;
        self.stream = Some(stream);
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            debug!("GUI-RPC connection closed");
        }
    }

    /// Send one request body, wrapped and terminated per the wire protocol.
    pub async fn send_request(&mut self, body: &str) -> Result<(), TransportError> {
        let stream = self.stream.as_mut().ok_or_else(|| TransportError::Closed {
            message: "send on closed connection".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        trace!("request: {body}");
        let mut message =
            Vec::with_capacity(REQUEST_OPEN.len() + body.len() + REQUEST_CLOSE.len() + 1);
        message.extend_from_slice(REQUEST_OPEN.as_bytes());
        message.extend_from_slice(body.as_bytes());
        message.extend_from_slice(REQUEST_CLOSE.as_bytes());
        message.push(EOM);

        stream.write_all(&message).await?;
        stream.flush().await?;
        Ok(())
    }

    /// Read one reply: accumulate until end-of-stream or a trailing ETX,
    /// strip the terminator, decode lossily (the peer occasionally emits
    /// non-UTF-8 text and one bad byte must not kill the cycle).
    ///
    /// An empty string means the peer closed without answering; callers
    /// treat that as a dead connection, not as data.
    ///
    /// Any read failure discards the socket: the reply may still be in
    /// flight, and without request IDs a reused socket would hand that
    /// stale reply to the next exchange as its own. Subsequent sends fail
    /// with [`TransportError::Closed`] until the caller reconnects.
    pub async fn receive_reply(&mut self) -> Result<String, TransportError> {
        let read_timeout = self.read_timeout;
        let stream = self.stream.as_mut().ok_or_else(|| TransportError::Closed {
            message: "receive on closed connection".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        match read_until_eom(stream, read_timeout).await {
            Ok(raw) => {
                let reply = String::from_utf8_lossy(&raw).into_owned();
                trace!("reply: {} bytes", reply.len());
                Ok(reply)
            }
            Err(e) => {
                warn!("Reply read failed, discarding connection: {e}");
                self.stream = None;
                Err(e)
            }
        }
    }

    /// Liveness probe: a real `<get_cc_status/>` round trip. An empty reply
    /// or any I/O failure means the peer has gone away. This costs a full
    /// request - callers should not probe more often than needed.
    pub async fn is_alive(&mut self) -> bool {
        if self.stream.is_none() {
            return false;
        }
        if let Err(e) = self.send_request("<get_cc_status/>").await {
            warn!("Liveness probe send failed: {e}");
            return false;
        }
        match self.receive_reply().await {
            Ok(reply) => !reply.is_empty(),
            Err(e) => {
                warn!("Liveness probe read failed: {e}");
                false
            }
        }
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}

async fn read_until_eom(
    stream: &mut TcpStream,
    read_timeout: Duration,
) -> Result<Vec<u8>, TransportError> {
    let mut raw: Vec<u8> = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        let n = timeout(read_timeout, stream.read(&mut chunk))
            .await
            .map_err(|_| TransportError::Timeout {
                message: "reply read".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })??;
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&chunk[..n]);
        if raw.last() == Some(&EOM) {
            raw.pop();
            break;
        }
    }
    Ok(raw)
}
