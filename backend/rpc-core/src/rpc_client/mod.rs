//! High-level GUI-RPC client: one method per wire verb.
//!
//! The protocol has no request IDs, so interleaved replies cannot be
//! demultiplexed: every send+receive pair runs inside one mutex-guarded
//! critical section on the single connection.
//!
//! Error surface follows the protocol's own split: connect and authorize
//! return typed errors; data getters return `Option` where `None` means
//! "no data" (transport failure or undecodable reply) and must never be
//! treated as an empty result; mutation verbs return plain success.

use crate::codec::{self, decode, decode_all};
use crate::config::ClientConfig;
use crate::device::DeviceStatus;
use crate::error::auth::AuthError;
use crate::error::transport::TransportError;
use crate::models::modes::RunMode;
use crate::models::{
    AccountIn, AccountOut, AcctMgrInfo, AcctMgrRpcReply, CcStatus, ClientState, FileTransfer,
    HostInfo, Message, Notice, Project, ProjectAttachReply, ProjectConfig, RawSnapshot,
    SimpleReply, VersionInfo,
};
use crate::transport::auth::{auth2_body, nonce_hash};
use crate::transport::Transport;

use crate::ops::DEFAULT_POLL_INTERVAL;

use common::{ErrorLocation, RedactedPassword};

use std::panic::Location;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::Mutex;

pub mod verbs;

pub use verbs::{ProjectOp, TaskOp, TransferOp};

/// Client half of one GUI-RPC connection.
pub struct RpcClient {
    conn: Mutex<Transport>,
    poll_interval: Duration,
}

impl RpcClient {
    /// Connect to `address` (`host:port`) with default timeouts.
    pub async fn connect(address: &str) -> Result<Self, TransportError> {
        let mut transport = Transport::new();
        transport.open(address).await?;
        Ok(Self {
            conn: Mutex::new(transport),
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Connect using the timeouts and poll interval from `config`.
    pub async fn connect_with(config: &ClientConfig) -> Result<Self, TransportError> {
        let mut transport =
            Transport::with_timeouts(config.connect_timeout(), config.read_timeout());
        transport.open(&config.address()).await?;
        Ok(Self {
            conn: Mutex::new(transport),
            poll_interval: config.op_poll_interval(),
        })
    }

    /// Wrap an already-opened transport. Used by tests with shortened
    /// timeouts.
    pub fn from_transport(transport: Transport) -> Self {
        Self {
            conn: Mutex::new(transport),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Fixed interval between polls of a submitted operation; see
    /// [`crate::ops`].
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub async fn close(&self) {
        self.conn.lock().await.close();
    }

    /// Real round-trip liveness probe; see [`Transport::is_alive`].
    pub async fn is_alive(&self) -> bool {
        self.conn.lock().await.is_alive().await
    }

    /// One request/reply round trip under the connection mutex.
    ///
    /// An empty reply is a dead peer, reported as
    /// [`TransportError::Closed`].
    async fn exchange(&self, body: &str) -> Result<String, TransportError> {
        let mut conn = self.conn.lock().await;
        conn.send_request(body).await?;
        let reply = conn.receive_reply().await?;
        if reply.is_empty() {
            conn.close();
            return Err(TransportError::Closed {
                message: "peer closed the connection without replying".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(reply)
    }

    /// Exchange for data getters: transport failures become `None` plus a
    /// log line, matching the "null means no data" contract.
    async fn try_exchange(&self, body: &str) -> Option<String> {
        match self.exchange(body).await {
            Ok(reply) => Some(reply),
            Err(e) => {
                warn!("RPC exchange failed: {e}");
                None
            }
        }
    }

    /// Exchange for mutation verbs: true only on an explicit `<success/>`.
    async fn simple_call(&self, body: &str) -> bool {
        match self.try_exchange(body).await {
            Some(reply) => match decode::<SimpleReply>(&reply) {
                Some(ack) if ack.success => true,
                Some(ack) => {
                    if ack.unauthorized {
                        warn!("Mutation verb rejected: unauthorized");
                    } else if !ack.error_msg.is_empty() {
                        warn!("Mutation verb failed: {}", ack.error_msg);
                    }
                    false
                }
                None => false,
            },
            None => false,
        }
    }

    // ---- authentication ----------------------------------------------- //

    /// Two-phase nonce/hash handshake. Must complete before any privileged
    /// verb; a failure here is a distinct condition, never "no data yet".
    ///
    /// # Errors
    ///
    /// - [`AuthError::Unauthorized`] - the client rejected the hash; do not
    ///   retry with the same credentials.
    /// - [`AuthError::Handshake`] - the reply carried no nonce or no verdict.
    /// - [`AuthError::Transport`] - the connection died mid-handshake.
    pub async fn authorize(&self, password: &RedactedPassword) -> Result<(), AuthError> {
        let reply = self.exchange("<auth1/>").await?;
        let nonce = codec::text_of(&reply, "nonce").ok_or_else(|| AuthError::Handshake {
            message: "auth1 reply carried no nonce".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let hash = nonce_hash(nonce, password);
        let reply = self.exchange(&auth2_body(&hash)).await?;

        if codec::has_tag(&reply, "authorized") {
            info!("GUI-RPC authorization succeeded");
            Ok(())
        } else if codec::has_tag(&reply, "unauthorized") {
            Err(AuthError::Unauthorized {
                location: ErrorLocation::from(Location::caller()),
            })
        } else {
            Err(AuthError::Handshake {
                message: "auth2 reply carried no verdict".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
        }
    }

    // ---- state and liveness verbs ------------------------------------- //

    pub async fn exchange_versions(&self) -> Option<VersionInfo> {
        let reply = self.try_exchange("<exchange_versions/>").await?;
        decode::<VersionInfo>(&reply)
    }

    pub async fn get_cc_status(&self) -> Option<CcStatus> {
        let reply = self.try_exchange("<get_cc_status/>").await?;
        decode::<CcStatus>(&reply)
    }

    pub async fn get_state(&self) -> Option<ClientState> {
        let reply = self.try_exchange("<get_state/>").await?;
        decode::<ClientState>(&reply)
    }

    pub async fn get_project_status(&self) -> Option<Vec<Project>> {
        let reply = self.try_exchange("<get_project_status/>").await?;
        decode_all::<Project>(&reply)
    }

    pub async fn get_file_transfers(&self) -> Option<Vec<FileTransfer>> {
        let reply = self.try_exchange("<get_file_transfers/>").await?;
        decode_all::<FileTransfer>(&reply)
    }

    pub async fn get_host_info(&self) -> Option<HostInfo> {
        let reply = self.try_exchange("<get_host_info/>").await?;
        decode::<HostInfo>(&reply)
    }

    pub async fn get_acct_mgr_info(&self) -> Option<AcctMgrInfo> {
        let reply = self.try_exchange("<acct_mgr_info/>").await?;
        decode::<AcctMgrInfo>(&reply)
    }

    pub async fn get_message_count(&self) -> Option<i32> {
        let reply = self.try_exchange("<get_message_count/>").await?;
        codec::text_of(&reply, "seqno").and_then(|t| t.trim().parse().ok())
    }

    /// Event-log messages with `seqno` greater than the given value.
    pub async fn get_messages(&self, seqno: i32) -> Option<Vec<Message>> {
        let body = format!("<get_messages>\n<seqno>{seqno}</seqno>\n</get_messages>\n");
        let reply = self.try_exchange(&body).await?;
        decode_all::<Message>(&reply)
    }

    /// Notices with `seqno` greater than the given value. The reconciler's
    /// watermark is the usual argument.
    pub async fn get_notices(&self, seqno: i32) -> Option<Vec<Notice>> {
        let body = format!("<get_notices>\n<seqno>{seqno}</seqno>\n</get_notices>\n");
        let reply = self.try_exchange(&body).await?;
        decode_all::<Notice>(&reply)
    }

    /// One complete raw poll, assembled from five verbs. Any missing piece
    /// makes the whole snapshot `None`; the caller skips the cycle rather
    /// than reconciling against partial data.
    pub async fn fetch_snapshot(&self, notice_seqno: i32) -> Option<RawSnapshot> {
        let cc_status = self.get_cc_status().await?;
        let state = self.get_state().await?;
        let transfers = self.get_file_transfers().await?;
        let acct_mgr_info = self.get_acct_mgr_info().await?;
        let notices = self.get_notices(notice_seqno).await?;
        Some(RawSnapshot {
            cc_status,
            projects: state.projects,
            results: state.results,
            transfers,
            host_info: state.host_info,
            acct_mgr_info,
            notices,
        })
    }

    // ---- mutation verbs ----------------------------------------------- //

    pub async fn project_op(&self, op: ProjectOp, master_url: &str) -> bool {
        let verb = op.verb();
        let body = format!(
            "<{verb}>\n<project_url>{}</project_url>\n</{verb}>\n",
            codec::escape(master_url)
        );
        debug!("{verb} {master_url}");
        self.simple_call(&body).await
    }

    pub async fn task_op(&self, op: TaskOp, master_url: &str, name: &str) -> bool {
        let verb = op.verb();
        let body = format!(
            "<{verb}>\n<project_url>{}</project_url>\n<name>{}</name>\n</{verb}>\n",
            codec::escape(master_url),
            codec::escape(name)
        );
        debug!("{verb} {name}");
        self.simple_call(&body).await
    }

    pub async fn transfer_op(&self, op: TransferOp, master_url: &str, name: &str) -> bool {
        let verb = op.verb();
        let body = format!(
            "<{verb}>\n<project_url>{}</project_url>\n<filename>{}</filename>\n</{verb}>\n",
            codec::escape(master_url),
            codec::escape(name)
        );
        debug!("{verb} {name}");
        self.simple_call(&body).await
    }

    pub async fn set_run_mode(&self, mode: RunMode, duration: f64) -> bool {
        let body = format!(
            "<set_run_mode>\n<{}/>\n<duration>{duration}</duration>\n</set_run_mode>\n",
            mode.token()
        );
        self.simple_call(&body).await
    }

    pub async fn set_network_mode(&self, mode: RunMode, duration: f64) -> bool {
        let body = format!(
            "<set_network_mode>\n<{}/>\n<duration>{duration}</duration>\n</set_network_mode>\n",
            mode.token()
        );
        self.simple_call(&body).await
    }

    /// Install a global-preferences override. `prefs_xml` is the inner
    /// `<global_preferences>` document.
    pub async fn set_global_prefs_override(&self, prefs_xml: &str) -> bool {
        let body = format!(
            "<set_global_prefs_override>\n{prefs_xml}\n</set_global_prefs_override>\n"
        );
        self.simple_call(&body).await
    }

    /// Make the client re-read the override file just written.
    pub async fn read_global_prefs_override(&self) -> bool {
        self.simple_call("<read_global_prefs_override/>").await
    }

    pub async fn set_cc_config(&self, config_xml: &str) -> bool {
        let body = format!("<set_cc_config>\n{config_xml}\n</set_cc_config>\n");
        self.simple_call(&body).await
    }

    pub async fn read_cc_config(&self) -> bool {
        self.simple_call("<read_cc_config/>").await
    }

    /// Report battery/network/user-activity readings supplied by the device
    /// sensor collaborator. A `false` return tells the external scheduler to
    /// drop its screen-off omission and retry promptly.
    pub async fn report_device_status(&self, status: &DeviceStatus) -> bool {
        self.simple_call(&status.request_body()).await
    }

    /// Ask the compute client to shut down. The connection is gone after
    /// this regardless of the reply.
    pub async fn quit(&self) -> bool {
        let accepted = self.simple_call("<quit/>").await;
        self.close().await;
        accepted
    }

    // ---- async operation verb pairs (driven by `ops`) ------------------ //

    pub async fn project_attach(&self, master_url: &str, authenticator: &str, name: &str) -> bool {
        let body = format!(
            "<project_attach>\n<project_url>{}</project_url>\n<authenticator>{}</authenticator>\n<project_name>{}</project_name>\n</project_attach>\n",
            codec::escape(master_url),
            codec::escape(authenticator),
            codec::escape(name)
        );
        self.simple_call(&body).await
    }

    pub async fn project_attach_poll(&self) -> Option<ProjectAttachReply> {
        let reply = self.try_exchange("<project_attach_poll/>").await?;
        decode::<ProjectAttachReply>(&reply)
    }

    pub async fn lookup_account(&self, account: &AccountIn) -> bool {
        self.simple_call(&account.lookup_body()).await
    }

    pub async fn lookup_account_poll(&self) -> Option<AccountOut> {
        let reply = self.try_exchange("<lookup_account_poll/>").await?;
        decode::<AccountOut>(&reply)
    }

    pub async fn create_account(&self, account: &AccountIn) -> bool {
        self.simple_call(&account.create_body()).await
    }

    pub async fn create_account_poll(&self) -> Option<AccountOut> {
        let reply = self.try_exchange("<create_account_poll/>").await?;
        decode::<AccountOut>(&reply)
    }

    pub async fn get_project_config(&self, master_url: &str) -> bool {
        let body = format!(
            "<get_project_config>\n<url>{}</url>\n</get_project_config>\n",
            codec::escape(master_url)
        );
        self.simple_call(&body).await
    }

    pub async fn get_project_config_poll(&self) -> Option<ProjectConfig> {
        let reply = self.try_exchange("<get_project_config_poll/>").await?;
        decode::<ProjectConfig>(&reply)
    }

    /// Submit an account-manager attach (or detach, with empty url) /
    /// synchronize request.
    pub async fn acct_mgr_rpc(&self, url: &str, name: &str, password: &RedactedPassword) -> bool {
        let body = format!(
            "<acct_mgr_rpc>\n<url>{}</url>\n<name>{}</name>\n<password>{}</password>\n</acct_mgr_rpc>\n",
            codec::escape(url),
            codec::escape(name),
            codec::escape(password.as_str())
        );
        self.simple_call(&body).await
    }

    pub async fn acct_mgr_rpc_poll(&self) -> Option<AcctMgrRpcReply> {
        let reply = self.try_exchange("<acct_mgr_rpc_poll/>").await?;
        decode::<AcctMgrRpcReply>(&reply)
    }
}
