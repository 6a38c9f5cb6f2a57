//! Poll-until-terminal operation protocol.
//!
//! Several client verbs are accepted immediately but executed
//! asynchronously: the caller submits the verb, then polls a companion
//! `..._poll` verb until a terminal reply arrives. The shape is uniform:
//!
//! - submit rejected → fail immediately, never poll
//! - poll returns nothing → hard failure, stop
//! - `error_num == -204` (in progress) → sleep a fixed interval, poll again
//! - any other `error_num`, zero included, is terminal and the reply goes
//!   back to the caller unexamined
//!
//! Backoff is deliberately fixed-interval, not exponential. A `CancelToken`
//! is threaded through the sleep so abandoning an operation takes effect
//! within one interval instead of running the loop to completion.

use crate::error::op::OpError;
use crate::models::modes::ERR_IN_PROGRESS;
use crate::models::{AccountIn, AccountOut, AcctMgrRpcReply, ProjectAttachReply, ProjectConfig};
use crate::rpc_client::RpcClient;

use common::{ErrorLocation, RedactedPassword};

use std::future::Future;
use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, trace, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Poll pacing for clients not built from a config;
/// `ClientConfig::op_poll_interval_ms` overrides it via `connect_with`.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// A reply that carries the protocol's `error_num` verdict.
pub trait PollReply {
    fn error_num(&self) -> i32;
}

impl PollReply for ProjectAttachReply {
    fn error_num(&self) -> i32 {
        self.error_num
    }
}

impl PollReply for AccountOut {
    fn error_num(&self) -> i32 {
        self.error_num
    }
}

impl PollReply for ProjectConfig {
    fn error_num(&self) -> i32 {
        self.error_num
    }
}

impl PollReply for AcctMgrRpcReply {
    fn error_num(&self) -> i32 {
        self.error_num
    }
}

/// Cooperative cancellation for a poll loop. Clones share one flag.
#[derive(Clone)]
pub struct CancelToken {
    state: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { state: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.state.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.state.borrow()
    }

    /// Resolves once `cancel` has been called.
    pub async fn cancelled(&self) {
        let mut rx = self.state.subscribe();
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Generic driver for one submit/poll verb pair.
///
/// # Errors
///
/// - [`OpError::Rejected`] - submit refused; no poll was issued.
/// - [`OpError::NoReply`] - a poll produced no decodable reply.
/// - [`OpError::Cancelled`] - the token fired between polls.
pub async fn poll_until_terminal<R, Sub, SubFut, Poll, PollFut>(
    verb: &'static str,
    interval: Duration,
    cancel: &CancelToken,
    submit: Sub,
    poll: Poll,
) -> Result<R, OpError>
where
    R: PollReply,
    Sub: FnOnce() -> SubFut,
    SubFut: Future<Output = bool>,
    Poll: Fn() -> PollFut,
    PollFut: Future<Output = Option<R>>,
{
    if !submit().await {
        warn!("{verb}: submit rejected");
        return Err(OpError::Rejected {
            verb,
            location: ErrorLocation::from(Location::caller()),
        });
    }
    debug!("{verb}: submitted, polling every {interval:?}");

    loop {
        tokio::select! {
            _ = sleep(interval) => {}
            _ = cancel.cancelled() => {}
        }
        if cancel.is_cancelled() {
            debug!("{verb}: cancelled");
            return Err(OpError::Cancelled {
                verb,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let Some(reply) = poll().await else {
            return Err(OpError::NoReply {
                verb,
                location: ErrorLocation::from(Location::caller()),
            });
        };
        match reply.error_num() {
            ERR_IN_PROGRESS => trace!("{verb}: still in progress"),
            n => {
                debug!("{verb}: terminal, error_num={n}");
                return Ok(reply);
            }
        }
    }
}

/// Handle to a spawned poll loop: a joinable future plus its cancel token.
pub struct PollingTask<R> {
    cancel: CancelToken,
    handle: JoinHandle<Result<R, OpError>>,
}

impl<R: Send + 'static> PollingTask<R> {
    /// Spawn `f` with a fresh token. The closure usually captures an
    /// `Arc<RpcClient>` and calls one of the concrete operations below.
    pub fn spawn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(CancelToken) -> Fut,
        Fut: Future<Output = Result<R, OpError>> + Send + 'static,
    {
        let cancel = CancelToken::new();
        let handle = tokio::spawn(f(cancel.clone()));
        Self { cancel, handle }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub async fn join(self) -> Result<R, OpError> {
        self.handle.await.unwrap_or_else(|e| {
            Err(OpError::Task {
                message: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
        })
    }
}

fn validate_master_url(master_url: &str) -> Result<(), OpError> {
    url::Url::parse(master_url)?;
    Ok(())
}

impl RpcClient {
    /// Attach to a project and poll to completion.
    pub async fn attach_project(
        &self,
        master_url: &str,
        authenticator: &str,
        project_name: &str,
        cancel: &CancelToken,
    ) -> Result<ProjectAttachReply, OpError> {
        validate_master_url(master_url)?;
        poll_until_terminal(
            "project_attach",
            self.poll_interval(),
            cancel,
            || self.project_attach(master_url, authenticator, project_name),
            || self.project_attach_poll(),
        )
        .await
    }

    /// Look up an existing account; the terminal reply carries either the
    /// authenticator or the project's error.
    pub async fn lookup_account_op(
        &self,
        account: &AccountIn,
        cancel: &CancelToken,
    ) -> Result<AccountOut, OpError> {
        validate_master_url(&account.url)?;
        poll_until_terminal(
            "lookup_account",
            self.poll_interval(),
            cancel,
            || self.lookup_account(account),
            || self.lookup_account_poll(),
        )
        .await
    }

    /// Create a new account on the project.
    pub async fn create_account_op(
        &self,
        account: &AccountIn,
        cancel: &CancelToken,
    ) -> Result<AccountOut, OpError> {
        validate_master_url(&account.url)?;
        poll_until_terminal(
            "create_account",
            self.poll_interval(),
            cancel,
            || self.create_account(account),
            || self.create_account_poll(),
        )
        .await
    }

    /// Fetch a project's configuration document.
    pub async fn fetch_project_config(
        &self,
        master_url: &str,
        cancel: &CancelToken,
    ) -> Result<ProjectConfig, OpError> {
        validate_master_url(master_url)?;
        poll_until_terminal(
            "get_project_config",
            self.poll_interval(),
            cancel,
            || self.get_project_config(master_url),
            || self.get_project_config_poll(),
        )
        .await
    }

    /// Account-manager RPC (attach, detach with empty url, or sync) polled
    /// to completion.
    pub async fn acct_mgr_rpc_op(
        &self,
        url: &str,
        name: &str,
        password: &RedactedPassword,
        cancel: &CancelToken,
    ) -> Result<AcctMgrRpcReply, OpError> {
        poll_until_terminal(
            "acct_mgr_rpc",
            self.poll_interval(),
            cancel,
            || self.acct_mgr_rpc(url, name, password),
            || self.acct_mgr_rpc_poll(),
        )
        .await
    }

    /// Account-manager attach/sync as the UI sees it: fetch the manager's
    /// config first, then run the RPC. A failure of the first leg - hard or
    /// a terminal nonzero `error_num` - is the overall failure and the
    /// second leg is never attempted.
    pub async fn synchronize_acct_mgr(
        &self,
        url: &str,
        name: &str,
        password: &RedactedPassword,
        cancel: &CancelToken,
    ) -> Result<AcctMgrRpcReply, OpError> {
        let config = self.fetch_project_config(url, cancel).await?;
        if config.error_num != 0 {
            warn!(
                "acct mgr sync: config fetch terminal with error_num={}",
                config.error_num
            );
            return Err(OpError::Failed {
                verb: "get_project_config",
                error_num: config.error_num,
                location: ErrorLocation::from(Location::caller()),
            });
        }
        self.acct_mgr_rpc_op(url, name, password, cancel).await
    }
}
