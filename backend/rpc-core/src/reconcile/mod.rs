//! Status reconciliation: stable derived state from noisy raw snapshots.
//!
//! The external scheduler polls the client roughly every second and feeds
//! each [`RawSnapshot`] through [`StatusReconciler::reconcile`]. The
//! reconciler derives three small state machines (computing, network, setup)
//! plus the notice watermark, and publishes a single "status changed"
//! notification per clean cycle through a latest-value `watch` channel -
//! subscribers read the current [`DerivedStatus`], never a stream of deltas.
//!
//! A derivation that cannot classify its inputs is a parse error for that
//! field only: the previous public value stays, an internal flag is set, and
//! the cycle's notification is suppressed. Note the deliberate quirk: fields
//! that derived cleanly are still updated in memory during a suppressed
//! cycle. Downstream code depends on that combined behavior.

use crate::models::modes::{
    RUN_MODE_AUTO, RUN_MODE_NEVER, SUSPEND_NOT_SUSPENDED, SUSPEND_REASON_CPU_THROTTLE,
};
use crate::models::{CcStatus, Notice, Project, RawSnapshot, TaskResult};

use serde::{Deserialize, Serialize};

use log::{debug, trace};
use tokio::sync::{RwLock, watch};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ComputingStatus {
    #[default]
    Never,
    Suspended,
    Idle,
    Computing,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum NetworkStatus {
    #[default]
    Never,
    Suspended,
    Available,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SetupStatus {
    /// No successful cycle yet.
    #[default]
    Launching,
    Available,
    Error,
    NoProject,
}

/// The stable, UI-facing status triple. Updated only by the reconciler,
/// always as a whole.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DerivedStatus {
    pub computing_status: ComputingStatus,
    pub computing_suspend_reason: i32,
    pub network_status: NetworkStatus,
    pub network_suspend_reason: i32,
    pub setup_status: SetupStatus,
}

/// Whether the process-lifecycle collaborator may hold its wake/network
/// locks: yes while computation is not suspended, which deliberately
/// includes the CPU-throttle case (throttling is folded into
/// Computing/Idle, never surfaced as a suspension).
pub fn wake_lock_safe(status: &DerivedStatus) -> bool {
    matches!(
        status.computing_status,
        ComputingStatus::Computing | ComputingStatus::Idle
    )
}

struct ReconcilerState {
    derived: DerivedStatus,
    computing_parse_error: bool,
    network_parse_error: bool,
    setup_parse_error: bool,
    notice_watermark: i32,
    rss_notices: Vec<Notice>,
    server_notices: Vec<Notice>,
}

impl ReconcilerState {
    fn new() -> Self {
        Self {
            derived: DerivedStatus::default(),
            computing_parse_error: false,
            network_parse_error: false,
            setup_parse_error: false,
            notice_watermark: 0,
            rss_notices: Vec::new(),
            server_notices: Vec::new(),
        }
    }

    /// First match wins; no match is a parse error and the previous public
    /// value (status and reason both) is retained.
    fn derive_computing(&mut self, cc: &CcStatus, results: &[TaskResult]) -> bool {
        let reason = cc.task_suspend_reason;
        let throttled_or_running =
            reason == SUSPEND_NOT_SUSPENDED || reason == SUSPEND_REASON_CPU_THROTTLE;

        match cc.task_mode {
            RUN_MODE_NEVER => {
                self.derived.computing_status = ComputingStatus::Never;
                self.derived.computing_suspend_reason = reason;
            }
            RUN_MODE_AUTO if !throttled_or_running => {
                self.derived.computing_status = ComputingStatus::Suspended;
                self.derived.computing_suspend_reason = reason;
            }
            RUN_MODE_AUTO => {
                self.derived.computing_status = if results.iter().any(TaskResult::is_active) {
                    ComputingStatus::Computing
                } else {
                    ComputingStatus::Idle
                };
                self.derived.computing_suspend_reason = reason;
            }
            other => {
                trace!("computing status underivable: task_mode={other}");
                self.computing_parse_error = true;
                return false;
            }
        }
        self.computing_parse_error = false;
        true
    }

    /// Same three-way split on the network side, without the throttle case.
    fn derive_network(&mut self, cc: &CcStatus) -> bool {
        let reason = cc.network_suspend_reason;
        match cc.network_mode {
            RUN_MODE_NEVER => {
                self.derived.network_status = NetworkStatus::Never;
                self.derived.network_suspend_reason = reason;
            }
            RUN_MODE_AUTO if reason != SUSPEND_NOT_SUSPENDED => {
                self.derived.network_status = NetworkStatus::Suspended;
                self.derived.network_suspend_reason = reason;
            }
            RUN_MODE_AUTO => {
                self.derived.network_status = NetworkStatus::Available;
                self.derived.network_suspend_reason = reason;
            }
            other => {
                trace!("network status underivable: network_mode={other}");
                self.network_parse_error = true;
                return false;
            }
        }
        self.network_parse_error = false;
        true
    }

    fn derive_setup(&mut self, projects: &[Project]) -> bool {
        self.derived.setup_status = if projects.is_empty() {
            SetupStatus::NoProject
        } else {
            SetupStatus::Available
        };
        self.setup_parse_error = false;
        true
    }

    /// Replay-protected ingestion: anything at or below the watermark is
    /// discarded unconditionally; everything above it raises the watermark,
    /// including client-category notices that land in neither bucket.
    fn ingest_notices(&mut self, notices: &[Notice]) {
        for notice in notices {
            if notice.seqno <= self.notice_watermark {
                continue;
            }
            if notice.is_server_notice() {
                self.server_notices.push(notice.clone());
            } else if !notice.is_client_notice() {
                self.rss_notices.push(notice.clone());
            }
            self.notice_watermark = notice.seqno;
        }
    }

    fn cycle_clean(&self) -> bool {
        !self.computing_parse_error && !self.network_parse_error && !self.setup_parse_error
    }
}

/// Owned, explicitly constructed reconciler. Pass a handle to whatever
/// drives the polling loop; there is no global instance.
pub struct StatusReconciler {
    state: RwLock<ReconcilerState>,
    changed: watch::Sender<DerivedStatus>,
}

impl StatusReconciler {
    pub fn new() -> Self {
        let (changed, _) = watch::channel(DerivedStatus::default());
        Self {
            state: RwLock::new(ReconcilerState::new()),
            changed,
        }
    }

    /// Latest-value channel carrying the current [`DerivedStatus`]. A new
    /// value appears only after a cycle where every derivation succeeded.
    pub fn subscribe(&self) -> watch::Receiver<DerivedStatus> {
        self.changed.subscribe()
    }

    /// Run one reconciliation cycle. The whole update - statuses, watermark
    /// and notice buckets - happens under a single write lock so readers
    /// never observe a torn triple. Returns whether the change notification
    /// fired.
    pub async fn reconcile(&self, snapshot: &RawSnapshot) -> bool {
        let mut state = self.state.write().await;

        state.derive_computing(&snapshot.cc_status, &snapshot.results);
        state.derive_network(&snapshot.cc_status);
        state.derive_setup(&snapshot.projects);
        state.ingest_notices(&snapshot.notices);

        if state.cycle_clean() {
            self.changed.send_replace(state.derived.clone());
            true
        } else {
            debug!("reconcile: snapshot partially garbled, notification suppressed");
            false
        }
    }

    /// Current derived status snapshot.
    pub async fn derived(&self) -> DerivedStatus {
        self.state.read().await.derived.clone()
    }

    /// Highest notice seqno already delivered. Feed this to
    /// `get_notices` on the next poll.
    pub async fn notice_watermark(&self) -> i32 {
        self.state.read().await.notice_watermark
    }

    /// Project/news notices accumulated so far (rss bucket).
    pub async fn rss_notices(&self) -> Vec<Notice> {
        self.state.read().await.rss_notices.clone()
    }

    /// Server and scheduler notices accumulated so far.
    pub async fn server_notices(&self) -> Vec<Notice> {
        self.state.read().await.server_notices.clone()
    }
}

impl Default for StatusReconciler {
    fn default() -> Self {
        Self::new()
    }
}
