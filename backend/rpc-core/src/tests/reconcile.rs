//! Unit tests for the status reconciler.

use crate::models::modes::{
    PROCESS_EXECUTING, PROCESS_SUSPENDED, RUN_MODE_ALWAYS, RUN_MODE_AUTO, RUN_MODE_NEVER,
    SUSPEND_NOT_SUSPENDED, SUSPEND_REASON_CPU_THROTTLE, SUSPEND_REASON_USER_ACTIVE,
};
use crate::models::{ActiveTask, CcStatus, Notice, Project, RawSnapshot, TaskResult};
use crate::reconcile::{
    ComputingStatus, DerivedStatus, NetworkStatus, SetupStatus, StatusReconciler, wake_lock_safe,
};

fn cc(task_mode: i32, task_reason: i32, network_mode: i32, network_reason: i32) -> CcStatus {
    CcStatus {
        task_mode,
        task_suspend_reason: task_reason,
        network_mode,
        network_suspend_reason: network_reason,
        ..CcStatus::default()
    }
}

fn running_task() -> TaskResult {
    TaskResult {
        name: "wu_1".to_string(),
        active_task: Some(ActiveTask {
            active_task_state: PROCESS_EXECUTING,
            ..ActiveTask::default()
        }),
        ..TaskResult::default()
    }
}

fn project() -> Project {
    Project {
        master_url: "https://example.org/".to_string(),
        ..Project::default()
    }
}

fn notice(seqno: i32, category: &str) -> Notice {
    Notice {
        seqno,
        category: category.to_string(),
        ..Notice::default()
    }
}

fn snapshot(cc_status: CcStatus) -> RawSnapshot {
    RawSnapshot {
        cc_status,
        projects: vec![project()],
        ..RawSnapshot::default()
    }
}

#[tokio::test]
async fn given_run_mode_never_when_reconciled_then_computing_is_never() {
    let reconciler = StatusReconciler::new();

    let fired = reconciler
        .reconcile(&snapshot(cc(RUN_MODE_NEVER, 4, RUN_MODE_AUTO, 0)))
        .await;

    let derived = reconciler.derived().await;
    assert!(fired);
    assert_eq!(derived.computing_status, ComputingStatus::Never);
    assert_eq!(derived.computing_suspend_reason, 4);
}

#[tokio::test]
async fn given_auto_mode_with_real_suspend_reason_then_computing_is_suspended() {
    let reconciler = StatusReconciler::new();

    reconciler
        .reconcile(&snapshot(cc(
            RUN_MODE_AUTO,
            SUSPEND_REASON_USER_ACTIVE,
            RUN_MODE_AUTO,
            0,
        )))
        .await;

    let derived = reconciler.derived().await;
    assert_eq!(derived.computing_status, ComputingStatus::Suspended);
    assert_eq!(derived.computing_suspend_reason, SUSPEND_REASON_USER_ACTIVE);
}

/// **VALUE**: Verifies CPU throttling never surfaces as a suspension.
///
/// **WHY THIS MATTERS**: The client flips between running and
/// throttle-suspended many times a minute; surfacing each flip would make the
/// status strobe and would drop the wake lock mid-crunch.
///
/// **BUG THIS CATCHES**: Treating `SUSPEND_REASON_CPU_THROTTLE` like any
/// other suspend reason.
#[tokio::test]
async fn given_cpu_throttle_with_running_task_then_computing_not_suspended() {
    let reconciler = StatusReconciler::new();
    let mut snap = snapshot(cc(
        RUN_MODE_AUTO,
        SUSPEND_REASON_CPU_THROTTLE,
        RUN_MODE_AUTO,
        0,
    ));
    snap.results = vec![running_task()];

    reconciler.reconcile(&snap).await;

    let derived = reconciler.derived().await;
    assert_eq!(derived.computing_status, ComputingStatus::Computing);
    assert!(wake_lock_safe(&derived));
}

#[tokio::test]
async fn given_cpu_throttle_without_running_task_then_computing_is_idle() {
    let reconciler = StatusReconciler::new();
    let mut snap = snapshot(cc(
        RUN_MODE_AUTO,
        SUSPEND_REASON_CPU_THROTTLE,
        RUN_MODE_AUTO,
        0,
    ));
    snap.results = vec![TaskResult {
        active_task: Some(ActiveTask {
            active_task_state: PROCESS_SUSPENDED,
            ..ActiveTask::default()
        }),
        ..TaskResult::default()
    }];

    reconciler.reconcile(&snap).await;

    assert_eq!(
        reconciler.derived().await.computing_status,
        ComputingStatus::Idle
    );
}

#[tokio::test]
async fn given_auto_modes_unsuspended_then_network_available_and_setup_available() {
    let reconciler = StatusReconciler::new();
    let mut snap = snapshot(cc(
        RUN_MODE_AUTO,
        SUSPEND_NOT_SUSPENDED,
        RUN_MODE_AUTO,
        SUSPEND_NOT_SUSPENDED,
    ));
    snap.results = vec![running_task()];

    reconciler.reconcile(&snap).await;

    let derived = reconciler.derived().await;
    assert_eq!(derived.network_status, NetworkStatus::Available);
    assert_eq!(derived.setup_status, SetupStatus::Available);
}

#[tokio::test]
async fn given_no_projects_when_reconciled_then_setup_is_no_project() {
    let reconciler = StatusReconciler::new();
    let mut snap = snapshot(cc(RUN_MODE_AUTO, 0, RUN_MODE_AUTO, 0));
    snap.projects.clear();

    reconciler.reconcile(&snap).await;

    assert_eq!(
        reconciler.derived().await.setup_status,
        SetupStatus::NoProject
    );
}

/// Network mirrors the computing split but has no throttle carve-out: any
/// nonzero reason under auto mode is a real suspension.
#[tokio::test]
async fn given_network_suspend_reason_then_network_is_suspended() {
    let reconciler = StatusReconciler::new();

    reconciler
        .reconcile(&snapshot(cc(RUN_MODE_NEVER, 0, RUN_MODE_AUTO, 8)))
        .await;

    let derived = reconciler.derived().await;
    assert_eq!(derived.network_status, NetworkStatus::Suspended);
    assert_eq!(derived.network_suspend_reason, 8);
}

/// **VALUE**: Verifies the suppressed-cycle quirk: an underivable field
/// suppresses the notification but clean fields still update in memory.
///
/// **WHY THIS MATTERS**: Subscribers debounce on the notification; internal
/// readers poll `derived()` directly. The two views are allowed to diverge
/// for exactly one garbled cycle and downstream code relies on that.
///
/// **BUG THIS CATCHES**: "Fixing" the quirk into all-or-nothing updates, or
/// letting a garbled field fire the notification anyway.
#[tokio::test]
async fn given_underivable_task_mode_then_notification_suppressed_but_clean_fields_update() {
    let reconciler = StatusReconciler::new();
    let mut rx = reconciler.subscribe();

    // RUN_MODE_ALWAYS has no derivation rule, so computing is a parse error
    // while network and setup derive cleanly.
    let fired = reconciler
        .reconcile(&snapshot(cc(RUN_MODE_ALWAYS, 0, RUN_MODE_AUTO, 0)))
        .await;

    assert!(!fired);
    assert!(!rx.has_changed().unwrap());
    let derived = reconciler.derived().await;
    assert_eq!(derived.computing_status, ComputingStatus::Never); // untouched default
    assert_eq!(derived.network_status, NetworkStatus::Available); // updated anyway
    assert_eq!(derived.setup_status, SetupStatus::Available);
}

#[tokio::test]
async fn given_parse_error_then_previous_computing_value_is_retained() {
    let reconciler = StatusReconciler::new();

    reconciler
        .reconcile(&snapshot(cc(RUN_MODE_NEVER, 4, RUN_MODE_AUTO, 0)))
        .await;
    reconciler
        .reconcile(&snapshot(cc(RUN_MODE_ALWAYS, 0, RUN_MODE_AUTO, 0)))
        .await;

    let derived = reconciler.derived().await;
    assert_eq!(derived.computing_status, ComputingStatus::Never);
    assert_eq!(derived.computing_suspend_reason, 4);
}

#[tokio::test]
async fn given_clean_cycle_after_garbled_one_then_notification_fires_again() {
    let reconciler = StatusReconciler::new();
    let mut rx = reconciler.subscribe();

    reconciler
        .reconcile(&snapshot(cc(RUN_MODE_ALWAYS, 0, RUN_MODE_AUTO, 0)))
        .await;
    let fired = reconciler
        .reconcile(&snapshot(cc(RUN_MODE_NEVER, 0, RUN_MODE_AUTO, 0)))
        .await;

    assert!(fired);
    assert!(rx.has_changed().unwrap());
    assert_eq!(
        rx.borrow_and_update().computing_status,
        ComputingStatus::Never
    );
}

/// Two clean cycles back to back: user resumes computation between polls
/// and a task picks up. Each cycle updates the triple and fires once.
#[tokio::test]
async fn given_resume_between_cycles_then_each_cycle_fires_with_new_status() {
    let reconciler = StatusReconciler::new();
    let mut rx = reconciler.subscribe();

    let first = reconciler
        .reconcile(&snapshot(cc(RUN_MODE_NEVER, 4, RUN_MODE_AUTO, 0)))
        .await;
    assert!(first);
    assert_eq!(
        rx.borrow_and_update().computing_status,
        ComputingStatus::Never
    );

    let mut snap = snapshot(cc(
        RUN_MODE_AUTO,
        SUSPEND_NOT_SUSPENDED,
        RUN_MODE_AUTO,
        SUSPEND_NOT_SUSPENDED,
    ));
    snap.results = vec![running_task()];
    let second = reconciler.reconcile(&snap).await;
    assert!(second);
    let derived = rx.borrow_and_update().clone();
    assert_eq!(derived.computing_status, ComputingStatus::Computing);
    assert_eq!(derived.network_status, NetworkStatus::Available);
    assert!(wake_lock_safe(&derived));
}

#[tokio::test]
async fn given_fresh_reconciler_then_status_starts_launching_and_never() {
    let reconciler = StatusReconciler::new();

    let derived = reconciler.derived().await;

    assert_eq!(derived, DerivedStatus::default());
    assert_eq!(derived.setup_status, SetupStatus::Launching);
    assert!(!wake_lock_safe(&derived));
}

// -- notice ingestion --

#[tokio::test]
async fn given_mixed_notice_batch_then_buckets_split_by_category() {
    let reconciler = StatusReconciler::new();
    let mut snap = snapshot(cc(RUN_MODE_NEVER, 0, RUN_MODE_AUTO, 0));
    snap.notices = vec![
        notice(1, "server"),
        notice(2, "scheduler"),
        notice(3, "client"),
        notice(4, ""),
    ];

    reconciler.reconcile(&snap).await;

    let server = reconciler.server_notices().await;
    let rss = reconciler.rss_notices().await;
    assert_eq!(
        server.iter().map(|n| n.seqno).collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert_eq!(rss.iter().map(|n| n.seqno).collect::<Vec<_>>(), vec![4]);
    assert_eq!(reconciler.notice_watermark().await, 4);
}

/// **VALUE**: Verifies replayed notices never re-enter the buckets.
///
/// **WHY THIS MATTERS**: `get_notices` with a stale seqno replays history;
/// without the watermark every poll would duplicate the whole notice list.
///
/// **BUG THIS CATCHES**: Comparing with `<` instead of `<=`, or forgetting
/// to persist the watermark between cycles.
#[tokio::test]
async fn given_replayed_batch_then_notices_at_or_below_watermark_are_discarded() {
    let reconciler = StatusReconciler::new();
    let mut snap = snapshot(cc(RUN_MODE_NEVER, 0, RUN_MODE_AUTO, 0));
    snap.notices = vec![notice(1, ""), notice(2, "server")];

    reconciler.reconcile(&snap).await;
    reconciler.reconcile(&snap).await; // full replay

    assert_eq!(reconciler.rss_notices().await.len(), 1);
    assert_eq!(reconciler.server_notices().await.len(), 1);
    assert_eq!(reconciler.notice_watermark().await, 2);
}

/// Client-category notices are dropped from display yet still advance the
/// watermark; otherwise the same dropped notice is re-fetched forever.
#[tokio::test]
async fn given_only_client_notices_then_watermark_still_advances() {
    let reconciler = StatusReconciler::new();
    let mut snap = snapshot(cc(RUN_MODE_NEVER, 0, RUN_MODE_AUTO, 0));
    snap.notices = vec![notice(7, "client")];

    reconciler.reconcile(&snap).await;

    assert!(reconciler.rss_notices().await.is_empty());
    assert!(reconciler.server_notices().await.is_empty());
    assert_eq!(reconciler.notice_watermark().await, 7);
}

#[tokio::test]
async fn given_garbled_status_cycle_then_notices_are_still_ingested() {
    let reconciler = StatusReconciler::new();
    let mut snap = snapshot(cc(RUN_MODE_ALWAYS, 0, RUN_MODE_AUTO, 0));
    snap.notices = vec![notice(1, "server")];

    let fired = reconciler.reconcile(&snap).await;

    assert!(!fired);
    assert_eq!(reconciler.server_notices().await.len(), 1);
    assert_eq!(reconciler.notice_watermark().await, 1);
}
