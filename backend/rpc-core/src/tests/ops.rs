//! Unit tests for the generic submit/poll driver and its cancellation token.
//!
//! These drive `poll_until_terminal` with closures over atomic counters;
//! the concrete verbs behind a live socket are covered in
//! integration_tests/ops.rs.

use crate::error::op::OpError;
use crate::models::ProjectAttachReply;
use crate::models::modes::ERR_IN_PROGRESS;
use crate::ops::{CancelToken, PollingTask, poll_until_terminal};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const FAST: Duration = Duration::from_millis(5);

fn reply(error_num: i32) -> ProjectAttachReply {
    ProjectAttachReply {
        error_num,
        messages: Vec::new(),
    }
}

/// **VALUE**: Verifies the driver keeps polling through `-204` and stops on
/// the first other verdict, zero included.
///
/// **WHY THIS MATTERS**: `error_num == 0` is success, but it is still a
/// terminal verdict; a driver that only stops on nonzero values polls a
/// finished operation forever.
///
/// **BUG THIS CATCHES**: Treating zero as "keep going".
#[tokio::test]
async fn given_in_progress_replies_when_polled_then_loop_stops_at_first_terminal() {
    let polls = Arc::new(AtomicUsize::new(0));
    let polls_in_loop = Arc::clone(&polls);

    let result = poll_until_terminal(
        "attach",
        FAST,
        &CancelToken::new(),
        || async { true },
        move || {
            let polls = Arc::clone(&polls_in_loop);
            async move {
                let n = polls.fetch_add(1, Ordering::SeqCst);
                Some(reply(if n < 3 { ERR_IN_PROGRESS } else { 0 }))
            }
        },
    )
    .await;

    assert_eq!(result.unwrap().error_num, 0);
    assert_eq!(polls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn given_nonzero_terminal_reply_then_it_is_returned_not_mapped_to_error() {
    let result = poll_until_terminal(
        "attach",
        FAST,
        &CancelToken::new(),
        || async { true },
        || async { Some(reply(-161)) },
    )
    .await;

    assert_eq!(result.unwrap().error_num, -161);
}

#[tokio::test]
async fn given_rejected_submit_then_no_poll_is_ever_issued() {
    let polls = Arc::new(AtomicUsize::new(0));
    let polls_in_loop = Arc::clone(&polls);

    let result: Result<ProjectAttachReply, _> = poll_until_terminal(
        "attach",
        FAST,
        &CancelToken::new(),
        || async { false },
        move || {
            let polls = Arc::clone(&polls_in_loop);
            async move {
                polls.fetch_add(1, Ordering::SeqCst);
                Some(reply(0))
            }
        },
    )
    .await;

    assert!(matches!(result, Err(OpError::Rejected { .. })));
    assert_eq!(polls.load(Ordering::SeqCst), 0);
}

/// A poll with no decodable reply is a hard stop after exactly one poll,
/// not an in-progress retry.
#[tokio::test]
async fn given_missing_poll_reply_then_driver_fails_hard_after_one_poll() {
    let polls = Arc::new(AtomicUsize::new(0));
    let polls_in_loop = Arc::clone(&polls);

    let result: Result<ProjectAttachReply, _> = poll_until_terminal(
        "attach",
        FAST,
        &CancelToken::new(),
        || async { true },
        move || {
            let polls = Arc::clone(&polls_in_loop);
            async move {
                polls.fetch_add(1, Ordering::SeqCst);
                None
            }
        },
    )
    .await;

    assert!(matches!(result, Err(OpError::NoReply { verb: "attach", .. })));
    assert_eq!(polls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn given_pre_cancelled_token_then_loop_exits_before_first_poll() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let polls = Arc::new(AtomicUsize::new(0));
    let polls_in_loop = Arc::clone(&polls);

    let result: Result<ProjectAttachReply, _> = poll_until_terminal(
        "attach",
        Duration::from_secs(60),
        &cancel,
        || async { true },
        move || {
            let polls = Arc::clone(&polls_in_loop);
            async move {
                polls.fetch_add(1, Ordering::SeqCst);
                Some(reply(ERR_IN_PROGRESS))
            }
        },
    )
    .await;

    assert!(matches!(result, Err(OpError::Cancelled { .. })));
    assert_eq!(polls.load(Ordering::SeqCst), 0);
}

/// **VALUE**: Verifies cancellation cuts a long sleep short instead of
/// waiting the interval out.
///
/// **WHY THIS MATTERS**: The interval is a second in production; a user who
/// abandons an attach expects the loop gone now, not after the current nap.
///
/// **BUG THIS CATCHES**: Checking the token only at poll time rather than
/// racing it against the sleep.
#[tokio::test]
async fn given_cancel_during_sleep_then_loop_exits_within_the_interval() {
    let cancel = CancelToken::new();
    let task_cancel = cancel.clone();

    let handle = tokio::spawn(async move {
        poll_until_terminal::<ProjectAttachReply, _, _, _, _>(
            "attach",
            Duration::from_secs(3600),
            &task_cancel,
            || async { true },
            || async { Some(reply(ERR_IN_PROGRESS)) },
        )
        .await
    });
    tokio::task::yield_now().await;
    cancel.cancel();

    // an hour-long nap must not delay the exit
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(result, Err(OpError::Cancelled { .. })));
}

#[test]
fn given_cloned_token_when_one_clone_cancels_then_all_clones_observe_it() {
    let token = CancelToken::new();
    let clone = token.clone();

    assert!(!clone.is_cancelled());
    token.cancel();
    assert!(clone.is_cancelled());
}

#[tokio::test]
async fn given_spawned_polling_task_when_cancelled_via_handle_then_join_reports_it() {
    let task = PollingTask::spawn(|cancel| async move {
        poll_until_terminal::<ProjectAttachReply, _, _, _, _>(
            "attach",
            Duration::from_secs(3600),
            &cancel,
            || async { true },
            || async { Some(reply(ERR_IN_PROGRESS)) },
        )
        .await
    });

    tokio::task::yield_now().await;
    task.cancel();

    assert!(matches!(task.join().await, Err(OpError::Cancelled { .. })));
}

#[tokio::test]
async fn given_spawned_polling_task_that_finishes_then_join_yields_the_reply() {
    let task = PollingTask::spawn(|cancel| async move {
        poll_until_terminal(
            "attach",
            FAST,
            &cancel,
            || async { true },
            || async { Some(reply(0)) },
        )
        .await
    });

    assert_eq!(task.join().await.unwrap().error_num, 0);
}
