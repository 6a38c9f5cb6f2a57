//! Wire-level mode tokens and reason codes.
//!
//! Numeric values are fixed by the compute-client peer and must not change.

use serde::{Deserialize, Serialize};

/// CPU / network run mode as reported in `<cc_status>`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RunMode {
    Always,
    Auto,
    Never,
    Restore,
}

impl RunMode {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            RUN_MODE_ALWAYS => Some(RunMode::Always),
            RUN_MODE_AUTO => Some(RunMode::Auto),
            RUN_MODE_NEVER => Some(RunMode::Never),
            RUN_MODE_RESTORE => Some(RunMode::Restore),
            _ => None,
        }
    }

    /// Token used inside `set_run_mode` / `set_network_mode` requests.
    pub fn token(self) -> &'static str {
        match self {
            RunMode::Always => "always",
            RunMode::Auto => "auto",
            RunMode::Never => "never",
            RunMode::Restore => "restore",
        }
    }
}

pub const RUN_MODE_ALWAYS: i32 = 1;
pub const RUN_MODE_AUTO: i32 = 2;
pub const RUN_MODE_NEVER: i32 = 3;
pub const RUN_MODE_RESTORE: i32 = 4;

pub const SUSPEND_NOT_SUSPENDED: i32 = 0;
pub const SUSPEND_REASON_BATTERIES: i32 = 1;
pub const SUSPEND_REASON_USER_ACTIVE: i32 = 2;
pub const SUSPEND_REASON_USER_REQ: i32 = 4;
pub const SUSPEND_REASON_TIME_OF_DAY: i32 = 8;
pub const SUSPEND_REASON_BENCHMARKS: i32 = 16;
pub const SUSPEND_REASON_DISK_SIZE: i32 = 32;
pub const SUSPEND_REASON_CPU_THROTTLE: i32 = 64;
pub const SUSPEND_REASON_NO_RECENT_INPUT: i32 = 128;
pub const SUSPEND_REASON_INITIAL_DELAY: i32 = 256;
pub const SUSPEND_REASON_EXCLUSIVE_APP_RUNNING: i32 = 512;
pub const SUSPEND_REASON_CPU_USAGE: i32 = 1024;
pub const SUSPEND_REASON_NETWORK_QUOTA_EXCEEDED: i32 = 2048;
pub const SUSPEND_REASON_OS: i32 = 4096;
pub const SUSPEND_REASON_WIFI_STATE: i32 = 4097;
pub const SUSPEND_REASON_BATTERY_CHARGING: i32 = 4098;
pub const SUSPEND_REASON_BATTERY_OVERHEATED: i32 = 4099;

/// `<active_task_state>` of a running task.
pub const PROCESS_UNINITIALIZED: i32 = 0;
pub const PROCESS_EXECUTING: i32 = 1;
pub const PROCESS_SUSPENDED: i32 = 9;
pub const PROCESS_ABORT_PENDING: i32 = 5;

/// `<state>` of a result.
pub const RESULT_NEW: i32 = 0;
pub const RESULT_FILES_DOWNLOADING: i32 = 1;
pub const RESULT_FILES_DOWNLOADED: i32 = 2;
pub const RESULT_COMPUTE_ERROR: i32 = 3;
pub const RESULT_FILES_UPLOADING: i32 = 4;
pub const RESULT_FILES_UPLOADED: i32 = 5;
pub const RESULT_ABORTED: i32 = 6;

/// `error_num` embedded in poll replies: keep polling.
pub const ERR_IN_PROGRESS: i32 = -204;
pub const ERR_OK: i32 = 0;
