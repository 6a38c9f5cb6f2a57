use serde::{Deserialize, Serialize};

/// `<cc_status>` snapshot: run modes plus the reasons the client gives for
/// any current suspension. Modes default to 0, which is outside the valid
/// range - the reconciler treats an unfilled mode as a parse error rather
/// than inventing a state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CcStatus {
    pub task_mode: i32,
    pub task_mode_perm: i32,
    pub task_suspend_reason: i32,
    pub network_mode: i32,
    pub network_mode_perm: i32,
    pub network_suspend_reason: i32,
    pub network_status: i32,
}
