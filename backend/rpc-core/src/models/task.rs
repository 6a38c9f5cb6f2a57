use crate::models::modes::PROCESS_EXECUTING;

use serde::{Deserialize, Serialize};

/// One `<result>` entry. The embedded `<active_task>` block is present only
/// while the client has a slot process for it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaskResult {
    pub name: String,
    pub wu_name: String,
    pub project_url: String,
    pub report_deadline: f64,
    pub state: i32,
    pub estimated_cpu_time_remaining: f64,
    pub suspended_via_gui: bool,
    pub ready_to_report: bool,
    pub active_task: Option<ActiveTask>,
}

impl TaskResult {
    /// True when a slot process exists and is executing right now. This is
    /// the signal the reconciler uses to split Computing from Idle.
    pub fn is_active(&self) -> bool {
        self.active_task
            .as_ref()
            .is_some_and(|t| t.active_task_state == PROCESS_EXECUTING)
    }
}

/// `<active_task>` sub-entity nested inside a result.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActiveTask {
    pub active_task_state: i32,
    pub app_version_num: i32,
    pub checkpoint_cpu_time: f64,
    pub current_cpu_time: f64,
    pub elapsed_time: f64,
    pub fraction_done: f64,
}
