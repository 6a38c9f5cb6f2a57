use serde::{Deserialize, Serialize};

/// One attached project from `get_project_status` / `get_state`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub master_url: String,
    pub project_name: String,
    pub user_name: String,
    pub team_name: String,
    pub user_total_credit: f64,
    pub user_expavg_credit: f64,
    pub host_total_credit: f64,
    pub host_expavg_credit: f64,
    pub min_rpc_time: f64,
    pub sched_rpc_pending: i32,
    pub suspended_via_gui: bool,
    pub dont_request_more_work: bool,
    pub attached_via_acct_mgr: bool,
    pub detach_when_done: bool,
    pub trickle_up_pending: bool,
}

impl Project {
    /// Display name with the master URL as fallback; some projects never
    /// send a `<project_name>`.
    pub fn name(&self) -> &str {
        if self.project_name.is_empty() {
            &self.master_url
        } else {
            &self.project_name
        }
    }
}
