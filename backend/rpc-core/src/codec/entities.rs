//! [`TagDecode`] implementations for every wire entity.
//!
//! Each impl is a flat tag → field-setter table. Bare-flag booleans
//! (`<suspended_via_gui/>`) arrive through `flag`, text booleans
//! (`<suspended_via_gui>1</suspended_via_gui>`) through `field`; the wire
//! uses both forms depending on client version.

use crate::codec::{TagDecode, TagReader, decode_into};
use crate::models::{
    AccountOut, AcctMgrInfo, AcctMgrRpcReply, ActiveTask, CcStatus, ClientState, FileTransfer,
    FileXfer, HostInfo, Message, Notice, PersistentFileXfer, Project, ProjectAttachReply,
    ProjectConfig, SimpleReply, TaskResult, VersionInfo,
};

/// Overwrite `slot` if a usable value was decoded; otherwise keep the
/// default. Always reports the tag as consumed.
fn set<T>(slot: &mut T, value: Option<T>) -> bool {
    if let Some(value) = value {
        *slot = value;
    }
    true
}

impl TagDecode for CcStatus {
    const ELEMENT: &'static str = "cc_status";

    fn field(&mut self, tag: &str, r: &mut TagReader<'_>) -> bool {
        match tag {
            "task_mode" => set(&mut self.task_mode, r.i32_field(tag)),
            "task_mode_perm" => set(&mut self.task_mode_perm, r.i32_field(tag)),
            "task_suspend_reason" => set(&mut self.task_suspend_reason, r.i32_field(tag)),
            "network_mode" => set(&mut self.network_mode, r.i32_field(tag)),
            "network_mode_perm" => set(&mut self.network_mode_perm, r.i32_field(tag)),
            "network_suspend_reason" => set(&mut self.network_suspend_reason, r.i32_field(tag)),
            "network_status" => set(&mut self.network_status, r.i32_field(tag)),
            _ => false,
        }
    }
}

impl TagDecode for Project {
    const ELEMENT: &'static str = "project";

    fn field(&mut self, tag: &str, r: &mut TagReader<'_>) -> bool {
        match tag {
            "master_url" => set(&mut self.master_url, r.string_field(tag)),
            "project_name" => set(&mut self.project_name, r.string_field(tag)),
            "user_name" => set(&mut self.user_name, r.string_field(tag)),
            "team_name" => set(&mut self.team_name, r.string_field(tag)),
            "user_total_credit" => set(&mut self.user_total_credit, r.f64_field(tag)),
            "user_expavg_credit" => set(&mut self.user_expavg_credit, r.f64_field(tag)),
            "host_total_credit" => set(&mut self.host_total_credit, r.f64_field(tag)),
            "host_expavg_credit" => set(&mut self.host_expavg_credit, r.f64_field(tag)),
            "min_rpc_time" => set(&mut self.min_rpc_time, r.f64_field(tag)),
            "sched_rpc_pending" => set(&mut self.sched_rpc_pending, r.i32_field(tag)),
            "suspended_via_gui" => set(&mut self.suspended_via_gui, r.bool_field(tag)),
            "dont_request_more_work" => set(&mut self.dont_request_more_work, r.bool_field(tag)),
            "attached_via_acct_mgr" => set(&mut self.attached_via_acct_mgr, r.bool_field(tag)),
            "detach_when_done" => set(&mut self.detach_when_done, r.bool_field(tag)),
            "trickle_up_pending" => set(&mut self.trickle_up_pending, r.bool_field(tag)),
            _ => false,
        }
    }

    fn flag(&mut self, tag: &str) {
        match tag {
            "suspended_via_gui" => self.suspended_via_gui = true,
            "dont_request_more_work" => self.dont_request_more_work = true,
            "attached_via_acct_mgr" => self.attached_via_acct_mgr = true,
            "detach_when_done" => self.detach_when_done = true,
            "trickle_up_pending" => self.trickle_up_pending = true,
            _ => {}
        }
    }
}

impl TagDecode for TaskResult {
    const ELEMENT: &'static str = "result";

    fn field(&mut self, tag: &str, r: &mut TagReader<'_>) -> bool {
        match tag {
            "name" => set(&mut self.name, r.string_field(tag)),
            "wu_name" => set(&mut self.wu_name, r.string_field(tag)),
            "project_url" => set(&mut self.project_url, r.string_field(tag)),
            "report_deadline" => set(&mut self.report_deadline, r.f64_field(tag)),
            "state" => set(&mut self.state, r.i32_field(tag)),
            "estimated_cpu_time_remaining" => {
                set(&mut self.estimated_cpu_time_remaining, r.f64_field(tag))
            }
            "suspended_via_gui" => set(&mut self.suspended_via_gui, r.bool_field(tag)),
            "ready_to_report" => set(&mut self.ready_to_report, r.bool_field(tag)),
            // nested sub-entity, decoded by delegation
            "active_task" => {
                self.active_task = decode_into::<ActiveTask>(r);
                true
            }
            _ => false,
        }
    }

    fn flag(&mut self, tag: &str) {
        match tag {
            "suspended_via_gui" => self.suspended_via_gui = true,
            "ready_to_report" => self.ready_to_report = true,
            _ => {}
        }
    }
}

impl TagDecode for ActiveTask {
    const ELEMENT: &'static str = "active_task";

    fn field(&mut self, tag: &str, r: &mut TagReader<'_>) -> bool {
        match tag {
            "active_task_state" => set(&mut self.active_task_state, r.i32_field(tag)),
            "app_version_num" => set(&mut self.app_version_num, r.i32_field(tag)),
            "checkpoint_cpu_time" => set(&mut self.checkpoint_cpu_time, r.f64_field(tag)),
            "current_cpu_time" => set(&mut self.current_cpu_time, r.f64_field(tag)),
            "elapsed_time" => set(&mut self.elapsed_time, r.f64_field(tag)),
            "fraction_done" => set(&mut self.fraction_done, r.f64_field(tag)),
            _ => false,
        }
    }
}

impl TagDecode for FileTransfer {
    const ELEMENT: &'static str = "file_transfer";

    fn field(&mut self, tag: &str, r: &mut TagReader<'_>) -> bool {
        match tag {
            "name" => set(&mut self.name, r.string_field(tag)),
            "project_url" => set(&mut self.project_url, r.string_field(tag)),
            "project_name" => set(&mut self.project_name, r.string_field(tag)),
            "nbytes" => set(&mut self.nbytes, r.f64_field(tag)),
            "status" => set(&mut self.status, r.i32_field(tag)),
            "is_upload" => set(&mut self.is_upload, r.bool_field(tag)),
            "file_xfer" => {
                self.xfer = decode_into::<FileXfer>(r);
                true
            }
            "persistent_file_xfer" => {
                self.persistent_xfer = decode_into::<PersistentFileXfer>(r);
                true
            }
            _ => false,
        }
    }

    fn flag(&mut self, tag: &str) {
        if tag == "is_upload" {
            self.is_upload = true;
        }
    }
}

impl TagDecode for FileXfer {
    const ELEMENT: &'static str = "file_xfer";

    fn field(&mut self, tag: &str, r: &mut TagReader<'_>) -> bool {
        match tag {
            "bytes_xferred" => set(&mut self.bytes_xferred, r.f64_field(tag)),
            "xfer_speed" => set(&mut self.xfer_speed, r.f64_field(tag)),
            _ => false,
        }
    }
}

impl TagDecode for PersistentFileXfer {
    const ELEMENT: &'static str = "persistent_file_xfer";

    fn field(&mut self, tag: &str, r: &mut TagReader<'_>) -> bool {
        match tag {
            "num_retries" => set(&mut self.num_retries, r.i32_field(tag)),
            "next_request_time" => set(&mut self.next_request_time, r.f64_field(tag)),
            "time_so_far" => set(&mut self.time_so_far, r.f64_field(tag)),
            _ => false,
        }
    }
}

impl TagDecode for HostInfo {
    const ELEMENT: &'static str = "host_info";

    fn field(&mut self, tag: &str, r: &mut TagReader<'_>) -> bool {
        match tag {
            "domain_name" => set(&mut self.domain_name, r.string_field(tag)),
            "os_name" => set(&mut self.os_name, r.string_field(tag)),
            "os_version" => set(&mut self.os_version, r.string_field(tag)),
            "p_ncpus" => set(&mut self.p_ncpus, r.i32_field(tag)),
            "p_vendor" => set(&mut self.p_vendor, r.string_field(tag)),
            "p_model" => set(&mut self.p_model, r.string_field(tag)),
            "p_fpops" => set(&mut self.p_fpops, r.f64_field(tag)),
            "p_iops" => set(&mut self.p_iops, r.f64_field(tag)),
            "m_nbytes" => set(&mut self.m_nbytes, r.f64_field(tag)),
            "m_swap" => set(&mut self.m_swap, r.f64_field(tag)),
            "d_total" => set(&mut self.d_total, r.f64_field(tag)),
            "d_free" => set(&mut self.d_free, r.f64_field(tag)),
            _ => false,
        }
    }
}

impl TagDecode for AcctMgrInfo {
    const ELEMENT: &'static str = "acct_mgr_info";

    fn field(&mut self, tag: &str, r: &mut TagReader<'_>) -> bool {
        match tag {
            "acct_mgr_name" => set(&mut self.acct_mgr_name, r.string_field(tag)),
            "acct_mgr_url" => set(&mut self.acct_mgr_url, r.string_field(tag)),
            "have_credentials" => set(&mut self.have_credentials, r.bool_field(tag)),
            _ => false,
        }
    }

    fn flag(&mut self, tag: &str) {
        if tag == "have_credentials" {
            self.have_credentials = true;
        }
    }
}

impl TagDecode for AcctMgrRpcReply {
    const ELEMENT: &'static str = "acct_mgr_rpc_reply";

    fn field(&mut self, tag: &str, r: &mut TagReader<'_>) -> bool {
        match tag {
            "error_num" => set(&mut self.error_num, r.i32_field(tag)),
            "message" => {
                if let Some(m) = r.string_field(tag) {
                    self.messages.push(m);
                }
                true
            }
            _ => false,
        }
    }
}

impl TagDecode for Notice {
    const ELEMENT: &'static str = "notice";

    fn field(&mut self, tag: &str, r: &mut TagReader<'_>) -> bool {
        match tag {
            "seqno" => set(&mut self.seqno, r.i32_field(tag)),
            "title" => set(&mut self.title, r.string_field(tag)),
            "description" => set(&mut self.description, r.string_field(tag)),
            "category" => set(&mut self.category, r.string_field(tag)),
            "link" => set(&mut self.link, r.string_field(tag)),
            "project_name" => set(&mut self.project_name, r.string_field(tag)),
            "create_time" => set(&mut self.create_time, r.f64_field(tag)),
            "arrival_time" => set(&mut self.arrival_time, r.f64_field(tag)),
            _ => false,
        }
    }
}

impl TagDecode for Message {
    const ELEMENT: &'static str = "msg";

    fn field(&mut self, tag: &str, r: &mut TagReader<'_>) -> bool {
        match tag {
            "seqno" => set(&mut self.seqno, r.i32_field(tag)),
            "project" => set(&mut self.project, r.string_field(tag)),
            "pri" => set(&mut self.priority, r.i32_field(tag)),
            "time" => set(&mut self.timestamp, r.f64_field(tag)),
            "body" => set(&mut self.body, r.string_field(tag)),
            _ => false,
        }
    }
}

impl TagDecode for ProjectConfig {
    const ELEMENT: &'static str = "project_config";

    fn field(&mut self, tag: &str, r: &mut TagReader<'_>) -> bool {
        match tag {
            "error_num" => set(&mut self.error_num, r.i32_field(tag)),
            "name" => set(&mut self.name, r.string_field(tag)),
            "master_url" => set(&mut self.master_url, r.string_field(tag)),
            "min_passwd_length" => set(&mut self.min_passwd_length, r.i32_field(tag)),
            "account_manager" => set(&mut self.account_manager, r.bool_field(tag)),
            "uses_username" => set(&mut self.uses_username, r.bool_field(tag)),
            "account_creation_disabled" => {
                set(&mut self.account_creation_disabled, r.bool_field(tag))
            }
            "client_account_creation_disabled" => set(
                &mut self.client_account_creation_disabled,
                r.bool_field(tag),
            ),
            "terms_of_use" => set(&mut self.terms_of_use, r.string_field(tag)),
            _ => false,
        }
    }

    fn flag(&mut self, tag: &str) {
        match tag {
            "account_manager" => self.account_manager = true,
            "uses_username" => self.uses_username = true,
            "account_creation_disabled" => self.account_creation_disabled = true,
            "client_account_creation_disabled" => self.client_account_creation_disabled = true,
            _ => {}
        }
    }
}

impl TagDecode for AccountOut {
    const ELEMENT: &'static str = "account_out";

    fn field(&mut self, tag: &str, r: &mut TagReader<'_>) -> bool {
        match tag {
            "error_num" => set(&mut self.error_num, r.i32_field(tag)),
            "error_msg" => set(&mut self.error_msg, r.string_field(tag)),
            "authenticator" => set(&mut self.authenticator, r.string_field(tag)),
            _ => false,
        }
    }
}

impl TagDecode for ProjectAttachReply {
    const ELEMENT: &'static str = "project_attach_reply";

    fn field(&mut self, tag: &str, r: &mut TagReader<'_>) -> bool {
        match tag {
            "error_num" => set(&mut self.error_num, r.i32_field(tag)),
            "message" => {
                if let Some(m) = r.string_field(tag) {
                    self.messages.push(m);
                }
                true
            }
            _ => false,
        }
    }
}

impl TagDecode for VersionInfo {
    const ELEMENT: &'static str = "server_version";

    fn field(&mut self, tag: &str, r: &mut TagReader<'_>) -> bool {
        match tag {
            "major" => set(&mut self.major, r.i32_field(tag)),
            "minor" => set(&mut self.minor, r.i32_field(tag)),
            "release" => set(&mut self.release, r.i32_field(tag)),
            _ => false,
        }
    }
}

impl TagDecode for SimpleReply {
    const ELEMENT: &'static str = "boinc_gui_rpc_reply";

    fn field(&mut self, tag: &str, r: &mut TagReader<'_>) -> bool {
        match tag {
            "success" => {
                self.success = true;
                let _ = r.text(tag);
                true
            }
            "error" => set(&mut self.error_msg, r.string_field(tag)),
            _ => false,
        }
    }

    fn flag(&mut self, tag: &str) {
        match tag {
            "success" => self.success = true,
            "unauthorized" => self.unauthorized = true,
            _ => {}
        }
    }
}

impl TagDecode for ClientState {
    const ELEMENT: &'static str = "client_state";

    fn field(&mut self, tag: &str, r: &mut TagReader<'_>) -> bool {
        match tag {
            "host_info" => {
                if let Some(host) = decode_into::<HostInfo>(r) {
                    self.host_info = host;
                }
                true
            }
            "project" => {
                if let Some(project) = decode_into::<Project>(r) {
                    self.projects.push(project);
                }
                true
            }
            "result" => {
                if let Some(result) = decode_into::<TaskResult>(r) {
                    self.results.push(result);
                }
                true
            }
            _ => false,
        }
    }
}
