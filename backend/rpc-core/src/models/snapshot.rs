use crate::models::{
    AcctMgrInfo, CcStatus, FileTransfer, HostInfo, Notice, Project, TaskResult,
};

use serde::{Deserialize, Serialize};

/// Everything `get_state` gives us in one document. Host info, projects and
/// results arrive as sub-entities of `<client_state>`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClientState {
    pub host_info: HostInfo,
    pub projects: Vec<Project>,
    pub results: Vec<TaskResult>,
}

/// One complete raw poll of the compute client. Immutable once built;
/// the next poll supersedes it wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawSnapshot {
    pub cc_status: CcStatus,
    pub projects: Vec<Project>,
    pub results: Vec<TaskResult>,
    pub transfers: Vec<FileTransfer>,
    pub host_info: HostInfo,
    pub acct_mgr_info: AcctMgrInfo,
    pub notices: Vec<Notice>,
}
