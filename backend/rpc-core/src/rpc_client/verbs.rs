//! Verb tokens for the project / task / transfer mutation families.

/// Verbs that act on an attached project, keyed by `<project_url>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectOp {
    Update,
    Suspend,
    Resume,
    NoMoreWork,
    AllowMoreWork,
    Detach,
    Reset,
}

impl ProjectOp {
    pub fn verb(self) -> &'static str {
        match self {
            ProjectOp::Update => "project_update",
            ProjectOp::Suspend => "project_suspend",
            ProjectOp::Resume => "project_resume",
            ProjectOp::NoMoreWork => "project_nomorework",
            ProjectOp::AllowMoreWork => "project_allowmorework",
            ProjectOp::Detach => "project_detach",
            ProjectOp::Reset => "project_reset",
        }
    }
}

/// Verbs that act on one result, keyed by `<project_url>` + `<name>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOp {
    Suspend,
    Resume,
    Abort,
}

impl TaskOp {
    pub fn verb(self) -> &'static str {
        match self {
            TaskOp::Suspend => "suspend_result",
            TaskOp::Resume => "resume_result",
            TaskOp::Abort => "abort_result",
        }
    }
}

/// Verbs that act on one file transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOp {
    Retry,
    Abort,
}

impl TransferOp {
    pub fn verb(self) -> &'static str {
        match self {
            TransferOp::Retry => "retry_file_transfer",
            TransferOp::Abort => "abort_file_transfer",
        }
    }
}
