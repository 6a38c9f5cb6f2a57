use serde::{Deserialize, Serialize};

/// Decoded form of the bare acknowledgement most mutation verbs return:
/// `<success/>`, `<error>text</error>`, or `<unauthorized/>`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SimpleReply {
    pub success: bool,
    pub unauthorized: bool,
    pub error_msg: String,
}

/// Terminal reply of `project_attach_poll`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProjectAttachReply {
    pub error_num: i32,
    pub messages: Vec<String>,
}

/// `<server_version>` from `exchange_versions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VersionInfo {
    pub major: i32,
    pub minor: i32,
    pub release: i32,
}
