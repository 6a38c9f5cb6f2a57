use serde::{Deserialize, Serialize};

/// One `<notice>` from `get_notices`. Classified into exactly one display
/// bucket at ingestion time and immutable thereafter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Notice {
    pub seqno: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub link: String,
    pub project_name: String,
    pub create_time: f64,
    pub arrival_time: f64,
}

impl Notice {
    /// Notices issued by a project server or its scheduler.
    pub fn is_server_notice(&self) -> bool {
        self.category == "server" || self.category == "scheduler"
    }

    /// Client-category notices are dropped from both display buckets.
    pub fn is_client_notice(&self) -> bool {
        self.category == "client"
    }
}
