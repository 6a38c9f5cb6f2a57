use serde::{Deserialize, Serialize};

/// One `<msg>` from `get_messages`: the client's own event log.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub seqno: i32,
    pub project: String,
    pub priority: i32,
    pub timestamp: f64,
    pub body: String,
}
