use serde::{Deserialize, Serialize};

/// `<acct_mgr_info>`: which account manager (if any) this client is
/// attached to.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AcctMgrInfo {
    pub acct_mgr_name: String,
    pub acct_mgr_url: String,
    pub have_credentials: bool,
}

impl AcctMgrInfo {
    pub fn is_attached(&self) -> bool {
        !self.acct_mgr_url.is_empty()
    }
}

/// Terminal reply of `acct_mgr_rpc_poll`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AcctMgrRpcReply {
    pub error_num: i32,
    pub messages: Vec<String>,
}
