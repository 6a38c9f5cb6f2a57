use serde::{Deserialize, Serialize};

/// Terminal reply of `get_project_config_poll`: what the project needs to
/// know before an attach or account operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectConfig {
    pub error_num: i32,
    pub name: String,
    pub master_url: String,
    pub min_passwd_length: i32,
    pub account_manager: bool,
    pub uses_username: bool,
    pub account_creation_disabled: bool,
    pub client_account_creation_disabled: bool,
    pub terms_of_use: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            error_num: 0,
            name: String::new(),
            master_url: String::new(),
            // the historical floor; servers that care send their own
            min_passwd_length: 6,
            account_manager: false,
            uses_username: false,
            account_creation_disabled: false,
            client_account_creation_disabled: false,
            terms_of_use: String::new(),
        }
    }
}
