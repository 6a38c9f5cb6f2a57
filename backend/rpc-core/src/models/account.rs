use crate::codec::escape;

use common::RedactedPassword;

use serde::{Deserialize, Serialize};

/// Credentials for `lookup_account` / `create_account`.
///
/// The account password never goes over the wire: the request carries
/// MD5(password + lowercase email), matching what the project server stores.
#[derive(Debug, Clone)]
pub struct AccountIn {
    pub url: String,
    pub email_addr: String,
    pub user_name: String,
    pub team_name: String,
    pub uses_username: bool,
    pub password: RedactedPassword,
}

impl AccountIn {
    pub fn new(url: &str, email_addr: &str, password: RedactedPassword) -> Self {
        Self {
            url: url.to_string(),
            email_addr: email_addr.to_string(),
            user_name: String::new(),
            team_name: String::new(),
            uses_username: false,
            password,
        }
    }

    /// Digest the project server expects: MD5(password + lowercase email),
    /// or MD5(password + user name) for projects that authenticate by name.
    pub fn passwd_hash(&self) -> String {
        let salt = if self.uses_username {
            self.user_name.clone()
        } else {
            self.email_addr.to_lowercase()
        };
        format!(
            "{:x}",
            md5::compute(format!("{}{}", self.password.as_str(), salt))
        )
    }

    pub(crate) fn lookup_body(&self) -> String {
        format!(
            "<lookup_account>\n<url>{}</url>\n<email_addr>{}</email_addr>\n<passwd_hash>{}</passwd_hash>\n</lookup_account>\n",
            escape(&self.url),
            escape(&self.email_addr),
            self.passwd_hash(),
        )
    }

    pub(crate) fn create_body(&self) -> String {
        format!(
            "<create_account>\n<url>{}</url>\n<email_addr>{}</email_addr>\n<passwd_hash>{}</passwd_hash>\n<user_name>{}</user_name>\n<team_name>{}</team_name>\n</create_account>\n",
            escape(&self.url),
            escape(&self.email_addr),
            self.passwd_hash(),
            escape(&self.user_name),
            escape(&self.team_name),
        )
    }
}

/// Terminal reply of `lookup_account_poll` / `create_account_poll`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AccountOut {
    pub error_num: i32,
    pub error_msg: String,
    pub authenticator: String,
}
