use serde::{Deserialize, Serialize};

/// `<host_info>`: hardware and OS description of the machine running the
/// compute client. Embedded inside `get_state` replies and also available
/// standalone via `get_host_info`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HostInfo {
    pub domain_name: String,
    pub os_name: String,
    pub os_version: String,
    pub p_ncpus: i32,
    pub p_vendor: String,
    pub p_model: String,
    pub p_fpops: f64,
    pub p_iops: f64,
    pub m_nbytes: f64,
    pub m_swap: f64,
    pub d_total: f64,
    pub d_free: f64,
}
