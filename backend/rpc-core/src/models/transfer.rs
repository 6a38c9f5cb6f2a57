use serde::{Deserialize, Serialize};

/// One `<file_transfer>` from `get_file_transfers`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FileTransfer {
    pub name: String,
    pub project_url: String,
    pub project_name: String,
    pub nbytes: f64,
    pub status: i32,
    pub is_upload: bool,
    /// Present only while bytes are moving.
    pub xfer: Option<FileXfer>,
    /// Present for transfers the client intends to retry.
    pub persistent_xfer: Option<PersistentFileXfer>,
}

impl FileTransfer {
    pub fn is_transfer_active(&self) -> bool {
        self.xfer.is_some()
    }

    pub fn bytes_transferred(&self) -> f64 {
        self.xfer.as_ref().map_or(0.0, |x| x.bytes_xferred)
    }
}

/// `<file_xfer>` sub-entity: the live leg of a transfer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FileXfer {
    pub bytes_xferred: f64,
    pub xfer_speed: f64,
}

/// `<persistent_file_xfer>` sub-entity: retry bookkeeping.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PersistentFileXfer {
    pub num_retries: i32,
    pub next_request_time: f64,
    pub time_so_far: f64,
}
