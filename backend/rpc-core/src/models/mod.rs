//! Pure data records decoded from GUI-RPC replies.
//!
//! Models have no business logic - they're just data passed between the
//! codec, the reconciler, and the presentation layer. Field defaults match
//! what a record looks like before the codec has filled it in.

pub mod account;
pub mod acct_mgr;
pub mod host;
pub mod message;
pub mod modes;
pub mod notice;
pub mod project;
pub mod project_config;
pub mod reply;
pub mod snapshot;
pub mod status;
pub mod task;
pub mod transfer;

pub use account::{AccountIn, AccountOut};
pub use acct_mgr::{AcctMgrInfo, AcctMgrRpcReply};
pub use host::HostInfo;
pub use message::Message;
pub use notice::Notice;
pub use project::Project;
pub use project_config::ProjectConfig;
pub use reply::{ProjectAttachReply, SimpleReply, VersionInfo};
pub use snapshot::{ClientState, RawSnapshot};
pub use status::CcStatus;
pub use task::{ActiveTask, TaskResult};
pub use transfer::{FileTransfer, FileXfer, PersistentFileXfer};
