//! Remote synchronization of the job collection.
//!
//! All HTTP traffic goes through the `RemoteStore` trait. `github` holds the
//! GitHub Contents API implementation; the synchronizer only sees the trait.

pub mod github;
mod merge;
mod state;
mod synchronizer;
#[cfg(test)]
pub(crate) mod testing;

pub use github::GitHubContents;
pub use merge::merge;
pub use state::{Phase, SyncPhase, SyncTicket};
pub use synchronizer::Synchronizer;

use crate::data::JobRecord;
use crate::error::Result;

/// Remote copy of the collection as last read
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteDocument {
    pub records: Vec<JobRecord>,
    /// Revision marker (blob sha) required to overwrite the file
    pub revision: String,
}

/// Read/write access to the single remote JSON document
pub trait RemoteStore: Send + Sync {
    /// Fetch the document. `Ok(None)` means it does not exist yet.
    fn fetch(&self) -> Result<Option<RemoteDocument>>;

    /// Create or overwrite the document with `records`
    fn write(&self, records: &[JobRecord]) -> Result<()>;
}

/// Severity tag attached to a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// Status report shown by the view layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    pub message: &'static str,
    pub kind: StatusKind,
}

impl SyncStatus {
    pub const SYNCING: SyncStatus = SyncStatus::info("Syncing…");
    pub const SYNCED: SyncStatus = SyncStatus::success("Synced");
    pub const SYNC_FAILED: SyncStatus = SyncStatus::error("Sync Failed");
    pub const SAVING: SyncStatus = SyncStatus::info("Saving…");
    pub const SAVED: SyncStatus = SyncStatus::success("Saved");
    pub const SAVE_FAILED: SyncStatus = SyncStatus::error("Save Failed");

    const fn info(message: &'static str) -> Self {
        SyncStatus {
            message,
            kind: StatusKind::Info,
        }
    }

    const fn success(message: &'static str) -> Self {
        SyncStatus {
            message,
            kind: StatusKind::Success,
        }
    }

    const fn error(message: &'static str) -> Self {
        SyncStatus {
            message,
            kind: StatusKind::Error,
        }
    }
}

/// Messages from sync workers back to the thread that owns the store
#[derive(Debug)]
pub enum SyncEvent {
    Status(SyncStatus),
    /// First half of a full sync. The owner merges `remote` (absent when no
    /// document exists yet) into its live collection and hands the result
    /// and the ticket back through `Synchronizer::converge`.
    Fetched {
        remote: Option<Vec<JobRecord>>,
        ticket: SyncTicket,
    },
}
