//! Data layer: job records, the local SQLite mirror and the job store.
//!
//! Handles loading, mutating, exporting and importing the job collection.

mod models;
mod observers;
mod repository;
mod storage;
mod transfer;

pub use models::{JobPatch, JobRecord, JobStatus, Settings};
pub use observers::Subscription;
pub use repository::{github_remote, JobStore};
pub use storage::Storage;
