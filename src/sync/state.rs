//! Idle/Syncing guard shared between the store and its worker threads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Observable phase of the synchronizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Syncing,
}

/// Two-state machine: `Idle -> Syncing` only through `try_begin`,
/// `Syncing -> Idle` only when the ticket is dropped.
#[derive(Debug, Clone, Default)]
pub struct SyncPhase {
    syncing: Arc<AtomicBool>,
}

impl SyncPhase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Phase {
        if self.syncing.load(Ordering::Acquire) {
            Phase::Syncing
        } else {
            Phase::Idle
        }
    }

    /// Enter `Syncing`. Returns `None` if a sync is already running; the
    /// caller drops its request rather than queueing it.
    pub fn try_begin(&self) -> Option<SyncTicket> {
        self.syncing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SyncTicket {
                syncing: Arc::clone(&self.syncing),
            })
    }
}

/// Proof of holding the `Syncing` phase
#[derive(Debug)]
pub struct SyncTicket {
    syncing: Arc<AtomicBool>,
}

impl Drop for SyncTicket {
    fn drop(&mut self) {
        self.syncing.store(false, Ordering::Release);
    }
}
