//! Background full-sync and push operations guarded by `SyncPhase`.

use std::sync::Arc;
use std::thread;

use crossbeam_channel::Sender;

use super::{RemoteStore, SyncEvent, SyncPhase, SyncStatus, SyncTicket};
use crate::data::JobRecord;

/// Runs sync work off the UI thread and reports back over a channel.
///
/// A full sync is split in two: a worker fetches the remote document and
/// sends it back as `SyncEvent::Fetched`, the owner merges it into the live
/// collection, then `converge` writes the merged set. The ticket travels with
/// the work, so the phase stays `Syncing` until the write has finished.
/// Requests that arrive while the phase is held are refused.
pub struct Synchronizer {
    remote: Arc<dyn RemoteStore>,
    phase: SyncPhase,
    events: Sender<SyncEvent>,
}

impl Synchronizer {
    pub fn new(remote: Arc<dyn RemoteStore>, phase: SyncPhase, events: Sender<SyncEvent>) -> Self {
        Synchronizer {
            remote,
            phase,
            events,
        }
    }

    #[cfg(test)]
    pub fn phase(&self) -> super::Phase {
        self.phase.current()
    }

    /// Start a full sync by fetching on a worker thread. Returns `false` when
    /// the request was dropped because a sync is already running.
    pub fn sync_all(&self) -> bool {
        let Some(ticket) = self.phase.try_begin() else {
            tracing::debug!("sync in progress, dropping full sync request");
            return false;
        };
        let remote = Arc::clone(&self.remote);
        let events = self.events.clone();
        self.spawn("jobtrack-sync", move || {
            run_fetch(remote.as_ref(), &events, ticket)
        })
    }

    /// Fetch on the calling thread. The outcome is still delivered through
    /// the channel; returns `false` when dropped by the guard.
    pub fn sync_all_blocking(&self) -> bool {
        match self.phase.try_begin() {
            Some(ticket) => {
                run_fetch(self.remote.as_ref(), &self.events, ticket);
                true
            }
            None => {
                tracing::debug!("sync in progress, dropping blocking sync request");
                false
            }
        }
    }

    /// Second half of a full sync: write `merged` on a worker thread so the
    /// remote converges, then report `Synced` or `Sync Failed`
    pub fn converge(&self, ticket: SyncTicket, merged: Vec<JobRecord>) -> bool {
        let remote = Arc::clone(&self.remote);
        let events = self.events.clone();
        self.spawn("jobtrack-converge", move || {
            run_converge(remote.as_ref(), &events, merged, ticket)
        })
    }

    pub fn converge_blocking(&self, ticket: SyncTicket, merged: Vec<JobRecord>) {
        run_converge(self.remote.as_ref(), &self.events, merged, ticket);
    }

    /// Overwrite the remote document with `local` on a worker thread
    pub fn push(&self, local: Vec<JobRecord>) -> bool {
        let Some(ticket) = self.phase.try_begin() else {
            tracing::debug!("sync in progress, dropping push request");
            return false;
        };
        let remote = Arc::clone(&self.remote);
        let events = self.events.clone();
        self.spawn("jobtrack-push", move || {
            run_push(remote.as_ref(), &events, local, ticket)
        })
    }

    fn spawn(&self, name: &str, work: impl FnOnce() + Send + 'static) -> bool {
        match thread::Builder::new().name(name.to_string()).spawn(work) {
            Ok(_) => true,
            Err(e) => {
                // The closure (and its ticket) is dropped, so the phase is Idle again
                tracing::error!(error = %e, "failed to spawn sync worker");
                send(&self.events, SyncEvent::Status(SyncStatus::SYNC_FAILED));
                false
            }
        }
    }
}

fn send(events: &Sender<SyncEvent>, event: SyncEvent) {
    if events.send(event).is_err() {
        tracing::debug!("sync event receiver dropped");
    }
}

fn run_fetch(remote: &dyn RemoteStore, events: &Sender<SyncEvent>, ticket: SyncTicket) {
    send(events, SyncEvent::Status(SyncStatus::SYNCING));
    match remote.fetch() {
        Ok(document) => {
            let remote = document.map(|document| {
                tracing::info!(
                    count = document.records.len(),
                    revision = %document.revision,
                    "fetched remote document"
                );
                document.records
            });
            send(events, SyncEvent::Fetched { remote, ticket });
        }
        Err(e) => {
            drop(ticket);
            tracing::error!(error = %e, "full sync failed");
            send(events, SyncEvent::Status(SyncStatus::SYNC_FAILED));
        }
    }
}

fn run_converge(
    remote: &dyn RemoteStore,
    events: &Sender<SyncEvent>,
    merged: Vec<JobRecord>,
    ticket: SyncTicket,
) {
    let outcome = remote.write(&merged);
    // Back to Idle before reporting, so a listener may start the next sync
    drop(ticket);
    match outcome {
        Ok(()) => {
            tracing::info!(count = merged.len(), "remote converged");
            send(events, SyncEvent::Status(SyncStatus::SYNCED));
        }
        Err(e) => {
            tracing::error!(error = %e, "full sync failed");
            send(events, SyncEvent::Status(SyncStatus::SYNC_FAILED));
        }
    }
}

fn run_push(
    remote: &dyn RemoteStore,
    events: &Sender<SyncEvent>,
    local: Vec<JobRecord>,
    ticket: SyncTicket,
) {
    send(events, SyncEvent::Status(SyncStatus::SAVING));
    let outcome = remote.write(&local);
    drop(ticket);
    match outcome {
        Ok(()) => {
            tracing::debug!(count = local.len(), "pushed collection");
            send(events, SyncEvent::Status(SyncStatus::SAVED));
        }
        Err(e) => {
            tracing::error!(error = %e, "push failed");
            send(events, SyncEvent::Status(SyncStatus::SAVE_FAILED));
        }
    }
}
