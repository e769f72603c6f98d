//! Canonical in-memory job collection with its local mirror and sync hooks.

use std::sync::Arc;

use chrono::Utc;
use crossbeam_channel::{unbounded, Receiver, Sender};
use uuid::Uuid;

use super::models::{JobPatch, JobRecord, Settings};
use super::observers::{Observers, Subscription};
use super::storage::{Storage, JOBS_KEY, SETTINGS_KEY};
use crate::error::{Result, TrackerError};
use crate::sync::{
    merge, GitHubContents, Phase, RemoteStore, StatusKind, SyncEvent, SyncPhase, SyncStatus,
    SyncTicket, Synchronizer,
};

/// Builds the remote client for a given set of settings
pub type RemoteFactory = Box<dyn Fn(&Settings) -> Result<Arc<dyn RemoteStore>>>;

/// Factory for the real GitHub Contents client
pub fn github_remote() -> RemoteFactory {
    Box::new(|settings| {
        let client = GitHubContents::new(settings)?;
        Ok(Arc::new(client) as Arc<dyn RemoteStore>)
    })
}

/// Job collection store.
///
/// Every mutation rewrites the whole stored document, notifies collection
/// listeners before returning and, when sync is configured, hands a copy of
/// the collection to the synchronizer. Sync outcomes come back through
/// `pump_sync_events`, which the owner calls from the same thread.
pub struct JobStore {
    storage: Storage,
    jobs: Vec<JobRecord>,
    settings: Settings,
    listeners: Observers<[JobRecord]>,
    status_listeners: Observers<SyncStatus>,
    last_status: Option<SyncStatus>,
    remote_factory: RemoteFactory,
    synchronizer: Option<Synchronizer>,
    phase: SyncPhase,
    /// A local change whose push was refused by the guard
    push_pending: bool,
    events_tx: Sender<SyncEvent>,
    events_rx: Receiver<SyncEvent>,
}

impl JobStore {
    /// Load the stored collection and settings. Does not contact the remote;
    /// call `sync_all` once listeners are attached.
    pub fn open(storage: Storage, remote_factory: RemoteFactory) -> Result<Self> {
        let jobs: Vec<JobRecord> = storage.load_json(JOBS_KEY)?.unwrap_or_default();
        let settings: Settings = storage.load_json(SETTINGS_KEY)?.unwrap_or_default();
        tracing::debug!(count = jobs.len(), sync = settings.sync_enabled(), "opened job store");

        let (events_tx, events_rx) = unbounded();
        let mut store = JobStore {
            storage,
            jobs,
            settings,
            listeners: Observers::new(),
            status_listeners: Observers::new(),
            last_status: None,
            remote_factory,
            synchronizer: None,
            phase: SyncPhase::new(),
            push_pending: false,
            events_tx,
            events_rx,
        };

        // Incomplete settings must not prevent local use
        if let Err(e) = store.rebuild_synchronizer() {
            tracing::warn!(error = %e, "remote sync disabled");
        }
        Ok(store)
    }

    /// All records, most recent `date` first. Undated records sort last.
    pub fn get_all(&self) -> Vec<JobRecord> {
        let mut jobs = self.jobs.clone();
        jobs.sort_by(|a, b| b.parsed_date().cmp(&a.parsed_date()));
        jobs
    }

    pub fn get(&self, id: &str) -> Option<&JobRecord> {
        self.jobs.iter().find(|j| j.id == id)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Insert a new record at the front, assigning an id when missing and
    /// stamping the creation time. A record whose id is already stored
    /// replaces the stored one.
    pub fn add(&mut self, mut record: JobRecord) -> Result<JobRecord> {
        if record.id.trim().is_empty() {
            record.id = Uuid::new_v4().to_string();
        }
        record.created_at = Some(Utc::now());

        let mut next = Vec::with_capacity(self.jobs.len() + 1);
        next.push(record.clone());
        next.extend(self.jobs.iter().filter(|j| j.id != record.id).cloned());

        self.commit(next, true)?;
        tracing::info!(id = %record.id, company = %record.company, "added job");
        Ok(record)
    }

    /// Apply `patch` to the record with the same id. Returns `false` (and
    /// changes nothing) when that record no longer exists.
    pub fn update(&mut self, patch: JobPatch) -> Result<bool> {
        let Some(index) = self.jobs.iter().position(|j| j.id == patch.id) else {
            tracing::debug!(id = %patch.id, "update of unknown job ignored");
            return Ok(false);
        };

        let id = patch.id.clone();
        let mut next = self.jobs.clone();
        patch.apply(&mut next[index]);
        self.commit(next, true)?;
        tracing::info!(id = %id, "updated job");
        Ok(true)
    }

    /// Remove the record with `id`. Unknown ids are a no-op returning `false`.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        if !self.jobs.iter().any(|j| j.id == id) {
            tracing::debug!(id = %id, "delete of unknown job ignored");
            return Ok(false);
        }

        let next: Vec<JobRecord> = self.jobs.iter().filter(|j| j.id != id).cloned().collect();
        self.commit(next, true)?;
        tracing::info!(id = %id, "deleted job");
        Ok(true)
    }

    /// Replace the whole collection. Records without an id get one, and
    /// repeated ids collapse to the last occurrence.
    pub fn replace_all(&mut self, records: Vec<JobRecord>) -> Result<()> {
        let with_ids: Vec<JobRecord> = records
            .into_iter()
            .map(|mut r| {
                if r.id.trim().is_empty() {
                    r.id = Uuid::new_v4().to_string();
                }
                r
            })
            .collect();
        let next = merge(&[], &with_ids);

        let count = next.len();
        self.commit(next, true)?;
        tracing::info!(count, "replaced job collection");
        Ok(())
    }

    pub fn subscribe(&self, listener: impl FnMut(&[JobRecord]) + 'static) -> Subscription {
        self.listeners.subscribe(listener)
    }

    pub fn subscribe_sync_status(&self, listener: impl FnMut(&SyncStatus) + 'static) -> Subscription {
        self.status_listeners.subscribe(listener)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Persist new settings and, when a token is present, run a full sync.
    /// Returns an error if the settings are stored but the remote client
    /// could not be built from them.
    pub fn save_settings(&mut self, settings: Settings) -> Result<()> {
        self.storage.save_json(SETTINGS_KEY, &settings)?;
        tracing::info!(?settings, "saved settings");
        self.settings = settings;
        self.rebuild_synchronizer()?;
        self.sync_all();
        Ok(())
    }

    pub fn sync_enabled(&self) -> bool {
        self.synchronizer.is_some()
    }

    pub fn sync_phase(&self) -> Phase {
        self.phase.current()
    }

    /// Most recent status reported by the synchronizer
    pub fn sync_status(&self) -> Option<&SyncStatus> {
        self.last_status.as_ref()
    }

    /// Start a background full sync. Returns `false` when sync is not
    /// configured or one is already running.
    pub fn sync_all(&self) -> bool {
        match &self.synchronizer {
            Some(sync) => sync.sync_all(),
            None => false,
        }
    }

    /// Run a full sync on this thread and apply its outcome
    pub fn sync_now_blocking(&mut self) -> Result<SyncStatus> {
        let Some(sync) = &self.synchronizer else {
            return Err(TrackerError::Config(
                "remote sync is not configured; set a token, owner and repo first".to_string(),
            ));
        };
        if !sync.sync_all_blocking() {
            return Err(TrackerError::Config("a sync is already in progress".to_string()));
        }
        self.apply_sync_events(true)?;
        self.last_status
            .clone()
            .ok_or_else(|| TrackerError::Config("sync finished without a status".to_string()))
    }

    /// Apply everything the sync workers reported since the last call.
    /// Fetched documents are merged into the current collection, stored and
    /// announced without a push, then written back to converge the remote.
    pub fn pump_sync_events(&mut self) -> Result<usize> {
        self.apply_sync_events(false)
    }

    fn apply_sync_events(&mut self, blocking: bool) -> Result<usize> {
        let mut count = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            count += 1;
            match event {
                SyncEvent::Status(status) => self.apply_status(status),
                SyncEvent::Fetched { remote, ticket } => {
                    self.converge(remote, ticket, blocking)?;
                }
            }
        }
        Ok(count)
    }

    fn apply_status(&mut self, status: SyncStatus) {
        tracing::debug!(status = status.message, "sync status");
        self.status_listeners.notify(&status);
        let settled = status.kind != StatusKind::Info;
        self.last_status = Some(status);
        if settled {
            self.flush_pending_push();
        }
    }

    /// Merge a fetched remote collection into the live one and start the
    /// write-back, which takes over `ticket`.
    fn converge(
        &mut self,
        remote: Option<Vec<JobRecord>>,
        ticket: SyncTicket,
        blocking: bool,
    ) -> Result<()> {
        if let Some(remote) = remote {
            let merged = merge(&self.jobs, &remote);
            tracing::info!(
                local = self.jobs.len(),
                remote = remote.len(),
                merged = merged.len(),
                "merged remote document"
            );
            if let Err(e) = self.commit(merged, false) {
                drop(ticket);
                self.apply_status(SyncStatus::SYNC_FAILED);
                return Err(e);
            }
        }
        // The write-back carries every local change made so far
        self.push_pending = false;

        let Some(sync) = &self.synchronizer else {
            tracing::warn!("sync disabled before the fetched document arrived");
            drop(ticket);
            self.apply_status(SyncStatus::SYNC_FAILED);
            return Ok(());
        };
        if blocking {
            sync.converge_blocking(ticket, self.jobs.clone());
        } else {
            sync.converge(ticket, self.jobs.clone());
        }
        Ok(())
    }

    /// Push again once the guard is free if a change missed the remote
    fn flush_pending_push(&mut self) {
        if !self.push_pending || self.phase.current() != Phase::Idle {
            return;
        }
        if let Some(sync) = &self.synchronizer {
            tracing::debug!("pushing changes made during the last sync");
            self.push_pending = !sync.push(self.jobs.clone());
        }
    }

    fn rebuild_synchronizer(&mut self) -> Result<()> {
        self.synchronizer = None;
        if !self.settings.sync_enabled() {
            return Ok(());
        }
        let remote = (self.remote_factory)(&self.settings)?;
        self.synchronizer = Some(Synchronizer::new(
            remote,
            self.phase.clone(),
            self.events_tx.clone(),
        ));
        Ok(())
    }

    /// Write `next` through to storage, swap it in and notify. The in-memory
    /// collection only changes if the write succeeded.
    fn commit(&mut self, next: Vec<JobRecord>, push: bool) -> Result<()> {
        self.storage.save_json(JOBS_KEY, &next)?;
        self.jobs = next;
        self.listeners.notify(&self.get_all());

        if push {
            if let Some(sync) = &self.synchronizer {
                if !sync.push(self.jobs.clone()) {
                    self.push_pending = true;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::atomic::Ordering;
    use std::time::{Duration, Instant};

    use crate::data::JobStatus;
    use crate::sync::testing::{job, FakeRemote};

    pub(crate) fn local_store() -> JobStore {
        JobStore::open(Storage::in_memory().unwrap(), github_remote()).unwrap()
    }

    fn fake_factory(remote: Arc<FakeRemote>) -> RemoteFactory {
        Box::new(move |_| Ok(Arc::clone(&remote) as Arc<dyn RemoteStore>))
    }

    fn synced_settings() -> Settings {
        Settings {
            token: "tok".to_string(),
            owner: "me".to_string(),
            repo: "career".to_string(),
            ..Settings::default()
        }
    }

    fn dated(id: &str, date: &str) -> JobRecord {
        JobRecord {
            id: id.to_string(),
            date: date.to_string(),
            ..Default::default()
        }
    }

    /// Drain sync events until a status with `message` arrives
    fn pump_until(store: &mut JobStore, message: &str) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            store.pump_sync_events().unwrap();
            if store.sync_status().is_some_and(|s| s.message == message) {
                return;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("timed out waiting for status {message:?}");
    }

    #[test]
    fn test_add_assigns_id_and_created_at() {
        let mut store = local_store();
        let added = store.add(JobRecord::default()).unwrap();
        assert!(!added.id.is_empty());
        assert!(added.created_at.is_some());
        assert_eq!(store.get(&added.id), Some(&added));
    }

    #[test]
    fn test_add_keeps_explicit_id() {
        let mut store = local_store();
        let added = store.add(job("custom-id", "Acme")).unwrap();
        assert_eq!(added.id, "custom-id");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_with_existing_id_replaces() {
        let mut store = local_store();
        store.add(job("a", "First")).unwrap();
        store.add(job("b", "Other")).unwrap();
        store.add(job("a", "Second")).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a").unwrap().company, "Second");
    }

    #[test]
    fn test_get_all_sorted_by_date_desc() {
        let mut store = local_store();
        store.add(dated("mid", "2026-02-01")).unwrap();
        store.add(dated("none", "someday")).unwrap();
        store.add(dated("old", "2025-12-31")).unwrap();
        store.add(dated("new", "2026-03-15")).unwrap();

        let ids: Vec<String> = store.get_all().into_iter().map(|j| j.id).collect();
        assert_eq!(ids, vec!["new", "mid", "old", "none"]);
        // Pure: repeated calls agree
        assert_eq!(store.get_all(), store.get_all());
    }

    #[test]
    fn test_update_merges_fields() {
        let mut store = local_store();
        store.add(job("a", "Acme")).unwrap();

        let mut patch = JobPatch::new("a");
        patch.status = Some(JobStatus::Offer);
        assert!(store.update(patch).unwrap());

        let updated = store.get("a").unwrap();
        assert_eq!(updated.status, JobStatus::Offer);
        assert_eq!(updated.company, "Acme");
        assert!(updated.created_at.is_some());
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut store = local_store();
        store.add(job("a", "Acme")).unwrap();
        let before = store.get_all();

        let notified = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&notified);
        let _sub = store.subscribe(move |_| *counter.borrow_mut() += 1);

        let mut patch = JobPatch::new("ghost");
        patch.company = Some("Nope".to_string());
        assert!(!store.update(patch).unwrap());

        assert_eq!(store.get_all(), before);
        assert_eq!(*notified.borrow(), 0);
    }

    #[test]
    fn test_delete() {
        let mut store = local_store();
        store.add(job("a", "Acme")).unwrap();
        store.add(job("b", "Beta")).unwrap();

        assert!(store.delete("a").unwrap());
        assert!(!store.delete("a").unwrap());
        assert_eq!(store.len(), 1);
        assert!(store.get("a").is_none());
    }

    #[test]
    fn test_no_duplicate_ids_after_mixed_operations() {
        let mut store = local_store();
        for i in 0..10 {
            store.add(job(&format!("id-{}", i % 4), "Acme")).unwrap();
            store.add(JobRecord::default()).unwrap();
            if i % 3 == 0 {
                store.delete(&format!("id-{}", i % 2)).unwrap();
            }
            let mut patch = JobPatch::new(format!("id-{}", i % 5));
            patch.role = Some("Engineer".to_string());
            store.update(patch).unwrap();
        }
        store
            .replace_all(vec![job("x", "1"), job("x", "2"), JobRecord::default()])
            .unwrap();

        let all = store.get_all();
        let mut ids: Vec<&str> = all.iter().map(|j| j.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), all.len());
        assert_eq!(store.get("x").unwrap().company, "2");
    }

    #[test]
    fn test_listeners_see_each_mutation_in_order() {
        let mut store = local_store();
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&log);
        let _a = store.subscribe(move |jobs| first.borrow_mut().push(("first", jobs.len())));
        let second = Rc::clone(&log);
        let sub_b = store.subscribe(move |jobs| second.borrow_mut().push(("second", jobs.len())));

        store.add(job("a", "Acme")).unwrap();
        sub_b.unsubscribe();
        store.delete("a").unwrap();

        assert_eq!(
            *log.borrow(),
            vec![("first", 1), ("second", 1), ("first", 0)]
        );
    }

    #[test]
    fn test_collection_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobtrack.db");
        {
            let mut store = JobStore::open(Storage::open(&path).unwrap(), github_remote()).unwrap();
            store.add(job("a", "Acme")).unwrap();
        }
        let store = JobStore::open(Storage::open(&path).unwrap(), github_remote()).unwrap();
        assert_eq!(store.get("a").unwrap().company, "Acme");
    }

    #[test]
    fn test_mutation_pushes_when_sync_configured() {
        let remote = Arc::new(FakeRemote::default());
        let storage = Storage::in_memory().unwrap();
        storage.save_json(SETTINGS_KEY, &synced_settings()).unwrap();
        let mut store = JobStore::open(storage, fake_factory(Arc::clone(&remote))).unwrap();
        assert!(store.sync_enabled());

        store.add(job("a", "Acme")).unwrap();
        pump_until(&mut store, "Saved");

        assert_eq!(remote.stored(), Some(vec![store.get("a").unwrap().clone()]));
    }

    #[test]
    fn test_failed_push_does_not_fail_mutation() {
        let remote = Arc::new(FakeRemote::failing());
        let storage = Storage::in_memory().unwrap();
        storage.save_json(SETTINGS_KEY, &synced_settings()).unwrap();
        let mut store = JobStore::open(storage, fake_factory(remote)).unwrap();

        let statuses = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&statuses);
        let _sub = store.subscribe_sync_status(move |s| seen.borrow_mut().push(s.clone()));

        store.add(job("a", "Acme")).unwrap();
        assert_eq!(store.len(), 1);

        pump_until(&mut store, "Save Failed");
        assert_eq!(store.len(), 1);
        assert_eq!(
            *statuses.borrow(),
            vec![SyncStatus::SAVING, SyncStatus::SAVE_FAILED]
        );
    }

    #[test]
    fn test_save_settings_runs_full_sync_and_merges() {
        let remote = Arc::new(FakeRemote::with_document(vec![
            job("a", "Remote Acme"),
            job("r", "Remote Only"),
        ]));
        let mut store =
            JobStore::open(Storage::in_memory().unwrap(), fake_factory(Arc::clone(&remote)))
                .unwrap();
        store.add(job("a", "Local Acme")).unwrap();
        store.add(job("l", "Local Only")).unwrap();
        assert_eq!(remote.write_calls.load(Ordering::SeqCst), 0);

        store.save_settings(synced_settings()).unwrap();
        pump_until(&mut store, "Synced");

        assert_eq!(store.len(), 3);
        assert_eq!(store.get("a").unwrap().company, "Remote Acme");
        assert!(store.get("l").is_some());
        assert!(store.get("r").is_some());
        // Only the convergence write; applying the merge did not push again
        assert_eq!(remote.write_calls.load(Ordering::SeqCst), 1);
        assert_eq!(remote.stored().unwrap().len(), 3);
        assert_eq!(store.sync_phase(), Phase::Idle);
    }

    /// Store wired to a remote whose fetch and write block until released
    fn gated_store(
        remote_records: Vec<JobRecord>,
    ) -> (JobStore, Arc<FakeRemote>, Receiver<()>, Sender<()>) {
        let (entered_tx, entered_rx) = unbounded();
        let (release_tx, release_rx) = unbounded();
        let remote = Arc::new(FakeRemote {
            gate: Some((entered_tx, release_rx)),
            ..FakeRemote::with_document(remote_records)
        });
        let store =
            JobStore::open(Storage::in_memory().unwrap(), fake_factory(Arc::clone(&remote)))
                .unwrap();
        (store, remote, entered_rx, release_tx)
    }

    fn pass_gate(entered: &Receiver<()>, release: &Sender<()>) {
        entered.recv_timeout(Duration::from_secs(5)).unwrap();
        release.send(()).unwrap();
    }

    fn sorted_ids(records: &[JobRecord]) -> Vec<String> {
        let mut ids: Vec<String> = records.iter().map(|j| j.id.clone()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_changes_during_fetch_survive_the_merge() {
        let (mut store, remote, entered, release) = gated_store(vec![job("r", "Remote")]);
        store.add(job("old", "Stale")).unwrap();

        store.save_settings(synced_settings()).unwrap();
        entered.recv_timeout(Duration::from_secs(5)).unwrap();

        // Fetch is in flight
        store.add(job("new", "Added Mid Sync")).unwrap();
        store.delete("old").unwrap();
        release.send(()).unwrap();

        // Convergence write
        let deadline = Instant::now() + Duration::from_secs(5);
        while entered.try_recv().is_err() {
            assert!(Instant::now() < deadline, "convergence write never started");
            store.pump_sync_events().unwrap();
            std::thread::sleep(Duration::from_millis(10));
        }
        release.send(()).unwrap();
        pump_until(&mut store, "Synced");

        assert_eq!(sorted_ids(&store.get_all()), vec!["new", "r"]);
        assert_eq!(sorted_ids(&remote.stored().unwrap()), vec!["new", "r"]);
        // The write-back already carried the changes; no extra push
        assert_eq!(remote.write_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.sync_phase(), Phase::Idle);
    }

    #[test]
    fn test_change_during_write_back_is_pushed_afterwards() {
        let (mut store, remote, entered, release) = gated_store(vec![job("r", "Remote")]);

        store.save_settings(synced_settings()).unwrap();
        pass_gate(&entered, &release);

        let deadline = Instant::now() + Duration::from_secs(5);
        while entered.try_recv().is_err() {
            assert!(Instant::now() < deadline, "convergence write never started");
            store.pump_sync_events().unwrap();
            std::thread::sleep(Duration::from_millis(10));
        }
        // Write-back is in flight, so this push is refused for now
        store.add(job("late", "Late Add")).unwrap();
        release.send(()).unwrap();

        // Follow-up push once the guard is free
        let deadline = Instant::now() + Duration::from_secs(5);
        while entered.try_recv().is_err() {
            assert!(Instant::now() < deadline, "follow-up push never started");
            store.pump_sync_events().unwrap();
            std::thread::sleep(Duration::from_millis(10));
        }
        release.send(()).unwrap();
        pump_until(&mut store, "Saved");

        assert_eq!(sorted_ids(&remote.stored().unwrap()), vec!["late", "r"]);
        assert_eq!(remote.write_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_clearing_token_disables_sync() {
        let remote = Arc::new(FakeRemote::default());
        let storage = Storage::in_memory().unwrap();
        storage.save_json(SETTINGS_KEY, &synced_settings()).unwrap();
        let mut store = JobStore::open(storage, fake_factory(Arc::clone(&remote))).unwrap();

        let mut settings = store.settings().clone();
        settings.token.clear();
        store.save_settings(settings).unwrap();
        assert!(!store.sync_enabled());

        store.add(job("a", "Acme")).unwrap();
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(remote.write_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_sync_now_blocking() {
        let remote = Arc::new(FakeRemote::default());
        let mut store =
            JobStore::open(Storage::in_memory().unwrap(), fake_factory(Arc::clone(&remote)))
                .unwrap();
        assert!(store.sync_now_blocking().is_err());

        store.add(job("a", "Acme")).unwrap();
        store.save_settings(synced_settings()).unwrap();
        pump_until(&mut store, "Synced");

        let status = store.sync_now_blocking().unwrap();
        assert_eq!(status, SyncStatus::SYNCED);
        assert_eq!(remote.stored().unwrap().len(), 1);
    }

    #[test]
    fn test_incomplete_settings_keep_store_usable() {
        let storage = Storage::in_memory().unwrap();
        let settings = Settings {
            token: "tok".to_string(),
            ..Settings::default()
        };
        storage.save_json(SETTINGS_KEY, &settings).unwrap();

        let mut store = JobStore::open(storage, github_remote()).unwrap();
        assert!(!store.sync_enabled());
        store.add(job("a", "Acme")).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_open_fails_on_corrupt_collection() {
        let storage = Storage::in_memory().unwrap();
        storage.save_json(JOBS_KEY, &serde_json::json!({"not": "an array"})).unwrap();
        assert!(JobStore::open(storage, github_remote()).is_err());
    }
}
