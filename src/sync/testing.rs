//! Test doubles for the sync layer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crossbeam_channel::{Receiver, Sender};

use super::{RemoteDocument, RemoteStore};
use crate::data::JobRecord;
use crate::error::{Result, TrackerError};

/// In-memory remote with call counters and an optional gate that holds
/// `fetch`/`write` until the test releases it
#[derive(Default)]
pub(crate) struct FakeRemote {
    pub document: Mutex<Option<Vec<JobRecord>>>,
    pub fetch_calls: AtomicUsize,
    pub write_calls: AtomicUsize,
    pub fail: bool,
    pub gate: Option<(Sender<()>, Receiver<()>)>,
}

impl FakeRemote {
    pub fn with_document(records: Vec<JobRecord>) -> Self {
        FakeRemote {
            document: Mutex::new(Some(records)),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        FakeRemote {
            fail: true,
            ..Default::default()
        }
    }

    pub fn stored(&self) -> Option<Vec<JobRecord>> {
        self.document.lock().unwrap().clone()
    }

    fn wait_at_gate(&self) {
        if let Some((entered, release)) = &self.gate {
            entered.send(()).unwrap();
            release.recv().unwrap();
        }
    }
}

impl RemoteStore for FakeRemote {
    fn fetch(&self) -> Result<Option<RemoteDocument>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_at_gate();
        if self.fail {
            return Err(TrackerError::Api {
                status: 500,
                message: "boom".to_string(),
            });
        }
        Ok(self.stored().map(|records| RemoteDocument {
            records,
            revision: "rev".to_string(),
        }))
    }

    fn write(&self, records: &[JobRecord]) -> Result<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_at_gate();
        if self.fail {
            return Err(TrackerError::Api {
                status: 409,
                message: "conflict".to_string(),
            });
        }
        *self.document.lock().unwrap() = Some(records.to_vec());
        Ok(())
    }
}

pub(crate) fn job(id: &str, company: &str) -> JobRecord {
    JobRecord {
        id: id.to_string(),
        company: company.to_string(),
        date: "2026-01-01".to_string(),
        ..Default::default()
    }
}
