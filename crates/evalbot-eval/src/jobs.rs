//! One in-flight eval job per submitter.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Tracks which submitters currently have a job running.
#[derive(Debug, Clone, Default)]
pub struct JobTracker {
    jobs: Arc<DashMap<u64, DateTime<Utc>>>,
}

impl JobTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the job slot for `submitter`.
    ///
    /// Returns `None` if a job is already running. The slot is released when
    /// the returned guard is dropped.
    pub fn try_start(&self, submitter: u64) -> Option<JobGuard> {
        match self.jobs.entry(submitter) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                slot.insert(Utc::now());
                Some(JobGuard {
                    jobs: Arc::clone(&self.jobs),
                    submitter,
                })
            }
        }
    }

    /// When the running job of `submitter` started.
    pub fn started_at(&self, submitter: u64) -> Option<DateTime<Utc>> {
        self.jobs.get(&submitter).map(|entry| *entry.value())
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// Holds a submitter's job slot until dropped.
#[derive(Debug)]
pub struct JobGuard {
    jobs: Arc<DashMap<u64, DateTime<Utc>>>,
    submitter: u64,
}

impl JobGuard {
    pub fn submitter(&self) -> u64 {
        self.submitter
    }
}

impl Drop for JobGuard {
    fn drop(&mut self) {
        self.jobs.remove(&self.submitter);
    }
}
