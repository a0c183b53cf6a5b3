//! Job dispatch interface for deferred work (snapshot generation and friends).

use chrono::{DateTime, Utc};
use folio_core_types::JobId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use crate::errors::{FolioError, Result};

/// Job name used for page snapshot requests
pub const SNAPSHOT_JOB: &str = "create_snapshot";

/// A named unit of background work with a JSON payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    pub name: String,
    pub payload: Value,
}

impl JobRequest {
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

/// Receipt for an accepted job; nothing has run yet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobAck {
    pub job_id: JobId,
    pub name: String,
    pub queued_at: DateTime<Utc>,
}

/// Hand a job to whatever executes background work.
///
/// Dispatch is fire-and-forget: an `Ok` means the job was accepted, not that
/// it ran.
pub trait JobDispatcher: Send + Sync {
    /// # Errors
    ///
    /// Returns `DispatchFailed` if the job cannot be accepted.
    fn dispatch(&self, request: JobRequest) -> Result<JobAck>;
}

/// Noop dispatcher: always fails with `DispatchFailed`.
/// Used as default when no queue is configured.
pub struct NoopJobDispatcher;

impl JobDispatcher for NoopJobDispatcher {
    fn dispatch(&self, request: JobRequest) -> Result<JobAck> {
        Err(FolioError::DispatchFailed {
            job_name: request.name,
            reason: "no job dispatcher configured".to_string(),
        })
    }
}

/// A job accepted by [`MemoryJobQueue`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueuedJob {
    pub id: JobId,
    pub request: JobRequest,
    pub queued_at: DateTime<Utc>,
}

/// In-process FIFO queue, optionally bounded
#[derive(Debug, Default)]
pub struct MemoryJobQueue {
    jobs: Mutex<VecDeque<QueuedJob>>,
    capacity: Option<usize>,
}

impl MemoryJobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue that refuses jobs once `capacity` are pending
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            jobs: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity: Some(capacity),
        }
    }

    /// Pending jobs, oldest first
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the lock is poisoned.
    pub fn pending(&self) -> Result<Vec<QueuedJob>> {
        Ok(self.lock("pending")?.iter().cloned().collect())
    }

    /// Remove and return every pending job, oldest first
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the lock is poisoned.
    pub fn drain(&self) -> Result<Vec<QueuedJob>> {
        Ok(self.lock("drain")?.drain(..).collect())
    }

    fn lock(&self, op: &str) -> Result<MutexGuard<'_, VecDeque<QueuedJob>>> {
        self.jobs
            .lock()
            .map_err(|_| FolioError::persistence(op, "job queue lock poisoned"))
    }
}

impl JobDispatcher for MemoryJobQueue {
    fn dispatch(&self, request: JobRequest) -> Result<JobAck> {
        let mut jobs = self.lock("dispatch").map_err(|e| FolioError::DispatchFailed {
            job_name: request.name.clone(),
            reason: e.to_string(),
        })?;

        if let Some(capacity) = self.capacity {
            if jobs.len() >= capacity {
                return Err(FolioError::DispatchFailed {
                    job_name: request.name,
                    reason: format!("queue full ({} pending)", jobs.len()),
                });
            }
        }

        let job = QueuedJob {
            id: JobId::new(),
            request,
            queued_at: Utc::now(),
        };
        let ack = JobAck {
            job_id: job.id.clone(),
            name: job.request.name.clone(),
            queued_at: job.queued_at,
        };
        tracing::debug!(job_name = %ack.name, job_id = %ack.job_id, "job queued");
        jobs.push_back(job);
        Ok(ack)
    }
}
