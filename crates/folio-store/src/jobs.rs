//! Durable job queue in the `jobs` table
//!
//! Producers go through `JobDispatcher::dispatch`; an out-of-band consumer
//! polls [`SqliteJobQueue::pending_jobs`] and acknowledges with
//! [`SqliteJobQueue::mark_done`]. Delivery is at-least-once.

use folio_core::dispatch::{JobAck, JobDispatcher, JobRequest, QueuedJob};
use folio_core::errors::FolioError;
use folio_core_types::JobId;

use crate::db::{lock, SharedConnection};
use crate::errors::{from_rusqlite, Result};
use crate::repo::sql::{from_millis, now};

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_DONE: &str = "done";

pub struct SqliteJobQueue {
    conn: SharedConnection,
}

impl SqliteJobQueue {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Jobs not yet marked done, oldest first
    ///
    /// # Errors
    ///
    /// Returns `Persistence` on query failure, `Serialization` if a stored
    /// payload is not valid JSON.
    pub fn pending_jobs(&self) -> Result<Vec<QueuedJob>> {
        let conn = lock(&self.conn, "pending_jobs")?;
        let mut stmt = conn
            .prepare(
                "SELECT id, name, payload, queued_at FROM jobs
                 WHERE status = ?1 ORDER BY rowid",
            )
            .map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([STATUS_PENDING], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        rows.into_iter()
            .map(|(id, name, payload, queued_at)| -> Result<QueuedJob> {
                Ok(QueuedJob {
                    id: JobId::from_string(id),
                    request: JobRequest::new(name, serde_json::from_str(&payload)?),
                    queued_at: from_millis(Some(queued_at)).ok_or_else(|| {
                        FolioError::Serialization {
                            message: format!("invalid queued_at {}", queued_at),
                        }
                    })?,
                })
            })
            .collect()
    }

    /// Mark a job as done; returns false if it was not pending
    ///
    /// # Errors
    ///
    /// Returns `Persistence` on update failure.
    pub fn mark_done(&self, job_id: &JobId) -> Result<bool> {
        let conn = lock(&self.conn, "mark_done")?;
        let updated = conn
            .execute(
                "UPDATE jobs SET status = ?1, completed_at = ?2 WHERE id = ?3 AND status = ?4",
                rusqlite::params![
                    STATUS_DONE,
                    now().timestamp_millis(),
                    job_id.as_str(),
                    STATUS_PENDING
                ],
            )
            .map_err(from_rusqlite)?;
        Ok(updated > 0)
    }

    fn enqueue(&self, request: &JobRequest) -> Result<JobAck> {
        let payload = serde_json::to_string(&request.payload)?;
        let ack = JobAck {
            job_id: JobId::new(),
            name: request.name.clone(),
            queued_at: now(),
        };

        let conn = lock(&self.conn, "dispatch")?;
        conn.execute(
            "INSERT INTO jobs (id, name, payload, status, queued_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                ack.job_id.as_str(),
                ack.name,
                payload,
                STATUS_PENDING,
                ack.queued_at.timestamp_millis()
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(ack)
    }
}

impl JobDispatcher for SqliteJobQueue {
    fn dispatch(&self, request: JobRequest) -> Result<JobAck> {
        let ack = self
            .enqueue(&request)
            .map_err(|e| FolioError::DispatchFailed {
                job_name: request.name.clone(),
                reason: e.to_string(),
            })?;
        tracing::debug!(job_name = %ack.name, job_id = %ack.job_id, "job persisted");
        Ok(ack)
    }
}
