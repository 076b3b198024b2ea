//! Repository port for job and task-record persistence.

use crate::taskgraph::domain::{Job, JobId, TaskRecord, TaskRecordId, TranscriptFingerprint};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for job repository operations.
pub type JobRepositoryResult<T> = Result<T, JobRepositoryError>;

/// Persistence contract for jobs and their task records.
///
/// The fingerprint uniqueness constraint lives here: concurrent intakes of
/// the same transcript may race past the pre-insert lookup, and
/// [`JobRepository::insert_job`] is the final arbiter: the loser receives
/// [`JobRepositoryError::DuplicateFingerprint`] and retries as a lookup.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Stores a new job.
    ///
    /// # Errors
    ///
    /// Returns [`JobRepositoryError::DuplicateJob`] when the job ID already
    /// exists or [`JobRepositoryError::DuplicateFingerprint`] when another
    /// job already owns the transcript fingerprint.
    async fn insert_job(&self, job: &Job) -> JobRepositoryResult<()>;

    /// Persists changes to an existing job (status, result payload, error
    /// message, timestamps).
    ///
    /// # Errors
    ///
    /// Returns [`JobRepositoryError::JobNotFound`] when the job does not
    /// exist.
    async fn update_job(&self, job: &Job) -> JobRepositoryResult<()>;

    /// Finds a job by identifier.
    ///
    /// Returns `None` when the job does not exist.
    async fn find_job_by_id(&self, id: JobId) -> JobRepositoryResult<Option<Job>>;

    /// Finds the job owning the given transcript fingerprint.
    ///
    /// Returns `None` when no job has been created for the fingerprint.
    async fn find_job_by_fingerprint(
        &self,
        fingerprint: &TranscriptFingerprint,
    ) -> JobRepositoryResult<Option<Job>>;

    /// Stores a batch of task records, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns [`JobRepositoryError::JobNotFound`] when a record references
    /// an unknown job, or [`JobRepositoryError::DuplicateTask`] when a
    /// record ID already exists. No record is written on error.
    async fn insert_tasks(&self, records: &[TaskRecord]) -> JobRepositoryResult<()>;

    /// Returns a job's task records in creation order.
    async fn list_tasks_by_job(&self, job_id: JobId) -> JobRepositoryResult<Vec<TaskRecord>>;

    /// Updates a record's completion flag and returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`JobRepositoryError::TaskNotFound`] when the record does
    /// not exist.
    async fn set_task_completion(
        &self,
        task_id: TaskRecordId,
        is_completed: bool,
    ) -> JobRepositoryResult<TaskRecord>;
}

/// Errors returned by job repository implementations.
#[derive(Debug, Clone, Error)]
pub enum JobRepositoryError {
    /// A job with the same identifier already exists.
    #[error("duplicate job identifier: {0}")]
    DuplicateJob(JobId),

    /// A job already owns the transcript fingerprint.
    #[error("a job already exists for transcript fingerprint {0}")]
    DuplicateFingerprint(TranscriptFingerprint),

    /// A task record with the same identifier already exists.
    #[error("duplicate task record: {0}")]
    DuplicateTask(TaskRecordId),

    /// The job was not found.
    #[error("job not found: {0}")]
    JobNotFound(JobId),

    /// The task record was not found.
    #[error("task record not found: {0}")]
    TaskNotFound(TaskRecordId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl JobRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
