//! Transcript intake and job lifecycle orchestration.

use crate::taskgraph::{
    domain::{
        Job, JobId, JobOutcome, JobStatus, TaskBoard, TaskGraphDomainError, TaskRecord,
        TaskRecordId, detect_cycles, sanitize_dependencies,
    },
    ports::{ExtractionError, JobRepository, JobRepositoryError, TaskExtractor},
};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Caller-facing summary of one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    job_id: JobId,
    status: JobStatus,
    cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl SubmissionReceipt {
    fn from_job(job: &Job, cached: bool) -> Self {
        Self {
            job_id: job.id(),
            status: job.status(),
            cached,
            error: job.error_message().map(str::to_owned),
        }
    }

    /// Returns the job identifier the transcript resolved to.
    #[must_use]
    pub const fn job_id(&self) -> JobId {
        self.job_id
    }

    /// Returns the job status at the time of the receipt.
    #[must_use]
    pub const fn status(&self) -> JobStatus {
        self.status
    }

    /// Returns whether the submission resolved to an existing job.
    #[must_use]
    pub const fn cached(&self) -> bool {
        self.cached
    }

    /// Returns the failure message, present only for failed jobs.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Snapshot of one job and its task records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobStatusView {
    job: Job,
    tasks: Vec<TaskRecord>,
    has_cycles: bool,
}

impl JobStatusView {
    /// Returns the job aggregate.
    #[must_use]
    pub const fn job(&self) -> &Job {
        &self.job
    }

    /// Returns the task records in creation order.
    #[must_use]
    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    /// Returns whether any task record is a flagged cycle participant.
    #[must_use]
    pub const fn has_cycles(&self) -> bool {
        self.has_cycles
    }

    /// Consumes the view, yielding a board for completion toggling and
    /// status derivation.
    #[must_use]
    pub fn into_board(self) -> TaskBoard {
        TaskBoard::new(self.tasks)
    }
}

/// Service-level errors for intake operations.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// Input validation failed before any state was created.
    #[error(transparent)]
    Domain(#[from] TaskGraphDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] JobRepositoryError),

    /// The requested job does not exist.
    #[error("job not found: {0}")]
    JobNotFound(JobId),

    /// The requested task record does not exist.
    #[error("task record not found: {0}")]
    TaskNotFound(TaskRecordId),
}

/// Result type for intake service operations.
pub type IntakeResult<T> = Result<T, IntakeError>;

/// Failure inside the extraction-to-storage pipeline, converted into a
/// failed job rather than surfaced to the caller.
#[derive(Debug, Error)]
enum PipelineFailure {
    #[error("{0}")]
    Extraction(#[from] ExtractionError),
    #[error("{0}")]
    Storage(#[from] JobRepositoryError),
}

/// Job lifecycle orchestration over the extraction and storage ports.
#[derive(Clone)]
pub struct TranscriptIntakeService<R, X, C>
where
    R: JobRepository,
    X: TaskExtractor,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    extractor: Arc<X>,
    clock: Arc<C>,
}

impl<R, X, C> TranscriptIntakeService<R, X, C>
where
    R: JobRepository,
    X: TaskExtractor,
    C: Clock + Send + Sync,
{
    /// Creates a new intake service.
    #[must_use]
    pub const fn new(repository: Arc<R>, extractor: Arc<X>, clock: Arc<C>) -> Self {
        Self {
            repository,
            extractor,
            clock,
        }
    }

    /// Submits a transcript for processing.
    ///
    /// Identical transcripts (after trim and case normalization) resolve to
    /// the existing job with `cached = true` and trigger no new extraction.
    /// Extraction and mid-pipeline storage failures are recorded on the
    /// job and reported on the receipt as `failed`; they are not retried.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Domain`] for an empty transcript and
    /// [`IntakeError::Repository`] when the repository fails outside the
    /// pipeline steps.
    pub async fn submit(&self, transcript: &str) -> IntakeResult<SubmissionReceipt> {
        let mut job = Job::intake(transcript, &*self.clock)?;

        if let Some(existing) = self
            .repository
            .find_job_by_fingerprint(job.fingerprint())
            .await?
        {
            return Ok(SubmissionReceipt::from_job(&existing, true));
        }

        job.begin_processing(&*self.clock)?;
        match self.repository.insert_job(&job).await {
            Ok(()) => {}
            Err(JobRepositoryError::DuplicateFingerprint(fingerprint)) => {
                // Lost the intake race; the stored job is authoritative.
                let winner = self
                    .repository
                    .find_job_by_fingerprint(&fingerprint)
                    .await?
                    .ok_or_else(|| JobRepositoryError::DuplicateFingerprint(fingerprint))?;
                return Ok(SubmissionReceipt::from_job(&winner, true));
            }
            Err(other) => return Err(other.into()),
        }

        match self.run_pipeline(&job).await {
            Ok(outcome) => job.complete(outcome, &*self.clock)?,
            Err(failure) => job.fail(failure.to_string(), &*self.clock)?,
        }
        self.repository.update_job(&job).await?;
        Ok(SubmissionReceipt::from_job(&job, false))
    }

    /// Retrieves a job together with its task records.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::JobNotFound`] for an unknown identifier and
    /// [`IntakeError::Repository`] when the lookup itself fails.
    pub async fn job_status(&self, job_id: JobId) -> IntakeResult<JobStatusView> {
        let job = self
            .repository
            .find_job_by_id(job_id)
            .await?
            .ok_or(IntakeError::JobNotFound(job_id))?;
        let tasks = self.repository.list_tasks_by_job(job_id).await?;
        let has_cycles = tasks.iter().any(TaskRecord::has_cycle);
        Ok(JobStatusView {
            job,
            tasks,
            has_cycles,
        })
    }

    /// Updates a task record's completion flag.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::TaskNotFound`] for an unknown record and
    /// [`IntakeError::Repository`] when the update itself fails.
    pub async fn set_task_completion(
        &self,
        task_id: TaskRecordId,
        is_completed: bool,
    ) -> IntakeResult<TaskRecord> {
        match self
            .repository
            .set_task_completion(task_id, is_completed)
            .await
        {
            Ok(record) => Ok(record),
            Err(JobRepositoryError::TaskNotFound(id)) => Err(IntakeError::TaskNotFound(id)),
            Err(other) => Err(other.into()),
        }
    }

    /// Polls the job at a fixed interval until its status is terminal.
    ///
    /// Status is monotonic: once `completed` or `failed` it never
    /// reverts, so the first terminal snapshot is returned as-is.
    ///
    /// # Errors
    ///
    /// Propagates any [`IntakeError`] from the underlying status lookups.
    pub async fn await_terminal(
        &self,
        job_id: JobId,
        poll_interval: Duration,
    ) -> IntakeResult<JobStatusView> {
        loop {
            let view = self.job_status(job_id).await?;
            if view.job().status().is_terminal() {
                return Ok(view);
            }
            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Runs extraction, sanitization, cycle detection, and batch storage
    /// for one freshly inserted job.
    async fn run_pipeline(&self, job: &Job) -> Result<JobOutcome, PipelineFailure> {
        let extracted = self.extractor.extract(job.transcript()).await?;
        let sanitized = sanitize_dependencies(extracted);
        let analysis = detect_cycles(sanitized);
        let has_cycles = analysis.has_cycles();
        let tasks = analysis.into_tasks();

        let records: Vec<TaskRecord> = tasks
            .iter()
            .map(|task| TaskRecord::from_extracted(job.id(), task, &*self.clock))
            .collect();
        self.repository.insert_tasks(&records).await?;

        Ok(JobOutcome::new(tasks, has_cycles))
    }
}
