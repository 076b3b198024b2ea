//! Job aggregate root and lifecycle state machine.

use super::{
    ExtractedTask, JobId, ParseJobStatusError, TaskGraphDomainError, TranscriptFingerprint,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Job lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job has been accepted but processing has not started.
    Pending,
    /// Extraction and graph analysis are in flight.
    Processing,
    /// The task batch has been stored and the result payload recorded.
    Completed,
    /// Extraction or storage failed; the error message is recorded.
    Failed,
}

impl JobStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Returns whether a transition to `next` is permitted.
    ///
    /// The lifecycle is `pending → processing → completed | failed`;
    /// terminal states admit nothing, including self-transitions.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Processing, Self::Completed | Self::Failed)
        )
    }

    /// Returns whether the status is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl TryFrom<&str> for JobStatus {
    type Error = ParseJobStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseJobStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result payload recorded when a job completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOutcome {
    tasks: Vec<ExtractedTask>,
    has_cycles: bool,
}

impl JobOutcome {
    /// Creates a result payload from the analysed task batch.
    #[must_use]
    pub const fn new(tasks: Vec<ExtractedTask>, has_cycles: bool) -> Self {
        Self { tasks, has_cycles }
    }

    /// Returns the final task batch.
    #[must_use]
    pub fn tasks(&self) -> &[ExtractedTask] {
        &self.tasks
    }

    /// Returns whether any task in the batch participates in a cycle.
    #[must_use]
    pub const fn has_cycles(&self) -> bool {
        self.has_cycles
    }
}

/// Job aggregate root.
///
/// A job owns one transcript and the task batch extracted from it. The
/// result payload is present only when the job is completed, and the error
/// message only when it has failed; the guarded transition methods keep
/// those invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    id: JobId,
    fingerprint: TranscriptFingerprint,
    original_transcript: String,
    status: JobStatus,
    result: Option<JobOutcome>,
    error_message: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted job aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedJobData {
    /// Persisted job identifier.
    pub id: JobId,
    /// Persisted transcript fingerprint.
    pub fingerprint: TranscriptFingerprint,
    /// Persisted raw transcript text.
    pub original_transcript: String,
    /// Persisted lifecycle status.
    pub status: JobStatus,
    /// Persisted result payload, if the job completed.
    pub result: Option<JobOutcome>,
    /// Persisted error message, if the job failed.
    pub error_message: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Accepts a raw transcript and creates a pending job for it.
    ///
    /// The transcript is stored verbatim; the fingerprint is computed over
    /// its normalized form.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphDomainError::EmptyTranscript`] when the
    /// transcript is empty after trimming, before any state is created.
    pub fn intake(
        transcript: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, TaskGraphDomainError> {
        let raw = transcript.into();
        if raw.trim().is_empty() {
            return Err(TaskGraphDomainError::EmptyTranscript);
        }

        let fingerprint = TranscriptFingerprint::of(&raw);
        let timestamp = clock.utc();
        Ok(Self {
            id: JobId::new(),
            fingerprint,
            original_transcript: raw,
            status: JobStatus::Pending,
            result: None,
            error_message: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a job from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedJobData) -> Self {
        Self {
            id: data.id,
            fingerprint: data.fingerprint,
            original_transcript: data.original_transcript,
            status: data.status,
            result: data.result,
            error_message: data.error_message,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the job identifier.
    #[must_use]
    pub const fn id(&self) -> JobId {
        self.id
    }

    /// Returns the transcript fingerprint.
    #[must_use]
    pub const fn fingerprint(&self) -> &TranscriptFingerprint {
        &self.fingerprint
    }

    /// Returns the raw transcript text.
    #[must_use]
    pub fn transcript(&self) -> &str {
        &self.original_transcript
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> JobStatus {
        self.status
    }

    /// Returns the result payload, present only for completed jobs.
    #[must_use]
    pub const fn result(&self) -> Option<&JobOutcome> {
        self.result.as_ref()
    }

    /// Returns the error message, present only for failed jobs.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the job into `processing`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphDomainError::InvalidStatusTransition`] unless the
    /// job is `pending`.
    pub fn begin_processing(&mut self, clock: &impl Clock) -> Result<(), TaskGraphDomainError> {
        self.transition_to(JobStatus::Processing, clock)
    }

    /// Completes the job, recording the result payload.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphDomainError::InvalidStatusTransition`] unless the
    /// job is `processing`.
    pub fn complete(
        &mut self,
        outcome: JobOutcome,
        clock: &impl Clock,
    ) -> Result<(), TaskGraphDomainError> {
        self.transition_to(JobStatus::Completed, clock)?;
        self.result = Some(outcome);
        self.error_message = None;
        Ok(())
    }

    /// Fails the job, recording a human-readable message.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphDomainError::InvalidStatusTransition`] unless the
    /// job is `processing`.
    pub fn fail(
        &mut self,
        message: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), TaskGraphDomainError> {
        self.transition_to(JobStatus::Failed, clock)?;
        self.error_message = Some(message.into());
        self.result = None;
        Ok(())
    }

    /// Applies a guarded status transition and touches `updated_at`.
    fn transition_to(
        &mut self,
        next: JobStatus,
        clock: &impl Clock,
    ) -> Result<(), TaskGraphDomainError> {
        if !self.status.can_transition_to(next) {
            return Err(TaskGraphDomainError::InvalidStatusTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = clock.utc();
        Ok(())
    }
}
