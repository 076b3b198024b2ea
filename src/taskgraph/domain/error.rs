//! Error types for task-graph domain validation and parsing.

use super::JobStatus;
use thiserror::Error;

/// Errors returned while constructing or mutating domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskGraphDomainError {
    /// The transcript is empty after trimming.
    #[error("transcript must not be empty")]
    EmptyTranscript,

    /// The task key is empty after trimming.
    #[error("task key must not be empty")]
    EmptyTaskKey,

    /// The task description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyTaskDescription,

    /// The fingerprint value is not a 64-digit lowercase hex string.
    #[error("invalid transcript fingerprint '{0}', expected 64 lowercase hex digits")]
    InvalidFingerprint(String),

    /// The requested job status transition is not permitted.
    #[error("invalid job status transition from {from} to {to}")]
    InvalidStatusTransition {
        /// Status the job currently holds.
        from: JobStatus,
        /// Status the transition attempted to reach.
        to: JobStatus,
    },
}

/// Error returned while parsing job statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown job status: {0}")]
pub struct ParseJobStatusError(pub String);

/// Error returned while parsing task priorities.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParsePriorityError(pub String);
