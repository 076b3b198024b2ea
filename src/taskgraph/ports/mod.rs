//! Port contracts for the task-graph pipeline.
//!
//! Ports define infrastructure-agnostic interfaces for the two external
//! collaborators: the extraction backend that proposes candidate tasks and
//! the storage layer that persists jobs and task records.

pub mod extractor;
pub mod repository;

pub use extractor::{
    ExtractionError, ExtractionPayload, ExtractionPrompt, ExtractionResult, TaskExtractor,
};
pub use repository::{JobRepository, JobRepositoryError, JobRepositoryResult};
