//! Application services orchestrating the task-graph pipeline.

mod intake;

pub use intake::{
    IntakeError, IntakeResult, JobStatusView, SubmissionReceipt, TranscriptIntakeService,
};
