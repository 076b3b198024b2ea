//! Shared test helpers for in-memory pipeline integration tests.

use std::io;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use stenograph::taskgraph::{
    adapters::memory::{FixtureExtractor, InMemoryJobRepository},
    services::{JobStatusView, SubmissionReceipt, TranscriptIntakeService},
};
use tokio::runtime::Runtime;

/// Intake service wired to the in-memory adapters.
pub type InMemoryService =
    TranscriptIntakeService<InMemoryJobRepository, FixtureExtractor, DefaultClock>;

/// Canned model output describing a three-task release chain.
pub const RELEASE_CHAIN_OUTPUT: &str = r#"```json
{
  "tasks": [
    {"id": "TASK-1", "description": "Cut the release branch", "priority": "P0", "dependencies": [], "assigned_to": "Alice"},
    {"id": "TASK-2", "description": "Run the regression suite", "priority": "P1", "dependencies": ["TASK-1"], "assigned_to": "Bob"},
    {"id": "TASK-3", "description": "Publish the release notes", "priority": "P2", "dependencies": ["TASK-2", "TASK-1"]}
  ]
}
```"#;

/// Canned model output where two tasks wait on each other.
pub const DEADLOCKED_OUTPUT: &str = r#"{
  "tasks": [
    {"id": "TASK-A", "description": "Sign off on the design", "priority": "P1", "dependencies": ["TASK-B"]},
    {"id": "TASK-B", "description": "Update the design doc", "priority": "P1", "dependencies": ["TASK-A"]},
    {"id": "TASK-C", "description": "Order the hardware", "priority": "P2", "dependencies": []}
  ]
}"#;

/// Provides a tokio runtime for async operations in tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
#[fixture]
pub fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Builds an intake service whose extractor replays the given output.
pub fn service_with(output: &str) -> InMemoryService {
    TranscriptIntakeService::new(
        Arc::new(InMemoryJobRepository::new()),
        Arc::new(FixtureExtractor::returning(output)),
        Arc::new(DefaultClock),
    )
}

/// Submits a transcript and returns the receipt.
pub fn submit(rt: &Runtime, service: &InMemoryService, transcript: &str) -> SubmissionReceipt {
    rt.block_on(service.submit(transcript))
        .expect("submission succeeds")
}

/// Fetches the status snapshot for a submitted job.
pub fn fetch(rt: &Runtime, service: &InMemoryService, receipt: &SubmissionReceipt) -> JobStatusView {
    rt.block_on(service.job_status(receipt.job_id()))
        .expect("job exists")
}
