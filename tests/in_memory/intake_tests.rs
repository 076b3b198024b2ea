//! End-to-end intake flows through the public service API.

use std::io;
use std::time::Duration;

use rstest::rstest;
use stenograph::taskgraph::domain::{JobStatus, TaskKey, TaskRecord};
use tokio::runtime::Runtime;

use super::helpers::{RELEASE_CHAIN_OUTPUT, fetch, runtime, service_with, submit};

#[rstest]
fn transcript_round_trips_into_a_stored_task_graph(runtime: io::Result<Runtime>) {
    let rt = runtime.expect("runtime builds");
    let service = service_with(RELEASE_CHAIN_OUTPUT);

    let receipt = submit(
        &rt,
        &service,
        "Alice: branch first, regression next, notes last.",
    );
    assert_eq!(receipt.status(), JobStatus::Completed);

    let view = rt
        .block_on(service.await_terminal(receipt.job_id(), Duration::from_millis(10)))
        .expect("job settles");
    assert_eq!(view.job().status(), JobStatus::Completed);
    assert!(!view.has_cycles());

    let keys: Vec<&str> = view
        .tasks()
        .iter()
        .map(|record| record.key().as_str())
        .collect();
    assert_eq!(keys, ["TASK-1", "TASK-2", "TASK-3"]);
    assert!(view.tasks().iter().all(|record| !record.is_completed()));
}

#[rstest]
fn resubmitting_a_normalized_variant_reuses_the_job(runtime: io::Result<Runtime>) {
    let rt = runtime.expect("runtime builds");
    let service = service_with(RELEASE_CHAIN_OUTPUT);

    let first = submit(&rt, &service, "Plan the Friday release.");
    let second = submit(&rt, &service, "\n  plan the friday RELEASE.  ");

    assert!(!first.cached());
    assert!(second.cached());
    assert_eq!(second.job_id(), first.job_id());
}

#[rstest]
fn completion_persists_across_fetches(runtime: io::Result<Runtime>) {
    let rt = runtime.expect("runtime builds");
    let service = service_with(RELEASE_CHAIN_OUTPUT);
    let receipt = submit(&rt, &service, "Bob: walk the release checklist.");

    let view = fetch(&rt, &service, &receipt);
    let branch_cut = view
        .tasks()
        .iter()
        .find(|record| record.key().as_str() == "TASK-1")
        .expect("TASK-1 stored");

    let updated = rt
        .block_on(service.set_task_completion(branch_cut.id(), true))
        .expect("completion persists");
    assert!(updated.is_completed());

    let refreshed = fetch(&rt, &service, &receipt);
    let stored_flags: Vec<bool> = refreshed
        .tasks()
        .iter()
        .map(TaskRecord::is_completed)
        .collect();
    assert_eq!(stored_flags, [true, false, false]);

    let key = TaskKey::new("TASK-2").expect("valid key");
    let board = refreshed.into_board();
    assert_eq!(
        board.status_of(&key).map(|status| status.as_str()),
        Some("ready")
    );
}
