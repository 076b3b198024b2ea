//! Derived board behaviour over fetched job snapshots.

use std::io;

use rstest::rstest;
use stenograph::taskgraph::domain::{TaskKey, TaskStatus};
use tokio::runtime::Runtime;

use super::helpers::{
    DEADLOCKED_OUTPUT, RELEASE_CHAIN_OUTPUT, fetch, runtime, service_with, submit,
};

fn key(value: &str) -> TaskKey {
    TaskKey::new(value).expect("valid task key")
}

#[rstest]
fn board_levels_follow_the_dependency_chain(runtime: io::Result<Runtime>) {
    let rt = runtime.expect("runtime builds");
    let service = service_with(RELEASE_CHAIN_OUTPUT);
    let receipt = submit(&rt, &service, "Sequence the release work.");

    let board = fetch(&rt, &service, &receipt).into_board();
    let levels = board.levels();

    assert_eq!(levels.get(&key("TASK-1")), Some(&0));
    assert_eq!(levels.get(&key("TASK-2")), Some(&1));
    assert_eq!(levels.get(&key("TASK-3")), Some(&2));
}

#[rstest]
fn toggling_through_the_board_reflows_statuses(runtime: io::Result<Runtime>) {
    let rt = runtime.expect("runtime builds");
    let service = service_with(RELEASE_CHAIN_OUTPUT);
    let receipt = submit(&rt, &service, "Work the chain from the top.");

    let mut board = fetch(&rt, &service, &receipt).into_board();
    assert_eq!(board.status_of(&key("TASK-2")), Some(TaskStatus::Blocked));

    board.toggle(&key("TASK-1"));
    assert_eq!(board.status_of(&key("TASK-2")), Some(TaskStatus::Ready));
    assert_eq!(board.status_of(&key("TASK-3")), Some(TaskStatus::Blocked));

    board.toggle(&key("TASK-2"));
    assert_eq!(board.status_of(&key("TASK-3")), Some(TaskStatus::Ready));

    let counts = board.counts();
    assert_eq!(counts.completed, 2);
    assert_eq!(counts.ready, 1);
    assert_eq!(counts.blocked, 0);
}

#[rstest]
fn deadlocked_tasks_surface_as_errors_not_failures(runtime: io::Result<Runtime>) {
    let rt = runtime.expect("runtime builds");
    let service = service_with(DEADLOCKED_OUTPUT);
    let receipt = submit(&rt, &service, "The design doc and sign-off wait on each other.");

    let view = fetch(&rt, &service, &receipt);
    assert!(view.has_cycles());

    let board = view.into_board();
    assert!(board.has_cycles());
    assert_eq!(board.status_of(&key("TASK-A")), Some(TaskStatus::Error));
    assert_eq!(board.status_of(&key("TASK-B")), Some(TaskStatus::Error));
    assert_eq!(board.status_of(&key("TASK-C")), Some(TaskStatus::Ready));

    let counts = board.counts();
    assert_eq!(counts.error, 2);
    assert_eq!(counts.ready, 1);
}
