//! Derived task readiness and the session-side completion state.

use super::{TaskKey, TaskRecord, assign_levels};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Runtime readiness of one task, derived from the completion set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// At least one dependency has not been completed.
    Blocked,
    /// Every dependency is completed; the task can start.
    Ready,
    /// The task itself has been marked done.
    Completed,
    /// The task participates in a dependency cycle.
    Error,
}

impl TaskStatus {
    /// Returns the canonical presentation string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blocked => "blocked",
            Self::Ready => "ready",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }
}

/// Flat mutable set of completed task keys for one editing session.
///
/// Completion is sticky per task: membership is toggled directly and never
/// re-validated against ancestors, so un-completing a dependency leaves an
/// independently completed dependent in the set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionSet(HashSet<TaskKey>);

impl CompletionSet {
    /// Creates an empty completion set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a completion set from persisted completion flags.
    #[must_use]
    pub fn from_records(records: &[TaskRecord]) -> Self {
        Self(
            records
                .iter()
                .filter(|record| record.is_completed())
                .map(|record| record.key().clone())
                .collect(),
        )
    }

    /// Returns whether the key is marked complete.
    #[must_use]
    pub fn contains(&self, key: &TaskKey) -> bool {
        self.0.contains(key)
    }

    /// Marks the key complete. Returns `true` if it was newly added.
    pub fn insert(&mut self, key: TaskKey) -> bool {
        self.0.insert(key)
    }

    /// Clears the key. Returns `true` if it was present.
    pub fn remove(&mut self, key: &TaskKey) -> bool {
        self.0.remove(key)
    }

    /// Flips membership of the key and returns the resulting state:
    /// `true` when the key is now complete.
    pub fn toggle(&mut self, key: &TaskKey) -> bool {
        if self.0.remove(key) {
            false
        } else {
            self.0.insert(key.clone());
            true
        }
    }

    /// Returns the number of completed keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether no key is marked complete.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Derives the runtime status of one task record.
///
/// Rules in order: a flagged cycle participant is always `error`, even when
/// its key is in the completion set; the cycle state is a terminal display
/// state that overrides completion. Otherwise a completed key is
/// `completed`, a task whose dependencies are all completed (vacuously true
/// for none) is `ready`, and anything else is `blocked`.
#[must_use]
pub fn derive_status(record: &TaskRecord, completions: &CompletionSet) -> TaskStatus {
    if record.has_cycle() {
        return TaskStatus::Error;
    }
    if completions.contains(record.key()) {
        return TaskStatus::Completed;
    }
    let all_deps_completed = record
        .dependencies()
        .iter()
        .all(|dep| completions.contains(dep));
    if all_deps_completed {
        TaskStatus::Ready
    } else {
        TaskStatus::Blocked
    }
}

/// Transient per-render view of a task record plus its derived status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskNode<'a> {
    record: &'a TaskRecord,
    status: TaskStatus,
}

impl<'a> TaskNode<'a> {
    /// Returns the underlying record.
    #[must_use]
    pub const fn record(&self) -> &'a TaskRecord {
        self.record
    }

    /// Returns the derived status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the task key.
    #[must_use]
    pub const fn key(&self) -> &'a TaskKey {
        self.record.key()
    }
}

/// Per-status totals for one board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    /// Tasks whose dependencies are all satisfied.
    pub ready: usize,
    /// Tasks waiting on at least one dependency.
    pub blocked: usize,
    /// Tasks marked done.
    pub completed: usize,
    /// Tasks flagged as cycle participants.
    pub error: usize,
}

/// One editing session's task records plus their completion state.
///
/// The board recomputes every derived view on demand; nothing derived is
/// stored, so a completion toggle is immediately reflected by the next
/// [`TaskBoard::nodes`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskBoard {
    records: Vec<TaskRecord>,
    completions: CompletionSet,
}

impl TaskBoard {
    /// Creates a board for a job's records, seeding completion state from
    /// the persisted flags.
    #[must_use]
    pub fn new(records: Vec<TaskRecord>) -> Self {
        let completions = CompletionSet::from_records(&records);
        Self {
            records,
            completions,
        }
    }

    /// Returns the records in storage order.
    #[must_use]
    pub fn records(&self) -> &[TaskRecord] {
        &self.records
    }

    /// Returns the current completion set.
    #[must_use]
    pub const fn completions(&self) -> &CompletionSet {
        &self.completions
    }

    /// Flips completion of the key and returns the resulting state.
    pub fn toggle(&mut self, key: &TaskKey) -> bool {
        self.completions.toggle(key)
    }

    /// Returns a freshly derived node view for every record.
    #[must_use]
    pub fn nodes(&self) -> Vec<TaskNode<'_>> {
        self.records
            .iter()
            .map(|record| TaskNode {
                record,
                status: derive_status(record, &self.completions),
            })
            .collect()
    }

    /// Returns the derived status of the key, if it names a record.
    #[must_use]
    pub fn status_of(&self, key: &TaskKey) -> Option<TaskStatus> {
        self.records
            .iter()
            .find(|record| record.key() == key)
            .map(|record| derive_status(record, &self.completions))
    }

    /// Returns per-status totals across the board.
    #[must_use]
    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for node in self.nodes() {
            match node.status() {
                TaskStatus::Ready => counts.ready += 1,
                TaskStatus::Blocked => counts.blocked += 1,
                TaskStatus::Completed => counts.completed += 1,
                TaskStatus::Error => counts.error += 1,
            }
        }
        counts
    }

    /// Returns whether any record is a flagged cycle participant.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        self.records.iter().any(TaskRecord::has_cycle)
    }

    /// Returns the topological level of every record for presentation.
    #[must_use]
    pub fn levels(&self) -> HashMap<TaskKey, usize> {
        assign_levels(&self.records)
    }
}
