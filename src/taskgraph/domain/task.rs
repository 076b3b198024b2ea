//! Extracted and persisted task shapes.

use super::{JobId, ParsePriorityError, TaskGraphDomainError, TaskKey, TaskRecordId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Urgency band assigned during extraction.
///
/// Ordered from most to least urgent, so `Priority::P0 < Priority::P3`
/// sorts critical work first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Priority {
    /// Critical blocker.
    P0,
    /// High.
    P1,
    /// Medium.
    P2,
    /// Low.
    P3,
}

impl Priority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::P0 => "P0",
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "P0" => Ok(Self::P0),
            "P1" => Ok(Self::P1),
            "P2" => Ok(Self::P2),
            "P3" => Ok(Self::P3),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Candidate task produced by transcript extraction, before storage.
///
/// Dependencies reference other tasks in the same batch by [`TaskKey`] and
/// may be invalid until the batch passes through dependency sanitization.
/// The cycle flag is derived by cycle detection only; any value an
/// extraction backend emits for it is discarded during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedTask {
    id: TaskKey,
    description: String,
    priority: Priority,
    #[serde(default)]
    dependencies: Vec<TaskKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    assigned_to: Option<String>,
    #[serde(default, skip_deserializing)]
    has_cycle: bool,
}

impl ExtractedTask {
    /// Creates an extracted task with required fields.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphDomainError::EmptyTaskDescription`] when the
    /// description is empty after trimming.
    pub fn new(
        id: TaskKey,
        description: impl Into<String>,
        priority: Priority,
    ) -> Result<Self, TaskGraphDomainError> {
        let raw = description.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(TaskGraphDomainError::EmptyTaskDescription);
        }

        Ok(Self {
            id,
            description: normalized.to_owned(),
            priority,
            dependencies: Vec::new(),
            assigned_to: None,
            has_cycle: false,
        })
    }

    /// Sets the dependency list.
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: impl IntoIterator<Item = TaskKey>) -> Self {
        self.dependencies = dependencies.into_iter().collect();
        self
    }

    /// Sets the assignee name.
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        let value = assignee.into();
        let normalized = value.trim();
        self.assigned_to = (!normalized.is_empty()).then_some(normalized.to_owned());
        self
    }

    /// Sets the derived cycle flag.
    #[must_use]
    pub fn with_cycle_flag(mut self, has_cycle: bool) -> Self {
        self.has_cycle = has_cycle;
        self
    }

    /// Returns the task key.
    #[must_use]
    pub const fn id(&self) -> &TaskKey {
        &self.id
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the task priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the dependency keys in their original order.
    #[must_use]
    pub fn dependencies(&self) -> &[TaskKey] {
        &self.dependencies
    }

    /// Returns the assignee name, if any.
    #[must_use]
    pub fn assigned_to(&self) -> Option<&str> {
        self.assigned_to.as_deref()
    }

    /// Returns whether the task participates in a dependency cycle.
    #[must_use]
    pub const fn has_cycle(&self) -> bool {
        self.has_cycle
    }
}

/// Persisted task row owned by one job.
///
/// `is_completed` is the only field mutable after creation; everything else
/// is fixed when the batch is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    id: TaskRecordId,
    job_id: JobId,
    key: TaskKey,
    description: String,
    priority: Priority,
    dependencies: Vec<TaskKey>,
    has_cycle: bool,
    is_completed: bool,
    assigned_to: Option<String>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted record identifier.
    pub id: TaskRecordId,
    /// Persisted owning job identifier.
    pub job_id: JobId,
    /// Persisted task key.
    pub key: TaskKey,
    /// Persisted description.
    pub description: String,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted dependency keys.
    pub dependencies: Vec<TaskKey>,
    /// Persisted cycle flag.
    pub has_cycle: bool,
    /// Persisted completion flag.
    pub is_completed: bool,
    /// Persisted assignee, if any.
    pub assigned_to: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl TaskRecord {
    /// Creates a record for a freshly extracted task.
    ///
    /// The record starts incomplete and carries the cycle flag the detector
    /// assigned to the extracted task.
    #[must_use]
    pub fn from_extracted(job_id: JobId, task: &ExtractedTask, clock: &impl Clock) -> Self {
        Self {
            id: TaskRecordId::new(),
            job_id,
            key: task.id().clone(),
            description: task.description().to_owned(),
            priority: task.priority(),
            dependencies: task.dependencies().to_vec(),
            has_cycle: task.has_cycle(),
            is_completed: false,
            assigned_to: task.assigned_to().map(str::to_owned),
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a record from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            job_id: data.job_id,
            key: data.key,
            description: data.description,
            priority: data.priority,
            dependencies: data.dependencies,
            has_cycle: data.has_cycle,
            is_completed: data.is_completed,
            assigned_to: data.assigned_to,
            created_at: data.created_at,
        }
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn id(&self) -> TaskRecordId {
        self.id
    }

    /// Returns the owning job identifier.
    #[must_use]
    pub const fn job_id(&self) -> JobId {
        self.job_id
    }

    /// Returns the task key.
    #[must_use]
    pub const fn key(&self) -> &TaskKey {
        &self.key
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the task priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the dependency keys in their original order.
    #[must_use]
    pub fn dependencies(&self) -> &[TaskKey] {
        &self.dependencies
    }

    /// Returns whether the task participates in a dependency cycle.
    #[must_use]
    pub const fn has_cycle(&self) -> bool {
        self.has_cycle
    }

    /// Returns whether the user has marked the task done.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.is_completed
    }

    /// Returns the assignee name, if any.
    #[must_use]
    pub fn assigned_to(&self) -> Option<&str> {
        self.assigned_to.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Sets the completion flag.
    pub const fn set_completion(&mut self, is_completed: bool) {
        self.is_completed = is_completed;
    }
}
