//! Thread-safe in-memory job repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::taskgraph::{
    domain::{Job, JobId, TaskRecord, TaskRecordId, TranscriptFingerprint},
    ports::{JobRepository, JobRepositoryError, JobRepositoryResult},
};

/// In-memory repository enforcing the same constraints a database would:
/// unique job identifiers, a unique transcript fingerprint per job, and
/// all-or-nothing task batch insertion.
#[derive(Debug, Clone, Default)]
pub struct InMemoryJobRepository {
    state: Arc<RwLock<InMemoryJobState>>,
}

#[derive(Debug, Default)]
struct InMemoryJobState {
    jobs: HashMap<JobId, Job>,
    fingerprint_index: HashMap<TranscriptFingerprint, JobId>,
    tasks: HashMap<TaskRecordId, TaskRecord>,
    /// Record identifiers per job in insertion order.
    job_tasks: HashMap<JobId, Vec<TaskRecordId>>,
}

impl InMemoryJobRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn insert_job(&self, job: &Job) -> JobRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            JobRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.jobs.contains_key(&job.id()) {
            return Err(JobRepositoryError::DuplicateJob(job.id()));
        }
        if state.fingerprint_index.contains_key(job.fingerprint()) {
            return Err(JobRepositoryError::DuplicateFingerprint(
                job.fingerprint().clone(),
            ));
        }

        state
            .fingerprint_index
            .insert(job.fingerprint().clone(), job.id());
        state.jobs.insert(job.id(), job.clone());
        Ok(())
    }

    async fn update_job(&self, job: &Job) -> JobRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            JobRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if !state.jobs.contains_key(&job.id()) {
            return Err(JobRepositoryError::JobNotFound(job.id()));
        }
        state.jobs.insert(job.id(), job.clone());
        Ok(())
    }

    async fn find_job_by_id(&self, id: JobId) -> JobRepositoryResult<Option<Job>> {
        let state = self.state.read().map_err(|err| {
            JobRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.jobs.get(&id).cloned())
    }

    async fn find_job_by_fingerprint(
        &self,
        fingerprint: &TranscriptFingerprint,
    ) -> JobRepositoryResult<Option<Job>> {
        let state = self.state.read().map_err(|err| {
            JobRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let job = state
            .fingerprint_index
            .get(fingerprint)
            .and_then(|job_id| state.jobs.get(job_id))
            .cloned();
        Ok(job)
    }

    async fn insert_tasks(&self, records: &[TaskRecord]) -> JobRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            JobRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;

        // Validate the whole batch before touching state so a rejected
        // record leaves nothing half-written.
        for record in records {
            if !state.jobs.contains_key(&record.job_id()) {
                return Err(JobRepositoryError::JobNotFound(record.job_id()));
            }
            if state.tasks.contains_key(&record.id()) {
                return Err(JobRepositoryError::DuplicateTask(record.id()));
            }
        }

        for record in records {
            state
                .job_tasks
                .entry(record.job_id())
                .or_default()
                .push(record.id());
            state.tasks.insert(record.id(), record.clone());
        }
        Ok(())
    }

    async fn list_tasks_by_job(&self, job_id: JobId) -> JobRepositoryResult<Vec<TaskRecord>> {
        let state = self.state.read().map_err(|err| {
            JobRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let records = state
            .job_tasks
            .get(&job_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.tasks.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();
        Ok(records)
    }

    async fn set_task_completion(
        &self,
        task_id: TaskRecordId,
        is_completed: bool,
    ) -> JobRepositoryResult<TaskRecord> {
        let mut state = self.state.write().map_err(|err| {
            JobRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let record = state
            .tasks
            .get_mut(&task_id)
            .ok_or(JobRepositoryError::TaskNotFound(task_id))?;
        record.set_completion(is_completed);
        Ok(record.clone())
    }
}
