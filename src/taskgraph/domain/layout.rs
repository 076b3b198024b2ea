//! Topological level assignment for graph presentation.
//!
//! A task with no dependencies sits at level 0; everything else sits one
//! level below its deepest dependency. Levels are cosmetic: on cyclic input
//! the walk guard returns 0 for a revisited key and the result is
//! best-effort only; the authoritative cycle flag comes from cycle
//! detection.

use super::{TaskKey, TaskRecord};
use std::collections::{HashMap, HashSet};

/// Assigns a presentation level to every record in the batch.
#[must_use]
pub fn assign_levels(records: &[TaskRecord]) -> HashMap<TaskKey, usize> {
    let by_key: HashMap<&TaskKey, &TaskRecord> = records
        .iter()
        .map(|record| (record.key(), record))
        .collect();
    let mut levels: HashMap<TaskKey, usize> = HashMap::with_capacity(records.len());
    for record in records {
        let mut walked = HashSet::new();
        level_of(record.key(), &by_key, &mut levels, &mut walked);
    }
    levels
}

/// Groups task keys into rows by level, shallowest first, preserving batch
/// order within each row.
#[must_use]
pub fn level_rows(records: &[TaskRecord]) -> Vec<Vec<TaskKey>> {
    if records.is_empty() {
        return Vec::new();
    }
    let levels = assign_levels(records);
    let deepest = levels.values().copied().max().unwrap_or(0);
    let mut rows: Vec<Vec<TaskKey>> = vec![Vec::new(); deepest + 1];
    for record in records {
        let level = levels.get(record.key()).copied().unwrap_or(0);
        if let Some(row) = rows.get_mut(level) {
            row.push(record.key().clone());
        }
    }
    rows
}

/// Memoized recursive level computation.
///
/// `walked` tracks keys on the current walk so that cyclic input
/// terminates: a key revisited within the same walk contributes level 0.
fn level_of(
    key: &TaskKey,
    by_key: &HashMap<&TaskKey, &TaskRecord>,
    levels: &mut HashMap<TaskKey, usize>,
    walked: &mut HashSet<TaskKey>,
) -> usize {
    if walked.contains(key) {
        return 0;
    }
    if let Some(&level) = levels.get(key) {
        return level;
    }
    walked.insert(key.clone());

    let level = by_key.get(key).map_or(0, |record| {
        record
            .dependencies()
            .iter()
            .map(|dep| level_of(dep, by_key, levels, walked) + 1)
            .max()
            .unwrap_or(0)
    });
    levels.insert(key.clone(), level);
    level
}
