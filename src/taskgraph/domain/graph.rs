//! Dependency sanitization and cycle detection over extracted task batches.
//!
//! Both passes treat the batch as a directed graph where an edge
//! `dep -> task` exists for every entry in `task.dependencies` (the
//! dependency must complete before the dependent).

use super::{ExtractedTask, TaskKey};
use std::collections::{HashMap, HashSet};

/// Removes dependency references that point outside the batch.
///
/// Each task's dependency list is filtered to keys present in the batch,
/// preserving the original relative order of the survivors. No other field
/// is touched. Invalid references are dropped silently (lenient repair,
/// not validation), so the pass always succeeds and is idempotent.
#[must_use]
pub fn sanitize_dependencies(tasks: Vec<ExtractedTask>) -> Vec<ExtractedTask> {
    let valid_keys: HashSet<TaskKey> = tasks.iter().map(|task| task.id().clone()).collect();
    tasks
        .into_iter()
        .map(|task| {
            let surviving: Vec<TaskKey> = task
                .dependencies()
                .iter()
                .filter(|dep| valid_keys.contains(*dep))
                .cloned()
                .collect();
            task.with_dependencies(surviving)
        })
        .collect()
}

/// Task batch with every cycle participant flagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleAnalysis {
    tasks: Vec<ExtractedTask>,
    has_cycles: bool,
}

impl CycleAnalysis {
    /// Returns the analysed batch, each task carrying its cycle flag.
    #[must_use]
    pub fn tasks(&self) -> &[ExtractedTask] {
        &self.tasks
    }

    /// Consumes the analysis, yielding the flagged batch.
    #[must_use]
    pub fn into_tasks(self) -> Vec<ExtractedTask> {
        self.tasks
    }

    /// Returns whether at least one task was flagged.
    #[must_use]
    pub const fn has_cycles(&self) -> bool {
        self.has_cycles
    }
}

/// Traversal state shared across one batch walk.
struct CycleWalk<'a> {
    adjacency: &'a [Vec<usize>],
    visited: Vec<bool>,
    on_stack: Vec<bool>,
    path: Vec<usize>,
    in_cycle: Vec<bool>,
}

impl CycleWalk<'_> {
    fn visit(&mut self, node: usize) {
        self.set(node, Mark::Visited);
        self.set(node, Mark::OnStack);
        self.path.push(node);

        for index in 0..self.neighbour_count(node) {
            let Some(dep) = self.neighbour(node, index) else {
                continue;
            };
            if !self.is(dep, Mark::Visited) {
                self.visit(dep);
            } else if self.is(dep, Mark::OnStack) {
                self.mark_span(dep);
            }
        }

        self.path.pop();
        self.clear_on_stack(node);
    }

    /// Flags every node on the current path from the first occurrence of
    /// `entry` onward: the cycle span closing back at `entry`.
    fn mark_span(&mut self, entry: usize) {
        let Some(start) = self.path.iter().position(|&node| node == entry) else {
            return;
        };
        let span: Vec<usize> = self.path.iter().skip(start).copied().collect();
        for node in span {
            self.set(node, Mark::InCycle);
        }
    }

    fn neighbour_count(&self, node: usize) -> usize {
        self.adjacency.get(node).map_or(0, Vec::len)
    }

    fn neighbour(&self, node: usize, index: usize) -> Option<usize> {
        self.adjacency.get(node).and_then(|deps| deps.get(index)).copied()
    }

    fn is(&self, node: usize, mark: Mark) -> bool {
        let flags = match mark {
            Mark::Visited => &self.visited,
            Mark::OnStack => &self.on_stack,
            Mark::InCycle => &self.in_cycle,
        };
        flags.get(node).copied().unwrap_or(false)
    }

    fn set(&mut self, node: usize, mark: Mark) {
        let flags = match mark {
            Mark::Visited => &mut self.visited,
            Mark::OnStack => &mut self.on_stack,
            Mark::InCycle => &mut self.in_cycle,
        };
        if let Some(flag) = flags.get_mut(node) {
            *flag = true;
        }
    }

    fn clear_on_stack(&mut self, node: usize) {
        if let Some(flag) = self.on_stack.get_mut(node) {
            *flag = false;
        }
    }
}

#[derive(Clone, Copy)]
enum Mark {
    Visited,
    OnStack,
    InCycle,
}

/// Finds every task participating in a dependency cycle and flags it.
///
/// Depth-first traversal starts from each unvisited task in batch order, so
/// results are deterministic for a given input. Nodes leave the recursion
/// stack on backtrack but stay visited permanently, and traversal continues
/// after a cycle is found: all cycles in the batch are marked in a single
/// pass proportional to nodes plus edges. A task depending on itself is a
/// one-node cycle. Tasks outside every cycle keep their flag clear,
/// including tasks that merely depend on a flagged task.
///
/// Dependency references outside the batch are expected to have been
/// removed by [`sanitize_dependencies`]; any that remain are ignored.
#[must_use]
pub fn detect_cycles(tasks: Vec<ExtractedTask>) -> CycleAnalysis {
    let node_count = tasks.len();
    let index_of: HashMap<&TaskKey, usize> = tasks
        .iter()
        .enumerate()
        .map(|(index, task)| (task.id(), index))
        .collect();
    let adjacency: Vec<Vec<usize>> = tasks
        .iter()
        .map(|task| {
            task.dependencies()
                .iter()
                .filter_map(|dep| index_of.get(dep).copied())
                .collect()
        })
        .collect();

    let mut walk = CycleWalk {
        adjacency: &adjacency,
        visited: vec![false; node_count],
        on_stack: vec![false; node_count],
        path: Vec::new(),
        in_cycle: vec![false; node_count],
    };
    for node in 0..node_count {
        if !walk.is(node, Mark::Visited) {
            walk.visit(node);
        }
    }

    let in_cycle = walk.in_cycle;
    let has_cycles = in_cycle.iter().any(|&flagged| flagged);
    let flagged_tasks = tasks
        .into_iter()
        .zip(in_cycle)
        .map(|(task, flagged)| task.with_cycle_flag(flagged))
        .collect();

    CycleAnalysis {
        tasks: flagged_tasks,
        has_cycles,
    }
}
