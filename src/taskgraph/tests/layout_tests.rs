//! Unit tests for topological level assignment.

use super::fixtures::{extracted, key, records_from};
use crate::taskgraph::domain::{assign_levels, level_rows};
use rstest::rstest;

#[rstest]
fn chain_levels_increase_one_per_dependency_hop() {
    let records = records_from(&[
        extracted("TASK-1", &[]),
        extracted("TASK-2", &["TASK-1"]),
        extracted("TASK-3", &["TASK-2", "TASK-1"]),
    ]);

    let levels = assign_levels(&records);

    assert_eq!(levels.get(&key("TASK-1")), Some(&0));
    assert_eq!(levels.get(&key("TASK-2")), Some(&1));
    assert_eq!(levels.get(&key("TASK-3")), Some(&2));
}

#[rstest]
fn diamond_sits_below_its_deepest_dependency() {
    let records = records_from(&[
        extracted("TASK-A", &[]),
        extracted("TASK-B", &["TASK-A"]),
        extracted("TASK-C", &["TASK-A"]),
        extracted("TASK-D", &["TASK-B", "TASK-C"]),
    ]);

    let levels = assign_levels(&records);

    assert_eq!(levels.get(&key("TASK-A")), Some(&0));
    assert_eq!(levels.get(&key("TASK-B")), Some(&1));
    assert_eq!(levels.get(&key("TASK-C")), Some(&1));
    assert_eq!(levels.get(&key("TASK-D")), Some(&2));
}

#[rstest]
fn cyclic_input_terminates_and_levels_every_task() {
    let records = records_from(&[
        extracted("TASK-A", &["TASK-B"]),
        extracted("TASK-B", &["TASK-A"]),
        extracted("TASK-C", &[]),
    ]);

    let levels = assign_levels(&records);

    // Best-effort on cycles: exact levels are not meaningful, but the walk
    // terminates and every task gets one.
    assert_eq!(levels.len(), 3);
    assert_eq!(levels.get(&key("TASK-C")), Some(&0));
}

#[rstest]
fn rows_group_keys_by_level_in_batch_order() {
    let records = records_from(&[
        extracted("TASK-A", &[]),
        extracted("TASK-B", &["TASK-A"]),
        extracted("TASK-C", &["TASK-A"]),
        extracted("TASK-D", &["TASK-B", "TASK-C"]),
    ]);

    let rows = level_rows(&records);

    assert_eq!(
        rows,
        vec![
            vec![key("TASK-A")],
            vec![key("TASK-B"), key("TASK-C")],
            vec![key("TASK-D")],
        ]
    );
}

#[rstest]
fn empty_batch_yields_no_levels_or_rows() {
    assert!(assign_levels(&[]).is_empty());
    assert!(level_rows(&[]).is_empty());
}
