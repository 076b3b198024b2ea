//! Unit tests for extraction payload parsing and prompt rendering.

use super::fixtures::key;
use crate::taskgraph::ports::{ExtractionError, ExtractionPayload, ExtractionPrompt};
use rstest::rstest;

const BARE_PAYLOAD: &str = r#"{
  "tasks": [
    {
      "id": "TASK-1",
      "description": "Set up the staging environment",
      "priority": "P1",
      "dependencies": [],
      "assigned_to": "Alice"
    },
    {
      "id": "TASK-2",
      "description": "Run the smoke suite",
      "priority": "P2",
      "dependencies": ["TASK-1"]
    }
  ]
}"#;

#[rstest]
fn parses_bare_json() {
    let payload = ExtractionPayload::parse(BARE_PAYLOAD).expect("payload parses");

    let tasks = payload.tasks();
    assert_eq!(tasks.len(), 2);
    let first = tasks.first().expect("first task present");
    assert_eq!(first.id(), &key("TASK-1"));
    assert_eq!(first.assigned_to(), Some("Alice"));
    let second = tasks.get(1).expect("second task present");
    assert_eq!(second.dependencies(), [key("TASK-1")]);
    assert_eq!(second.assigned_to(), None);
}

#[rstest]
fn unwraps_a_tagged_fenced_block_with_surrounding_prose() {
    let output = format!("Here is the task breakdown:\n```json\n{BARE_PAYLOAD}\n```\nLet me know!");

    let payload = ExtractionPayload::parse(&output).expect("payload parses");

    assert_eq!(payload.tasks().len(), 2);
}

#[rstest]
fn unwraps_an_untagged_fenced_block() {
    let output = format!("```\n{BARE_PAYLOAD}\n```");

    let payload = ExtractionPayload::parse(&output).expect("payload parses");

    assert_eq!(payload.tasks().len(), 2);
}

#[rstest]
fn missing_tasks_field_parses_as_empty_batch() {
    let payload = ExtractionPayload::parse("{}").expect("payload parses");
    assert!(payload.tasks().is_empty());
}

#[rstest]
fn rejects_unparseable_output() {
    let result = ExtractionPayload::parse("The meeting had no actionable tasks, sorry.");
    assert!(matches!(result, Err(ExtractionError::MalformedOutput(_))));
}

#[rstest]
fn rejects_an_unterminated_fence() {
    let result = ExtractionPayload::parse("```json\n{\"tasks\": []}");
    assert!(matches!(result, Err(ExtractionError::MalformedOutput(_))));
}

#[rstest]
fn rejects_a_blank_task_id() {
    let output = r#"{"tasks": [{"id": "  ", "description": "Ghost task", "priority": "P2"}]}"#;
    let result = ExtractionPayload::parse(output);
    assert!(matches!(result, Err(ExtractionError::MalformedOutput(_))));
}

#[rstest]
fn rejects_a_blank_description() {
    let output = r#"{"tasks": [{"id": "TASK-1", "description": "  ", "priority": "P2"}]}"#;
    let result = ExtractionPayload::parse(output);

    assert!(matches!(result, Err(ExtractionError::MalformedOutput(_))));
    let Err(ExtractionError::MalformedOutput(message)) = result else {
        return;
    };
    assert!(message.contains("TASK-1"));
}

#[rstest]
fn inbound_cycle_flags_are_discarded() {
    let output = r#"{
      "tasks": [
        {"id": "TASK-1", "description": "Honest task", "priority": "P3", "has_cycle": true}
      ]
    }"#;

    let payload = ExtractionPayload::parse(output).expect("payload parses");

    let task = payload.tasks().first().expect("task present");
    assert!(!task.has_cycle());
}

#[rstest]
fn prompt_binds_the_transcript_into_the_user_message() {
    let prompt = ExtractionPrompt::render("Alice: ship the beta on Friday.")
        .expect("prompt renders");

    assert!(prompt.user().contains("Alice: ship the beta on Friday."));
    assert!(prompt.system().contains("P0 = critical blocker"));
    assert!(prompt.system().contains("valid JSON"));
}
