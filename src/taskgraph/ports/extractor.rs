//! Extraction port: transcript in, candidate task batch out.

use crate::taskgraph::domain::ExtractedTask;
use async_trait::async_trait;
use minijinja::Environment;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Result type for extraction operations.
pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Errors returned by extraction backends.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    /// The upstream model could not be reached (including timeouts).
    #[error("extraction backend unreachable: {0}")]
    Unreachable(String),

    /// The model response does not parse as a task payload.
    #[error("extraction output is not parseable as a task payload: {0}")]
    MalformedOutput(String),

    /// The extraction prompt template failed to render.
    #[error("failed to render extraction prompt: {0}")]
    PromptRender(String),
}

/// Contract for the external extraction collaborator.
///
/// Implementations turn one raw transcript into candidate tasks. The
/// returned batch is untrusted: dependency references may dangle and must
/// pass through sanitization and cycle detection before storage. Timeout
/// policy belongs to the implementation; a timed-out call surfaces as
/// [`ExtractionError::Unreachable`].
#[async_trait]
pub trait TaskExtractor: Send + Sync {
    /// Extracts candidate tasks from the transcript.
    ///
    /// # Errors
    ///
    /// Returns an [`ExtractionError`] when the backend is unreachable or
    /// its output cannot be parsed.
    async fn extract(&self, transcript: &str) -> ExtractionResult<Vec<ExtractedTask>>;
}

/// Instructions issued to every extraction backend.
const SYSTEM_PROMPT: &str = r#"You are a task extraction assistant. Analyse the meeting transcript and extract actionable tasks with their dependencies.

Rules:
1. Extract every actionable task mentioned in the transcript.
2. Assign unique short IDs ("TASK-1", "TASK-2", ...).
3. Set priority from the urgency expressed (P0 = critical blocker, P1 = high, P2 = medium, P3 = low).
4. List dependencies: the IDs of tasks that must be completed before this one can start. Only reference IDs that exist in your output.
5. Record the assignee's name when one is mentioned.

Return ONLY valid JSON in this exact shape:
{
  "tasks": [
    {
      "id": "TASK-1",
      "description": "Clear description of the task",
      "priority": "P0",
      "dependencies": [],
      "assigned_to": "Person Name"
    }
  ]
}"#;

/// Template for the per-transcript user message.
const USER_TEMPLATE: &str = "Extract tasks from this meeting transcript:\n\n{{ transcript }}";

/// Standard prompt pair every extraction backend issues.
///
/// Rendering the user message through the shared template keeps backend
/// adapters consistent with each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionPrompt {
    system: String,
    user: String,
}

impl ExtractionPrompt {
    /// Renders the prompt pair for a transcript.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::PromptRender`] when template rendering
    /// fails.
    pub fn render(transcript: &str) -> ExtractionResult<Self> {
        let environment = Environment::new();
        let mut context = Map::new();
        context.insert("transcript".to_owned(), Value::String(transcript.to_owned()));
        let user = environment
            .render_str(USER_TEMPLATE, context)
            .map_err(|error| ExtractionError::PromptRender(error.to_string()))?;
        Ok(Self {
            system: SYSTEM_PROMPT.to_owned(),
            user,
        })
    }

    /// Returns the system instructions.
    #[must_use]
    pub fn system(&self) -> &str {
        &self.system
    }

    /// Returns the rendered user message.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }
}

/// Wire payload produced by extraction backends.
///
/// A missing `tasks` field parses as an empty batch rather than an error,
/// matching the leniency extraction backends need in practice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionPayload {
    #[serde(default)]
    tasks: Vec<ExtractedTask>,
}

impl ExtractionPayload {
    /// Wraps an already-built task batch.
    #[must_use]
    pub const fn new(tasks: Vec<ExtractedTask>) -> Self {
        Self { tasks }
    }

    /// Parses raw model output into a payload.
    ///
    /// Models frequently wrap the JSON body in a fenced code block, with or
    /// without a `json` tag and with or without surrounding prose; the
    /// first fenced block is unwrapped before parsing. Bare JSON parses
    /// as-is.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::MalformedOutput`] when the body is not
    /// valid payload JSON or a task carries an empty description.
    pub fn parse(raw: &str) -> ExtractionResult<Self> {
        let body = fenced_body(raw).unwrap_or_else(|| raw.trim());
        let payload: Self = serde_json::from_str(body)
            .map_err(|error| ExtractionError::MalformedOutput(error.to_string()))?;
        if let Some(task) = payload
            .tasks
            .iter()
            .find(|task| task.description().trim().is_empty())
        {
            return Err(ExtractionError::MalformedOutput(format!(
                "task {} has an empty description",
                task.id()
            )));
        }
        Ok(payload)
    }

    /// Returns the candidate tasks.
    #[must_use]
    pub fn tasks(&self) -> &[ExtractedTask] {
        &self.tasks
    }

    /// Consumes the payload, yielding the candidate tasks.
    #[must_use]
    pub fn into_tasks(self) -> Vec<ExtractedTask> {
        self.tasks
    }
}

/// Returns the contents of the first fenced code block, if any.
fn fenced_body(raw: &str) -> Option<&str> {
    let (_, after_open) = raw.split_once("```")?;
    let body = after_open.strip_prefix("json").unwrap_or(after_open);
    let (inner, _) = body.split_once("```")?;
    Some(inner.trim())
}
