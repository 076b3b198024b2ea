//! Extraction doubles for pipeline tests and offline development.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::taskgraph::{
    domain::ExtractedTask,
    ports::{ExtractionError, ExtractionPayload, ExtractionPrompt, ExtractionResult, TaskExtractor},
};

/// Extraction double that replays one canned model response.
///
/// Each call renders the standard prompt (recorded for later inspection)
/// and parses the configured output exactly the way a live backend adapter
/// would, so fixture-driven tests still exercise fence stripping and
/// payload validation.
#[derive(Debug)]
pub struct FixtureExtractor {
    output: String,
    prompts: Mutex<Vec<String>>,
}

impl FixtureExtractor {
    /// Creates a double that replays the given raw model output.
    #[must_use]
    pub fn returning(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Returns the user messages rendered so far, oldest first.
    #[must_use]
    pub fn rendered_prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TaskExtractor for FixtureExtractor {
    async fn extract(&self, transcript: &str) -> ExtractionResult<Vec<ExtractedTask>> {
        let prompt = ExtractionPrompt::render(transcript)?;
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.user().to_owned());
        }
        Ok(ExtractionPayload::parse(&self.output)?.into_tasks())
    }
}

/// Extraction double whose backend is always unreachable.
#[derive(Debug, Clone)]
pub struct FailingExtractor {
    message: String,
}

impl FailingExtractor {
    /// Creates a double that fails with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl TaskExtractor for FailingExtractor {
    async fn extract(&self, _transcript: &str) -> ExtractionResult<Vec<ExtractedTask>> {
        Err(ExtractionError::Unreachable(self.message.clone()))
    }
}
