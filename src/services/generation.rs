// ABOUTME: Flashcard generation service: prompt rendering, model call, output parsing
// ABOUTME: Turns a generation request into a parsed flashcard set
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recall AI

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::constants::llm as llm_constants;
use crate::errors::{AppError, AppResult};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::models::{FlashcardSet, GenerationRequest};
use crate::prompts::PromptTemplate;

/// Result of one generation call, keeping the intermediate artifacts so the
/// API layer can expose them in debug mode.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// Parsed cards
    pub flashcards: FlashcardSet,
    /// Verbatim model output before fence stripping
    pub raw_output: String,
    /// The exact prompt sent to the model
    pub prompt: String,
}

/// Generates flashcard sets from a topic and styling options.
///
/// The template is re-read from disk on every request so prompt edits take
/// effect without a restart; startup already validated the file once.
pub struct GenerationService {
    llm: Arc<dyn LlmProvider>,
    template_path: PathBuf,
}

impl GenerationService {
    pub fn new(llm: Arc<dyn LlmProvider>, template_path: PathBuf) -> Self {
        Self { llm, template_path }
    }

    /// Renders the prompt, calls the model, and parses the JSON reply.
    ///
    /// # Errors
    ///
    /// Returns a template error if the template became unreadable, an
    /// upstream error if the model call fails, and a parse error if the
    /// reply is not a valid, non-empty flashcard set.
    #[instrument(skip(self, request), fields(topic = %request.topic))]
    pub async fn generate(&self, request: &GenerationRequest) -> AppResult<GenerationOutcome> {
        let template = PromptTemplate::load(&self.template_path)?;
        let prompt = template.render(request);

        let chat_request = ChatRequest::new(vec![ChatMessage::user(prompt.clone())])
            .with_temperature(llm_constants::TEMPERATURE);
        let response = self.llm.complete(&chat_request).await?;

        let flashcards = parse_flashcards(&response.content)?;
        debug!(cards = flashcards.flashcards.len(), "generation complete");

        Ok(GenerationOutcome {
            flashcards,
            raw_output: response.content,
            prompt,
        })
    }
}

/// Parses model output into a flashcard set, tolerating markdown code fences
/// around the JSON body.
fn parse_flashcards(raw: &str) -> AppResult<FlashcardSet> {
    let stripped = strip_code_fences(raw);

    let set: FlashcardSet = serde_json::from_str(stripped).map_err(|e| {
        AppError::parse(format!("model reply was not a valid flashcard set: {e}"))
    })?;

    if set.flashcards.is_empty() {
        return Err(AppError::parse(
            "model reply contained an empty flashcard list",
        ));
    }
    Ok(set)
}

/// Removes a surrounding ```json ... ``` (or bare ```) fence if present.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fenced_json() {
        let raw = "```json\n{\"flashcards\": []}\n```";
        assert_eq!(strip_code_fences(raw), "{\"flashcards\": []}");
    }

    #[test]
    fn test_strip_bare_fence() {
        let raw = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(raw), "{\"a\": 1}");
    }

    #[test]
    fn test_unfenced_passthrough() {
        assert_eq!(strip_code_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_rejects_empty_set() {
        let err = parse_flashcards("{\"flashcards\": []}").unwrap_err();
        assert!(err.message.contains("empty"));
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        assert!(parse_flashcards("[1, 2, 3]").is_err());
        assert!(parse_flashcards("not json at all").is_err());
    }

    #[test]
    fn test_parse_valid_set() {
        let raw = "```json\n{\"flashcards\": [{\"question\": \"Q\", \"answer\": \"A\"}]}\n```";
        let set = parse_flashcards(raw).unwrap();
        assert_eq!(set.flashcards.len(), 1);
        assert_eq!(set.flashcards[0].question, "Q");
    }
}
