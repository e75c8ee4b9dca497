// ABOUTME: Prompt template loading, validation, and rendering for flashcard generation
// ABOUTME: Substitutes request fields into a markdown template with a fixed placeholder set
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recall AI

//! Prompt construction for the flashcard generation pipeline.
//!
//! The generation prompt lives in a markdown template on disk so it can be
//! tuned without a rebuild. Templates are validated once when the server
//! starts; rendering an already-validated template cannot fail.

use std::path::Path;

use crate::errors::{AppError, AppResult};
use crate::models::{Conciseness, Flashcard, GenerationRequest, Tone};

/// Every placeholder the template must contain. A template missing one of
/// these would silently drop a request field, so absence is a startup error.
pub const REQUIRED_PLACEHOLDERS: &[&str] = &[
    "{num_cards}",
    "{topic}",
    "{context_section}",
    "{links_section}",
    "{user_defined_cards}",
    "{persona_details}",
    "{conciseness_instruction}",
    "{technicality}",
    "{formatting}",
];

/// A validated prompt template.
///
/// Construction checks that all of [`REQUIRED_PLACEHOLDERS`] are present, so
/// holders of a `PromptTemplate` can render without error handling.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    /// Loads and validates a template from disk.
    ///
    /// # Errors
    ///
    /// Returns a template error if the file cannot be read or any required
    /// placeholder is missing.
    pub fn load(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AppError::template(format!(
                "failed to read prompt template {}: {e}",
                path.display()
            ))
        })?;
        Self::parse(text)
    }

    /// Validates template text directly.
    ///
    /// # Errors
    ///
    /// Returns a template error if any required placeholder is missing.
    pub fn parse(text: impl Into<String>) -> AppResult<Self> {
        let text = text.into();
        for placeholder in REQUIRED_PLACEHOLDERS {
            if !text.contains(placeholder) {
                return Err(AppError::template(format!(
                    "prompt template is missing required placeholder {placeholder}"
                )));
            }
        }
        Ok(Self { text })
    }

    /// Renders the template for one generation request.
    ///
    /// Optional sections (context, links) are omitted entirely when the
    /// corresponding request field is empty, header included.
    #[must_use]
    pub fn render(&self, request: &GenerationRequest) -> String {
        let context_section = if request.context.trim().is_empty() {
            String::new()
        } else {
            format!(
                "**Additional Context/Notes Provided by User:**\n{}",
                request.context
            )
        };

        let links_section = if request.links.trim().is_empty() {
            String::new()
        } else {
            format!(
                "**Reference Links Provided by User:**\n{}",
                request.links
            )
        };

        self.text
            .replace(
                "{num_cards}",
                &request.cards_to_generate().to_string(),
            )
            .replace("{topic}", &request.topic)
            .replace("{context_section}", &context_section)
            .replace("{links_section}", &links_section)
            .replace(
                "{user_defined_cards}",
                &serialize_cards(&request.user_defined_cards),
            )
            .replace(
                "{persona_details}",
                Tone::parse(&request.tone).instruction(),
            )
            .replace(
                "{conciseness_instruction}",
                Conciseness::parse(&request.conciseness).instruction(),
            )
            .replace("{technicality}", &request.technicality)
            .replace("{formatting}", &request.formatting)
    }
}

/// Serializes user-defined cards into the `Q: ... | A: ...` list form the
/// template embeds, or the literal `None` when there are no cards.
fn serialize_cards(cards: &[Flashcard]) -> String {
    if cards.is_empty() {
        return "None".to_owned();
    }
    cards
        .iter()
        .map(|card| {
            let question = if card.question.trim().is_empty() {
                "(empty)"
            } else {
                card.question.as_str()
            };
            let answer = if card.answer.trim().is_empty() {
                "(empty)"
            } else {
                card.answer.as_str()
            };
            format!("Q: {question} | A: {answer}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
