// ABOUTME: Domain models for flashcards, generation requests, and style options
// ABOUTME: Defines the wire shapes shared by handlers, services, and the datastore client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recall AI

//! Core domain models
//!
//! All entities here are request-scoped: they are built from client JSON or
//! model output, flow through one request, and are not held across requests.
//! Wire field names are camelCase to match the existing web client.

use serde::{Deserialize, Serialize};

/// A single question/answer pair
///
/// Both fields are always present; either may be the empty string (a
/// partially filled card the model is asked to complete) but never absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    /// The question side of the card
    pub question: String,
    /// The answer side of the card
    pub answer: String,
}

/// An ordered set of flashcards, as produced by the model
///
/// A generation result is only accepted when `flashcards` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardSet {
    /// The cards, in the order the model produced them
    pub flashcards: Vec<Flashcard>,
}

/// Client request to generate a set of flashcards
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Id of the requesting user, checked against the token quota
    pub user_id: String,
    /// Main subject for the cards
    pub topic: String,
    /// Free-form notes the model should use as context
    #[serde(default)]
    pub context: String,
    /// Web links the model should consider, one per line
    #[serde(default)]
    pub links: String,
    /// Cards (possibly partial) the user typed in themselves
    #[serde(default)]
    pub user_defined_cards: Vec<Flashcard>,
    /// Total number of card slots the user laid out
    #[serde(default)]
    pub num_cards: u32,
    /// Tone of voice; absent in newer clients, defaults to neutral
    #[serde(default)]
    pub tone: String,
    /// Answer length preference
    #[serde(default)]
    pub conciseness: String,
    /// Technical depth, passed through to the prompt verbatim
    #[serde(default)]
    pub technicality: String,
    /// Formatting preference, passed through to the prompt verbatim
    #[serde(default)]
    pub formatting: String,
}

impl GenerationRequest {
    /// Number of brand-new cards the model is asked to generate:
    /// `max(num_cards, user_defined) - user_defined`, clamped to zero.
    /// Partially filled user cards are completed by the model separately.
    #[must_use]
    pub fn cards_to_generate(&self) -> u32 {
        let user_defined = self.user_defined_cards.len() as u32;
        self.num_cards.max(user_defined) - user_defined
    }
}

/// One turn of chat history as the client sends it.
///
/// Roles on the wire are `system`, `user`, and `ai`; anything else is
/// dropped during translation rather than rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Wire role: `system`, `user`, or `ai`
    pub role: String,
    /// Message text
    pub content: String,
}

/// Tone of voice for generated answers
///
/// Unrecognized client values fall back to `Neutral`; the default arm lives
/// here rather than in a dictionary lookup so the fallback is checked at
/// compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    /// Academic register
    Formal,
    /// Conversational register
    Casual,
    /// Plain informative register
    #[default]
    Neutral,
}

impl Tone {
    /// Parse a client-supplied value, falling back to neutral
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "formal" => Self::Formal,
            "casual" => Self::Casual,
            _ => Self::Neutral,
        }
    }

    /// Prompt instruction for this tone
    #[must_use]
    pub const fn instruction(self) -> &'static str {
        match self {
            Self::Formal => "highly formal and academic",
            Self::Casual => "casual and easy-to-understand",
            Self::Neutral => "neutral and informative",
        }
    }
}

/// Answer length preference for generated cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Conciseness {
    /// Single-sentence answers
    Concise,
    /// Thorough explanations
    Detailed,
    /// Plain direct answers
    #[default]
    Standard,
}

impl Conciseness {
    /// Parse a client-supplied value, falling back to standard
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "concise" => Self::Concise,
            "detailed" => Self::Detailed,
            _ => Self::Standard,
        }
    }

    /// Prompt instruction for this conciseness level
    #[must_use]
    pub const fn instruction(self) -> &'static str {
        match self {
            Self::Concise => "extremely concise, ideally a single sentence",
            Self::Detailed => "detailed and comprehensive, providing thorough explanations",
            Self::Standard => "direct and easy to understand",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cards_to_generate_no_user_cards() {
        let request = request_with(3, vec![]);
        assert_eq!(request.cards_to_generate(), 3);
    }

    #[test]
    fn test_cards_to_generate_user_cards_fill_slots() {
        let cards = vec![
            Flashcard {
                question: "Q1".into(),
                answer: String::new(),
            },
            Flashcard {
                question: String::new(),
                answer: "A2".into(),
            },
        ];
        assert_eq!(request_with(5, cards.clone()).cards_to_generate(), 3);
        // More user cards than slots clamps to zero, never underflows
        assert_eq!(request_with(1, cards).cards_to_generate(), 0);
    }

    #[test]
    fn test_style_option_fallbacks() {
        assert_eq!(Tone::parse("formal"), Tone::Formal);
        assert_eq!(Tone::parse("bogus"), Tone::Neutral);
        assert_eq!(Conciseness::parse("detailed"), Conciseness::Detailed);
        assert_eq!(Conciseness::parse(""), Conciseness::Standard);
    }

    #[test]
    fn test_flashcard_set_round_trip() {
        let set = FlashcardSet {
            flashcards: vec![
                Flashcard {
                    question: "What is ATP?".into(),
                    answer: "The cell's energy currency".into(),
                },
                Flashcard {
                    question: "Where does glycolysis occur?".into(),
                    answer: "The cytoplasm".into(),
                },
            ],
        };

        let json = serde_json::to_string(&set).unwrap();
        let parsed: FlashcardSet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, set);
    }

    #[test]
    fn test_generation_request_camel_case_wire_format() {
        let body = serde_json::json!({
            "userId": "user-1",
            "topic": "Photosynthesis",
            "numCards": 3,
            "userDefinedCards": [],
            "conciseness": "concise",
            "technicality": "standard",
            "formatting": "standard"
        });

        let request: GenerationRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.user_id, "user-1");
        assert_eq!(request.num_cards, 3);
        assert!(request.tone.is_empty());
    }

    fn request_with(num_cards: u32, user_defined_cards: Vec<Flashcard>) -> GenerationRequest {
        GenerationRequest {
            user_id: "user-1".into(),
            topic: "Photosynthesis".into(),
            context: String::new(),
            links: String::new(),
            user_defined_cards,
            num_cards,
            tone: String::new(),
            conciseness: String::new(),
            technicality: String::new(),
            formatting: String::new(),
        }
    }
}
