// ABOUTME: Flashcard endpoints: generate, save deck, delete deck
// ABOUTME: Validates input before any external call, then delegates to services
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recall AI

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::{Flashcard, GenerationRequest};
use crate::resources::ServerResources;

/// Response for `POST /api/generate`.
///
/// `raw_output` and `prompt_sent` are populated only when the server runs
/// with debug responses enabled; production clients never see them.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub flashcards: Vec<Flashcard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_sent: Option<String>,
}

/// Request body for `POST /api/save`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDeckRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub deck_name: String,
    #[serde(default)]
    pub flashcards: Vec<Flashcard>,
}

/// Response for `POST /api/save`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveDeckResponse {
    pub message: String,
}

/// Request body for `POST /api/delete-deck`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDeckRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub deck_name: String,
}

/// Response for `POST /api/delete-deck`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteDeckResponse {
    pub message: String,
    pub deleted: usize,
}

/// Flashcard endpoint group.
pub struct FlashcardRoutes;

impl FlashcardRoutes {
    /// Builds the router for flashcard endpoints.
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/generate", post(generate))
            .route("/api/save", post(save_deck))
            .route("/api/delete-deck", post(delete_deck))
            .with_state(resources)
    }
}

async fn generate(
    State(resources): State<Arc<ServerResources>>,
    Json(request): Json<GenerationRequest>,
) -> Result<Response, AppError> {
    if request.topic.trim().is_empty() {
        return Err(AppError::missing_field("topic"));
    }

    // Quota is checked before any model call so an over-quota user costs
    // nothing upstream.
    resources.quota.check(&request.user_id).await?;

    let outcome = resources.generation.generate(&request).await?;
    info!(
        cards = outcome.flashcards.flashcards.len(),
        "generated flashcards"
    );

    let debug = resources.config.debug_responses;
    let body = GenerateResponse {
        flashcards: outcome.flashcards.flashcards,
        raw_output: debug.then_some(outcome.raw_output),
        prompt_sent: debug.then_some(outcome.prompt),
    };
    Ok(Json(body).into_response())
}

async fn save_deck(
    State(resources): State<Arc<ServerResources>>,
    Json(request): Json<SaveDeckRequest>,
) -> Result<Response, AppError> {
    if request.user_id.trim().is_empty() {
        return Err(AppError::missing_field("userId"));
    }
    if request.deck_name.trim().is_empty() {
        return Err(AppError::missing_field("deckName"));
    }
    if request.flashcards.is_empty() {
        return Err(AppError::invalid_input("flashcards must not be empty"));
    }

    resources
        .store
        .insert_cards(&request.user_id, &request.deck_name, &request.flashcards)
        .await?;
    info!(deck = %request.deck_name, cards = request.flashcards.len(), "deck saved");

    Ok(Json(SaveDeckResponse {
        message: format!("Successfully created deck '{}'!", request.deck_name),
    })
    .into_response())
}

async fn delete_deck(
    State(resources): State<Arc<ServerResources>>,
    Json(request): Json<DeleteDeckRequest>,
) -> Result<Response, AppError> {
    if request.user_id.trim().is_empty() {
        return Err(AppError::missing_field("userId"));
    }
    if request.deck_name.trim().is_empty() {
        return Err(AppError::missing_field("deckName"));
    }

    let deleted = resources
        .store
        .delete_deck(&request.user_id, &request.deck_name)
        .await?;

    let message = if deleted == 0 {
        format!("No cards found for deck '{}'.", request.deck_name)
    } else {
        format!(
            "Successfully deleted deck '{}' ({deleted} cards).",
            request.deck_name
        )
    };
    info!(deck = %request.deck_name, deleted, "deck delete handled");

    Ok(Json(DeleteDeckResponse { message, deleted }).into_response())
}
