// ABOUTME: Chat endpoint: quota-gated conversational access to the model
// ABOUTME: Bills token usage through the chat service after each reply
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recall AI

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm::TokenUsage;
use crate::models::ChatTurn;
use crate::resources::ServerResources;

/// Request body for `POST /api/chat`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequestBody {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub messages: Vec<ChatTurn>,
}

/// Response for `POST /api/chat`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponseBody {
    pub reply: String,
    pub token_info: TokenUsage,
}

/// Chat endpoint group.
pub struct ChatRoutes;

impl ChatRoutes {
    /// Builds the router for the chat endpoint.
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/chat", post(chat))
            .with_state(resources)
    }
}

async fn chat(
    State(resources): State<Arc<ServerResources>>,
    Json(request): Json<ChatRequestBody>,
) -> Result<Response, AppError> {
    if request.messages.is_empty() {
        return Err(AppError::invalid_input("messages must not be empty"));
    }

    resources.quota.check(&request.user_id).await?;

    let reply = resources
        .chat
        .chat(&request.user_id, &request.messages)
        .await?;

    Ok(Json(ChatResponseBody {
        reply: reply.reply,
        token_info: reply.token_info,
    })
    .into_response())
}
