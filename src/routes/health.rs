// ABOUTME: Health and readiness endpoints for deployment probes
// ABOUTME: Liveness is unconditional; readiness consults the model provider
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recall AI

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tracing::warn;

use crate::constants::service;
use crate::resources::ServerResources;

/// Health endpoint group.
pub struct HealthRoutes;

impl HealthRoutes {
    /// Builds the router for the probe endpoints.
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(health))
            .route("/ready", get(ready))
            .with_state(resources)
    }
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": service::NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn ready(State(resources): State<Arc<ServerResources>>) -> Response {
    let reachable = match resources.llm.health_check().await {
        Ok(healthy) => healthy,
        Err(err) => {
            warn!(%err, "model service health check failed");
            false
        }
    };

    let timestamp = chrono::Utc::now().to_rfc3339();
    if reachable {
        Json(json!({ "status": "ready", "timestamp": timestamp })).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable", "timestamp": timestamp })),
        )
            .into_response()
    }
}
