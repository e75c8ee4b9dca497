// ABOUTME: HTTP server assembly: router composition, middleware, listener
// ABOUTME: Binds the configured port and serves until shutdown
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recall AI

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::errors::{AppError, AppResult};
use crate::middleware::cors_layer;
use crate::resources::ServerResources;
use crate::routes::{ChatRoutes, FlashcardRoutes, HealthRoutes};

/// The assembled API server.
pub struct ApiServer {
    resources: Arc<ServerResources>,
}

impl ApiServer {
    #[must_use]
    pub fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Composes the full router with all endpoint groups and middleware.
    #[must_use]
    pub fn router(&self) -> Router {
        Router::new()
            .merge(HealthRoutes::routes(Arc::clone(&self.resources)))
            .merge(FlashcardRoutes::routes(Arc::clone(&self.resources)))
            .merge(ChatRoutes::routes(Arc::clone(&self.resources)))
            .layer(cors_layer(&self.resources.config.cors))
            .layer(TraceLayer::new_for_http())
    }

    /// Binds the configured port and serves requests until the process
    /// is stopped.
    ///
    /// # Errors
    ///
    /// Fails if the port cannot be bound or the server loop errors.
    pub async fn run(self) -> AppResult<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.resources.config.http_port));
        let router = self.router();

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::config(format!("failed to bind {addr}: {e}")))?;
        info!(%addr, "API server listening");

        axum::serve(listener, router)
            .await
            .map_err(|e| AppError::internal(format!("server loop failed: {e}")))
    }
}
