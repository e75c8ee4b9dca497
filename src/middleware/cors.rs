// ABOUTME: CORS layer construction from configuration
// ABOUTME: Wildcard by default, explicit origin list when configured
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recall AI

use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::config::CorsConfig;

/// Builds the CORS layer for the API.
///
/// An empty or `*` configuration allows any origin. Otherwise the value is
/// treated as a comma-separated origin list; entries that are not valid
/// header values are skipped with a warning rather than failing startup.
#[must_use]
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any);

    let raw = config.allowed_origins.trim();
    if raw.is_empty() || raw == "*" {
        return layer.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = raw
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin, "skipping invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
