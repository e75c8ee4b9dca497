// ABOUTME: HTTP middleware layers applied to the whole router
// ABOUTME: Currently CORS; request tracing is attached in the server module
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recall AI

//! Router-wide middleware.

mod cors;

pub use cors::cors_layer;
