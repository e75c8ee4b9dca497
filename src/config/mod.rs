// ABOUTME: Configuration module grouping for the Recall API server
// ABOUTME: Re-exports the environment-backed ServerConfig
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recall AI

//! Configuration management

/// Environment-based configuration
pub mod environment;

pub use environment::{CorsConfig, LlmConfig, ServerConfig, StoreConfig};
