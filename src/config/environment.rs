// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, .env loading, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recall AI

//! Environment-based configuration management
//!
//! All configuration comes from environment variables (optionally seeded from
//! a `.env` file). Clients for external services are constructed once from
//! this config at process start and injected into handlers; nothing reads the
//! environment after startup.

use crate::constants::{env_vars, limits, llm};
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use tracing::warn;

/// LLM service configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API key for the OpenAI-compatible endpoint
    pub api_key: String,
    /// Base URL of the chat-completions API
    pub base_url: String,
    /// Model identifier sent with every request
    pub model: String,
}

/// Datastore (Supabase/PostgREST) configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`
    pub base_url: String,
    /// Service-role key used for both `apikey` and bearer headers
    pub service_key: String,
}

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Comma-separated allowed origins; empty or `*` allows any origin
    pub allowed_origins: String,
}

/// Server configuration loaded from environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// LLM service settings
    pub llm: LlmConfig,
    /// Datastore settings
    pub store: StoreConfig,
    /// CORS settings
    pub cors: CorsConfig,
    /// Path to the flashcard generation prompt template,
    /// re-read on every generate request
    pub prompt_template_path: PathBuf,
    /// Include `raw_output` and `prompt_sent` in generate responses
    pub debug_responses: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error when a required variable (`OPENAI_API_KEY`,
    /// `SUPABASE_URL`, `SUPABASE_SERVICE_KEY`) is missing or a numeric
    /// value fails to parse.
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        let config = Self {
            http_port: env_var_or(env_vars::HTTP_PORT, "8000")?
                .parse()
                .context("Invalid HTTP_PORT value")?,
            llm: LlmConfig {
                api_key: required_env(env_vars::OPENAI_API_KEY)?,
                base_url: env_var_or(env_vars::OPENAI_BASE_URL, llm::DEFAULT_BASE_URL)?,
                model: env_var_or(env_vars::OPENAI_MODEL, llm::DEFAULT_MODEL)?,
            },
            store: StoreConfig {
                base_url: required_env(env_vars::SUPABASE_URL)?,
                service_key: required_env(env_vars::SUPABASE_SERVICE_KEY)?,
            },
            cors: CorsConfig {
                allowed_origins: env_var_or(env_vars::CORS_ALLOWED_ORIGINS, "*")?,
            },
            prompt_template_path: PathBuf::from(env_var_or(
                env_vars::PROMPT_TEMPLATE_PATH,
                "prompts/flashcards.md",
            )?),
            debug_responses: env_var_or(env_vars::DEBUG_RESPONSES, "false")?
                .parse()
                .unwrap_or(false),
        };

        Ok(config)
    }

    /// One-line configuration summary for startup logging, with secrets elided
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "port={} model={} llm_base={} store={} template={} quota={} debug_responses={}",
            self.http_port,
            self.llm.model,
            self.llm.base_url,
            self.store.base_url,
            self.prompt_template_path.display(),
            limits::TOKEN_QUOTA,
            self.debug_responses,
        )
    }
}

/// Read an environment variable with a default fallback
fn env_var_or(key: &str, default: &str) -> Result<String> {
    Ok(env::var(key).unwrap_or_else(|_| default.to_owned()))
}

/// Read a required environment variable
fn required_env(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("Missing required environment variable: {key}"))
}
