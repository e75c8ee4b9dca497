// ABOUTME: Centralized constants for limits, datastore names, and environment variables
// ABOUTME: Single source of truth so handlers, services, and tests agree on shared values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recall AI

//! Application-wide constants

/// Usage limits
pub mod limits {
    /// Fixed per-user ceiling on cumulative LLM tokens before generation
    /// and chat requests are rejected. Reset is handled by an external
    /// monthly job, not by this server.
    pub const TOKEN_QUOTA: u64 = 100_000;

    /// Request timeout for both external collaborators
    pub const HTTP_TIMEOUT_SECS: u64 = 30;
}

/// Datastore table and procedure names (PostgREST surface)
pub mod store {
    /// Table holding saved flashcards, one row per card
    pub const FLASHCARDS_TABLE: &str = "flashcards";

    /// Table holding per-user profile rows with the token counter
    pub const PROFILES_TABLE: &str = "profiles";

    /// Server-side atomic increment procedure for the token counter
    pub const INCREMENT_RPC: &str = "increment_tokens_used";
}

/// LLM defaults
pub mod llm {
    /// Default chat-completion model
    pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

    /// Sampling temperature used for both generation and chat
    pub const TEMPERATURE: f32 = 0.8;

    /// Default OpenAI-compatible API endpoint
    pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
}

/// Environment variable names
pub mod env_vars {
    /// LLM API key
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    /// Optional LLM base URL override
    pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
    /// Optional LLM model override
    pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
    /// Datastore base URL
    pub const SUPABASE_URL: &str = "SUPABASE_URL";
    /// Datastore service-role key
    pub const SUPABASE_SERVICE_KEY: &str = "SUPABASE_SERVICE_KEY";
    /// HTTP listen port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Comma-separated CORS origins, `*` for any
    pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
    /// Path to the generation prompt template
    pub const PROMPT_TEMPLATE_PATH: &str = "PROMPT_TEMPLATE_PATH";
    /// Include `raw_output`/`prompt_sent` in generate responses when truthy
    pub const DEBUG_RESPONSES: &str = "DEBUG_RESPONSES";
}

/// Service identity
pub mod service {
    /// Service name for structured logging
    pub const NAME: &str = "recall-api";
}
