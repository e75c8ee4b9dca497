// ABOUTME: Shared server resources container for dependency injection
// ABOUTME: Built once at startup and passed to every route via Arc
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recall AI

//! Centralized resource management.
//!
//! All expensive-to-construct state (HTTP clients, the validated prompt
//! template, service objects) is created once here and shared across
//! handlers through a single `Arc<ServerResources>`.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::errors::AppResult;
use crate::llm::{LlmProvider, OpenAiConfig, OpenAiProvider};
use crate::prompts::PromptTemplate;
use crate::quota::QuotaGuard;
use crate::services::{ChatService, GenerationService};
use crate::store::StoreClient;

/// Container for all shared server dependencies.
pub struct ServerResources {
    /// Server configuration
    pub config: ServerConfig,
    /// Model provider, also consulted by the readiness probe
    pub llm: Arc<dyn LlmProvider>,
    /// Datastore client
    pub store: StoreClient,
    /// Token quota gate
    pub quota: QuotaGuard,
    /// Flashcard generation service
    pub generation: GenerationService,
    /// Chat service
    pub chat: ChatService,
}

impl ServerResources {
    /// Builds every shared resource from configuration.
    ///
    /// # Errors
    ///
    /// Fails if the prompt template is missing or invalid, or if an HTTP
    /// client cannot be constructed.
    pub fn new(config: ServerConfig) -> AppResult<Self> {
        // Validate the template once up front; the generation service
        // re-reads it per request.
        PromptTemplate::load(&config.prompt_template_path)?;

        let store = StoreClient::new(&config.store)?;
        let llm: Arc<dyn LlmProvider> =
            Arc::new(OpenAiProvider::new(OpenAiConfig::from(&config.llm))?);

        Ok(Self {
            llm: Arc::clone(&llm),
            store: store.clone(),
            quota: QuotaGuard::new(store.clone()),
            generation: GenerationService::new(
                Arc::clone(&llm),
                config.prompt_template_path.clone(),
            ),
            chat: ChatService::new(llm, store),
            config,
        })
    }
}
