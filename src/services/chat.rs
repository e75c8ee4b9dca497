// ABOUTME: Chat service: role translation, model call, token billing
// ABOUTME: Bills actual usage to the user's profile after each reply
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recall AI

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::constants::llm as llm_constants;
use crate::errors::AppResult;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider, MessageRole, TokenUsage};
use crate::models::ChatTurn;
use crate::store::StoreClient;

/// The model's reply plus the usage that was billed for it.
#[derive(Debug, Clone)]
pub struct ChatReply {
    /// Assistant reply text
    pub reply: String,
    /// Token usage for the exchange; all zero when the provider omitted it
    pub token_info: TokenUsage,
}

/// Conversational endpoint logic: forwards chat history to the model and
/// charges the consumed tokens against the user's quota counter.
pub struct ChatService {
    llm: Arc<dyn LlmProvider>,
    store: StoreClient,
}

impl ChatService {
    pub fn new(llm: Arc<dyn LlmProvider>, store: StoreClient) -> Self {
        Self { llm, store }
    }

    /// Translates client chat turns into model messages.
    ///
    /// Turns with an unrecognized role are dropped, not rejected; clients
    /// have historically sent extra bookkeeping roles we never forward.
    fn convert_history(history: &[ChatTurn]) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len());
        for turn in history {
            let role = match turn.role.as_str() {
                "system" => MessageRole::System,
                "user" => MessageRole::User,
                "ai" => MessageRole::Assistant,
                _ => continue,
            };
            messages.push(ChatMessage::new(role, turn.content.clone()));
        }
        messages
    }

    /// Sends the chat history to the model and returns its reply.
    ///
    /// Token billing happens inline after the reply arrives: if the billing
    /// RPC fails the whole request fails, forfeiting the reply, so the
    /// counter never silently lags behind real consumption.
    ///
    /// # Errors
    ///
    /// Returns an upstream error if the model call or the billing RPC fails.
    #[instrument(skip(self, history), fields(turns = history.len()))]
    pub async fn chat(&self, user_id: &str, history: &[ChatTurn]) -> AppResult<ChatReply> {
        let messages = Self::convert_history(history);
        let request =
            ChatRequest::new(messages).with_temperature(llm_constants::TEMPERATURE);
        let response = self.llm.complete(&request).await?;

        let token_info = response.usage.unwrap_or_default();
        let total_tokens = u64::from(token_info.total_tokens);

        if total_tokens > 0 && !user_id.trim().is_empty() {
            if let Err(err) = self.store.increment_tokens_used(user_id, total_tokens).await {
                warn!(%err, total_tokens, "failed to record token usage, failing request");
                return Err(err);
            }
            debug!(total_tokens, "token usage recorded");
        }

        Ok(ChatReply {
            reply: response.content,
            token_info,
        })
    }
}
