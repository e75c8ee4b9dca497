// ABOUTME: HTTP client for the PostgREST-compatible datastore (decks, profiles, token RPC)
// ABOUTME: All requests authenticate with the service key; errors map to upstream failures
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recall AI

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use crate::config::StoreConfig;
use crate::constants::{limits, store};
use crate::errors::{AppError, AppResult};
use crate::models::Flashcard;

/// One persisted flashcard row, as the datastore sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashcardRow {
    pub user_id: String,
    pub deck: String,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Deserialize)]
struct ProfileTokens {
    tokens_used: u64,
}

/// Client for the hosted datastore REST API.
///
/// The store speaks the PostgREST conventions: tables under `/rest/v1/<table>`
/// with filter query parameters, and stored procedures under `/rest/v1/rpc/`.
#[derive(Debug, Clone)]
pub struct StoreClient {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl StoreClient {
    /// Creates a client from store configuration.
    ///
    /// # Errors
    ///
    /// Returns a config error if the underlying HTTP client cannot be built.
    pub fn new(config: &StoreConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(limits::HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::config(format!("failed to build store HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            service_key: config.service_key.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn rpc_url(&self, function: &str) -> String {
        format!("{}/rest/v1/rpc/{function}", self.base_url)
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    async fn error_from_response(service_hint: &str, response: reqwest::Response) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        AppError::upstream(
            "datastore",
            format!("{service_hint} failed with status {status}: {body}"),
        )
    }

    /// Inserts one row per card into the flashcards table.
    ///
    /// # Errors
    ///
    /// Returns an upstream error if the insert is rejected or unreachable.
    #[instrument(skip(self, cards), fields(deck = %deck_name, count = cards.len()))]
    pub async fn insert_cards(
        &self,
        user_id: &str,
        deck_name: &str,
        cards: &[Flashcard],
    ) -> AppResult<()> {
        let rows: Vec<FlashcardRow> = cards
            .iter()
            .map(|card| FlashcardRow {
                user_id: user_id.to_owned(),
                deck: deck_name.to_owned(),
                question: card.question.clone(),
                answer: card.answer.clone(),
            })
            .collect();

        let response = self
            .authed(self.client.post(self.table_url(store::FLASHCARDS_TABLE)))
            .header("Prefer", "return=minimal")
            .json(&rows)
            .send()
            .await
            .map_err(|e| AppError::upstream("datastore", format!("insert request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response("card insert", response).await);
        }
        Ok(())
    }

    /// Reads the `tokens_used` counter from a user's profile row.
    ///
    /// Returns `None` when no profile row exists for the user.
    ///
    /// # Errors
    ///
    /// Returns an upstream error if the datastore request fails.
    #[instrument(skip(self))]
    pub async fn tokens_used(&self, user_id: &str) -> AppResult<Option<u64>> {
        let id_filter = format!("eq.{}", urlencoding::encode(user_id));
        let response = self
            .authed(self.client.get(self.table_url(store::PROFILES_TABLE)))
            .query(&[("select", "tokens_used"), ("id", id_filter.as_str())])
            .send()
            .await
            .map_err(|e| AppError::upstream("datastore", format!("profile request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response("profile lookup", response).await);
        }

        let rows: Vec<ProfileTokens> = response.json().await.map_err(|e| {
            AppError::upstream("datastore", format!("invalid profile response: {e}"))
        })?;
        Ok(rows.into_iter().next().map(|row| row.tokens_used))
    }

    /// Deletes every card in a user's deck, returning how many rows matched.
    ///
    /// # Errors
    ///
    /// Returns an upstream error if the delete is rejected or unreachable.
    #[instrument(skip(self), fields(deck = %deck_name))]
    pub async fn delete_deck(&self, user_id: &str, deck_name: &str) -> AppResult<usize> {
        let user_filter = format!("eq.{}", urlencoding::encode(user_id));
        let deck_filter = format!("eq.{}", urlencoding::encode(deck_name));
        let response = self
            .authed(self.client.delete(self.table_url(store::FLASHCARDS_TABLE)))
            .query(&[
                ("user_id", user_filter.as_str()),
                ("deck", deck_filter.as_str()),
            ])
            // return=representation echoes deleted rows so the caller can
            // distinguish "deck removed" from "deck never existed".
            .header("Prefer", "return=representation")
            .send()
            .await
            .map_err(|e| AppError::upstream("datastore", format!("delete request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response("deck delete", response).await);
        }

        let deleted: Vec<serde_json::Value> = response.json().await.map_err(|e| {
            AppError::upstream("datastore", format!("invalid delete response: {e}"))
        })?;
        Ok(deleted.len())
    }

    /// Adds `amount` to a user's `tokens_used` counter via the atomic
    /// server-side stored procedure.
    ///
    /// # Errors
    ///
    /// Returns an upstream error if the RPC fails.
    #[instrument(skip(self))]
    pub async fn increment_tokens_used(&self, user_id: &str, amount: u64) -> AppResult<()> {
        let response = self
            .authed(self.client.post(self.rpc_url(store::INCREMENT_RPC)))
            .json(&json!({ "p_user_id": user_id, "p_amount": amount }))
            .send()
            .await
            .map_err(|e| {
                AppError::upstream("datastore", format!("token increment request failed: {e}"))
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_from_response("token increment", response).await)
        }
    }
}
