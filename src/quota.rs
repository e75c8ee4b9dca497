// ABOUTME: Per-user token quota enforcement backed by the profiles table
// ABOUTME: Checks tokens_used against the fixed quota before any model call
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recall AI

//! Token quota enforcement.
//!
//! Every model-backed operation checks the caller's `tokens_used` counter
//! before spending anything. The check is advisory under concurrency: two
//! in-flight requests can both pass and push the counter past the quota,
//! which is accepted because the overshoot is bounded by one response.

use tracing::debug;

use crate::constants::limits;
use crate::errors::{AppError, AppResult};
use crate::store::StoreClient;

/// Gate that admits or rejects a user based on their token consumption.
#[derive(Debug, Clone)]
pub struct QuotaGuard {
    store: StoreClient,
    limit: u64,
}

impl QuotaGuard {
    #[must_use]
    pub fn new(store: StoreClient) -> Self {
        Self {
            store,
            limit: limits::TOKEN_QUOTA,
        }
    }

    /// Overrides the quota limit. Test hook.
    #[must_use]
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Verifies the user may spend tokens.
    ///
    /// # Errors
    ///
    /// - Auth error when `user_id` is empty.
    /// - Not-found error when the user has no profile row.
    /// - Quota error when `tokens_used` has reached the limit.
    /// - Upstream error when the profile lookup itself fails.
    pub async fn check(&self, user_id: &str) -> AppResult<()> {
        if user_id.trim().is_empty() {
            return Err(AppError::auth_required());
        }

        let tokens_used = self
            .store
            .tokens_used(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("user profile"))?;

        if tokens_used >= self.limit {
            return Err(AppError::quota_exceeded(tokens_used, self.limit));
        }

        debug!(tokens_used, limit = self.limit, "quota check passed");
        Ok(())
    }
}
