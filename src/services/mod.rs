// ABOUTME: Business logic sitting between HTTP routes and external services
// ABOUTME: Card generation and chat, each wrapping the model provider
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recall AI

//! Application services.

mod chat;
mod generation;

pub use chat::{ChatReply, ChatService};
pub use generation::{GenerationOutcome, GenerationService};
