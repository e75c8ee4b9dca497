// ABOUTME: HTTP route modules and their shared wire types
// ABOUTME: Each endpoint group exposes a routes() constructor taking shared resources
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recall AI

//! HTTP API surface.

mod chat;
mod flashcards;
mod health;

pub use chat::{ChatRequestBody, ChatResponseBody, ChatRoutes};
pub use flashcards::{
    DeleteDeckRequest, DeleteDeckResponse, FlashcardRoutes, GenerateResponse, SaveDeckRequest,
    SaveDeckResponse,
};
pub use health::HealthRoutes;
