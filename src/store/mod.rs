// ABOUTME: Datastore access layer for flashcard decks and user profiles
// ABOUTME: Talks to a hosted PostgREST-compatible API over HTTP
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recall AI

//! Persistence for decks and per-user token accounting.

mod client;

pub use client::{FlashcardRow, StoreClient};
