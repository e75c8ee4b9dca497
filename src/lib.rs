// ABOUTME: Crate root for the flashcard generation API server
// ABOUTME: Wires together config, services, datastore access, and HTTP routes
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recall AI

//! Backend API for AI-assisted flashcard study decks.
//!
//! The server exposes a small JSON HTTP API: flashcard generation, deck
//! save and delete, and a quota-gated chat endpoint. Generation and chat
//! call an OpenAI-compatible chat-completion API; decks and per-user token
//! accounting live in a hosted PostgREST-compatible datastore.
//!
//! # Architecture
//!
//! - [`config`] loads all settings from the environment.
//! - [`resources::ServerResources`] is built once at startup and injected
//!   into every route as shared state.
//! - [`services`] hold the business logic; [`routes`] stay thin.
//! - [`quota`] enforces the per-user token budget before any model call.

pub mod config;
pub mod constants;
pub mod errors;
pub mod llm;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod prompts;
pub mod quota;
pub mod resources;
pub mod routes;
pub mod server;
pub mod services;
pub mod store;
