// ABOUTME: Unified error handling for the Recall API server
// ABOUTME: Defines error codes, HTTP status mapping, and the JSON error response format
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recall AI

//! # Unified Error Handling System
//!
//! This module provides the centralized error type for the Recall API server.
//! It defines standard error codes, HTTP response formatting, and conversion
//! into axum responses so every handler reports failures the same way.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Request is missing a required field or carries invalid input
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,
    /// A required field is absent or empty
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField,
    /// Caller did not identify themselves (empty user id)
    #[serde(rename = "AUTH_REQUIRED")]
    AuthRequired,
    /// The referenced resource (e.g. user profile) does not exist
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound,
    /// The user's cumulative token usage has reached the ceiling
    #[serde(rename = "QUOTA_EXCEEDED")]
    QuotaExceeded,
    /// The prompt template is missing, unreadable, or malformed
    #[serde(rename = "TEMPLATE_ERROR")]
    TemplateError,
    /// The model's output could not be parsed into the expected shape
    #[serde(rename = "PARSE_ERROR")]
    ParseError,
    /// An external collaborator (model service or datastore) failed
    #[serde(rename = "UPSTREAM_ERROR")]
    UpstreamError,
    /// Configuration error at startup or provider construction
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError,
    /// Catch-all internal server error
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> StatusCode {
        match self {
            Self::InvalidInput | Self::MissingRequiredField => StatusCode::BAD_REQUEST,
            Self::AuthRequired => StatusCode::UNAUTHORIZED,
            Self::ResourceNotFound => StatusCode::NOT_FOUND,
            Self::QuotaExceeded => StatusCode::TOO_MANY_REQUESTS,
            Self::TemplateError
            | Self::ParseError
            | Self::UpstreamError
            | Self::ConfigError
            | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::AuthRequired => "A user id is required for this operation",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::QuotaExceeded => "Monthly token quota exceeded",
            Self::TemplateError => "The prompt template could not be prepared",
            Self::ParseError => "The model response could not be parsed",
            Self::UpstreamError => "An external service encountered an error",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal server error occurred",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
#[error("{}: {}", .code.description(), .message)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional structured detail for diagnostics
    pub details: serde_json::Value,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: serde_json::Value::Null,
        }
    }

    /// Attach structured details to the error
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// Missing or empty required field
    pub fn missing_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("Missing required field: {field}"),
        )
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Caller did not supply a user id
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "User id is required")
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Token quota exceeded
    #[must_use]
    pub fn quota_exceeded(tokens_used: u64, limit: u64) -> Self {
        Self::new(
            ErrorCode::QuotaExceeded,
            format!("Token limit of {limit} reached"),
        )
        .with_details(serde_json::json!({
            "tokens_used": tokens_used,
            "limit": limit,
        }))
    }

    /// Prompt template failure
    pub fn template(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TemplateError, message)
    }

    /// Model output parse failure
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, message)
    }

    /// External collaborator failure, preserving the upstream message
    pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::UpstreamError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error payload
    pub error: ErrorResponseDetails,
}

/// Body of the unified error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable message carrying the underlying error text
    pub message: String,
    /// Structured diagnostic detail, omitted when null
    #[serde(skip_serializing_if = "serde_json::Value::is_null", default)]
    pub details: serde_json::Value,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
                details: error.details,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        if status.is_server_error() {
            tracing::error!(code = ?self.code, "request failed: {}", self.message);
        } else {
            tracing::debug!(code = ?self.code, "request rejected: {}", self.message);
        }
        (status, Json(ErrorResponse::from(self))).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(ErrorCode::InternalError, error.to_string())
    }
}
