// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for API contract validation and parsing

use thiserror::Error;

/// Errors that can occur during API contract validation and parsing
#[derive(Debug, Error)]
pub enum ApiContractError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid poll: {0}")]
    InvalidPoll(String),

    #[error("Invalid session key: {0}")]
    InvalidSessionKey(String),

    #[error("Invalid participant id: {0}")]
    InvalidUserId(String),
}

/// Problem+JSON error response format as per RFC 7807
///
/// `error` repeats `detail` so that clients written against the flat
/// `{"error": "..."}` body still find their message.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "std::collections::HashMap::is_empty", default)]
    pub errors: std::collections::HashMap<String, Vec<String>>,
}

impl ProblemDetails {
    pub fn new(slug: &str, title: &str, status: u16, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self {
            problem_type: format!("https://docs.example.com/errors/{}", slug),
            title: title.to_string(),
            status: Some(status),
            error: Some(detail.clone()),
            detail,
            errors: Default::default(),
        }
    }

    /// Replace the flat `error` message, keeping `detail` as is
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    /// Attach per-field messages, e.g. from a `validator::ValidationErrors`
    pub fn with_errors(mut self, errors: std::collections::HashMap<String, Vec<String>>) -> Self {
        self.errors = errors;
        self
    }
}
