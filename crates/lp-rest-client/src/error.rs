// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Client error types

use lp_api_contract::ProblemDetails;
use reqwest::StatusCode;
use thiserror::Error;

pub type RestClientResult<T> = Result<T, RestClientError>;

#[derive(Debug, Error)]
pub enum RestClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server returned {status}: {}", .details.detail)]
    ServerError {
        status: StatusCode,
        details: ProblemDetails,
    },

    #[error("Unexpected response ({status}): {body}")]
    UnexpectedResponse { status: StatusCode, body: String },
}

impl RestClientError {
    /// HTTP status of a server-side failure
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RestClientError::ServerError { status, .. }
            | RestClientError::UnexpectedResponse { status, .. } => Some(*status),
            RestClientError::Http(err) => err.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// 404 for the session itself, as opposed to a missing participant or poll
    pub fn is_session_not_found(&self) -> bool {
        match self {
            RestClientError::ServerError { status, details } => {
                *status == StatusCode::NOT_FOUND
                    && details.error.as_deref() == Some("Session not found")
            }
            _ => false,
        }
    }

    /// Human readable message, preferring the server's own wording
    pub fn message(&self) -> String {
        match self {
            RestClientError::ServerError { details, .. } => details.detail.clone(),
            other => other.to_string(),
        }
    }
}
