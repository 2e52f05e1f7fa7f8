//! Server error types and handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lp_api_contract::{ApiContractError, ProblemDetails};
use lp_core::PollError;
use std::collections::HashMap;

/// Server result type
pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Poll(#[from] PollError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Rate limited")]
    RateLimited,
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Poll(err) => match err {
                PollError::SessionNotFound(_)
                | PollError::ParticipantNotFound { .. }
                | PollError::NoPollResults(_) => StatusCode::NOT_FOUND,
                PollError::SessionLocked(_) => StatusCode::FORBIDDEN,
                PollError::InvalidPoll(_) | PollError::InvalidVote(_) => StatusCode::BAD_REQUEST,
                PollError::NoActivePoll(_)
                | PollError::PollAlreadyActive(_)
                | PollError::AlreadyVoted(_) => StatusCode::CONFLICT,
                PollError::KeySpaceExhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            ServerError::Validation(_) | ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Config(_) | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Convert error to Problem+JSON response
    pub fn to_problem(&self) -> ProblemDetails {
        let status = self.status().as_u16();
        match self {
            ServerError::Poll(err) => {
                let (slug, title, message) = match err {
                    PollError::SessionNotFound(_) => {
                        ("not-found", "Session Not Found", "Session not found")
                    }
                    PollError::ParticipantNotFound { .. } => {
                        ("not-found", "Participant Not Found", "Participant not found")
                    }
                    PollError::NoPollResults(_) => {
                        ("not-found", "No Poll Results", "No poll results yet")
                    }
                    PollError::SessionLocked(_) => ("locked", "Session Locked", "Session locked"),
                    PollError::InvalidPoll(reason) => {
                        ("invalid-poll", "Invalid Poll", reason.as_str())
                    }
                    PollError::InvalidVote(reason) => {
                        ("invalid-vote", "Invalid Vote", reason.as_str())
                    }
                    PollError::NoActivePoll(_) => ("conflict", "No Active Poll", "No active poll"),
                    PollError::PollAlreadyActive(_) => {
                        ("conflict", "Poll Already Active", "Poll already active")
                    }
                    PollError::AlreadyVoted(_) => ("conflict", "Already Voted", "Already voted"),
                    PollError::KeySpaceExhausted(_) => {
                        ("unavailable", "Key Space Exhausted", "No free ids left")
                    }
                };
                ProblemDetails::new(slug, title, status, err.to_string())
                    .with_error_message(message)
            }
            ServerError::Validation(errors) => {
                ProblemDetails::new("validation", "Validation Error", status, errors.to_string())
                    .with_error_message("Request validation failed")
                    .with_errors(field_errors(errors))
            }
            ServerError::BadRequest(msg) => {
                ProblemDetails::new("bad-request", "Bad Request", status, msg.clone())
            }
            ServerError::Config(msg) | ServerError::Internal(msg) => {
                ProblemDetails::new("internal", "Internal Server Error", status, msg.clone())
            }
            ServerError::RateLimited => {
                ProblemDetails::new("rate-limited", "Rate Limited", status, "Too many requests")
            }
        }
    }
}

fn field_errors(errors: &validator::ValidationErrors) -> HashMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }
        (status, Json(self.to_problem())).into_response()
    }
}

impl From<ApiContractError> for ServerError {
    fn from(err: ApiContractError) -> Self {
        match err {
            ApiContractError::Validation(errors) => ServerError::Validation(errors),
            ApiContractError::InvalidPoll(msg) => ServerError::Poll(PollError::InvalidPoll(msg)),
            other => ServerError::BadRequest(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::BadRequest(rejection.body_text())
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(format!("IO error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_errors_map_to_statuses() {
        let cases = [
            (PollError::SessionNotFound("1".into()), 404),
            (PollError::SessionLocked("1".into()), 403),
            (PollError::InvalidVote("x".into()), 400),
            (PollError::InvalidPoll("x".into()), 400),
            (PollError::AlreadyVoted("1000".into()), 409),
            (PollError::NoActivePoll("1".into()), 409),
            (PollError::PollAlreadyActive("1".into()), 409),
            (PollError::KeySpaceExhausted("session key"), 503),
        ];
        for (err, status) in cases {
            assert_eq!(ServerError::from(err).status().as_u16(), status);
        }
    }

    #[test]
    fn problem_keeps_short_error_message() {
        let problem = ServerError::from(PollError::SessionNotFound("123456".into())).to_problem();
        assert_eq!(problem.status, Some(404));
        assert_eq!(problem.error.as_deref(), Some("Session not found"));
        assert!(problem.detail.contains("123456"));

        let locked = ServerError::from(PollError::SessionLocked("123456".into())).to_problem();
        assert_eq!(locked.error.as_deref(), Some("Session locked"));
    }

    #[test]
    fn validation_errors_list_fields() {
        use validator::Validate;

        let request = lp_api_contract::VoteRequest {
            key: None,
            user_id: "1000".into(),
            selected_options: vec![],
        };
        let err = ServerError::from(request.validate().unwrap_err());
        let problem = err.to_problem();
        assert_eq!(problem.status, Some(400));
        assert_eq!(
            problem.errors.get("selectedOptions").map(|v| v[0].as_str()),
            Some("Select at least one option")
        );
    }
}
