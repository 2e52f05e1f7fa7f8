// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Errors raised by session and poll operations

use lp_api_contract::ApiContractError;
use thiserror::Error;

pub type PollResult<T> = Result<T, PollError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PollError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session locked: {0}")]
    SessionLocked(String),

    #[error("Participant {user_id} not found in session {key}")]
    ParticipantNotFound { key: String, user_id: String },

    #[error("Session {0} has no active poll")]
    NoActivePoll(String),

    #[error("Session {0} already has an active poll")]
    PollAlreadyActive(String),

    #[error("Session {0} has no poll results yet")]
    NoPollResults(String),

    #[error("Participant {0} already voted on this poll")]
    AlreadyVoted(String),

    #[error("Invalid poll: {0}")]
    InvalidPoll(String),

    #[error("Invalid vote: {0}")]
    InvalidVote(String),

    #[error("No free {0} left")]
    KeySpaceExhausted(&'static str),
}

impl From<ApiContractError> for PollError {
    fn from(err: ApiContractError) -> Self {
        PollError::InvalidPoll(err.to_string())
    }
}
