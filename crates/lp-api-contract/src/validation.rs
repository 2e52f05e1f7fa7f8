//! Validation helpers for API contract types

use crate::error::ApiContractError;
use crate::types::*;
use std::collections::HashSet;
use validator::Validate;

/// Session keys are six digits without a leading zero (100000..=999999)
pub const SESSION_KEY_LEN: usize = 6;

/// Participant ids are four digits without a leading zero (1000..=9999)
pub const USER_ID_LEN: usize = 4;

/// Validate a poll creation request
///
/// Beyond the derived field rules this rejects blank questions and options,
/// duplicate options (tallies are keyed by option text) and a `maxVotes`
/// larger than the number of options.
pub fn validate_create_poll_request(request: &CreatePollRequest) -> Result<(), ApiContractError> {
    request.validate()?;

    if request.question.trim().is_empty() {
        return Err(ApiContractError::InvalidPoll(
            "Question cannot be blank".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for option in &request.options {
        let option = option.trim();
        if option.is_empty() {
            return Err(ApiContractError::InvalidPoll(
                "Options cannot be blank".to_string(),
            ));
        }
        if !seen.insert(option) {
            return Err(ApiContractError::InvalidPoll(format!(
                "Duplicate option '{}'",
                option
            )));
        }
    }

    if request.max_votes as usize > request.options.len() {
        return Err(ApiContractError::InvalidPoll(format!(
            "maxVotes ({}) exceeds the number of options ({})",
            request.max_votes,
            request.options.len()
        )));
    }

    Ok(())
}

/// Trimmed question and options as they are stored
pub fn normalize_poll_request(request: &CreatePollRequest) -> (String, Vec<String>) {
    let question = request.question.trim().to_string();
    let options = request.options.iter().map(|o| o.trim().to_string()).collect();
    (question, options)
}

/// Validate the shape of a vote; poll-specific checks happen in the store
pub fn validate_vote_request(request: &VoteRequest) -> Result<(), ApiContractError> {
    request.validate()?;
    Ok(())
}

fn is_numeric_id(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit()) && !value.starts_with('0')
}

/// Validate session key format
pub fn validate_session_key(key: &str) -> Result<(), ApiContractError> {
    if is_numeric_id(key, SESSION_KEY_LEN) {
        Ok(())
    } else {
        Err(ApiContractError::InvalidSessionKey(format!(
            "expected {} digits, got '{}'",
            SESSION_KEY_LEN, key
        )))
    }
}

/// Validate participant id format
pub fn validate_user_id(user_id: &str) -> Result<(), ApiContractError> {
    if is_numeric_id(user_id, USER_ID_LEN) {
        Ok(())
    } else {
        Err(ApiContractError::InvalidUserId(format!(
            "expected {} digits, got '{}'",
            USER_ID_LEN, user_id
        )))
    }
}
