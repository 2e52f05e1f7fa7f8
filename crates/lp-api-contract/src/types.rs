//! API contract types for the live-poll REST service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// Six-digit numeric session key handed out to participants
pub type SessionKey = String;

/// Four-digit numeric participant id, unique within one session
pub type UserId = String;

/// A participant that joined a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Participant {
    #[cfg_attr(feature = "utoipa", schema(value_type = String))]
    pub id: UserId,
    /// Whether the participant already voted on the current poll
    pub voted: bool,
    /// Options selected on the current poll
    pub votes: Vec<String>,
}

impl Participant {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            voted: false,
            votes: Vec::new(),
        }
    }

    /// Clear the ballot so the participant can vote on a fresh poll
    pub fn reset_ballot(&mut self) {
        self.voted = false;
        self.votes.clear();
    }
}

/// A poll question with its options and running tallies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    pub question: String,
    pub options: Vec<String>,
    /// Maximum number of options a single participant may select
    pub max_votes: u32,
    /// Vote count per option; options nobody picked yet are absent
    pub votes: BTreeMap<String, u64>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub closed_at: Option<DateTime<Utc>>,
}

impl Poll {
    /// Number of votes recorded for `option`
    pub fn votes_for(&self, option: &str) -> u64 {
        self.votes.get(option).copied().unwrap_or(0)
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

/// Full session state as returned by every mutating endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[cfg_attr(feature = "utoipa", schema(value_type = String))]
    pub key: SessionKey,
    pub locked: bool,
    pub users: BTreeMap<UserId, Participant>,
    pub current_poll: Option<Poll>,
    pub poll_history: Vec<Poll>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(key: SessionKey) -> Self {
        Self {
            key,
            locked: false,
            users: BTreeMap::new(),
            current_poll: None,
            poll_history: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn participant_count(&self) -> usize {
        self.users.len()
    }

    /// Number of participants that voted on the current poll
    pub fn voted_count(&self) -> usize {
        self.users.values().filter(|u| u.voted).count()
    }

    pub fn has_active_poll(&self) -> bool {
        self.current_poll.as_ref().is_some_and(|p| p.active)
    }
}

/// Compact session view used by the session listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    #[cfg_attr(feature = "utoipa", schema(value_type = String))]
    pub key: SessionKey,
    pub locked: bool,
    pub participants: usize,
    pub has_active_poll: bool,
    pub polls_closed: usize,
    pub created_at: DateTime<Utc>,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        Self {
            key: session.key.clone(),
            locked: session.locked,
            participants: session.participant_count(),
            has_active_poll: session.has_active_poll(),
            polls_closed: session.poll_history.len(),
            created_at: session.created_at,
        }
    }
}

/// Session list response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct SessionListResponse {
    pub items: Vec<SessionSummary>,
    pub total: usize,
}

/// Join request; also accepted by the flat `/join-session` route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct JoinSessionRequest {
    #[cfg_attr(feature = "utoipa", schema(value_type = String))]
    pub key: SessionKey,
}

/// Result of joining: the session plus the freshly assigned participant id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct JoinSessionResponse {
    pub session: Session,
    #[cfg_attr(feature = "utoipa", schema(value_type = String))]
    pub user_id: UserId,
}

/// Body of the flat `/lock-session` and `/close-poll` routes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct SessionKeyRequest {
    #[cfg_attr(feature = "utoipa", schema(value_type = String))]
    pub key: SessionKey,
}

/// Poll creation request
///
/// `key` is only read by the flat `/create-poll` route; the nested route
/// takes the key from the path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreatePollRequest {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    #[cfg_attr(feature = "utoipa", schema(value_type = Option<String>))]
    pub key: Option<SessionKey>,
    #[validate(length(min = 1, message = "Question cannot be empty"))]
    pub question: String,
    #[validate(length(min = 2, message = "A poll needs at least two options"))]
    pub options: Vec<String>,
    #[serde(rename = "maxVotes")]
    #[validate(range(min = 1, message = "maxVotes must be at least 1"))]
    pub max_votes: u32,
}

/// Vote submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    #[cfg_attr(feature = "utoipa", schema(value_type = Option<String>))]
    pub key: Option<SessionKey>,
    #[serde(rename = "userId")]
    #[cfg_attr(feature = "utoipa", schema(value_type = String))]
    #[validate(length(min = 1, message = "userId cannot be empty"))]
    pub user_id: UserId,
    #[serde(rename = "selectedOptions")]
    #[validate(length(min = 1, message = "Select at least one option"))]
    pub selected_options: Vec<String>,
}

/// Tally for one poll option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct OptionTally {
    pub option: String,
    pub votes: u64,
    /// Share of session participants that picked this option, 0..=100
    pub percent: f64,
}

/// Live results of a poll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PollResults {
    pub question: String,
    pub max_votes: u32,
    pub active: bool,
    pub participants: usize,
    pub voted: usize,
    pub options: Vec<OptionTally>,
}

/// Closed polls of a session, oldest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct PollHistoryResponse {
    pub items: Vec<Poll>,
}
