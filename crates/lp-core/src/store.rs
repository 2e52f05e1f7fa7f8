// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Session storage and poll state transitions

use crate::error::{PollError, PollResult};
use crate::keys::{IdGenerator, RandomIdGenerator};
use crate::tally::tally;
use async_trait::async_trait;
use chrono::Utc;
use lp_api_contract::validation::{normalize_poll_request, validate_create_poll_request};
use lp_api_contract::{
    CreatePollRequest, Participant, Poll, PollResults, Session, SessionSummary, UserId,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// How many fresh ids are drawn before giving up on a collision streak
pub const DEFAULT_MAX_ATTEMPTS: usize = 64;

/// Session store interface
///
/// Every mutating call returns the session as it looks after the change.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create_session(&self) -> PollResult<Session>;
    async fn get_session(&self, key: &str) -> PollResult<Session>;
    async fn list_sessions(&self) -> PollResult<Vec<SessionSummary>>;
    async fn join_session(&self, key: &str) -> PollResult<(Session, UserId)>;
    async fn lock_session(&self, key: &str) -> PollResult<Session>;
    async fn end_session(&self, key: &str) -> PollResult<()>;
    async fn create_poll(&self, key: &str, request: &CreatePollRequest) -> PollResult<Session>;
    async fn vote(&self, key: &str, user_id: &str, selected: &[String]) -> PollResult<Session>;
    async fn close_poll(&self, key: &str) -> PollResult<Session>;
    /// Tally of the running poll, or of the last closed one when none runs
    async fn results(&self, key: &str) -> PollResult<PollResults>;
    async fn poll_history(&self, key: &str) -> PollResult<Vec<Poll>>;
}

/// In-memory session store
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ids: Arc<dyn IdGenerator>,
    max_attempts: usize,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::with_id_generator(Arc::new(RandomIdGenerator))
    }

    pub fn with_id_generator(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ids,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    fn fresh_id(
        &self,
        what: &'static str,
        next: impl Fn() -> String,
        taken: impl Fn(&str) -> bool,
    ) -> PollResult<String> {
        for _ in 0..self.max_attempts {
            let candidate = next();
            if !taken(&candidate) {
                return Ok(candidate);
            }
            debug!(candidate = %candidate, "{} collision, retrying", what);
        }
        Err(PollError::KeySpaceExhausted(what))
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

fn session_mut<'a>(
    sessions: &'a mut HashMap<String, Session>,
    key: &str,
) -> PollResult<&'a mut Session> {
    sessions.get_mut(key).ok_or_else(|| PollError::SessionNotFound(key.to_string()))
}

fn check_selection(poll: &Poll, selected: &[String]) -> PollResult<()> {
    if selected.is_empty() {
        return Err(PollError::InvalidVote("Select at least one option".to_string()));
    }
    if selected.len() > poll.max_votes as usize {
        return Err(PollError::InvalidVote(format!(
            "Select at most {} option(s)",
            poll.max_votes
        )));
    }
    let mut seen = HashSet::new();
    for option in selected {
        if !poll.has_option(option) {
            return Err(PollError::InvalidVote(format!("Unknown option '{}'", option)));
        }
        if !seen.insert(option.as_str()) {
            return Err(PollError::InvalidVote(format!(
                "Option '{}' selected more than once",
                option
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create_session(&self) -> PollResult<Session> {
        let mut sessions = self.sessions.write().await;
        let key = self.fresh_id(
            "session key",
            || self.ids.session_key(),
            |candidate| sessions.contains_key(candidate),
        )?;

        let session = Session::new(key.clone());
        sessions.insert(key.clone(), session.clone());
        info!(session = %key, "Session created");
        Ok(session)
    }

    async fn get_session(&self, key: &str) -> PollResult<Session> {
        let sessions = self.sessions.read().await;
        sessions.get(key).cloned().ok_or_else(|| PollError::SessionNotFound(key.to_string()))
    }

    async fn list_sessions(&self) -> PollResult<Vec<SessionSummary>> {
        let sessions = self.sessions.read().await;
        let mut items: Vec<SessionSummary> = sessions.values().map(SessionSummary::from).collect();

        // Newest first
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.key.cmp(&b.key)));
        Ok(items)
    }

    async fn join_session(&self, key: &str) -> PollResult<(Session, UserId)> {
        let mut sessions = self.sessions.write().await;
        let session = session_mut(&mut sessions, key)?;
        if session.locked {
            return Err(PollError::SessionLocked(key.to_string()));
        }

        let users = &session.users;
        let user_id = self.fresh_id(
            "user id",
            || self.ids.user_id(),
            |candidate| users.contains_key(candidate),
        )?;

        session.users.insert(user_id.clone(), Participant::new(user_id.clone()));
        info!(
            session = %key,
            user = %user_id,
            participants = session.users.len(),
            "Participant joined"
        );
        Ok((session.clone(), user_id))
    }

    async fn lock_session(&self, key: &str) -> PollResult<Session> {
        let mut sessions = self.sessions.write().await;
        let session = session_mut(&mut sessions, key)?;
        if !session.locked {
            session.locked = true;
            info!(session = %key, "Session locked");
        }
        Ok(session.clone())
    }

    async fn end_session(&self, key: &str) -> PollResult<()> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(key).ok_or_else(|| PollError::SessionNotFound(key.to_string()))?;
        info!(session = %key, "Session ended");
        Ok(())
    }

    async fn create_poll(&self, key: &str, request: &CreatePollRequest) -> PollResult<Session> {
        let mut sessions = self.sessions.write().await;
        let session = session_mut(&mut sessions, key)?;

        validate_create_poll_request(request)?;
        let (question, options) = normalize_poll_request(request);
        if session.has_active_poll() {
            return Err(PollError::PollAlreadyActive(key.to_string()));
        }

        for participant in session.users.values_mut() {
            participant.reset_ballot();
        }
        session.current_poll = Some(Poll {
            question,
            options,
            max_votes: request.max_votes,
            votes: BTreeMap::new(),
            active: true,
            created_at: Utc::now(),
            closed_at: None,
        });

        info!(session = %key, max_votes = request.max_votes, "Poll created");
        Ok(session.clone())
    }

    async fn vote(&self, key: &str, user_id: &str, selected: &[String]) -> PollResult<Session> {
        let mut sessions = self.sessions.write().await;
        let session = session_mut(&mut sessions, key)?;

        let poll = match session.current_poll.as_mut() {
            Some(poll) if poll.active => poll,
            _ => return Err(PollError::NoActivePoll(key.to_string())),
        };
        let participant =
            session.users.get_mut(user_id).ok_or_else(|| PollError::ParticipantNotFound {
                key: key.to_string(),
                user_id: user_id.to_string(),
            })?;
        if participant.voted {
            return Err(PollError::AlreadyVoted(user_id.to_string()));
        }
        check_selection(poll, selected)?;

        for option in selected {
            *poll.votes.entry(option.clone()).or_insert(0) += 1;
        }
        participant.voted = true;
        participant.votes = selected.to_vec();

        debug!(session = %key, user = %user_id, selected = selected.len(), "Vote recorded");
        Ok(session.clone())
    }

    async fn close_poll(&self, key: &str) -> PollResult<Session> {
        let mut sessions = self.sessions.write().await;
        let session = session_mut(&mut sessions, key)?;

        let mut poll = match session.current_poll.take() {
            Some(poll) if poll.active => poll,
            other => {
                session.current_poll = other;
                return Err(PollError::NoActivePoll(key.to_string()));
            }
        };
        poll.active = false;
        poll.closed_at = Some(Utc::now());
        session.poll_history.push(poll);

        info!(session = %key, polls_closed = session.poll_history.len(), "Poll closed");
        Ok(session.clone())
    }

    async fn results(&self, key: &str) -> PollResult<PollResults> {
        let sessions = self.sessions.read().await;
        let session =
            sessions.get(key).ok_or_else(|| PollError::SessionNotFound(key.to_string()))?;

        session
            .current_poll
            .as_ref()
            .or_else(|| session.poll_history.last())
            .map(|poll| tally(session, poll))
            .ok_or_else(|| PollError::NoPollResults(key.to_string()))
    }

    async fn poll_history(&self, key: &str) -> PollResult<Vec<Poll>> {
        let sessions = self.sessions.read().await;
        sessions
            .get(key)
            .map(|session| session.poll_history.clone())
            .ok_or_else(|| PollError::SessionNotFound(key.to_string()))
    }
}
