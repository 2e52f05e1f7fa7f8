// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Dependency wiring for the REST server

use crate::{config::ServerConfig, state::AppState};
use lp_core::{IdGenerator, InMemorySessionStore, RandomIdGenerator, SessionStore};
use std::sync::Arc;

/// Default dependency builder: an in-memory store with random ids
pub struct DefaultServerDependencies {
    state: AppState,
}

impl DefaultServerDependencies {
    pub fn new(config: ServerConfig) -> Self {
        Self::with_id_generator(config, Arc::new(RandomIdGenerator))
    }

    /// Build dependencies around a custom id source
    pub fn with_id_generator(config: ServerConfig, ids: Arc<dyn IdGenerator>) -> Self {
        let store = InMemorySessionStore::with_id_generator(ids)
            .with_max_attempts(config.max_id_attempts);
        let session_store: Arc<dyn SessionStore> = Arc::new(store);

        Self {
            state: AppState::new(session_store),
        }
    }

    /// Consume the dependency builder and return the resulting app state
    pub fn into_state(self) -> AppState {
        self.state
    }
}
