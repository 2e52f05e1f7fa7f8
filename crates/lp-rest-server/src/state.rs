//! Server state management

use lp_core::SessionStore;
use std::sync::Arc;
use std::time::Instant;

/// Shared server state
#[derive(Clone)]
pub struct AppState {
    pub session_store: Arc<dyn SessionStore>,

    /// Process start, reported by the version endpoint
    pub started_at: Instant,
}

impl AppState {
    pub fn new(session_store: Arc<dyn SessionStore>) -> Self {
        Self {
            session_store,
            started_at: Instant::now(),
        }
    }
}
