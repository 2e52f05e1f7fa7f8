// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Live results view
//!
//! Polls the results endpoint on a fixed interval and reprints the tally when
//! it changes. Stops when the session is ended on the server.

use crate::output::render_results;
use clap::Args;
use lp_api_contract::validation::validate_session_key;
use lp_api_contract::PollResults;
use lp_rest_client::{RestClient, RestClientError};
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Fastest refresh allowed; keeps one watcher far below the server rate limit
pub const MIN_INTERVAL_MS: u64 = 250;

#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    pub key: String,
    /// Refresh interval in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub interval_ms: u64,
}

/// What the watch loop should do after one refresh
#[derive(Debug, PartialEq)]
pub enum WatchStep {
    Print(String),
    Unchanged,
    Ended,
}

/// Remembers the last rendered frame so that only changes are printed
#[derive(Debug, Default)]
pub struct WatchState {
    last: Option<String>,
}

impl WatchState {
    pub fn observe(&mut self, outcome: Result<PollResults, RestClientError>) -> WatchStep {
        let frame = match outcome {
            Ok(results) => render_results(&results),
            Err(err) if err.is_session_not_found() => return WatchStep::Ended,
            Err(err) if err.is_not_found() => "Waiting for the first poll...\n".to_string(),
            Err(err) => {
                tracing::warn!(error = %err, "Refresh failed, retrying");
                return WatchStep::Unchanged;
            }
        };

        if self.last.as_deref() == Some(frame.as_str()) {
            WatchStep::Unchanged
        } else {
            self.last = Some(frame.clone());
            WatchStep::Print(frame)
        }
    }
}

impl WatchArgs {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(MIN_INTERVAL_MS))
    }

    pub async fn run(self, client: &RestClient) -> anyhow::Result<()> {
        validate_session_key(&self.key)?;

        let mut ticker = tokio::time::interval(self.interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut state = WatchState::default();

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match state.observe(client.results(&self.key).await) {
                        WatchStep::Print(frame) => {
                            println!();
                            print!("{}", frame);
                        }
                        WatchStep::Unchanged => {}
                        WatchStep::Ended => {
                            println!("Session ended");
                            return Ok(());
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::debug!("Watch interrupted");
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lp_api_contract::{OptionTally, ProblemDetails};
    use lp_rest_client::StatusCode;

    fn not_found(error: &str) -> RestClientError {
        RestClientError::ServerError {
            status: StatusCode::NOT_FOUND,
            details: ProblemDetails::new("not-found", "Not Found", 404, error)
                .with_error_message(error),
        }
    }

    fn results(votes: u64) -> PollResults {
        PollResults {
            question: "Q".into(),
            max_votes: 1,
            active: true,
            participants: 2,
            voted: votes as usize,
            options: vec![OptionTally {
                option: "A".into(),
                votes,
                percent: votes as f64 * 50.0,
            }],
        }
    }

    #[test]
    fn prints_only_on_change() {
        let mut state = WatchState::default();
        assert!(matches!(state.observe(Ok(results(0))), WatchStep::Print(_)));
        assert_eq!(state.observe(Ok(results(0))), WatchStep::Unchanged);
        assert!(matches!(state.observe(Ok(results(1))), WatchStep::Print(_)));
    }

    #[test]
    fn ended_session_stops_the_watch() {
        let mut state = WatchState::default();
        assert_eq!(state.observe(Err(not_found("Session not found"))), WatchStep::Ended);
    }

    #[test]
    fn missing_poll_waits() {
        let mut state = WatchState::default();
        match state.observe(Err(not_found("No poll results yet"))) {
            WatchStep::Print(frame) => assert!(frame.contains("Waiting")),
            other => panic!("unexpected step {other:?}"),
        }
        assert_eq!(state.observe(Err(not_found("No poll results yet"))), WatchStep::Unchanged);
    }

    #[test]
    fn interval_has_a_floor() {
        let args = WatchArgs { key: "123456".into(), interval_ms: 5 };
        assert_eq!(args.interval(), Duration::from_millis(MIN_INTERVAL_MS));
    }
}
