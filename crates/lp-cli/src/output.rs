// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Terminal rendering for sessions, polls and live results

use lp_api_contract::{Poll, PollResults, Session, SessionSummary};
use serde::Serialize;
use std::fmt::Write;

const BAR_WIDTH: usize = 30;

/// Print `value` as pretty JSON or through `render`
pub fn emit<T: Serialize>(
    value: &T,
    json: bool,
    render: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", render(value));
    }
    Ok(())
}

/// Horizontal bar for a percentage in `0..=100`
pub fn bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

pub fn render_results(results: &PollResults) -> String {
    let mut out = String::new();
    let state = if results.active { "open" } else { "closed" };
    let _ = writeln!(out, "{} [{}]", results.question, state);
    let _ = writeln!(
        out,
        "{} of {} participants voted (up to {} choice{})",
        results.voted,
        results.participants,
        results.max_votes,
        plural(results.max_votes)
    );

    let width = results.options.iter().map(|o| o.option.chars().count()).max().unwrap_or(0);
    for tally in &results.options {
        let _ = writeln!(
            out,
            "  {:<width$}  {}  {:>5.1}%  ({})",
            tally.option,
            bar(tally.percent),
            tally.percent,
            tally.votes,
            width = width
        );
    }
    out
}

fn plural(count: u32) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

fn render_poll(out: &mut String, poll: &Poll) {
    let _ = writeln!(
        out,
        "  {} (max {} vote{})",
        poll.question,
        poll.max_votes,
        plural(poll.max_votes)
    );
    for option in &poll.options {
        let _ = writeln!(out, "    - {}: {}", option, poll.votes_for(option));
    }
}

pub fn render_session(session: &Session) -> String {
    let mut out = String::new();
    let locked = if session.locked { " (locked)" } else { "" };
    let _ = writeln!(out, "Session {}{}", session.key, locked);
    let _ = writeln!(
        out,
        "Participants: {} ({} voted)",
        session.participant_count(),
        session.voted_count()
    );
    match &session.current_poll {
        Some(poll) => {
            let _ = writeln!(out, "Current poll:");
            render_poll(&mut out, poll);
        }
        None => {
            let _ = writeln!(out, "No active poll");
        }
    }
    if !session.poll_history.is_empty() {
        let _ = writeln!(out, "Closed polls: {}", session.poll_history.len());
    }
    out
}

pub fn render_history(polls: &[Poll]) -> String {
    if polls.is_empty() {
        return "No closed polls\n".to_string();
    }
    let mut out = String::new();
    for (index, poll) in polls.iter().enumerate() {
        let _ = writeln!(out, "#{}", index + 1);
        render_poll(&mut out, poll);
    }
    out
}

pub fn render_summaries(sessions: &[SessionSummary]) -> String {
    if sessions.is_empty() {
        return "No sessions\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8}  {:<6}  {:>12}  {:<6}  {:>6}",
        "KEY", "LOCKED", "PARTICIPANTS", "POLL", "CLOSED"
    );
    for s in sessions {
        let _ = writeln!(
            out,
            "{:<8}  {:<6}  {:>12}  {:<6}  {:>6}",
            s.key,
            if s.locked { "yes" } else { "no" },
            s.participants,
            if s.has_active_poll { "active" } else { "-" },
            s.polls_closed
        );
    }
    out
}
