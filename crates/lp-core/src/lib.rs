// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Core session and poll logic for live-poll
//!
//! Sessions live in memory for the lifetime of the process. Every operation
//! that mutates a session runs under one write lock, so a vote and a
//! concurrent poll close can never observe each other half-applied.

pub mod error;
pub mod keys;
pub mod store;
pub mod tally;

pub use error::{PollError, PollResult};
pub use keys::{IdGenerator, RandomIdGenerator};
pub use store::{InMemorySessionStore, SessionStore};
pub use tally::tally;
