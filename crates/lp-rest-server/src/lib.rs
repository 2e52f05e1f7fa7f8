// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! live-poll REST API server
//!
//! Serves the session, poll and voting endpoints under `/api/v1`, the flat
//! routes older dashboards call, and an OpenAPI document at `/openapi.json`.

pub mod config;
pub mod dependencies;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::Server;
