// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! REST API client for the live-poll service
//!
//! Thin typed wrapper over the `/api/v1` routes. Errors returned by the
//! server arrive as [`RestClientError::ServerError`] carrying the decoded
//! Problem+JSON body.

pub mod client;
pub mod error;

pub use client::*;
pub use error::*;
pub use reqwest::StatusCode;
