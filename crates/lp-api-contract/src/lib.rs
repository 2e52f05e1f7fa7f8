// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! live-poll REST API contract types and validation
//!
//! This crate defines the wire types shared between the REST server, the
//! REST client and the `lp` command-line front end. Field names follow the
//! camelCase shape browsers already speak (`currentPoll`, `maxVotes`,
//! `selectedOptions`), so existing dashboards keep working.

pub mod error;
pub mod types;
pub mod validation;

pub use error::*;
pub use types::*;

/// Generate OpenAPI schema for the API contract types
#[cfg(feature = "utoipa")]
pub fn openapi_schema() -> utoipa::openapi::OpenApi {
    use utoipa::OpenApi;
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Live Poll REST API"),
        paths(),
        components(schemas(
            Participant,
            Poll,
            Session,
            SessionSummary,
            SessionListResponse,
            JoinSessionRequest,
            JoinSessionResponse,
            SessionKeyRequest,
            CreatePollRequest,
            VoteRequest,
            OptionTally,
            PollResults,
            PollHistoryResponse,
            ProblemDetails
        ))
    )]
    struct ApiDoc;
    ApiDoc::openapi()
}
