// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Poll lifecycle, voting and results endpoints

use crate::extract::ApiJson;
use crate::state::AppState;
use crate::ServerResult;
use axum::{
    extract::{Path, State},
    Json,
};
use lp_api_contract::validation::validate_vote_request;
use lp_api_contract::{CreatePollRequest, PollHistoryResponse, PollResults, Session, VoteRequest};

/// Start a poll; fails while another poll is running
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{key}/polls",
    params(("key" = String, Path, description = "Six-digit session key")),
    request_body = CreatePollRequest,
    responses(
        (status = 200, description = "Poll started", body = Session),
        (status = 400, description = "Invalid poll"),
        (status = 404, description = "Session not found"),
        (status = 409, description = "A poll is already running")
    )
)]
pub async fn create_poll(
    State(state): State<AppState>,
    Path(key): Path<String>,
    ApiJson(request): ApiJson<CreatePollRequest>,
) -> ServerResult<Json<Session>> {
    Ok(Json(state.session_store.create_poll(&key, &request).await?))
}

/// Close the running poll and move it to the history
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{key}/polls/close",
    params(("key" = String, Path, description = "Six-digit session key")),
    responses(
        (status = 200, description = "Poll closed", body = Session),
        (status = 404, description = "Session not found"),
        (status = 409, description = "No poll is running")
    )
)]
pub async fn close_poll(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ServerResult<Json<Session>> {
    Ok(Json(state.session_store.close_poll(&key).await?))
}

/// Cast a ballot on the running poll
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{key}/votes",
    params(("key" = String, Path, description = "Six-digit session key")),
    request_body = VoteRequest,
    responses(
        (status = 200, description = "Vote recorded", body = Session),
        (status = 400, description = "Invalid selection"),
        (status = 404, description = "Session or participant not found"),
        (status = 409, description = "No running poll or already voted")
    )
)]
pub async fn vote(
    State(state): State<AppState>,
    Path(key): Path<String>,
    ApiJson(request): ApiJson<VoteRequest>,
) -> ServerResult<Json<Session>> {
    validate_vote_request(&request)?;
    let session = state
        .session_store
        .vote(&key, &request.user_id, &request.selected_options)
        .await?;
    Ok(Json(session))
}

/// Live tally of the running poll, or of the last closed one
#[utoipa::path(
    get,
    path = "/api/v1/sessions/{key}/results",
    params(("key" = String, Path, description = "Six-digit session key")),
    responses(
        (status = 200, description = "Poll results", body = PollResults),
        (status = 404, description = "Session not found or no poll yet")
    )
)]
pub async fn results(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ServerResult<Json<PollResults>> {
    Ok(Json(state.session_store.results(&key).await?))
}

/// Closed polls, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/sessions/{key}/history",
    params(("key" = String, Path, description = "Six-digit session key")),
    responses(
        (status = 200, description = "Closed polls", body = PollHistoryResponse),
        (status = 404, description = "Session not found")
    )
)]
pub async fn history(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ServerResult<Json<PollHistoryResponse>> {
    let items = state.session_store.poll_history(&key).await?;
    Ok(Json(PollHistoryResponse { items }))
}
