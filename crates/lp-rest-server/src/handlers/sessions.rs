// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Session management endpoints

use crate::state::AppState;
use crate::ServerResult;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use lp_api_contract::{JoinSessionResponse, Session, SessionListResponse};

/// List sessions, newest first
#[utoipa::path(
    get,
    path = "/api/v1/sessions",
    responses((status = 200, description = "All live sessions", body = SessionListResponse))
)]
pub async fn list_sessions(
    State(state): State<AppState>,
) -> ServerResult<Json<SessionListResponse>> {
    let items = state.session_store.list_sessions().await?;
    let total = items.len();
    Ok(Json(SessionListResponse { items, total }))
}

/// Create a session with a fresh key
#[utoipa::path(
    post,
    path = "/api/v1/sessions",
    responses(
        (status = 201, description = "Session created", body = Session),
        (status = 503, description = "No free session keys")
    )
)]
pub async fn create_session(
    State(state): State<AppState>,
) -> ServerResult<(StatusCode, Json<Session>)> {
    let session = state.session_store.create_session().await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// Get a session by key
#[utoipa::path(
    get,
    path = "/api/v1/sessions/{key}",
    params(("key" = String, Path, description = "Six-digit session key")),
    responses(
        (status = 200, description = "Session state", body = Session),
        (status = 404, description = "Session not found")
    )
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ServerResult<Json<Session>> {
    Ok(Json(state.session_store.get_session(&key).await?))
}

/// End a session; later requests for its key get 404
#[utoipa::path(
    delete,
    path = "/api/v1/sessions/{key}",
    params(("key" = String, Path, description = "Six-digit session key")),
    responses(
        (status = 204, description = "Session ended"),
        (status = 404, description = "Session not found")
    )
)]
pub async fn end_session(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ServerResult<StatusCode> {
    state.session_store.end_session(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Join a session as a new participant
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{key}/join",
    params(("key" = String, Path, description = "Six-digit session key")),
    responses(
        (status = 200, description = "Joined", body = JoinSessionResponse),
        (status = 403, description = "Session locked"),
        (status = 404, description = "Session not found")
    )
)]
pub async fn join_session(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ServerResult<Json<JoinSessionResponse>> {
    let (session, user_id) = state.session_store.join_session(&key).await?;
    Ok(Json(JoinSessionResponse { session, user_id }))
}

/// Stop new participants from joining
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{key}/lock",
    params(("key" = String, Path, description = "Six-digit session key")),
    responses(
        (status = 200, description = "Session locked", body = Session),
        (status = 404, description = "Session not found")
    )
)]
pub async fn lock_session(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ServerResult<Json<Session>> {
    Ok(Json(state.session_store.lock_session(&key).await?))
}
