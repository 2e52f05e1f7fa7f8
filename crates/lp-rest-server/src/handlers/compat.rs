//! Flat routes with the key in the request body
//!
//! Dashboards built for the first live-poll server post to `/create-session`,
//! `/vote` and friends and read `{"error": ...}` on failure. These handlers
//! accept those bodies and return the same shapes.

use crate::error::ServerError;
use crate::extract::ApiJson;
use crate::state::AppState;
use crate::ServerResult;
use axum::{
    extract::{Path, State},
    Json,
};
use lp_api_contract::validation::validate_vote_request;
use lp_api_contract::{
    CreatePollRequest, JoinSessionRequest, JoinSessionResponse, Session, SessionKeyRequest,
    VoteRequest,
};

fn required_key(key: Option<String>) -> ServerResult<String> {
    key.ok_or_else(|| ServerError::BadRequest("Missing session key".to_string()))
}

pub async fn create_session(State(state): State<AppState>) -> ServerResult<Json<Session>> {
    Ok(Json(state.session_store.create_session().await?))
}

pub async fn join_session(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<JoinSessionRequest>,
) -> ServerResult<Json<JoinSessionResponse>> {
    let (session, user_id) = state.session_store.join_session(&request.key).await?;
    Ok(Json(JoinSessionResponse { session, user_id }))
}

pub async fn lock_session(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SessionKeyRequest>,
) -> ServerResult<Json<Session>> {
    Ok(Json(state.session_store.lock_session(&request.key).await?))
}

pub async fn create_poll(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreatePollRequest>,
) -> ServerResult<Json<Session>> {
    let key = required_key(request.key.clone())?;
    Ok(Json(state.session_store.create_poll(&key, &request).await?))
}

pub async fn vote(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<VoteRequest>,
) -> ServerResult<Json<Session>> {
    validate_vote_request(&request)?;
    let key = required_key(request.key.clone())?;
    let session = state
        .session_store
        .vote(&key, &request.user_id, &request.selected_options)
        .await?;
    Ok(Json(session))
}

pub async fn close_poll(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SessionKeyRequest>,
) -> ServerResult<Json<Session>> {
    Ok(Json(state.session_store.close_poll(&request.key).await?))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ServerResult<Json<Session>> {
    Ok(Json(state.session_store.get_session(&key).await?))
}
