//! Request extractors

use crate::error::ServerError;
use axum::extract::FromRequest;

/// `Json` whose rejections render as Problem+JSON
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub struct ApiJson<T>(pub T);
