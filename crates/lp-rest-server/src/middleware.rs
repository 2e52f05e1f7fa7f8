//! Custom middleware

use crate::config::RateLimitConfig;
use crate::error::ServerError;
use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const WINDOW: Duration = Duration::from_secs(60);

/// Sliding one-minute window of request times per client
#[derive(Clone)]
pub struct RateLimitState {
    requests: Arc<Mutex<HashMap<String, Vec<Instant>>>>,
    config: RateLimitConfig,
}

impl RateLimitState {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            requests: Arc::new(Mutex::new(HashMap::new())),
            config,
        }
    }

    /// Record a request from `key`; false when it is over the limit
    pub async fn check_rate_limit(&self, key: &str) -> bool {
        self.check_at(key, Instant::now()).await
    }

    async fn check_at(&self, key: &str, now: Instant) -> bool {
        if !self.config.enabled {
            return true;
        }

        let mut requests = self.requests.lock().await;
        let window_start = now.checked_sub(WINDOW);
        // Drop idle clients so the map does not grow without bound
        requests.retain(|_, times| {
            times.retain(|&t| window_start.map_or(true, |start| t > start));
            !times.is_empty()
        });

        let client_requests = requests.entry(key.to_string()).or_default();
        if (client_requests.len() as u64) < self.config.requests_per_minute {
            client_requests.push(now);
            true
        } else {
            false
        }
    }
}

/// Client identity: first `x-forwarded-for` hop, else the peer address
fn client_key(req: &Request) -> String {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split(',').next())
    {
        return forwarded.trim().to_string();
    }
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit_middleware(
    state: Arc<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let client = client_key(&req);
    if state.check_rate_limit(&client).await {
        next.run(req).await
    } else {
        tracing::warn!(client = %client, "Rate limit exceeded");
        ServerError::RateLimited.into_response()
    }
}
