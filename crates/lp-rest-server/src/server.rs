// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Main server implementation

use crate::config::ServerConfig;
use crate::dependencies::DefaultServerDependencies;
use crate::error::{ServerError, ServerResult};
use crate::handlers;
use crate::middleware::{rate_limit_middleware, RateLimitState};
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

/// REST API server
pub struct Server {
    config: ServerConfig,
    app: Router,
}

impl Server {
    /// Create a server with the default in-memory store
    pub fn new(config: ServerConfig) -> Self {
        let state = DefaultServerDependencies::new(config.clone()).into_state();
        Self::with_state(config, state)
    }

    /// Construct a server from an already-built app state
    pub fn with_state(config: ServerConfig, state: AppState) -> Self {
        let app = Self::build_app(state, &config);
        Self { config, app }
    }

    fn cors_layer(config: &ServerConfig) -> CorsLayer {
        if config.enable_cors {
            return CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
        }

        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([axum::http::header::CONTENT_TYPE])
    }

    /// Build the Axum application with routes and middleware
    pub fn build_app(state: AppState, config: &ServerConfig) -> Router {
        let middleware_stack = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(Self::cors_layer(config))
            .layer(from_fn({
                let rate_limit_state = Arc::new(RateLimitState::new(config.rate_limit.clone()));
                move |req, next| {
                    let state = Arc::clone(&rate_limit_state);
                    rate_limit_middleware(state, req, next)
                }
            }));

        let api_routes = Router::new()
            // Health and status endpoints
            .route("/healthz", get(handlers::health::health_check))
            .route("/readyz", get(handlers::health::readiness_check))
            .route("/version", get(handlers::health::version))
            // Sessions
            .route(
                "/sessions",
                get(handlers::sessions::list_sessions).post(handlers::sessions::create_session),
            )
            .route(
                "/sessions/:key",
                get(handlers::sessions::get_session).delete(handlers::sessions::end_session),
            )
            .route("/sessions/:key/join", post(handlers::sessions::join_session))
            .route("/sessions/:key/lock", post(handlers::sessions::lock_session))
            // Polls
            .route("/sessions/:key/polls", post(handlers::polls::create_poll))
            .route("/sessions/:key/polls/close", post(handlers::polls::close_poll))
            .route("/sessions/:key/votes", post(handlers::polls::vote))
            .route("/sessions/:key/results", get(handlers::polls::results))
            .route("/sessions/:key/history", get(handlers::polls::history));

        let compat_routes = Router::new()
            .route("/create-session", post(handlers::compat::create_session))
            .route("/join-session", post(handlers::compat::join_session))
            .route("/lock-session", post(handlers::compat::lock_session))
            .route("/create-poll", post(handlers::compat::create_poll))
            .route("/vote", post(handlers::compat::vote))
            .route("/close-poll", post(handlers::compat::close_poll))
            .route("/session/:key", get(handlers::compat::get_session));

        Router::new()
            .nest("/api/v1", api_routes)
            .merge(compat_routes)
            .route("/openapi.json", get(handlers::openapi::openapi_spec))
            .with_state(state)
            .layer(middleware_stack)
    }

    /// Run until Ctrl-C or SIGTERM
    pub async fn run(self) -> ServerResult<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Run until `shutdown` resolves, then drain in-flight requests
    pub async fn run_until<F>(self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.bind_addr;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Live poll server listening on {}", listener.local_addr()?);

        axum::serve(
            listener,
            self.app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|err| ServerError::Internal(format!("REST server error: {err}")))?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
