// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Server configuration

use crate::error::{ServerError, ServerResult};
use lp_logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Port used when neither the config file nor `PORT` names one
pub const DEFAULT_PORT: u16 = 5000;

/// Server configuration
///
/// Loaded from an optional TOML file; command-line flags and environment
/// variables are applied on top by the binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ServerConfig {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,

    /// Allow any origin; otherwise only `cors_origins` are accepted
    pub enable_cors: bool,

    /// Origins accepted when `enable_cors` is off
    pub cors_origins: Vec<String>,

    /// How many fresh ids to draw before reporting the key space as exhausted
    pub max_id_attempts: usize,

    pub rate_limit: RateLimitConfig,

    pub logging: LoggingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            enable_cors: false,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            max_id_attempts: lp_core::store::DEFAULT_MAX_ATTEMPTS,
            rate_limit: RateLimitConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file; missing keys keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| {
            ServerError::Config(format!("cannot read {}: {}", path.display(), err))
        })?;
        Self::from_toml(&text)
            .map_err(|err| ServerError::Config(format!("{}: {}", path.display(), err)))
    }

    pub fn from_toml(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|err| ServerError::Config(err.to_string()))
    }

    /// Keep the bind host, replace the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.bind_addr.set_port(port);
        self
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RateLimitConfig {
    pub enabled: bool,

    /// Requests per minute per client IP
    ///
    /// A classroom behind one NAT shares a single budget, and every dashboard
    /// or `lp watch` in it refreshes at least once a second.
    pub requests_per_minute: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_minute: 6000,
        }
    }
}
