// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! live-poll REST API server binary

use anyhow::Context;
use clap::Parser;
use lp_logging::CliLoggingArgs;
use lp_rest_server::{Server, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bind address for the server (default: 127.0.0.1:5000)
    #[arg(short, long, env = "LP_BIND")]
    bind: Option<SocketAddr>,

    /// Port to listen on, keeping the bind host
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Allow requests from any origin
    #[arg(long)]
    cors: bool,

    /// Disable per-client rate limiting
    #[arg(long)]
    no_rate_limit: bool,

    /// TOML configuration file
    #[arg(long, env = "LP_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    logging: CliLoggingArgs,
}

impl Args {
    fn into_config(self) -> anyhow::Result<(ServerConfig, CliLoggingArgs)> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ServerConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if self.cors {
            config.enable_cors = true;
        }
        if self.no_rate_limit {
            config.rate_limit.enabled = false;
        }

        let logging = self.logging.with_config_defaults(&config.logging);
        Ok((config, logging))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, logging) = Args::parse().into_config()?;
    logging.init("lp-rest-server")?;

    tracing::info!(
        bind = %config.bind_addr,
        cors_any = config.enable_cors,
        rate_limit = config.rate_limit.enabled,
        "Starting live poll server"
    );

    Server::new(config).run().await?;
    Ok(())
}
