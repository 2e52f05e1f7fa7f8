// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use clap::Subcommand;
use lp_logging::CliLoggingArgs;
use lp_rest_client::RestClient;
use url::Url;

pub mod output;
pub mod poll;
pub mod session;
pub mod watch;

pub use clap::Parser;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[derive(clap::Parser)]
#[command(
    name = "lp",
    about = "Live poll CLI",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Base URL of the live-poll server
    #[arg(long, env = "LP_SERVER_URL", default_value = DEFAULT_SERVER_URL, global = true)]
    pub server: Url,
    /// Print raw JSON instead of formatted output
    #[arg(long, global = true)]
    pub json: bool,
    #[command(flatten)]
    pub logging: CliLoggingArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create, join, lock, inspect and end sessions
    Session {
        #[command(subcommand)]
        subcommand: session::SessionCommands,
    },
    /// Organizer poll management
    Poll {
        #[command(subcommand)]
        subcommand: poll::PollCommands,
    },
    /// Cast a ballot in the active poll
    Vote(poll::VoteArgs),
    /// Follow live results until the session ends
    Watch(watch::WatchArgs),
    /// Check that the server is reachable
    Health,
}

impl Cli {
    pub fn client(&self) -> anyhow::Result<RestClient> {
        Ok(RestClient::new(self.server.clone())?)
    }

    /// Dispatch the parsed command against the configured server
    pub async fn run(self) -> anyhow::Result<()> {
        let client = self.client()?;
        tracing::debug!(server = %self.server, "Using live-poll server");
        match self.command {
            Commands::Session { subcommand } => subcommand.run(&client, self.json).await,
            Commands::Poll { subcommand } => subcommand.run(&client, self.json).await,
            Commands::Vote(args) => args.run(&client, self.json).await,
            Commands::Watch(args) => args.run(&client).await,
            Commands::Health => {
                let health = client.health().await?;
                println!("{} ({})", health.status, health.timestamp);
                Ok(())
            }
        }
    }
}
