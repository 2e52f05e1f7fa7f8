// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Session commands

use crate::output::{emit, render_session, render_summaries};
use clap::Subcommand;
use lp_api_contract::validation::validate_session_key;
use lp_rest_client::RestClient;

#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommands {
    /// Open a new session and print its key
    Create,
    /// Join a session as a participant
    Join { key: String },
    /// Stop new participants from joining
    Lock { key: String },
    /// Delete the session
    End { key: String },
    /// Show the current state of a session
    Show { key: String },
    /// List all live sessions
    List,
}

impl SessionCommands {
    pub async fn run(self, client: &RestClient, json: bool) -> anyhow::Result<()> {
        match self {
            SessionCommands::Create => {
                let session = client.create_session().await?;
                tracing::info!(key = %session.key, "Session created");
                emit(&session, json, |s| format!("Session key: {}\n", s.key))
            }
            SessionCommands::Join { key } => {
                validate_session_key(&key)?;
                let joined = client.join_session(&key).await?;
                emit(&joined, json, |j| {
                    format!("Joined session {} as user {}\n", j.session.key, j.user_id)
                })
            }
            SessionCommands::Lock { key } => {
                validate_session_key(&key)?;
                let session = client.lock_session(&key).await?;
                emit(&session, json, render_session)
            }
            SessionCommands::End { key } => {
                validate_session_key(&key)?;
                client.end_session(&key).await?;
                if !json {
                    println!("Session {} ended", key);
                }
                Ok(())
            }
            SessionCommands::Show { key } => {
                validate_session_key(&key)?;
                let session = client.get_session(&key).await?;
                emit(&session, json, render_session)
            }
            SessionCommands::List => {
                let sessions = client.list_sessions().await?;
                emit(&sessions, json, |list| render_summaries(&list.items))
            }
        }
    }
}
