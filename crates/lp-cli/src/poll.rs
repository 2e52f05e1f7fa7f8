// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Poll and voting commands

use crate::output::{emit, render_history, render_results, render_session};
use clap::{Args, Subcommand};
use lp_api_contract::validation::{
    validate_create_poll_request, validate_session_key, validate_user_id,
};
use lp_api_contract::CreatePollRequest;
use lp_rest_client::RestClient;

#[derive(Subcommand, Debug, Clone)]
pub enum PollCommands {
    /// Start a new poll; the previous one must be closed first
    Create(CreatePollArgs),
    /// Close the active poll and archive it
    Close { key: String },
    /// Tally of the active poll, or of the last closed one
    Results { key: String },
    /// Closed polls of a session, oldest first
    History { key: String },
}

#[derive(Args, Debug, Clone)]
pub struct CreatePollArgs {
    pub key: String,
    #[arg(long, short = 'q')]
    pub question: String,
    /// Answer option; repeat for each option
    #[arg(long = "option", short = 'o', required = true)]
    pub options: Vec<String>,
    /// How many options a participant may pick
    #[arg(long, default_value_t = 1)]
    pub max_votes: u32,
}

impl CreatePollArgs {
    pub fn to_request(&self) -> CreatePollRequest {
        CreatePollRequest {
            key: None,
            question: self.question.clone(),
            options: self.options.clone(),
            max_votes: self.max_votes,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct VoteArgs {
    pub key: String,
    /// Participant id returned by `lp session join`
    #[arg(long, short = 'u')]
    pub user: String,
    /// Selected option; repeat up to the poll's vote limit
    #[arg(long = "option", short = 'o', required = true)]
    pub options: Vec<String>,
}

impl PollCommands {
    pub async fn run(self, client: &RestClient, json: bool) -> anyhow::Result<()> {
        match self {
            PollCommands::Create(args) => {
                validate_session_key(&args.key)?;
                let request = args.to_request();
                validate_create_poll_request(&request)?;
                let session = client.create_poll(&args.key, &request).await?;
                emit(&session, json, render_session)
            }
            PollCommands::Close { key } => {
                validate_session_key(&key)?;
                let session = client.close_poll(&key).await?;
                emit(&session, json, render_session)
            }
            PollCommands::Results { key } => {
                validate_session_key(&key)?;
                let results = client.results(&key).await?;
                emit(&results, json, render_results)
            }
            PollCommands::History { key } => {
                validate_session_key(&key)?;
                let history = client.history(&key).await?;
                emit(&history, json, |h| render_history(&h.items))
            }
        }
    }
}

impl VoteArgs {
    pub async fn run(self, client: &RestClient, json: bool) -> anyhow::Result<()> {
        validate_session_key(&self.key)?;
        validate_user_id(&self.user)?;
        let session = client.vote(&self.key, &self.user, &self.options).await?;
        tracing::info!(key = %self.key, user = %self.user, "Vote submitted");
        emit(&session, json, |_| format!("Vote recorded for {}\n", self.options.join(", ")))
    }
}
