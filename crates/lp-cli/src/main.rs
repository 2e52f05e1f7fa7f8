// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Result;
use lp_cli::{Cli, Parser};
use lp_logging::CliLogLevel;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Command output goes to stdout; keep stderr quiet unless asked
    cli.logging.clone().init_with_default_level("lp", CliLogLevel::Warn)?;

    cli.run().await
}
