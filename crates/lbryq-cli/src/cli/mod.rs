//! CLI for lbryq.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use lbryq_core::config;
use std::path::PathBuf;

use commands::{run_classify, run_completions, run_man, run_preview, run_search, SearchArgs};

/// Top-level CLI for lbryq.
#[derive(Debug, Parser)]
#[command(name = "lbryq")]
#[command(about = "lbryq: classify LBRY search queries and follow claim-id redirects", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Classify a query without contacting the daemon.
    Classify {
        /// Raw search text.
        query: String,
        /// Print the analysis as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Build the search page for a query and follow a claim-id redirect if one applies.
    Search {
        /// Raw search text.
        #[arg(required_unless_present = "location")]
        query: Option<String>,
        /// Location query string instead of raw text (e.g. "?q=hello+world").
        #[arg(long, conflicts_with = "query")]
        location: Option<String>,
        /// Skip the claim-id lookup.
        #[arg(long)]
        no_lookup: bool,
        /// Treat the user as signed in (no ad slot).
        #[arg(long)]
        authenticated: bool,
        /// Override the daemon JSON-RPC URL from config.
        #[arg(long, value_name = "URL")]
        daemon_url: Option<String>,
    },

    /// Show the publish confirmation for a draft stored as JSON.
    Preview {
        /// Path to the draft JSON file.
        path: PathBuf,
    },

    /// Print shell completions.
    Completions {
        shell: Shell,
    },

    /// Print the man page.
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Completions { shell } => return run_completions(shell),
            CliCommand::Man => return run_man(),
            _ => {}
        }

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Classify { query, json } => run_classify(&query, json)?,
            CliCommand::Search {
                query,
                location,
                no_lookup,
                authenticated,
                daemon_url,
            } => {
                let args = SearchArgs {
                    query,
                    location,
                    no_lookup,
                    authenticated,
                    daemon_url,
                };
                run_search(&cfg, args).await?
            }
            CliCommand::Preview { path } => run_preview(&cfg, &path)?,
            CliCommand::Completions { .. } | CliCommand::Man => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
