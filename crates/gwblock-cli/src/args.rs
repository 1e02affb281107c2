//! Command-line argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Keep a Zero Trust Gateway DNS blocklist in sync with public adlists
///
/// Credentials are read from the CF_API_TOKEN and CF_IDENTIFIER
/// environment variables.
#[derive(Parser, Debug)]
#[command(name = "gwblock")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "gwblock.toml", global = true)]
    pub config: PathBuf,

    /// Increase log verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download the sources and converge remote state onto them
    Run,

    /// Delete every owned list and policy from the remote
    Leave,
}
