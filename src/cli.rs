use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use msgbrowse::model::SortOrder;

#[derive(Debug, Parser)]
#[command(name = "msgbrowse", version, about = "Browse a paginated message archive")]
pub struct Cli {
    /// Config file to use instead of the default location.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the stored auth token.
    #[command(subcommand)]
    Token(TokenCommand),
    /// Fetch and print messages.
    List(ListArgs),
}

#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Store a token, checking it against the server first.
    Set {
        token: String,
        /// Store without contacting the server.
        #[arg(long)]
        skip_validation: bool,
    },
    /// Show whether a token is stored.
    Show,
    /// Check the stored token against the server.
    Validate,
    /// Remove the stored token.
    Clear,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only show messages matching this term.
    #[arg(long, short)]
    pub search: Option<String>,

    /// Timestamp order: asc or desc.
    #[arg(long)]
    pub sort: Option<SortOrder>,

    /// Maximum number of pages to load.
    #[arg(long, default_value_t = 1)]
    pub pages: u32,

    /// Print messages as a JSON array.
    #[arg(long)]
    pub json: bool,
}
