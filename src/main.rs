mod cli;

use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;

use msgbrowse::api::{AuthApi, MessagesApi, TokenValidity};
use msgbrowse::auth::TokenHolder;
use msgbrowse::config::Config;
use msgbrowse::logging::init_tracing;
use msgbrowse::messages::MessagesStore;
use msgbrowse::model::Message;
use msgbrowse::storage::{FileStore, KeyValueStore, MemoryStore};

use crate::cli::{Cli, Command, ListArgs, TokenCommand};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    let data_dir = config.storage.resolve_data_dir();
    tracing::debug!(data_dir = %data_dir.display(), "Using durable store");

    let durable: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(data_dir));
    let token = TokenHolder::load(durable);

    match cli.command {
        Command::Token(cmd) => run_token(cmd, &config, &token).await,
        Command::List(args) => run_list(args, &config, token).await,
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    match &cli.config {
        Some(path) => {
            if !path.exists() {
                bail!("Config file '{}' does not exist", path.display());
            }
            Config::load_from(path).context("Failed to load configuration")
        }
        None => Config::load().context("Failed to load configuration"),
    }
}

async fn check_token(config: &Config, token: &str) -> anyhow::Result<TokenValidity> {
    let auth = AuthApi::new(&config.api).context("Failed to create API client")?;
    auth.validate_token(token)
        .await
        .context("Failed to reach the token check endpoint")
}

async fn run_token(cmd: TokenCommand, config: &Config, holder: &TokenHolder) -> anyhow::Result<()> {
    match cmd {
        TokenCommand::Set {
            token,
            skip_validation,
        } => {
            if token.trim().is_empty() {
                bail!("Token must not be empty");
            }
            if !skip_validation {
                if let TokenValidity::Rejected { status } = check_token(config, &token).await? {
                    bail!("Token rejected by server (HTTP {})", status);
                }
            }
            holder.set(token);
            println!("Token saved.");
        }
        TokenCommand::Show => {
            let token = holder.get();
            if token.is_empty() {
                println!("No token set.");
            } else {
                println!("Token is set ({}).", token);
            }
        }
        TokenCommand::Validate => {
            let token = holder.get();
            if token.is_empty() {
                bail!("No token set; run `msgbrowse token set <TOKEN>` first");
            }
            match check_token(config, token.expose()).await? {
                TokenValidity::Valid => println!("Token is valid."),
                TokenValidity::Rejected { status } => {
                    bail!("Token rejected by server (HTTP {})", status)
                }
            }
        }
        TokenCommand::Clear => {
            holder.clear();
            println!("Token removed.");
        }
    }
    Ok(())
}

async fn run_list(args: ListArgs, config: &Config, token: TokenHolder) -> anyhow::Result<()> {
    if token.get().is_empty() {
        tracing::warn!("No auth token set; the server will likely reject the request");
    }

    let api = MessagesApi::new(&config.api).context("Failed to create API client")?;
    let session: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let store = MessagesStore::new(api, token, session);

    if let Some(term) = args.search {
        store.set_search_term(term);
    }
    if let Some(order) = args.sort {
        store.set_sort_order(order);
    }

    for page in 0..args.pages {
        if !store.state().can_load_more() {
            break;
        }
        store
            .load_next_page()
            .await
            .with_context(|| format!("Failed to load page {}", page + 1))?;
    }

    let state = store.state();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&state.messages)?);
    } else {
        for msg in &state.messages {
            println!("{}", format_line(msg));
        }
        if state.has_more {
            eprintln!(
                "{} messages shown; more available (use --pages to load further).",
                state.messages.len()
            );
        }
    }
    Ok(())
}

fn format_line(msg: &Message) -> String {
    let when = msg
        .time()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| msg.ts.clone());
    let text = msg.text.replace('\n', " ");
    format!("{}  {:<20}  {}", when, msg.author.label(), text)
}
