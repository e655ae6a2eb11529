use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use coursefind_client::{
    ChatSession, FixedPosition, LocationReporter, LocationStatus, Outcome, Position, SearchClient, SearchController,
    View,
};
use coursefind_core::{AppConfig, CacheDb, Clock, KvStore, MemoryStore, ResultCache, SystemClock};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod args;
mod surface;

use args::{Cli, Commands};
use surface::TerminalSurface;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = AppConfig::load().context("failed to load configuration")?;
    tracing::debug!(base_url = %config.base_url, "configuration loaded");

    let client = SearchClient::from_config(&config).context("failed to build backend client")?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = open_store(&config, cli.ephemeral).await?;

    match cli.command {
        Commands::Search { mode, pick, term } => {
            let cache = ResultCache::new(store, clock);
            let controller = SearchController::new(client, cache, Arc::new(TerminalSurface));
            let term = term.join(" ");

            let outcome = controller.submit_named(&term, &mode).await;
            if let (Some(n), Outcome::Fetched(View::Suggestions(list))) = (pick, &outcome) {
                let choice = n
                    .checked_sub(1)
                    .and_then(|i| list.suggestions.get(i))
                    .with_context(|| format!("no suggestion numbered {n}"))?;
                controller.choose_suggestion(choice).await;
            }
        }
        Commands::Ask { question } => {
            let mut chat = ChatSession::new(client, clock);
            if question.is_empty() {
                let mut lines = BufReader::new(tokio::io::stdin()).lines();
                while let Some(line) = lines.next_line().await? {
                    if let Some(reply) = chat.ask(&line).await {
                        println!("{}", reply.plain_text());
                    }
                }
            } else if let Some(reply) = chat.ask(&question.join(" ")).await {
                println!("{}", reply.plain_text());
            }
        }
        Commands::Locate { lat, lon } => {
            let position = lat
                .zip(lon)
                .or_else(|| config.fixed_position())
                .map(|(latitude, longitude)| Position { latitude, longitude });
            let reporter = LocationReporter::new(client, store, clock, Arc::new(FixedPosition(position)));
            match reporter.initialize().await {
                LocationStatus::ReportedCached(p) => println!("Reported cached location {}, {}", p.latitude, p.longitude),
                LocationStatus::ReportedFresh(p) => println!("Reported location {}, {}", p.latitude, p.longitude),
                status => {
                    if let Some(message) = status.message() {
                        eprintln!("{message}");
                    }
                }
            }
        }
        Commands::Evict => {
            let removed = ResultCache::new(store, clock).evict_expired().await;
            println!("Removed {removed} expired entries");
        }
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn open_store(config: &AppConfig, ephemeral: bool) -> Result<Arc<dyn KvStore>> {
    if ephemeral {
        return Ok(Arc::new(MemoryStore::with_quota(config.store_quota_bytes)));
    }
    let db = CacheDb::open(&config.db_path)
        .await
        .with_context(|| format!("failed to open store at {}", config.db_path.display()))?;
    Ok(Arc::new(db.with_quota(config.store_quota_bytes)))
}
