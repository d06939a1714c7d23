// src/main.rs
mod config;
mod maps;
mod models;
mod monitor;
mod presence;
mod storage;
mod telemetry;
mod utils;

use std::path::PathBuf;
use std::sync::Arc;
use clap::Parser;
use env_logger::Env;
use log::{error, info};
use crate::config::Config;
use crate::maps::MapNames;
use crate::monitor::{FetchLoop, PresenceRotator};
use crate::presence::{LogPresence, PresenceSink, WebhookPresence};
use crate::storage::memory::SnapshotStore;
use crate::telemetry::StatusFetcher;

#[derive(Parser, Debug)]
#[command(
    name = "bf4-status-bot",
    about = "Shows the status of a BF4 or BattleBit Remastered server as a rotating presence"
)]
struct Args {
    /// Folder with default.toml and user.toml. BF4STATUSBOT_* environment variables
    /// override values from these files.
    #[arg(short, long, default_value = "config")]
    config_folder: PathBuf,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    dotenv::dotenv().ok();

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if let Err(e) = run(args).await {
        error!("{}", e);
        std::process::exit(2);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::load(&args.config_folder)?;
    info!(
        "Monitoring {} server {} (fetch every {:?}, presence every {:?}, map rotation {})",
        config.game,
        config.server,
        config.fetch_interval(),
        config.rotation_interval(),
        config.check_map
    );

    let maps = Arc::new(MapNames::load(config.maps_file.as_deref())?);

    let sink: Arc<dyn PresenceSink> = match &config.presence_webhook_url {
        Some(url) => Arc::new(WebhookPresence::new(url.clone(), config.request_timeout())?),
        None => Arc::new(LogPresence),
    };
    info!("Publishing presence via {}", sink.name());

    let store = Arc::new(SnapshotStore::new());
    let fetcher = Arc::new(StatusFetcher::new(&config, maps)?);

    let fetch_loop = FetchLoop::new(fetcher, store.clone(), config.fetch_interval())
        .with_jitter(config.fetch_jitter());
    let rotator = PresenceRotator::new(
        store,
        sink,
        config.check_map,
        config.rotation_interval(),
        config.fetch_interval(),
    );

    let fetch_task = tokio::spawn(fetch_loop.run());
    let presence_task = tokio::spawn(rotator.run());

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    fetch_task.abort();
    presence_task.abort();
    Ok(())
}
