use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tft_meta::api::state::AppState;
use tft_meta::api::{build_router, cors_layer};
use tft_meta::calculate::{average_placements, top_compositions};
use tft_meta::config::AppConfig;
use tft_meta::fetch::{RiotClient, RiotClientConfig};
use tft_meta::snapshot::MetaSnapshot;
use tft_meta::storage::StorageConfig;
use tft_meta::sync::{SyncConfig, SyncOrchestrator};

#[derive(Parser)]
#[command(name = "tft-meta")]
#[command(about = "Teamfight Tactics meta tracker: match aggregation and team suggestions")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect challenger matches into the match log
    Sync {
        /// Only walk the first N players
        #[arg(long)]
        max_players: Option<usize>,

        /// Rebuild the player cache from the ladder
        #[arg(long)]
        refresh_players: bool,

        /// Fetch but don't store
        #[arg(long)]
        dry_run: bool,
    },

    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the most played and highest placing compositions
    Report {
        /// Number of compositions to show
        #[arg(long)]
        top: Option<usize>,
    },
}

fn init_tracing(log_level: &str, json_logs: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }

    init_tracing(&config.log_level, cli.json_logs);
    tracing::info!("Starting tft-meta v{}", env!("CARGO_PKG_VERSION"));

    let storage = StorageConfig::new(config.data_dir.clone());

    match cli.command {
        Commands::Sync {
            max_players,
            refresh_players,
            dry_run,
        } => {
            let client = RiotClient::new(RiotClientConfig::from_config(&config.riot)?)?;
            let sync_config = SyncConfig {
                storage,
                matches_per_player: config.riot.matches_per_player,
                max_players,
                refresh_players,
                dry_run,
            };
            let orchestrator = SyncOrchestrator::new(sync_config, Arc::new(client));

            let result = orchestrator.sync_once().await?;
            println!("\n=== Sync Results ===");
            println!("Players:          {}", result.players);
            println!("New matches:      {}", result.matches_written);
            println!("Already logged:   {}", result.matches_skipped);
            println!("Duration:         {:?}", result.duration);
            if dry_run {
                println!("\n(dry run - no data written to disk)");
            }
            if !result.errors.is_empty() {
                println!("\nErrors:");
                for err in &result.errors {
                    println!("  - {}", err);
                }
            }
        }
        Commands::Serve { host, port } => {
            let snapshot = MetaSnapshot::load(&storage)?;
            let state = AppState::new(storage, snapshot, config.analysis.clone());
            let app = build_router(state).layer(cors_layer(&config.server.cors_origin));

            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Report { top } => {
            let snapshot = MetaSnapshot::load(&storage)?;
            let top = config.analysis.clamp_top(top);
            let table = &snapshot.tables.compositions;

            println!(
                "{} matches, {} boards, {} compositions\n",
                snapshot.matches,
                snapshot.records,
                table.len()
            );

            println!("=== Most Played ===");
            for (i, entry) in top_compositions(table, top).iter().enumerate() {
                println!("{:>3}. {:<40} {:>6}", i + 1, entry.name, entry.value);
            }

            println!("\n=== Highest Placing ===");
            for (i, entry) in average_placements(table, top).iter().enumerate() {
                println!("{:>3}. {:<40} {:>6.2}", i + 1, entry.name, entry.value);
            }
        }
    }

    Ok(())
}
