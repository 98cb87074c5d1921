use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use storefront::config::Settings;
use storefront::data::{Database, ProductStore};
use storefront::player::{ApiClient, PipelinePlayer};
use storefront::web::{run_server, AppState, ServerConfig};

#[derive(Parser)]
#[command(name = "storefront", version, about = "Demo product catalog service")]
struct Cli {
    /// Path to a settings file (defaults to ~/.storefront/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the catalog REST service (the default)
    Serve,
    /// Drive one pipeline playback run against a live server and print
    /// the trace
    Play {
        /// Base URL of the catalog service
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        url: String,
        /// Speed multiplier for the simulated stage delays
        #[arg(long, default_value_t = 1.0)]
        speed: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(settings).await,
        Command::Play { url, speed } => play(url, speed).await,
    }
}

async fn serve(settings: Settings) -> Result<()> {
    let db = Database::open_with_retry(
        settings.database.path.clone(),
        settings.database.connect_attempts,
        settings.database.retry_delay,
    )
    .await?;

    let state = AppState::new(ProductStore::new(db.connection()));
    let config = ServerConfig {
        host: settings.server.host,
        port: settings.server.port,
        cors_permissive: settings.server.cors_permissive,
    };

    run_server(state, config).await
}

async fn play(url: String, speed: f64) -> Result<()> {
    let player = PipelinePlayer::new(Arc::new(ApiClient::new(url)));
    player.set_speed(speed);

    let result = player.run().await;
    let state = player.state();

    for stage in &state.stages {
        println!("{} {:10} {}", stage.icon, stage.label, stage.status.as_str());
    }
    println!();
    for entry in state.log.entries() {
        println!("{}  {}", entry.timestamp.format("%H:%M:%S%.3f"), entry.message);
    }

    match result {
        Ok(products) => {
            println!(
                "\n{} products in {} ms",
                products.len(),
                state.response_time_ms.unwrap_or_default()
            );
            Ok(())
        }
        Err(err) => anyhow::bail!("playback failed: {err}"),
    }
}
