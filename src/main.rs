use anyhow::{Context, Result};
use clap::Parser;
use gambit::cli::{parse_color, App, Cli, Commands, Config, PlayOptions};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            color,
            elo,
            fen,
            time,
        } => {
            let color = match color.as_deref() {
                Some(text) => parse_color(text)?,
                None => Some(gambit::chess::Color::White),
            };
            let app = App::new().await.context("Failed to initialize application")?;
            info!("Game archive at {}", app.config.database_path().display());

            app.handle_play(PlayOptions {
                color,
                target_elo: elo,
                start_fen: fen,
                time_control: time,
            })
            .await?;
        }
        Commands::Games { limit } => {
            let app = App::new().await.context("Failed to initialize application")?;
            app.handle_games(limit).await?;
        }
        Commands::Config { command } => {
            let config = match Config::load_or_create_default() {
                Ok(config) => config,
                Err(e) => {
                    error!("Failed to load configuration: {:#}", e);
                    return Err(e);
                }
            };
            let app = App::with_config(config)?;
            app.handle_config(command)?;
        }
    }

    Ok(())
}
