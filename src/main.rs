use anyhow::Result;
use clap::Parser;
use grid_snake::config::AppConfig;
use grid_snake::logging::init_logging;
use grid_snake::modes::PlayMode;
use grid_snake::session::GameSession;
use grid_snake::storage::FileStore;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Snake on a grid with player profiles and high scores")]
struct Cli {
    /// YAML settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Milliseconds between moves
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Profile storage file
    #[arg(long)]
    profiles: Option<PathBuf>,

    /// Log file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };

        if let Some(width) = self.width {
            config.game.grid_width = width;
        }
        if let Some(height) = self.height {
            config.game.grid_height = height;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.game.base_tick_ms = tick_ms;
        }
        if let Some(profiles) = self.profiles {
            config.profiles_path = profiles;
        }
        if let Some(log_file) = self.log_file {
            config.log_path = log_file;
        }

        config.ensure_valid()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Cli::parse().into_config()?;
    init_logging(&config.log_path)?;
    log::info!(
        "Starting {}x{} grid, profiles at {:?}",
        config.game.grid_width,
        config.game.grid_height,
        config.profiles_path
    );

    let session = GameSession::open(config.game, FileStore::new(config.profiles_path));
    let mut play_mode = PlayMode::new(session);
    play_mode.run().await?;

    log::info!("Exiting");
    Ok(())
}
