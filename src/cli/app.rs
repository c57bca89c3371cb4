use crate::adapters::{ArchiveLearning, RandomEngine, SoundManager, DEFAULT_THINK_TIME_MS};
use crate::chess::Color;
use crate::cli::commands::ConfigCommand;
use crate::cli::display::{display_games_list, format_timestamp};
use crate::cli::game_ops::run_interactive;
use crate::game::{
    DrawPolicy, GameConfig, GameController, GameSession, GameSettings, TimeControl,
    DEFAULT_TARGET_ELO,
};
use crate::storage::Archive;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Environment variable that relocates the data directory
pub const DATA_DIR_ENV: &str = "GAMBIT_DATA_DIR";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Data directory holding the game archive
    pub data_dir: PathBuf,
    /// Engine strength used when `play` is not given `--elo`
    pub default_target_elo: u32,
    pub draw_policy: DrawPolicy,
    /// Simulated thinking window of the built-in engine, in ms
    pub engine_min_think_ms: u64,
    pub engine_max_think_ms: u64,
    /// Give up on the engine after this many ms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_timeout_ms: Option<u64>,
    /// Ring the terminal bell for illegal moves and game end
    pub terminal_bell: bool,
    /// Time control used when `play` is not given `--time`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_time_control: Option<TimeControl>,
    pub settings: GameSettings,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = Self::default_data_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            data_dir,
            default_target_elo: DEFAULT_TARGET_ELO,
            draw_policy: DrawPolicy::AutoAccept,
            engine_min_think_ms: DEFAULT_THINK_TIME_MS.0,
            engine_max_think_ms: DEFAULT_THINK_TIME_MS.1,
            engine_timeout_ms: None,
            terminal_bell: true,
            default_time_control: None,
            settings: GameSettings::default(),
        }
    }
}

impl Config {
    /// Data directory named by `GAMBIT_DATA_DIR`, if set
    pub fn data_dir_override() -> Option<PathBuf> {
        std::env::var_os(DATA_DIR_ENV)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
    }

    /// Get the default data directory; `GAMBIT_DATA_DIR` takes precedence
    pub fn default_data_dir() -> Result<PathBuf> {
        if let Some(dir) = Self::data_dir_override() {
            return Ok(dir);
        }
        ProjectDirs::from("dev", "gambit", "gambit")
            .map(|proj_dirs| proj_dirs.data_dir().to_path_buf())
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
    }

    /// Get the default config directory
    pub fn default_config_dir() -> Result<PathBuf> {
        ProjectDirs::from("dev", "gambit", "gambit")
            .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    /// Get the default config file path
    pub fn default_config_file() -> Result<PathBuf> {
        Ok(Self::default_config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub fn load_or_create_default() -> Result<Self> {
        let config_file = Self::default_config_file()?;

        if config_file.exists() {
            let mut config = Self::load_from(&config_file)?;
            if let Some(dir) = Self::data_dir_override() {
                config.data_dir = dir;
            }
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).context("Failed to read configuration file")?;
        let config: Config =
            toml::from_str(&content).context("Failed to parse configuration file")?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_config_file()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content).context("Failed to write configuration file")?;

        Ok(())
    }

    /// Get the archive database path
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("archive.sqlite")
    }

    pub fn engine_timeout(&self) -> Option<Duration> {
        self.engine_timeout_ms.map(Duration::from_millis)
    }
}

/// Options of the `play` command after validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayOptions {
    /// `None` picks a side at random
    pub color: Option<Color>,
    pub target_elo: Option<u32>,
    pub start_fen: Option<String>,
    pub time_control: Option<TimeControl>,
}

/// Main application state
pub struct App {
    /// Finished games and visited positions
    pub archive: Archive,
    /// Application configuration
    pub config: Config,
}

impl App {
    /// Create a new App instance with proper initialization
    pub async fn new() -> Result<Self> {
        // Load or create configuration
        let config =
            Config::load_or_create_default().context("Failed to initialize configuration")?;
        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Result<Self> {
        // Ensure data directory exists
        Self::ensure_data_dir(&config.data_dir).context("Failed to create data directory")?;

        let archive =
            Archive::open(&config.database_path()).context("Failed to open game archive")?;

        Ok(App { archive, config })
    }

    /// Ensure data directory exists with proper permissions
    pub fn ensure_data_dir(data_dir: &PathBuf) -> Result<()> {
        if !data_dir.exists() {
            std::fs::create_dir_all(data_dir).with_context(|| {
                format!("Failed to create data directory: {}", data_dir.display())
            })?;
        }

        // Verify directory is writable
        let test_file = data_dir.join(".write_test");
        std::fs::write(&test_file, "test")
            .with_context(|| format!("Data directory is not writable: {}", data_dir.display()))?;
        std::fs::remove_file(&test_file).context("Failed to clean up write test file")?;

        Ok(())
    }

    /// Controller wired to the built-in engine, the archive and the sound manager.
    ///
    /// Timed games get a wall clock so the side to move is charged.
    pub fn build_controller(&self, game: &GameConfig) -> GameController {
        let engine = RandomEngine::with_think_time(
            self.config.engine_min_think_ms,
            self.config.engine_max_think_ms,
        );
        let learning = ArchiveLearning::new(self.archive.clone());
        let settings = &self.config.settings;
        let feedback = SoundManager::new(settings.sound_enabled, settings.sound_volume)
            .with_bell(self.config.terminal_bell);

        let controller =
            GameController::new(Arc::new(engine), Arc::new(learning), Arc::new(feedback))
                .with_session(GameSession::with_settings(
                    settings.clone(),
                    self.config.draw_policy,
                ))
                .with_engine_timeout(self.config.engine_timeout());

        if game.time_control.is_some() {
            controller.with_wall_clock()
        } else {
            controller
        }
    }

    /// Build a controller for `game` and start it
    pub async fn start_game(&self, game: GameConfig) -> Result<GameController> {
        let mut controller = self.build_controller(&game);
        controller
            .new_game(game)
            .await
            .context("Failed to start game")?;
        Ok(controller)
    }

    /// Resolve `play` options against the configured defaults
    pub fn game_config(&self, options: PlayOptions) -> GameConfig {
        let player_color = options.color.unwrap_or_else(|| {
            if rand::thread_rng().gen_bool(0.5) {
                Color::White
            } else {
                Color::Black
            }
        });

        GameConfig {
            player_color,
            start_fen: options.start_fen,
            time_control: options.time_control.or(self.config.default_time_control),
            target_elo: Some(options.target_elo.unwrap_or(self.config.default_target_elo)),
        }
    }

    /// Handle the 'play' command - interactive game against the engine
    pub async fn handle_play(&self, options: PlayOptions) -> Result<()> {
        let config = self.game_config(options);
        info!(
            "Starting game as {:?} against elo {:?}",
            config.player_color, config.target_elo
        );

        let mut controller = self.start_game(config).await?;
        run_interactive(&mut controller).await
    }

    /// Handle the 'games' command - list archived games
    pub async fn handle_games(&self, limit: u32) -> Result<()> {
        let games = self
            .archive
            .recent_games(limit)
            .context("Failed to retrieve games from archive")?;
        let (white, black, draws) = self
            .archive
            .outcome_counts()
            .context("Failed to count archived games")?;

        if games.is_empty() {
            println!("No games found.");
            println!("Use 'gambit play' to start a new game.");
            return Ok(());
        }

        display_games_list(&games);
        println!(
            "White wins: {}   Black wins: {}   Draws: {}",
            white, black, draws
        );
        if let Some(latest) = games.first() {
            println!("Last game recorded {}", format_timestamp(latest.recorded_at));
        }

        Ok(())
    }

    /// Handle the 'config' command
    pub fn handle_config(&self, command: ConfigCommand) -> Result<()> {
        match command {
            ConfigCommand::Path => {
                let path = Config::default_config_file()?;
                println!("{}", path.display());
            }
            ConfigCommand::Show => {
                let content = toml::to_string_pretty(&self.config)
                    .context("Failed to serialize configuration")?;
                println!("{}", content);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.default_target_elo, 2600);
        assert_eq!(config.draw_policy, DrawPolicy::AutoAccept);
        assert_eq!(config.engine_timeout(), None);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config {
            default_time_control: Some(TimeControl::new(5, 3)),
            engine_timeout_ms: Some(2_000),
            ..Config::default()
        };
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("draw_policy = \"decline\"").unwrap();
        assert_eq!(config.draw_policy, DrawPolicy::Decline);
        assert_eq!(config.default_target_elo, DEFAULT_TARGET_ELO);
        assert!(config.settings.sound_enabled);
    }

    #[test]
    fn test_data_dir_env_override() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("override");
        std::env::set_var(DATA_DIR_ENV, &dir);

        let resolved = Config::default_data_dir().unwrap();
        let config = Config::default();
        std::env::remove_var(DATA_DIR_ENV);

        assert_eq!(resolved, dir);
        assert_eq!(config.database_path(), dir.join("archive.sqlite"));

        let app = App::with_config(config).unwrap();
        assert!(dir.join("archive.sqlite").exists());
        assert!(app.archive.recent_games(1).unwrap().is_empty());
    }

    #[test]
    fn test_ensure_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("gambit_data");

        // Directory doesn't exist yet
        assert!(!data_dir.exists());

        // Should create directory
        App::ensure_data_dir(&data_dir).unwrap();
        assert!(data_dir.exists());

        // Should work if directory already exists
        App::ensure_data_dir(&data_dir).unwrap();
    }

    #[test]
    fn test_game_config_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let app = App::with_config(Config {
            data_dir: temp_dir.path().to_path_buf(),
            default_target_elo: 1500,
            default_time_control: Some(TimeControl::new(10, 0)),
            ..Config::default()
        })
        .unwrap();

        let config = app.game_config(PlayOptions {
            color: Some(Color::Black),
            target_elo: None,
            start_fen: None,
            time_control: None,
        });
        assert_eq!(config.player_color, Color::Black);
        assert_eq!(config.target_elo, Some(1500));
        assert_eq!(config.time_control, Some(TimeControl::new(10, 0)));
    }
}
