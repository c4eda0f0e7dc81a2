//! # Configuration Management Module
//!
//! Centralized configuration for the game runtime: timing knobs, save
//! location override, logging and animation settings.
//!
//! Configuration is optional; every value has a sensible default and the
//! game runs without a config file at all. When present, the file uses TOML:
//!
//! ```toml
//! [game]
//! spawn_delay_secs = 15
//! autosave_interval_secs = 60
//! quit_countdown_secs = 5
//!
//! [save]
//! # dir = "/tmp/veilspire-saves"
//!
//! [logging]
//! level = "info"
//! # file = "veilspire.log"
//!
//! [animation]
//! enabled = true
//! speed = 1.0
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Gameplay timing knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seconds between entering an enemy room and the encounter firing.
    #[serde(default = "default_spawn_delay")]
    pub spawn_delay_secs: u64,
    /// Seconds between autosaves during a session.
    #[serde(default = "default_autosave_interval")]
    pub autosave_interval_secs: u64,
    /// Countdown length on the quit screen.
    #[serde(default = "default_quit_countdown")]
    pub quit_countdown_secs: u64,
}

fn default_spawn_delay() -> u64 {
    15
}

fn default_autosave_interval() -> u64 {
    60
}

fn default_quit_countdown() -> u64 {
    5
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            spawn_delay_secs: default_spawn_delay(),
            autosave_interval_secs: default_autosave_interval(),
            quit_countdown_secs: default_quit_countdown(),
        }
    }
}

/// Save location settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveConfig {
    /// Override for the save directory; defaults to the platform user-data
    /// directory under `veilspire/saves`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file; console output is kept when stdout is a TTY.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Animation playback settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    #[serde(default = "default_animation_enabled")]
    pub enabled: bool,
    /// Multiplier applied to every animation delay.
    #[serde(default = "default_animation_speed")]
    pub speed: f64,
}

fn default_animation_enabled() -> bool {
    true
}

fn default_animation_speed() -> f64 {
    1.0
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: default_animation_enabled(),
            speed: default_animation_speed(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub save: SaveConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
}

impl Config {
    /// Load configuration from a file.
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Create a default configuration file.
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.game.spawn_delay_secs, 15);
        assert_eq!(config.game.autosave_interval_secs, 60);
        assert!(config.save.dir.is_none());
        assert_eq!(config.logging.level, "info");
        assert!(config.animation.enabled);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [game]
            spawn_delay_secs = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.game.spawn_delay_secs, 3);
        assert_eq!(config.game.autosave_interval_secs, 60);
        assert!(config.animation.enabled);
    }

    #[test]
    fn test_empty_file_is_valid() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.game.spawn_delay_secs, 15);
    }
}
