use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Widget configuration, stored in `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LyricsConfig {
    /// Follow playback with automatic scrolling
    #[serde(default = "default_auto_scroll")]
    pub auto_scroll: bool,
    /// How long a user scroll suspends auto-scroll, in milliseconds
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
    /// Fraction of the viewport height where the active line rests (0..=1)
    #[serde(default = "default_space_top")]
    pub space_top: f64,
}

fn default_auto_scroll() -> bool {
    true
}

fn default_cooldown_ms() -> u64 {
    3000
}

fn default_space_top() -> f64 {
    0.4
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            auto_scroll: default_auto_scroll(),
            cooldown_ms: default_cooldown_ms(),
            space_top: default_space_top(),
        }
    }
}

impl FromStr for LyricsConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut config: Self = toml::from_str(s)?;
        config.space_top = config.space_top.clamp(0.0, 1.0);
        Ok(config)
    }
}

impl LyricsConfig {
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("kashi");
        std::fs::create_dir_all(&path).ok();
        path.push("config.toml");
        path
    }

    /// Best-effort load; a missing or broken file falls back to defaults.
    pub fn load() -> Self {
        let path = Self::get_config_path();
        if path.exists() {
            if let Ok(content) = fs::read_to_string(&path) {
                match content.parse() {
                    Ok(config) => return config,
                    Err(err) => {
                        tracing::debug!(%err, "ignoring unreadable config, using defaults");
                    }
                }
            }
        }
        Self::default()
    }

    pub fn save(&self) {
        let path = Self::get_config_path();
        if let Ok(content) = toml::to_string_pretty(self) {
            let _ = fs::write(path, content);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LyricsConfig::default();
        assert!(config.auto_scroll);
        assert_eq!(config.cooldown_ms, 3000);
        assert_eq!(config.space_top, 0.4);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: LyricsConfig = "cooldown_ms = 1500".parse().unwrap();
        assert_eq!(config.cooldown_ms, 1500);
        assert!(config.auto_scroll);
        assert_eq!(config.space_top, 0.4);
    }

    #[test]
    fn test_space_top_clamped() {
        let config: LyricsConfig = "space_top = 1.7".parse().unwrap();
        assert_eq!(config.space_top, 1.0);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!("cooldown_ms = \"soon\"".parse::<LyricsConfig>().is_err());
    }
}
