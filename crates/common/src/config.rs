//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Velocity tracker defaults.
    pub tracker: TrackerDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default velocity tracker parameters.
///
/// The default strategy is a deliberate, device-tuned choice: it directly
/// shapes how responsive flings and swipes feel to the user, so it lives in
/// configuration rather than as a hardcoded constant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerDefaults {
    /// Strategy name resolved by the core (e.g., "lsq2", "impulse",
    /// "wlsq2-delta", "int1", "legacy").
    pub default_strategy: String,

    /// Gap after which all pointers are assumed to have stopped (ms).
    pub assume_stopped_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "velotrace=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tracker: TrackerDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for TrackerDefaults {
    fn default() -> Self {
        Self {
            default_strategy: "lsq2".to_string(),
            assume_stopped_ms: 40,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("velotrace").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tracker.default_strategy, "lsq2");
        assert_eq!(back.tracker.assume_stopped_ms, 40);
        assert_eq!(back.logging.level, "info");
    }
}
