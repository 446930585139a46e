use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::shared_store::MAX_RECENT_SUGGESTIONS;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(String),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(error) => write!(f, "io error: {error}"),
            Self::Parse(error) => write!(f, "parse error: {error}"),
            Self::Invalid(error) => write!(f, "invalid config: {error}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: u16,
    #[serde(default = "default_shared_store_path")]
    pub shared_store_path: PathBuf,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let base = std::env::temp_dir().join("wikiroute");
        Self {
            max_suggestions: default_max_suggestions(),
            shared_store_path: base.join("shared.sqlite3"),
            config_path: base.join("config.toml"),
        }
    }
}

fn default_max_suggestions() -> u16 {
    MAX_RECENT_SUGGESTIONS as u16
}

fn default_shared_store_path() -> PathBuf {
    stable_app_data_dir().join("shared.sqlite3")
}

pub fn stable_app_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("WIKIROUTE_DATA_DIR") {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            if !appdata.trim().is_empty() {
                return PathBuf::from(appdata).join("wikiroute");
            }
        }
    }

    #[cfg(not(target_os = "windows"))]
    {
        if let Ok(home) = std::env::var("HOME") {
            if !home.trim().is_empty() {
                return PathBuf::from(home)
                    .join(".local")
                    .join("share")
                    .join("wikiroute");
            }
        }
    }

    std::env::temp_dir().join("wikiroute")
}

pub fn default_config_path() -> PathBuf {
    stable_app_data_dir().join("config.toml")
}

pub fn validate(cfg: &Config) -> Result<(), String> {
    if cfg.max_suggestions == 0 || cfg.max_suggestions as usize > MAX_RECENT_SUGGESTIONS {
        return Err(format!(
            "max_suggestions out of range (1..={MAX_RECENT_SUGGESTIONS})"
        ));
    }

    if cfg.shared_store_path.as_os_str().is_empty() {
        return Err("shared_store_path is required".into());
    }

    if cfg.config_path.as_os_str().is_empty() {
        return Err("config_path is required".into());
    }

    Ok(())
}

/// Loads the config from `path` (or the stable per-user location). A missing
/// file yields defaults anchored at that location.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path);

    let mut config = if config_path.exists() {
        let raw = std::fs::read_to_string(&config_path)?;
        toml::from_str::<Config>(&raw).map_err(|error| ConfigError::Parse(error.to_string()))?
    } else {
        let base = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(stable_app_data_dir);
        Config {
            max_suggestions: default_max_suggestions(),
            shared_store_path: base.join("shared.sqlite3"),
            config_path: PathBuf::new(),
        }
    };
    config.config_path = config_path;

    validate(&config).map_err(ConfigError::Invalid)?;
    Ok(config)
}

pub fn save(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = cfg.config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let encoded =
        toml::to_string_pretty(cfg).map_err(|error| ConfigError::Parse(error.to_string()))?;
    std::fs::write(&cfg.config_path, encoded)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate, Config};

    #[test]
    fn accepts_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.max_suggestions, 5);
        assert!(cfg
            .shared_store_path
            .to_string_lossy()
            .contains("wikiroute"));
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn rejects_max_suggestions_out_of_range() {
        let mut cfg = Config::default();
        cfg.max_suggestions = 0;
        assert!(validate(&cfg).is_err());
        cfg.max_suggestions = 6;
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn rejects_empty_store_path() {
        let mut cfg = Config::default();
        cfg.shared_store_path = std::path::PathBuf::new();
        assert!(validate(&cfg).is_err());
    }
}
