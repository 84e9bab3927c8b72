//! Per-user settings for the `wiki-comments` tools.
//!
//! The settings live in `~/.config/wiki-comments/config.toml` unless
//! `WIKI_COMMENTS_CONFIG` names another file.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "WIKI_COMMENTS_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "~/.config/wiki-comments/config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to write config file at {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// JSON file holding pages, anchors and comments
    pub store_path: PathBuf,
}

impl Config {
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
        }
    }

    /// The config file in use: `$WIKI_COMMENTS_CONFIG`, else the per-user default.
    pub fn config_path() -> PathBuf {
        match env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => PathBuf::from(shellexpand::tilde(DEFAULT_CONFIG_PATH).as_ref()),
        }
    }

    /// Read the config at `path`. A missing file is not an error.
    pub fn read(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(config.expanded()))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::read(&Self::config_path())
    }

    /// Write the config to `path`, creating its directory if needed.
    pub fn write(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        let write_error = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        fs::write(path, content).map_err(write_error)
    }

    /// Write the config to [`Config::config_path`] and return that path.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path();
        self.write(&path)?;
        Ok(path)
    }

    /// `~` and `$VAR` in the store path expanded. A path naming an unset
    /// variable is kept as written.
    fn expanded(self) -> Self {
        let expanded = shellexpand::full(&self.store_path.to_string_lossy()).map(Cow::into_owned);
        match expanded {
            Ok(path) => Self::new(path),
            Err(_) => self,
        }
    }
}
