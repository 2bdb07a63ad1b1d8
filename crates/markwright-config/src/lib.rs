use markwright_engine::{MarkdownFormat, NewLine, WriterSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_VAR: &str = "MARKWRIGHT_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid markwright config in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config cannot be written as TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Output style read from `~/.config/markwright/config.toml`.
///
/// Every field has a default, so a partial file only overrides what it
/// names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub newline: NewLine,
    pub format: MarkdownFormat,
}

impl Config {
    /// `Ok(None)` when the file does not exist.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Option<Self>, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            log::debug!("no config file at {}", path.display());
            return Ok(None);
        }

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let config = toml::from_str::<Config>(&text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;

        log::debug!(
            "config from {}: newline {:?}, bullets {:?}",
            path.display(),
            config.newline,
            config.format.bullet_list_style()
        );
        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    /// The stored config, or the defaults when there is no file.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Ok(Self::load()?.unwrap_or_default())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let write_error = |source| ConfigError::Write {
            path: path.to_owned(),
            source,
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(write_error)?;
        }
        let text = toml::to_string_pretty(self)?;
        fs::write(path, text).map_err(write_error)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to_path(Self::config_path())
    }

    /// `$MARKWRIGHT_CONFIG` when set (with `~` and variables expanded),
    /// otherwise `~/.config/markwright/config.toml`.
    pub fn config_path() -> PathBuf {
        if let Ok(custom) = std::env::var(CONFIG_PATH_VAR)
            && !custom.is_empty()
        {
            return expand_path(&custom);
        }
        expand_path("~/.config/markwright").join("config.toml")
    }

    pub fn writer_settings(&self) -> WriterSettings {
        WriterSettings {
            newline: self.newline,
        }
    }
}

/// Unknown variables leave the path as written.
fn expand_path(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(e) => {
            log::warn!("Could not expand config path {path}: {e}");
            PathBuf::from(shellexpand::tilde(path).as_ref())
        }
    }
}
