//! User configuration (key bindings and list behavior).

use std::io;
use std::path::{Path, PathBuf};

use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

use crate::ui::{FilterKeys, DEFAULT_PAGE_SIZE};

/// Error loading the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the file failed.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// The file is not valid config JSON.
    #[error("invalid config {path}: {source}")]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// Front end configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Key that starts typing a filter query.
    pub filter_key: char,
    /// Rows moved by PageUp/PageDown.
    pub page_size: usize,
    /// Leave hashed site names out of the initial site list.
    pub hide_hashed_sites: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filter_key: '/',
            page_size: DEFAULT_PAGE_SIZE,
            hide_hashed_sites: true,
        }
    }
}

impl Config {
    /// Default config file location (`<config dir>/passlist/config.json`).
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "passlist")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load from the default location; defaults if there is none.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Filter keys for a [`QuerySession`](crate::ui::QuerySession).
    pub fn keys(&self) -> FilterKeys {
        FilterKeys {
            trigger: KeyCode::Char(self.filter_key),
            ..FilterKeys::default()
        }
    }
}
