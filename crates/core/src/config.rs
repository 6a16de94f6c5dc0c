//! Catalog configuration.
//!
//! ```toml
//! state_file = "/var/lib/vitrine/state.json"
//!
//! [search]
//! case_sensitive = false
//!
//! [diff]
//! background_threshold = 256
//! ```
//!
//! Every key is optional; missing keys take the defaults below.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default row count from which list diffs move to the background worker.
pub const DEFAULT_BACKGROUND_THRESHOLD: usize = 256;

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where the saved query state lives. `None` keeps it in memory only.
    pub state_file: Option<PathBuf>,
    pub search: SearchConfig,
    pub diff: DiffConfig,
}

/// Search dialect options.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub case_sensitive: bool,
}

/// List reconciliation options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiffConfig {
    /// Diffs where either list has at least this many rows run off the
    /// interactive thread.
    pub background_threshold: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            background_threshold: DEFAULT_BACKGROUND_THRESHOLD,
        }
    }
}

impl Config {
    /// Parses configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::config(e.to_string()))
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml_str(&text)
    }
}
