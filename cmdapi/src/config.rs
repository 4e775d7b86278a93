//! Plugin configuration, read from a JSON file
//!
//! Keys are kebab-case and every key is optional:
//!
//! ```json
//! {
//!   "verbose-outputs": false,
//!   "create-dispatcher-json": true,
//!   "dispatcher-json-path": "plugins/cmdapi/command_registration.json",
//!   "datapack-dirs": ["world/datapacks"],
//!   "watch-datapacks": true,
//!   "watcher": { "debounce-ms": 500, "reload-on-start": true }
//! }
//! ```

use crate::watcher::WatcherConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DISPATCHER_JSON: &str = "command_registration.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Log at debug level unless `RUST_LOG` says otherwise
    pub verbose_outputs: bool,
    /// Dump the dispatcher tree after each registration
    pub create_dispatcher_json: bool,
    pub dispatcher_json_path: PathBuf,
    /// Datapack roots handed to the server; empty keeps the server's own
    pub datapack_dirs: Vec<PathBuf>,
    pub watch_datapacks: bool,
    pub watcher: WatcherConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose_outputs: false,
            create_dispatcher_json: false,
            dispatcher_json_path: PathBuf::from(DEFAULT_DISPATCHER_JSON),
            datapack_dirs: Vec::new(),
            watch_datapacks: false,
            watcher: WatcherConfig::default(),
        }
    }
}

impl Config {
    /// Read `path`; a missing file yields the defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the current settings to `path` as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let io = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(io)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
