//! Datapack directory watcher
//!
//! Watches datapack roots and reloads the server's datapacks once edits to
//! function or tag files settle.

use crate::api::CommandApi;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct WatcherConfig {
    /// Quiet period after the last change before reloading
    #[serde(rename = "debounce-ms", with = "millis")]
    pub debounce: Duration,
    /// Reload once as soon as the watcher starts
    pub reload_on_start: bool,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            reload_on_start: true,
        }
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis().try_into().unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Reloads datapacks when files under the watched roots change
pub struct DatapackWatcher {
    api: CommandApi,
    directories: Vec<PathBuf>,
    _watcher: RecommendedWatcher,
    shutdown_tx: mpsc::Sender<()>,
}

impl DatapackWatcher {
    pub async fn new(
        api: CommandApi,
        directories: impl IntoIterator<Item = impl AsRef<Path>>,
        config: WatcherConfig,
    ) -> Result<Self, WatcherError> {
        let directories: Vec<PathBuf> = directories
            .into_iter()
            .map(|p| p.as_ref().to_path_buf())
            .collect();

        if config.reload_on_start {
            Self::reload(&api, "startup").await;
        }

        let (event_tx, mut event_rx) = mpsc::channel::<Event>(100);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                let _ = event_tx.blocking_send(event);
            }
        })
        .map_err(WatcherError::Init)?;

        for dir in &directories {
            if dir.is_dir() {
                watcher
                    .watch(dir, RecursiveMode::Recursive)
                    .map_err(WatcherError::Init)?;
                tracing::info!(dir = %dir.display(), "Watching datapack directory");
            } else {
                tracing::warn!(dir = %dir.display(), "Datapack directory does not exist, skipping");
            }
        }

        let task_api = api.clone();
        let debounce = config.debounce;
        tokio::spawn(async move {
            let mut changed: Vec<PathBuf> = Vec::new();
            let mut deadline: Option<tokio::time::Instant> = None;

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        tracing::info!("Datapack watcher shutting down");
                        break;
                    }

                    Some(event) = event_rx.recv() => {
                        for path in event.paths {
                            if Self::is_datapack_file(&path) {
                                if !changed.contains(&path) {
                                    changed.push(path);
                                }
                                deadline = Some(tokio::time::Instant::now() + debounce);
                            }
                        }
                    }

                    _ = async {
                        match deadline {
                            Some(deadline) => tokio::time::sleep_until(deadline).await,
                            None => std::future::pending::<()>().await,
                        }
                    } => {
                        tracing::debug!(files = changed.len(), "Datapack files changed");
                        changed.clear();
                        deadline = None;
                        Self::reload(&task_api, "change").await;
                    }
                }
            }
        });

        Ok(Self {
            api,
            directories,
            _watcher: watcher,
            shutdown_tx,
        })
    }

    /// Failures are logged; the previous datapack state stays live
    async fn reload(api: &CommandApi, trigger: &'static str) {
        match api.reload_datapacks().await {
            Ok(report) => tracing::info!(
                trigger,
                functions = report.functions,
                tags = report.tags,
                "Datapacks reloaded"
            ),
            Err(e) => tracing::warn!(trigger, error = %e, "Datapack reload failed"),
        }
    }

    /// Function sources and tag/metadata JSON
    fn is_datapack_file(path: &Path) -> bool {
        path.extension()
            .map(|ext| ext == "mcfunction" || ext == "json" || ext == "mcmeta")
            .unwrap_or(false)
    }

    pub fn api(&self) -> &CommandApi {
        &self.api
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

#[derive(Debug, Error)]
pub enum WatcherError {
    #[error("Failed to initialize watcher")]
    Init(#[source] notify::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_datapack_files_trigger() {
        assert!(DatapackWatcher::is_datapack_file(Path::new("data/demo/functions/greet.mcfunction")));
        assert!(DatapackWatcher::is_datapack_file(Path::new("data/minecraft/tags/functions/load.json")));
        assert!(DatapackWatcher::is_datapack_file(Path::new("pack.mcmeta")));
        assert!(!DatapackWatcher::is_datapack_file(Path::new("data/demo/functions/greet.mcfunction~")));
        assert!(!DatapackWatcher::is_datapack_file(Path::new("README")));
    }

    #[test]
    fn test_init_error_names_notify_once() {
        use std::error::Error as _;

        let err = WatcherError::Init(notify::Error::generic("inotify limit reached"));
        assert_eq!(err.to_string(), "Failed to initialize watcher");
        let source = err.source().map(ToString::to_string).unwrap_or_default();
        assert!(source.contains("inotify limit reached"));
    }

    #[test]
    fn test_config_uses_milliseconds() {
        let config: WatcherConfig =
            serde_json::from_str(r#"{ "debounce-ms": 250, "reload-on-start": false }"#).unwrap();
        assert_eq!(config.debounce, Duration::from_millis(250));
        assert!(!config.reload_on_start);

        let json = serde_json::to_value(WatcherConfig::default()).unwrap();
        assert_eq!(json["debounce-ms"], 500);
        assert_eq!(json["reload-on-start"], true);
    }
}
