//! Datapack resources and the reloadable manager that reads them

use crate::ResourceLocation;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Couldn't parse tag {path}: {source}")]
    MalformedTag {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid resource name {0}")]
    InvalidName(PathBuf),

    #[error("Resource manager #{0} is closed")]
    Closed(u64),
}

/// Counts resource managers that are open
#[derive(Debug, Clone, Default)]
pub struct HandleTracker(Arc<AtomicUsize>);

impl HandleTracker {
    pub fn open_handles(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

static NEXT_MANAGER_ID: AtomicU64 = AtomicU64::new(1);

/// Everything a datapack reload produced, not yet bound to a dispatcher
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataPackContents {
    pub functions: BTreeMap<ResourceLocation, Vec<String>>,
    pub function_tags: BTreeMap<ResourceLocation, Vec<String>>,
}

#[derive(Deserialize)]
struct TagFile {
    #[serde(default)]
    replace: bool,
    values: Vec<String>,
}

/// An open view over the datapack directories
#[derive(Debug)]
pub struct ReloadableResourceManager {
    id: u64,
    closed: AtomicBool,
    tracker: HandleTracker,
}

impl ReloadableResourceManager {
    pub fn open(tracker: &HandleTracker) -> Arc<Self> {
        tracker.0.fetch_add(1, Ordering::SeqCst);
        let id = NEXT_MANAGER_ID.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(manager = id, "Resource manager opened");
        Arc::new(Self {
            id,
            closed: AtomicBool::new(false),
            tracker: tracker.clone(),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Release the handle; later calls do nothing
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.tracker.0.fetch_sub(1, Ordering::SeqCst);
            tracing::debug!(manager = self.id, "Resource manager closed");
        }
    }

    /// Read every pack on a blocking worker
    pub fn reload(
        self: &Arc<Self>,
        packs: Vec<PathBuf>,
    ) -> JoinHandle<Result<DataPackContents, ResourceError>> {
        let manager = Arc::clone(self);
        tokio::task::spawn_blocking(move || {
            if manager.is_closed() {
                return Err(ResourceError::Closed(manager.id));
            }
            let mut contents = DataPackContents::default();
            for pack in &packs {
                load_pack(pack, &mut contents)?;
            }
            tracing::debug!(
                manager = manager.id,
                functions = contents.functions.len(),
                tags = contents.function_tags.len(),
                "Datapacks read"
            );
            Ok(contents)
        })
    }
}

fn read_dir(path: &Path) -> Result<Vec<PathBuf>, ResourceError> {
    let io = |source| ResourceError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut entries = std::fs::read_dir(path)
        .map_err(io)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(io)?;
    entries.sort();
    Ok(entries)
}

/// Files under `dir` with extension `ext`, as `(relative path without extension, path)`
fn collect_files(dir: &Path, ext: &str) -> Result<Vec<(String, PathBuf)>, ResourceError> {
    let mut out = Vec::new();
    if !dir.is_dir() {
        return Ok(out);
    }
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        for path in read_dir(&current)? {
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().and_then(|e| e.to_str()) == Some(ext) {
                let relative = path
                    .strip_prefix(dir)
                    .ok()
                    .and_then(|p| p.with_extension("").to_str().map(|s| s.replace('\\', "/")))
                    .ok_or_else(|| ResourceError::InvalidName(path.clone()))?;
                out.push((relative, path));
            }
        }
    }
    out.sort();
    Ok(out)
}

fn location(namespace: &str, name: &str, path: &Path) -> Result<ResourceLocation, ResourceError> {
    format!("{}:{}", namespace, name)
        .parse()
        .map_err(|_| ResourceError::InvalidName(path.to_path_buf()))
}

fn load_pack(pack: &Path, contents: &mut DataPackContents) -> Result<(), ResourceError> {
    let data = pack.join("data");
    for namespace_dir in read_dir(&data)? {
        if !namespace_dir.is_dir() {
            continue;
        }
        let Some(namespace) = namespace_dir.file_name().and_then(|n| n.to_str()) else {
            return Err(ResourceError::InvalidName(namespace_dir.clone()));
        };

        for (name, path) in collect_files(&namespace_dir.join("functions"), "mcfunction")? {
            let text = std::fs::read_to_string(&path).map_err(|source| ResourceError::Io {
                path: path.clone(),
                source,
            })?;
            let lines = text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#'))
                .map(String::from)
                .collect();
            contents
                .functions
                .insert(location(namespace, &name, &path)?, lines);
        }

        let tags_dir = namespace_dir.join("tags").join("functions");
        for (name, path) in collect_files(&tags_dir, "json")? {
            let text = std::fs::read_to_string(&path).map_err(|source| ResourceError::Io {
                path: path.clone(),
                source,
            })?;
            let tag: TagFile = serde_json::from_str(&text).map_err(|source| {
                ResourceError::MalformedTag {
                    path: path.clone(),
                    source,
                }
            })?;
            let entry = contents
                .function_tags
                .entry(location(namespace, &name, &path)?)
                .or_default();
            if tag.replace {
                entry.clear();
            }
            entry.extend(tag.values);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_is_idempotent() {
        let tracker = HandleTracker::default();
        let manager = ReloadableResourceManager::open(&tracker);
        assert_eq!(tracker.open_handles(), 1);
        manager.close();
        manager.close();
        assert_eq!(tracker.open_handles(), 0);
        assert!(manager.is_closed());
    }

    #[tokio::test]
    async fn test_reload_reads_functions_and_tags() {
        let dir = tempfile::tempdir().unwrap();
        let functions = dir.path().join("data/demo/functions/sub");
        let tags = dir.path().join("data/minecraft/tags/functions");
        std::fs::create_dir_all(&functions).unwrap();
        std::fs::create_dir_all(&tags).unwrap();
        std::fs::write(functions.join("hello.mcfunction"), "# comment\nsay hi\n\n").unwrap();
        std::fs::write(tags.join("load.json"), r#"{"values":["demo:sub/hello"]}"#).unwrap();

        let tracker = HandleTracker::default();
        let manager = ReloadableResourceManager::open(&tracker);
        let contents = manager
            .reload(vec![dir.path().to_path_buf()])
            .await
            .unwrap()
            .unwrap();

        let id: ResourceLocation = "demo:sub/hello".parse().unwrap();
        assert_eq!(contents.functions.get(&id), Some(&vec!["say hi".to_string()]));
        let tag: ResourceLocation = "minecraft:load".parse().unwrap();
        assert_eq!(
            contents.function_tags.get(&tag),
            Some(&vec!["demo:sub/hello".to_string()])
        );
    }

    #[tokio::test]
    async fn test_malformed_tag_fails() {
        let dir = tempfile::tempdir().unwrap();
        let tags = dir.path().join("data/demo/tags/functions");
        std::fs::create_dir_all(&tags).unwrap();
        std::fs::write(tags.join("broken.json"), "{ not json").unwrap();

        let tracker = HandleTracker::default();
        let manager = ReloadableResourceManager::open(&tracker);
        let result = manager.reload(vec![dir.path().to_path_buf()]).await.unwrap();
        assert!(matches!(result, Err(ResourceError::MalformedTag { .. })));
    }
}
