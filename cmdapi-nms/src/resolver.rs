//! Selecting the adapter for the running server
//!
//! [`AdapterRegistry`] maps server versions to adapter constructors. The
//! chosen adapter is bound once per process with [`bind_active`] and read
//! everywhere else through [`active`].

use crate::adapter::VersionAdapter;
use crate::error::{AdapterError, ResolveError};
use crate::{v1_15_r1, v1_16_r1};
use std::sync::{Arc, OnceLock};

type Constructor = fn() -> Arc<dyn VersionAdapter>;

struct Entry {
    versions: &'static [&'static str],
    construct: Constructor,
}

/// Known adapters, keyed by the server versions they drive
pub struct AdapterRegistry {
    entries: Vec<Entry>,
}

impl AdapterRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Every adapter this crate ships
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(v1_15_r1::COMPATIBLE_VERSIONS, v1_15_r1::Adapter::shared);
        registry.register(v1_16_r1::COMPATIBLE_VERSIONS, v1_16_r1::Adapter::shared);
        registry
    }

    pub fn register(&mut self, versions: &'static [&'static str], construct: Constructor) {
        self.entries.push(Entry {
            versions,
            construct,
        });
    }

    /// Every supported version, in registration order
    pub fn supported_versions(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .flat_map(|e| e.versions.iter().copied())
            .collect()
    }

    /// The adapter for exactly `version`
    pub fn resolve(&self, version: &str) -> Result<Arc<dyn VersionAdapter>, ResolveError> {
        match self.entries.iter().find(|e| e.versions.iter().any(|v| *v == version)) {
            Some(entry) => {
                let adapter = (entry.construct)();
                tracing::info!(version, release = adapter.release(), "Resolved version adapter");
                Ok(adapter)
            }
            None => {
                let supported = self.supported_versions();
                tracing::error!(version, ?supported, "No adapter for server version");
                Err(ResolveError::Unsupported {
                    version: version.to_string(),
                    supported,
                })
            }
        }
    }

    /// Resolve from a Bukkit version string such as `1.16.1-R0.1-SNAPSHOT`
    pub fn resolve_bukkit(&self, bukkit_version: &str) -> Result<Arc<dyn VersionAdapter>, ResolveError> {
        self.resolve(release_of(bukkit_version)?)
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// The game version at the front of a Bukkit version string
pub fn release_of(bukkit_version: &str) -> Result<&str, ResolveError> {
    let version = bukkit_version
        .split_once('-')
        .map_or(bukkit_version, |(version, _)| version);
    let well_formed = !version.is_empty()
        && version
            .split('.')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()));
    if well_formed {
        Ok(version)
    } else {
        Err(ResolveError::MalformedVersion(bukkit_version.to_string()))
    }
}

static ACTIVE: OnceLock<Arc<dyn VersionAdapter>> = OnceLock::new();

/// Make `adapter` the process-wide adapter; only the first call succeeds
pub fn bind_active(adapter: Arc<dyn VersionAdapter>) -> Result<Arc<dyn VersionAdapter>, AdapterError> {
    let release = adapter.release();
    let mut bound = false;
    let active = ACTIVE.get_or_init(|| {
        bound = true;
        adapter
    });
    if bound {
        tracing::info!(release, "Bound version adapter");
        Ok(Arc::clone(active))
    } else {
        Err(AdapterError::AlreadyBound(active.release()))
    }
}

/// The process-wide adapter
pub fn active() -> Result<Arc<dyn VersionAdapter>, AdapterError> {
    ACTIVE.get().cloned().ok_or(AdapterError::NotResolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_of_strips_bukkit_suffix() {
        assert_eq!(release_of("1.16.1-R0.1-SNAPSHOT").unwrap(), "1.16.1");
        assert_eq!(release_of("1.15.2").unwrap(), "1.15.2");
        assert!(release_of("-R0.1-SNAPSHOT").is_err());
        assert!(release_of("one.two").is_err());
    }

    #[test]
    fn test_resolve_each_builtin() {
        let registry = AdapterRegistry::builtin();
        assert_eq!(registry.resolve("1.15.2").unwrap().release(), "1_15_R1");
        assert_eq!(registry.resolve("1.16.1").unwrap().release(), "1_16_R1");
        assert_eq!(
            registry.resolve_bukkit("1.16.1-R0.1-SNAPSHOT").unwrap().release(),
            "1_16_R1"
        );
    }

    #[test]
    fn test_unknown_release_names_the_identifier() {
        let registry = AdapterRegistry::builtin();
        let err = registry.resolve("1.17").err().unwrap();
        match &err {
            ResolveError::Unsupported { version, supported } => {
                assert_eq!(version, "1.17");
                assert!(supported.contains(&"1.16.1"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(err.to_string().contains("1.17"));
    }

    #[test]
    fn test_empty_registry_supports_nothing() {
        let registry = AdapterRegistry::new();
        assert!(registry.supported_versions().is_empty());
        assert!(registry.resolve("1.16.1").is_err());
    }
}
