//! Namespaced keys (`minecraft:stone`)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The namespace assumed when a key is written without one
pub const MINECRAFT: &str = "minecraft";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid namespaced key '{0}'")]
pub struct InvalidKey(pub String);

/// A `namespace:key` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamespacedKey {
    namespace: String,
    key: String,
}

impl NamespacedKey {
    pub fn new(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
        }
    }

    pub fn minecraft(key: impl Into<String>) -> Self {
        Self::new(MINECRAFT, key)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl FromStr for NamespacedKey {
    type Err = InvalidKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, key) = match s.split_once(':') {
            Some((ns, key)) if !ns.is_empty() => (ns, key),
            Some((_, key)) => (MINECRAFT, key),
            None => (MINECRAFT, s),
        };
        let valid_ns = namespace
            .chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.'));
        let valid_key = !key.is_empty()
            && key
                .chars()
                .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.' | '/'));
        if valid_ns && valid_key {
            Ok(Self::new(namespace, key))
        } else {
            Err(InvalidKey(s.to_string()))
        }
    }
}

impl fmt::Display for NamespacedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults_namespace() {
        let key: NamespacedKey = "stone".parse().unwrap();
        assert_eq!(key, NamespacedKey::minecraft("stone"));
        let key: NamespacedKey = "myplugin:tools/hammer".parse().unwrap();
        assert_eq!(key.namespace(), "myplugin");
        assert_eq!(key.key(), "tools/hammer");
    }

    #[test]
    fn test_parse_rejects_uppercase() {
        assert!("Stone".parse::<NamespacedKey>().is_err());
        assert!("ns:".parse::<NamespacedKey>().is_err());
    }
}
