use crate::brigadier::{CommandSyntaxError, StringReader};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// A `namespace:path` identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceLocation {
    namespace: String,
    path: String,
}

impl ResourceLocation {
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
        }
    }

    pub fn minecraft(path: impl Into<String>) -> Self {
        Self::new(DEFAULT_NAMESPACE, path)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn is_allowed(c: char) -> bool {
        matches!(c, '0'..='9' | 'a'..='z' | '_' | ':' | '/' | '.' | '-')
    }

    fn is_valid_namespace(s: &str) -> bool {
        s.chars()
            .all(|c| matches!(c, '0'..='9' | 'a'..='z' | '_' | '.' | '-'))
    }

    fn is_valid_path(s: &str) -> bool {
        s.chars()
            .all(|c| matches!(c, '0'..='9' | 'a'..='z' | '_' | '/' | '.' | '-'))
    }

    /// Read a location from command input
    pub fn read(reader: &mut StringReader<'_>) -> Result<Self, CommandSyntaxError> {
        let start = reader.cursor();
        let text = reader.read_while(Self::is_allowed);
        text.parse().map_err(|_| {
            reader.set_cursor(start);
            reader.error("argument.id.invalid", "Invalid ID")
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Non [a-z0-9_.-] character in namespace of location: {0}")]
pub struct InvalidLocation(pub String);

impl FromStr for ResourceLocation {
    type Err = InvalidLocation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, path) = match s.split_once(':') {
            Some(("", path)) => (DEFAULT_NAMESPACE, path),
            Some((ns, path)) => (ns, path),
            None => (DEFAULT_NAMESPACE, s),
        };
        if path.is_empty() || !Self::is_valid_namespace(namespace) || !Self::is_valid_path(path) {
            return Err(InvalidLocation(s.to_string()));
        }
        Ok(Self::new(namespace, path))
    }
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}
