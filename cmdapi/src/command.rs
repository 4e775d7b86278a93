//! Declaring a command and reading its arguments back

use crate::error::CommandError;
use cmdapi_wrappers::{ArgumentKind, ArgumentValue, Sender};
use mchost::CommandListenerWrapper;
use std::fmt;
use std::sync::Arc;

pub type Executor = Arc<dyn Fn(&Invocation) -> Result<i32, CommandError> + Send + Sync>;

/// A command: a name, ordered typed arguments, and what to run
///
/// ```ignore
/// let tp = CommandSpec::new("tp")
///     .argument("target", ArgumentKind::EntitySelector(EntitySelector::OnePlayer))
///     .argument("destination", ArgumentKind::Location(LocationType::BlockPosition))
///     .executes(|invocation| {
///         let destination = invocation.args().location("destination")?;
///         Ok(1)
///     });
/// ```
#[derive(Clone)]
pub struct CommandSpec {
    pub(crate) name: String,
    pub(crate) arguments: Vec<(String, ArgumentKind)>,
    pub(crate) permission: Option<i32>,
    pub(crate) executor: Option<Executor>,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            permission: None,
            executor: None,
        }
    }

    pub fn argument(mut self, key: impl Into<String>, kind: ArgumentKind) -> Self {
        self.arguments.push((key.into(), kind));
        self
    }

    /// Minimum source permission level
    pub fn permission(mut self, level: i32) -> Self {
        self.permission = Some(level);
        self
    }

    pub fn executes<F>(mut self, executor: F) -> Self
    where
        F: Fn(&Invocation) -> Result<i32, CommandError> + Send + Sync + 'static,
    {
        self.executor = Some(Arc::new(executor));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[(String, ArgumentKind)] {
        &self.arguments
    }

    pub fn kinds(&self) -> impl Iterator<Item = ArgumentKind> + '_ {
        self.arguments.iter().map(|(_, kind)| *kind)
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("arguments", &self.arguments)
            .field("permission", &self.permission)
            .finish_non_exhaustive()
    }
}

/// Extracted argument values, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArgs {
    values: Vec<(String, ArgumentValue)>,
}

impl ParsedArgs {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, key: String, value: ArgumentValue) {
        self.values.push((key, value));
    }

    pub fn get(&self, key: &str) -> Option<&ArgumentValue> {
        self.values.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// The value for `key`, failing the command if it was never declared
    pub fn value(&self, key: &str) -> Result<&ArgumentValue, CommandError> {
        self.get(key)
            .ok_or_else(|| CommandError::failed(format!("Argument '{}' was not declared", key)))
    }

    pub fn location(&self, key: &str) -> Result<&cmdapi_wrappers::Location, CommandError> {
        self.value(key)?
            .as_location()
            .ok_or_else(|| CommandError::failed(format!("Argument '{}' is not a location", key)))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgumentValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// One run of a command
pub struct Invocation {
    pub(crate) command: String,
    pub(crate) sender: Sender,
    pub(crate) args: ParsedArgs,
    pub(crate) source: Arc<CommandListenerWrapper>,
}

impl Invocation {
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn sender(&self) -> &Sender {
        &self.sender
    }

    pub fn args(&self) -> &ParsedArgs {
        &self.args
    }

    /// The server's own view of who ran the command
    pub fn source(&self) -> &Arc<CommandListenerWrapper> {
        &self.source
    }

    /// Send feedback to whoever ran the command
    pub fn reply(&self, message: impl Into<String>) {
        self.source.send_message(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdapi_wrappers::{Location, LocationType};

    #[test]
    fn test_arguments_keep_declaration_order() {
        let spec = CommandSpec::new("give")
            .argument("target", ArgumentKind::Player)
            .argument("item", ArgumentKind::ItemStack)
            .argument("at", ArgumentKind::Location(LocationType::PrecisePosition))
            .permission(2);

        let keys: Vec<&str> = spec.arguments().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["target", "item", "at"]);
        assert_eq!(spec.kinds().count(), 3);
        assert!(spec.executor.is_none());
        assert!(format!("{:?}", spec).contains("give"));
    }

    #[test]
    fn test_parsed_args_lookup() {
        let mut args = ParsedArgs::default();
        args.push("time".into(), ArgumentValue::Time(20));
        args.push("to".into(), ArgumentValue::Location(Location::new("world", 1.0, 2.0, 3.0)));

        assert_eq!(args.get("time"), Some(&ArgumentValue::Time(20)));
        assert_eq!(args.location("to").unwrap().y, 2.0);
        assert!(args.location("time").is_err());
        assert!(args.value("missing").unwrap_err().is_user_error());
        assert_eq!(args.iter().map(|(k, _)| k).collect::<Vec<_>>(), vec!["time", "to"]);
    }
}
