//! The parse result handed to command executors

use super::CommandError;
use crate::source::CommandListenerWrapper;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A value produced by an argument parser, type-erased
#[derive(Clone)]
pub struct ParsedValue {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl ParsedValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

impl fmt::Debug for ParsedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParsedValue")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct ParsedArgument {
    pub start: usize,
    pub end: usize,
    pub value: ParsedValue,
}

/// One command invocation: the input, its parsed arguments and the source
#[derive(Clone)]
pub struct CommandContext {
    source: Arc<CommandListenerWrapper>,
    input: String,
    arguments: HashMap<String, ParsedArgument>,
}

impl CommandContext {
    pub fn new(
        source: Arc<CommandListenerWrapper>,
        input: impl Into<String>,
        arguments: HashMap<String, ParsedArgument>,
    ) -> Self {
        Self {
            source,
            input: input.into(),
            arguments,
        }
    }

    pub fn source(&self) -> &CommandListenerWrapper {
        &self.source
    }

    pub fn source_arc(&self) -> Arc<CommandListenerWrapper> {
        Arc::clone(&self.source)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn has_argument(&self, name: &str) -> bool {
        self.arguments.contains_key(name)
    }

    /// Raw text an argument was parsed from
    pub fn argument_text(&self, name: &str) -> Option<&str> {
        let arg = self.arguments.get(name)?;
        self.input.get(arg.start..arg.end)
    }

    pub fn get_argument<T: Any>(&self, name: &str) -> Result<&T, CommandError> {
        let arg = self
            .arguments
            .get(name)
            .ok_or_else(|| CommandError::NoSuchArgument(name.to_string()))?;
        arg.value
            .downcast_ref::<T>()
            .ok_or_else(|| CommandError::WrongArgumentType {
                name: name.to_string(),
                expected: std::any::type_name::<T>(),
                actual: arg.value.type_name(),
            })
    }

    /// Same arguments, different source
    pub fn with_source(&self, source: Arc<CommandListenerWrapper>) -> Self {
        Self {
            source,
            input: self.input.clone(),
            arguments: self.arguments.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_value_debug_names_its_type() {
        let value = ParsedValue::new(42_i32);
        assert_eq!(value.downcast_ref::<i32>(), Some(&42));
        assert!(value.downcast_ref::<String>().is_none());
        assert!(format!("{:?}", value).contains("i32"));
    }
}
