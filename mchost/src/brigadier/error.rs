use std::fmt;
use thiserror::Error;

/// How much input is echoed before the `<--[HERE]` marker
const CONTEXT_AMOUNT: usize = 10;

/// Malformed command input, with the position it was detected at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSyntaxError {
    key: &'static str,
    message: String,
    input: Option<String>,
    cursor: usize,
}

impl CommandSyntaxError {
    pub fn new(key: &'static str, message: impl Into<String>) -> Self {
        Self {
            key,
            message: message.into(),
            input: None,
            cursor: 0,
        }
    }

    pub fn with_context(mut self, input: &str, cursor: usize) -> Self {
        self.input = Some(input.to_string());
        self.cursor = cursor.min(input.len());
        self
    }

    /// Translation key identifying the kind of error
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// The message without position context
    pub fn raw_message(&self) -> &str {
        &self.message
    }

    pub fn cursor(&self) -> Option<usize> {
        self.input.as_ref().map(|_| self.cursor)
    }

    fn context(&self) -> Option<String> {
        let input = self.input.as_deref()?;
        let mut start = self.cursor.saturating_sub(CONTEXT_AMOUNT);
        while !input.is_char_boundary(start) {
            start -= 1;
        }
        let prefix = if self.cursor > CONTEXT_AMOUNT { "..." } else { "" };
        Some(format!("{}{}<--[HERE]", prefix, &input[start..self.cursor]))
    }
}

impl fmt::Display for CommandSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.context() {
            Some(context) => write!(
                f,
                "{} at position {}: {}",
                self.message, self.cursor, context
            ),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for CommandSyntaxError {}

/// Anything that stops a command from running
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Syntax(#[from] CommandSyntaxError),

    #[error("No such argument '{0}' exists on this command")]
    NoSuchArgument(String),

    #[error("Argument '{name}' holds a {actual}, not a {expected}")]
    WrongArgumentType {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl CommandError {
    /// The syntax error, if this is user input the host rejected
    pub fn as_syntax(&self) -> Option<&CommandSyntaxError> {
        match self {
            Self::Syntax(e) => Some(e),
            _ => None,
        }
    }
}
