//! Errors surfaced to plugin code
//!
//! Three severities, from what users can fix to what only a reload can:
//!
//! - [`Severity::User`]: malformed input or a command that chose to fail
//! - [`Severity::Fatal`]: the adapter and the server disagree
//! - [`Severity::Recoverable`]: a datapack reload did not commit

use crate::config::ConfigError;
use crate::watcher::WatcherError;
use cmdapi_nms::{AdapterError, ExtractError, ReloadError, ResolveError};
use cmdapi_wrappers::{ArgumentKind, ParseFailure};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    User,
    Fatal,
    Recoverable,
}

/// Why a plugin command did not run to completion
#[derive(Debug, Error)]
pub enum CommandError {
    /// The server rejected the input; the text is the server's own
    #[error(transparent)]
    Parse(#[from] ParseFailure),

    /// Raised by the command's executor
    #[error("{0}")]
    Failed(String),

    /// A previous command hit an adapter error for this kind
    #[error("Argument kind {kind} is unusable on this server")]
    KindUnusable { kind: ArgumentKind },

    #[error("Argument '{key}' ({kind}) could not be read")]
    Extract {
        key: String,
        kind: ArgumentKind,
        #[source]
        source: AdapterError,
    },

    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

impl CommandError {
    /// Convenience constructor for executor failures
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::Parse(_) | Self::Failed(_) => Severity::User,
            Self::KindUnusable { .. } | Self::Extract { .. } | Self::Adapter(_) => Severity::Fatal,
        }
    }

    pub fn is_user_error(&self) -> bool {
        self.severity() == Severity::User
    }
}

impl From<ExtractError> for CommandError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::Syntax(failure) => Self::Parse(failure),
            ExtractError::Adapter(e) => Self::Adapter(e),
        }
    }
}

/// Startup could not complete; the plugin should not enable
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Command '{command}' cannot be registered")]
    Register {
        command: String,
        #[source]
        source: AdapterError,
    },

    #[error("Command '{command}' declares argument '{key}' more than once")]
    DuplicateArgument { command: String, key: String },

    #[error("Command '{0}' has no executor")]
    NoExecutor(String),

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Any error cmdapi can report
#[derive(Debug, Error)]
pub enum CommandApiError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Startup(#[from] StartupError),

    #[error(transparent)]
    Reload(#[from] ReloadError),

    #[error(transparent)]
    Watcher(#[from] WatcherError),
}

impl CommandApiError {
    pub fn severity(&self) -> Severity {
        match self {
            Self::Command(e) => e.severity(),
            Self::Reload(e) if e.is_recoverable() => Severity::Recoverable,
            Self::Startup(_) | Self::Reload(_) | Self::Watcher(_) => Severity::Fatal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_failures_keep_server_text() {
        let err: CommandError = ParseFailure::new("Expected integer at position 6").into();
        assert_eq!(err.to_string(), "Expected integer at position 6");
        assert_eq!(err.severity(), Severity::User);
    }

    #[test]
    fn test_kind_unusable_names_the_kind() {
        let err = CommandError::KindUnusable {
            kind: ArgumentKind::Time,
        };
        assert_eq!(err.to_string(), "Argument kind time is unusable on this server");
        assert!(!err.is_user_error());
    }

    #[test]
    fn test_unified_severities() {
        let reload: CommandApiError = ReloadError::OutOfOrder("commit").into();
        assert_eq!(reload.severity(), Severity::Recoverable);

        let mismatch: CommandApiError = ReloadError::Adapter(AdapterError::NotResolved).into();
        assert_eq!(mismatch.severity(), Severity::Fatal);

        let startup: CommandApiError = StartupError::NoExecutor("tp".into()).into();
        assert_eq!(startup.severity(), Severity::Fatal);

        let user: CommandApiError = CommandError::failed("nope").into();
        assert_eq!(user.severity(), Severity::User);
    }
}
