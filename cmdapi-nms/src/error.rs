//! Errors raised by the adapter layer

use cmdapi_wrappers::{ArgumentKind, ParseFailure};
use mchost::brigadier::{CommandError, CommandSyntaxError};
use mchost::functions::FunctionError;
use mchost::resources::ResourceError;
use mchost::sealed::FinalFieldError;
use std::path::PathBuf;
use thiserror::Error;

/// The adapter and the host disagree about something a command relies on
///
/// These never come from user input. At startup they are fatal; during
/// execution the kind involved is taken out of service.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("No version adapter has been bound yet")]
    NotResolved,

    #[error("A version adapter is already bound (release {0})")]
    AlreadyBound(&'static str),

    #[error("Server is not a {expected} server (it reports {actual})")]
    WrongServer {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Argument '{0}' does not exist on this command")]
    MissingArgument(String),

    #[error("Argument '{name}' holds a {actual}, not a {expected}")]
    WrongNativeType {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Argument kind {} is not supported by the {release} adapter", kind.name())]
    UnsupportedKind {
        kind: ArgumentKind,
        release: &'static str,
    },

    #[error("Unrecognized score operation: probe left the scores at {left} and {right}")]
    UnrecognizedOperation { left: i32, right: i32 },

    #[error("Score operation failed while being classified: {0}")]
    ProbeFailed(String),

    #[error("Host value has no counterpart: {0}")]
    Unmapped(String),

    #[error("Failed to write dispatcher file {path}")]
    DispatcherFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Host error: {0}")]
    Host(String),
}

/// Why a value could not be extracted from a parsed command
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The host rejected the user's input
    #[error(transparent)]
    Syntax(#[from] ParseFailure),

    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

impl ExtractError {
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::Syntax(_))
    }
}

impl From<CommandSyntaxError> for ExtractError {
    fn from(err: CommandSyntaxError) -> Self {
        Self::Syntax(ParseFailure::new(err.to_string()))
    }
}

impl From<CommandError> for ExtractError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Syntax(e) => e.into(),
            CommandError::NoSuchArgument(name) => AdapterError::MissingArgument(name).into(),
            CommandError::WrongArgumentType {
                name,
                expected,
                actual,
            } => AdapterError::WrongNativeType {
                name,
                expected,
                actual,
            }
            .into(),
            CommandError::Failed(message) => AdapterError::Host(message).into(),
            CommandError::Other(e) => AdapterError::Host(e.to_string()).into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Unsupported server version {version} (supported: {})", supported.join(", "))]
    Unsupported {
        version: String,
        supported: Vec<&'static str>,
    },

    #[error("Cannot read a release from server version '{0}'")]
    MalformedVersion(String),

    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

/// A datapack reload that did not commit
///
/// The previously committed dispatcher and function library stay live.
#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("Failed to load datapacks")]
    Load(#[source] ResourceError),

    #[error("Datapack loader task did not complete: {0}")]
    LoaderAborted(String),

    #[error("Failed to bind datapack functions")]
    Bind(#[source] FunctionError),

    #[error("Failed to swap in reloaded resources")]
    Seal(#[source] FinalFieldError),

    #[error("Reload step '{0}' ran out of order")]
    OutOfOrder(&'static str),

    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

impl ReloadError {
    /// Whether the server is still consistent and a later reload may succeed
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Adapter(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_errors_become_parse_failures() {
        let err: ExtractError =
            CommandError::from(CommandSyntaxError::new("argument.pos.unloaded", "That position is not loaded"))
                .into();
        assert!(err.is_user_error());
        assert_eq!(err.to_string(), "That position is not loaded");
    }

    #[test]
    fn test_missing_argument_is_adapter_error() {
        let err: ExtractError = CommandError::NoSuchArgument("pos".into()).into();
        assert!(matches!(
            err,
            ExtractError::Adapter(AdapterError::MissingArgument(ref name)) if name == "pos"
        ));
    }

    #[test]
    fn test_unsupported_lists_known_versions() {
        let err = ResolveError::Unsupported {
            version: "1.17".into(),
            supported: vec!["1.15.2", "1.16.1"],
        };
        let message = err.to_string();
        assert!(message.contains("1.17"));
        assert!(message.contains("1.15.2, 1.16.1"));
    }

    #[test]
    fn test_adapter_mismatch_is_not_recoverable() {
        assert!(ReloadError::OutOfOrder("commit").is_recoverable());
        assert!(!ReloadError::Adapter(AdapterError::NotResolved).is_recoverable());
    }
}
