//! # cmdapi: typed commands across server releases
//!
//! Plugins declare commands as ordered lists of typed arguments. cmdapi
//! picks the version adapter for the running server, builds the server's
//! own parser for every argument, and hands the executor plain value
//! records, whichever release is underneath.
//!
//! ## Core Principles
//!
//! - **One adapter per process**: resolved from the server version at
//!   startup; unknown releases fail fast
//! - **Fail at registration**: a kind the adapter cannot satisfy stops the
//!   plugin from enabling
//! - **Server text for user errors**: malformed input surfaces the
//!   server's own syntax message
//! - **All-or-nothing reloads**: a datapack reload either commits or leaves
//!   the previous functions live
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cmdapi::{ArgumentKind, CommandApi, CommandSpec, Config, EntitySelector, LocationType};
//!
//! let config = Config::load("plugins/cmdapi/config.json")?;
//! let api = CommandApi::start(server, config)?;
//!
//! api.register(
//!     CommandSpec::new("tp")
//!         .argument("target", ArgumentKind::EntitySelector(EntitySelector::OnePlayer))
//!         .argument("destination", ArgumentKind::Location(LocationType::BlockPosition))
//!         .executes(|invocation| {
//!             let to = invocation.args().location("destination")?;
//!             invocation.reply(format!("Teleporting to {} {} {}", to.x, to.y, to.z));
//!             Ok(1)
//!         }),
//! )?;
//!
//! api.execute_as_console("tp @p 10 64 -10")?;
//! api.reload_datapacks().await?;
//! ```

pub mod api;
pub mod build_info;
pub mod command;
pub mod config;
pub mod error;
pub mod tracing_support;
pub mod watcher;

// ============================================================================
// Facade
// ============================================================================

pub use api::{CommandApi, KindHealth};
pub use command::{CommandSpec, Executor, Invocation, ParsedArgs};
pub use config::{Config, ConfigError};
pub use error::{CommandApiError, CommandError, Severity, StartupError};
pub use watcher::{DatapackWatcher, WatcherConfig, WatcherError};

pub use tracing_support::{
    init_subscriber, init_subscriber_with_config, TracingConfig, TracingFormat,
};

pub use build_info::{version_info, version_short};

// ============================================================================
// Re-exports
// ============================================================================

pub use cmdapi_nms::{ReloadError, ReloadReport, ReloadState, VersionAdapter};
pub use cmdapi_wrappers::{
    ArgumentKind, ArgumentValue, EntitySelector, LocationType, ParseFailure, ScoreHolderType,
    Sender, SuggestionProviders,
};
