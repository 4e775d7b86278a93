//! Log output setup.
//!
//! cmdapi always emits `tracing` events (adapter resolution, registration,
//! disabled kinds, reload transitions). This module installs a subscriber
//! for them when the embedding server has not installed its own.

pub use tracing::{self, debug, error, info, instrument, trace, warn};

use crate::config::Config;

#[cfg(feature = "tracing")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format of the installed subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracingFormat {
    /// Multi-line, coloured
    Pretty,
    /// One line per event
    Compact,
    /// Newline-delimited JSON
    Json,
}

#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Fixed level; `None` reads `RUST_LOG`, falling back to `info`
    pub level: Option<tracing::Level>,
    pub format: TracingFormat,
    pub timestamps: bool,
    pub target: bool,
    pub thread_ids: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: None,
            format: TracingFormat::Pretty,
            timestamps: true,
            target: true,
            thread_ids: false,
        }
    }
}

impl TracingConfig {
    /// Defaults, raised to `debug` when `verbose-outputs` is set
    pub fn from_config(config: &Config) -> Self {
        Self {
            level: config.verbose_outputs.then_some(tracing::Level::DEBUG),
            ..Self::default()
        }
    }
}

/// Install a subscriber filtered by `RUST_LOG` (default `info`).
///
/// Returns false if a global subscriber was already installed.
///
/// ```ignore
/// cmdapi::tracing_support::init_subscriber();
/// ```
#[cfg(feature = "tracing")]
pub fn init_subscriber() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

/// Install a subscriber shaped by `config`.
///
/// ```ignore
/// use cmdapi::{Config, tracing_support::{init_subscriber_with_config, TracingConfig}};
///
/// let config = Config::load("plugins/cmdapi/config.json")?;
/// init_subscriber_with_config(TracingConfig::from_config(&config));
/// ```
#[cfg(feature = "tracing")]
pub fn init_subscriber_with_config(config: TracingConfig) -> bool {
    let filter = match config.level {
        Some(level) => EnvFilter::new(level.to_string()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    // each format/timestamp combination is a distinct layer type
    macro_rules! install {
        ($layer:expr) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    $layer
                        .with_target(config.target)
                        .with_thread_ids(config.thread_ids),
                )
                .try_init()
                .is_ok()
        };
    }

    let fmt = tracing_subscriber::fmt::layer();
    match (config.format, config.timestamps) {
        (TracingFormat::Pretty, true) => install!(fmt.pretty()),
        (TracingFormat::Pretty, false) => install!(fmt.pretty().without_time()),
        (TracingFormat::Compact, true) => install!(fmt.compact()),
        (TracingFormat::Compact, false) => install!(fmt.compact().without_time()),
        (TracingFormat::Json, true) => install!(fmt.json()),
        (TracingFormat::Json, false) => install!(fmt.json().without_time()),
    }
}

#[cfg(not(feature = "tracing"))]
pub fn init_subscriber() -> bool {
    false
}

#[cfg(not(feature = "tracing"))]
pub fn init_subscriber_with_config(_config: TracingConfig) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TracingConfig::default();
        assert_eq!(config.format, TracingFormat::Pretty);
        assert!(config.level.is_none());
        assert!(config.timestamps);
        assert!(config.target);
        assert!(!config.thread_ids);
    }

    #[test]
    fn test_verbose_outputs_raise_level() {
        let quiet = TracingConfig::from_config(&Config::default());
        assert!(quiet.level.is_none());

        let config = Config {
            verbose_outputs: true,
            ..Config::default()
        };
        assert_eq!(
            TracingConfig::from_config(&config).level,
            Some(tracing::Level::DEBUG)
        );
    }

    #[test]
    #[cfg(feature = "tracing")]
    fn test_second_install_is_refused() {
        let config = TracingConfig {
            format: TracingFormat::Compact,
            timestamps: false,
            ..TracingConfig::default()
        };
        init_subscriber_with_config(config);
        assert!(!init_subscriber());
    }
}
