//! cmdapi-nms: Version adapters for the host's command internals
//!
//! Each supported server release gets one [`VersionAdapter`]. It builds the
//! host's native parser for every argument kind, turns parsed native values
//! back into cmdapi records, and knows how that release stores its
//! dispatcher and function library so datapacks can be reloaded live.

pub mod adapter;
pub mod classify;
pub mod convert;
pub mod error;
pub mod reload;
pub mod resolver;
pub mod suggestions;
pub mod v1_15_r1;
pub mod v1_16_r1;

pub use adapter::{LiveState, NativeParser, VersionAdapter};
pub use classify::classify_operation;
pub use error::{AdapterError, ExtractError, ReloadError, ResolveError};
pub use reload::{DatapackReload, ReloadCoordinator, ReloadReport, ReloadState};
pub use resolver::{active, bind_active, release_of, AdapterRegistry};
pub use suggestions::{native_provider, Completions};
