//! mchost: command internals of a game server, in two incompatible releases
//!
//! Both releases share the brigadier-style engine in [`brigadier`] and the
//! argument grammar in [`arguments`]. What differs is everything a plugin
//! touches: the names of argument types, the shape of the values their
//! getters return, how an empty entity selector is reported, and how the
//! dispatcher, function manager and resource manager are wired together.
//!
//! - [`v1_15_r1`]: function data and resource manager swapped on the server
//! - [`v1_16_r1`]: all three held in sealed fields of `DataPackResources`

pub mod arguments;
pub mod brigadier;
pub mod chat;
pub mod commands;
pub mod functions;
pub mod key;
pub mod registry;
pub mod resources;
pub mod scoreboard;
pub mod sealed;
pub mod server;
pub mod source;
pub mod v1_15_r1;
pub mod v1_16_r1;
pub mod world;

pub use key::ResourceLocation;
pub use server::{MinecraftServer, ServerCore};
pub use source::CommandListenerWrapper;
