//! cmdapi-wrappers: Shared types for the cmdapi command layer
//!
//! This crate defines what plugin authors see: the closed set of argument
//! kinds they can declare, and the immutable value records extractors hand
//! back once a command has been parsed by the host.

pub mod chat;
pub mod error;
pub mod function;
pub mod item;
pub mod key;
pub mod kind;
pub mod location;
pub mod nbt;
pub mod range;
pub mod scoreboard;
pub mod sender;
pub mod value;

pub use chat::{ChatColor, ChatComponent};
pub use error::ParseFailure;
pub use function::{FunctionRunner, FunctionWrapper};
pub use item::{BlockData, ContainerType, ItemSlot, ItemStack, Recipe};
pub use key::{InvalidKey, NamespacedKey};
pub use kind::{ArgumentKind, EntitySelector, LocationType, ScoreHolderType, SuggestionProviders};
pub use location::{Axis, Environment, Location, Location2D, Rotation};
pub use nbt::{NbtCompound, NbtTag};
pub use range::{FloatRange, IntegerRange};
pub use scoreboard::{DisplaySlot, MathOperation, ScoreboardSlot};
pub use sender::{EntityRef, PlayerRef, Sender};
pub use value::ArgumentValue;
