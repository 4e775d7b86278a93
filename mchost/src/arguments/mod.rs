//! Argument types shared by every release
//!
//! Release modules pick from these, register them under their own names, and
//! decide how parsed values are resolved when a command runs.

pub mod coordinates;
pub mod item;
pub mod keys;
pub mod misc;
pub mod nbt;
pub mod range;
pub mod scoreboard;
pub mod selector;
pub mod text;

pub use coordinates::{
    BlockPosParser, ColumnPosParser, Coordinates, Direction, RotationParser, SwizzleParser,
    Vec2Parser, Vec3Parser, WorldCoordinate,
};
pub use item::{BlockInput, BlockStateParser, ItemInput, ItemParser, SlotParser};
pub use keys::{DimensionTypeParser, FunctionParser, FunctionRef, KeyParser};
pub use misc::{Ticks, TimeParser, UuidParser};
pub use nbt::{CompoundTag, NbtCompoundParser, Tag};
pub use range::{Bounds, RangeParser};
pub use scoreboard::{
    CriteriaParser, DisplaySlotIndex, Operation, OperationParser, ScoreboardName,
    ScoreboardNameParser, ScoreboardSlotParser,
};
pub use selector::{
    EntityParser, EntitySelector, GameProfile, GameProfileParser, ScoreHolder, ScoreHolderParser,
};
pub use text::{ColorParser, ComponentParser, Message, MessageParser};
