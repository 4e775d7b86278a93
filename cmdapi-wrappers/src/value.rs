use crate::{
    Axis, BlockData, ChatColor, ChatComponent, EntityRef, Environment, FloatRange,
    FunctionWrapper, IntegerRange, ItemSlot, ItemStack, Location, Location2D, MathOperation,
    NamespacedKey, NbtCompound, PlayerRef, Recipe, Rotation, ScoreboardSlot,
};
use std::collections::BTreeSet;

/// Everything an extractor can hand back
///
/// One variant per result shape; several kinds share a shape (all the
/// registry-key kinds return a [`NamespacedKey`]-carrying variant).
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    Advancement(NamespacedKey),
    Axis(BTreeSet<Axis>),
    Biome(NamespacedKey),
    BlockState(BlockData),
    Chat(ChatComponent),
    ChatColor(ChatColor),
    ChatComponent(ChatComponent),
    Environment(Environment),
    Enchantment(NamespacedKey),
    Entity(EntityRef),
    Entities(Vec<EntityRef>),
    EntityType(NamespacedKey),
    FloatRange(FloatRange),
    Functions(Vec<FunctionWrapper>),
    IntRange(IntegerRange),
    ItemStack(ItemStack),
    ItemSlot(ItemSlot),
    Location(Location),
    Location2D(Location2D),
    LootTable(NamespacedKey),
    MathOperation(MathOperation),
    NamespacedKey(NamespacedKey),
    Nbt(NbtCompound),
    Objective(String),
    ObjectiveCriteria(String),
    Particle(NamespacedKey),
    Player(PlayerRef),
    Players(Vec<PlayerRef>),
    PotionEffect(NamespacedKey),
    Recipe(Recipe),
    Rotation(Rotation),
    ScoreHolder(String),
    ScoreHolders(Vec<String>),
    ScoreboardSlot(ScoreboardSlot),
    Sound(NamespacedKey),
    Team(String),
    Time(i32),
    Uuid(uuid::Uuid),
}

impl ArgumentValue {
    pub fn as_location(&self) -> Option<&Location> {
        match self {
            Self::Location(loc) => Some(loc),
            _ => None,
        }
    }

    pub fn as_entities(&self) -> Option<&[EntityRef]> {
        match self {
            Self::Entities(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_players(&self) -> Option<&[PlayerRef]> {
        match self {
            Self::Players(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_key(&self) -> Option<&NamespacedKey> {
        match self {
            Self::Advancement(k)
            | Self::Biome(k)
            | Self::Enchantment(k)
            | Self::EntityType(k)
            | Self::LootTable(k)
            | Self::NamespacedKey(k)
            | Self::Particle(k)
            | Self::PotionEffect(k)
            | Self::Sound(k) => Some(k),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Time(t) => Some(*t),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_key_covers_registry_kinds() {
        let key = NamespacedKey::minecraft("plains");
        assert_eq!(ArgumentValue::Biome(key.clone()).as_key(), Some(&key));
        assert_eq!(ArgumentValue::Time(20).as_key(), None);
    }

    #[test]
    fn test_empty_entity_list_is_a_value() {
        let value = ArgumentValue::Entities(Vec::new());
        assert_eq!(value.as_entities().map(|e| e.len()), Some(0));
    }

    #[test]
    fn test_records_survive_msgpack() {
        let range = IntegerRange::new(1, 5);
        let bytes = rmp_serde::to_vec(&range).unwrap();
        let back: IntegerRange = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(back, range);
    }
}
