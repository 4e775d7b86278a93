//! The closed set of argument kinds
//!
//! Kinds are defined once for the whole layer, never per host release.
//! Each adapter must either satisfy a kind or report it unsupported.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which entities an entity selector may resolve to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitySelector {
    OneEntity,
    ManyEntities,
    OnePlayer,
    ManyPlayers,
}

impl EntitySelector {
    /// Whether at most one target is allowed
    pub fn is_single(self) -> bool {
        matches!(self, Self::OneEntity | Self::OnePlayer)
    }

    /// Whether only players are allowed
    pub fn is_players_only(self) -> bool {
        matches!(self, Self::OnePlayer | Self::ManyPlayers)
    }
}

/// Block-aligned or precise coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    BlockPosition,
    PrecisePosition,
}

/// One score holder or many
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreHolderType {
    Single,
    Multiple,
}

/// Host completion suppliers bridged by the adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionProviders {
    Function,
    Recipes,
    Sounds,
    Advancements,
    LootTables,
    Biomes,
    Entities,
}

impl SuggestionProviders {
    pub const ALL: [SuggestionProviders; 7] = [
        Self::Function,
        Self::Recipes,
        Self::Sounds,
        Self::Advancements,
        Self::LootTables,
        Self::Biomes,
        Self::Entities,
    ];
}

/// A typed command-argument category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "param")]
pub enum ArgumentKind {
    Advancement,
    Axis,
    Biome,
    BlockState,
    Chat,
    ChatColor,
    ChatComponent,
    Dimension,
    Enchantment,
    EntitySelector(EntitySelector),
    EntityType,
    FloatRange,
    Function,
    IntRange,
    ItemSlot,
    ItemStack,
    Location(LocationType),
    Location2D(LocationType),
    LootTable,
    MathOperation,
    NamespacedKey,
    NbtCompound,
    Objective,
    ObjectiveCriteria,
    Particle,
    Player,
    PotionEffect,
    Recipe,
    Rotation,
    ScoreHolder(ScoreHolderType),
    ScoreboardSlot,
    Sound,
    Team,
    Time,
    Uuid,
}

impl ArgumentKind {
    /// The suggestion provider attached to this kind, if any
    pub fn suggestions(&self) -> Option<SuggestionProviders> {
        match self {
            Self::Function => Some(SuggestionProviders::Function),
            Self::Recipe => Some(SuggestionProviders::Recipes),
            Self::Sound => Some(SuggestionProviders::Sounds),
            Self::Advancement => Some(SuggestionProviders::Advancements),
            Self::LootTable => Some(SuggestionProviders::LootTables),
            Self::Biome => Some(SuggestionProviders::Biomes),
            Self::EntityType => Some(SuggestionProviders::Entities),
            _ => None,
        }
    }

    /// Stable snake_case name used in logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::Advancement => "advancement",
            Self::Axis => "axis",
            Self::Biome => "biome",
            Self::BlockState => "block_state",
            Self::Chat => "chat",
            Self::ChatColor => "chat_color",
            Self::ChatComponent => "chat_component",
            Self::Dimension => "dimension",
            Self::Enchantment => "enchantment",
            Self::EntitySelector(EntitySelector::OneEntity) => "entity_selector(one_entity)",
            Self::EntitySelector(EntitySelector::ManyEntities) => "entity_selector(many_entities)",
            Self::EntitySelector(EntitySelector::OnePlayer) => "entity_selector(one_player)",
            Self::EntitySelector(EntitySelector::ManyPlayers) => "entity_selector(many_players)",
            Self::EntityType => "entity_type",
            Self::FloatRange => "float_range",
            Self::Function => "function",
            Self::IntRange => "int_range",
            Self::ItemSlot => "item_slot",
            Self::ItemStack => "item_stack",
            Self::Location(LocationType::BlockPosition) => "location(block)",
            Self::Location(LocationType::PrecisePosition) => "location(precise)",
            Self::Location2D(LocationType::BlockPosition) => "location_2d(block)",
            Self::Location2D(LocationType::PrecisePosition) => "location_2d(precise)",
            Self::LootTable => "loot_table",
            Self::MathOperation => "math_operation",
            Self::NamespacedKey => "namespaced_key",
            Self::NbtCompound => "nbt_compound",
            Self::Objective => "objective",
            Self::ObjectiveCriteria => "objective_criteria",
            Self::Particle => "particle",
            Self::Player => "player",
            Self::PotionEffect => "potion_effect",
            Self::Recipe => "recipe",
            Self::Rotation => "rotation",
            Self::ScoreHolder(ScoreHolderType::Single) => "score_holder(single)",
            Self::ScoreHolder(ScoreHolderType::Multiple) => "score_holder(multiple)",
            Self::ScoreboardSlot => "scoreboard_slot",
            Self::Sound => "sound",
            Self::Team => "team",
            Self::Time => "time",
            Self::Uuid => "uuid",
        }
    }
}

impl fmt::Display for ArgumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_backed_kinds_have_suggestions() {
        assert_eq!(
            ArgumentKind::Sound.suggestions(),
            Some(SuggestionProviders::Sounds)
        );
        assert_eq!(
            ArgumentKind::Function.suggestions(),
            Some(SuggestionProviders::Function)
        );
        assert_eq!(ArgumentKind::Time.suggestions(), None);
    }

    #[test]
    fn test_selector_flags() {
        assert!(EntitySelector::OnePlayer.is_single());
        assert!(EntitySelector::OnePlayer.is_players_only());
        assert!(!EntitySelector::ManyEntities.is_single());
        assert!(!EntitySelector::ManyEntities.is_players_only());
    }

    #[test]
    fn test_kind_display() {
        let kind = ArgumentKind::Location(LocationType::BlockPosition);
        assert_eq!(kind.to_string(), "location(block)");
    }
}
