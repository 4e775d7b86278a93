//! Built-in registries the argument types resolve against

use crate::ResourceLocation;
use std::collections::BTreeMap;

/// An ordered set of registered keys
#[derive(Debug, Clone, Default)]
pub struct Registry {
    name: &'static str,
    keys: Vec<ResourceLocation>,
}

impl Registry {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            keys: Vec::new(),
        }
    }

    fn of(name: &'static str, paths: &[&str]) -> Self {
        Self {
            name,
            keys: paths.iter().map(|p| ResourceLocation::minecraft(*p)).collect(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn register(&mut self, key: ResourceLocation) {
        if !self.keys.contains(&key) {
            self.keys.push(key);
        }
    }

    pub fn contains(&self, key: &ResourceLocation) -> bool {
        self.keys.contains(key)
    }

    /// Keys in registration order
    pub fn keys(&self) -> impl Iterator<Item = &ResourceLocation> {
        self.keys.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeEntry {
    pub result: ResourceLocation,
    pub count: u32,
}

/// Property names and allowed values for a block
pub type BlockProperties = &'static [(&'static str, &'static [&'static str])];

#[derive(Debug, Clone)]
pub struct Registries {
    pub sounds: Registry,
    pub biomes: Registry,
    pub entity_types: Registry,
    pub enchantments: Registry,
    pub mob_effects: Registry,
    pub particles: Registry,
    pub items: Registry,
    pub blocks: Registry,
    pub advancements: Registry,
    pub loot_tables: Registry,
    pub recipes: BTreeMap<ResourceLocation, RecipeEntry>,
}

const FACING: &[&str] = &["north", "south", "west", "east"];
const AXIS: &[&str] = &["x", "y", "z"];
const BOOL: &[&str] = &["true", "false"];

impl Registries {
    pub fn vanilla() -> Self {
        let recipes = [
            ("oak_planks", "oak_planks", 4),
            ("stick", "stick", 4),
            ("crafting_table", "crafting_table", 1),
            ("diamond_sword", "diamond_sword", 1),
            ("torch", "torch", 4),
        ]
        .into_iter()
        .map(|(key, result, count)| {
            (
                ResourceLocation::minecraft(key),
                RecipeEntry {
                    result: ResourceLocation::minecraft(result),
                    count,
                },
            )
        })
        .collect();

        Self {
            sounds: Registry::of(
                "sound_event",
                &[
                    "ambient.cave",
                    "block.anvil.land",
                    "block.note_block.harp",
                    "entity.pig.ambient",
                    "entity.player.levelup",
                    "entity.experience_orb.pickup",
                    "ui.button.click",
                ],
            ),
            biomes: Registry::of(
                "biome",
                &["plains", "desert", "forest", "taiga", "swamp", "nether_wastes", "the_end"],
            ),
            entity_types: Registry::of(
                "entity_type",
                &["pig", "cow", "zombie", "skeleton", "creeper", "armor_stand", "item", "player"],
            ),
            enchantments: Registry::of(
                "enchantment",
                &["protection", "sharpness", "efficiency", "unbreaking", "fortune", "mending"],
            ),
            mob_effects: Registry::of(
                "mob_effect",
                &["speed", "slowness", "haste", "strength", "jump_boost", "regeneration", "night_vision"],
            ),
            particles: Registry::of(
                "particle_type",
                &["flame", "heart", "smoke", "crit", "end_rod", "happy_villager"],
            ),
            items: Registry::of(
                "item",
                &[
                    "stone",
                    "dirt",
                    "oak_log",
                    "oak_planks",
                    "stick",
                    "torch",
                    "crafting_table",
                    "diamond",
                    "diamond_sword",
                    "chest",
                    "furnace",
                ],
            ),
            blocks: Registry::of(
                "block",
                &["air", "stone", "dirt", "oak_log", "oak_planks", "torch", "chest", "furnace"],
            ),
            advancements: Registry::of(
                "advancement",
                &["story/root", "story/mine_stone", "story/smelt_iron", "nether/root", "end/root"],
            ),
            loot_tables: Registry::of(
                "loot_table",
                &["chests/simple_dungeon", "chests/village/village_weaponsmith", "entities/pig"],
            ),
            recipes,
        }
    }

    /// Known properties of a block state
    pub fn block_properties(block: &ResourceLocation) -> BlockProperties {
        match block.path() {
            "oak_log" => &[("axis", AXIS)],
            "chest" => &[("facing", FACING), ("waterlogged", BOOL)],
            "furnace" => &[("facing", FACING), ("lit", BOOL)],
            _ => &[],
        }
    }
}
