//! Items, blocks, recipes and inventory slots

use crate::{NamespacedKey, NbtCompound};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A stack of items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    pub material: NamespacedKey,
    pub amount: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbt: Option<NbtCompound>,
}

impl ItemStack {
    pub fn new(material: NamespacedKey, amount: u32) -> Self {
        Self {
            material,
            amount,
            nbt: None,
        }
    }

    pub fn with_nbt(mut self, nbt: NbtCompound) -> Self {
        self.nbt = Some(nbt);
        self
    }
}

/// A block state: block type, property values and block-entity data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockData {
    pub material: NamespacedKey,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbt: Option<NbtCompound>,
}

impl BlockData {
    pub fn new(material: NamespacedKey) -> Self {
        Self {
            material,
            properties: BTreeMap::new(),
            nbt: None,
        }
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }
}

/// A crafting recipe known to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub key: NamespacedKey,
    pub result: ItemStack,
}

/// Which container an inventory slot belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerType {
    ArmorFeet,
    ArmorLegs,
    ArmorChest,
    ArmorHead,
    HorseSaddle,
    HorseArmor,
    HorseChest,
    WeaponMainhand,
    WeaponOffhand,
    /// Hotbar and main inventory, also chests
    Container,
    Enderchest,
    Horse,
    Villager,
}

/// An inventory slot decoded from the host's numeric slot id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemSlot {
    id: i32,
    index: i32,
    container: Option<ContainerType>,
}

impl ItemSlot {
    pub fn from_id(id: i32) -> Self {
        let (container, index) = match id {
            // Container slot 40 is also the offhand; past 35 the container may be a double chest
            0..=53 => (Some(ContainerType::Container), id),
            200..=226 => (Some(ContainerType::Enderchest), id - 200),
            300..=307 => (Some(ContainerType::Villager), id - 300),
            500..=514 => (Some(ContainerType::Horse), id - 500),
            98 => (Some(ContainerType::WeaponMainhand), 0),
            99 => (Some(ContainerType::WeaponOffhand), 0),
            100 => (Some(ContainerType::ArmorFeet), 0),
            101 => (Some(ContainerType::ArmorLegs), 0),
            102 => (Some(ContainerType::ArmorChest), 0),
            103 => (Some(ContainerType::ArmorHead), 0),
            400 => (Some(ContainerType::HorseSaddle), 0),
            401 => (Some(ContainerType::HorseArmor), 0),
            499 => (Some(ContainerType::HorseChest), 0),
            _ => (None, 0),
        };
        Self {
            id,
            index,
            container,
        }
    }

    /// The raw host slot id
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Index within the container (0 for single-slot containers)
    pub fn index(&self) -> i32 {
        self.index
    }

    /// None for ids the host knows but this decoding does not
    pub fn container_type(&self) -> Option<ContainerType> {
        self.container
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_slot_ranges() {
        let slot = ItemSlot::from_id(5);
        assert_eq!(slot.container_type(), Some(ContainerType::Container));
        assert_eq!(slot.index(), 5);

        let slot = ItemSlot::from_id(203);
        assert_eq!(slot.container_type(), Some(ContainerType::Enderchest));
        assert_eq!(slot.index(), 3);

        let slot = ItemSlot::from_id(514);
        assert_eq!(slot.container_type(), Some(ContainerType::Horse));
        assert_eq!(slot.index(), 14);
    }

    #[test]
    fn test_item_slot_single_slots() {
        assert_eq!(
            ItemSlot::from_id(103).container_type(),
            Some(ContainerType::ArmorHead)
        );
        assert_eq!(
            ItemSlot::from_id(98).container_type(),
            Some(ContainerType::WeaponMainhand)
        );
        assert_eq!(ItemSlot::from_id(98).index(), 0);
        assert_eq!(ItemSlot::from_id(60).container_type(), None);
    }
}
