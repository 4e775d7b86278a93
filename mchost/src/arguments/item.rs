//! Items, block states and inventory slots

use super::nbt::{CompoundTag, TagParser};
use crate::brigadier::{ArgumentType, CommandSyntaxError, ParsedValue, StringReader};
use crate::registry::Registries;
use crate::ResourceLocation;
use std::collections::BTreeMap;

/// An item id with optional tag, before it is turned into a stack
#[derive(Debug, Clone, PartialEq)]
pub struct ItemInput {
    pub item: ResourceLocation,
    pub tag: Option<CompoundTag>,
}

impl ItemInput {
    pub fn validate(&self, registries: &Registries) -> Result<(), CommandSyntaxError> {
        if registries.items.contains(&self.item) {
            Ok(())
        } else {
            Err(CommandSyntaxError::new(
                "argument.item.id.invalid",
                format!("Unknown item '{}'", self.item),
            ))
        }
    }
}

/// `minecraft:item_stack`
pub struct ItemParser;

impl ArgumentType for ItemParser {
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<ParsedValue, CommandSyntaxError> {
        let item = ResourceLocation::read(reader)?;
        let tag = if reader.peek() == Some('{') {
            Some(TagParser::new(reader).read_struct()?)
        } else {
            None
        };
        Ok(ParsedValue::new(ItemInput { item, tag }))
    }

    fn id(&self) -> &'static str {
        "minecraft:item_stack"
    }

    fn examples(&self) -> &'static [&'static str] {
        &["stick", "minecraft:stick", "stick{foo=bar}"]
    }
}

/// A block with property values and block-entity data
#[derive(Debug, Clone, PartialEq)]
pub struct BlockInput {
    pub block: ResourceLocation,
    pub properties: BTreeMap<String, String>,
    pub tag: Option<CompoundTag>,
}

impl BlockInput {
    pub fn validate(&self, registries: &Registries) -> Result<(), CommandSyntaxError> {
        if !registries.blocks.contains(&self.block) {
            return Err(CommandSyntaxError::new(
                "argument.block.id.invalid",
                format!("Unknown block type '{}'", self.block),
            ));
        }
        let known = Registries::block_properties(&self.block);
        for (name, value) in &self.properties {
            let Some((_, values)) = known.iter().find(|(n, _)| *n == name.as_str()) else {
                return Err(CommandSyntaxError::new(
                    "argument.block.property.unknown",
                    format!("Block {} does not have property '{}'", self.block, name),
                ));
            };
            if !values.contains(&value.as_str()) {
                return Err(CommandSyntaxError::new(
                    "argument.block.property.invalid",
                    format!(
                        "Block {} does not accept '{}' for {} property",
                        self.block, value, name
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// `minecraft:block_state`
pub struct BlockStateParser;

impl ArgumentType for BlockStateParser {
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<ParsedValue, CommandSyntaxError> {
        let block = ResourceLocation::read(reader)?;
        let mut properties = BTreeMap::new();
        if reader.peek() == Some('[') {
            reader.skip();
            reader.skip_whitespace();
            while reader.can_read() && reader.peek() != Some(']') {
                reader.skip_whitespace();
                let name = reader.read_string()?;
                reader.skip_whitespace();
                reader.expect('=')?;
                reader.skip_whitespace();
                let value = reader.read_string()?;
                properties.insert(name, value);
                reader.skip_whitespace();
                if reader.peek() == Some(',') {
                    reader.skip();
                } else {
                    break;
                }
            }
            reader.expect(']').map_err(|_| {
                reader.error("argument.block.property.unclosed", "Expected closing ] for block state properties")
            })?;
        }
        let tag = if reader.peek() == Some('{') {
            Some(TagParser::new(reader).read_struct()?)
        } else {
            None
        };
        Ok(ParsedValue::new(BlockInput {
            block,
            properties,
            tag,
        }))
    }

    fn id(&self) -> &'static str {
        "minecraft:block_state"
    }

    fn examples(&self) -> &'static [&'static str] {
        &["stone", "minecraft:stone", "stone[foo=bar]", "foo{bar=baz}"]
    }
}

/// Slot id for a slot name (`container.5`, `weapon.mainhand`, ...)
pub fn slot_id(name: &str) -> Option<i32> {
    let fixed = match name {
        "weapon" | "weapon.mainhand" => Some(98),
        "weapon.offhand" => Some(99),
        "armor.feet" => Some(100),
        "armor.legs" => Some(101),
        "armor.chest" => Some(102),
        "armor.head" => Some(103),
        "horse.saddle" => Some(400),
        "horse.armor" => Some(401),
        "horse.chest" => Some(499),
        _ => None,
    };
    if fixed.is_some() {
        return fixed;
    }
    let (prefix, index) = name.rsplit_once('.')?;
    let index: i32 = index.parse().ok()?;
    let (base, count) = match prefix {
        "container" => (0, 54),
        "hotbar" => (0, 9),
        "inventory" => (9, 27),
        "enderchest" => (200, 27),
        "villager" => (300, 8),
        "horse" => (500, 15),
        _ => return None,
    };
    (0..count).contains(&index).then_some(base + index)
}

/// `minecraft:item_slot`
pub struct SlotParser;

impl ArgumentType for SlotParser {
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<ParsedValue, CommandSyntaxError> {
        let start = reader.cursor();
        let name = reader.read_unquoted_string();
        match slot_id(name) {
            Some(id) => Ok(ParsedValue::new(id)),
            None => {
                reader.set_cursor(start);
                Err(reader.error("slot.unknown", format!("Unknown slot '{}'", name)))
            }
        }
    }

    fn id(&self) -> &'static str {
        "minecraft:item_slot"
    }

    fn examples(&self) -> &'static [&'static str] {
        &["container.5", "12", "weapon"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_ids() {
        assert_eq!(slot_id("container.5"), Some(5));
        assert_eq!(slot_id("inventory.0"), Some(9));
        assert_eq!(slot_id("enderchest.26"), Some(226));
        assert_eq!(slot_id("armor.head"), Some(103));
        assert_eq!(slot_id("hotbar.9"), None);
        assert_eq!(slot_id("pocket.1"), None);
    }

    #[test]
    fn test_block_state_properties() {
        let parsed = BlockStateParser
            .parse(&mut StringReader::new("oak_log[axis=y]"))
            .unwrap();
        let input = parsed.downcast_ref::<BlockInput>().unwrap();
        assert_eq!(input.properties.get("axis").map(String::as_str), Some("y"));
        assert!(input.validate(&Registries::vanilla()).is_ok());

        let parsed = BlockStateParser
            .parse(&mut StringReader::new("stone[axis=y]"))
            .unwrap();
        let input = parsed.downcast_ref::<BlockInput>().unwrap();
        let err = input.validate(&Registries::vanilla()).unwrap_err();
        assert_eq!(err.key(), "argument.block.property.unknown");
    }
}
