//! Arguments that name something by resource location

use crate::brigadier::{ArgumentType, CommandSyntaxError, ParsedValue, StringReader};
use crate::registry::Registry;
use crate::world::DimensionKind;
use crate::ResourceLocation;

/// A bare resource location; `id` is the parser it registers as
pub struct KeyParser {
    pub id: &'static str,
}

impl KeyParser {
    pub const RESOURCE_LOCATION: KeyParser = KeyParser {
        id: "minecraft:resource_location",
    };
    pub const ENCHANTMENT: KeyParser = KeyParser {
        id: "minecraft:item_enchantment",
    };
    pub const MOB_EFFECT: KeyParser = KeyParser {
        id: "minecraft:mob_effect",
    };
    pub const PARTICLE: KeyParser = KeyParser {
        id: "minecraft:particle",
    };
    pub const ENTITY_SUMMON: KeyParser = KeyParser {
        id: "minecraft:entity_summon",
    };
    pub const DIMENSION: KeyParser = KeyParser {
        id: "minecraft:dimension",
    };
}

impl ArgumentType for KeyParser {
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<ParsedValue, CommandSyntaxError> {
        ResourceLocation::read(reader).map(ParsedValue::new)
    }

    fn id(&self) -> &'static str {
        self.id
    }

    fn examples(&self) -> &'static [&'static str] {
        &["foo", "foo:bar", "012"]
    }
}

/// Check a parsed key against a registry
pub fn lookup(
    registry: &Registry,
    key: &ResourceLocation,
    error_key: &'static str,
    what: &str,
) -> Result<ResourceLocation, CommandSyntaxError> {
    if registry.contains(key) {
        Ok(key.clone())
    } else {
        Err(CommandSyntaxError::new(error_key, format!("Unknown {}: {}", what, key)))
    }
}

/// Dimension resolved while parsing, the way older releases do it
pub struct DimensionTypeParser;

impl ArgumentType for DimensionTypeParser {
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<ParsedValue, CommandSyntaxError> {
        let start = reader.cursor();
        let key = ResourceLocation::read(reader)?;
        let kind = match (key.namespace(), key.path()) {
            ("minecraft", "overworld") => DimensionKind::Overworld,
            ("minecraft", "the_nether") => DimensionKind::Nether,
            ("minecraft", "the_end") => DimensionKind::End,
            _ => {
                reader.set_cursor(start);
                return Err(reader.error(
                    "argument.dimension.invalid",
                    format!("Unknown dimension '{}'", key),
                ));
            }
        };
        Ok(ParsedValue::new(kind))
    }

    fn id(&self) -> &'static str {
        "minecraft:dimension"
    }
}

/// A function or, with a leading `#`, a function tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionRef {
    Function(ResourceLocation),
    Tag(ResourceLocation),
}

/// `minecraft:function`
pub struct FunctionParser;

impl ArgumentType for FunctionParser {
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<ParsedValue, CommandSyntaxError> {
        let function = if reader.peek() == Some('#') {
            reader.skip();
            FunctionRef::Tag(ResourceLocation::read(reader)?)
        } else {
            FunctionRef::Function(ResourceLocation::read(reader)?)
        };
        Ok(ParsedValue::new(function))
    }

    fn id(&self) -> &'static str {
        "minecraft:function"
    }

    fn examples(&self) -> &'static [&'static str] {
        &["foo", "foo:bar", "#foo"]
    }
}
