//! Host values to `cmdapi-wrappers` records
//!
//! Both releases share the host's underlying value types, so the adapters
//! funnel their release-specific results through these helpers.

use crate::error::AdapterError;
use cmdapi_wrappers::{
    BlockData, ChatColor, ChatComponent, EntityRef, Environment, FunctionRunner, FunctionWrapper,
    ItemStack, Location, NamespacedKey, NbtCompound, NbtTag, ParseFailure, PlayerRef, Sender,
};
use mchost::arguments::{BlockInput, CompoundTag, GameProfile, ItemInput, Tag};
use mchost::chat::{ChatSerializer, Component, Formatting};
use mchost::functions::CustomFunction;
use mchost::source::CommandSender;
use mchost::world::{DimensionKind, Entity};
use mchost::{CommandListenerWrapper, ResourceLocation};
use std::sync::Arc;

pub fn key(location: &ResourceLocation) -> NamespacedKey {
    NamespacedKey::new(location.namespace(), location.path())
}

pub fn entity_ref(entity: &Entity) -> EntityRef {
    let mut location = Location::new(
        entity.world.clone(),
        entity.position.x,
        entity.position.y,
        entity.position.z,
    );
    location.yaw = entity.rotation.y;
    location.pitch = entity.rotation.x;
    EntityRef {
        uuid: entity.uuid,
        name: entity.name.clone(),
        entity_type: key(&entity.entity_type),
        location,
    }
}

pub fn player_ref(entity: &Entity) -> PlayerRef {
    PlayerRef {
        name: entity.name.clone(),
        uuid: entity.uuid,
    }
}

pub fn profile_ref(profile: &GameProfile) -> PlayerRef {
    PlayerRef {
        name: profile.name.clone(),
        uuid: profile.id,
    }
}

/// The first of the profiles a player argument resolved to
///
/// The host reports an unknown player itself; an empty list here means it
/// broke that contract.
pub fn first_profile(profiles: &[GameProfile]) -> Result<PlayerRef, AdapterError> {
    profiles
        .first()
        .map(profile_ref)
        .ok_or_else(|| AdapterError::Unmapped("empty game profile list".to_string()))
}

pub fn nbt(compound: &CompoundTag) -> NbtCompound {
    let mut out = NbtCompound::new();
    for (name, tag) in compound.entries() {
        out.insert(name.clone(), nbt_tag(tag));
    }
    out
}

fn nbt_tag(tag: &Tag) -> NbtTag {
    match tag {
        Tag::Byte(v) => NbtTag::Byte(*v),
        Tag::Short(v) => NbtTag::Short(*v),
        Tag::Int(v) => NbtTag::Int(*v),
        Tag::Long(v) => NbtTag::Long(*v),
        Tag::Float(v) => NbtTag::Float(*v),
        Tag::Double(v) => NbtTag::Double(*v),
        Tag::String(v) => NbtTag::String(v.clone()),
        Tag::List(items) => NbtTag::List(items.iter().map(nbt_tag).collect()),
        Tag::Compound(c) => NbtTag::Compound(nbt(c)),
        Tag::ByteArray(v) => NbtTag::ByteArray(v.clone()),
        Tag::IntArray(v) => NbtTag::IntArray(v.clone()),
        Tag::LongArray(v) => NbtTag::LongArray(v.clone()),
    }
}

pub fn chat_color(format: Formatting) -> Result<ChatColor, AdapterError> {
    ChatColor::from_name(format.name())
        .ok_or_else(|| AdapterError::Unmapped(format!("chat format '{}'", format.name())))
}

/// Styled text goes through the host's serializer; anything the record
/// cannot hold falls back to the flattened text
pub fn chat_component(component: &Component) -> ChatComponent {
    serde_json::from_str(&ChatSerializer::to_json(component))
        .unwrap_or_else(|_| ChatComponent::text(component.contents()))
}

pub fn item_stack(input: &ItemInput) -> ItemStack {
    let stack = ItemStack::new(key(&input.item), 1);
    match &input.tag {
        Some(tag) => stack.with_nbt(nbt(tag)),
        None => stack,
    }
}

pub fn block_data(input: &BlockInput) -> BlockData {
    let mut data = BlockData::new(key(&input.block));
    data.properties = input.properties.clone();
    data.nbt = input.tag.as_ref().map(nbt);
    data
}

pub fn environment(kind: DimensionKind) -> Environment {
    match kind {
        DimensionKind::Overworld => Environment::Normal,
        DimensionKind::Nether => Environment::Nether,
        DimensionKind::End => Environment::TheEnd,
    }
}

pub fn resource_location(key: &NamespacedKey) -> ResourceLocation {
    ResourceLocation::new(key.namespace(), key.key())
}

/// Runs a datapack function against whatever library is live when called
struct HostFunction {
    function: Arc<CustomFunction>,
    source: CommandListenerWrapper,
}

impl FunctionRunner for HostFunction {
    fn run(&self) -> Result<i32, ParseFailure> {
        let library = self.source.server().function_library();
        Ok(library.execute(&self.function, &self.source))
    }
}

pub fn functions(
    resolved: Vec<Arc<CustomFunction>>,
    source: &CommandListenerWrapper,
) -> Vec<FunctionWrapper> {
    resolved
        .into_iter()
        .map(|function| {
            let id = key(function.id());
            let commands = function.lines().to_vec();
            let runner = Arc::new(HostFunction {
                function,
                source: source.clone(),
            });
            FunctionWrapper::new(id, commands, runner)
        })
        .collect()
}

/// The sender of `source`, wrapped as `Proxied` when another entity executes
pub fn sender(source: &CommandListenerWrapper) -> Sender {
    let core = source.core();
    let caller = match source.sender() {
        CommandSender::Console => Sender::Console,
        CommandSender::Player(uuid) => match core.entity(uuid) {
            Some(player) => Sender::Player(player_ref(&player)),
            None => Sender::Console,
        },
        CommandSender::Entity(uuid) => match core.entity(uuid) {
            Some(entity) => Sender::Entity(entity_ref(&entity)),
            None => Sender::Console,
        },
    };
    let caller_uuid = match source.sender() {
        CommandSender::Console => None,
        CommandSender::Player(uuid) | CommandSender::Entity(uuid) => Some(uuid),
    };
    match source.entity() {
        Some(callee) if Some(callee.uuid) != caller_uuid => Sender::Proxied {
            caller: Box::new(caller),
            callee: entity_ref(&callee),
        },
        _ => caller,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mchost::world::{Vec2, Vec3};
    use uuid::Uuid;

    #[test]
    fn test_first_profile() {
        let alex = GameProfile {
            name: "Alex".to_string(),
            id: Uuid::new_v4(),
        };
        let steve = GameProfile {
            name: "Steve".to_string(),
            id: Uuid::new_v4(),
        };
        let first = first_profile(&[alex.clone(), steve]).unwrap();
        assert_eq!((first.name.as_str(), first.uuid), ("Alex", alex.id));
        assert!(matches!(first_profile(&[]), Err(AdapterError::Unmapped(_))));
    }

    #[test]
    fn test_nested_compound() {
        let mut inner = CompoundTag::new();
        inner.put("Count", Tag::Byte(3));
        let mut outer = CompoundTag::new();
        outer.put("Item", Tag::Compound(inner));
        outer.put("Tags", Tag::List(vec![Tag::String("a".into())]));

        let converted = nbt(&outer);
        match converted.get("Item") {
            Some(NbtTag::Compound(item)) => assert_eq!(item.get("Count"), Some(&NbtTag::Byte(3))),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            converted.get("Tags"),
            Some(&NbtTag::List(vec![NbtTag::String("a".into())]))
        );
    }

    #[test]
    fn test_entity_ref_carries_rotation() {
        let mut entity = Entity::player("Steve", "world", Vec3::new(1.0, 2.0, 3.0));
        entity.rotation = Vec2 { x: 15.0, y: 90.0 };
        let converted = entity_ref(&entity);
        assert_eq!(converted.location.pitch, 15.0);
        assert_eq!(converted.location.yaw, 90.0);
        assert!(converted.is_player());
    }

    #[test]
    fn test_every_format_maps_to_a_chat_color() {
        for format in Formatting::values() {
            assert!(chat_color(*format).is_ok(), "{}", format.name());
        }
    }

    #[test]
    fn test_bare_string_component() {
        let component = Component::text("hi");
        assert_eq!(chat_component(&component).plain_text(), "hi");
    }
}
