//! Release 1.15.2 internals
//!
//! Argument types carry their Mojang names here. The function manager and the
//! resource manager live directly on the server and are swapped as a whole.

use crate::arguments::{
    keys, BlockInput, BlockPosParser, BlockStateParser, ColorParser, ColumnPosParser,
    ComponentParser, Coordinates, CriteriaParser, Direction, DimensionTypeParser, DisplaySlotIndex,
    EntityParser, EntitySelector, FunctionParser, FunctionRef, GameProfile, GameProfileParser,
    ItemInput, ItemParser, KeyParser, Message, MessageParser, NbtCompoundParser, Operation,
    OperationParser, RangeParser, RotationParser, ScoreHolder, ScoreHolderParser, ScoreboardName,
    ScoreboardNameParser, ScoreboardSlotParser, SlotParser, SwizzleParser, Ticks, TimeParser,
    Vec2Parser, Vec3Parser,
};
use crate::brigadier::{ArgumentType, CommandContext, CommandDispatcher, CommandError, CommandSyntaxError};
use crate::chat::{Component, Formatting};
use crate::commands::{register_vanilla, resolve_functions};
use crate::functions::{CustomFunction, FunctionLibrary};
use crate::registry::RecipeEntry;
use crate::resources::ReloadableResourceManager;
use crate::scoreboard::{Objective, Team};
use crate::server::{MinecraftServer, ServerCore};
use crate::source::CommandListenerWrapper;
use crate::world::{DimensionKind, Entity, Vec3};
use crate::ResourceLocation;
use parking_lot::RwLock;
use std::any::Any;
use std::collections::BTreeSet;
use std::sync::Arc;

pub const VERSION: &str = "1.15.2";

/// Function manager of this release
pub type CustomFunctionData = FunctionLibrary;

pub struct DedicatedServer {
    core: Arc<ServerCore>,
    commands: Arc<CommandDispatcher>,
    function_data: RwLock<Arc<CustomFunctionData>>,
    resource_manager: RwLock<Arc<ReloadableResourceManager>>,
    function_permission_level: i32,
}

impl DedicatedServer {
    pub fn start() -> Arc<Self> {
        let core = Arc::new(ServerCore::vanilla());
        let commands = Arc::new(CommandDispatcher::new());
        register_vanilla(&commands);
        let function_permission_level = 2;
        let function_data = Arc::new(CustomFunctionData::new(
            Arc::clone(&commands),
            function_permission_level,
        ));
        let resource_manager = ReloadableResourceManager::open(core.resource_handles());
        tracing::info!(version = VERSION, "Server started");
        Arc::new(Self {
            core,
            commands,
            function_data: RwLock::new(function_data),
            resource_manager: RwLock::new(resource_manager),
            function_permission_level,
        })
    }

    pub fn get_commands(&self) -> &Arc<CommandDispatcher> {
        &self.commands
    }

    pub fn get_function_data(&self) -> Arc<CustomFunctionData> {
        Arc::clone(&self.function_data.read())
    }

    pub fn set_function_data(&self, data: Arc<CustomFunctionData>) {
        *self.function_data.write() = data;
    }

    pub fn get_resource_manager(&self) -> Arc<ReloadableResourceManager> {
        Arc::clone(&self.resource_manager.read())
    }

    /// Install a new resource manager, returning the one it replaces
    pub fn set_resource_manager(
        &self,
        manager: Arc<ReloadableResourceManager>,
    ) -> Arc<ReloadableResourceManager> {
        std::mem::replace(&mut *self.resource_manager.write(), manager)
    }

    pub fn get_function_permission_level(&self) -> i32 {
        self.function_permission_level
    }

    /// The console source functions are compiled with
    pub fn create_command_source_stack(self: &Arc<Self>) -> CommandListenerWrapper {
        CommandListenerWrapper::console(Arc::clone(self) as Arc<dyn MinecraftServer>)
    }
}

impl MinecraftServer for DedicatedServer {
    fn version(&self) -> &'static str {
        VERSION
    }

    fn core(&self) -> &Arc<ServerCore> {
        &self.core
    }

    fn command_dispatcher(&self) -> Arc<CommandDispatcher> {
        Arc::clone(&self.commands)
    }

    fn function_library(&self) -> Arc<FunctionLibrary> {
        self.get_function_data()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnPos {
    pub x: i32,
    pub z: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2f {
    pub x: f32,
    pub y: f32,
}

/// `MinMaxBounds.Ints`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntBounds {
    pub min: Option<i32>,
    pub max: Option<i32>,
}

/// `MinMaxBounds.Floats`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

fn parser(parser: impl ArgumentType + 'static) -> Arc<dyn ArgumentType> {
    Arc::new(parser)
}

pub struct BlockPosArgument;

impl BlockPosArgument {
    pub fn block_pos() -> Arc<dyn ArgumentType> {
        parser(BlockPosParser)
    }

    pub fn get_loaded_block_pos(ctx: &CommandContext, name: &str) -> Result<BlockPos, CommandError> {
        let (x, y, z) = ctx.get_argument::<Coordinates>(name)?.block_pos(ctx.source());
        Ok(BlockPos { x, y, z })
    }
}

pub struct Vec3Argument;

impl Vec3Argument {
    pub fn vec3(center_correct: bool) -> Arc<dyn ArgumentType> {
        parser(Vec3Parser { center_correct })
    }

    pub fn get_vec3(ctx: &CommandContext, name: &str) -> Result<Vec3, CommandError> {
        Ok(ctx.get_argument::<Coordinates>(name)?.position(ctx.source()))
    }
}

pub struct ColumnPosArgument;

impl ColumnPosArgument {
    pub fn column_pos() -> Arc<dyn ArgumentType> {
        parser(ColumnPosParser)
    }

    pub fn get_column_pos(ctx: &CommandContext, name: &str) -> Result<ColumnPos, CommandError> {
        let (x, _, z) = ctx.get_argument::<Coordinates>(name)?.block_pos(ctx.source());
        Ok(ColumnPos { x, z })
    }
}

pub struct Vec2Argument;

impl Vec2Argument {
    pub fn vec2() -> Arc<dyn ArgumentType> {
        parser(Vec2Parser {
            center_correct: true,
        })
    }

    /// `x` and `z` of the column, as `x` and `y`
    pub fn get_vec2(ctx: &CommandContext, name: &str) -> Result<Vec2f, CommandError> {
        let pos = ctx.get_argument::<Coordinates>(name)?.position(ctx.source());
        Ok(Vec2f {
            x: pos.x as f32,
            y: pos.z as f32,
        })
    }
}

pub struct RotationArgument;

impl RotationArgument {
    pub fn rotation() -> Arc<dyn ArgumentType> {
        parser(RotationParser)
    }

    /// Pitch in `x`, yaw in `y`
    pub fn get_rotation(ctx: &CommandContext, name: &str) -> Result<Vec2f, CommandError> {
        let rotation = ctx.get_argument::<Coordinates>(name)?.rotation(ctx.source());
        Ok(Vec2f {
            x: rotation.x,
            y: rotation.y,
        })
    }
}

pub struct SwizzleArgument;

impl SwizzleArgument {
    pub fn swizzle() -> Arc<dyn ArgumentType> {
        parser(SwizzleParser)
    }

    pub fn get_swizzle(ctx: &CommandContext, name: &str) -> Result<BTreeSet<Direction>, CommandError> {
        Ok(ctx.get_argument::<BTreeSet<Direction>>(name)?.clone())
    }
}

pub struct EntityArgument;

impl EntityArgument {
    pub fn entity() -> Arc<dyn ArgumentType> {
        parser(EntityParser {
            single: true,
            players_only: false,
        })
    }

    pub fn entities() -> Arc<dyn ArgumentType> {
        parser(EntityParser {
            single: false,
            players_only: false,
        })
    }

    pub fn player() -> Arc<dyn ArgumentType> {
        parser(EntityParser {
            single: true,
            players_only: true,
        })
    }

    pub fn players() -> Arc<dyn ArgumentType> {
        parser(EntityParser {
            single: false,
            players_only: true,
        })
    }

    pub fn get_entity(ctx: &CommandContext, name: &str) -> Result<Entity, CommandError> {
        let selector = ctx.get_argument::<EntitySelector>(name)?;
        Ok(selector.find_single_entity(ctx.source())?)
    }

    /// Fails when nothing matches
    pub fn get_entities(ctx: &CommandContext, name: &str) -> Result<Vec<Entity>, CommandError> {
        let found = Self::get_optional_entities(ctx, name)?;
        if found.is_empty() {
            return Err(crate::arguments::selector::no_entities().into());
        }
        Ok(found)
    }

    pub fn get_optional_entities(ctx: &CommandContext, name: &str) -> Result<Vec<Entity>, CommandError> {
        let selector = ctx.get_argument::<EntitySelector>(name)?;
        Ok(selector.find_entities(ctx.source()))
    }

    pub fn get_player(ctx: &CommandContext, name: &str) -> Result<Entity, CommandError> {
        let selector = ctx.get_argument::<EntitySelector>(name)?;
        Ok(selector.find_single_player(ctx.source())?)
    }

    pub fn get_optional_players(ctx: &CommandContext, name: &str) -> Result<Vec<Entity>, CommandError> {
        let selector = ctx.get_argument::<EntitySelector>(name)?;
        Ok(selector.find_players(ctx.source()))
    }
}

pub struct GameProfileArgument;

impl GameProfileArgument {
    pub fn game_profile() -> Arc<dyn ArgumentType> {
        parser(GameProfileParser)
    }

    pub fn get_game_profiles(ctx: &CommandContext, name: &str) -> Result<Vec<GameProfile>, CommandError> {
        let selector = ctx.get_argument::<EntitySelector>(name)?;
        Ok(selector.game_profiles(ctx.source())?)
    }
}

pub struct ItemArgument;

impl ItemArgument {
    pub fn item() -> Arc<dyn ArgumentType> {
        parser(ItemParser)
    }

    pub fn get_item(ctx: &CommandContext, name: &str) -> Result<ItemInput, CommandError> {
        let input = ctx.get_argument::<ItemInput>(name)?;
        input.validate(ctx.source().core().registries())?;
        Ok(input.clone())
    }
}

pub struct BlockStateArgument;

impl BlockStateArgument {
    pub fn block() -> Arc<dyn ArgumentType> {
        parser(BlockStateParser)
    }

    pub fn get_block(ctx: &CommandContext, name: &str) -> Result<BlockInput, CommandError> {
        let input = ctx.get_argument::<BlockInput>(name)?;
        input.validate(ctx.source().core().registries())?;
        Ok(input.clone())
    }
}

pub struct SlotArgument;

impl SlotArgument {
    pub fn slot() -> Arc<dyn ArgumentType> {
        parser(SlotParser)
    }

    pub fn get_slot(ctx: &CommandContext, name: &str) -> Result<i32, CommandError> {
        Ok(*ctx.get_argument::<i32>(name)?)
    }
}

pub struct CompoundTagArgument;

impl CompoundTagArgument {
    pub fn compound_tag() -> Arc<dyn ArgumentType> {
        parser(NbtCompoundParser)
    }

    pub fn get_compound_tag(
        ctx: &CommandContext,
        name: &str,
    ) -> Result<crate::arguments::CompoundTag, CommandError> {
        Ok(ctx.get_argument::<crate::arguments::CompoundTag>(name)?.clone())
    }
}

pub struct ComponentArgument;

impl ComponentArgument {
    pub fn text_component() -> Arc<dyn ArgumentType> {
        parser(ComponentParser)
    }

    pub fn get_component(ctx: &CommandContext, name: &str) -> Result<Component, CommandError> {
        Ok(ctx.get_argument::<Component>(name)?.clone())
    }
}

pub struct MessageArgument;

impl MessageArgument {
    pub fn message() -> Arc<dyn ArgumentType> {
        parser(MessageParser)
    }

    pub fn get_message(ctx: &CommandContext, name: &str) -> Result<Component, CommandError> {
        Ok(ctx.get_argument::<Message>(name)?.to_component(ctx.source()))
    }
}

pub struct ColorArgument;

impl ColorArgument {
    pub fn color() -> Arc<dyn ArgumentType> {
        parser(ColorParser)
    }

    pub fn get_color(ctx: &CommandContext, name: &str) -> Result<Formatting, CommandError> {
        Ok(*ctx.get_argument::<Formatting>(name)?)
    }
}

pub struct ResourceLocationArgument;

impl ResourceLocationArgument {
    pub fn id() -> Arc<dyn ArgumentType> {
        parser(KeyParser::RESOURCE_LOCATION)
    }

    pub fn get_id(ctx: &CommandContext, name: &str) -> Result<ResourceLocation, CommandError> {
        Ok(ctx.get_argument::<ResourceLocation>(name)?.clone())
    }

    pub fn get_advancement(ctx: &CommandContext, name: &str) -> Result<ResourceLocation, CommandError> {
        let id = ctx.get_argument::<ResourceLocation>(name)?;
        let registries = ctx.source().core().registries();
        Ok(keys::lookup(&registries.advancements, id, "advancement.advancementNotFound", "advancement")?)
    }

    pub fn get_recipe(
        ctx: &CommandContext,
        name: &str,
    ) -> Result<(ResourceLocation, RecipeEntry), CommandError> {
        let id = ctx.get_argument::<ResourceLocation>(name)?;
        match ctx.source().core().registries().recipes.get(id) {
            Some(entry) => Ok((id.clone(), entry.clone())),
            None => Err(CommandSyntaxError::new(
                "recipe.notFound",
                format!("Unknown recipe: {}", id),
            )
            .into()),
        }
    }
}

pub struct EntitySummonArgument;

impl EntitySummonArgument {
    pub fn id() -> Arc<dyn ArgumentType> {
        parser(KeyParser::ENTITY_SUMMON)
    }

    pub fn get_summonable_entity(
        ctx: &CommandContext,
        name: &str,
    ) -> Result<ResourceLocation, CommandError> {
        let id = ctx.get_argument::<ResourceLocation>(name)?;
        let registries = ctx.source().core().registries();
        Ok(keys::lookup(&registries.entity_types, id, "entity.notFound", "entity")?)
    }
}

pub struct ItemEnchantmentArgument;

impl ItemEnchantmentArgument {
    pub fn enchantment() -> Arc<dyn ArgumentType> {
        parser(KeyParser::ENCHANTMENT)
    }

    pub fn get_enchantment(ctx: &CommandContext, name: &str) -> Result<ResourceLocation, CommandError> {
        let id = ctx.get_argument::<ResourceLocation>(name)?;
        let registries = ctx.source().core().registries();
        Ok(keys::lookup(&registries.enchantments, id, "enchantment.unknown", "enchantment")?)
    }
}

pub struct MobEffectArgument;

impl MobEffectArgument {
    pub fn effect() -> Arc<dyn ArgumentType> {
        parser(KeyParser::MOB_EFFECT)
    }

    pub fn get_effect(ctx: &CommandContext, name: &str) -> Result<ResourceLocation, CommandError> {
        let id = ctx.get_argument::<ResourceLocation>(name)?;
        let registries = ctx.source().core().registries();
        Ok(keys::lookup(&registries.mob_effects, id, "effect.effectNotFound", "effect")?)
    }
}

pub struct ParticleArgument;

impl ParticleArgument {
    pub fn particle() -> Arc<dyn ArgumentType> {
        parser(KeyParser::PARTICLE)
    }

    pub fn get_particle(ctx: &CommandContext, name: &str) -> Result<ResourceLocation, CommandError> {
        let id = ctx.get_argument::<ResourceLocation>(name)?;
        let registries = ctx.source().core().registries();
        Ok(keys::lookup(&registries.particles, id, "particle.notFound", "particle type")?)
    }
}

pub struct DimensionTypeArgument;

impl DimensionTypeArgument {
    pub fn dimension() -> Arc<dyn ArgumentType> {
        parser(DimensionTypeParser)
    }

    pub fn get_dimension(ctx: &CommandContext, name: &str) -> Result<DimensionKind, CommandError> {
        Ok(*ctx.get_argument::<DimensionKind>(name)?)
    }
}

pub struct FunctionArgument;

impl FunctionArgument {
    pub fn functions() -> Arc<dyn ArgumentType> {
        parser(FunctionParser)
    }

    pub fn get_functions(
        ctx: &CommandContext,
        name: &str,
    ) -> Result<Vec<Arc<CustomFunction>>, CommandError> {
        let function = ctx.get_argument::<FunctionRef>(name)?;
        let library = ctx.source().server().function_library();
        Ok(resolve_functions(&library, function)?)
    }
}

pub struct ObjectiveArgument;

impl ObjectiveArgument {
    pub fn objective() -> Arc<dyn ArgumentType> {
        parser(ScoreboardNameParser::OBJECTIVE)
    }

    pub fn get_objective(ctx: &CommandContext, name: &str) -> Result<Objective, CommandError> {
        let ScoreboardName(objective) = ctx.get_argument::<ScoreboardName>(name)?;
        ctx.source()
            .core()
            .scoreboard()
            .objective(objective)
            .ok_or_else(|| {
                CommandSyntaxError::new(
                    "arguments.objective.notFound",
                    format!("Unknown scoreboard objective '{}'", objective),
                )
                .into()
            })
    }
}

pub struct ObjectiveCriteriaArgument;

impl ObjectiveCriteriaArgument {
    pub fn criteria() -> Arc<dyn ArgumentType> {
        parser(CriteriaParser)
    }

    pub fn get_criteria(ctx: &CommandContext, name: &str) -> Result<String, CommandError> {
        Ok(ctx.get_argument::<String>(name)?.clone())
    }
}

pub struct TeamArgument;

impl TeamArgument {
    pub fn team() -> Arc<dyn ArgumentType> {
        parser(ScoreboardNameParser::TEAM)
    }

    pub fn get_team(ctx: &CommandContext, name: &str) -> Result<Team, CommandError> {
        let ScoreboardName(team) = ctx.get_argument::<ScoreboardName>(name)?;
        ctx.source().core().scoreboard().team(team).ok_or_else(|| {
            CommandSyntaxError::new("team.notFound", format!("Unknown team '{}'", team)).into()
        })
    }
}

pub struct ScoreHolderArgument;

impl ScoreHolderArgument {
    pub fn score_holder() -> Arc<dyn ArgumentType> {
        parser(ScoreHolderParser { multiple: false })
    }

    pub fn score_holders() -> Arc<dyn ArgumentType> {
        parser(ScoreHolderParser { multiple: true })
    }

    pub fn get_name(ctx: &CommandContext, name: &str) -> Result<String, CommandError> {
        let mut names = Self::get_names(ctx, name)?;
        if names.len() > 1 {
            return Err(CommandSyntaxError::new(
                "argument.scoreHolder.toomany",
                "Only one score holder is allowed",
            )
            .into());
        }
        Ok(names.remove(0))
    }

    pub fn get_names(ctx: &CommandContext, name: &str) -> Result<Vec<String>, CommandError> {
        Ok(ctx.get_argument::<ScoreHolder>(name)?.names(ctx.source())?)
    }
}

pub struct ScoreboardSlotArgument;

impl ScoreboardSlotArgument {
    pub fn display_slot() -> Arc<dyn ArgumentType> {
        parser(ScoreboardSlotParser)
    }

    pub fn get_display_slot(ctx: &CommandContext, name: &str) -> Result<i32, CommandError> {
        Ok(ctx.get_argument::<DisplaySlotIndex>(name)?.0)
    }
}

pub struct OperationArgument;

impl OperationArgument {
    pub fn operation() -> Arc<dyn ArgumentType> {
        parser(OperationParser)
    }

    pub fn get_operation(ctx: &CommandContext, name: &str) -> Result<Operation, CommandError> {
        Ok(ctx.get_argument::<Operation>(name)?.clone())
    }
}

pub struct RangeArgument;

impl RangeArgument {
    pub fn int_range() -> Arc<dyn ArgumentType> {
        parser(RangeParser::<i32>::default())
    }

    pub fn float_range() -> Arc<dyn ArgumentType> {
        parser(RangeParser::<f64>::default())
    }

    pub fn get_ints(ctx: &CommandContext, name: &str) -> Result<IntBounds, CommandError> {
        let bounds = ctx.get_argument::<crate::arguments::Bounds<i32>>(name)?;
        Ok(IntBounds {
            min: bounds.min(),
            max: bounds.max(),
        })
    }

    pub fn get_floats(ctx: &CommandContext, name: &str) -> Result<FloatBounds, CommandError> {
        let bounds = ctx.get_argument::<crate::arguments::Bounds<f64>>(name)?;
        Ok(FloatBounds {
            min: bounds.min(),
            max: bounds.max(),
        })
    }
}

pub struct TimeArgument;

impl TimeArgument {
    pub fn time() -> Arc<dyn ArgumentType> {
        parser(TimeParser)
    }

    pub fn get_time(ctx: &CommandContext, name: &str) -> Result<i32, CommandError> {
        Ok(ctx.get_argument::<Ticks>(name)?.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brigadier::CommandNode;

    #[test]
    fn test_block_pos_through_dispatcher() {
        let server = DedicatedServer::start();
        let seen = Arc::new(parking_lot::Mutex::new(None));
        let sink = Arc::clone(&seen);
        server.get_commands().register(
            CommandNode::literal("mark").then(
                CommandNode::argument("pos", BlockPosArgument::block_pos()).executes(move |ctx| {
                    *sink.lock() = Some(BlockPosArgument::get_loaded_block_pos(ctx, "pos")?);
                    Ok(1)
                }),
            ),
        );
        let source = Arc::new(server.create_command_source_stack());
        server.get_commands().execute("mark 1 ~2 -3", source).unwrap();
        assert_eq!(*seen.lock(), Some(BlockPos { x: 1, y: 2, z: -3 }));
    }

    #[test]
    fn test_optional_entities_may_be_empty() {
        let server = DedicatedServer::start();
        let seen = Arc::new(parking_lot::Mutex::new(None));
        let sink = Arc::clone(&seen);
        server.get_commands().register(
            CommandNode::literal("count").then(
                CommandNode::argument("targets", EntityArgument::entities()).executes(move |ctx| {
                    let strict = EntityArgument::get_entities(ctx, "targets");
                    let optional = EntityArgument::get_optional_entities(ctx, "targets")?;
                    *sink.lock() = Some((strict.is_err(), optional.len()));
                    Ok(1)
                }),
            ),
        );
        let source = Arc::new(server.create_command_source_stack());
        server.get_commands().execute("count @e[type=pig]", source).unwrap();
        assert_eq!(*seen.lock(), Some((true, 0)));
    }

    #[test]
    fn test_swapping_resource_manager_returns_old() {
        let server = DedicatedServer::start();
        let first = server.get_resource_manager();
        let next = ReloadableResourceManager::open(server.core().resource_handles());
        let old = server.set_resource_manager(next);
        assert_eq!(old.id(), first.id());
        assert_eq!(server.core().resource_handles().open_handles(), 2);
    }
}
