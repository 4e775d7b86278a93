//! Release 1.16.1 internals
//!
//! Argument types carry their Spigot-mapped names. The dispatcher, function
//! manager and resource manager are held together in [`DataPackResources`],
//! whose fields are final once the server has started.

use crate::arguments::{
    keys, BlockInput, BlockPosParser, BlockStateParser, ColorParser, ColumnPosParser,
    ComponentParser, CompoundTag, Coordinates, CriteriaParser, Direction, DisplaySlotIndex,
    EntityParser, EntitySelector, FunctionParser, FunctionRef, GameProfile, GameProfileParser,
    ItemInput, ItemParser, KeyParser, Message, MessageParser, NbtCompoundParser, Operation,
    OperationParser, RangeParser, RotationParser, ScoreHolder, ScoreHolderParser, ScoreboardName,
    ScoreboardNameParser, ScoreboardSlotParser, SlotParser, SwizzleParser, Ticks, TimeParser,
    UuidParser, Vec2Parser, Vec3Parser,
};
use crate::brigadier::{ArgumentType, CommandContext, CommandDispatcher, CommandError, CommandSyntaxError};
use crate::chat::{Component, Formatting};
use crate::commands::{register_vanilla, resolve_functions};
use crate::functions::{CustomFunction, FunctionLibrary};
use crate::resources::ReloadableResourceManager;
use crate::scoreboard::{Objective, Team};
use crate::sealed::Final;
use crate::server::{MinecraftServer, ServerCore};
use crate::source::CommandListenerWrapper;
use crate::world::{Entity, Vec3, World};
use crate::ResourceLocation;
use std::any::Any;
use std::collections::BTreeSet;
use std::sync::Arc;
use uuid::Uuid;

pub const VERSION: &str = "1.16.1";

pub type CustomFunctionManager = FunctionLibrary;
pub type MinecraftKey = ResourceLocation;
pub type NBTTagCompound = CompoundTag;
pub type IChatBaseComponent = Component;
pub type EnumChatFormat = Formatting;
pub type ScoreboardObjective = Objective;
pub type ScoreboardTeam = Team;
pub type ArgumentPredicateItemStack = ItemInput;
pub type ArgumentTileLocation = BlockInput;

/// Everything a datapack reload replaces
pub struct DataPackResources {
    pub command_dispatcher: Final<Arc<CommandDispatcher>>,
    pub function_manager: Final<Arc<CustomFunctionManager>>,
    pub resource_manager: Final<Arc<ReloadableResourceManager>>,
    function_permission_level: i32,
}

impl DataPackResources {
    fn new(
        dispatcher: Arc<CommandDispatcher>,
        resource_manager: Arc<ReloadableResourceManager>,
        function_permission_level: i32,
    ) -> Self {
        let functions = CustomFunctionManager::new(Arc::clone(&dispatcher), function_permission_level);
        Self {
            command_dispatcher: Final::new("commandDispatcher", dispatcher),
            function_manager: Final::new("functionManager", Arc::new(functions)),
            resource_manager: Final::new("resourceManager", resource_manager),
            function_permission_level,
        }
    }

    pub fn function_permission_level(&self) -> i32 {
        self.function_permission_level
    }
}

pub struct DedicatedServer {
    core: Arc<ServerCore>,
    vanilla_command_dispatcher: Arc<CommandDispatcher>,
    data_pack_resources: DataPackResources,
}

impl DedicatedServer {
    pub fn start() -> Arc<Self> {
        let core = Arc::new(ServerCore::vanilla());
        let dispatcher = Arc::new(CommandDispatcher::new());
        register_vanilla(&dispatcher);
        let resource_manager = ReloadableResourceManager::open(core.resource_handles());
        let data_pack_resources =
            DataPackResources::new(Arc::clone(&dispatcher), resource_manager, 2);
        tracing::info!(version = VERSION, "Server started");
        Arc::new(Self {
            core,
            vanilla_command_dispatcher: dispatcher,
            data_pack_resources,
        })
    }

    /// The dispatcher plugins register their commands on
    pub fn vanilla_command_dispatcher(&self) -> &Arc<CommandDispatcher> {
        &self.vanilla_command_dispatcher
    }

    pub fn data_pack_resources(&self) -> &DataPackResources {
        &self.data_pack_resources
    }

    pub fn get_server_command_listener(self: &Arc<Self>) -> CommandListenerWrapper {
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
        self.data_pack_resources.command_dispatcher.get()
    }

    fn function_library(&self) -> Arc<FunctionLibrary> {
        self.data_pack_resources.function_manager.get()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPosition {
    x: i32,
    y: i32,
    z: i32,
}

impl BlockPosition {
    pub fn get_x(&self) -> i32 {
        self.x
    }

    pub fn get_y(&self) -> i32 {
        self.y
    }

    pub fn get_z(&self) -> i32 {
        self.z
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2F {
    pub i: f32,
    pub j: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnumAxis {
    X,
    Y,
    Z,
}

pub mod criterion_condition_value {
    use crate::arguments::Bounds;

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct IntegerRange(pub(super) Bounds<i32>);

    impl IntegerRange {
        pub fn get_min(&self) -> Option<i32> {
            self.0.min()
        }

        pub fn get_max(&self) -> Option<i32> {
            self.0.max()
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct FloatRange(pub(super) Bounds<f32>);

    impl FloatRange {
        pub fn get_min(&self) -> Option<f32> {
            self.0.min()
        }

        pub fn get_max(&self) -> Option<f32> {
            self.0.max()
        }
    }
}

/// A recipe with the key it is registered under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IRecipe {
    pub key: MinecraftKey,
    pub result: MinecraftKey,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advancement {
    pub key: MinecraftKey,
}

fn parser(parser: impl ArgumentType + 'static) -> Arc<dyn ArgumentType> {
    Arc::new(parser)
}

fn registered(
    ctx: &CommandContext,
    name: &str,
    registry: impl Fn(&crate::registry::Registries) -> &crate::registry::Registry,
    error_key: &'static str,
    what: &str,
) -> Result<MinecraftKey, CommandError> {
    let id = ctx.get_argument::<MinecraftKey>(name)?;
    let registries = ctx.source().core().registries();
    Ok(keys::lookup(registry(registries), id, error_key, what)?)
}

pub struct ArgumentPosition;

impl ArgumentPosition {
    pub fn block_pos() -> Arc<dyn ArgumentType> {
        parser(BlockPosParser)
    }

    pub fn get_block_position(ctx: &CommandContext, name: &str) -> Result<BlockPosition, CommandError> {
        let (x, y, z) = ctx.get_argument::<Coordinates>(name)?.block_pos(ctx.source());
        Ok(BlockPosition { x, y, z })
    }
}

pub struct ArgumentVec3;

impl ArgumentVec3 {
    pub fn vec3(center_correct: bool) -> Arc<dyn ArgumentType> {
        parser(Vec3Parser { center_correct })
    }

    pub fn get_vec3(ctx: &CommandContext, name: &str) -> Result<Vec3, CommandError> {
        Ok(ctx.get_argument::<Coordinates>(name)?.position(ctx.source()))
    }
}

pub struct ArgumentVec2I;

impl ArgumentVec2I {
    pub fn column_pos() -> Arc<dyn ArgumentType> {
        parser(ColumnPosParser)
    }

    /// Column as a block position with `y` of zero
    pub fn get_column(ctx: &CommandContext, name: &str) -> Result<BlockPosition, CommandError> {
        let (x, _, z) = ctx.get_argument::<Coordinates>(name)?.block_pos(ctx.source());
        Ok(BlockPosition { x, y: 0, z })
    }
}

pub struct ArgumentVec2;

impl ArgumentVec2 {
    pub fn vec2() -> Arc<dyn ArgumentType> {
        parser(Vec2Parser {
            center_correct: true,
        })
    }

    /// `x` in `i`, `z` in `j`
    pub fn get_vec2(ctx: &CommandContext, name: &str) -> Result<Vec2F, CommandError> {
        let pos = ctx.get_argument::<Coordinates>(name)?.position(ctx.source());
        Ok(Vec2F {
            i: pos.x as f32,
            j: pos.z as f32,
        })
    }
}

pub struct ArgumentRotation;

impl ArgumentRotation {
    pub fn rotation() -> Arc<dyn ArgumentType> {
        parser(RotationParser)
    }

    /// Yaw in `i`, pitch in `j`
    pub fn get_rotation(ctx: &CommandContext, name: &str) -> Result<Vec2F, CommandError> {
        let rotation = ctx.get_argument::<Coordinates>(name)?.rotation(ctx.source());
        Ok(Vec2F {
            i: rotation.y,
            j: rotation.x,
        })
    }
}

pub struct ArgumentRotationAxis;

impl ArgumentRotationAxis {
    pub fn axes() -> Arc<dyn ArgumentType> {
        parser(SwizzleParser)
    }

    pub fn get_axes(ctx: &CommandContext, name: &str) -> Result<BTreeSet<EnumAxis>, CommandError> {
        Ok(ctx
            .get_argument::<BTreeSet<Direction>>(name)?
            .iter()
            .map(|d| match d {
                Direction::X => EnumAxis::X,
                Direction::Y => EnumAxis::Y,
                Direction::Z => EnumAxis::Z,
            })
            .collect())
    }
}

pub struct ArgumentEntity;

impl ArgumentEntity {
    pub fn single_entity() -> Arc<dyn ArgumentType> {
        parser(EntityParser {
            single: true,
            players_only: false,
        })
    }

    pub fn multiple_entities() -> Arc<dyn ArgumentType> {
        parser(EntityParser {
            single: false,
            players_only: false,
        })
    }

    pub fn single_player() -> Arc<dyn ArgumentType> {
        parser(EntityParser {
            single: true,
            players_only: true,
        })
    }

    pub fn multiple_players() -> Arc<dyn ArgumentType> {
        parser(EntityParser {
            single: false,
            players_only: true,
        })
    }

    pub fn get_entity(ctx: &CommandContext, name: &str) -> Result<Entity, CommandError> {
        let selector = ctx.get_argument::<EntitySelector>(name)?;
        Ok(selector.find_single_entity(ctx.source())?)
    }

    /// Fails with `argument.entity.notfound.entity` when nothing matches
    pub fn get_entities(ctx: &CommandContext, name: &str) -> Result<Vec<Entity>, CommandError> {
        let found = ctx.get_argument::<EntitySelector>(name)?.find_entities(ctx.source());
        if found.is_empty() {
            return Err(crate::arguments::selector::no_entities().into());
        }
        Ok(found)
    }

    pub fn get_player(ctx: &CommandContext, name: &str) -> Result<Entity, CommandError> {
        let selector = ctx.get_argument::<EntitySelector>(name)?;
        Ok(selector.find_single_player(ctx.source())?)
    }

    /// Fails with `argument.entity.notfound.player` when nothing matches
    pub fn get_players(ctx: &CommandContext, name: &str) -> Result<Vec<Entity>, CommandError> {
        let found = ctx.get_argument::<EntitySelector>(name)?.find_players(ctx.source());
        if found.is_empty() {
            return Err(crate::arguments::selector::no_players().into());
        }
        Ok(found)
    }
}

pub struct ArgumentProfile;

impl ArgumentProfile {
    pub fn game_profile() -> Arc<dyn ArgumentType> {
        parser(GameProfileParser)
    }

    pub fn get_profiles(ctx: &CommandContext, name: &str) -> Result<Vec<GameProfile>, CommandError> {
        let selector = ctx.get_argument::<EntitySelector>(name)?;
        Ok(selector.game_profiles(ctx.source())?)
    }
}

pub struct ArgumentItemStack;

impl ArgumentItemStack {
    pub fn item_stack() -> Arc<dyn ArgumentType> {
        parser(ItemParser)
    }

    pub fn get_item(ctx: &CommandContext, name: &str) -> Result<ArgumentPredicateItemStack, CommandError> {
        let input = ctx.get_argument::<ItemInput>(name)?;
        input.validate(ctx.source().core().registries())?;
        Ok(input.clone())
    }
}

pub struct ArgumentTile;

impl ArgumentTile {
    pub fn block_state() -> Arc<dyn ArgumentType> {
        parser(BlockStateParser)
    }

    pub fn get_block(ctx: &CommandContext, name: &str) -> Result<ArgumentTileLocation, CommandError> {
        let input = ctx.get_argument::<BlockInput>(name)?;
        input.validate(ctx.source().core().registries())?;
        Ok(input.clone())
    }
}

pub struct ArgumentInventorySlot;

impl ArgumentInventorySlot {
    pub fn slot() -> Arc<dyn ArgumentType> {
        parser(SlotParser)
    }

    pub fn get_slot(ctx: &CommandContext, name: &str) -> Result<i32, CommandError> {
        Ok(*ctx.get_argument::<i32>(name)?)
    }
}

pub struct ArgumentNBTTag;

impl ArgumentNBTTag {
    pub fn compound() -> Arc<dyn ArgumentType> {
        parser(NbtCompoundParser)
    }

    pub fn get_compound(ctx: &CommandContext, name: &str) -> Result<NBTTagCompound, CommandError> {
        Ok(ctx.get_argument::<CompoundTag>(name)?.clone())
    }
}

pub struct ArgumentChatComponent;

impl ArgumentChatComponent {
    pub fn chat_component() -> Arc<dyn ArgumentType> {
        parser(ComponentParser)
    }

    pub fn get_component(ctx: &CommandContext, name: &str) -> Result<IChatBaseComponent, CommandError> {
        Ok(ctx.get_argument::<Component>(name)?.clone())
    }
}

pub struct ArgumentChat;

impl ArgumentChat {
    pub fn chat() -> Arc<dyn ArgumentType> {
        parser(MessageParser)
    }

    pub fn get_chat(ctx: &CommandContext, name: &str) -> Result<IChatBaseComponent, CommandError> {
        Ok(ctx.get_argument::<Message>(name)?.to_component(ctx.source()))
    }
}

pub struct ArgumentChatFormat;

impl ArgumentChatFormat {
    pub fn chat_format() -> Arc<dyn ArgumentType> {
        parser(ColorParser)
    }

    pub fn get_format(ctx: &CommandContext, name: &str) -> Result<EnumChatFormat, CommandError> {
        Ok(*ctx.get_argument::<Formatting>(name)?)
    }
}

pub struct ArgumentMinecraftKeyRegistered;

impl ArgumentMinecraftKeyRegistered {
    pub fn key() -> Arc<dyn ArgumentType> {
        parser(KeyParser::RESOURCE_LOCATION)
    }

    pub fn get_key(ctx: &CommandContext, name: &str) -> Result<MinecraftKey, CommandError> {
        Ok(ctx.get_argument::<MinecraftKey>(name)?.clone())
    }

    pub fn get_advancement(ctx: &CommandContext, name: &str) -> Result<Advancement, CommandError> {
        let key = registered(ctx, name, |r| &r.advancements, "advancement.advancementNotFound", "advancement")?;
        Ok(Advancement { key })
    }

    pub fn get_recipe(ctx: &CommandContext, name: &str) -> Result<IRecipe, CommandError> {
        let key = ctx.get_argument::<MinecraftKey>(name)?;
        let entry = ctx
            .source()
            .core()
            .registries()
            .recipes
            .get(key)
            .ok_or_else(|| CommandSyntaxError::new("recipe.notFound", format!("Unknown recipe: {}", key)))?;
        Ok(IRecipe {
            key: key.clone(),
            result: entry.result.clone(),
            count: entry.count,
        })
    }

    pub fn get_sound(ctx: &CommandContext, name: &str) -> Result<MinecraftKey, CommandError> {
        registered(ctx, name, |r| &r.sounds, "argument.id.unknown", "sound")
    }

    pub fn get_biome(ctx: &CommandContext, name: &str) -> Result<MinecraftKey, CommandError> {
        registered(ctx, name, |r| &r.biomes, "argument.id.unknown", "biome")
    }

    pub fn get_loot_table(ctx: &CommandContext, name: &str) -> Result<MinecraftKey, CommandError> {
        registered(ctx, name, |r| &r.loot_tables, "argument.id.unknown", "loot table")
    }
}

pub struct ArgumentEntitySummon;

impl ArgumentEntitySummon {
    pub fn entity_type() -> Arc<dyn ArgumentType> {
        parser(KeyParser::ENTITY_SUMMON)
    }

    pub fn get_entity_type(ctx: &CommandContext, name: &str) -> Result<MinecraftKey, CommandError> {
        registered(ctx, name, |r| &r.entity_types, "entity.notFound", "entity")
    }
}

pub struct ArgumentEnchantment;

impl ArgumentEnchantment {
    pub fn enchantment() -> Arc<dyn ArgumentType> {
        parser(KeyParser::ENCHANTMENT)
    }

    pub fn get_enchantment(ctx: &CommandContext, name: &str) -> Result<MinecraftKey, CommandError> {
        registered(ctx, name, |r| &r.enchantments, "enchantment.unknown", "enchantment")
    }
}

pub struct ArgumentMobEffect;

impl ArgumentMobEffect {
    pub fn mob_effect() -> Arc<dyn ArgumentType> {
        parser(KeyParser::MOB_EFFECT)
    }

    pub fn get_effect(ctx: &CommandContext, name: &str) -> Result<MinecraftKey, CommandError> {
        registered(ctx, name, |r| &r.mob_effects, "effect.effectNotFound", "effect")
    }
}

pub struct ArgumentParticle;

impl ArgumentParticle {
    pub fn particle() -> Arc<dyn ArgumentType> {
        parser(KeyParser::PARTICLE)
    }

    pub fn get_particle(ctx: &CommandContext, name: &str) -> Result<MinecraftKey, CommandError> {
        registered(ctx, name, |r| &r.particles, "particle.notFound", "particle type")
    }
}

pub struct ArgumentDimension;

impl ArgumentDimension {
    pub fn dimension() -> Arc<dyn ArgumentType> {
        parser(KeyParser::DIMENSION)
    }

    /// The loaded world for the parsed dimension key
    pub fn get_world(ctx: &CommandContext, name: &str) -> Result<World, CommandError> {
        let key = ctx.get_argument::<MinecraftKey>(name)?;
        ctx.source()
            .core()
            .world_by_dimension(key)
            .cloned()
            .ok_or_else(|| {
                CommandSyntaxError::new(
                    "argument.dimension.invalid",
                    format!("Unknown dimension '{}'", key),
                )
                .into()
            })
    }
}

pub struct ArgumentTag;

impl ArgumentTag {
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

pub struct ArgumentScoreboardObjective;

impl ArgumentScoreboardObjective {
    pub fn objective() -> Arc<dyn ArgumentType> {
        parser(ScoreboardNameParser::OBJECTIVE)
    }

    pub fn get_objective(ctx: &CommandContext, name: &str) -> Result<ScoreboardObjective, CommandError> {
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

pub struct ArgumentScoreboardCriteria;

impl ArgumentScoreboardCriteria {
    pub fn criteria() -> Arc<dyn ArgumentType> {
        parser(CriteriaParser)
    }

    pub fn get_criteria(ctx: &CommandContext, name: &str) -> Result<String, CommandError> {
        Ok(ctx.get_argument::<String>(name)?.clone())
    }
}

pub struct ArgumentScoreboardTeam;

impl ArgumentScoreboardTeam {
    pub fn team() -> Arc<dyn ArgumentType> {
        parser(ScoreboardNameParser::TEAM)
    }

    pub fn get_team(ctx: &CommandContext, name: &str) -> Result<ScoreboardTeam, CommandError> {
        let ScoreboardName(team) = ctx.get_argument::<ScoreboardName>(name)?;
        ctx.source().core().scoreboard().team(team).ok_or_else(|| {
            CommandSyntaxError::new("team.notFound", format!("Unknown team '{}'", team)).into()
        })
    }
}

pub struct ArgumentScoreholder;

impl ArgumentScoreholder {
    pub fn single() -> Arc<dyn ArgumentType> {
        parser(ScoreHolderParser { multiple: false })
    }

    pub fn multiple() -> Arc<dyn ArgumentType> {
        parser(ScoreHolderParser { multiple: true })
    }

    pub fn get_name(ctx: &CommandContext, name: &str) -> Result<String, CommandError> {
        let names = Self::get_names(ctx, name)?;
        match <[String; 1]>::try_from(names) {
            Ok([single]) => Ok(single),
            Err(_) => Err(CommandSyntaxError::new(
                "argument.scoreHolder.toomany",
                "Only one score holder is allowed",
            )
            .into()),
        }
    }

    pub fn get_names(ctx: &CommandContext, name: &str) -> Result<Vec<String>, CommandError> {
        Ok(ctx.get_argument::<ScoreHolder>(name)?.names(ctx.source())?)
    }
}

pub struct ArgumentScoreboardSlot;

impl ArgumentScoreboardSlot {
    pub fn slot() -> Arc<dyn ArgumentType> {
        parser(ScoreboardSlotParser)
    }

    pub fn get_slot(ctx: &CommandContext, name: &str) -> Result<i32, CommandError> {
        Ok(ctx.get_argument::<DisplaySlotIndex>(name)?.0)
    }
}

pub struct ArgumentMathOperation;

impl ArgumentMathOperation {
    pub fn operation() -> Arc<dyn ArgumentType> {
        parser(OperationParser)
    }

    pub fn get_operation(ctx: &CommandContext, name: &str) -> Result<Operation, CommandError> {
        Ok(ctx.get_argument::<Operation>(name)?.clone())
    }
}

pub struct ArgumentCriterionValue;

impl ArgumentCriterionValue {
    pub fn ints() -> Arc<dyn ArgumentType> {
        parser(RangeParser::<i32>::default())
    }

    pub fn floats() -> Arc<dyn ArgumentType> {
        parser(RangeParser::<f32>::default())
    }

    pub fn get_ints(
        ctx: &CommandContext,
        name: &str,
    ) -> Result<criterion_condition_value::IntegerRange, CommandError> {
        let bounds = ctx.get_argument::<crate::arguments::Bounds<i32>>(name)?;
        Ok(criterion_condition_value::IntegerRange(*bounds))
    }

    pub fn get_floats(
        ctx: &CommandContext,
        name: &str,
    ) -> Result<criterion_condition_value::FloatRange, CommandError> {
        let bounds = ctx.get_argument::<crate::arguments::Bounds<f32>>(name)?;
        Ok(criterion_condition_value::FloatRange(*bounds))
    }
}

pub struct ArgumentTime;

impl ArgumentTime {
    pub fn time() -> Arc<dyn ArgumentType> {
        parser(TimeParser)
    }

    pub fn get_ticks(ctx: &CommandContext, name: &str) -> Result<i32, CommandError> {
        Ok(ctx.get_argument::<Ticks>(name)?.0)
    }
}

pub struct ArgumentUUID;

impl ArgumentUUID {
    pub fn uuid() -> Arc<dyn ArgumentType> {
        parser(UuidParser)
    }

    pub fn get_uuid(ctx: &CommandContext, name: &str) -> Result<Uuid, CommandError> {
        Ok(*ctx.get_argument::<Uuid>(name)?)
    }
}
