//! Adapter for release 1.15.2
//!
//! Multi-target selectors read through the `get_optional_*` getters, which
//! already return an empty list when nothing matches. The function data and
//! resource manager are plain fields on the server, so a reload swaps them
//! without touching any seal.

use crate::adapter::{LiveState, NativeParser, VersionAdapter};
use crate::classify::classify_operation;
use crate::convert;
use crate::error::{AdapterError, ExtractError, ReloadError};
use crate::reload::{load_packs, Committed, DatapackReload, Patched};
use crate::suggestions::host_candidates;
use async_trait::async_trait;
use cmdapi_wrappers::{
    ArgumentKind, ArgumentValue, Axis, BlockData, ChatColor, ChatComponent, EntitySelector,
    Environment, FloatRange, FunctionWrapper, IntegerRange, ItemSlot, ItemStack, Location,
    Location2D, LocationType, MathOperation, NamespacedKey, NbtCompound, ParseFailure, PlayerRef,
    Recipe, Rotation, ScoreHolderType, ScoreboardSlot, Sender, SuggestionProviders,
};
use mchost::arguments::{keys, Direction};
use mchost::brigadier::{CommandContext, CommandDispatcher};
use mchost::registry::Registry;
use mchost::resources::{DataPackContents, ReloadableResourceManager};
use mchost::scoreboard::ScoreboardScore;
use mchost::v1_15_r1::{
    BlockPosArgument, BlockStateArgument, ColorArgument, ColumnPosArgument, CompoundTagArgument,
    ComponentArgument, CustomFunctionData, DedicatedServer, DimensionTypeArgument, EntityArgument,
    EntitySummonArgument, FunctionArgument, GameProfileArgument, ItemArgument,
    ItemEnchantmentArgument, MessageArgument, MobEffectArgument, ObjectiveArgument,
    ObjectiveCriteriaArgument, OperationArgument, ParticleArgument, RangeArgument,
    ResourceLocationArgument, RotationArgument, ScoreHolderArgument, ScoreboardSlotArgument,
    SlotArgument, SwizzleArgument, TeamArgument, TimeArgument, Vec2Argument, Vec3Argument,
    VERSION,
};
use mchost::{CommandListenerWrapper, MinecraftServer, ResourceLocation};
use std::collections::BTreeSet;
use std::sync::Arc;

pub const RELEASE: &str = "1_15_R1";

pub const COMPATIBLE_VERSIONS: &[&str] = &[VERSION];

fn server_of(server: &dyn MinecraftServer) -> Result<&DedicatedServer, AdapterError> {
    server
        .as_any()
        .downcast_ref::<DedicatedServer>()
        .ok_or(AdapterError::WrongServer {
            expected: VERSION,
            actual: server.version(),
        })
}

/// Look a parsed id up in one of the source's registries
fn registered(
    ctx: &CommandContext,
    key: &str,
    registry: impl Fn(&mchost::registry::Registries) -> &Registry,
    what: &str,
) -> Result<NamespacedKey, ExtractError> {
    let id = ResourceLocationArgument::get_id(ctx, key)?;
    let registries = ctx.source().core().registries();
    let found = keys::lookup(registry(registries), &id, "argument.id.unknown", what)?;
    Ok(convert::key(&found))
}

#[derive(Debug, Default)]
pub struct Adapter;

impl Adapter {
    pub fn new() -> Self {
        Self
    }

    pub fn shared() -> Arc<dyn VersionAdapter> {
        Arc::new(Self::new())
    }
}

impl VersionAdapter for Adapter {
    fn release(&self) -> &'static str {
        RELEASE
    }

    fn compatible_versions(&self) -> &'static [&'static str] {
        COMPATIBLE_VERSIONS
    }

    fn supports(&self, kind: ArgumentKind) -> bool {
        kind != ArgumentKind::Uuid
    }

    fn advancement(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Advancement, ResourceLocationArgument::id())
    }

    fn axis(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Axis, SwizzleArgument::swizzle())
    }

    fn biome(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Biome, ResourceLocationArgument::id())
    }

    fn block_state(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::BlockState, BlockStateArgument::block())
    }

    fn chat(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Chat, MessageArgument::message())
    }

    fn chat_color(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::ChatColor, ColorArgument::color())
    }

    fn chat_component(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::ChatComponent, ComponentArgument::text_component())
    }

    fn dimension(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Dimension, DimensionTypeArgument::dimension())
    }

    fn enchantment(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Enchantment, ItemEnchantmentArgument::enchantment())
    }

    fn entity_selector(&self, selector: EntitySelector) -> NativeParser {
        let parser = match selector {
            EntitySelector::OneEntity => EntityArgument::entity(),
            EntitySelector::ManyEntities => EntityArgument::entities(),
            EntitySelector::OnePlayer => EntityArgument::player(),
            EntitySelector::ManyPlayers => EntityArgument::players(),
        };
        NativeParser::new(ArgumentKind::EntitySelector(selector), parser)
    }

    fn entity_type(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::EntityType, EntitySummonArgument::id())
    }

    fn float_range(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::FloatRange, RangeArgument::float_range())
    }

    fn function(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Function, FunctionArgument::functions())
    }

    fn int_range(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::IntRange, RangeArgument::int_range())
    }

    fn item_slot(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::ItemSlot, SlotArgument::slot())
    }

    fn item_stack(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::ItemStack, ItemArgument::item())
    }

    fn location(&self, ty: LocationType) -> NativeParser {
        let parser = match ty {
            LocationType::BlockPosition => BlockPosArgument::block_pos(),
            LocationType::PrecisePosition => Vec3Argument::vec3(true),
        };
        NativeParser::new(ArgumentKind::Location(ty), parser)
    }

    fn location_2d(&self, ty: LocationType) -> NativeParser {
        let parser = match ty {
            LocationType::BlockPosition => ColumnPosArgument::column_pos(),
            LocationType::PrecisePosition => Vec2Argument::vec2(),
        };
        NativeParser::new(ArgumentKind::Location2D(ty), parser)
    }

    fn loot_table(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::LootTable, ResourceLocationArgument::id())
    }

    fn math_operation(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::MathOperation, OperationArgument::operation())
    }

    fn namespaced_key(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::NamespacedKey, ResourceLocationArgument::id())
    }

    fn nbt_compound(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::NbtCompound, CompoundTagArgument::compound_tag())
    }

    fn objective(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Objective, ObjectiveArgument::objective())
    }

    fn objective_criteria(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::ObjectiveCriteria, ObjectiveCriteriaArgument::criteria())
    }

    fn particle(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Particle, ParticleArgument::particle())
    }

    fn player(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Player, GameProfileArgument::game_profile())
    }

    fn potion_effect(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::PotionEffect, MobEffectArgument::effect())
    }

    fn recipe(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Recipe, ResourceLocationArgument::id())
    }

    fn rotation(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Rotation, RotationArgument::rotation())
    }

    fn score_holder(&self, ty: ScoreHolderType) -> NativeParser {
        let parser = match ty {
            ScoreHolderType::Single => ScoreHolderArgument::score_holder(),
            ScoreHolderType::Multiple => ScoreHolderArgument::score_holders(),
        };
        NativeParser::new(ArgumentKind::ScoreHolder(ty), parser)
    }

    fn scoreboard_slot(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::ScoreboardSlot, ScoreboardSlotArgument::display_slot())
    }

    fn sound(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Sound, ResourceLocationArgument::id())
    }

    fn team(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Team, TeamArgument::team())
    }

    fn time(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Time, TimeArgument::time())
    }

    fn get_advancement(&self, ctx: &CommandContext, key: &str) -> Result<NamespacedKey, ExtractError> {
        Ok(convert::key(&ResourceLocationArgument::get_advancement(ctx, key)?))
    }

    fn get_axis(&self, ctx: &CommandContext, key: &str) -> Result<BTreeSet<Axis>, ExtractError> {
        let swizzle = SwizzleArgument::get_swizzle(ctx, key)?;
        Ok(Axis::set_from(swizzle.into_iter().map(|d| match d {
            Direction::X => Axis::X,
            Direction::Y => Axis::Y,
            Direction::Z => Axis::Z,
        })))
    }

    fn get_biome(&self, ctx: &CommandContext, key: &str) -> Result<NamespacedKey, ExtractError> {
        registered(ctx, key, |r| &r.biomes, "biome")
    }

    fn get_block_state(&self, ctx: &CommandContext, key: &str) -> Result<BlockData, ExtractError> {
        Ok(convert::block_data(&BlockStateArgument::get_block(ctx, key)?))
    }

    fn get_chat(&self, ctx: &CommandContext, key: &str) -> Result<ChatComponent, ExtractError> {
        Ok(convert::chat_component(&MessageArgument::get_message(ctx, key)?))
    }

    fn get_chat_color(&self, ctx: &CommandContext, key: &str) -> Result<ChatColor, ExtractError> {
        Ok(convert::chat_color(ColorArgument::get_color(ctx, key)?)?)
    }

    fn get_chat_component(&self, ctx: &CommandContext, key: &str) -> Result<ChatComponent, ExtractError> {
        Ok(convert::chat_component(&ComponentArgument::get_component(ctx, key)?))
    }

    fn get_dimension(&self, ctx: &CommandContext, key: &str) -> Result<Environment, ExtractError> {
        Ok(convert::environment(DimensionTypeArgument::get_dimension(ctx, key)?))
    }

    fn get_enchantment(&self, ctx: &CommandContext, key: &str) -> Result<NamespacedKey, ExtractError> {
        Ok(convert::key(&ItemEnchantmentArgument::get_enchantment(ctx, key)?))
    }

    fn get_entity_selector(
        &self,
        ctx: &CommandContext,
        key: &str,
        selector: EntitySelector,
    ) -> Result<ArgumentValue, ExtractError> {
        Ok(match selector {
            EntitySelector::OneEntity => {
                ArgumentValue::Entity(convert::entity_ref(&EntityArgument::get_entity(ctx, key)?))
            }
            EntitySelector::ManyEntities => ArgumentValue::Entities(
                EntityArgument::get_optional_entities(ctx, key)?
                    .iter()
                    .map(convert::entity_ref)
                    .collect(),
            ),
            EntitySelector::OnePlayer => {
                ArgumentValue::Player(convert::player_ref(&EntityArgument::get_player(ctx, key)?))
            }
            EntitySelector::ManyPlayers => ArgumentValue::Players(
                EntityArgument::get_optional_players(ctx, key)?
                    .iter()
                    .map(convert::player_ref)
                    .collect(),
            ),
        })
    }

    fn get_entity_type(&self, ctx: &CommandContext, key: &str) -> Result<NamespacedKey, ExtractError> {
        Ok(convert::key(&EntitySummonArgument::get_summonable_entity(ctx, key)?))
    }

    fn get_float_range(&self, ctx: &CommandContext, key: &str) -> Result<FloatRange, ExtractError> {
        let bounds = RangeArgument::get_floats(ctx, key)?;
        Ok(FloatRange::new(
            bounds.min.map_or(-f32::MAX, |v| v as f32),
            bounds.max.map_or(f32::MAX, |v| v as f32),
        ))
    }

    fn get_function(&self, ctx: &CommandContext, key: &str) -> Result<Vec<FunctionWrapper>, ExtractError> {
        let resolved = FunctionArgument::get_functions(ctx, key)?;
        Ok(convert::functions(resolved, ctx.source()))
    }

    fn get_int_range(&self, ctx: &CommandContext, key: &str) -> Result<IntegerRange, ExtractError> {
        let bounds = RangeArgument::get_ints(ctx, key)?;
        Ok(IntegerRange::new(
            bounds.min.unwrap_or(i32::MIN),
            bounds.max.unwrap_or(i32::MAX),
        ))
    }

    fn get_item_slot(&self, ctx: &CommandContext, key: &str) -> Result<ItemSlot, ExtractError> {
        Ok(ItemSlot::from_id(SlotArgument::get_slot(ctx, key)?))
    }

    fn get_item_stack(&self, ctx: &CommandContext, key: &str) -> Result<ItemStack, ExtractError> {
        Ok(convert::item_stack(&ItemArgument::get_item(ctx, key)?))
    }

    fn get_location(
        &self,
        ctx: &CommandContext,
        key: &str,
        ty: LocationType,
    ) -> Result<Location, ExtractError> {
        let world = ctx.source().world();
        Ok(match ty {
            LocationType::BlockPosition => {
                let pos = BlockPosArgument::get_loaded_block_pos(ctx, key)?;
                Location::new(world, pos.x as f64, pos.y as f64, pos.z as f64)
            }
            LocationType::PrecisePosition => {
                let pos = Vec3Argument::get_vec3(ctx, key)?;
                Location::new(world, pos.x, pos.y, pos.z)
            }
        })
    }

    fn get_location_2d(
        &self,
        ctx: &CommandContext,
        key: &str,
        ty: LocationType,
    ) -> Result<Location2D, ExtractError> {
        let world = ctx.source().world();
        Ok(match ty {
            LocationType::BlockPosition => {
                let pos = ColumnPosArgument::get_column_pos(ctx, key)?;
                Location2D::new(world, pos.x as f64, pos.z as f64)
            }
            LocationType::PrecisePosition => {
                let pos = Vec2Argument::get_vec2(ctx, key)?;
                Location2D::new(world, pos.x as f64, pos.y as f64)
            }
        })
    }

    fn get_loot_table(&self, ctx: &CommandContext, key: &str) -> Result<NamespacedKey, ExtractError> {
        registered(ctx, key, |r| &r.loot_tables, "loot table")
    }

    fn get_math_operation(&self, ctx: &CommandContext, key: &str) -> Result<MathOperation, ExtractError> {
        let operation = OperationArgument::get_operation(ctx, key)?;
        Ok(classify_operation(
            ScoreboardScore::new,
            |l: &mut ScoreboardScore, r: &mut ScoreboardScore| operation.apply(l, r),
        )?)
    }

    fn get_namespaced_key(&self, ctx: &CommandContext, key: &str) -> Result<NamespacedKey, ExtractError> {
        Ok(convert::key(&ResourceLocationArgument::get_id(ctx, key)?))
    }

    fn get_nbt_compound(&self, ctx: &CommandContext, key: &str) -> Result<NbtCompound, ExtractError> {
        Ok(convert::nbt(&CompoundTagArgument::get_compound_tag(ctx, key)?))
    }

    fn get_objective(&self, ctx: &CommandContext, key: &str) -> Result<String, ExtractError> {
        Ok(ObjectiveArgument::get_objective(ctx, key)?.name)
    }

    fn get_objective_criteria(&self, ctx: &CommandContext, key: &str) -> Result<String, ExtractError> {
        Ok(ObjectiveCriteriaArgument::get_criteria(ctx, key)?)
    }

    fn get_particle(&self, ctx: &CommandContext, key: &str) -> Result<NamespacedKey, ExtractError> {
        Ok(convert::key(&ParticleArgument::get_particle(ctx, key)?))
    }

    fn get_player(&self, ctx: &CommandContext, key: &str) -> Result<PlayerRef, ExtractError> {
        let profiles = GameProfileArgument::get_game_profiles(ctx, key)?;
        Ok(convert::first_profile(&profiles)?)
    }

    fn get_potion_effect(&self, ctx: &CommandContext, key: &str) -> Result<NamespacedKey, ExtractError> {
        Ok(convert::key(&MobEffectArgument::get_effect(ctx, key)?))
    }

    fn get_recipe(&self, ctx: &CommandContext, key: &str) -> Result<Recipe, ExtractError> {
        let (id, entry) = ResourceLocationArgument::get_recipe(ctx, key)?;
        Ok(Recipe {
            key: convert::key(&id),
            result: ItemStack::new(convert::key(&entry.result), entry.count),
        })
    }

    fn get_rotation(&self, ctx: &CommandContext, key: &str) -> Result<Rotation, ExtractError> {
        let rotation = RotationArgument::get_rotation(ctx, key)?;
        Ok(Rotation::new(rotation.y, rotation.x))
    }

    fn get_score_holder(
        &self,
        ctx: &CommandContext,
        key: &str,
        ty: ScoreHolderType,
    ) -> Result<ArgumentValue, ExtractError> {
        Ok(match ty {
            ScoreHolderType::Single => {
                ArgumentValue::ScoreHolder(ScoreHolderArgument::get_name(ctx, key)?)
            }
            ScoreHolderType::Multiple => {
                ArgumentValue::ScoreHolders(ScoreHolderArgument::get_names(ctx, key)?)
            }
        })
    }

    fn get_scoreboard_slot(&self, ctx: &CommandContext, key: &str) -> Result<ScoreboardSlot, ExtractError> {
        let index = ScoreboardSlotArgument::get_display_slot(ctx, key)?;
        ScoreboardSlot::from_index(index)
            .ok_or_else(|| AdapterError::Unmapped(format!("display slot {}", index)).into())
    }

    fn get_sound(&self, ctx: &CommandContext, key: &str) -> Result<NamespacedKey, ExtractError> {
        registered(ctx, key, |r| &r.sounds, "sound")
    }

    fn get_team(&self, ctx: &CommandContext, key: &str) -> Result<String, ExtractError> {
        Ok(TeamArgument::get_team(ctx, key)?.name)
    }

    fn get_time(&self, ctx: &CommandContext, key: &str) -> Result<i32, ExtractError> {
        Ok(TimeArgument::get_time(ctx, key)?)
    }

    fn brigadier_dispatcher(
        &self,
        server: &dyn MinecraftServer,
    ) -> Result<Arc<CommandDispatcher>, AdapterError> {
        Ok(Arc::clone(server_of(server)?.get_commands()))
    }

    fn live_state(&self, server: &dyn MinecraftServer) -> Result<LiveState, AdapterError> {
        let server = server_of(server)?;
        Ok(LiveState {
            dispatcher: Arc::clone(server.get_commands()),
            functions: server.get_function_data(),
        })
    }

    fn reload(
        &self,
        server: Arc<dyn MinecraftServer>,
    ) -> Result<Box<dyn DatapackReload>, AdapterError> {
        server_of(server.as_ref())?;
        Ok(Box::new(Reload::new(server)))
    }

    fn completion_candidates(
        &self,
        provider: SuggestionProviders,
        ctx: &CommandContext,
    ) -> Vec<String> {
        let server = ctx.source().server();
        match server_of(server.as_ref()) {
            Ok(host) => host_candidates(provider, host.core().registries(), &host.get_function_data()),
            Err(e) => {
                tracing::warn!(release = RELEASE, error = %e, "No completions");
                Vec::new()
            }
        }
    }

    fn sender_for_command(&self, ctx: &CommandContext) -> Result<Sender, AdapterError> {
        server_of(ctx.source().server().as_ref())?;
        Ok(convert::sender(ctx.source()))
    }

    fn validate_namespaced_key(&self, text: &str) -> Result<NamespacedKey, ParseFailure> {
        text.parse::<ResourceLocation>()
            .map(|location| convert::key(&location))
            .map_err(|e| ParseFailure::new(e.to_string()))
    }
}

/// Rebuilds `CustomFunctionData` and swaps it in with a new resource manager
pub struct Reload {
    server: Arc<dyn MinecraftServer>,
    staged: Option<Arc<CommandDispatcher>>,
    permission_level: i32,
    functions: Option<Arc<CustomFunctionData>>,
    manager: Option<Arc<ReloadableResourceManager>>,
    contents: Option<DataPackContents>,
}

impl Reload {
    pub fn new(server: Arc<dyn MinecraftServer>) -> Self {
        Self {
            server,
            staged: None,
            permission_level: 0,
            functions: None,
            manager: None,
            contents: None,
        }
    }

    fn host(&self) -> Result<&DedicatedServer, ReloadError> {
        Ok(server_of(self.server.as_ref())?)
    }
}

#[async_trait]
impl DatapackReload for Reload {
    fn release(&self) -> &'static str {
        RELEASE
    }

    fn patch(&mut self) -> Result<Patched, ReloadError> {
        let host = self.host()?;
        let staged = Arc::clone(host.get_commands());
        let permission_level = host.get_function_permission_level();
        self.staged = Some(staged);
        self.permission_level = permission_level;
        Ok(Patched {
            function_permission_level: permission_level,
            sealed: false,
        })
    }

    fn rebuild(&mut self) -> Result<(), ReloadError> {
        let staged = self.staged.clone().ok_or(ReloadError::OutOfOrder("rebuild"))?;
        self.functions = Some(Arc::new(CustomFunctionData::new(staged, self.permission_level)));
        self.manager = Some(ReloadableResourceManager::open(
            self.server.core().resource_handles(),
        ));
        Ok(())
    }

    async fn load(&mut self) -> Result<(), ReloadError> {
        let manager = self.manager.clone().ok_or(ReloadError::OutOfOrder("load"))?;
        let packs = self.server.core().datapack_dirs();
        self.contents = Some(load_packs(&manager, packs).await?);
        Ok(())
    }

    fn commit(&mut self) -> Result<Committed, ReloadError> {
        let (Some(functions), Some(manager), Some(contents)) = (
            self.functions.clone(),
            self.manager.clone(),
            self.contents.as_ref(),
        ) else {
            return Err(ReloadError::OutOfOrder("commit"));
        };
        let source = Arc::new(CommandListenerWrapper::console(Arc::clone(&self.server)));
        functions.bind(contents, source).map_err(ReloadError::Bind)?;

        let host = self.host()?;
        let previous = host.set_resource_manager(manager);
        host.set_function_data(Arc::clone(&functions));
        self.manager = None;
        previous.close();

        Ok(Committed {
            functions: functions.function_ids().len(),
            tags: functions.tag_ids().len(),
        })
    }

    fn abort(&mut self) {
        if let Some(manager) = self.manager.take() {
            manager.close();
        }
        self.functions = None;
        self.contents = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_is_not_supported() {
        let adapter = Adapter::new();
        assert!(!adapter.supports(ArgumentKind::Uuid));
        assert!(matches!(
            adapter.parser(ArgumentKind::Uuid),
            Err(AdapterError::UnsupportedKind { release: RELEASE, .. })
        ));
    }

    #[test]
    fn test_reload_requires_matching_server() {
        let adapter = Adapter::new();
        let server = mchost::v1_16_r1::DedicatedServer::start();
        assert!(matches!(
            adapter.reload(server),
            Err(AdapterError::WrongServer { expected: VERSION, .. })
        ));
    }

    #[test]
    fn test_commit_before_load_is_out_of_order() {
        let mut reload = Reload::new(DedicatedServer::start());
        reload.patch().unwrap();
        assert!(matches!(reload.commit(), Err(ReloadError::OutOfOrder("commit"))));
    }
}
