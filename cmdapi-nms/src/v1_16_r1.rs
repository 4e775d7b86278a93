//! Adapter for release 1.16.1
//!
//! The dispatcher, function manager and resource manager sit behind sealed
//! fields on [`DataPackResources`]. Multi-target selectors fail on an empty
//! match here, so the adapter turns that one failure back into an empty
//! list.

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
use mchost::brigadier::{CommandContext, CommandDispatcher, CommandError};
use mchost::resources::{DataPackContents, ReloadableResourceManager};
use mchost::scoreboard::ScoreboardScore;
use mchost::v1_16_r1::{
    ArgumentChat, ArgumentChatComponent, ArgumentChatFormat, ArgumentCriterionValue,
    ArgumentDimension, ArgumentEnchantment, ArgumentEntity, ArgumentEntitySummon,
    ArgumentInventorySlot, ArgumentItemStack, ArgumentMathOperation,
    ArgumentMinecraftKeyRegistered, ArgumentMobEffect, ArgumentNBTTag, ArgumentParticle,
    ArgumentPosition, ArgumentProfile, ArgumentRotation, ArgumentRotationAxis,
    ArgumentScoreboardCriteria, ArgumentScoreboardObjective, ArgumentScoreboardSlot,
    ArgumentScoreboardTeam, ArgumentScoreholder, ArgumentTag, ArgumentTile, ArgumentTime,
    ArgumentUUID, ArgumentVec2, ArgumentVec2I, ArgumentVec3, CustomFunctionManager,
    DedicatedServer, EnumAxis, VERSION,
};
use mchost::world::Entity;
use mchost::{CommandListenerWrapper, MinecraftServer, ResourceLocation};
use std::collections::BTreeSet;
use std::sync::Arc;

pub const RELEASE: &str = "1_16_R1";

pub const COMPATIBLE_VERSIONS: &[&str] = &[VERSION];

const NO_ENTITIES: &str = "argument.entity.notfound.entity";
const NO_PLAYERS: &str = "argument.entity.notfound.player";

fn server_of(server: &dyn MinecraftServer) -> Result<&DedicatedServer, AdapterError> {
    server
        .as_any()
        .downcast_ref::<DedicatedServer>()
        .ok_or(AdapterError::WrongServer {
            expected: VERSION,
            actual: server.version(),
        })
}

/// An empty match is not an error for multi-target selectors
fn allow_empty(
    found: Result<Vec<Entity>, CommandError>,
    not_found: &str,
) -> Result<Vec<Entity>, CommandError> {
    match found {
        Err(CommandError::Syntax(e)) if e.key() == not_found => Ok(Vec::new()),
        other => other,
    }
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

    fn supports(&self, _kind: ArgumentKind) -> bool {
        true
    }

    fn advancement(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Advancement, ArgumentMinecraftKeyRegistered::key())
    }

    fn axis(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Axis, ArgumentRotationAxis::axes())
    }

    fn biome(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Biome, ArgumentMinecraftKeyRegistered::key())
    }

    fn block_state(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::BlockState, ArgumentTile::block_state())
    }

    fn chat(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Chat, ArgumentChat::chat())
    }

    fn chat_color(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::ChatColor, ArgumentChatFormat::chat_format())
    }

    fn chat_component(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::ChatComponent, ArgumentChatComponent::chat_component())
    }

    fn dimension(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Dimension, ArgumentDimension::dimension())
    }

    fn enchantment(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Enchantment, ArgumentEnchantment::enchantment())
    }

    fn entity_selector(&self, selector: EntitySelector) -> NativeParser {
        let parser = match selector {
            EntitySelector::OneEntity => ArgumentEntity::single_entity(),
            EntitySelector::ManyEntities => ArgumentEntity::multiple_entities(),
            EntitySelector::OnePlayer => ArgumentEntity::single_player(),
            EntitySelector::ManyPlayers => ArgumentEntity::multiple_players(),
        };
        NativeParser::new(ArgumentKind::EntitySelector(selector), parser)
    }

    fn entity_type(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::EntityType, ArgumentEntitySummon::entity_type())
    }

    fn float_range(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::FloatRange, ArgumentCriterionValue::floats())
    }

    fn function(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Function, ArgumentTag::functions())
    }

    fn int_range(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::IntRange, ArgumentCriterionValue::ints())
    }

    fn item_slot(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::ItemSlot, ArgumentInventorySlot::slot())
    }

    fn item_stack(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::ItemStack, ArgumentItemStack::item_stack())
    }

    fn location(&self, ty: LocationType) -> NativeParser {
        let parser = match ty {
            LocationType::BlockPosition => ArgumentPosition::block_pos(),
            LocationType::PrecisePosition => ArgumentVec3::vec3(true),
        };
        NativeParser::new(ArgumentKind::Location(ty), parser)
    }

    fn location_2d(&self, ty: LocationType) -> NativeParser {
        let parser = match ty {
            LocationType::BlockPosition => ArgumentVec2I::column_pos(),
            LocationType::PrecisePosition => ArgumentVec2::vec2(),
        };
        NativeParser::new(ArgumentKind::Location2D(ty), parser)
    }

    fn loot_table(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::LootTable, ArgumentMinecraftKeyRegistered::key())
    }

    fn math_operation(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::MathOperation, ArgumentMathOperation::operation())
    }

    fn namespaced_key(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::NamespacedKey, ArgumentMinecraftKeyRegistered::key())
    }

    fn nbt_compound(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::NbtCompound, ArgumentNBTTag::compound())
    }

    fn objective(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Objective, ArgumentScoreboardObjective::objective())
    }

    fn objective_criteria(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::ObjectiveCriteria, ArgumentScoreboardCriteria::criteria())
    }

    fn particle(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Particle, ArgumentParticle::particle())
    }

    fn player(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Player, ArgumentProfile::game_profile())
    }

    fn potion_effect(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::PotionEffect, ArgumentMobEffect::mob_effect())
    }

    fn recipe(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Recipe, ArgumentMinecraftKeyRegistered::key())
    }

    fn rotation(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Rotation, ArgumentRotation::rotation())
    }

    fn score_holder(&self, ty: ScoreHolderType) -> NativeParser {
        let parser = match ty {
            ScoreHolderType::Single => ArgumentScoreholder::single(),
            ScoreHolderType::Multiple => ArgumentScoreholder::multiple(),
        };
        NativeParser::new(ArgumentKind::ScoreHolder(ty), parser)
    }

    fn scoreboard_slot(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::ScoreboardSlot, ArgumentScoreboardSlot::slot())
    }

    fn sound(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Sound, ArgumentMinecraftKeyRegistered::key())
    }

    fn team(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Team, ArgumentScoreboardTeam::team())
    }

    fn time(&self) -> NativeParser {
        NativeParser::new(ArgumentKind::Time, ArgumentTime::time())
    }

    fn uuid(&self) -> Result<NativeParser, AdapterError> {
        Ok(NativeParser::new(ArgumentKind::Uuid, ArgumentUUID::uuid()))
    }

    fn get_advancement(&self, ctx: &CommandContext, key: &str) -> Result<NamespacedKey, ExtractError> {
        let advancement = ArgumentMinecraftKeyRegistered::get_advancement(ctx, key)?;
        Ok(convert::key(&advancement.key))
    }

    fn get_axis(&self, ctx: &CommandContext, key: &str) -> Result<BTreeSet<Axis>, ExtractError> {
        let axes = ArgumentRotationAxis::get_axes(ctx, key)?;
        Ok(Axis::set_from(axes.into_iter().map(|axis| match axis {
            EnumAxis::X => Axis::X,
            EnumAxis::Y => Axis::Y,
            EnumAxis::Z => Axis::Z,
        })))
    }

    fn get_biome(&self, ctx: &CommandContext, key: &str) -> Result<NamespacedKey, ExtractError> {
        Ok(convert::key(&ArgumentMinecraftKeyRegistered::get_biome(ctx, key)?))
    }

    fn get_block_state(&self, ctx: &CommandContext, key: &str) -> Result<BlockData, ExtractError> {
        Ok(convert::block_data(&ArgumentTile::get_block(ctx, key)?))
    }

    fn get_chat(&self, ctx: &CommandContext, key: &str) -> Result<ChatComponent, ExtractError> {
        Ok(convert::chat_component(&ArgumentChat::get_chat(ctx, key)?))
    }

    fn get_chat_color(&self, ctx: &CommandContext, key: &str) -> Result<ChatColor, ExtractError> {
        Ok(convert::chat_color(ArgumentChatFormat::get_format(ctx, key)?)?)
    }

    fn get_chat_component(&self, ctx: &CommandContext, key: &str) -> Result<ChatComponent, ExtractError> {
        Ok(convert::chat_component(&ArgumentChatComponent::get_component(ctx, key)?))
    }

    fn get_dimension(&self, ctx: &CommandContext, key: &str) -> Result<Environment, ExtractError> {
        Ok(convert::environment(ArgumentDimension::get_world(ctx, key)?.kind))
    }

    fn get_enchantment(&self, ctx: &CommandContext, key: &str) -> Result<NamespacedKey, ExtractError> {
        Ok(convert::key(&ArgumentEnchantment::get_enchantment(ctx, key)?))
    }

    fn get_entity_selector(
        &self,
        ctx: &CommandContext,
        key: &str,
        selector: EntitySelector,
    ) -> Result<ArgumentValue, ExtractError> {
        Ok(match selector {
            EntitySelector::OneEntity => {
                ArgumentValue::Entity(convert::entity_ref(&ArgumentEntity::get_entity(ctx, key)?))
            }
            EntitySelector::ManyEntities => ArgumentValue::Entities(
                allow_empty(ArgumentEntity::get_entities(ctx, key), NO_ENTITIES)?
                    .iter()
                    .map(convert::entity_ref)
                    .collect(),
            ),
            EntitySelector::OnePlayer => {
                ArgumentValue::Player(convert::player_ref(&ArgumentEntity::get_player(ctx, key)?))
            }
            EntitySelector::ManyPlayers => ArgumentValue::Players(
                allow_empty(ArgumentEntity::get_players(ctx, key), NO_PLAYERS)?
                    .iter()
                    .map(convert::player_ref)
                    .collect(),
            ),
        })
    }

    fn get_entity_type(&self, ctx: &CommandContext, key: &str) -> Result<NamespacedKey, ExtractError> {
        Ok(convert::key(&ArgumentEntitySummon::get_entity_type(ctx, key)?))
    }

    fn get_float_range(&self, ctx: &CommandContext, key: &str) -> Result<FloatRange, ExtractError> {
        let range = ArgumentCriterionValue::get_floats(ctx, key)?;
        Ok(FloatRange::new(
            range.get_min().unwrap_or(-f32::MAX),
            range.get_max().unwrap_or(f32::MAX),
        ))
    }

    fn get_function(&self, ctx: &CommandContext, key: &str) -> Result<Vec<FunctionWrapper>, ExtractError> {
        let resolved = ArgumentTag::get_functions(ctx, key)?;
        Ok(convert::functions(resolved, ctx.source()))
    }

    fn get_int_range(&self, ctx: &CommandContext, key: &str) -> Result<IntegerRange, ExtractError> {
        let range = ArgumentCriterionValue::get_ints(ctx, key)?;
        Ok(IntegerRange::new(
            range.get_min().unwrap_or(i32::MIN),
            range.get_max().unwrap_or(i32::MAX),
        ))
    }

    fn get_item_slot(&self, ctx: &CommandContext, key: &str) -> Result<ItemSlot, ExtractError> {
        Ok(ItemSlot::from_id(ArgumentInventorySlot::get_slot(ctx, key)?))
    }

    fn get_item_stack(&self, ctx: &CommandContext, key: &str) -> Result<ItemStack, ExtractError> {
        Ok(convert::item_stack(&ArgumentItemStack::get_item(ctx, key)?))
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
                let pos = ArgumentPosition::get_block_position(ctx, key)?;
                Location::new(world, pos.get_x() as f64, pos.get_y() as f64, pos.get_z() as f64)
            }
            LocationType::PrecisePosition => {
                let pos = ArgumentVec3::get_vec3(ctx, key)?;
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
                let pos = ArgumentVec2I::get_column(ctx, key)?;
                Location2D::new(world, pos.get_x() as f64, pos.get_z() as f64)
            }
            LocationType::PrecisePosition => {
                let pos = ArgumentVec2::get_vec2(ctx, key)?;
                Location2D::new(world, pos.i as f64, pos.j as f64)
            }
        })
    }

    fn get_loot_table(&self, ctx: &CommandContext, key: &str) -> Result<NamespacedKey, ExtractError> {
        Ok(convert::key(&ArgumentMinecraftKeyRegistered::get_loot_table(ctx, key)?))
    }

    fn get_math_operation(&self, ctx: &CommandContext, key: &str) -> Result<MathOperation, ExtractError> {
        let operation = ArgumentMathOperation::get_operation(ctx, key)?;
        Ok(classify_operation(
            ScoreboardScore::new,
            |l: &mut ScoreboardScore, r: &mut ScoreboardScore| operation.apply(l, r),
        )?)
    }

    fn get_namespaced_key(&self, ctx: &CommandContext, key: &str) -> Result<NamespacedKey, ExtractError> {
        Ok(convert::key(&ArgumentMinecraftKeyRegistered::get_key(ctx, key)?))
    }

    fn get_nbt_compound(&self, ctx: &CommandContext, key: &str) -> Result<NbtCompound, ExtractError> {
        Ok(convert::nbt(&ArgumentNBTTag::get_compound(ctx, key)?))
    }

    fn get_objective(&self, ctx: &CommandContext, key: &str) -> Result<String, ExtractError> {
        Ok(ArgumentScoreboardObjective::get_objective(ctx, key)?.name)
    }

    fn get_objective_criteria(&self, ctx: &CommandContext, key: &str) -> Result<String, ExtractError> {
        Ok(ArgumentScoreboardCriteria::get_criteria(ctx, key)?)
    }

    fn get_particle(&self, ctx: &CommandContext, key: &str) -> Result<NamespacedKey, ExtractError> {
        Ok(convert::key(&ArgumentParticle::get_particle(ctx, key)?))
    }

    fn get_player(&self, ctx: &CommandContext, key: &str) -> Result<PlayerRef, ExtractError> {
        let profiles = ArgumentProfile::get_profiles(ctx, key)?;
        Ok(convert::first_profile(&profiles)?)
    }

    fn get_potion_effect(&self, ctx: &CommandContext, key: &str) -> Result<NamespacedKey, ExtractError> {
        Ok(convert::key(&ArgumentMobEffect::get_effect(ctx, key)?))
    }

    fn get_recipe(&self, ctx: &CommandContext, key: &str) -> Result<Recipe, ExtractError> {
        let recipe = ArgumentMinecraftKeyRegistered::get_recipe(ctx, key)?;
        Ok(Recipe {
            key: convert::key(&recipe.key),
            result: ItemStack::new(convert::key(&recipe.result), recipe.count),
        })
    }

    fn get_rotation(&self, ctx: &CommandContext, key: &str) -> Result<Rotation, ExtractError> {
        let rotation = ArgumentRotation::get_rotation(ctx, key)?;
        Ok(Rotation::new(rotation.i, rotation.j))
    }

    fn get_score_holder(
        &self,
        ctx: &CommandContext,
        key: &str,
        ty: ScoreHolderType,
    ) -> Result<ArgumentValue, ExtractError> {
        Ok(match ty {
            ScoreHolderType::Single => {
                ArgumentValue::ScoreHolder(ArgumentScoreholder::get_name(ctx, key)?)
            }
            ScoreHolderType::Multiple => {
                ArgumentValue::ScoreHolders(ArgumentScoreholder::get_names(ctx, key)?)
            }
        })
    }

    fn get_scoreboard_slot(&self, ctx: &CommandContext, key: &str) -> Result<ScoreboardSlot, ExtractError> {
        let index = ArgumentScoreboardSlot::get_slot(ctx, key)?;
        ScoreboardSlot::from_index(index)
            .ok_or_else(|| AdapterError::Unmapped(format!("display slot {}", index)).into())
    }

    fn get_sound(&self, ctx: &CommandContext, key: &str) -> Result<NamespacedKey, ExtractError> {
        Ok(convert::key(&ArgumentMinecraftKeyRegistered::get_sound(ctx, key)?))
    }

    fn get_team(&self, ctx: &CommandContext, key: &str) -> Result<String, ExtractError> {
        Ok(ArgumentScoreboardTeam::get_team(ctx, key)?.name)
    }

    fn get_time(&self, ctx: &CommandContext, key: &str) -> Result<i32, ExtractError> {
        Ok(ArgumentTime::get_ticks(ctx, key)?)
    }

    fn get_uuid(&self, ctx: &CommandContext, key: &str) -> Result<uuid::Uuid, ExtractError> {
        Ok(ArgumentUUID::get_uuid(ctx, key)?)
    }

    /// Plugins register on the vanilla dispatcher; reloads re-pin the live
    /// one to it
    fn brigadier_dispatcher(
        &self,
        server: &dyn MinecraftServer,
    ) -> Result<Arc<CommandDispatcher>, AdapterError> {
        Ok(Arc::clone(server_of(server)?.vanilla_command_dispatcher()))
    }

    fn live_state(&self, server: &dyn MinecraftServer) -> Result<LiveState, AdapterError> {
        let resources = server_of(server)?.data_pack_resources();
        Ok(LiveState {
            dispatcher: resources.command_dispatcher.get(),
            functions: resources.function_manager.get(),
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
            Ok(host) => {
                let functions = host.data_pack_resources().function_manager.get();
                host_candidates(provider, host.core().registries(), &functions)
            }
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

/// Rebuilds the function manager and writes it back through the sealed
/// fields of `DataPackResources`
pub struct Reload {
    server: Arc<dyn MinecraftServer>,
    staged: Option<Arc<CommandDispatcher>>,
    permission_level: i32,
    functions: Option<Arc<CustomFunctionManager>>,
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
        let resources = host.data_pack_resources();
        let sealed = resources.function_manager.is_sealed();
        let permission_level = resources.function_permission_level();
        let staged = Arc::clone(host.vanilla_command_dispatcher());
        self.staged = Some(staged);
        self.permission_level = permission_level;
        Ok(Patched {
            function_permission_level: permission_level,
            sealed,
        })
    }

    fn rebuild(&mut self) -> Result<(), ReloadError> {
        let staged = self.staged.clone().ok_or(ReloadError::OutOfOrder("rebuild"))?;
        self.functions = Some(Arc::new(CustomFunctionManager::new(staged, self.permission_level)));
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
        let (Some(staged), Some(functions), Some(manager), Some(contents)) = (
            self.staged.clone(),
            self.functions.clone(),
            self.manager.clone(),
            self.contents.as_ref(),
        ) else {
            return Err(ReloadError::OutOfOrder("commit"));
        };
        let source = Arc::new(CommandListenerWrapper::console(Arc::clone(&self.server)));
        functions.bind(contents, source).map_err(ReloadError::Bind)?;

        let resources = self.host()?.data_pack_resources();
        let previous = resources.resource_manager.get();
        resources
            .command_dispatcher
            .unseal()
            .set(staged)
            .map_err(ReloadError::Seal)?;
        resources
            .resource_manager
            .unseal()
            .set(manager)
            .map_err(ReloadError::Seal)?;
        resources
            .function_manager
            .unseal()
            .set(Arc::clone(&functions))
            .map_err(ReloadError::Seal)?;
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
    use mchost::brigadier::CommandSyntaxError;

    #[test]
    fn test_allow_empty_only_for_matching_key() {
        let none = Err(CommandSyntaxError::new(NO_ENTITIES, "No entity was found").into());
        assert!(allow_empty(none, NO_ENTITIES).unwrap().is_empty());

        let wrong = Err(CommandSyntaxError::new(NO_PLAYERS, "No player was found").into());
        assert!(allow_empty(wrong, NO_ENTITIES).is_err());
    }

    #[test]
    fn test_every_kind_has_a_parser() {
        let adapter = Adapter::new();
        assert!(adapter.parser(ArgumentKind::Uuid).is_ok());
        assert_eq!(
            adapter.parser(ArgumentKind::Time).unwrap().parser_id(),
            "minecraft:time"
        );
    }
}
