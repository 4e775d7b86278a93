//! The contract every release adapter implements

use crate::error::{AdapterError, ExtractError};
use crate::reload::DatapackReload;
use cmdapi_wrappers::{
    ArgumentKind, ArgumentValue, Axis, BlockData, ChatColor, ChatComponent, EntitySelector,
    Environment, FloatRange, FunctionWrapper, IntegerRange, ItemSlot, ItemStack, Location,
    Location2D, LocationType, MathOperation, NamespacedKey, NbtCompound, ParseFailure, PlayerRef,
    Recipe, Rotation, ScoreHolderType, ScoreboardSlot, Sender, SuggestionProviders,
};
use mchost::brigadier::{ArgumentType, CommandContext, CommandDispatcher};
use mchost::functions::FunctionLibrary;
use mchost::MinecraftServer;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// A host argument parser, opaque to everything above the adapter
#[derive(Clone)]
pub struct NativeParser {
    kind: ArgumentKind,
    inner: Arc<dyn ArgumentType>,
}

impl NativeParser {
    pub fn new(kind: ArgumentKind, inner: Arc<dyn ArgumentType>) -> Self {
        Self { kind, inner }
    }

    pub fn kind(&self) -> ArgumentKind {
        self.kind
    }

    /// Registry id of the host parser, e.g. `minecraft:vec3`
    pub fn parser_id(&self) -> &'static str {
        self.inner.id()
    }

    pub fn as_native(&self) -> &Arc<dyn ArgumentType> {
        &self.inner
    }

    pub fn into_native(self) -> Arc<dyn ArgumentType> {
        self.inner
    }
}

impl fmt::Debug for NativeParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeParser")
            .field("kind", &self.kind)
            .field("parser", &self.inner.id())
            .finish()
    }
}

/// The dispatcher and function library commands currently run against
#[derive(Clone)]
pub struct LiveState {
    pub dispatcher: Arc<CommandDispatcher>,
    pub functions: Arc<FunctionLibrary>,
}

impl fmt::Debug for LiveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveState")
            .field("commands", &self.dispatcher.command_names())
            .field("functions", &self.functions)
            .finish()
    }
}

/// One host release, seen through a fixed set of argument kinds
///
/// Factories build the host parser for a kind; extractors read the value the
/// host parsed back out of a [`CommandContext`] and translate it into a
/// `cmdapi-wrappers` record. Extraction never writes to host state.
///
/// Adapters for different releases return equal values for the same command
/// line, whatever the host calls its types.
pub trait VersionAdapter: Send + Sync + 'static {
    /// Short release id, e.g. `1_16_R1`
    fn release(&self) -> &'static str;

    /// Server versions this adapter drives
    fn compatible_versions(&self) -> &'static [&'static str];

    fn supports(&self, kind: ArgumentKind) -> bool;

    // Factories

    fn advancement(&self) -> NativeParser;
    fn axis(&self) -> NativeParser;
    fn biome(&self) -> NativeParser;
    fn block_state(&self) -> NativeParser;
    fn chat(&self) -> NativeParser;
    fn chat_color(&self) -> NativeParser;
    fn chat_component(&self) -> NativeParser;
    fn dimension(&self) -> NativeParser;
    fn enchantment(&self) -> NativeParser;
    fn entity_selector(&self, selector: EntitySelector) -> NativeParser;
    fn entity_type(&self) -> NativeParser;
    fn float_range(&self) -> NativeParser;
    fn function(&self) -> NativeParser;
    fn int_range(&self) -> NativeParser;
    fn item_slot(&self) -> NativeParser;
    fn item_stack(&self) -> NativeParser;
    fn location(&self, ty: LocationType) -> NativeParser;
    fn location_2d(&self, ty: LocationType) -> NativeParser;
    fn loot_table(&self) -> NativeParser;
    fn math_operation(&self) -> NativeParser;
    fn namespaced_key(&self) -> NativeParser;
    fn nbt_compound(&self) -> NativeParser;
    fn objective(&self) -> NativeParser;
    fn objective_criteria(&self) -> NativeParser;
    fn particle(&self) -> NativeParser;
    fn player(&self) -> NativeParser;
    fn potion_effect(&self) -> NativeParser;
    fn recipe(&self) -> NativeParser;
    fn rotation(&self) -> NativeParser;
    fn score_holder(&self, ty: ScoreHolderType) -> NativeParser;
    fn scoreboard_slot(&self) -> NativeParser;
    fn sound(&self) -> NativeParser;
    fn team(&self) -> NativeParser;
    fn time(&self) -> NativeParser;

    /// Only releases that have a UUID argument override this
    fn uuid(&self) -> Result<NativeParser, AdapterError> {
        Err(AdapterError::UnsupportedKind {
            kind: ArgumentKind::Uuid,
            release: self.release(),
        })
    }

    // Extractors

    fn get_advancement(&self, ctx: &CommandContext, key: &str) -> Result<NamespacedKey, ExtractError>;
    fn get_axis(&self, ctx: &CommandContext, key: &str) -> Result<BTreeSet<Axis>, ExtractError>;
    fn get_biome(&self, ctx: &CommandContext, key: &str) -> Result<NamespacedKey, ExtractError>;
    fn get_block_state(&self, ctx: &CommandContext, key: &str) -> Result<BlockData, ExtractError>;
    fn get_chat(&self, ctx: &CommandContext, key: &str) -> Result<ChatComponent, ExtractError>;
    fn get_chat_color(&self, ctx: &CommandContext, key: &str) -> Result<ChatColor, ExtractError>;
    fn get_chat_component(&self, ctx: &CommandContext, key: &str) -> Result<ChatComponent, ExtractError>;
    fn get_dimension(&self, ctx: &CommandContext, key: &str) -> Result<Environment, ExtractError>;
    fn get_enchantment(&self, ctx: &CommandContext, key: &str) -> Result<NamespacedKey, ExtractError>;

    /// `Entity`, `Entities`, `Player` or `Players`, per `selector`
    ///
    /// The many-target selectors yield an empty list when nothing matches;
    /// the single-target ones fail with the host's not-found text.
    fn get_entity_selector(
        &self,
        ctx: &CommandContext,
        key: &str,
        selector: EntitySelector,
    ) -> Result<ArgumentValue, ExtractError>;

    fn get_entity_type(&self, ctx: &CommandContext, key: &str) -> Result<NamespacedKey, ExtractError>;
    fn get_float_range(&self, ctx: &CommandContext, key: &str) -> Result<FloatRange, ExtractError>;
    fn get_function(&self, ctx: &CommandContext, key: &str) -> Result<Vec<FunctionWrapper>, ExtractError>;
    fn get_int_range(&self, ctx: &CommandContext, key: &str) -> Result<IntegerRange, ExtractError>;
    fn get_item_slot(&self, ctx: &CommandContext, key: &str) -> Result<ItemSlot, ExtractError>;
    fn get_item_stack(&self, ctx: &CommandContext, key: &str) -> Result<ItemStack, ExtractError>;
    fn get_location(
        &self,
        ctx: &CommandContext,
        key: &str,
        ty: LocationType,
    ) -> Result<Location, ExtractError>;
    fn get_location_2d(
        &self,
        ctx: &CommandContext,
        key: &str,
        ty: LocationType,
    ) -> Result<Location2D, ExtractError>;
    fn get_loot_table(&self, ctx: &CommandContext, key: &str) -> Result<NamespacedKey, ExtractError>;
    fn get_math_operation(&self, ctx: &CommandContext, key: &str) -> Result<MathOperation, ExtractError>;
    fn get_namespaced_key(&self, ctx: &CommandContext, key: &str) -> Result<NamespacedKey, ExtractError>;
    fn get_nbt_compound(&self, ctx: &CommandContext, key: &str) -> Result<NbtCompound, ExtractError>;
    fn get_objective(&self, ctx: &CommandContext, key: &str) -> Result<String, ExtractError>;
    fn get_objective_criteria(&self, ctx: &CommandContext, key: &str) -> Result<String, ExtractError>;
    fn get_particle(&self, ctx: &CommandContext, key: &str) -> Result<NamespacedKey, ExtractError>;
    fn get_player(&self, ctx: &CommandContext, key: &str) -> Result<PlayerRef, ExtractError>;
    fn get_potion_effect(&self, ctx: &CommandContext, key: &str) -> Result<NamespacedKey, ExtractError>;
    fn get_recipe(&self, ctx: &CommandContext, key: &str) -> Result<Recipe, ExtractError>;
    fn get_rotation(&self, ctx: &CommandContext, key: &str) -> Result<Rotation, ExtractError>;

    /// `ScoreHolder` or `ScoreHolders`, per `ty`
    fn get_score_holder(
        &self,
        ctx: &CommandContext,
        key: &str,
        ty: ScoreHolderType,
    ) -> Result<ArgumentValue, ExtractError>;

    fn get_scoreboard_slot(&self, ctx: &CommandContext, key: &str) -> Result<ScoreboardSlot, ExtractError>;
    fn get_sound(&self, ctx: &CommandContext, key: &str) -> Result<NamespacedKey, ExtractError>;
    fn get_team(&self, ctx: &CommandContext, key: &str) -> Result<String, ExtractError>;
    fn get_time(&self, ctx: &CommandContext, key: &str) -> Result<i32, ExtractError>;

    fn get_uuid(&self, _ctx: &CommandContext, _key: &str) -> Result<uuid::Uuid, ExtractError> {
        Err(AdapterError::UnsupportedKind {
            kind: ArgumentKind::Uuid,
            release: self.release(),
        }
        .into())
    }

    // Host access

    /// The dispatcher plugin commands are registered on
    fn brigadier_dispatcher(
        &self,
        server: &dyn MinecraftServer,
    ) -> Result<Arc<CommandDispatcher>, AdapterError>;

    /// The dispatcher and function library commands run against right now
    fn live_state(&self, server: &dyn MinecraftServer) -> Result<LiveState, AdapterError>;

    /// The steps that rebuild this release's datapack state
    fn reload(
        &self,
        server: Arc<dyn MinecraftServer>,
    ) -> Result<Box<dyn DatapackReload>, AdapterError>;

    /// Completion candidates for `provider`, in host iteration order
    fn completion_candidates(
        &self,
        provider: SuggestionProviders,
        ctx: &CommandContext,
    ) -> Vec<String>;

    /// Who ran the command, as `Proxied` when it runs as another entity
    fn sender_for_command(&self, ctx: &CommandContext) -> Result<Sender, AdapterError>;

    /// Parse `text` with the host's resource location rules
    fn validate_namespaced_key(&self, text: &str) -> Result<NamespacedKey, ParseFailure>;

    /// Write the server's dispatcher tree as pretty JSON
    fn create_dispatcher_file(
        &self,
        server: &dyn MinecraftServer,
        path: &Path,
    ) -> Result<(), AdapterError> {
        let dispatcher = self.brigadier_dispatcher(server)?;
        let json = serde_json::to_string_pretty(&dispatcher.to_json())
            .map_err(|e| AdapterError::Host(e.to_string()))?;
        std::fs::write(path, json).map_err(|source| AdapterError::DispatcherFile {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(release = self.release(), path = %path.display(), "Wrote dispatcher file");
        Ok(())
    }

    /// The host parser for `kind`
    fn parser(&self, kind: ArgumentKind) -> Result<NativeParser, AdapterError> {
        if !self.supports(kind) {
            return Err(AdapterError::UnsupportedKind {
                kind,
                release: self.release(),
            });
        }
        Ok(match kind {
            ArgumentKind::Advancement => self.advancement(),
            ArgumentKind::Axis => self.axis(),
            ArgumentKind::Biome => self.biome(),
            ArgumentKind::BlockState => self.block_state(),
            ArgumentKind::Chat => self.chat(),
            ArgumentKind::ChatColor => self.chat_color(),
            ArgumentKind::ChatComponent => self.chat_component(),
            ArgumentKind::Dimension => self.dimension(),
            ArgumentKind::Enchantment => self.enchantment(),
            ArgumentKind::EntitySelector(selector) => self.entity_selector(selector),
            ArgumentKind::EntityType => self.entity_type(),
            ArgumentKind::FloatRange => self.float_range(),
            ArgumentKind::Function => self.function(),
            ArgumentKind::IntRange => self.int_range(),
            ArgumentKind::ItemSlot => self.item_slot(),
            ArgumentKind::ItemStack => self.item_stack(),
            ArgumentKind::Location(ty) => self.location(ty),
            ArgumentKind::Location2D(ty) => self.location_2d(ty),
            ArgumentKind::LootTable => self.loot_table(),
            ArgumentKind::MathOperation => self.math_operation(),
            ArgumentKind::NamespacedKey => self.namespaced_key(),
            ArgumentKind::NbtCompound => self.nbt_compound(),
            ArgumentKind::Objective => self.objective(),
            ArgumentKind::ObjectiveCriteria => self.objective_criteria(),
            ArgumentKind::Particle => self.particle(),
            ArgumentKind::Player => self.player(),
            ArgumentKind::PotionEffect => self.potion_effect(),
            ArgumentKind::Recipe => self.recipe(),
            ArgumentKind::Rotation => self.rotation(),
            ArgumentKind::ScoreHolder(ty) => self.score_holder(ty),
            ArgumentKind::ScoreboardSlot => self.scoreboard_slot(),
            ArgumentKind::Sound => self.sound(),
            ArgumentKind::Team => self.team(),
            ArgumentKind::Time => self.time(),
            ArgumentKind::Uuid => self.uuid()?,
        })
    }

    /// Read argument `key` as `kind`
    fn extract(
        &self,
        kind: ArgumentKind,
        ctx: &CommandContext,
        key: &str,
    ) -> Result<ArgumentValue, ExtractError> {
        if !self.supports(kind) {
            return Err(AdapterError::UnsupportedKind {
                kind,
                release: self.release(),
            }
            .into());
        }
        Ok(match kind {
            ArgumentKind::Advancement => ArgumentValue::Advancement(self.get_advancement(ctx, key)?),
            ArgumentKind::Axis => ArgumentValue::Axis(self.get_axis(ctx, key)?),
            ArgumentKind::Biome => ArgumentValue::Biome(self.get_biome(ctx, key)?),
            ArgumentKind::BlockState => ArgumentValue::BlockState(self.get_block_state(ctx, key)?),
            ArgumentKind::Chat => ArgumentValue::Chat(self.get_chat(ctx, key)?),
            ArgumentKind::ChatColor => ArgumentValue::ChatColor(self.get_chat_color(ctx, key)?),
            ArgumentKind::ChatComponent => {
                ArgumentValue::ChatComponent(self.get_chat_component(ctx, key)?)
            }
            ArgumentKind::Dimension => ArgumentValue::Environment(self.get_dimension(ctx, key)?),
            ArgumentKind::Enchantment => ArgumentValue::Enchantment(self.get_enchantment(ctx, key)?),
            ArgumentKind::EntitySelector(selector) => {
                self.get_entity_selector(ctx, key, selector)?
            }
            ArgumentKind::EntityType => ArgumentValue::EntityType(self.get_entity_type(ctx, key)?),
            ArgumentKind::FloatRange => ArgumentValue::FloatRange(self.get_float_range(ctx, key)?),
            ArgumentKind::Function => ArgumentValue::Functions(self.get_function(ctx, key)?),
            ArgumentKind::IntRange => ArgumentValue::IntRange(self.get_int_range(ctx, key)?),
            ArgumentKind::ItemSlot => ArgumentValue::ItemSlot(self.get_item_slot(ctx, key)?),
            ArgumentKind::ItemStack => ArgumentValue::ItemStack(self.get_item_stack(ctx, key)?),
            ArgumentKind::Location(ty) => ArgumentValue::Location(self.get_location(ctx, key, ty)?),
            ArgumentKind::Location2D(ty) => {
                ArgumentValue::Location2D(self.get_location_2d(ctx, key, ty)?)
            }
            ArgumentKind::LootTable => ArgumentValue::LootTable(self.get_loot_table(ctx, key)?),
            ArgumentKind::MathOperation => {
                ArgumentValue::MathOperation(self.get_math_operation(ctx, key)?)
            }
            ArgumentKind::NamespacedKey => {
                ArgumentValue::NamespacedKey(self.get_namespaced_key(ctx, key)?)
            }
            ArgumentKind::NbtCompound => ArgumentValue::Nbt(self.get_nbt_compound(ctx, key)?),
            ArgumentKind::Objective => ArgumentValue::Objective(self.get_objective(ctx, key)?),
            ArgumentKind::ObjectiveCriteria => {
                ArgumentValue::ObjectiveCriteria(self.get_objective_criteria(ctx, key)?)
            }
            ArgumentKind::Particle => ArgumentValue::Particle(self.get_particle(ctx, key)?),
            ArgumentKind::Player => ArgumentValue::Player(self.get_player(ctx, key)?),
            ArgumentKind::PotionEffect => {
                ArgumentValue::PotionEffect(self.get_potion_effect(ctx, key)?)
            }
            ArgumentKind::Recipe => ArgumentValue::Recipe(self.get_recipe(ctx, key)?),
            ArgumentKind::Rotation => ArgumentValue::Rotation(self.get_rotation(ctx, key)?),
            ArgumentKind::ScoreHolder(ty) => self.get_score_holder(ctx, key, ty)?,
            ArgumentKind::ScoreboardSlot => {
                ArgumentValue::ScoreboardSlot(self.get_scoreboard_slot(ctx, key)?)
            }
            ArgumentKind::Sound => ArgumentValue::Sound(self.get_sound(ctx, key)?),
            ArgumentKind::Team => ArgumentValue::Team(self.get_team(ctx, key)?),
            ArgumentKind::Time => ArgumentValue::Time(self.get_time(ctx, key)?),
            ArgumentKind::Uuid => ArgumentValue::Uuid(self.get_uuid(ctx, key)?),
        })
    }
}
