//! Server state shared by both releases

use crate::brigadier::CommandDispatcher;
use crate::functions::FunctionLibrary;
use crate::registry::Registries;
use crate::resources::HandleTracker;
use crate::scoreboard::Scoreboard;
use crate::world::{DimensionKind, Entity, Vec3, World};
use crate::ResourceLocation;
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// Release-independent game state
#[derive(Debug)]
pub struct ServerCore {
    worlds: Vec<World>,
    entities: RwLock<Vec<Entity>>,
    scoreboard: Scoreboard,
    registries: Registries,
    messages: Mutex<Vec<String>>,
    resource_handles: HandleTracker,
    datapack_dirs: RwLock<Vec<PathBuf>>,
}

impl ServerCore {
    /// The three vanilla worlds, empty of entities
    pub fn vanilla() -> Self {
        Self {
            worlds: vec![
                World::new(
                    "world",
                    ResourceLocation::minecraft("overworld"),
                    DimensionKind::Overworld,
                ),
                World::new(
                    "world_nether",
                    ResourceLocation::minecraft("the_nether"),
                    DimensionKind::Nether,
                ),
                World::new(
                    "world_the_end",
                    ResourceLocation::minecraft("the_end"),
                    DimensionKind::End,
                ),
            ],
            entities: RwLock::new(Vec::new()),
            scoreboard: Scoreboard::new(),
            registries: Registries::vanilla(),
            messages: Mutex::new(Vec::new()),
            resource_handles: HandleTracker::default(),
            datapack_dirs: RwLock::new(Vec::new()),
        }
    }

    pub fn worlds(&self) -> &[World] {
        &self.worlds
    }

    pub fn world(&self, name: &str) -> Option<&World> {
        self.worlds.iter().find(|w| w.name == name)
    }

    pub fn world_by_dimension(&self, dimension: &ResourceLocation) -> Option<&World> {
        self.worlds.iter().find(|w| &w.dimension == dimension)
    }

    pub fn default_world(&self) -> &str {
        self.worlds.first().map_or("world", |w| w.name.as_str())
    }

    pub fn spawn(&self, entity: Entity) -> Uuid {
        let uuid = entity.uuid;
        self.entities.write().push(entity);
        uuid
    }

    pub fn spawn_player(&self, name: &str, position: Vec3) -> Uuid {
        let world = self.default_world().to_string();
        self.spawn(Entity::player(name, world, position))
    }

    pub fn remove(&self, uuid: Uuid) -> bool {
        let mut entities = self.entities.write();
        let before = entities.len();
        entities.retain(|e| e.uuid != uuid);
        entities.len() != before
    }

    /// Snapshot of all loaded entities, in spawn order
    pub fn entities(&self) -> Vec<Entity> {
        self.entities.read().clone()
    }

    pub fn entity(&self, uuid: Uuid) -> Option<Entity> {
        self.entities.read().iter().find(|e| e.uuid == uuid).cloned()
    }

    pub fn players(&self) -> Vec<Entity> {
        self.entities
            .read()
            .iter()
            .filter(|e| e.is_player())
            .cloned()
            .collect()
    }

    pub fn player_by_name(&self, name: &str) -> Option<Entity> {
        self.entities
            .read()
            .iter()
            .find(|e| e.is_player() && e.name == name)
            .cloned()
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    pub fn broadcast(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(message = %message, "Broadcast");
        self.messages.lock().push(message);
    }

    /// Everything broadcast so far
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    pub fn resource_handles(&self) -> &HandleTracker {
        &self.resource_handles
    }

    pub fn datapack_dirs(&self) -> Vec<PathBuf> {
        self.datapack_dirs.read().clone()
    }

    pub fn set_datapack_dirs(&self, dirs: Vec<PathBuf>) {
        *self.datapack_dirs.write() = dirs;
    }
}

/// A running dedicated server of one release
pub trait MinecraftServer: Send + Sync + 'static {
    /// Release number, e.g. "1.16.1"
    fn version(&self) -> &'static str;

    /// Bukkit-style version string, e.g. "1.16.1-R0.1-SNAPSHOT"
    fn bukkit_version(&self) -> String {
        format!("{}-R0.1-SNAPSHOT", self.version())
    }

    fn core(&self) -> &Arc<ServerCore>;

    /// Dispatcher commands are currently executed against
    fn command_dispatcher(&self) -> Arc<CommandDispatcher>;

    /// Functions and tags currently visible to commands
    fn function_library(&self) -> Arc<FunctionLibrary>;

    fn as_any(&self) -> &dyn Any;
}
