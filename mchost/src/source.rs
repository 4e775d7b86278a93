//! Who is running a command, and where

use crate::server::{MinecraftServer, ServerCore};
use crate::world::{Entity, Vec2, Vec3};
use std::sync::Arc;
use uuid::Uuid;

/// Permission level of the console and of functions run by the server
pub const OWNER_PERMISSION_LEVEL: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSender {
    Console,
    Player(Uuid),
    Entity(Uuid),
}

/// The source of a command: sender, executing entity, position and server
#[derive(Clone)]
pub struct CommandListenerWrapper {
    sender: CommandSender,
    entity: Option<Uuid>,
    name: String,
    world: String,
    position: Vec3,
    rotation: Vec2,
    permission_level: i32,
    server: Arc<dyn MinecraftServer>,
}

impl CommandListenerWrapper {
    pub fn console(server: Arc<dyn MinecraftServer>) -> Self {
        let world = server.core().default_world().to_string();
        Self {
            sender: CommandSender::Console,
            entity: None,
            name: "Server".to_string(),
            world,
            position: Vec3::ZERO,
            rotation: Vec2::default(),
            permission_level: OWNER_PERMISSION_LEVEL,
            server,
        }
    }

    /// A source for an entity running a command itself
    pub fn of_entity(server: Arc<dyn MinecraftServer>, entity: &Entity) -> Self {
        let sender = if entity.is_player() {
            CommandSender::Player(entity.uuid)
        } else {
            CommandSender::Entity(entity.uuid)
        };
        Self {
            sender,
            entity: Some(entity.uuid),
            name: entity.name.clone(),
            world: entity.world.clone(),
            position: entity.position,
            rotation: entity.rotation,
            permission_level: if entity.is_player() { 0 } else { 2 },
            server,
        }
    }

    /// The same sender, executing as another entity at its position
    pub fn with_entity(&self, entity: &Entity) -> Self {
        Self {
            entity: Some(entity.uuid),
            name: entity.name.clone(),
            world: entity.world.clone(),
            position: entity.position,
            rotation: entity.rotation,
            ..self.clone()
        }
    }

    pub fn with_position(&self, position: Vec3) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }

    pub fn with_permission(&self, level: i32) -> Self {
        Self {
            permission_level: level,
            ..self.clone()
        }
    }

    pub fn sender(&self) -> CommandSender {
        self.sender
    }

    pub fn entity_uuid(&self) -> Option<Uuid> {
        self.entity
    }

    /// The executing entity, if it is still loaded
    pub fn entity(&self) -> Option<Entity> {
        self.core().entity(self.entity?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn world(&self) -> &str {
        &self.world
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Vec2 {
        self.rotation
    }

    pub fn permission_level(&self) -> i32 {
        self.permission_level
    }

    pub fn has_permission(&self, level: i32) -> bool {
        self.permission_level >= level
    }

    pub fn server(&self) -> &Arc<dyn MinecraftServer> {
        &self.server
    }

    pub fn core(&self) -> &Arc<ServerCore> {
        self.server.core()
    }

    pub fn send_message(&self, message: impl Into<String>) {
        self.core().broadcast(message);
    }
}
