//! Who ran a command

use crate::{Location, NamespacedKey};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A snapshot of an entity taken when the argument was resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRef {
    pub uuid: Uuid,
    pub name: String,
    pub entity_type: NamespacedKey,
    pub location: Location,
}

impl EntityRef {
    pub fn is_player(&self) -> bool {
        self.entity_type == NamespacedKey::minecraft("player")
    }
}

/// An online player
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerRef {
    pub name: String,
    pub uuid: Uuid,
}

/// The sender of a command
///
/// `Proxied` is produced when a command runs through `execute as`, so the
/// entity executing it differs from whoever typed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Sender {
    Console,
    Player(PlayerRef),
    Entity(EntityRef),
    Proxied {
        caller: Box<Sender>,
        callee: EntityRef,
    },
}

impl Sender {
    pub fn name(&self) -> &str {
        match self {
            Sender::Console => "Server",
            Sender::Player(p) => &p.name,
            Sender::Entity(e) => &e.name,
            Sender::Proxied { callee, .. } => &callee.name,
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self, Sender::Player(_))
    }
}
