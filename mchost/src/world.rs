//! Worlds and the entities in them

use crate::ResourceLocation;
use std::collections::BTreeSet;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance_to(&self, other: &Vec3) -> f64 {
        let (dx, dy, dz) = (self.x - other.x, self.y - other.y, self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn cross(&self, other: &Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn scale(&self, factor: f64) -> Vec3 {
        Vec3::new(self.x * factor, self.y * factor, self.z * factor)
    }
}

/// Pitch (`x`) and yaw (`y`), in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimensionKind {
    Overworld,
    Nether,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub name: String,
    pub dimension: ResourceLocation,
    pub kind: DimensionKind,
}

impl World {
    pub fn new(name: impl Into<String>, dimension: ResourceLocation, kind: DimensionKind) -> Self {
        Self {
            name: name.into(),
            dimension,
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub uuid: Uuid,
    pub name: String,
    pub entity_type: ResourceLocation,
    pub world: String,
    pub position: Vec3,
    pub rotation: Vec2,
    pub tags: BTreeSet<String>,
}

impl Entity {
    pub fn new(
        entity_type: ResourceLocation,
        name: impl Into<String>,
        world: impl Into<String>,
        position: Vec3,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            entity_type,
            world: world.into(),
            position,
            rotation: Vec2::default(),
            tags: BTreeSet::new(),
        }
    }

    pub fn player(name: impl Into<String>, world: impl Into<String>, position: Vec3) -> Self {
        Self::new(ResourceLocation::minecraft("player"), name, world, position)
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn is_player(&self) -> bool {
        self.entity_type.namespace() == crate::key::DEFAULT_NAMESPACE
            && self.entity_type.path() == "player"
    }
}
