//! Positions, rotations and axes

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A point in a world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// World name (e.g. "world", "world_nether")
    pub world: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
}

impl Location {
    pub fn new(world: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    pub fn block_x(&self) -> i32 {
        self.x.floor() as i32
    }

    pub fn block_y(&self) -> i32 {
        self.y.floor() as i32
    }

    pub fn block_z(&self) -> i32 {
        self.z.floor() as i32
    }
}

/// A point on the x/z plane of a world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location2D {
    pub world: String,
    pub x: f64,
    pub z: f64,
}

impl Location2D {
    pub fn new(world: impl Into<String>, x: f64, z: f64) -> Self {
        Self {
            world: world.into(),
            x,
            z,
        }
    }
}

/// Yaw and pitch, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub yaw: f32,
    pub pitch: f32,
}

impl Rotation {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }

    /// Yaw wrapped into `[-180, 180)`
    pub fn normalized_yaw(&self) -> f32 {
        let yaw = self.yaw % 360.0;
        if yaw >= 180.0 {
            yaw - 360.0
        } else if yaw < -180.0 {
            yaw + 360.0
        } else {
            yaw
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Collect the axes named in a swizzle such as "xz"
    pub fn set_from(axes: impl IntoIterator<Item = Axis>) -> BTreeSet<Axis> {
        axes.into_iter().collect()
    }
}

/// World environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Normal,
    Nether,
    TheEnd,
}
