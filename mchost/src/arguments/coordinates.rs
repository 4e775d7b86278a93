//! World (`~`) and local (`^`) coordinates, rotations and swizzles

use crate::brigadier::{ArgumentType, CommandSyntaxError, ParsedValue, StringReader};
use crate::source::CommandListenerWrapper;
use crate::world::{Vec2, Vec3};
use serde_json::json;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldCoordinate {
    relative: bool,
    value: f64,
}

impl WorldCoordinate {
    pub fn absolute(value: f64) -> Self {
        Self {
            relative: false,
            value,
        }
    }

    pub fn relative(value: f64) -> Self {
        Self {
            relative: true,
            value,
        }
    }

    pub fn is_relative(&self) -> bool {
        self.relative
    }

    pub fn get(&self, base: f64) -> f64 {
        if self.relative {
            self.value + base
        } else {
            self.value
        }
    }

    fn read_relative(reader: &mut StringReader<'_>) -> Result<Option<f64>, CommandSyntaxError> {
        if reader.peek() != Some('~') {
            return Ok(None);
        }
        reader.skip();
        let offset = match reader.peek() {
            Some(c) if c != ' ' => reader.read_double()?,
            _ => 0.0,
        };
        Ok(Some(offset))
    }

    fn check_not_local(reader: &StringReader<'_>) -> Result<(), CommandSyntaxError> {
        if reader.peek() == Some('^') {
            return Err(mixed_error(reader));
        }
        Ok(())
    }

    /// A block coordinate: absolute values must be whole numbers
    pub fn parse_int(reader: &mut StringReader<'_>) -> Result<Self, CommandSyntaxError> {
        Self::check_not_local(reader)?;
        if !reader.can_read() {
            return Err(reader.error("argument.pos.missing.int", "Expected a block position"));
        }
        if let Some(offset) = Self::read_relative(reader)? {
            return Ok(Self::relative(offset));
        }
        Ok(Self::absolute(reader.read_int()? as f64))
    }

    /// A precise coordinate; whole numbers are moved to the block centre when `center` is set
    pub fn parse_double(
        reader: &mut StringReader<'_>,
        center: bool,
    ) -> Result<Self, CommandSyntaxError> {
        Self::check_not_local(reader)?;
        if !reader.can_read() {
            return Err(reader.error("argument.pos.missing.double", "Expected a coordinate"));
        }
        if let Some(offset) = Self::read_relative(reader)? {
            return Ok(Self::relative(offset));
        }
        let start = reader.cursor();
        let mut value = reader.read_double()?;
        if center && !reader.read_since(start).contains('.') {
            value += 0.5;
        }
        Ok(Self::absolute(value))
    }
}

fn mixed_error(reader: &StringReader<'_>) -> CommandSyntaxError {
    reader.error(
        "argument.pos.mixed",
        "Cannot mix world & local coordinates (everything must either use ^ or not)",
    )
}

fn expect_separator(
    reader: &mut StringReader<'_>,
    key: &'static str,
    message: &'static str,
    start: usize,
) -> Result<(), CommandSyntaxError> {
    if reader.peek() != Some(' ') {
        reader.set_cursor(start);
        return Err(reader.error(key, message));
    }
    reader.skip();
    Ok(())
}

/// Parsed coordinates, resolved against a source later
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coordinates {
    World {
        x: WorldCoordinate,
        y: WorldCoordinate,
        z: WorldCoordinate,
    },
    Local {
        left: f64,
        up: f64,
        forwards: f64,
    },
}

const INCOMPLETE_3D: &str = "Incomplete (expected 3 coordinates)";
const INCOMPLETE_2D: &str = "Incomplete (expected 2 coordinates)";

impl Coordinates {
    fn read_local(reader: &mut StringReader<'_>) -> Result<Self, CommandSyntaxError> {
        let start = reader.cursor();
        let mut values = [0.0; 3];
        for (i, value) in values.iter_mut().enumerate() {
            if i > 0 {
                expect_separator(reader, "argument.pos3d.incomplete", INCOMPLETE_3D, start)?;
            }
            if reader.peek() != Some('^') {
                return Err(mixed_error(reader));
            }
            reader.skip();
            *value = match reader.peek() {
                Some(c) if c != ' ' => reader.read_double()?,
                _ => 0.0,
            };
        }
        Ok(Self::Local {
            left: values[0],
            up: values[1],
            forwards: values[2],
        })
    }

    fn read_world(
        reader: &mut StringReader<'_>,
        read: impl Fn(&mut StringReader<'_>) -> Result<WorldCoordinate, CommandSyntaxError>,
    ) -> Result<Self, CommandSyntaxError> {
        let start = reader.cursor();
        let x = read(reader)?;
        expect_separator(reader, "argument.pos3d.incomplete", INCOMPLETE_3D, start)?;
        let y = read(reader)?;
        expect_separator(reader, "argument.pos3d.incomplete", INCOMPLETE_3D, start)?;
        let z = read(reader)?;
        Ok(Self::World { x, y, z })
    }

    pub fn parse_int(reader: &mut StringReader<'_>) -> Result<Self, CommandSyntaxError> {
        if reader.peek() == Some('^') {
            Self::read_local(reader)
        } else {
            Self::read_world(reader, WorldCoordinate::parse_int)
        }
    }

    pub fn parse_double(
        reader: &mut StringReader<'_>,
        center: bool,
    ) -> Result<Self, CommandSyntaxError> {
        if reader.peek() == Some('^') {
            Self::read_local(reader)
        } else {
            Self::read_world(reader, |r| WorldCoordinate::parse_double(r, center))
        }
    }

    /// Two horizontal coordinates; y is kept relative to the source
    pub fn parse_2d(
        reader: &mut StringReader<'_>,
        read: impl Fn(&mut StringReader<'_>) -> Result<WorldCoordinate, CommandSyntaxError>,
    ) -> Result<Self, CommandSyntaxError> {
        let start = reader.cursor();
        if !reader.can_read() {
            return Err(reader.error("argument.pos2d.incomplete", INCOMPLETE_2D));
        }
        let x = read(reader)?;
        expect_separator(reader, "argument.pos2d.incomplete", INCOMPLETE_2D, start)?;
        let z = read(reader)?;
        Ok(Self::World {
            x,
            y: WorldCoordinate::relative(0.0),
            z,
        })
    }

    pub fn position(&self, source: &CommandListenerWrapper) -> Vec3 {
        let base = source.position();
        match *self {
            Self::World { x, y, z } => Vec3::new(x.get(base.x), y.get(base.y), z.get(base.z)),
            Self::Local { left, up, forwards } => {
                let rotation = source.rotation();
                let yaw = (rotation.y + 90.0).to_radians() as f64;
                let pitch = (-rotation.x).to_radians() as f64;
                let pitch_up = (-rotation.x + 90.0).to_radians() as f64;
                let forward_vec = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos());
                let up_vec = Vec3::new(
                    yaw.cos() * pitch_up.cos(),
                    pitch_up.sin(),
                    yaw.sin() * pitch_up.cos(),
                );
                let left_vec = forward_vec.cross(&up_vec).scale(-1.0);
                Vec3::new(
                    base.x + forward_vec.x * forwards + up_vec.x * up + left_vec.x * left,
                    base.y + forward_vec.y * forwards + up_vec.y * up + left_vec.y * left,
                    base.z + forward_vec.z * forwards + up_vec.z * up + left_vec.z * left,
                )
            }
        }
    }

    pub fn block_pos(&self, source: &CommandListenerWrapper) -> (i32, i32, i32) {
        let pos = self.position(source);
        (pos.x.floor() as i32, pos.y.floor() as i32, pos.z.floor() as i32)
    }

    /// Interpret the first two coordinates as yaw and pitch
    pub fn rotation(&self, source: &CommandListenerWrapper) -> Vec2 {
        let base = source.rotation();
        match *self {
            Self::World { x, y, .. } => {
                Vec2::new(y.get(base.x as f64) as f32, x.get(base.y as f64) as f32)
            }
            Self::Local { .. } => Vec2::default(),
        }
    }

    pub fn is_x_relative(&self) -> bool {
        match self {
            Self::World { x, .. } => x.is_relative(),
            Self::Local { .. } => true,
        }
    }
}

/// `minecraft:block_pos`
pub struct BlockPosParser;

impl ArgumentType for BlockPosParser {
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<ParsedValue, CommandSyntaxError> {
        Coordinates::parse_int(reader).map(ParsedValue::new)
    }

    fn id(&self) -> &'static str {
        "minecraft:block_pos"
    }

    fn examples(&self) -> &'static [&'static str] {
        &["0 0 0", "~ ~ ~", "^ ^ ^", "^1 ^ ^-5", "~0.5 ~1 ~-5"]
    }
}

/// `minecraft:vec3`
pub struct Vec3Parser {
    pub center_correct: bool,
}

impl ArgumentType for Vec3Parser {
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<ParsedValue, CommandSyntaxError> {
        Coordinates::parse_double(reader, self.center_correct).map(ParsedValue::new)
    }

    fn id(&self) -> &'static str {
        "minecraft:vec3"
    }

    fn examples(&self) -> &'static [&'static str] {
        &["0 0 0", "~ ~ ~", "^ ^ ^", "^1 ^ ^-5", "0.1 -0.5 .9"]
    }
}

/// `minecraft:column_pos`
pub struct ColumnPosParser;

impl ArgumentType for ColumnPosParser {
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<ParsedValue, CommandSyntaxError> {
        Coordinates::parse_2d(reader, WorldCoordinate::parse_int).map(ParsedValue::new)
    }

    fn id(&self) -> &'static str {
        "minecraft:column_pos"
    }
}

/// `minecraft:vec2`
pub struct Vec2Parser {
    pub center_correct: bool,
}

impl ArgumentType for Vec2Parser {
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<ParsedValue, CommandSyntaxError> {
        let center = self.center_correct;
        Coordinates::parse_2d(reader, |r| WorldCoordinate::parse_double(r, center))
            .map(ParsedValue::new)
    }

    fn id(&self) -> &'static str {
        "minecraft:vec2"
    }
}

/// Yaw then pitch, `minecraft:rotation`
pub struct RotationParser;

impl ArgumentType for RotationParser {
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<ParsedValue, CommandSyntaxError> {
        let start = reader.cursor();
        if !reader.can_read() {
            return Err(reader.error("argument.rotation.incomplete", "Incomplete (expected 2 coordinates)"));
        }
        let yaw = WorldCoordinate::parse_double(reader, false)?;
        if reader.peek() != Some(' ') {
            reader.set_cursor(start);
            return Err(reader.error(
                "argument.rotation.incomplete",
                "Incomplete (expected 2 coordinates)",
            ));
        }
        reader.skip();
        let pitch = WorldCoordinate::parse_double(reader, false)?;
        Ok(ParsedValue::new(Coordinates::World {
            x: yaw,
            y: pitch,
            z: WorldCoordinate::relative(0.0),
        }))
    }

    fn id(&self) -> &'static str {
        "minecraft:rotation"
    }
}

/// Which axes, `minecraft:swizzle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    X,
    Y,
    Z,
}

pub struct SwizzleParser;

impl ArgumentType for SwizzleParser {
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<ParsedValue, CommandSyntaxError> {
        let mut axes = BTreeSet::new();
        while let Some(c) = reader.peek().filter(|c| *c != ' ') {
            let axis = match c {
                'x' => Direction::X,
                'y' => Direction::Y,
                'z' => Direction::Z,
                _ => return Err(swizzle_error(reader)),
            };
            if !axes.insert(axis) {
                return Err(swizzle_error(reader));
            }
            reader.skip();
        }
        if axes.is_empty() {
            return Err(swizzle_error(reader));
        }
        Ok(ParsedValue::new(axes))
    }

    fn id(&self) -> &'static str {
        "minecraft:swizzle"
    }

    fn properties(&self) -> Option<serde_json::Value> {
        Some(json!({}))
    }
}

fn swizzle_error(reader: &StringReader<'_>) -> CommandSyntaxError {
    reader.error(
        "arguments.swizzle.invalid",
        "Invalid swizzle, expected combination of 'x', 'y' and 'z'",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_int(input: &str) -> Result<Coordinates, CommandSyntaxError> {
        Coordinates::parse_int(&mut StringReader::new(input))
    }

    #[test]
    fn test_block_pos_absolute() {
        let coords = parse_int("10 64 -10").unwrap();
        assert_eq!(
            coords,
            Coordinates::World {
                x: WorldCoordinate::absolute(10.0),
                y: WorldCoordinate::absolute(64.0),
                z: WorldCoordinate::absolute(-10.0),
            }
        );
    }

    #[test]
    fn test_block_pos_incomplete() {
        let err = parse_int("10 64").unwrap_err();
        assert_eq!(err.key(), "argument.pos3d.incomplete");
    }

    #[test]
    fn test_block_pos_mixed() {
        let err = parse_int("~ ^ ~").unwrap_err();
        assert_eq!(err.key(), "argument.pos.mixed");
    }

    #[test]
    fn test_block_pos_rejects_words() {
        let err = parse_int("10 sixty -10").unwrap_err();
        assert_eq!(err.key(), "parsing.int.expect");
    }

    #[test]
    fn test_center_correction() {
        let mut reader = StringReader::new("10 64.0 -10");
        let coords = Coordinates::parse_double(&mut reader, true).unwrap();
        let Coordinates::World { x, y, z } = coords else {
            panic!("expected world coordinates");
        };
        assert_eq!(x.get(0.0), 10.5);
        assert_eq!(y.get(0.0), 64.0);
        assert_eq!(z.get(0.0), -9.5);
    }

    #[test]
    fn test_swizzle() {
        let parsed = SwizzleParser.parse(&mut StringReader::new("zx")).unwrap();
        let axes = parsed.downcast_ref::<BTreeSet<Direction>>().unwrap();
        assert_eq!(axes.len(), 2);
        assert!(SwizzleParser.parse(&mut StringReader::new("xx")).is_err());
    }
}
