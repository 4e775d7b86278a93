//! `min..max` bounds

use crate::brigadier::{ArgumentType, CommandSyntaxError, ParsedValue, StringReader};
use serde_json::json;
use std::marker::PhantomData;

/// Optional lower and upper bounds, both inclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T> {
    min: Option<T>,
    max: Option<T>,
}

impl<T: Copy + PartialOrd> Bounds<T> {
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    pub fn exactly(value: T) -> Self {
        Self::new(Some(value), Some(value))
    }

    pub fn min(&self) -> Option<T> {
        self.min
    }

    pub fn max(&self) -> Option<T> {
        self.max
    }

    pub fn matches(&self, value: T) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// Numbers a range can hold
pub trait RangeNumber: Copy + PartialOrd + Send + Sync + 'static {
    const PARSER_ID: &'static str;
    const WHOLE: bool;

    fn parse_number(text: &str) -> Option<Self>;
}

impl RangeNumber for i32 {
    const PARSER_ID: &'static str = "minecraft:int_range";
    const WHOLE: bool = true;

    fn parse_number(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

impl RangeNumber for f32 {
    const PARSER_ID: &'static str = "minecraft:float_range";
    const WHOLE: bool = false;

    fn parse_number(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

impl RangeNumber for f64 {
    const PARSER_ID: &'static str = "minecraft:float_range";
    const WHOLE: bool = false;

    fn parse_number(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

/// `minecraft:int_range` and `minecraft:float_range`
pub struct RangeParser<T> {
    _number: PhantomData<fn() -> T>,
}

impl<T: RangeNumber> Default for RangeParser<T> {
    fn default() -> Self {
        Self {
            _number: PhantomData,
        }
    }
}

impl<T: RangeNumber> RangeParser<T> {
    fn read_number(reader: &mut StringReader<'_>) -> Result<Option<T>, CommandSyntaxError> {
        let start = reader.cursor();
        while let Some(c) = reader.peek() {
            let rest = reader.remaining();
            if c.is_ascii_digit() || c == '-' || (c == '.' && !rest.starts_with("..")) {
                reader.skip();
            } else {
                break;
            }
        }
        let text = reader.read_since(start);
        if text.is_empty() {
            return Ok(None);
        }
        if T::WHOLE && text.contains('.') {
            reader.set_cursor(start);
            return Err(reader.error(
                "argument.range.ints",
                "Only whole numbers allowed, not decimals",
            ));
        }
        match T::parse_number(text) {
            Some(value) => Ok(Some(value)),
            None => {
                reader.set_cursor(start);
                Err(reader.error("parsing.float.invalid", format!("Invalid number '{}'", text)))
            }
        }
    }

    pub fn read_bounds(reader: &mut StringReader<'_>) -> Result<Bounds<T>, CommandSyntaxError> {
        let start = reader.cursor();
        if !reader.can_read() {
            return Err(reader.error("argument.range.empty", "Expected value or range of values"));
        }
        let min = Self::read_number(reader)?;
        let max = if reader.remaining().starts_with("..") {
            reader.skip();
            reader.skip();
            Self::read_number(reader)?
        } else {
            min
        };
        if min.is_none() && max.is_none() {
            reader.set_cursor(start);
            return Err(reader.error("argument.range.empty", "Expected value or range of values"));
        }
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                reader.set_cursor(start);
                return Err(reader.error("argument.range.swapped", "Min cannot be bigger than max"));
            }
        }
        Ok(Bounds::new(min, max))
    }
}

impl<T: RangeNumber> ArgumentType for RangeParser<T> {
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<ParsedValue, CommandSyntaxError> {
        Self::read_bounds(reader).map(ParsedValue::new)
    }

    fn id(&self) -> &'static str {
        T::PARSER_ID
    }

    fn properties(&self) -> Option<serde_json::Value> {
        Some(json!({ "decimals": !T::WHOLE }))
    }

    fn examples(&self) -> &'static [&'static str] {
        &["0..5", "0", "-5", "-100..", "..100"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(input: &str) -> Result<Bounds<i32>, CommandSyntaxError> {
        RangeParser::<i32>::read_bounds(&mut StringReader::new(input))
    }

    #[test]
    fn test_int_bounds() {
        assert_eq!(ints("1..5").unwrap(), Bounds::new(Some(1), Some(5)));
        assert_eq!(ints("..5").unwrap(), Bounds::new(None, Some(5)));
        assert_eq!(ints("-3..").unwrap(), Bounds::new(Some(-3), None));
        assert_eq!(ints("7").unwrap(), Bounds::exactly(7));
    }

    #[test]
    fn test_int_bounds_errors() {
        assert_eq!(ints("1.5..2").unwrap_err().key(), "argument.range.ints");
        assert_eq!(ints("5..1").unwrap_err().key(), "argument.range.swapped");
        assert_eq!(ints("..").unwrap_err().key(), "argument.range.empty");
    }

    #[test]
    fn test_float_bounds() {
        let bounds = RangeParser::<f32>::read_bounds(&mut StringReader::new("0.5..2.5")).unwrap();
        assert_eq!(bounds, Bounds::new(Some(0.5), Some(2.5)));
        assert!(bounds.matches(2.5));
        assert!(!bounds.matches(2.6));
    }
}
