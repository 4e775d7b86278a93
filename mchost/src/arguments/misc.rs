use crate::brigadier::{ArgumentType, CommandSyntaxError, ParsedValue, StringReader};
use uuid::Uuid;

/// Game ticks, from `20`, `1.5s` or `2d`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticks(pub i32);

/// `minecraft:time`
pub struct TimeParser;

impl ArgumentType for TimeParser {
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<ParsedValue, CommandSyntaxError> {
        let value = reader.read_float()?;
        let unit = match reader.peek() {
            Some('d') => 24000.0,
            Some('s') => 20.0,
            Some('t') => 1.0,
            Some(' ') | None => 1.0,
            Some(_) => {
                return Err(reader.error("argument.time.invalid_unit", "Invalid unit"));
            }
        };
        if matches!(reader.peek(), Some('d' | 's' | 't')) {
            reader.skip();
        }
        let ticks = (value * unit).round() as i32;
        if ticks < 0 {
            return Err(reader.error(
                "argument.time.invalid_tick_count",
                "Tick count must be non-negative",
            ));
        }
        Ok(ParsedValue::new(Ticks(ticks)))
    }

    fn id(&self) -> &'static str {
        "minecraft:time"
    }

    fn examples(&self) -> &'static [&'static str] {
        &["0d", "0s", "0t", "0"]
    }
}

/// `minecraft:uuid`
pub struct UuidParser;

impl ArgumentType for UuidParser {
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<ParsedValue, CommandSyntaxError> {
        let start = reader.cursor();
        let text = reader.read_while(|c| c.is_ascii_hexdigit() || c == '-');
        if text.split('-').count() == 5 {
            if let Ok(uuid) = Uuid::parse_str(text) {
                return Ok(ParsedValue::new(uuid));
            }
        }
        reader.set_cursor(start);
        Err(reader.error("argument.uuid.invalid", "Invalid UUID"))
    }

    fn id(&self) -> &'static str {
        "minecraft:uuid"
    }

    fn examples(&self) -> &'static [&'static str] {
        &["dd12be42-52a9-4a91-a8a1-11c01849e498"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticks(input: &str) -> i32 {
        let parsed = TimeParser.parse(&mut StringReader::new(input)).unwrap();
        parsed.downcast_ref::<Ticks>().unwrap().0
    }

    #[test]
    fn test_time_units() {
        assert_eq!(ticks("20"), 20);
        assert_eq!(ticks("1.5s"), 30);
        assert_eq!(ticks("2d"), 48000);
        assert_eq!(ticks("5t"), 5);
        assert!(TimeParser.parse(&mut StringReader::new("5x")).is_err());
    }

    #[test]
    fn test_uuid_requires_hyphenated_form() {
        let ok = UuidParser.parse(&mut StringReader::new("dd12be42-52a9-4a91-a8a1-11c01849e498"));
        assert!(ok.is_ok());
        let err = UuidParser
            .parse(&mut StringReader::new("dd12be4252a94a91a8a111c01849e498"))
            .unwrap_err();
        assert_eq!(err.key(), "argument.uuid.invalid");
    }
}
