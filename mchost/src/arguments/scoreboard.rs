//! Objectives, criteria, teams, display slots and score operations

use crate::brigadier::{ArgumentType, CommandSyntaxError, ParsedValue, StringReader};
use crate::scoreboard::{display_slot_index, ScoreboardScore, CRITERIA};
use std::fmt;
use std::sync::Arc;

/// Objective or team name, looked up when the command runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreboardName(pub String);

/// `minecraft:objective` and `minecraft:team`
pub struct ScoreboardNameParser {
    pub id: &'static str,
}

impl ScoreboardNameParser {
    pub const OBJECTIVE: ScoreboardNameParser = ScoreboardNameParser {
        id: "minecraft:objective",
    };
    pub const TEAM: ScoreboardNameParser = ScoreboardNameParser {
        id: "minecraft:team",
    };
}

impl ArgumentType for ScoreboardNameParser {
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<ParsedValue, CommandSyntaxError> {
        let name = reader.read_unquoted_string();
        if name.is_empty() {
            return Err(reader.error("argument.scoreboard.name", "Expected a name"));
        }
        if name.len() > 16 {
            return Err(reader.error(
                "commands.scoreboard.objectives.add.longName",
                "Objective names cannot be longer than 16 characters",
            ));
        }
        Ok(ParsedValue::new(ScoreboardName(name.to_string())))
    }

    fn id(&self) -> &'static str {
        self.id
    }
}

/// `minecraft:objective_criteria`
pub struct CriteriaParser;

impl ArgumentType for CriteriaParser {
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<ParsedValue, CommandSyntaxError> {
        let start = reader.cursor();
        let name = reader.read_while(|c| c != ' ');
        if CRITERIA.contains(&name) {
            Ok(ParsedValue::new(name.to_string()))
        } else {
            reader.set_cursor(start);
            Err(reader.error(
                "argument.criteria.invalid",
                format!("Unknown criterion '{}'", name),
            ))
        }
    }

    fn id(&self) -> &'static str {
        "minecraft:objective_criteria"
    }
}

/// Host display slot index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySlotIndex(pub i32);

/// `minecraft:scoreboard_slot`
pub struct ScoreboardSlotParser;

impl ArgumentType for ScoreboardSlotParser {
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<ParsedValue, CommandSyntaxError> {
        let start = reader.cursor();
        let name = reader.read_unquoted_string();
        match display_slot_index(name) {
            Some(index) => Ok(ParsedValue::new(DisplaySlotIndex(index))),
            None => {
                reader.set_cursor(start);
                Err(reader.error(
                    "argument.scoreboardDisplaySlot.invalid",
                    format!("Unknown display slot '{}'", name),
                ))
            }
        }
    }

    fn id(&self) -> &'static str {
        "minecraft:scoreboard_slot"
    }

    fn examples(&self) -> &'static [&'static str] {
        &["sidebar", "foo.bar"]
    }
}

type ApplyFn = dyn Fn(&mut ScoreboardScore, &mut ScoreboardScore) -> Result<(), CommandSyntaxError>
    + Send
    + Sync;

/// A score operation; only its effect on two scores is observable
#[derive(Clone)]
pub struct Operation(Arc<ApplyFn>);

impl Operation {
    pub fn apply(
        &self,
        target: &mut ScoreboardScore,
        source: &mut ScoreboardScore,
    ) -> Result<(), CommandSyntaxError> {
        (self.0)(target, source)
    }

    fn simple(f: fn(i32, i32) -> i32) -> Self {
        Self(Arc::new(move |a: &mut ScoreboardScore, b: &mut ScoreboardScore| {
            a.set_score(f(a.get_score(), b.get_score()));
            Ok(())
        }))
    }

    fn div0() -> CommandSyntaxError {
        CommandSyntaxError::new("arguments.operation.div0", "Cannot divide by zero")
    }

    fn by_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "=" => Self::simple(|_, b| b),
            "+=" => Self::simple(i32::wrapping_add),
            "-=" => Self::simple(i32::wrapping_sub),
            "*=" => Self::simple(i32::wrapping_mul),
            "/=" => Self(Arc::new(|a: &mut ScoreboardScore, b: &mut ScoreboardScore| {
                if b.get_score() == 0 {
                    return Err(Self::div0());
                }
                a.set_score(floor_div(a.get_score(), b.get_score()));
                Ok(())
            })),
            "%=" => Self(Arc::new(|a: &mut ScoreboardScore, b: &mut ScoreboardScore| {
                if b.get_score() == 0 {
                    return Err(Self::div0());
                }
                let (x, y) = (a.get_score(), b.get_score());
                a.set_score(x.wrapping_sub(floor_div(x, y).wrapping_mul(y)));
                Ok(())
            })),
            "<" => Self::simple(i32::min),
            ">" => Self::simple(i32::max),
            "><" => Self(Arc::new(|a: &mut ScoreboardScore, b: &mut ScoreboardScore| {
                std::mem::swap(a, b);
                Ok(())
            })),
            _ => return None,
        };
        Some(op)
    }
}

/// Division rounding toward negative infinity
fn floor_div(x: i32, y: i32) -> i32 {
    let q = x.wrapping_div(y);
    if x.wrapping_rem(y) != 0 && ((x < 0) != (y < 0)) {
        q - 1
    } else {
        q
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Operation")
    }
}

/// `minecraft:operation`
pub struct OperationParser;

impl ArgumentType for OperationParser {
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<ParsedValue, CommandSyntaxError> {
        let start = reader.cursor();
        let symbol = reader.read_while(|c| c != ' ');
        match Operation::by_symbol(symbol) {
            Some(op) => Ok(ParsedValue::new(op)),
            None => {
                reader.set_cursor(start);
                Err(reader.error("arguments.operation.invalid", "Invalid operation"))
            }
        }
    }

    fn id(&self) -> &'static str {
        "minecraft:operation"
    }

    fn examples(&self) -> &'static [&'static str] {
        &["=", ">", "<"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(symbol: &str, left: i32, right: i32) -> (i32, i32) {
        let op = Operation::by_symbol(symbol).unwrap();
        let mut a = ScoreboardScore::new();
        let mut b = ScoreboardScore::new();
        a.set_score(left);
        b.set_score(right);
        op.apply(&mut a, &mut b).unwrap();
        (a.get_score(), b.get_score())
    }

    #[test]
    fn test_operations() {
        assert_eq!(run("+=", 6, 2), (8, 2));
        assert_eq!(run("%=", 6, 2), (0, 2));
        assert_eq!(run("<", 6, 2), (2, 2));
        assert_eq!(run("><", 6, 2), (2, 6));
        assert_eq!(run("=", 6, 2), (2, 2));
    }

    #[test]
    fn test_divide_by_zero() {
        let op = Operation::by_symbol("/=").unwrap();
        let mut a = ScoreboardScore::new();
        let mut b = ScoreboardScore::new();
        let err = op.apply(&mut a, &mut b).unwrap_err();
        assert_eq!(err.key(), "arguments.operation.div0");
    }
}
