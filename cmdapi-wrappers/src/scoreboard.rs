//! Scoreboard display slots and score operations

use crate::ChatColor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an objective is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplaySlot {
    PlayerList,
    Sidebar,
    BelowName,
}

/// A scoreboard display slot, optionally restricted to a team colour
///
/// Built from the host's numeric slot index: 0 list, 1 sidebar, 2 below name,
/// 3..=18 the sidebar shown to members of the team with colour `index - 3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreboardSlot {
    slot: DisplaySlot,
    team_color: Option<ChatColor>,
}

impl ScoreboardSlot {
    pub fn new(slot: DisplaySlot) -> Self {
        Self {
            slot,
            team_color: None,
        }
    }

    pub fn team_sidebar(color: ChatColor) -> Self {
        Self {
            slot: DisplaySlot::Sidebar,
            team_color: Some(color),
        }
    }

    /// Decode a host display slot index
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Self::new(DisplaySlot::PlayerList)),
            1 => Some(Self::new(DisplaySlot::Sidebar)),
            2 => Some(Self::new(DisplaySlot::BelowName)),
            3..=18 => ChatColor::from_color_index((index - 3) as u8).map(Self::team_sidebar),
            _ => None,
        }
    }

    pub fn display_slot(&self) -> DisplaySlot {
        self.slot
    }

    pub fn team_color(&self) -> Option<ChatColor> {
        self.team_color
    }

    pub fn has_team_color(&self) -> bool {
        self.team_color.is_some()
    }
}

/// An arithmetic operation between two scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MathOperation {
    Assign,
    Add,
    Subtract,
    Multiply,
    Divide,
    Mod,
    Min,
    Max,
    Swap,
}

impl MathOperation {
    /// The operator as typed in a command (`+=`, `><`, ...)
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::Add => "+=",
            Self::Subtract => "-=",
            Self::Multiply => "*=",
            Self::Divide => "/=",
            Self::Mod => "%=",
            Self::Min => "<",
            Self::Max => ">",
            Self::Swap => "><",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        [
            Self::Assign,
            Self::Add,
            Self::Subtract,
            Self::Multiply,
            Self::Divide,
            Self::Mod,
            Self::Min,
            Self::Max,
            Self::Swap,
        ]
        .into_iter()
        .find(|op| op.symbol() == symbol)
    }
}

impl fmt::Display for MathOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_from_index() {
        assert_eq!(
            ScoreboardSlot::from_index(1).map(|s| s.display_slot()),
            Some(DisplaySlot::Sidebar)
        );
        let team = ScoreboardSlot::from_index(3 + 12).unwrap();
        assert_eq!(team.team_color(), Some(ChatColor::Red));
        assert_eq!(ScoreboardSlot::from_index(19), None);
    }

    #[test]
    fn test_symbols_round_trip() {
        for op in [MathOperation::Swap, MathOperation::Mod, MathOperation::Min] {
            assert_eq!(MathOperation::from_symbol(op.symbol()), Some(op));
        }
        assert_eq!(MathOperation::from_symbol("=="), None);
    }
}
