//! Objectives, teams and scores

use crate::chat::Formatting;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

/// Criteria an objective may be created with
pub const CRITERIA: &[&str] = &[
    "dummy",
    "trigger",
    "deathCount",
    "playerKillCount",
    "totalKillCount",
    "health",
    "xp",
    "level",
    "food",
    "air",
    "armor",
];

/// One mutable score value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreboardScore {
    score: i32,
}

impl ScoreboardScore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_score(&self) -> i32 {
        self.score
    }

    pub fn set_score(&mut self, score: i32) {
        self.score = score;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Objective {
    pub name: String,
    pub criteria: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub name: String,
    pub color: Option<Formatting>,
}

#[derive(Debug, Default)]
pub struct Scoreboard {
    objectives: RwLock<BTreeMap<String, Objective>>,
    teams: RwLock<BTreeMap<String, Team>>,
    scores: RwLock<HashMap<(String, String), i32>>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_objective(&self, name: impl Into<String>, criteria: impl Into<String>) {
        let name = name.into();
        self.objectives.write().insert(
            name.clone(),
            Objective {
                name,
                criteria: criteria.into(),
            },
        );
    }

    pub fn objective(&self, name: &str) -> Option<Objective> {
        self.objectives.read().get(name).cloned()
    }

    pub fn add_team(&self, name: impl Into<String>, color: Option<Formatting>) {
        let name = name.into();
        self.teams
            .write()
            .insert(name.clone(), Team { name, color });
    }

    pub fn team(&self, name: &str) -> Option<Team> {
        self.teams.read().get(name).cloned()
    }

    pub fn set_score(&self, holder: &str, objective: &str, value: i32) {
        self.scores
            .write()
            .insert((holder.to_string(), objective.to_string()), value);
    }

    pub fn score(&self, holder: &str, objective: &str) -> Option<i32> {
        self.scores
            .read()
            .get(&(holder.to_string(), objective.to_string()))
            .copied()
    }

    /// Every name holding at least one score
    pub fn tracked_holders(&self) -> Vec<String> {
        let mut holders: Vec<String> = self.scores.read().keys().map(|(h, _)| h.clone()).collect();
        holders.sort();
        holders.dedup();
        holders
    }
}

/// Display slot index for a slot name (`list`, `sidebar.team.red`, ...)
pub fn display_slot_index(name: &str) -> Option<i32> {
    match name {
        "list" => Some(0),
        "sidebar" => Some(1),
        "belowName" => Some(2),
        _ => {
            let color = name.strip_prefix("sidebar.team.")?;
            let formatting = Formatting::by_name(color)?;
            formatting.color_index().map(|i| 3 + i as i32)
        }
    }
}
