//! Entity selectors (`@p`, `@e[type=pig,limit=2]`, player names, UUIDs)

use super::range::{Bounds, RangeParser};
use crate::brigadier::{
    ArgumentType, CommandContext, CommandSyntaxError, ParsedValue, StringReader, Suggestions,
    SuggestionsBuilder,
};
use crate::source::CommandListenerWrapper;
use crate::world::Entity;
use crate::ResourceLocation;
use rand::seq::SliceRandom;
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sort {
    Arbitrary,
    Nearest,
    Furthest,
    Random,
}

#[derive(Debug, Clone, PartialEq)]
enum Target {
    Name(String),
    Uuid(Uuid),
    /// `@s`
    Current,
    Query,
}

/// A parsed selector; resolution happens against a command source
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySelector {
    target: Target,
    max_results: usize,
    include_entities: bool,
    name: Option<(String, bool)>,
    entity_type: Option<(ResourceLocation, bool)>,
    tags: Vec<(String, bool)>,
    distance: Option<Bounds<f64>>,
    sort: Sort,
}

impl EntitySelector {
    fn query(include_entities: bool, max_results: usize, sort: Sort) -> Self {
        Self {
            target: Target::Query,
            max_results,
            include_entities,
            name: None,
            entity_type: None,
            tags: Vec::new(),
            distance: None,
            sort,
        }
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Whether only players can ever match
    pub fn includes_entities(&self) -> bool {
        self.include_entities
            && !matches!(&self.entity_type, Some((t, false)) if t.path() == "player")
    }

    pub fn parse(reader: &mut StringReader<'_>) -> Result<Self, CommandSyntaxError> {
        let start = reader.cursor();
        if reader.peek() == Some('@') {
            reader.skip();
            let mut selector = match reader.read() {
                Some('p') => Self::query(false, 1, Sort::Nearest),
                Some('a') => Self::query(false, usize::MAX, Sort::Arbitrary),
                Some('r') => Self::query(false, 1, Sort::Random),
                Some('e') => Self::query(true, usize::MAX, Sort::Arbitrary),
                Some('s') => Self {
                    target: Target::Current,
                    ..Self::query(true, 1, Sort::Arbitrary)
                },
                other => {
                    reader.set_cursor(start);
                    return Err(reader.error(
                        "argument.entity.selector.unknown",
                        format!("Unknown selector type '@{}'", other.map(String::from).unwrap_or_default()),
                    ));
                }
            };
            if reader.peek() == Some('[') {
                reader.skip();
                selector.parse_options(reader)?;
            }
            return Ok(selector);
        }

        let text = reader.read_while(|c| c != ' ');
        if let Ok(uuid) = Uuid::parse_str(text) {
            return Ok(Self {
                target: Target::Uuid(uuid),
                ..Self::query(true, 1, Sort::Arbitrary)
            });
        }
        if text.is_empty() || text.len() > 16 {
            reader.set_cursor(start);
            return Err(reader.error("argument.entity.invalid", "Invalid name or UUID"));
        }
        Ok(Self {
            target: Target::Name(text.to_string()),
            ..Self::query(false, 1, Sort::Arbitrary)
        })
    }

    fn parse_options(&mut self, reader: &mut StringReader<'_>) -> Result<(), CommandSyntaxError> {
        reader.skip_whitespace();
        while reader.can_read() && reader.peek() != Some(']') {
            reader.skip_whitespace();
            let option_start = reader.cursor();
            let option = reader.read_unquoted_string();
            reader.skip_whitespace();
            if reader.peek() != Some('=') {
                reader.set_cursor(option_start);
                return Err(reader.error(
                    "argument.entity.options.valueless",
                    format!("Expected value for option '{}'", option),
                ));
            }
            reader.skip();
            reader.skip_whitespace();
            self.apply_option(option, option_start, reader)?;
            reader.skip_whitespace();
            match reader.peek() {
                Some(',') => reader.skip(),
                Some(']') => {}
                _ => {
                    return Err(reader.error(
                        "argument.entity.options.unterminated",
                        "Expected end of options",
                    ))
                }
            }
        }
        reader.expect(']').map_err(|_| {
            reader.error("argument.entity.options.unterminated", "Expected end of options")
        })
    }

    fn negated(reader: &mut StringReader<'_>) -> bool {
        if reader.peek() == Some('!') {
            reader.skip();
            reader.skip_whitespace();
            true
        } else {
            false
        }
    }

    fn apply_option(
        &mut self,
        option: &str,
        option_start: usize,
        reader: &mut StringReader<'_>,
    ) -> Result<(), CommandSyntaxError> {
        match option {
            "name" => {
                let negated = Self::negated(reader);
                self.name = Some((reader.read_string()?, negated));
            }
            "type" => {
                let negated = Self::negated(reader);
                let entity_type = ResourceLocation::read(reader)?;
                if !negated {
                    self.include_entities = entity_type.path() != "player";
                }
                self.entity_type = Some((entity_type, negated));
            }
            "tag" => {
                let negated = Self::negated(reader);
                let tag = reader.read_unquoted_string().to_string();
                self.tags.push((tag, negated));
            }
            "limit" => {
                let start = reader.cursor();
                let limit = reader.read_int()?;
                if limit < 1 {
                    reader.set_cursor(start);
                    return Err(reader.error(
                        "argument.entity.options.limit.toosmall",
                        "Limit must be at least 1",
                    ));
                }
                self.max_results = limit as usize;
            }
            "distance" => {
                let start = reader.cursor();
                let bounds = RangeParser::<f64>::read_bounds(reader)?;
                if bounds.min().is_some_and(|m| m < 0.0) || bounds.max().is_some_and(|m| m < 0.0) {
                    reader.set_cursor(start);
                    return Err(reader.error(
                        "argument.entity.options.distance.negative",
                        "Distance cannot be negative",
                    ));
                }
                self.distance = Some(bounds);
            }
            "sort" => {
                let start = reader.cursor();
                self.sort = match reader.read_unquoted_string() {
                    "nearest" => Sort::Nearest,
                    "furthest" => Sort::Furthest,
                    "random" => Sort::Random,
                    "arbitrary" => Sort::Arbitrary,
                    other => {
                        reader.set_cursor(start);
                        return Err(reader.error(
                            "argument.entity.options.sort.irreversible",
                            format!("Invalid or unknown sort type '{}'", other),
                        ));
                    }
                };
            }
            _ => {
                reader.set_cursor(option_start);
                return Err(reader.error(
                    "argument.entity.options.unknown",
                    format!("Unknown option '{}'", option),
                ));
            }
        }
        Ok(())
    }

    fn matches(&self, entity: &Entity, source: &CommandListenerWrapper) -> bool {
        if !self.include_entities && !entity.is_player() {
            return false;
        }
        if let Some((name, negated)) = &self.name {
            if (&entity.name == name) == *negated {
                return false;
            }
        }
        if let Some((entity_type, negated)) = &self.entity_type {
            if (&entity.entity_type == entity_type) == *negated {
                return false;
            }
        }
        for (tag, negated) in &self.tags {
            let has = if tag.is_empty() {
                !entity.tags.is_empty()
            } else {
                entity.tags.contains(tag)
            };
            if has == *negated {
                return false;
            }
        }
        if let Some(distance) = &self.distance {
            if entity.world != source.world()
                || !distance.matches(entity.position.distance_to(&source.position()))
            {
                return false;
            }
        }
        true
    }

    /// All entities this selector picks, honouring sort and limit
    pub fn find_entities(&self, source: &CommandListenerWrapper) -> Vec<Entity> {
        let core = source.core();
        let mut found: Vec<Entity> = match &self.target {
            Target::Name(name) => core.player_by_name(name).into_iter().collect(),
            Target::Uuid(uuid) => core.entity(*uuid).into_iter().collect(),
            Target::Current => source
                .entity()
                .into_iter()
                .filter(|e| self.matches(e, source))
                .collect(),
            Target::Query => core
                .entities()
                .into_iter()
                .filter(|e| self.matches(e, source))
                .collect(),
        };
        let origin = source.position();
        match self.sort {
            Sort::Arbitrary => {}
            Sort::Nearest => found.sort_by(|a, b| {
                a.position
                    .distance_to(&origin)
                    .total_cmp(&b.position.distance_to(&origin))
            }),
            Sort::Furthest => found.sort_by(|a, b| {
                b.position
                    .distance_to(&origin)
                    .total_cmp(&a.position.distance_to(&origin))
            }),
            Sort::Random => found.shuffle(&mut rand::thread_rng()),
        }
        found.truncate(self.max_results);
        found
    }

    pub fn find_players(&self, source: &CommandListenerWrapper) -> Vec<Entity> {
        self.find_entities(source)
            .into_iter()
            .filter(Entity::is_player)
            .collect()
    }

    pub fn find_single_entity(
        &self,
        source: &CommandListenerWrapper,
    ) -> Result<Entity, CommandSyntaxError> {
        let mut found = self.find_entities(source);
        match found.len() {
            0 => Err(no_entities()),
            1 => Ok(found.remove(0)),
            _ => Err(too_many_entities()),
        }
    }

    pub fn find_single_player(
        &self,
        source: &CommandListenerWrapper,
    ) -> Result<Entity, CommandSyntaxError> {
        let mut found = self.find_players(source);
        match found.len() {
            0 => Err(no_players()),
            1 => Ok(found.remove(0)),
            _ => Err(too_many_players()),
        }
    }
}

pub fn no_entities() -> CommandSyntaxError {
    CommandSyntaxError::new("argument.entity.notfound.entity", "No entity was found")
}

pub fn no_players() -> CommandSyntaxError {
    CommandSyntaxError::new("argument.entity.notfound.player", "No player was found")
}

fn too_many_entities() -> CommandSyntaxError {
    CommandSyntaxError::new(
        "argument.entity.toomany",
        "Only one entity is allowed, but the provided selector allows more than one",
    )
}

fn too_many_players() -> CommandSyntaxError {
    CommandSyntaxError::new(
        "argument.player.toomany",
        "Only one player is allowed, but the provided selector allows more than one",
    )
}

/// `minecraft:entity`
pub struct EntityParser {
    pub single: bool,
    pub players_only: bool,
}

impl ArgumentType for EntityParser {
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<ParsedValue, CommandSyntaxError> {
        let start = reader.cursor();
        let selector = EntitySelector::parse(reader)?;
        if self.single && selector.max_results() > 1 {
            reader.set_cursor(start);
            let err = if self.players_only {
                too_many_players()
            } else {
                too_many_entities()
            };
            return Err(err.with_context(reader.input(), start));
        }
        if self.players_only && selector.includes_entities() && selector.target != Target::Current {
            reader.set_cursor(start);
            return Err(reader.error(
                "argument.player.entities",
                "Only players may be affected by this command, but the provided selector includes entities",
            ));
        }
        Ok(ParsedValue::new(selector))
    }

    fn id(&self) -> &'static str {
        "minecraft:entity"
    }

    fn properties(&self) -> Option<serde_json::Value> {
        let amount = if self.single { "single" } else { "multiple" };
        let kind = if self.players_only { "players" } else { "entities" };
        Some(json!({ "amount": amount, "type": kind }))
    }

    fn examples(&self) -> &'static [&'static str] {
        &["Player", "0123", "@e", "@e[type=foo]", "dd12be42-52a9-4a91-a8a1-11c01849e498"]
    }

    fn list_suggestions(&self, ctx: &CommandContext, builder: SuggestionsBuilder) -> Suggestions {
        let mut builder = builder;
        let remaining = builder.remaining().to_string();
        let mut candidates: Vec<String> = ["@p", "@a", "@r", "@s"].map(String::from).to_vec();
        if !self.players_only {
            candidates.push("@e".to_string());
        }
        candidates.extend(ctx.source().core().players().into_iter().map(|p| p.name));
        for candidate in candidates {
            if candidate.starts_with(&remaining) {
                builder = builder.suggest(candidate);
            }
        }
        builder.build()
    }
}

/// Score holders: `*`, a selector, or any name
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreHolder {
    All,
    Selector(EntitySelector),
    Name(String),
}

impl ScoreHolder {
    pub fn names(&self, source: &CommandListenerWrapper) -> Result<Vec<String>, CommandSyntaxError> {
        let names = match self {
            Self::All => source.core().scoreboard().tracked_holders(),
            Self::Selector(selector) => selector
                .find_entities(source)
                .into_iter()
                .map(|e| if e.is_player() { e.name } else { e.uuid.to_string() })
                .collect(),
            Self::Name(name) => vec![name.clone()],
        };
        if names.is_empty() {
            return Err(CommandSyntaxError::new(
                "argument.scoreHolder.empty",
                "No relevant score holders could be found",
            ));
        }
        Ok(names)
    }
}

/// `minecraft:score_holder`
pub struct ScoreHolderParser {
    pub multiple: bool,
}

impl ArgumentType for ScoreHolderParser {
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<ParsedValue, CommandSyntaxError> {
        let start = reader.cursor();
        let holder = match reader.peek() {
            Some('@') => {
                let selector = EntitySelector::parse(reader)?;
                if !self.multiple && selector.max_results() > 1 {
                    return Err(too_many_entities().with_context(reader.input(), start));
                }
                ScoreHolder::Selector(selector)
            }
            Some('*') => {
                reader.skip();
                ScoreHolder::All
            }
            _ => {
                let name = reader.read_while(|c| c != ' ');
                if name.is_empty() {
                    return Err(reader.error("argument.scoreHolder.empty", "No relevant score holders could be found"));
                }
                ScoreHolder::Name(name.to_string())
            }
        };
        Ok(ParsedValue::new(holder))
    }

    fn id(&self) -> &'static str {
        "minecraft:score_holder"
    }

    fn properties(&self) -> Option<serde_json::Value> {
        Some(json!({ "amount": if self.multiple { "multiple" } else { "single" } }))
    }
}

/// A player's profile: name and id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameProfile {
    pub name: String,
    pub id: Uuid,
}

/// `minecraft:game_profile`
pub struct GameProfileParser;

impl ArgumentType for GameProfileParser {
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<ParsedValue, CommandSyntaxError> {
        EntitySelector::parse(reader).map(ParsedValue::new)
    }

    fn id(&self) -> &'static str {
        "minecraft:game_profile"
    }
}

impl EntitySelector {
    pub fn game_profiles(
        &self,
        source: &CommandListenerWrapper,
    ) -> Result<Vec<GameProfile>, CommandSyntaxError> {
        let profiles: Vec<GameProfile> = self
            .find_players(source)
            .into_iter()
            .map(|p| GameProfile {
                name: p.name,
                id: p.uuid,
            })
            .collect();
        if profiles.is_empty() {
            return Err(CommandSyntaxError::new(
                "argument.player.unknown",
                "That player does not exist",
            ));
        }
        Ok(profiles)
    }
}
