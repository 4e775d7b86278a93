use super::CommandContext;
use crate::ResourceLocation;
use std::sync::Arc;

/// Supplies completions for an argument node
pub type SuggestionProvider =
    Arc<dyn Fn(&CommandContext, SuggestionsBuilder) -> Suggestions + Send + Sync>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suggestions {
    start: usize,
    list: Vec<String>,
}

impl Suggestions {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Offset in the input where the completed text begins
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn texts(&self) -> &[String] {
        &self.list
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn merge(mut self, other: Suggestions) -> Self {
        if self.list.is_empty() {
            return other;
        }
        for text in other.list {
            if !self.list.contains(&text) {
                self.list.push(text);
            }
        }
        self
    }
}

#[derive(Debug, Clone)]
pub struct SuggestionsBuilder {
    remaining: String,
    start: usize,
    list: Vec<String>,
}

impl SuggestionsBuilder {
    pub fn new(input: &str, start: usize) -> Self {
        Self {
            remaining: input.get(start..).unwrap_or_default().to_string(),
            start,
            list: Vec::new(),
        }
    }

    /// The partial text being completed
    pub fn remaining(&self) -> &str {
        &self.remaining
    }

    pub fn suggest(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if text != self.remaining {
            self.list.push(text);
        }
        self
    }

    pub fn build(self) -> Suggestions {
        Suggestions {
            start: self.start,
            list: self.list,
        }
    }
}

/// Whether `input` matches `candidate` from its start or just after any `_`
pub fn matches_sub_str(input: &str, candidate: &str) -> bool {
    let mut i = 0;
    loop {
        if candidate[i..].starts_with(input) {
            return true;
        }
        match candidate[i..].find('_') {
            Some(offset) => i += offset + 1,
            None => return false,
        }
    }
}

/// The host's completion filter for resource locations
///
/// A location matches if the typed text matches either its full `ns:path`
/// form or, for any namespace, its bare path.
pub fn matches_resource(remaining: &str, location: &ResourceLocation) -> bool {
    let remaining = remaining.to_lowercase();
    if remaining.contains(':') {
        matches_sub_str(&remaining, &location.to_string())
    } else {
        matches_sub_str(&remaining, location.namespace())
            || matches_sub_str(&remaining, location.path())
    }
}

/// Suggest every location the builder's remaining text matches, in order
pub fn suggest_resources<'a>(
    locations: impl IntoIterator<Item = &'a ResourceLocation>,
    builder: SuggestionsBuilder,
) -> Suggestions {
    let mut builder = builder;
    for location in locations {
        if matches_resource(builder.remaining(), location) {
            builder = builder.suggest(location.to_string());
        }
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_after_underscore() {
        assert!(matches_sub_str("sto", "stone"));
        assert!(matches_sub_str("sla", "stone_slab"));
        assert!(!matches_sub_str("one", "stone"));
    }

    #[test]
    fn test_resource_match_rule() {
        let loc: ResourceLocation = "minecraft:entity.pig.ambient".parse().unwrap();
        assert!(matches_resource("entity.pig", &loc));
        assert!(matches_resource("minecraft:ent", &loc));
        assert!(matches_resource("mine", &loc));
        assert!(!matches_resource("pig", &loc));
    }
}
