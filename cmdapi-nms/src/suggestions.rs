//! Bridging the host's completion suppliers onto plugin commands

use crate::adapter::VersionAdapter;
use cmdapi_wrappers::SuggestionProviders;
use mchost::brigadier::{
    matches_resource, matches_sub_str, CommandContext, SuggestionProvider, Suggestions,
    SuggestionsBuilder,
};
use mchost::functions::FunctionLibrary;
use mchost::registry::{Registries, Registry};
use mchost::ResourceLocation;
use std::sync::Arc;

/// Candidates matching what has been typed so far
///
/// Filtering is lazy and iteration can be restarted; candidates keep the
/// order they were given in.
#[derive(Debug, Clone)]
pub struct Completions {
    candidates: Vec<String>,
    typed: String,
}

impl Completions {
    pub fn new(candidates: Vec<String>, typed: impl Into<String>) -> Self {
        Self {
            candidates,
            typed: typed.into(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.candidates
            .iter()
            .map(String::as_str)
            .filter(move |c| self.matches(c))
    }

    /// Once a `#` has been typed only `#tag` candidates match. Plain text
    /// matches tags by name as well as plain candidates.
    fn matches(&self, candidate: &str) -> bool {
        let (typed, candidate) = match (self.typed.strip_prefix('#'), candidate.strip_prefix('#')) {
            (Some(typed), Some(candidate)) => (typed, candidate),
            (Some(_), None) => return false,
            (None, Some(candidate)) => (self.typed.as_str(), candidate),
            (None, None) => (self.typed.as_str(), candidate),
        };
        match candidate.parse::<ResourceLocation>() {
            Ok(location) => matches_resource(typed, &location),
            Err(_) => matches_sub_str(&typed.to_lowercase(), candidate),
        }
    }

    /// Add every match to `builder`
    pub fn suggest(&self, builder: SuggestionsBuilder) -> Suggestions {
        self.iter()
            .fold(builder, |builder, candidate| builder.suggest(candidate))
            .build()
    }
}

impl<'a> IntoIterator for &'a Completions {
    type Item = &'a str;
    type IntoIter = Box<dyn Iterator<Item = &'a str> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// A host suggestion provider answering from `adapter`'s candidates
pub fn native_provider(
    adapter: Arc<dyn VersionAdapter>,
    provider: SuggestionProviders,
) -> SuggestionProvider {
    Arc::new(move |ctx: &CommandContext, builder: SuggestionsBuilder| {
        let candidates = adapter.completion_candidates(provider, ctx);
        Completions::new(candidates, builder.remaining()).suggest(builder)
    })
}

/// Candidates for `provider` in host iteration order
///
/// Functions list `#tag` names first, then function names.
pub(crate) fn host_candidates(
    provider: SuggestionProviders,
    registries: &Registries,
    functions: &FunctionLibrary,
) -> Vec<String> {
    let keys = |registry: &Registry| -> Vec<String> {
        registry.keys().map(ToString::to_string).collect()
    };
    match provider {
        SuggestionProviders::Function => functions
            .tag_ids()
            .iter()
            .map(|id| format!("#{}", id))
            .chain(functions.function_ids().iter().map(ToString::to_string))
            .collect(),
        SuggestionProviders::Recipes => registries.recipes.keys().map(ToString::to_string).collect(),
        SuggestionProviders::Sounds => keys(&registries.sounds),
        SuggestionProviders::Advancements => keys(&registries.advancements),
        SuggestionProviders::LootTables => keys(&registries.loot_tables),
        SuggestionProviders::Biomes => keys(&registries.biomes),
        SuggestionProviders::Entities => keys(&registries.entity_types),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<String> {
        ["#minecraft:load", "#minecraft:tick", "demo:greet", "demo:load_all", "minecraft:torch"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_empty_input_matches_everything_in_order() {
        let completions = Completions::new(candidates(), "");
        let all: Vec<&str> = completions.iter().collect();
        assert_eq!(all, candidates());
    }

    #[test]
    fn test_filters_by_path_and_namespace() {
        let completions = Completions::new(candidates(), "lo");
        let matched: Vec<&str> = completions.iter().collect();
        assert_eq!(matched, vec!["#minecraft:load", "demo:load_all"]);

        let completions = Completions::new(candidates(), "demo:");
        assert_eq!(completions.iter().count(), 2);
    }

    #[test]
    fn test_hash_selects_tags() {
        let completions = Completions::new(candidates(), "#minecraft:t");
        let matched: Vec<&str> = completions.iter().collect();
        assert_eq!(matched, vec!["#minecraft:tick"]);
    }

    #[test]
    fn test_iteration_restarts() {
        let completions = Completions::new(candidates(), "all");
        let first: Vec<&str> = (&completions).into_iter().collect();
        let second: Vec<&str> = (&completions).into_iter().collect();
        assert_eq!(first, vec!["demo:load_all"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_suggest_fills_builder() {
        let completions = Completions::new(candidates(), "greet");
        let suggestions = completions.suggest(SuggestionsBuilder::new("function greet", 9));
        assert_eq!(suggestions.texts(), &["demo:greet".to_string()]);
        assert_eq!(suggestions.start(), 9);
    }
}
