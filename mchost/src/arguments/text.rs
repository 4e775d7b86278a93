//! Chat messages, components and colours

use super::selector::EntitySelector;
use crate::brigadier::{
    ArgumentType, CommandContext, CommandSyntaxError, ParsedValue, StringReader, Suggestions,
    SuggestionsBuilder,
};
use crate::chat::{Component, Formatting};
use crate::source::CommandListenerWrapper;

/// `minecraft:component`
pub struct ComponentParser;

impl ArgumentType for ComponentParser {
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<ParsedValue, CommandSyntaxError> {
        Component::read(reader).map(ParsedValue::new)
    }

    fn id(&self) -> &'static str {
        "minecraft:component"
    }

    fn examples(&self) -> &'static [&'static str] {
        &["\"hello world\"", "\"\"", "{\"text\":\"hello world\"}", "[\"\"]"]
    }
}

/// Free text running to the end of the line, with embedded selectors
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    text: String,
    selectors: Vec<(usize, usize, EntitySelector)>,
}

impl Message {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Render the message, replacing each selector with the names it matches
    pub fn to_component(&self, source: &CommandListenerWrapper) -> Component {
        if self.selectors.is_empty() || !source.has_permission(2) {
            return Component::text(self.text.clone());
        }
        let mut out = String::new();
        let mut last = 0;
        for (start, end, selector) in &self.selectors {
            out.push_str(&self.text[last..*start]);
            let names: Vec<String> = selector
                .find_entities(source)
                .into_iter()
                .map(|e| e.name)
                .collect();
            out.push_str(&names.join(", "));
            last = *end;
        }
        out.push_str(&self.text[last..]);
        Component::text(out)
    }
}

/// `minecraft:message`
pub struct MessageParser;

impl ArgumentType for MessageParser {
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<ParsedValue, CommandSyntaxError> {
        let start = reader.cursor();
        let text = reader.remaining().to_string();
        let mut selectors = Vec::new();
        while reader.can_read() {
            if reader.peek() == Some('@') {
                let at = reader.cursor();
                if let Ok(selector) = EntitySelector::parse(reader) {
                    selectors.push((at - start, reader.cursor() - start, selector));
                    continue;
                }
                reader.set_cursor(at);
            }
            reader.skip();
        }
        Ok(ParsedValue::new(Message { text, selectors }))
    }

    fn id(&self) -> &'static str {
        "minecraft:message"
    }

    fn examples(&self) -> &'static [&'static str] {
        &["Hello world!", "foo", "@e", "Hello @p :)"]
    }
}

/// `minecraft:color`
pub struct ColorParser;

impl ArgumentType for ColorParser {
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<ParsedValue, CommandSyntaxError> {
        let start = reader.cursor();
        let name = reader.read_unquoted_string();
        match Formatting::by_name(name).filter(Formatting::is_color) {
            Some(formatting) => Ok(ParsedValue::new(formatting)),
            None => {
                reader.set_cursor(start);
                Err(reader.error(
                    "argument.color.invalid",
                    format!("Unknown color '{}'", name),
                ))
            }
        }
    }

    fn id(&self) -> &'static str {
        "minecraft:color"
    }

    fn examples(&self) -> &'static [&'static str] {
        &["red", "green"]
    }

    fn list_suggestions(&self, _ctx: &CommandContext, builder: SuggestionsBuilder) -> Suggestions {
        let mut builder = builder;
        let remaining = builder.remaining().to_string();
        for formatting in Formatting::values().iter().filter(|f| f.is_color()) {
            if formatting.name().starts_with(&remaining) {
                builder = builder.suggest(formatting.name());
            }
        }
        builder.build()
    }
}
