//! Text formatting and JSON text components

use crate::brigadier::{CommandSyntaxError, StringReader};
use serde_json::Value;

/// A colour or style code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Formatting {
    name: &'static str,
    code: char,
    color_index: Option<u8>,
}

const FORMATTINGS: [Formatting; 22] = [
    Formatting::color("black", '0', 0),
    Formatting::color("dark_blue", '1', 1),
    Formatting::color("dark_green", '2', 2),
    Formatting::color("dark_aqua", '3', 3),
    Formatting::color("dark_red", '4', 4),
    Formatting::color("dark_purple", '5', 5),
    Formatting::color("gold", '6', 6),
    Formatting::color("gray", '7', 7),
    Formatting::color("dark_gray", '8', 8),
    Formatting::color("blue", '9', 9),
    Formatting::color("green", 'a', 10),
    Formatting::color("aqua", 'b', 11),
    Formatting::color("red", 'c', 12),
    Formatting::color("light_purple", 'd', 13),
    Formatting::color("yellow", 'e', 14),
    Formatting::color("white", 'f', 15),
    Formatting::style("obfuscated", 'k'),
    Formatting::style("bold", 'l'),
    Formatting::style("strikethrough", 'm'),
    Formatting::style("underline", 'n'),
    Formatting::style("italic", 'o'),
    Formatting::style("reset", 'r'),
];

impl Formatting {
    const fn color(name: &'static str, code: char, index: u8) -> Self {
        Self {
            name,
            code,
            color_index: Some(index),
        }
    }

    const fn style(name: &'static str, code: char) -> Self {
        Self {
            name,
            code,
            color_index: None,
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        FORMATTINGS.iter().copied().find(|f| f.name == name)
    }

    pub fn values() -> &'static [Formatting] {
        &FORMATTINGS
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn code(&self) -> char {
        self.code
    }

    pub fn color_index(&self) -> Option<u8> {
        self.color_index
    }

    pub fn is_color(&self) -> bool {
        self.color_index.is_some()
    }
}

/// A parsed JSON text component
#[derive(Debug, Clone, PartialEq)]
pub struct Component(Value);

impl Component {
    pub fn text(text: impl Into<String>) -> Self {
        Self(serde_json::json!({ "text": text.into() }))
    }

    /// Read one JSON component from the input, consuming exactly its text
    pub fn read(reader: &mut StringReader<'_>) -> Result<Self, CommandSyntaxError> {
        let start = reader.cursor();
        let mut stream = serde_json::Deserializer::from_str(reader.remaining()).into_iter::<Value>();
        let value = match stream.next() {
            Some(Ok(value)) => value,
            Some(Err(e)) => {
                return Err(reader.error(
                    "argument.component.invalid",
                    format!("Invalid chat component: {}", e),
                ))
            }
            None => {
                return Err(reader.error(
                    "argument.component.invalid",
                    "Invalid chat component: empty input",
                ))
            }
        };
        let consumed = stream.byte_offset();
        match value {
            Value::String(_) | Value::Object(_) | Value::Array(_) => {
                reader.set_cursor(start + consumed);
                Ok(Self(value))
            }
            _ => Err(reader.error(
                "argument.component.invalid",
                "Invalid chat component: Don't know how to turn a primitive into a Component",
            )),
        }
    }

    pub fn json(&self) -> &Value {
        &self.0
    }

    /// Flattened text content, ignoring styling
    pub fn contents(&self) -> String {
        fn collect(value: &Value, out: &mut String) {
            match value {
                Value::String(s) => out.push_str(s),
                Value::Array(items) => items.iter().for_each(|v| collect(v, out)),
                Value::Object(obj) => {
                    if let Some(Value::String(text)) = obj.get("text") {
                        out.push_str(text);
                    }
                    if let Some(extra) = obj.get("extra") {
                        collect(extra, out);
                    }
                }
                _ => {}
            }
        }
        let mut out = String::new();
        collect(&self.0, &mut out);
        out
    }
}

/// Component to and from its JSON string form
pub struct ChatSerializer;

impl ChatSerializer {
    /// Normalises bare strings and arrays into object form
    pub fn to_json(component: &Component) -> String {
        let normalised = match component.json() {
            Value::String(text) => serde_json::json!({ "text": text }),
            Value::Array(items) => {
                let mut items = items.iter();
                let mut head = match items.next() {
                    Some(Value::String(s)) => serde_json::json!({ "text": s }),
                    Some(first) => first.clone(),
                    None => serde_json::json!({ "text": "" }),
                };
                let extra: Vec<Value> = items.cloned().collect();
                if !extra.is_empty() {
                    head["extra"] = Value::Array(extra);
                }
                head
            }
            other => other.clone(),
        };
        normalised.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_consumes_exact_json() {
        let mut reader = StringReader::new(r#"{"text":"hi"} trailing"#);
        let component = Component::read(&mut reader).unwrap();
        assert_eq!(component.contents(), "hi");
        assert_eq!(reader.remaining(), " trailing");
    }

    #[test]
    fn test_primitive_is_not_a_component() {
        let mut reader = StringReader::new("42");
        assert!(Component::read(&mut reader).is_err());
    }

    #[test]
    fn test_serializer_normalises_strings() {
        let mut reader = StringReader::new(r#""plain""#);
        let component = Component::read(&mut reader).unwrap();
        assert_eq!(ChatSerializer::to_json(&component), r#"{"text":"plain"}"#);
    }
}
