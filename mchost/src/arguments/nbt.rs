//! NBT tags and the SNBT text parser

use crate::brigadier::{ArgumentType, CommandSyntaxError, ParsedValue, StringReader};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    List(Vec<Tag>),
    Compound(CompoundTag),
    ByteArray(Vec<i8>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompoundTag {
    entries: BTreeMap<String, Tag>,
}

impl CompoundTag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: impl Into<String>, tag: Tag) {
        self.entries.insert(key.into(), tag);
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &Tag)> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reads stringified NBT (`{Damage:5s,display:{Name:'"x"'}}`)
pub struct TagParser<'r, 'a> {
    reader: &'r mut StringReader<'a>,
}

impl<'r, 'a> TagParser<'r, 'a> {
    pub fn new(reader: &'r mut StringReader<'a>) -> Self {
        Self { reader }
    }

    pub fn read_struct(&mut self) -> Result<CompoundTag, CommandSyntaxError> {
        self.expect('{')?;
        let mut compound = CompoundTag::new();
        self.reader.skip_whitespace();
        while self.reader.can_read() && self.reader.peek() != Some('}') {
            let start = self.reader.cursor();
            let key = self.reader.read_string()?;
            if key.is_empty() {
                self.reader.set_cursor(start);
                return Err(self.reader.error("argument.nbt.expected.key", "Expected key"));
            }
            self.expect(':')?;
            compound.put(key, self.read_value()?);
            if !self.has_element_separator() {
                break;
            }
            if !self.reader.can_read() {
                return Err(self.reader.error("argument.nbt.expected.key", "Expected key"));
            }
        }
        self.expect('}')?;
        Ok(compound)
    }

    pub fn read_value(&mut self) -> Result<Tag, CommandSyntaxError> {
        self.reader.skip_whitespace();
        match self.reader.peek() {
            None => Err(self.reader.error("argument.nbt.expected.value", "Expected value")),
            Some('{') => self.read_struct().map(Tag::Compound),
            Some('[') => self.read_list_or_array(),
            _ => self.read_typed_value(),
        }
    }

    fn expect(&mut self, c: char) -> Result<(), CommandSyntaxError> {
        self.reader.skip_whitespace();
        self.reader.expect(c)
    }

    fn has_element_separator(&mut self) -> bool {
        self.reader.skip_whitespace();
        if self.reader.peek() == Some(',') {
            self.reader.skip();
            self.reader.skip_whitespace();
            true
        } else {
            false
        }
    }

    fn read_typed_value(&mut self) -> Result<Tag, CommandSyntaxError> {
        self.reader.skip_whitespace();
        let start = self.reader.cursor();
        if matches!(self.reader.peek(), Some('"' | '\'')) {
            return self.reader.read_quoted_string().map(Tag::String);
        }
        let text = self.reader.read_unquoted_string();
        if text.is_empty() {
            self.reader.set_cursor(start);
            return Err(self.reader.error("argument.nbt.expected.value", "Expected value"));
        }
        Ok(Self::type_text(text))
    }

    fn type_text(text: &str) -> Tag {
        let (body, suffix) = text.split_at(text.len() - 1);
        let parsed = match suffix {
            "b" | "B" => body.parse().ok().map(Tag::Byte),
            "s" | "S" => body.parse().ok().map(Tag::Short),
            "l" | "L" => body.parse().ok().map(Tag::Long),
            "f" | "F" => body.parse().ok().map(Tag::Float),
            "d" | "D" => body.parse().ok().map(Tag::Double),
            _ => None,
        };
        if let Some(tag) = parsed {
            return tag;
        }
        if let Ok(i) = text.parse::<i32>() {
            return Tag::Int(i);
        }
        if text.contains('.') {
            if let Ok(d) = text.parse::<f64>() {
                return Tag::Double(d);
            }
        }
        match text {
            "true" => Tag::Byte(1),
            "false" => Tag::Byte(0),
            _ => Tag::String(text.to_string()),
        }
    }

    fn read_list_or_array(&mut self) -> Result<Tag, CommandSyntaxError> {
        let rest = self.reader.remaining();
        let array_kind = rest
            .get(1..3)
            .filter(|prefix| prefix.ends_with(';'))
            .and_then(|prefix| prefix.chars().next());
        match array_kind {
            Some(kind) => {
                self.reader.skip();
                self.reader.skip();
                self.reader.skip();
                self.read_array(kind)
            }
            None => self.read_list(),
        }
    }

    fn read_list(&mut self) -> Result<Tag, CommandSyntaxError> {
        self.expect('[')?;
        self.reader.skip_whitespace();
        let mut items = Vec::new();
        while self.reader.can_read() && self.reader.peek() != Some(']') {
            let start = self.reader.cursor();
            let item = self.read_value()?;
            if let Some(first) = items.first() {
                if std::mem::discriminant(first) != std::mem::discriminant(&item) {
                    self.reader.set_cursor(start);
                    return Err(self.reader.error(
                        "argument.nbt.list.mixed",
                        "Can't insert tag into list: mixed element types",
                    ));
                }
            }
            items.push(item);
            if !self.has_element_separator() {
                break;
            }
        }
        self.expect(']')?;
        Ok(Tag::List(items))
    }

    fn read_array(&mut self, kind: char) -> Result<Tag, CommandSyntaxError> {
        let mut values = Vec::new();
        self.reader.skip_whitespace();
        while self.reader.peek() != Some(']') {
            let start = self.reader.cursor();
            let value = match self.read_value()? {
                Tag::Byte(v) => v as i64,
                Tag::Short(v) => v as i64,
                Tag::Int(v) => v as i64,
                Tag::Long(v) => v,
                _ => {
                    self.reader.set_cursor(start);
                    return Err(self.reader.error(
                        "argument.nbt.array.mixed",
                        "Can't insert tag into array",
                    ));
                }
            };
            values.push(value);
            if !self.has_element_separator() {
                break;
            }
        }
        self.expect(']')?;
        match kind {
            'B' => Ok(Tag::ByteArray(values.into_iter().map(|v| v as i8).collect())),
            'I' => Ok(Tag::IntArray(values.into_iter().map(|v| v as i32).collect())),
            'L' => Ok(Tag::LongArray(values)),
            other => Err(self.reader.error(
                "argument.nbt.array.invalid",
                format!("Invalid array type '{}'", other),
            )),
        }
    }
}

/// `minecraft:nbt_compound_tag`
pub struct NbtCompoundParser;

impl ArgumentType for NbtCompoundParser {
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<ParsedValue, CommandSyntaxError> {
        TagParser::new(reader).read_struct().map(ParsedValue::new)
    }

    fn id(&self) -> &'static str {
        "minecraft:nbt_compound_tag"
    }

    fn examples(&self) -> &'static [&'static str] {
        &["{}", "{foo=bar}"]
    }
}
