//! NBT data, detached from the host's tag classes

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum NbtTag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    List(Vec<NbtTag>),
    Compound(NbtCompound),
    ByteArray(Vec<i8>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

/// A compound tag: named child tags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NbtCompound(BTreeMap<String, NbtTag>);

impl NbtCompound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, tag: NbtTag) -> Option<NbtTag> {
        self.0.insert(key.into(), tag)
    }

    pub fn get(&self, key: &str) -> Option<&NbtTag> {
        self.0.get(key)
    }

    pub fn get_int(&self, key: &str) -> Option<i32> {
        match self.0.get(key)? {
            NbtTag::Byte(v) => Some(*v as i32),
            NbtTag::Short(v) => Some(*v as i32),
            NbtTag::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.0.get(key)? {
            NbtTag::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, NbtTag)> for NbtCompound {
    fn from_iter<T: IntoIterator<Item = (String, NbtTag)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
