//! Annotated element tree
//!
//! The translator output is a tree of [`Element`] nodes. Next to its value
//! every node carries a `skip` flag, set when the construct has no Kea
//! equivalent, and an ordered list of comments explaining what happened to
//! it. Maps keep insertion order and unique keys.
//!
//! Strings are held as Rust `String`s: the lexer only produces valid UTF-8
//! and every translated string is either a token text or built from one.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

/// A node of the element tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub value: Value,
    /// The construct is unsupported by Kea and is kept for reporting only
    pub skip: bool,
    pub comments: Vec<String>,
}

/// Value carried by an element
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    String(String),
    Map(Map),
    List(Vec<Element>),
}

/// Insertion ordered map with unique keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Map {
    entries: Vec<(String, Element)>,
}

// ============================================================
// Element
// ============================================================

impl Element {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            skip: false,
            comments: Vec::new(),
        }
    }

    pub fn null() -> Self {
        Self::new(Value::Null)
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(Value::Boolean(value))
    }

    pub fn integer(value: i64) -> Self {
        Self::new(Value::Integer(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(Value::String(value.into()))
    }

    pub fn map(map: Map) -> Self {
        Self::new(Value::Map(map))
    }

    pub fn list(items: Vec<Element>) -> Self {
        Self::new(Value::List(items))
    }

    /// Builder form of [`Element::set_skip`]
    pub fn skipped(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Builder form of [`Element::add_comment`]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comments.push(comment.into());
        self
    }

    pub fn set_skip(&mut self) {
        self.skip = true;
    }

    pub fn add_comment(&mut self, comment: impl Into<String>) {
        self.comments.push(comment.into());
    }

    /// Move every pending comment onto this node, leaving `pending` empty
    pub fn take_comments(&mut self, pending: &mut Vec<String>) {
        self.comments.append(pending);
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            Value::Boolean(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self.value {
            Value::Integer(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match &self.value {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match &mut self.value {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Element]> {
        match &self.value {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Element>> {
        match &mut self.value {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// First key of a map node, which names expression and statement nodes
    pub fn tag(&self) -> Option<&str> {
        self.as_map().and_then(Map::first_key)
    }

    /// Number of nodes in this subtree with the skip flag set
    pub fn count_skipped(&self) -> usize {
        let own = usize::from(self.skip);
        own + match &self.value {
            Value::Map(m) => m.iter().map(|(_, e)| e.count_skipped()).sum(),
            Value::List(l) => l.iter().map(Element::count_skipped).sum(),
            _ => 0,
        }
    }
}

impl From<Map> for Element {
    fn from(map: Map) -> Self {
        Element::map(map)
    }
}

impl From<Vec<Element>> for Element {
    fn from(items: Vec<Element>) -> Self {
        Element::list(items)
    }
}

impl From<bool> for Element {
    fn from(value: bool) -> Self {
        Element::boolean(value)
    }
}

impl From<i64> for Element {
    fn from(value: i64) -> Self {
        Element::integer(value)
    }
}

impl From<&str> for Element {
    fn from(value: &str) -> Self {
        Element::string(value)
    }
}

impl From<String> for Element {
    fn from(value: String) -> Self {
        Element::string(value)
    }
}

// ============================================================
// Map
// ============================================================

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; a replaced key keeps its original position
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Element>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Element> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Element> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Element> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first_key(&self) -> Option<&str> {
        self.entries.first().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Element)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The list stored under `key`, created empty when absent.
    ///
    /// A non-list value under `key` is replaced by a list holding it.
    pub fn list_mut(&mut self, key: &str) -> &mut Vec<Element> {
        let index = match self.entries.iter().position(|(k, _)| k == key) {
            Some(index) => index,
            None => {
                self.entries.push((key.to_string(), Element::list(Vec::new())));
                self.entries.len() - 1
            }
        };
        let slot = &mut self.entries[index].1;
        if !matches!(slot.value, Value::List(_)) {
            let previous = std::mem::take(slot);
            *slot = Element::list(vec![previous]);
        }
        match &mut slot.value {
            Value::List(items) => items,
            _ => unreachable!("slot was just turned into a list"),
        }
    }

    /// Append `element` to the list stored under `key`
    pub fn push(&mut self, key: &str, element: Element) {
        self.list_mut(key).push(element);
    }
}

impl IntoIterator for Map {
    type Item = (String, Element);
    type IntoIter = std::vec::IntoIter<(String, Element)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, Element)> for Map {
    fn from_iter<I: IntoIterator<Item = (String, Element)>>(iter: I) -> Self {
        let mut map = Map::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}

// ============================================================
// Serialization
// ============================================================

/// Plain JSON view: annotations are dropped, skipped nodes are kept
impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.value {
            Value::Null => serializer.serialize_unit(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::String(s) => serializer.serialize_str(s),
            Value::Map(m) => m.serialize(serializer),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl Serialize for Map {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(text) => f.write_str(&text),
            Err(_) => Err(fmt::Error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_keeps_insertion_order() {
        let mut map = Map::new();
        map.set("zeta", 1i64);
        map.set("alpha", 2i64);
        map.set("zeta", 3i64);

        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert_eq!(map.get("zeta").and_then(Element::as_integer), Some(3));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_push_creates_list() {
        let mut map = Map::new();
        map.push("option-data", Element::string("a"));
        map.push("option-data", Element::string("b"));
        assert_eq!(map.get("option-data").and_then(Element::as_list).map(|l| l.len()), Some(2));
    }

    #[test]
    fn test_take_comments() {
        let mut pending = vec!["/// one".to_string(), "/// two".to_string()];
        let mut element = Element::null();
        element.take_comments(&mut pending);
        assert!(pending.is_empty());
        assert_eq!(element.comments.len(), 2);
    }

    #[test]
    fn test_serialize_drops_annotations() {
        let mut map = Map::new();
        map.set("name", Element::string("routers").with_comment("/// note"));
        map.set("skipped", Element::boolean(true).skipped());
        map.set("list", Element::list(vec![Element::integer(1), Element::null()]));

        let text = Element::map(map).to_string();
        assert_eq!(text, r#"{"name":"routers","skipped":true,"list":[1,null]}"#);
    }

    #[test]
    fn test_count_skipped() {
        let mut map = Map::new();
        map.set("a", Element::null().skipped());
        map.push("b", Element::integer(2).skipped());
        let root = Element::map(map).skipped();
        assert_eq!(root.count_skipped(), 3);
        assert_eq!(root.tag(), Some("a"));
    }
}
