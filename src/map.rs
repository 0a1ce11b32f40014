//! Ordered containers of the value tree.
//!
//! [`Table`] wraps an [`IndexMap`] so keys iterate in document order, and
//! [`Array`] wraps a `Vec`. Both remember the source [`Position`] of every
//! child so that bind errors can point at the offending node.
//!
//! Equality compares keys, order and values only; positions and the way a
//! table was written (header, dotted key, inline braces) are ignored.
//!
//! ## Examples
//!
//! ```rust
//! use serde_toml::{Table, Value};
//!
//! let mut table = Table::new();
//! table.insert("name", Value::from("Alice"));
//! table.insert("age", Value::from(30));
//!
//! let keys: Vec<_> = table.keys().cloned().collect();
//! assert_eq!(keys, vec!["name", "age"]);
//! assert_eq!(table.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use crate::{Position, Value};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// How a table came into existence while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum TableOrigin {
    /// `[a.b]` header, or built in memory.
    #[default]
    Explicit,
    /// Intermediate segment of a header path, not defined itself yet.
    Implicit,
    /// Created by a dotted key such as `a.b = 1`.
    Dotted,
    /// `{ ... }`, closed to later extension.
    Inline,
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    position: Position,
}

/// An ordered map of string keys to values.
#[derive(Debug, Clone, Default)]
pub struct Table {
    entries: IndexMap<String, Entry>,
    position: Position,
    pub(crate) origin: TableOrigin,
}

impl Table {
    #[must_use]
    pub fn new() -> Self {
        Table::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Table {
            entries: IndexMap::with_capacity(capacity),
            ..Table::default()
        }
    }

    pub(crate) fn with_origin(origin: TableOrigin, position: Position) -> Self {
        Table {
            entries: IndexMap::new(),
            position,
            origin,
        }
    }

    /// Inserts a key-value pair, returning the previous value for the key.
    ///
    /// A replaced key keeps its place in the iteration order.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.insert_at(key.into(), value, Position::UNKNOWN)
    }

    pub(crate) fn insert_at(
        &mut self,
        key: String,
        value: Value,
        position: Position,
    ) -> Option<Value> {
        self.entries
            .insert(key, Entry { value, position })
            .map(|entry| entry.value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key).map(|entry| &mut entry.value)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes a key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key).map(|entry| entry.value)
    }

    /// Where the value stored under `key` starts in the source document.
    #[must_use]
    pub fn position_of(&self, key: &str) -> Option<Position> {
        self.entries.get(key).map(|entry| entry.position)
    }

    /// Where this table was opened: its header, first dotted key or brace.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Whether the table was written with `{ ... }` braces.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.origin == TableOrigin::Inline
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> + '_ {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.entries.values().map(|entry| &entry.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> + '_ {
        self.entries.iter().map(|(key, entry)| (key, &entry.value))
    }

    pub(crate) fn into_entries(self) -> impl Iterator<Item = (String, Position, Value)> {
        self.entries
            .into_iter()
            .map(|(key, entry)| (key, entry.position, entry.value))
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl IntoIterator for Table {
    type Item = (String, Value);
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self.entries.into_iter())
    }
}

/// Owning iterator over the entries of a [`Table`].
pub struct IntoIter(indexmap::map::IntoIter<String, Entry>);

impl Iterator for IntoIter {
    type Item = (String, Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(key, entry)| (key, entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl Serialize for Table {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl FromIterator<(String, Value)> for Table {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        let mut table = Table::new();
        for (key, value) in iter {
            table.insert(key, value);
        }
        table
    }
}

/// An ordered sequence of values.
#[derive(Debug, Clone, Default)]
pub struct Array {
    items: Vec<Value>,
    positions: Vec<Position>,
    position: Position,
    of_tables: bool,
}

impl Array {
    #[must_use]
    pub fn new() -> Self {
        Array::default()
    }

    pub(crate) fn inline_at(position: Position) -> Self {
        Array {
            position,
            ..Array::default()
        }
    }

    pub(crate) fn of_tables_at(position: Position) -> Self {
        Array {
            position,
            of_tables: true,
            ..Array::default()
        }
    }

    pub fn push(&mut self, value: Value) {
        self.push_at(value, Position::UNKNOWN);
    }

    pub(crate) fn push_at(&mut self, value: Value, position: Position) {
        self.items.push(value);
        self.positions.push(position);
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.items.get_mut(index)
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut Value> {
        self.items.last_mut()
    }

    #[must_use]
    pub fn position_of(&self, index: usize) -> Option<Position> {
        self.positions.get(index).copied()
    }

    /// Where the array was opened: its `[` or its first `[[...]]` header.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Whether the array was built from `[[...]]` headers.
    #[must_use]
    pub fn is_array_of_tables(&self) -> bool {
        self.of_tables
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub(crate) fn into_entries(self) -> impl Iterator<Item = (Position, Value)> {
        self.positions.into_iter().zip(self.items)
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl IntoIterator for Array {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        let mut array = Array::new();
        for value in iter {
            array.push(value);
        }
        array
    }
}

impl Serialize for Array {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

impl From<Vec<Value>> for Array {
    fn from(items: Vec<Value>) -> Self {
        items.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_ordered() {
        let a: Table = vec![
            ("x".to_string(), Value::from(1)),
            ("y".to_string(), Value::from(2)),
        ]
        .into_iter()
        .collect();
        let b: Table = vec![
            ("y".to_string(), Value::from(2)),
            ("x".to_string(), Value::from(1)),
        ]
        .into_iter()
        .collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_equality_ignores_positions_and_origin() {
        let mut parsed = Table::with_origin(TableOrigin::Inline, Position::new(3, 1, 10));
        parsed.insert_at("x".to_string(), Value::from(1), Position::new(3, 5, 14));
        let mut built = Table::new();
        built.insert("x", Value::from(1));
        assert_eq!(parsed, built);
        assert_eq!(parsed.position_of("x"), Some(Position::new(3, 5, 14)));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut table = Table::new();
        table.insert("a", Value::from(1));
        table.insert("b", Value::from(2));
        table.insert("c", Value::from(3));
        assert_eq!(table.remove("b"), Some(Value::from(2)));
        let keys: Vec<_> = table.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_array_positions_follow_items() {
        let mut array = Array::inline_at(Position::new(1, 5, 4));
        array.push_at(Value::from(1), Position::new(1, 6, 5));
        array.push_at(Value::from(2), Position::new(1, 9, 8));
        assert_eq!(array.position_of(1), Some(Position::new(1, 9, 8)));
        let entries: Vec<_> = array.into_entries().collect();
        assert_eq!(entries[0], (Position::new(1, 6, 5), Value::from(1)));
    }
}
