//! Decoded run-state tree.
//!
//! The save payload is a dump of Lua tables, so keys are arbitrary values and
//! array-like tables show up with integer keys. Accessors return `Option`
//! instead of panicking so callers decide what a shape mismatch means.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Table(Table),
}

impl Value {
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Self::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            Self::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match *self {
            Self::Float(v) => Some(v),
            Self::Integer(v) => Some(v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Short type name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Table(_) => "table",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Table> for Value {
    fn from(t: Table) -> Self {
        Self::Table(t)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Table(t) => write!(f, "<table of {}>", t.len()),
        }
    }
}

/// Insertion-ordered mapping from `Value` keys to `Value`s.
///
/// Lookups are linear; decoded tables are small and keeping the stored order
/// matters more than lookup speed here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    entries: Vec<(Value, Value)>,
}

impl Table {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            entries: Vec::with_capacity(n),
        }
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Append without the duplicate-key scan. Decoded Lua tables cannot
    /// repeat a key, so the decoder uses this to stay linear.
    pub(crate) fn push(&mut self, key: Value, value: Value) {
        self.entries.push((key, value));
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    pub fn get_index(&self, index: i64) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_integer() == Some(index))
            .map(|(_, v)| v)
    }

    /// String field lookup; a present but non-string value counts as absent.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.get_str(key).and_then(Value::as_str)
    }

    pub fn table_field(&self, key: &str) -> Option<&Table> {
        self.get_str(key).and_then(Value::as_table)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get_str(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for Table {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Table::new();
        for (k, v) in iter {
            table.insert(k, v);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::{Table, Value};

    #[test]
    fn lookups_distinguish_string_and_integer_keys() {
        let mut t = Table::new();
        t.insert(1, "one");
        t.insert("1", "string one");

        assert_eq!(t.get_index(1).and_then(Value::as_str), Some("one"));
        assert_eq!(t.str_field("1"), Some("string one"));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn replacing_a_key_keeps_its_position() {
        let mut t = Table::new();
        t.insert("a", 1);
        t.insert("b", 2);
        t.insert("a", 3);

        let keys: Vec<_> = t.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(t.get_str("a").and_then(Value::as_integer), Some(3));
    }

    #[test]
    fn non_string_field_reads_as_absent() {
        let mut t = Table::new();
        t.insert("Rarity", 4);
        assert!(t.contains_key("Rarity"));
        assert_eq!(t.str_field("Rarity"), None);
    }
}
