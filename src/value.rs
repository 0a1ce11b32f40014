//! Dynamic value representation of a parsed document.
//!
//! [`Value`] is the tree produced by [`parse`](crate::parse) and consumed by
//! the binder. It is useful on its own when the structure of a document isn't
//! known at compile time.
//!
//! ## Usage Patterns
//!
//! ### Type Checking
//!
//! ```rust
//! use serde_toml::Value;
//!
//! let value = Value::from(42);
//! assert!(value.is_integer());
//! assert!(!value.is_str());
//! ```
//!
//! ### Navigating a Tree
//!
//! ```rust
//! let tree = serde_toml::parse("[server]\nports = [8001, 8002]").unwrap();
//!
//! let ports = tree.get("server").and_then(|s| s.get("ports")).unwrap();
//! assert_eq!(ports.as_array().map(|a| a.len()), Some(2));
//! assert_eq!(tree.pointer(&["server", "ports"]).map(|v| v.type_name()), Some("array"));
//! ```
//!
//! ### Extracting Values
//!
//! ```rust
//! use serde_toml::Value;
//! use std::convert::TryFrom;
//!
//! let num = i64::try_from(Value::from(42)).unwrap();
//! assert_eq!(num, 42);
//! ```

use crate::datetime::{self, Datetime};
use crate::{Array, Table};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A node of the value tree.
///
/// The grammar has no null literal, so there is no null variant: optional
/// data is modelled by absent keys.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Datetime(Datetime),
    Array(Array),
    Table(Table),
}

impl Value {
    /// Name of the variant, for diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::Datetime(_) => "datetime",
            Value::Array(_) => "array",
            Value::Table(_) => "table",
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_str(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Boolean(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_datetime(&self) -> bool {
        matches!(self, Value::Datetime(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_table(&self) -> bool {
        matches!(self, Value::Table(_))
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns floats, and integers widened to `f64`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_toml::Value;
    ///
    /// assert_eq!(Value::Float(3.5).as_float(), Some(3.5));
    /// assert_eq!(Value::Integer(2).as_float(), Some(2.0));
    /// assert_eq!(Value::from("2").as_float(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_datetime(&self) -> Option<&Datetime> {
        match self {
            Value::Datetime(dt) => Some(dt),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Value::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Looks up `key` if this is a table.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_table().and_then(|table| table.get(key))
    }

    /// Follows a chain of table keys from this node.
    #[must_use]
    pub fn pointer(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter().try_fold(self, |node, key| node.get(key))
    }
}

/// Writes the value the way it would appear on the right of `key = `.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        crate::encode::write_inline(&mut out, self);
        f.write_str(&out)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Datetime(dt) => dt.serialize(serializer),
            Value::Array(array) => array.serialize(serializer),
            Value::Table(table) => table.serialize(serializer),
        }
    }
}

/// Lets the binder hand datetime nodes to [`Value`] as datetimes, while
/// other dynamic destinations receive them as strings.
pub(crate) const VALUE_NAME: &str = "$__serde_toml_private_Value";

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Value, E> {
                Ok(Value::Boolean(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Value, E> {
                Ok(Value::Integer(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Value, E>
            where
                E: de::Error,
            {
                i64::try_from(value)
                    .map(Value::Integer)
                    .map_err(|_| E::custom(format!("integer {} is out of range", value)))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Value, E> {
                Ok(Value::Float(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Value, E> {
                Ok(Value::String(value))
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_any(ValueVisitor)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut array = Array::new();
                while let Some(elem) = seq.next_element()? {
                    array.push(elem);
                }
                Ok(Value::Array(array))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut table = Table::new();
                let first = match map.next_key::<datetime::MapKey>()? {
                    Some(datetime::MapKey::Plain(key)) => key,
                    Some(datetime::MapKey::Datetime) => {
                        let text: String = map.next_value()?;
                        return text
                            .parse()
                            .map(Value::Datetime)
                            .map_err(de::Error::custom);
                    }
                    None => return Ok(Value::Table(table)),
                };
                table.insert(first, map.next_value()?);
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    table.insert(key, value);
                }
                Ok(Value::Table(table))
            }
        }

        deserializer.deserialize_newtype_struct(VALUE_NAME, ValueVisitor)
    }
}

impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Integer(i) => Ok(i),
            other => Err(crate::Error::type_mismatch("integer", other.type_name())),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        value
            .as_float()
            .ok_or_else(|| crate::Error::type_mismatch("float", value.type_name()))
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Boolean(b) => Ok(b),
            other => Err(crate::Error::type_mismatch("boolean", other.type_name())),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(crate::Error::type_mismatch("string", other.type_name())),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Integer(i64::from(value))
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Datetime> for Value {
    fn from(value: Datetime) -> Self {
        Value::Datetime(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(Array::from(value))
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Value::Array(value)
    }
}

impl From<Table> for Value {
    fn from(value: Table) -> Self {
        Value::Table(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;

    #[test]
    fn test_tryfrom_i64() {
        assert_eq!(i64::try_from(Value::Integer(42)).unwrap(), 42);
        assert!(i64::try_from(Value::Float(42.0)).is_err());
        assert!(i64::try_from(Value::from("test")).is_err());
    }

    #[test]
    fn test_tryfrom_f64_widens_integers() {
        assert_eq!(f64::try_from(Value::Float(3.5)).unwrap(), 3.5);
        assert_eq!(f64::try_from(Value::Integer(42)).unwrap(), 42.0);
        assert_eq!(f64::try_from(Value::Float(f64::INFINITY)).unwrap(), f64::INFINITY);
    }

    #[test]
    fn test_tryfrom_bool_and_string() {
        assert!(bool::try_from(Value::Boolean(true)).unwrap());
        assert!(bool::try_from(Value::Integer(1)).is_err());
        assert_eq!(String::try_from(Value::from("hello")).unwrap(), "hello");
        assert!(String::try_from(Value::Integer(42)).is_err());
    }

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from(true), Value::Boolean(true));
        assert_eq!(Value::from(42i32), Value::Integer(42));
        assert_eq!(Value::from(42u32), Value::Integer(42));
        assert_eq!(Value::from(3.5f64), Value::Float(3.5));
        assert_eq!(Value::from("test"), Value::String("test".to_string()));
    }

    #[test]
    fn test_pointer() {
        let mut inner = Table::new();
        inner.insert("c", Value::from("x"));
        let mut outer = Table::new();
        outer.insert("b", Value::Table(inner));
        let root = Value::Table(outer);

        assert_eq!(root.pointer(&["b", "c"]), Some(&Value::from("x")));
        assert_eq!(root.pointer(&["b", "missing"]), None);
        assert_eq!(root.pointer(&[]), Some(&root));
    }

    #[test]
    fn test_private_datetime_key_in_a_document_stays_a_table() {
        let src = "\"$__serde_toml_private_datetime\" = \"1979-05-27\"\nother = 1";
        let tree: Value = crate::from_str(src).unwrap();
        let table = tree.as_table().unwrap();
        assert_eq!(
            table.get(datetime::FIELD),
            Some(&Value::from("1979-05-27"))
        );
        assert_eq!(table.get("other"), Some(&Value::Integer(1)));

        let tree: Value = crate::from_str("when = 1979-05-27").unwrap();
        assert!(tree.get("when").map_or(false, Value::is_datetime));
    }

    #[test]
    fn test_display_uses_inline_syntax() {
        let value = Value::from(vec![Value::from(1), Value::from("two"), Value::Float(3.0)]);
        assert_eq!(value.to_string(), r#"[1, "two", 3.0]"#);
    }
}
