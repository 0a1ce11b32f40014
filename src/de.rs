//! Binding documents onto Rust types.
//!
//! This module provides the [`Deserializer`] that parses a document and binds
//! the resulting tree onto any type implementing `Deserialize`. The shape of
//! the destination is whatever serde hands over: the type name, the list of
//! declared fields for structs, and the visitor's own handling of optional and
//! defaulted fields.
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_toml::from_str;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Data { x: i32, y: i32 }
//!
//! let data: Data = from_str("x = 1\ny = 2").unwrap();
//! assert_eq!(data, Data { x: 1, y: 2 });
//! ```
//!
//! ## Binding Rules
//!
//! - Tables bind to structs, maps and enum variants written as `{ Variant = .. }`.
//! - Arrays bind to sequences and tuples, never to maps.
//! - Scalars follow the coercion rules in `coerce`: integers widen to floats,
//!   out-of-range numbers fail with [`BindErrorKind::Overflow`].
//! - Absent keys leave `Option` fields as `None` and `#[serde(default)]`
//!   fields at their default; other absent fields fail with
//!   [`BindErrorKind::MissingRequiredField`].
//!
//! Every bind error records the position of the failing node and its key path:
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_toml::{from_str, BindErrorKind, ErrorKind};
//!
//! #[derive(Deserialize, Debug)]
//! struct Server { port: u8 }
//!
//! #[derive(Deserialize, Debug)]
//! struct Config { server: Server }
//!
//! let err = from_str::<Config>("[server]\nport = 8080").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Bind(BindErrorKind::Overflow));
//! assert_eq!(err.path().unwrap().to_string(), "server.port");
//! assert_eq!(err.position().unwrap().line, 2);
//! ```

use crate::datetime::{self, Datetime};
use crate::error::{BindErrorKind, Error, Result};
use crate::options::{DecodeOptions, KeyMatching, UnknownFieldPolicy};
use crate::value::VALUE_NAME;
use crate::{coerce, Array, Parser, Position, Table, Value};
use serde::de::{self, Error as _, IntoDeserializer};
use std::collections::HashSet;
use tracing::debug;

/// A deserializer that parses a document and binds it.
///
/// Parsing happens on the first `deserialize_*` call, so a lex or parse error
/// is reported before the visitor sees any data.
pub struct Deserializer<'de> {
    input: &'de str,
    options: DecodeOptions,
}

impl<'de> Deserializer<'de> {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'de str) -> Self {
        Deserializer::with_options(input, DecodeOptions::default())
    }

    pub fn with_options(input: &'de str, options: DecodeOptions) -> Self {
        Deserializer { input, options }
    }

    /// Parses the input into the tree the binder walks.
    pub fn parse(&self) -> Result<Table> {
        self.options.validate()?;
        Parser::new(self.input)
            .with_max_depth(self.options.max_depth)
            .parse()
    }

    fn root(&self) -> Result<ValueDeserializer<'_>> {
        let root = self.parse()?;
        Ok(ValueDeserializer::root(Value::Table(root), &self.options))
    }
}

macro_rules! forward_to_tree {
    ($($method:ident ( $($arg:ident : $ty:ty),* ))*) => {
        $(
            fn $method<V>(self, $($arg: $ty,)* visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                self.root()?.$method($($arg,)* visitor)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for &mut Deserializer<'de> {
    type Error = Error;

    forward_to_tree! {
        deserialize_any() deserialize_bool() deserialize_i8() deserialize_i16()
        deserialize_i32() deserialize_i64() deserialize_i128() deserialize_u8()
        deserialize_u16() deserialize_u32() deserialize_u64() deserialize_u128()
        deserialize_f32() deserialize_f64() deserialize_char() deserialize_str()
        deserialize_string() deserialize_bytes() deserialize_byte_buf()
        deserialize_option() deserialize_unit()
        deserialize_unit_struct(name: &'static str)
        deserialize_newtype_struct(name: &'static str)
        deserialize_seq() deserialize_tuple(len: usize)
        deserialize_tuple_struct(name: &'static str, len: usize)
        deserialize_map()
        deserialize_struct(name: &'static str, fields: &'static [&'static str])
        deserialize_enum(name: &'static str, variants: &'static [&'static str])
        deserialize_identifier() deserialize_ignored_any()
    }
}

/// Binds one node of the tree.
pub(crate) struct ValueDeserializer<'a> {
    value: Value,
    position: Position,
    options: &'a DecodeOptions,
}

impl<'a> ValueDeserializer<'a> {
    pub(crate) fn new(value: Value, position: Position, options: &'a DecodeOptions) -> Self {
        ValueDeserializer {
            value,
            position,
            options,
        }
    }

    /// A node that is not a child of any table, positioned at its own start.
    pub(crate) fn root(value: Value, options: &'a DecodeOptions) -> Self {
        let position = match &value {
            Value::Table(table) => table.position(),
            Value::Array(array) => array.position(),
            _ => Position::UNKNOWN,
        };
        ValueDeserializer::new(value, position, options)
    }

    fn mismatch(&self, expected: &str) -> Error {
        Error::type_mismatch(expected, self.value.type_name()).at(self.position)
    }

    /// Replaces the node with the output of the hook registered for `type_name`.
    fn apply_hook(mut self, type_name: &str) -> Result<Self> {
        if let Some(result) = self.options.hooks().apply(type_name, &self.value) {
            debug!(type_name, position = %self.position, "Running decode hook");
            self.value = result.map_err(|msg| {
                Error::bind(
                    BindErrorKind::TypeMismatch,
                    format!("decode hook for `{}` failed: {}", type_name, msg),
                )
                .at(self.position)
            })?;
        }
        Ok(self)
    }

    fn visit_table<'de, V>(
        self,
        table: Table,
        type_name: &str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let mut entries: Vec<_> = table.into_entries().collect();
        if self.options.key_matching == KeyMatching::CaseInsensitive {
            match_fields_ignoring_case(&mut entries, fields);
        }
        for (key, position, _) in &entries {
            if fields.contains(&key.as_str()) {
                continue;
            }
            match self.options.unknown_fields {
                UnknownFieldPolicy::Error => {
                    return Err(Error::unknown_field(key, fields).at(*position).in_key(key))
                }
                UnknownFieldPolicy::Ignore => {
                    debug!(key = %key, type_name, position = %position, "Ignoring unknown field");
                }
            }
        }
        let position = self.position;
        visitor
            .visit_map(MapDeserializer::new(entries, self.options))
            .map_err(|e| e.at(position))
    }
}

/// Renames keys without an exact field match to the field they equal
/// ignoring ASCII case, unless that field is already present.
fn match_fields_ignoring_case(
    entries: &mut [(String, Position, Value)],
    fields: &'static [&'static str],
) {
    let mut present: HashSet<String> = entries.iter().map(|(key, _, _)| key.clone()).collect();
    for (key, _, _) in entries.iter_mut() {
        if fields.contains(&key.as_str()) {
            continue;
        }
        let matched = fields
            .iter()
            .find(|field| field.eq_ignore_ascii_case(key) && !present.contains(**field));
        if let Some(field) = matched {
            present.insert((*field).to_string());
            *key = (*field).to_string();
        }
    }
}

fn visit_array<'de, V>(array: Array, options: &DecodeOptions, visitor: V) -> Result<V::Value>
where
    V: de::Visitor<'de>,
{
    let mut seq = SeqDeserializer::new(array, options);
    let value = visitor.visit_seq(&mut seq)?;
    seq.end()?;
    Ok(value)
}

macro_rules! deserialize_integer {
    ($($method:ident => $visit:ident : $ty:ty),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                let n = coerce::integer::<$ty>(&self.value, stringify!($ty))
                    .map_err(|e| e.at(self.position))?;
                visitor.$visit(n)
            }
        )*
    };
}

impl<'de, 'a> de::Deserializer<'de> for ValueDeserializer<'a> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let position = self.position;
        let result = match self.value {
            Value::String(s) => visitor.visit_string(s),
            Value::Integer(i) => visitor.visit_i64(i),
            Value::Float(f) => visitor.visit_f64(f),
            Value::Boolean(b) => visitor.visit_bool(b),
            Value::Datetime(dt) => visitor.visit_string(dt.to_string()),
            Value::Array(array) => visit_array(array, self.options, visitor),
            Value::Table(table) => visitor.visit_map(MapDeserializer::new(
                table.into_entries().collect(),
                self.options,
            )),
        };
        result.map_err(|e| e.at(position))
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Boolean(b) => visitor.visit_bool(b),
            _ => Err(self.mismatch("boolean")),
        }
    }

    deserialize_integer! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u128: u128,
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let f = coerce::float32(&self.value).map_err(|e| e.at(self.position))?;
        visitor.visit_f32(f)
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let f = coerce::float(&self.value).map_err(|e| e.at(self.position))?;
        visitor.visit_f64(f)
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let c = coerce::character(&self.value).map_err(|e| e.at(self.position))?;
        visitor.visit_char(c)
    }

    /// Datetimes are handed over in their canonical text form, so chrono
    /// types bind to them directly.
    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let position = self.position;
        let result: Result<V::Value> = match self.value {
            Value::Datetime(dt) => visitor.visit_string(dt.to_string()),
            _ => return self.deserialize_string(visitor),
        };
        result.map_err(|e| e.at(position))
    }

    /// Only string nodes bind to `String`.
    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let position = self.position;
        let result = match self.value {
            Value::String(s) => visitor.visit_string(s),
            _ => Err(self.mismatch("string")),
        };
        result.map_err(|e| e.at(position))
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_byte_buf(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let bytes = coerce::bytes(&self.value).map_err(|e| e.at(self.position))?;
        visitor.visit_byte_buf(bytes)
    }

    /// A node is always present; absent keys never reach the binder.
    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_unit<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::bind(
            BindErrorKind::UnsupportedDestinationKind,
            format!(
                "the format has no unit value, cannot bind {} to ()",
                self.value.type_name()
            ),
        )
        .at(self.position))
    }

    /// Unit structs bind to an empty table.
    fn deserialize_unit_struct<V>(self, name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let this = self.apply_hook(name)?;
        match &this.value {
            Value::Table(table) if table.is_empty() => visitor.visit_unit(),
            _ => Err(Error::bind(
                BindErrorKind::UnsupportedDestinationKind,
                format!(
                    "unit struct {} can only bind to an empty table, found {}",
                    name,
                    this.value.type_name()
                ),
            )
            .at(this.position)),
        }
    }

    fn deserialize_newtype_struct<V>(self, name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if name == datetime::NAME {
            return match self.value {
                Value::Datetime(dt) => visitor.visit_map(DatetimeDeserializer::new(dt)),
                _ => Err(self.mismatch("datetime")),
            };
        }
        if name == VALUE_NAME {
            return match self.value {
                Value::Datetime(dt) => visitor.visit_map(DatetimeDeserializer::new(dt)),
                _ => self.deserialize_any(visitor),
            };
        }
        let this = self.apply_hook(name)?;
        let position = this.position;
        visitor
            .visit_newtype_struct(this)
            .map_err(|e| e.at(position))
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let position = self.position;
        let result = match self.value {
            Value::Array(array) => visit_array(array, self.options, visitor),
            _ => Err(self.mismatch("array")),
        };
        result.map_err(|e| e.at(position))
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.apply_hook(name)?.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let position = self.position;
        match self.value {
            Value::Table(table) => visitor
                .visit_map(MapDeserializer::new(
                    table.into_entries().collect(),
                    self.options,
                ))
                .map_err(|e| e.at(position)),
            Value::Array(_) => Err(Error::bind(
                BindErrorKind::TypeMismatch,
                "expected a table, found array: arrays never bind to maps",
            )
            .at(position)),
            _ => Err(self.mismatch("table")),
        }
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let mut this = self.apply_hook(name)?;
        match std::mem::replace(&mut this.value, Value::Boolean(false)) {
            Value::Table(table) => this.visit_table(table, name, fields, visitor),
            other => {
                this.value = other;
                Err(this.mismatch(&format!("a table for struct {}", name)))
            }
        }
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let this = self.apply_hook(name)?;
        let position = this.position;
        let options = this.options;
        let result = match this.value {
            Value::String(s) => visitor.visit_enum(s.into_deserializer()),
            Value::Table(table) if table.len() == 1 => {
                let mut entries = table.into_entries();
                match entries.next() {
                    Some((variant, position, value)) => visitor.visit_enum(EnumDeserializer {
                        variant,
                        value: ValueDeserializer::new(value, position, options),
                    }),
                    None => Err(Error::custom("empty enum table")),
                }
            }
            other => Err(Error::type_mismatch(
                format!("a string or a single-key table for enum {}", name),
                other.type_name(),
            )),
        };
        result.map_err(|e| e.at(position))
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

struct SeqDeserializer<'a> {
    iter: std::iter::Enumerate<std::vec::IntoIter<(Position, Value)>>,
    options: &'a DecodeOptions,
}

impl<'a> SeqDeserializer<'a> {
    fn new(array: Array, options: &'a DecodeOptions) -> Self {
        let entries: Vec<_> = array.into_entries().collect();
        SeqDeserializer {
            iter: entries.into_iter().enumerate(),
            options,
        }
    }

    /// Fails if the visitor stopped before the last element, as fixed-size
    /// tuples do.
    fn end(self) -> Result<()> {
        let remaining = self.iter.len();
        if remaining == 0 {
            Ok(())
        } else {
            Err(Error::bind(
                BindErrorKind::TypeMismatch,
                format!("array has {} more elements than expected", remaining),
            ))
        }
    }
}

impl<'de, 'a> de::SeqAccess<'de> for SeqDeserializer<'a> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((index, (position, value))) => seed
                .deserialize(ValueDeserializer::new(value, position, self.options))
                .map(Some)
                .map_err(|e| e.at(position).in_index(index)),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapDeserializer<'a> {
    iter: std::vec::IntoIter<(String, Position, Value)>,
    pending: Option<(String, Position, Value)>,
    options: &'a DecodeOptions,
}

impl<'a> MapDeserializer<'a> {
    fn new(entries: Vec<(String, Position, Value)>, options: &'a DecodeOptions) -> Self {
        MapDeserializer {
            iter: entries.into_iter(),
            pending: None,
            options,
        }
    }
}

impl<'de, 'a> de::MapAccess<'de> for MapDeserializer<'a> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        let entry = match self.iter.next() {
            Some(entry) => entry,
            None => return Ok(None),
        };
        let key = seed
            .deserialize(entry.0.as_str().into_deserializer())
            .map_err(|e: Error| e.at(entry.1).in_key(&entry.0))?;
        self.pending = Some(entry);
        Ok(Some(key))
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.pending.take() {
            Some((key, position, value)) => seed
                .deserialize(ValueDeserializer::new(value, position, self.options))
                .map_err(|e| e.at(position).in_key(&key)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumDeserializer<'a> {
    variant: String,
    value: ValueDeserializer<'a>,
}

impl<'de, 'a> de::EnumAccess<'de> for EnumDeserializer<'a> {
    type Error = Error;
    type Variant = VariantDeserializer<'a>;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let deserializer: de::value::StrDeserializer<'_, Error> =
            self.variant.as_str().into_deserializer();
        let variant = seed.deserialize(deserializer)?;
        Ok((
            variant,
            VariantDeserializer {
                variant: self.variant,
                value: self.value,
            },
        ))
    }
}

struct VariantDeserializer<'a> {
    variant: String,
    value: ValueDeserializer<'a>,
}

impl<'de, 'a> de::VariantAccess<'de> for VariantDeserializer<'a> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match &self.value.value {
            Value::Table(table) if table.is_empty() => Ok(()),
            _ => Err(self
                .value
                .mismatch("an empty table for a unit variant")
                .in_key(&self.variant)),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        let variant = self.variant;
        seed.deserialize(self.value).map_err(|e| e.in_key(&variant))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let variant = self.variant;
        de::Deserializer::deserialize_seq(self.value, visitor).map_err(|e| e.in_key(&variant))
    }

    fn struct_variant<V>(self, fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let variant = self.variant;
        let mut value = self.value;
        let result = match std::mem::replace(&mut value.value, Value::Boolean(false)) {
            Value::Table(table) => value.visit_table(table, &variant, fields, visitor),
            other => {
                value.value = other;
                Err(value.mismatch("a table for a struct variant"))
            }
        };
        result.map_err(|e| e.in_key(&variant))
    }
}

/// Presents a datetime node as a one-entry map whose key is a
/// [`datetime::DatetimeKey`], which [`Datetime`]'s and [`Value`]'s visitors
/// recognize.
struct DatetimeDeserializer {
    value: Option<String>,
}

impl DatetimeDeserializer {
    fn new(datetime: Datetime) -> Self {
        DatetimeDeserializer {
            value: Some(datetime.to_string()),
        }
    }
}

impl<'de> de::MapAccess<'de> for DatetimeDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        if self.value.is_none() {
            return Ok(None);
        }
        seed.deserialize(datetime::DatetimeKey).map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(text) => seed.deserialize(text.into_deserializer()),
            None => Err(Error::custom("datetime value already taken")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{from_str, from_str_with_options, ErrorKind, LocalDate, OffsetDatetime};
    use serde::Deserialize;
    use std::collections::BTreeMap;

    fn bind_kind(err: Error) -> BindErrorKind {
        match err.kind() {
            ErrorKind::Bind(kind) => kind,
            other => panic!("expected a bind error, got {:?}: {}", other, err),
        }
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Limits {
        small: u8,
        ratio: f32,
    }

    #[test]
    fn test_overflow_reports_path_and_position() {
        let err = from_str::<Limits>("small = 300\nratio = 1.0").unwrap_err();
        assert_eq!(bind_kind(err.clone()), BindErrorKind::Overflow);
        assert_eq!(err.path().map(|p| p.to_string()), Some("small".to_string()));
        assert_eq!(err.position(), Some(Position::new(1, 1, 0)));
    }

    #[test]
    fn test_integer_widens_to_float_field() {
        let limits: Limits = from_str("small = 1\nratio = 2").unwrap();
        assert_eq!(limits, Limits { small: 1, ratio: 2.0 });
    }

    #[test]
    fn test_float_into_integer_is_type_mismatch() {
        let err = from_str::<Limits>("small = 1.5\nratio = 1.0").unwrap_err();
        assert_eq!(bind_kind(err), BindErrorKind::TypeMismatch);
    }

    #[test]
    fn test_missing_required_field() {
        let err = from_str::<Limits>("small = 1").unwrap_err();
        assert_eq!(bind_kind(err.clone()), BindErrorKind::MissingRequiredField);
        assert_eq!(err.path().map(|p| p.to_string()), Some("ratio".to_string()));
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct OnlyA {
        a: i64,
    }

    #[test]
    fn test_unknown_field_policy() {
        let value: OnlyA = from_str("a=1\nb=2").unwrap();
        assert_eq!(value, OnlyA { a: 1 });

        let options = DecodeOptions::new().deny_unknown_fields();
        let err = from_str_with_options::<OnlyA>("a=1\nb=2", &options).unwrap_err();
        assert_eq!(bind_kind(err.clone()), BindErrorKind::UnknownField);
        assert_eq!(err.path().map(|p| p.to_string()), Some("b".to_string()));
        assert!(err.to_string().contains("`b`"));
        assert_eq!(err.position().map(|p| p.line), Some(2));
    }

    #[test]
    fn test_case_insensitive_keys() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Doc {
            title: String,
            owner_name: String,
        }

        let src = "Title = \"t\"\nOWNER_NAME = \"o\"";
        let doc: Doc = from_str(src).unwrap();
        assert_eq!(doc.title, "t");
        assert_eq!(doc.owner_name, "o");

        let exact = DecodeOptions::new().with_key_matching(KeyMatching::Exact);
        let err = from_str_with_options::<Doc>(src, &exact).unwrap_err();
        assert_eq!(bind_kind(err), BindErrorKind::MissingRequiredField);
    }

    #[test]
    fn test_exact_key_wins_over_case_insensitive_match() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Doc {
            title: String,
        }

        let options = DecodeOptions::new()
            .with_key_matching(KeyMatching::CaseInsensitive)
            .deny_unknown_fields();
        let err = from_str_with_options::<Doc>("title = \"a\"\nTITLE = \"b\"", &options)
            .unwrap_err();
        assert_eq!(bind_kind(err), BindErrorKind::UnknownField);
    }

    #[test]
    fn test_arrays_never_bind_to_maps() {
        #[derive(Deserialize, Debug)]
        struct Doc {
            #[allow(dead_code)]
            m: BTreeMap<String, i64>,
        }
        let err = from_str::<Doc>("m = [1, 2]").unwrap_err();
        assert_eq!(bind_kind(err), BindErrorKind::TypeMismatch);
    }

    #[test]
    fn test_sequence_errors_carry_index() {
        #[derive(Deserialize, Debug)]
        struct Doc {
            #[allow(dead_code)]
            ports: Vec<u16>,
        }
        let err = from_str::<Doc>("ports = [80, 443, 70000]").unwrap_err();
        assert_eq!(bind_kind(err.clone()), BindErrorKind::Overflow);
        assert_eq!(err.path().map(|p| p.to_string()), Some("ports[2]".to_string()));
        assert_eq!(err.position().map(|p| p.column), Some(19));
    }

    #[test]
    fn test_tuples_require_exact_length() {
        #[derive(Deserialize, Debug)]
        struct Doc {
            #[allow(dead_code)]
            pair: (i32, i32),
        }
        assert!(from_str::<Doc>("pair = [1, 2]").is_ok());
        let err = from_str::<Doc>("pair = [1, 2, 3]").unwrap_err();
        assert_eq!(bind_kind(err), BindErrorKind::TypeMismatch);
    }

    #[test]
    fn test_unit_is_unsupported() {
        #[derive(Deserialize, Debug)]
        struct Doc {
            #[allow(dead_code)]
            nothing: (),
        }
        let err = from_str::<Doc>("nothing = 1").unwrap_err();
        assert_eq!(bind_kind(err), BindErrorKind::UnsupportedDestinationKind);
    }

    #[derive(Deserialize, Debug, PartialEq)]
    enum Shape {
        Empty,
        Circle(f64),
        Rect { w: u32, h: u32 },
        Segment(i32, i32),
    }

    #[test]
    fn test_enums() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Doc {
            shapes: Vec<Shape>,
        }
        let doc: Doc = from_str(
            "shapes = [\"Empty\", { Circle = 1.5 }, { Rect = { w = 2, h = 3 } }, { Segment = [1, 2] }]",
        )
        .unwrap();
        assert_eq!(
            doc.shapes,
            vec![
                Shape::Empty,
                Shape::Circle(1.5),
                Shape::Rect { w: 2, h: 3 },
                Shape::Segment(1, 2)
            ]
        );

        let err = from_str::<Doc>("shapes = [{ Rect = { w = -1, h = 3 } }]").unwrap_err();
        assert_eq!(bind_kind(err.clone()), BindErrorKind::Overflow);
        assert_eq!(
            err.path().map(|p| p.to_string()),
            Some("shapes[0].Rect.w".to_string())
        );
    }

    #[test]
    fn test_strings_and_booleans_bind_only_to_their_kind() {
        #[derive(Deserialize, Debug)]
        struct Doc {
            #[allow(dead_code)]
            flag: bool,
        }
        assert_eq!(
            bind_kind(from_str::<Doc>("flag = \"true\"").unwrap_err()),
            BindErrorKind::TypeMismatch
        );
        assert_eq!(
            bind_kind(from_str::<Doc>("flag = 1").unwrap_err()),
            BindErrorKind::TypeMismatch
        );
    }

    #[test]
    fn test_datetime_precision() {
        #[derive(Deserialize, Debug)]
        struct Doc {
            day: LocalDate,
            at: OffsetDatetime,
        }
        let doc: Doc = from_str("day = 1979-05-27\nat = 1979-05-27T07:32:00").unwrap();
        assert_eq!(doc.day.0.to_string(), "1979-05-27");
        assert_eq!(doc.at.0.to_rfc3339(), "1979-05-27T07:32:00+00:00");

        let err = from_str::<Doc>("day = 07:32:00\nat = 1979-05-27T07:32:00Z").unwrap_err();
        assert_eq!(bind_kind(err.clone()), BindErrorKind::TypeMismatch);
        assert_eq!(err.path().map(|p| p.to_string()), Some("day".to_string()));
    }

    #[test]
    fn test_datetime_binds_to_chrono_but_not_string() {
        #[derive(Deserialize, Debug)]
        struct Dates {
            date: chrono::NaiveDate,
            at: chrono::DateTime<chrono::FixedOffset>,
        }
        let dates: Dates = from_str("date = 1979-05-27\nat = 1979-05-27T07:32:00-08:00").unwrap();
        assert_eq!(dates.date, chrono::NaiveDate::from_ymd_opt(1979, 5, 27).unwrap());
        assert_eq!(dates.at.to_rfc3339(), "1979-05-27T07:32:00-08:00");

        #[derive(Deserialize, Debug)]
        struct Text {
            #[allow(dead_code)]
            text: String,
        }
        let err = from_str::<Text>("text = 1979-05-27").unwrap_err();
        assert_eq!(bind_kind(err.clone()), BindErrorKind::TypeMismatch);
        assert_eq!(err.path().map(|p| p.to_string()), Some("text".to_string()));
    }

    #[test]
    fn test_string_into_datetime_is_type_mismatch() {
        #[derive(Deserialize, Debug)]
        struct Doc {
            #[allow(dead_code)]
            at: Datetime,
        }
        let err = from_str::<Doc>("at = \"1979-05-27\"").unwrap_err();
        assert_eq!(bind_kind(err), BindErrorKind::TypeMismatch);
    }

    #[test]
    fn test_dynamic_destination_keeps_native_shape() {
        let json: serde_json::Value =
            from_str("a = 1\nb = [true, 2.5]\n[c]\nd = \"x\"\ne = 1979-05-27").unwrap();
        assert_eq!(
            json,
            serde_json::json!({"a": 1, "b": [true, 2.5], "c": {"d": "x", "e": "1979-05-27"}})
        );
    }

    #[test]
    fn test_hook_failure_is_type_mismatch() {
        #[derive(Deserialize, Debug)]
        struct Level(#[allow(dead_code)] u8);

        #[derive(Deserialize, Debug)]
        struct Doc {
            #[allow(dead_code)]
            level: Level,
        }

        let options = DecodeOptions::new().with_hook("Level", |value: &Value| match value {
            Value::String(s) if s == "high" => Ok(Value::Integer(9)),
            Value::String(s) => Err(format!("unknown level {:?}", s)),
            other => Ok(other.clone()),
        });
        assert!(from_str_with_options::<Doc>("level = \"high\"", &options).is_ok());
        assert!(from_str_with_options::<Doc>("level = 3", &options).is_ok());

        let err = from_str_with_options::<Doc>("level = \"low\"", &options).unwrap_err();
        assert_eq!(bind_kind(err.clone()), BindErrorKind::TypeMismatch);
        assert!(err.message().contains("unknown level"));
        assert_eq!(err.path().map(|p| p.to_string()), Some("level".to_string()));
    }

    #[test]
    fn test_zero_max_depth_is_rejected() {
        let options = DecodeOptions::new().with_max_depth(0);
        let err = from_str_with_options::<OnlyA>("a = 1", &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
