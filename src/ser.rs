//! Converting Rust values into value trees.
//!
//! [`ValueSerializer`] turns anything implementing `Serialize` into a
//! [`Value`], mirroring the binding rules of the decoder:
//!
//! - structs and maps become tables, sequences and tuples become arrays
//! - `None` fields are left out of their table
//! - unit variants become strings, other variants single-key tables
//! - [`Datetime`] and its typed wrappers become datetime nodes
//!
//! ## Usage
//!
//! Most users should use [`to_value`](crate::to_value) or
//! [`to_string`](crate::to_string):
//!
//! ```rust
//! use serde::Serialize;
//! use serde_toml::{to_value, Value};
//!
//! #[derive(Serialize)]
//! struct Data { x: i32, label: Option<String> }
//!
//! let value = to_value(&Data { x: 1, label: None }).unwrap();
//! assert_eq!(value.get("x"), Some(&Value::Integer(1)));
//! assert!(value.get("label").is_none());
//! ```

use crate::datetime::{self, Datetime};
use crate::map::TableOrigin;
use crate::{Array, Error, Position, Result, Table, Value};
use serde::{ser, Serialize};

/// Serializer whose output is a [`Value`].
pub struct ValueSerializer;

fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}

/// Like `to_value`, but `None` yields `Ok(None)` so tables can skip the entry.
fn to_entry<T: Serialize + ?Sized>(value: &T) -> Result<Option<Value>> {
    if matches!(value.serialize(IsNone), Ok(true)) {
        return Ok(None);
    }
    to_value(value).map(Some)
}

/// Variant tables are closed like inline tables: a variant is replaced as a
/// whole, never extended.
fn single_entry(key: &str, value: Value) -> Value {
    let mut table = Table::with_origin(TableOrigin::Inline, Position::UNKNOWN);
    table.insert(key, value);
    Value::Table(table)
}

/// Answers whether a value serializes as `None`, looking through newtype
/// wrappers. Compound values stop at their first call with an error.
struct IsNone;

macro_rules! not_none {
    ($($method:ident($($ty:ty),*))*) => {
        $(
            fn $method(self, $(_: $ty),*) -> Result<bool> {
                Ok(false)
            }
        )*
    };
}

macro_rules! not_none_compound {
    ($($method:ident($($ty:ty),*) -> $compound:ident)*) => {
        $(
            fn $method(self, $(_: $ty),*) -> Result<Self::$compound> {
                Err(Error::encode("compound value"))
            }
        )*
    };
}

impl ser::Serializer for IsNone {
    type Ok = bool;
    type Error = Error;

    type SerializeSeq = ser::Impossible<bool, Error>;
    type SerializeTuple = ser::Impossible<bool, Error>;
    type SerializeTupleStruct = ser::Impossible<bool, Error>;
    type SerializeTupleVariant = ser::Impossible<bool, Error>;
    type SerializeMap = ser::Impossible<bool, Error>;
    type SerializeStruct = ser::Impossible<bool, Error>;
    type SerializeStructVariant = ser::Impossible<bool, Error>;

    not_none! {
        serialize_bool(bool) serialize_i8(i8) serialize_i16(i16) serialize_i32(i32)
        serialize_i64(i64) serialize_i128(i128) serialize_u8(u8) serialize_u16(u16)
        serialize_u32(u32) serialize_u64(u64) serialize_u128(u128) serialize_f32(f32)
        serialize_f64(f64) serialize_char(char) serialize_str(&str) serialize_bytes(&[u8])
        serialize_unit() serialize_unit_struct(&'static str)
        serialize_unit_variant(&'static str, u32, &'static str)
    }

    not_none_compound! {
        serialize_seq(Option<usize>) -> SerializeSeq
        serialize_tuple(usize) -> SerializeTuple
        serialize_tuple_struct(&'static str, usize) -> SerializeTupleStruct
        serialize_tuple_variant(&'static str, u32, &'static str, usize) -> SerializeTupleVariant
        serialize_map(Option<usize>) -> SerializeMap
        serialize_struct(&'static str, usize) -> SerializeStruct
        serialize_struct_variant(&'static str, u32, &'static str, usize) -> SerializeStructVariant
    }

    fn serialize_none(self) -> Result<bool> {
        Ok(true)
    }

    fn serialize_some<T>(self, _value: &T) -> Result<bool>
    where
        T: ?Sized + Serialize,
    {
        Ok(false)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<bool>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<bool>
    where
        T: ?Sized + Serialize,
    {
        Ok(false)
    }
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Boolean(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Integer(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        i64::try_from(v)
            .map(Value::Integer)
            .map_err(|_| Error::encode(format!("integer {} is out of range for i64", v)))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        i64::try_from(v)
            .map(Value::Integer)
            .map_err(|_| Error::encode(format!("integer {} is out of range for i64", v)))
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        i64::try_from(v)
            .map(Value::Integer)
            .map_err(|_| Error::encode(format!("integer {} is out of range for i64", v)))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Float(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Array(
            v.iter().map(|&b| Value::Integer(i64::from(b))).collect(),
        ))
    }

    fn serialize_none(self) -> Result<Value> {
        Err(Error::encode(
            "`None` can only be encoded as an absent table entry",
        ))
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Err(Error::encode("the format has no unit value"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Table(Table::new()))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        if name == datetime::NAME {
            return match value.serialize(self)? {
                Value::String(text) => text
                    .parse::<Datetime>()
                    .map(Value::Datetime)
                    .map_err(|e| Error::encode(e.to_string())),
                other => Err(Error::encode(format!(
                    "expected datetime text, found {}",
                    other.type_name()
                ))),
            };
        }
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(single_entry(variant, to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(None, len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(None, len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(None, len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(Some(variant), len))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None, len.unwrap_or(0)))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None, len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(Some(variant), len))
    }
}

/// Collects array elements, optionally wrapped in a single-key variant table.
pub struct SerializeVec {
    variant: Option<&'static str>,
    vec: Vec<Value>,
}

/// Collects table entries, optionally wrapped in a single-key variant table.
pub struct SerializeMap {
    variant: Option<&'static str>,
    map: Table,
    current_key: Option<String>,
}

impl SerializeVec {
    fn new(variant: Option<&'static str>, len: usize) -> Self {
        SerializeVec {
            variant,
            vec: Vec::with_capacity(len),
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn finish(self) -> Value {
        let array = Value::Array(Array::from(self.vec));
        match self.variant {
            Some(variant) => single_entry(variant, array),
            None => array,
        }
    }
}

impl SerializeMap {
    fn new(variant: Option<&'static str>, len: usize) -> Self {
        SerializeMap {
            variant,
            map: Table::with_capacity(len),
            current_key: None,
        }
    }

    fn field<T: ?Sized + Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        if let Some(value) = to_entry(value)? {
            self.map.insert(key, value);
        }
        Ok(())
    }

    fn finish(self) -> Value {
        let table = Value::Table(self.map);
        match self.variant {
            Some(variant) => single_entry(variant, table),
            None => table,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_value(key)? {
            Value::String(s) => {
                self.current_key = Some(s);
                Ok(())
            }
            other => Err(Error::encode(format!(
                "table keys must be strings, found {}",
                other.type_name()
            ))),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::encode("serialize_value called without serialize_key"))?;
        self.field(&key, value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, LocalDate};
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Server {
        host: String,
        port: u16,
        tags: Vec<&'static str>,
        backup: Option<String>,
    }

    #[test]
    fn test_struct_becomes_table() {
        let value = to_value(&Server {
            host: "localhost".to_string(),
            port: 8080,
            tags: vec!["a", "b"],
            backup: None,
        })
        .unwrap();
        let table = value.as_table().unwrap();
        assert_eq!(
            table.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["host", "port", "tags"]
        );
        assert_eq!(table.get("port"), Some(&Value::Integer(8080)));
    }

    #[test]
    fn test_none_inside_array_is_an_error() {
        let err = to_value(&vec![Some(1), None]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encode);
    }

    #[test]
    fn test_absent_entries_are_detected_by_shape() {
        #[derive(Serialize)]
        struct Maybe(Option<i32>);

        struct Failing;

        impl Serialize for Failing {
            fn serialize<S: ser::Serializer>(&self, _serializer: S) -> std::result::Result<S::Ok, S::Error> {
                Err(ser::Error::custom("`None` can only be encoded as an absent table entry"))
            }
        }

        #[derive(Serialize)]
        struct Doc {
            a: Option<i32>,
            b: Maybe,
            c: Option<Option<i32>>,
        }

        let value = to_value(&Doc { a: None, b: Maybe(None), c: Some(Some(1)) }).unwrap();
        let table = value.as_table().unwrap();
        assert_eq!(table.keys().map(String::as_str).collect::<Vec<_>>(), vec!["c"]);

        let mut map = BTreeMap::new();
        map.insert("x", Failing);
        assert_eq!(to_value(&map).unwrap_err().kind(), ErrorKind::Encode);
    }

    #[test]
    fn test_unit_is_an_error() {
        assert_eq!(to_value(&()).unwrap_err().kind(), ErrorKind::Encode);
    }

    #[test]
    fn test_u64_out_of_range() {
        assert_eq!(to_value(&u64::MAX).unwrap_err().kind(), ErrorKind::Encode);
        assert_eq!(to_value(&(i64::MAX as u64)).unwrap(), Value::Integer(i64::MAX));
    }

    #[test]
    fn test_enum_variants() {
        #[derive(Serialize)]
        enum Shape {
            Empty,
            Circle(f64),
            Rect { w: u32, h: u32 },
        }
        assert_eq!(to_value(&Shape::Empty).unwrap(), Value::from("Empty"));
        let circle = to_value(&Shape::Circle(1.5)).unwrap();
        assert_eq!(circle.get("Circle"), Some(&Value::Float(1.5)));
        let rect = to_value(&Shape::Rect { w: 2, h: 3 }).unwrap();
        assert_eq!(rect.pointer(&["Rect", "h"]), Some(&Value::Integer(3)));
        assert!(rect.as_table().unwrap().is_inline());
    }

    #[test]
    fn test_datetime_becomes_datetime_node() {
        let date = LocalDate(chrono::NaiveDate::from_ymd_opt(1979, 5, 27).unwrap());
        let value = to_value(&date).unwrap();
        assert!(value.is_datetime());
        assert_eq!(value.to_string(), "1979-05-27");
    }

    #[test]
    fn test_non_string_map_keys() {
        let mut map = BTreeMap::new();
        map.insert(1, "one");
        assert_eq!(to_value(&map).unwrap_err().kind(), ErrorKind::Encode);
    }
}
