//! # serde_toml
//!
//! A Serde-compatible decoder and encoder for TOML-style configuration documents.
//!
//! ## How It Works
//!
//! Decoding runs in three stages:
//!
//! 1. The [`Tokenizer`] turns source text into [`Token`]s with line and column
//!    [`Position`]s.
//! 2. The [`Parser`] builds a tree of [`Value`]s, enforcing the structural
//!    rules of the format: no duplicate keys, no redefined tables, no mixing
//!    of static arrays and arrays of tables.
//! 3. The binder walks the tree guided by the destination's `Deserialize`
//!    implementation and fills it in, converting scalars where the coercion
//!    rules allow it.
//!
//! Every failure is an [`Error`] whose [`kind`](Error::kind) says which stage
//! rejected the input and whose [`position`](Error::position) points at it.
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! serde_toml = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Decoding a Configuration File
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_toml::from_str;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Config {
//!     title: String,
//!     database: Database,
//!     #[serde(default)]
//!     servers: Vec<Server>,
//! }
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Database {
//!     ports: Vec<u16>,
//!     enabled: bool,
//!     timeout: Option<f64>,
//! }
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Server {
//!     name: String,
//!     ip: String,
//! }
//!
//! let config: Config = from_str(r#"
//! title = "example"
//!
//! [database]
//! ports = [8000, 8001]
//! enabled = true
//!
//! [[servers]]
//! name = "alpha"
//! ip = "10.0.0.1"
//! "#).unwrap();
//!
//! assert_eq!(config.database.ports, vec![8000, 8001]);
//! assert_eq!(config.database.timeout, None);
//! assert_eq!(config.servers[0].name, "alpha");
//! ```
//!
//! ### Working with the Tree
//!
//! ```rust
//! use serde_toml::{parse, Value};
//!
//! let tree = parse("a.b = 1\nc = [true]").unwrap();
//! assert_eq!(tree.pointer(&["a", "b"]), Some(&Value::Integer(1)));
//! assert_eq!(tree.get("c").map(Value::type_name), Some("array"));
//! ```
//!
//! ### Building Values with value!
//!
//! ```rust
//! use serde_toml::{value, to_string};
//!
//! let doc = value!({
//!     "name" = "Alice",
//!     "tags" = ["rust", "serde"]
//! });
//! assert_eq!(to_string(&doc).unwrap(), "name = \"Alice\"\ntags = [\"rust\", \"serde\"]\n");
//! ```
//!
//! ## Options
//!
//! [`DecodeOptions`] controls how unknown keys are treated, whether key
//! matching ignores case, how deep documents may nest and which custom
//! [`DecodeHooks`] run for named destination types.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events: `trace` for every token, `debug` for
//! parse progress, ignored unknown keys and hook invocations. No subscriber is
//! installed by the library.
//!
//! ## Format Reference
//!
//! See the [`syntax`] module for the accepted document syntax.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`decode_config.rs`** - Binding a configuration file onto structs
//! - **`dynamic_tree.rs`** - Parsing into a [`Value`] tree and walking it
//! - **`decode_hooks.rs`** - Options, hooks and error reporting
//!
//! Run any example with: `cargo run --example <name>`

pub mod datetime;
pub mod de;
pub mod error;
pub mod macros;
pub mod map;
pub mod options;
pub mod parser;
pub mod position;
pub mod ser;
pub mod syntax;
pub mod token;
pub mod tokenizer;
pub mod value;

mod coerce;
mod encode;
mod merge;

pub use datetime::{
    Datetime, DatetimeKind, DatetimeParseError, LocalDate, LocalDatetime, LocalTime, Offset,
    OffsetDatetime,
};
pub use de::Deserializer;
pub use error::{
    BindErrorKind, Error, ErrorKind, KeyPath, LexErrorKind, ParseErrorKind, PathSegment, Result,
};
pub use map::{Array, Table};
pub use options::{DecodeHooks, DecodeOptions, KeyMatching, UnknownFieldPolicy};
pub use parser::Parser;
pub use position::Position;
pub use ser::ValueSerializer;
pub use token::{Literal, Token, TokenKind};
pub use tokenizer::{LexMode, Tokenizer};
pub use value::Value;

use de::ValueDeserializer;
use tracing::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Deserialize an instance of type `T` from a document.
///
/// # Examples
///
/// ```rust
/// use serde_toml::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("x = 1\ny = 2").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns a lex or parse error if the text is not a valid document, and a
/// bind error if the document does not fit `T`. Error messages include line
/// and column information.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_str_with_options(s, &DecodeOptions::default())
}

/// Deserialize an instance of type `T` from a document with custom options.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use serde_toml::{from_str_with_options, DecodeOptions, KeyMatching};
///
/// #[derive(Deserialize)]
/// struct Doc { title: String }
///
/// let doc: Doc = from_str_with_options("Title = \"x\"", &DecodeOptions::new()).unwrap();
/// assert_eq!(doc.title, "x");
///
/// let options = DecodeOptions::new().with_key_matching(KeyMatching::Exact);
/// assert!(from_str_with_options::<Doc>("Title = \"x\"", &options).is_err());
/// ```
///
/// # Errors
///
/// As [`from_str`], plus a configuration error for invalid `options`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options<T>(s: &str, options: &DecodeOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    let mut deserializer = Deserializer::with_options(s, options.clone());
    T::deserialize(&mut deserializer)
}

/// Deserialize an instance of type `T` from bytes of document text.
///
/// # Examples
///
/// ```rust
/// use serde_toml::{from_slice, ErrorKind, LexErrorKind};
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_slice(b"x = 1\ny = 2").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
///
/// let err = from_slice::<Point>(b"x = 1\ny = \"\xff\"").unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::Lex(LexErrorKind::InvalidUtf8));
/// assert_eq!(err.position().map(|p| (p.line, p.column)), Some((2, 6)));
/// ```
///
/// # Errors
///
/// Returns a lex error at the first invalid byte if the input is not UTF-8,
/// otherwise fails like [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_str(utf8(v)?)
}

/// Decodes `input` into `dest`, keeping its current values for every key
/// the document leaves out.
///
/// `dest` is encoded into a table, the document is laid over that table and
/// the result is bound back onto `T`. Tables merge key by key; inline
/// tables, arrays and scalars from the document replace what `dest` held.
/// A destination that cannot be encoded as a table is decoded from the
/// document alone.
///
/// If the document does not lex or parse, `dest` is untouched. If binding
/// fails on a field, the fields bound before it keep their new values while
/// the failing field and everything after it keep their old ones, and the
/// binding error is returned.
///
/// # Examples
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use serde_toml::{decode, BindErrorKind, DecodeOptions, ErrorKind};
///
/// #[derive(Serialize, Deserialize, Debug, PartialEq)]
/// struct Limits { max: u8, min: u8 }
///
/// let mut limits = Limits { max: 10, min: 3 };
/// decode(b"max = 20", &mut limits, &DecodeOptions::new()).unwrap();
/// assert_eq!(limits, Limits { max: 20, min: 3 });
///
/// let err = decode(b"max = 30\nmin = 300", &mut limits, &DecodeOptions::new()).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::Bind(BindErrorKind::Overflow));
/// assert_eq!(limits, Limits { max: 30, min: 3 });
/// ```
///
/// # Errors
///
/// Fails like [`from_slice`] and [`from_str_with_options`].
pub fn decode<T>(input: &[u8], dest: &mut T, options: &DecodeOptions) -> Result<()>
where
    T: Serialize + DeserializeOwned,
{
    let doc = Deserializer::with_options(utf8(input)?, options.clone()).parse()?;
    let seed = match to_value(&*dest) {
        Ok(Value::Table(seed)) => seed,
        Ok(other) => {
            debug!(found = other.type_name(), "Destination is not a table, decoding afresh");
            Table::new()
        }
        Err(e) => {
            debug!(error = %e, "Destination cannot be encoded, decoding afresh");
            Table::new()
        }
    };

    let mut merged = seed.clone();
    merge::layer(&mut merged, doc, options.key_matching);
    let err = match from_value_with_options(Value::Table(merged.clone()), options) {
        Ok(value) => {
            *dest = value;
            return Ok(());
        }
        Err(e) => e,
    };

    if let (ErrorKind::Bind(kind), Some(path)) = (err.kind(), err.path()) {
        let partial = matches!(
            kind,
            BindErrorKind::TypeMismatch
                | BindErrorKind::Overflow
                | BindErrorKind::UnsupportedDestinationKind
        );
        if partial && merge::revert_from(&mut merged, &seed, path.segments()) {
            match from_value_with_options(Value::Table(merged), options) {
                Ok(value) => *dest = value,
                Err(e) => debug!(error = %e, "Partially decoded destination does not bind"),
            }
        }
    }
    Err(err)
}

/// Parses a document into its [`Value`] tree without binding it.
///
/// The result is always a [`Value::Table`].
///
/// # Errors
///
/// Returns a lex or parse error if the text is not a valid document.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse(s: &str) -> Result<Value> {
    parse_with_options(s, &DecodeOptions::default())
}

/// Parses a document honoring the nesting limit of `options`.
///
/// # Errors
///
/// As [`parse`], plus a configuration error for invalid `options`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_with_options(s: &str, options: &DecodeOptions) -> Result<Value> {
    Deserializer::with_options(s, options.clone())
        .parse()
        .map(Value::Table)
}

/// Binds an already built tree onto `T`.
///
/// # Examples
///
/// ```rust
/// use serde_toml::{from_value, value};
///
/// let ports: Vec<u16> = from_value(value!([80, 443])).unwrap();
/// assert_eq!(ports, vec![80, 443]);
/// ```
///
/// # Errors
///
/// Returns a bind error if the tree does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value_with_options(value, &DecodeOptions::default())
}

/// Binds an already built tree onto `T` with custom options.
///
/// # Errors
///
/// As [`from_value`], plus a configuration error for invalid `options`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value_with_options<T>(value: Value, options: &DecodeOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    options.validate()?;
    T::deserialize(ValueDeserializer::root(value, options))
}

/// Convert any `T: Serialize` to a [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde_toml::to_value;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert!(value.is_table());
/// ```
///
/// # Errors
///
/// Returns an encode error for values the format cannot hold: `()`, `None`
/// inside arrays, integers beyond the 64-bit signed range, non-string map keys.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Serialize any `T: Serialize` to a document.
///
/// # Examples
///
/// ```rust
/// use serde_toml::to_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// assert_eq!(to_string(&Point { x: 1, y: 2 }).unwrap(), "x = 1\ny = 2\n");
/// assert!(to_string(&vec![1, 2]).is_err());
/// ```
///
/// # Errors
///
/// Fails like [`to_value`], and when `value` does not serialize to a table.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    match to_value(value)? {
        Value::Table(table) => {
            let mut encoder = encode::Encoder::new();
            encoder.write_document(&table);
            Ok(encoder.into_inner())
        }
        other => Err(Error::encode(format!(
            "the root of a document must be a table, found {}",
            other.type_name()
        ))),
    }
}

/// Validates UTF-8, reporting the first bad byte as a lex error.
fn utf8(v: &[u8]) -> Result<&str> {
    std::str::from_utf8(v).map_err(|e| {
        let valid = &v[..e.valid_up_to()];
        // The prefix is valid by construction.
        let prefix = std::str::from_utf8(valid).unwrap_or_default();
        let line_start = prefix.rfind('\n').map_or(0, |i| i + 1);
        let position = Position::new(
            prefix.matches('\n').count() + 1,
            prefix[line_start..].chars().count() + 1,
            e.valid_up_to(),
        );
        Error::lex(LexErrorKind::InvalidUtf8, position, e.to_string())
    })
}
