//! Error types for decoding and encoding.
//!
//! Every failure is reported through the single [`Error`] enum. Its variants
//! follow the stages of the decode pipeline:
//!
//! - **Lex**: malformed tokens (bad escapes, numbers, datetimes, unterminated strings)
//! - **Parse**: malformed document structure (duplicate keys, conflicting headers)
//! - **Bind**: a well-formed document that does not fit the destination type
//! - **Configuration**: invalid [`DecodeOptions`](crate::DecodeOptions)
//! - **Encode**: a value that cannot be written as a document
//!
//! Lex, Parse and Bind errors carry the [`Position`] of the offending input and
//! bind errors also carry the key path of the node being bound.
//!
//! ## Examples
//!
//! ```rust
//! use serde_toml::{parse, Error, ErrorKind, ParseErrorKind};
//!
//! let err = parse("a = 1\na = 2").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Parse(ParseErrorKind::DuplicateKey));
//! assert_eq!(err.position().map(|p| p.line), Some(2));
//! ```

use crate::Position;
use std::fmt;
use thiserror::Error;

/// Kinds of tokenizer failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexErrorKind {
    UnterminatedString,
    InvalidEscape,
    InvalidNumber,
    InvalidDateTime,
    ControlCharacterInKey,
    /// A control character inside a string or comment.
    ControlCharacter,
    UnexpectedCharacter,
    InvalidUtf8,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LexErrorKind::UnterminatedString => "unterminated string",
            LexErrorKind::InvalidEscape => "invalid escape sequence",
            LexErrorKind::InvalidNumber => "invalid number",
            LexErrorKind::InvalidDateTime => "invalid datetime",
            LexErrorKind::ControlCharacterInKey => "control character in key",
            LexErrorKind::ControlCharacter => "control character",
            LexErrorKind::UnexpectedCharacter => "unexpected character",
            LexErrorKind::InvalidUtf8 => "invalid UTF-8",
        })
    }
}

/// Kinds of structural failures found by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    UnexpectedToken,
    DuplicateKey,
    RedefinedTable,
    InvalidTableHeader,
    MixedArrayTableTypes,
    DepthExceeded,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseErrorKind::UnexpectedToken => "unexpected token",
            ParseErrorKind::DuplicateKey => "duplicate key",
            ParseErrorKind::RedefinedTable => "redefined table",
            ParseErrorKind::InvalidTableHeader => "invalid table header",
            ParseErrorKind::MixedArrayTableTypes => "mixed array of tables",
            ParseErrorKind::DepthExceeded => "nesting depth exceeded",
        })
    }
}

/// Kinds of failures while binding a tree onto a destination type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindErrorKind {
    TypeMismatch,
    UnknownField,
    MissingRequiredField,
    Overflow,
    UnsupportedDestinationKind,
}

impl fmt::Display for BindErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BindErrorKind::TypeMismatch => "type mismatch",
            BindErrorKind::UnknownField => "unknown field",
            BindErrorKind::MissingRequiredField => "missing required field",
            BindErrorKind::Overflow => "numeric overflow",
            BindErrorKind::UnsupportedDestinationKind => "unsupported destination",
        })
    }
}

/// The kind of an [`Error`], flattened across all pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Lex(LexErrorKind),
    Parse(ParseErrorKind),
    Bind(BindErrorKind),
    Configuration,
    Encode,
}

/// One step of a [`KeyPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a node inside the tree, e.g. `servers.alpha.ports[1]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPath(Vec<PathSegment>);

impl KeyPath {
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn push_front(&mut self, segment: PathSegment) {
        self.0.insert(0, segment);
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{}", key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

struct PathSuffix<'a>(&'a KeyPath);

impl fmt::Display for PathSuffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            Ok(())
        } else {
            write!(f, " in `{}`", self.0)
        }
    }
}

/// Represents all possible errors that can occur while decoding or encoding.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The tokenizer rejected the input.
    #[error("{kind} at {position}: {message}")]
    Lex {
        kind: LexErrorKind,
        position: Position,
        message: String,
    },

    /// The token stream does not form a valid document.
    #[error("{kind} at {position}: {message}")]
    Parse {
        kind: ParseErrorKind,
        position: Position,
        message: String,
    },

    /// The document does not fit the destination type.
    #[error("{kind} at {position}{}: {message}", PathSuffix(.path))]
    Bind {
        kind: BindErrorKind,
        position: Position,
        path: KeyPath,
        message: String,
    },

    /// The decode options are invalid.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A value cannot be represented as a document.
    #[error("encode error: {0}")]
    Encode(String),
}

impl Error {
    pub fn lex(kind: LexErrorKind, position: Position, msg: impl Into<String>) -> Self {
        Error::Lex {
            kind,
            position,
            message: msg.into(),
        }
    }

    pub fn parse(kind: ParseErrorKind, position: Position, msg: impl Into<String>) -> Self {
        Error::Parse {
            kind,
            position,
            message: msg.into(),
        }
    }

    /// Creates a bind error with no position yet.
    ///
    /// The binder fills in the position and key path as the error travels up
    /// through the tree, see [`Error::at`] and [`Error::in_key`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_toml::{BindErrorKind, Error, Position};
    ///
    /// let err = Error::bind(BindErrorKind::Overflow, "300 does not fit in u8")
    ///     .at(Position::new(2, 9, 14))
    ///     .in_key("port");
    /// assert_eq!(
    ///     err.to_string(),
    ///     "numeric overflow at line 2, column 9 in `port`: 300 does not fit in u8"
    /// );
    /// ```
    pub fn bind(kind: BindErrorKind, msg: impl Into<String>) -> Self {
        Error::Bind {
            kind,
            position: Position::UNKNOWN,
            path: KeyPath::default(),
            message: msg.into(),
        }
    }

    pub fn type_mismatch(expected: impl fmt::Display, found: impl fmt::Display) -> Self {
        Error::bind(
            BindErrorKind::TypeMismatch,
            format!("expected {}, found {}", expected, found),
        )
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Error::Encode(msg.into())
    }

    /// Attaches `position` to a bind error that does not have one yet.
    ///
    /// Inner nodes attach their position first, so the most precise location wins.
    #[must_use]
    pub fn at(mut self, at: Position) -> Self {
        if let Error::Bind { position, .. } = &mut self {
            if !position.is_known() {
                *position = at;
            }
        }
        self
    }

    /// Prepends a table key to the path of a bind error.
    #[must_use]
    pub fn in_key(mut self, key: &str) -> Self {
        if let Error::Bind { path, .. } = &mut self {
            path.push_front(PathSegment::Key(key.to_string()));
        }
        self
    }

    /// Prepends an array index to the path of a bind error.
    #[must_use]
    pub fn in_index(mut self, index: usize) -> Self {
        if let Error::Bind { path, .. } = &mut self {
            path.push_front(PathSegment::Index(index));
        }
        self
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Lex { kind, .. } => ErrorKind::Lex(*kind),
            Error::Parse { kind, .. } => ErrorKind::Parse(*kind),
            Error::Bind { kind, .. } => ErrorKind::Bind(*kind),
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::Encode(_) => ErrorKind::Encode,
        }
    }

    /// The source position, for errors that relate to a location in the document.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::Lex { position, .. }
            | Error::Parse { position, .. }
            | Error::Bind { position, .. } => Some(*position).filter(Position::is_known),
            Error::Configuration(_) | Error::Encode(_) => None,
        }
    }

    /// The key path of a bind error.
    #[must_use]
    pub fn path(&self) -> Option<&KeyPath> {
        match self {
            Error::Bind { path, .. } => Some(path),
            _ => None,
        }
    }

    /// The message without the kind and position prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Error::Lex { message, .. }
            | Error::Parse { message, .. }
            | Error::Bind { message, .. } => message,
            Error::Configuration(message) | Error::Encode(message) => message,
        }
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::bind(BindErrorKind::TypeMismatch, msg.to_string())
    }

    fn invalid_type(unexp: serde::de::Unexpected<'_>, exp: &dyn serde::de::Expected) -> Self {
        Error::type_mismatch(exp, unexp)
    }

    fn invalid_value(unexp: serde::de::Unexpected<'_>, exp: &dyn serde::de::Expected) -> Self {
        Error::bind(
            BindErrorKind::TypeMismatch,
            format!("invalid value: {}, expected {}", unexp, exp),
        )
    }

    fn invalid_length(len: usize, exp: &dyn serde::de::Expected) -> Self {
        Error::bind(
            BindErrorKind::TypeMismatch,
            format!("invalid length {}, expected {}", len, exp),
        )
    }

    fn unknown_variant(variant: &str, expected: &'static [&'static str]) -> Self {
        Error::bind(
            BindErrorKind::TypeMismatch,
            format!(
                "unknown variant `{}`, expected one of {}",
                variant,
                OneOf(expected)
            ),
        )
    }

    fn unknown_field(field: &str, expected: &'static [&'static str]) -> Self {
        Error::bind(
            BindErrorKind::UnknownField,
            format!("unknown field `{}`, expected one of {}", field, OneOf(expected)),
        )
    }

    fn missing_field(field: &'static str) -> Self {
        Error::bind(
            BindErrorKind::MissingRequiredField,
            format!("missing field `{}`", field),
        )
        .in_key(field)
    }

    fn duplicate_field(field: &'static str) -> Self {
        Error::bind(
            BindErrorKind::TypeMismatch,
            format!("duplicate field `{}`", field),
        )
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Encode(msg.to_string())
    }
}

struct OneOf(&'static [&'static str]);

impl fmt::Display for OneOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("no fields");
        }
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "`{}`", name)?;
        }
        Ok(())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
