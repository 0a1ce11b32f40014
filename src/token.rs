//! Token types produced by the [`Tokenizer`](crate::Tokenizer).

use crate::{Datetime, Position};
use std::borrow::Cow;
use std::fmt;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Bare or quoted key segment.
    Key,
    String,
    Integer,
    Float,
    Boolean,
    Datetime,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `[[` at the start of an array-of-tables header.
    DoubleLeftBracket,
    /// `]]` at the end of an array-of-tables header.
    DoubleRightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `.`
    Dot,
    /// `=`
    Equals,
    /// `,`
    Comma,
    /// `\n` or `\r\n`
    Newline,
    /// `# ...`, only produced when comments are kept.
    Comment,
    Eof,
}

impl TokenKind {
    /// Whether this token is a literal that can appear in value position.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            TokenKind::String
                | TokenKind::Integer
                | TokenKind::Float
                | TokenKind::Boolean
                | TokenKind::Datetime
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::Key => "key",
            TokenKind::String => "string",
            TokenKind::Integer => "integer",
            TokenKind::Float => "float",
            TokenKind::Boolean => "boolean",
            TokenKind::Datetime => "datetime",
            TokenKind::LeftBracket => "`[`",
            TokenKind::RightBracket => "`]`",
            TokenKind::DoubleLeftBracket => "`[[`",
            TokenKind::DoubleRightBracket => "`]]`",
            TokenKind::LeftBrace => "`{`",
            TokenKind::RightBrace => "`}`",
            TokenKind::Dot => "`.`",
            TokenKind::Equals => "`=`",
            TokenKind::Comma => "`,`",
            TokenKind::Newline => "newline",
            TokenKind::Comment => "comment",
            TokenKind::Eof => "end of input",
        })
    }
}

/// The decoded payload of a literal token.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal<'src> {
    None,
    /// Unescaped text of a key or string. Borrowed when no escapes were present.
    Str(Cow<'src, str>),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Datetime(Datetime),
}

/// A token with its kind, source text and start position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    /// The raw source text of the token, delimiters included.
    pub lexeme: &'src str,
    pub position: Position,
    pub literal: Literal<'src>,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, lexeme: &'src str, position: Position) -> Self {
        Token {
            kind,
            lexeme,
            position,
            literal: Literal::None,
        }
    }

    #[must_use]
    pub fn with_literal(mut self, literal: Literal<'src>) -> Self {
        self.literal = literal;
        self
    }

    /// Decoded text of a key or string token.
    pub fn text(&self) -> Option<&str> {
        match &self.literal {
            Literal::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this token is the end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}
