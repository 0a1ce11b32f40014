//! Lazy tokenizer for document text.
//!
//! The grammar is ambiguous without context: `1979-05-27` is a bare key on the
//! left of `=` and a date on the right, and `[[` opens an array-of-tables
//! header at the start of a line but two nested arrays after `=`. The caller
//! therefore asks for each token in a [`LexMode`]. The [`Parser`](crate::Parser)
//! always knows which one it needs; the [`Iterator`] implementation tracks the
//! mode itself from the tokens it has produced.

use crate::error::{Error, LexErrorKind, Result};
use crate::token::{Literal, Token, TokenKind};
use crate::{Datetime, Position};
use std::borrow::Cow;
use tracing::trace;

/// What kind of token the caller expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexMode {
    /// Keys, header brackets and punctuation.
    Key,
    /// Right-hand side of `=` and array elements.
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Open {
    Array,
    InlineTable,
}

/// A tokenizer that produces tokens from document text.
#[derive(Debug, Clone)]
pub struct Tokenizer<'src> {
    source: &'src str,
    offset: usize,
    line: usize,
    column: usize,
    keep_comments: bool,
    done: bool,
    // Mode tracking for the `Iterator` impl only.
    after_equals: bool,
    open: Vec<Open>,
}

impl<'src> Tokenizer<'src> {
    pub fn new(source: &'src str) -> Self {
        Tokenizer {
            source,
            offset: 0,
            line: 1,
            column: 1,
            keep_comments: false,
            done: false,
            after_equals: false,
            open: Vec::new(),
        }
    }

    /// Produce [`TokenKind::Comment`] tokens instead of skipping comments.
    #[must_use]
    pub fn keep_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }

    /// Position of the next unread character.
    #[inline]
    pub fn position(&self) -> Position {
        self.here()
    }

    // Called from `&mut self` methods, where `position` would resolve to
    // `Iterator::position`.
    #[inline]
    fn here(&self) -> Position {
        Position::new(self.line, self.column, self.offset)
    }

    #[inline]
    fn remaining(&self) -> &'src str {
        &self.source[self.offset..]
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining().chars().nth(n)
    }

    #[inline]
    fn starts_with(&self, prefix: &str) -> bool {
        self.remaining().starts_with(prefix)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn advance_by(&mut self, chars: usize) {
        for _ in 0..chars {
            self.advance();
        }
    }

    fn token(&self, kind: TokenKind, start: Position) -> Token<'src> {
        let lexeme = &self.source[start.offset..self.offset];
        trace!("Token {:?} at {}: {:?}", kind, start, lexeme);
        Token::new(kind, lexeme, start)
    }

    fn error(&self, kind: LexErrorKind, at: Position, msg: impl Into<String>) -> Error {
        Error::lex(kind, at, msg)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.advance();
        }
    }

    /// Get the next token, lexing literals as `mode` dictates.
    ///
    /// After [`TokenKind::Eof`] has been returned, every further call returns
    /// it again.
    pub fn next_token(&mut self, mode: LexMode) -> Result<Token<'src>> {
        loop {
            self.skip_whitespace();
            let start = self.here();
            let c = match self.peek() {
                Some(c) => c,
                None => {
                    self.done = true;
                    return Ok(self.token(TokenKind::Eof, start));
                }
            };

            let token = match c {
                '#' => {
                    self.lex_comment()?;
                    if !self.keep_comments {
                        continue;
                    }
                    self.token(TokenKind::Comment, start)
                }
                '\n' => self.punct(TokenKind::Newline, start, 1),
                '\r' if self.peek_nth(1) == Some('\n') => self.punct(TokenKind::Newline, start, 2),
                '=' => self.punct(TokenKind::Equals, start, 1),
                ',' => self.punct(TokenKind::Comma, start, 1),
                '{' => self.punct(TokenKind::LeftBrace, start, 1),
                '}' => self.punct(TokenKind::RightBrace, start, 1),
                '[' if mode == LexMode::Key && self.starts_with("[[") => {
                    self.punct(TokenKind::DoubleLeftBracket, start, 2)
                }
                '[' => self.punct(TokenKind::LeftBracket, start, 1),
                ']' if mode == LexMode::Key && self.starts_with("]]") => {
                    self.punct(TokenKind::DoubleRightBracket, start, 2)
                }
                ']' => self.punct(TokenKind::RightBracket, start, 1),
                '.' if mode == LexMode::Key => self.punct(TokenKind::Dot, start, 1),
                '"' => self.lex_basic_string(mode)?,
                '\'' => self.lex_literal_string(mode)?,
                _ if mode == LexMode::Key && is_bare_key_char(c) => self.lex_bare_key(),
                _ if mode == LexMode::Value && is_bare_value_char(c) => self.lex_bare_value()?,
                _ if mode == LexMode::Key && is_control(c) => {
                    return Err(self.error(
                        LexErrorKind::ControlCharacterInKey,
                        start,
                        format!("control character {:?} in key", c),
                    ))
                }
                _ if is_control(c) => {
                    return Err(self.error(
                        LexErrorKind::ControlCharacter,
                        start,
                        format!("control character {:?}", c),
                    ))
                }
                _ => {
                    return Err(self.error(
                        LexErrorKind::UnexpectedCharacter,
                        start,
                        format!("unexpected character {:?}", c),
                    ))
                }
            };
            return Ok(token);
        }
    }

    fn punct(&mut self, kind: TokenKind, start: Position, chars: usize) -> Token<'src> {
        self.advance_by(chars);
        self.token(kind, start)
    }

    fn lex_comment(&mut self) -> Result<()> {
        self.advance();
        while let Some(c) = self.peek() {
            if c == '\n' || (c == '\r' && self.peek_nth(1) == Some('\n')) {
                break;
            }
            if is_control(c) {
                return Err(self.error(
                    LexErrorKind::ControlCharacter,
                    self.here(),
                    format!("control character {:?} in comment", c),
                ));
            }
            self.advance();
        }
        Ok(())
    }

    fn lex_bare_key(&mut self) -> Token<'src> {
        let start = self.here();
        while matches!(self.peek(), Some(c) if is_bare_key_char(c)) {
            self.advance();
        }
        let token = self.token(TokenKind::Key, start);
        let text = Cow::Borrowed(token.lexeme);
        token.with_literal(Literal::Str(text))
    }

    fn string_kind(mode: LexMode) -> TokenKind {
        match mode {
            LexMode::Key => TokenKind::Key,
            LexMode::Value => TokenKind::String,
        }
    }

    fn lex_basic_string(&mut self, mode: LexMode) -> Result<Token<'src>> {
        let start = self.here();
        if mode == LexMode::Value && self.starts_with("\"\"\"") {
            return self.lex_multiline_basic(start);
        }
        self.advance();
        let mut text = Text::new(self.source, self.offset);
        loop {
            let at = self.here();
            match self.peek() {
                None | Some('\n') => {
                    return Err(self.error(
                        LexErrorKind::UnterminatedString,
                        start,
                        "unterminated basic string",
                    ))
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    let c = self.lex_escape(at)?;
                    text.push(c);
                }
                Some(c) if is_control(c) => {
                    return Err(self.error(
                        LexErrorKind::ControlCharacter,
                        at,
                        format!("control character {:?} in string", c),
                    ))
                }
                Some(c) => {
                    self.advance();
                    text.take(c);
                }
            }
        }
        let token = self.token(Self::string_kind(mode), start);
        Ok(token.with_literal(Literal::Str(text.finish())))
    }

    fn lex_multiline_basic(&mut self, start: Position) -> Result<Token<'src>> {
        self.advance_by(3);
        self.trim_leading_newline();
        let mut text = Text::new(self.source, self.offset);
        loop {
            let at = self.here();
            match self.peek() {
                None => {
                    return Err(self.error(
                        LexErrorKind::UnterminatedString,
                        start,
                        "unterminated multi-line basic string",
                    ))
                }
                Some('"') if self.starts_with("\"\"\"") => {
                    self.close_multiline('"', &mut text);
                    break;
                }
                Some('\\') => {
                    self.advance();
                    if self.at_line_ending_backslash() {
                        text.detach();
                        while matches!(self.peek(), Some(' ' | '\t' | '\n'))
                            || self.starts_with("\r\n")
                        {
                            self.advance();
                        }
                    } else {
                        let c = self.lex_escape(at)?;
                        text.push(c);
                    }
                }
                Some('\r') if self.peek_nth(1) == Some('\n') => {
                    self.advance_by(2);
                    text.take('\r');
                    text.take('\n');
                }
                Some('\n') => {
                    self.advance();
                    text.take('\n');
                }
                Some(c) if is_control(c) => {
                    return Err(self.error(
                        LexErrorKind::ControlCharacter,
                        at,
                        format!("control character {:?} in string", c),
                    ))
                }
                Some(c) => {
                    self.advance();
                    text.take(c);
                }
            }
        }
        let token = self.token(TokenKind::String, start);
        Ok(token.with_literal(Literal::Str(text.finish())))
    }

    fn lex_literal_string(&mut self, mode: LexMode) -> Result<Token<'src>> {
        let start = self.here();
        if mode == LexMode::Value && self.starts_with("'''") {
            return self.lex_multiline_literal(start);
        }
        self.advance();
        let content_start = self.offset;
        loop {
            let at = self.here();
            match self.peek() {
                None | Some('\n') => {
                    return Err(self.error(
                        LexErrorKind::UnterminatedString,
                        start,
                        "unterminated literal string",
                    ))
                }
                Some('\'') => break,
                Some(c) if is_control(c) => {
                    return Err(self.error(
                        LexErrorKind::ControlCharacter,
                        at,
                        format!("control character {:?} in string", c),
                    ))
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
        let content = &self.source[content_start..self.offset];
        self.advance();
        let token = self.token(Self::string_kind(mode), start);
        Ok(token.with_literal(Literal::Str(Cow::Borrowed(content))))
    }

    fn lex_multiline_literal(&mut self, start: Position) -> Result<Token<'src>> {
        self.advance_by(3);
        self.trim_leading_newline();
        let mut text = Text::new(self.source, self.offset);
        loop {
            let at = self.here();
            match self.peek() {
                None => {
                    return Err(self.error(
                        LexErrorKind::UnterminatedString,
                        start,
                        "unterminated multi-line literal string",
                    ))
                }
                Some('\'') if self.starts_with("'''") => {
                    self.close_multiline('\'', &mut text);
                    break;
                }
                Some('\r') if self.peek_nth(1) == Some('\n') => {
                    self.advance_by(2);
                    text.take('\r');
                    text.take('\n');
                }
                Some(c) if c != '\n' && is_control(c) => {
                    return Err(self.error(
                        LexErrorKind::ControlCharacter,
                        at,
                        format!("control character {:?} in string", c),
                    ))
                }
                Some(c) => {
                    self.advance();
                    text.take(c);
                }
            }
        }
        let token = self.token(TokenKind::String, start);
        Ok(token.with_literal(Literal::Str(text.finish())))
    }

    fn trim_leading_newline(&mut self) {
        if self.starts_with("\n") {
            self.advance();
        } else if self.starts_with("\r\n") {
            self.advance_by(2);
        }
    }

    /// Handles a run of three or more `quote` characters inside a multi-line
    /// string. Up to two of them belong to the content, the last three close it.
    fn close_multiline(&mut self, quote: char, text: &mut Text<'src>) {
        let run = self.remaining().chars().take_while(|&c| c == quote).count();
        let extra = run.saturating_sub(3).min(2);
        for _ in 0..extra {
            self.advance();
            text.take(quote);
        }
        self.advance_by(3);
    }

    /// After a `\` in a multi-line basic string: whether only whitespace
    /// follows on this line.
    fn at_line_ending_backslash(&self) -> bool {
        let rest = self.remaining().trim_start_matches([' ', '\t']);
        rest.starts_with('\n') || rest.starts_with("\r\n")
    }

    /// Lexes the escape after a consumed backslash at `at`.
    fn lex_escape(&mut self, at: Position) -> Result<char> {
        let c = self.advance().ok_or_else(|| {
            self.error(LexErrorKind::UnterminatedString, at, "unterminated escape")
        })?;
        let ch = match c {
            'b' => '\u{0008}',
            't' => '\t',
            'n' => '\n',
            'f' => '\u{000C}',
            'r' => '\r',
            '"' => '"',
            '\\' => '\\',
            'u' => return self.lex_unicode_escape(at, 4),
            'U' => return self.lex_unicode_escape(at, 8),
            other => {
                return Err(self.error(
                    LexErrorKind::InvalidEscape,
                    at,
                    format!("invalid escape `\\{}`", other),
                ))
            }
        };
        Ok(ch)
    }

    fn lex_unicode_escape(&mut self, at: Position, digits: usize) -> Result<char> {
        let hex: String = self.remaining().chars().take(digits).collect();
        if hex.len() != digits || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(self.error(
                LexErrorKind::InvalidEscape,
                at,
                format!("expected {} hex digits in unicode escape", digits),
            ));
        }
        self.advance_by(digits);
        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| {
                self.error(
                    LexErrorKind::InvalidEscape,
                    at,
                    format!("`{}` is not a unicode scalar value", hex),
                )
            })
    }

    /// Lexes a run of bare value characters and classifies it as a boolean,
    /// datetime, float or integer.
    fn lex_bare_value(&mut self) -> Result<Token<'src>> {
        let start = self.here();
        while let Some(c) = self.peek() {
            if is_bare_value_char(c) {
                self.advance();
            } else if c == ' ' && self.at_date_time_space(start) {
                self.advance();
            } else {
                break;
            }
        }
        let text = &self.source[start.offset..self.offset];

        match text {
            "true" | "false" => {
                let token = self.token(TokenKind::Boolean, start);
                return Ok(token.with_literal(Literal::Boolean(text == "true")));
            }
            "inf" | "+inf" => return Ok(self.float_token(start, f64::INFINITY)),
            "-inf" => return Ok(self.float_token(start, f64::NEG_INFINITY)),
            "nan" | "+nan" => return Ok(self.float_token(start, f64::NAN)),
            "-nan" => return Ok(self.float_token(start, -f64::NAN)),
            _ => {}
        }

        if looks_like_datetime(text) {
            let datetime: Datetime = text.parse().map_err(|e| {
                self.error(
                    LexErrorKind::InvalidDateTime,
                    start,
                    format!("invalid datetime `{}`: {}", text, e),
                )
            })?;
            let token = self.token(TokenKind::Datetime, start);
            return Ok(token.with_literal(Literal::Datetime(datetime)));
        }

        if text.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(self.error(
                LexErrorKind::UnexpectedCharacter,
                start,
                format!("expected a value, found `{}`", text),
            ));
        }

        match parse_number(text) {
            Ok(Number::Integer(i)) => {
                let token = self.token(TokenKind::Integer, start);
                Ok(token.with_literal(Literal::Integer(i)))
            }
            Ok(Number::Float(f)) => Ok(self.float_token(start, f)),
            Err(reason) => Err(self.error(
                LexErrorKind::InvalidNumber,
                start,
                format!("invalid number `{}`: {}", text, reason),
            )),
        }
    }

    fn float_token(&self, start: Position, value: f64) -> Token<'src> {
        self.token(TokenKind::Float, start)
            .with_literal(Literal::Float(value))
    }

    /// A single space may separate a full date from a time.
    fn at_date_time_space(&self, start: Position) -> bool {
        let so_far = &self.source[start.offset..self.offset];
        let mut ahead = self.remaining()[1..].chars();
        is_full_date(so_far)
            && matches!(
                (ahead.next(), ahead.next(), ahead.next()),
                (Some(a), Some(b), Some(':')) if a.is_ascii_digit() && b.is_ascii_digit()
            )
    }
}

impl<'src> Iterator for Tokenizer<'src> {
    type Item = Result<Token<'src>>;

    /// Yields tokens up to and including [`TokenKind::Eof`], then `None`.
    /// Iteration also stops after the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mode = if self.after_equals || self.open.last() == Some(&Open::Array) {
            LexMode::Value
        } else {
            LexMode::Key
        };
        let token = match self.next_token(mode) {
            Ok(token) => token,
            Err(err) => {
                self.done = true;
                return Some(Err(err));
            }
        };
        match token.kind {
            TokenKind::LeftBracket if mode == LexMode::Value => self.open.push(Open::Array),
            TokenKind::LeftBrace => self.open.push(Open::InlineTable),
            TokenKind::RightBracket if self.open.last() == Some(&Open::Array) => {
                self.open.pop();
            }
            TokenKind::RightBrace => {
                self.open.pop();
            }
            _ => {}
        }
        self.after_equals = token.kind == TokenKind::Equals;
        Some(Ok(token))
    }
}

/// Key or string text under construction, borrowed from the source until an
/// escape forces a copy.
struct Text<'src> {
    source: &'src str,
    start: usize,
    end: usize,
    owned: Option<String>,
}

impl<'src> Text<'src> {
    fn new(source: &'src str, start: usize) -> Self {
        Text {
            source,
            start,
            end: start,
            owned: None,
        }
    }

    /// Appends `c`, which directly follows the text taken so far in the source.
    fn take(&mut self, c: char) {
        match &mut self.owned {
            Some(s) => s.push(c),
            None => self.end += c.len_utf8(),
        }
    }

    fn detach(&mut self) {
        if self.owned.is_none() {
            self.owned = Some(self.source[self.start..self.end].to_string());
        }
    }

    fn push(&mut self, c: char) {
        self.detach();
        if let Some(s) = &mut self.owned {
            s.push(c);
        }
    }

    fn finish(self) -> Cow<'src, str> {
        match self.owned {
            Some(s) => Cow::Owned(s),
            None => Cow::Borrowed(&self.source[self.start..self.end]),
        }
    }
}

#[inline]
fn is_bare_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

#[inline]
fn is_bare_value_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | '.' | ':')
}

#[inline]
fn is_control(c: char) -> bool {
    (c < ' ' && c != '\t') || c == '\u{7f}'
}

fn is_full_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b.iter().enumerate().all(|(i, &c)| match i {
            4 | 7 => c == b'-',
            _ => c.is_ascii_digit(),
        })
}

fn looks_like_datetime(s: &str) -> bool {
    let b = s.as_bytes();
    let digits = |n: usize| b.len() > n && b[..n].iter().all(u8::is_ascii_digit);
    (digits(4) && b[4] == b'-') || (digits(2) && b[2] == b':')
}

enum Number {
    Integer(i64),
    Float(f64),
}

fn parse_number(text: &str) -> std::result::Result<Number, &'static str> {
    let (sign, body) = match text.as_bytes().first() {
        Some(b'+') => ("", &text[1..]),
        Some(b'-') => ("-", &text[1..]),
        _ => ("", text),
    };
    let has_sign = body.len() != text.len();

    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        if let Some(digits) = body.strip_prefix(prefix) {
            if has_sign {
                return Err("a sign is not allowed with a radix prefix");
            }
            check_digit_groups(digits, |c| c.is_digit(radix))?;
            let cleaned = digits.replace('_', "");
            let value = u64::from_str_radix(&cleaned, radix).map_err(|_| "out of range")?;
            return i64::try_from(value)
                .map(Number::Integer)
                .map_err(|_| "out of range");
        }
    }

    if body.contains(['.', 'e', 'E']) {
        return parse_float(sign, body).map(Number::Float);
    }

    check_integer_part(body)?;
    let cleaned = format!("{}{}", sign, body.replace('_', ""));
    cleaned
        .parse::<i64>()
        .map(Number::Integer)
        .map_err(|_| "out of range")
}

fn parse_float(sign: &str, body: &str) -> std::result::Result<f64, &'static str> {
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(i) => (&body[..i], Some(&body[i + 1..])),
        None => (body, None),
    };
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (mantissa, None),
    };
    check_integer_part(int_part)?;
    if let Some(frac) = frac_part {
        check_digit_groups(frac, |c| c.is_ascii_digit())
            .map_err(|_| "a decimal point must be followed by digits")?;
    }
    if let Some(exp) = exponent {
        let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
        check_digit_groups(digits, |c| c.is_ascii_digit())
            .map_err(|_| "an exponent must be followed by digits")?;
    }
    let cleaned = format!("{}{}", sign, body.replace('_', ""));
    let value: f64 = cleaned.parse().map_err(|_| "malformed float")?;
    if value.is_infinite() {
        return Err("out of range");
    }
    Ok(value)
}

/// Decimal digits without a leading zero, except for `0` itself.
fn check_integer_part(digits: &str) -> std::result::Result<(), &'static str> {
    check_digit_groups(digits, |c| c.is_ascii_digit())?;
    if digits.len() > 1 && digits.starts_with('0') {
        return Err("leading zeros are not allowed");
    }
    Ok(())
}

/// Non-empty digits where every underscore sits between two digits.
fn check_digit_groups(
    digits: &str,
    is_digit: impl Fn(char) -> bool,
) -> std::result::Result<(), &'static str> {
    if digits.is_empty() {
        return Err("expected digits");
    }
    if digits.starts_with('_') || digits.ends_with('_') || digits.contains("__") {
        return Err("underscores must be between digits");
    }
    if !digits.chars().all(|c| c == '_' || is_digit(c)) {
        return Err("unexpected character");
    }
    Ok(())
}
