//! Recursive-descent parser building the value tree.
//!
//! The parser reads one token at a time from the [`Tokenizer`], choosing the
//! [`LexMode`] from its own position in the grammar, and inserts into the
//! *current table*: the root until the first header, then whatever table the
//! last `[a.b]` or `[[a.b]]` header selected. The current table is kept as a
//! key path from the root; path segments that name an array of tables resolve
//! to its last element.
//!
//! Every table remembers how it was created (see `TableOrigin`), which decides
//! whether a later header or dotted key may extend it:
//!
//! | existing \ new      | `[x]` header         | `[[x]]` header        | `x.y = ..` dotted   |
//! |---------------------|----------------------|-----------------------|---------------------|
//! | implicit (`[x.z]`)  | defines it           | mixed table types     | duplicate key       |
//! | explicit (`[x]`)    | redefined table      | mixed table types     | duplicate key       |
//! | dotted (`x.z = ..`) | duplicate key        | mixed table types     | extends it          |
//! | inline (`x = {..}`) | duplicate key        | mixed table types     | duplicate key       |
//! | array of tables     | mixed table types    | appends a table       | duplicate key       |
//! | other value         | duplicate key        | mixed table types     | duplicate key       |

use crate::error::{Error, ParseErrorKind, Result};
use crate::map::TableOrigin;
use crate::token::{Literal, Token, TokenKind};
use crate::tokenizer::{LexMode, Tokenizer};
use crate::{Array, Position, Table, Value};
use tracing::debug;

/// Nesting limit used when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 200;

#[derive(Debug, Clone)]
struct Key {
    name: String,
    position: Position,
}

impl Key {
    fn from_token(token: Token<'_>) -> Self {
        let name = match token.literal {
            Literal::Str(text) => text.into_owned(),
            _ => token.lexeme.to_string(),
        };
        Key {
            name,
            position: token.position,
        }
    }
}

/// `a.b.c` split into the tables it walks through and the key it assigns.
#[derive(Debug)]
struct DottedKey {
    parents: Vec<Key>,
    last: Key,
}

impl DottedKey {
    fn len(&self) -> usize {
        self.parents.len() + 1
    }
}

/// Parses a document into its root [`Table`].
///
/// ```rust
/// use serde_toml::Parser;
///
/// let root = Parser::new("[[x]]\na = 1\n[[x]]\na = 2").parse().unwrap();
/// let x = root.get("x").and_then(|v| v.as_array()).unwrap();
/// assert_eq!(x.len(), 2);
/// ```
pub struct Parser<'src> {
    tokenizer: Tokenizer<'src>,
    root: Table,
    current: Vec<String>,
    depth: usize,
    max_depth: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Parser {
            tokenizer: Tokenizer::new(source),
            root: Table::with_origin(TableOrigin::Explicit, Position::START),
            current: Vec::new(),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Limits how deeply tables and arrays may nest.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn parse(mut self) -> Result<Table> {
        debug!(max_depth = self.max_depth, "Parsing document");
        loop {
            let token = self.tokenizer.next_token(LexMode::Key)?;
            match token.kind {
                TokenKind::Newline => {}
                TokenKind::Eof => break,
                TokenKind::LeftBracket => self.table_header(token.position)?,
                TokenKind::DoubleLeftBracket => self.array_header(token.position)?,
                TokenKind::Key => self.keyval_line(token)?,
                _ => return Err(unexpected(&token, "a key or a table header")),
            }
        }
        debug!(keys = self.root.len(), "Parsed document");
        Ok(self.root)
    }

    fn check_depth(&self, depth: usize, at: Position) -> Result<()> {
        if depth > self.max_depth {
            return Err(Error::parse(
                ParseErrorKind::DepthExceeded,
                at,
                format!("nesting deeper than {} levels", self.max_depth),
            ));
        }
        Ok(())
    }

    fn end_of_line(&mut self, kind: ParseErrorKind, what: &str) -> Result<()> {
        let token = self.tokenizer.next_token(LexMode::Key)?;
        match token.kind {
            TokenKind::Newline | TokenKind::Eof => Ok(()),
            _ => Err(Error::parse(
                kind,
                token.position,
                format!("expected a newline after {}, found {}", what, token.kind),
            )),
        }
    }

    fn keyval_line(&mut self, first: Token<'src>) -> Result<()> {
        let key = self.dotted_key(first)?;
        let depth = self.current.len() + key.len();
        self.check_depth(depth, key.last.position)?;
        self.depth = depth;
        let value = self.value()?;

        let table = match table_at(&mut self.root, &self.current) {
            Some(table) => table,
            None => {
                return Err(Error::parse(
                    ParseErrorKind::InvalidTableHeader,
                    key.last.position,
                    "the current table is no longer reachable",
                ))
            }
        };
        insert_keyval(table, key, value)?;
        self.end_of_line(ParseErrorKind::UnexpectedToken, "a value")
    }

    /// Reads `key(.key)* =` starting from an already consumed key token.
    fn dotted_key(&mut self, first: Token<'src>) -> Result<DottedKey> {
        let mut parents = Vec::new();
        let mut last = Key::from_token(first);
        loop {
            let token = self.tokenizer.next_token(LexMode::Key)?;
            match token.kind {
                TokenKind::Equals => return Ok(DottedKey { parents, last }),
                TokenKind::Dot => {
                    let next = self.tokenizer.next_token(LexMode::Key)?;
                    if next.kind != TokenKind::Key {
                        return Err(unexpected(&next, "a key after `.`"));
                    }
                    parents.push(std::mem::replace(&mut last, Key::from_token(next)));
                }
                _ => return Err(unexpected(&token, "`=` or `.`")),
            }
        }
    }

    /// Reads the keys of a header up to `close`, which is `]` or `]]`.
    fn header_keys(&mut self, close: TokenKind) -> Result<Vec<Key>> {
        let mut keys = Vec::new();
        loop {
            let token = self.tokenizer.next_token(LexMode::Key)?;
            if token.kind != TokenKind::Key {
                return Err(invalid_header(&token, "a key"));
            }
            keys.push(Key::from_token(token));
            let token = self.tokenizer.next_token(LexMode::Key)?;
            match token.kind {
                TokenKind::Dot => {}
                kind if kind == close => break,
                _ => return Err(invalid_header(&token, &format!("`.` or {}", close))),
            }
        }
        if let Some(key) = keys.get(self.max_depth) {
            self.check_depth(keys.len(), key.position)?;
        }
        Ok(keys)
    }

    fn table_header(&mut self, at: Position) -> Result<()> {
        let keys = self.header_keys(TokenKind::RightBracket)?;
        self.end_of_line(ParseErrorKind::InvalidTableHeader, "a table header")?;

        let mut table = &mut self.root;
        let (last, parents) = split_header(&keys, at)?;
        for key in parents {
            table = descend_header(table, key)?;
        }
        define_table(table, last, at)?;
        debug!(header = %header_path(&keys), "Opened table");
        self.current = keys.into_iter().map(|key| key.name).collect();
        Ok(())
    }

    fn array_header(&mut self, at: Position) -> Result<()> {
        let keys = self.header_keys(TokenKind::DoubleRightBracket)?;
        self.end_of_line(ParseErrorKind::InvalidTableHeader, "an array of tables header")?;

        let mut table = &mut self.root;
        let (last, parents) = split_header(&keys, at)?;
        for key in parents {
            table = descend_header(table, key)?;
        }
        append_table(table, last, at)?;
        debug!(header = %header_path(&keys), "Appended table");
        self.current = keys.into_iter().map(|key| key.name).collect();
        Ok(())
    }

    fn value(&mut self) -> Result<Value> {
        let token = self.tokenizer.next_token(LexMode::Value)?;
        self.value_from(token)
    }

    fn value_from(&mut self, token: Token<'src>) -> Result<Value> {
        let value = match token.literal {
            Literal::Str(text) if token.kind == TokenKind::String => {
                Value::String(text.into_owned())
            }
            Literal::Integer(i) => Value::Integer(i),
            Literal::Float(f) => Value::Float(f),
            Literal::Boolean(b) => Value::Boolean(b),
            Literal::Datetime(dt) => Value::Datetime(dt),
            _ => match token.kind {
                TokenKind::LeftBracket => Value::Array(self.array(token.position)?),
                TokenKind::LeftBrace => Value::Table(self.inline_table(token.position)?),
                _ => return Err(unexpected(&token, "a value")),
            },
        };
        Ok(value)
    }

    fn next_skipping_newlines(&mut self) -> Result<Token<'src>> {
        loop {
            let token = self.tokenizer.next_token(LexMode::Value)?;
            if token.kind != TokenKind::Newline {
                return Ok(token);
            }
        }
    }

    /// Elements may span lines and end with a trailing comma.
    fn array(&mut self, at: Position) -> Result<Array> {
        let depth = self.depth;
        self.check_depth(depth + 1, at)?;
        let mut array = Array::inline_at(at);
        loop {
            let token = self.next_skipping_newlines()?;
            if token.kind == TokenKind::RightBracket {
                break;
            }
            let position = token.position;
            self.depth = depth + 1;
            let element = self.value_from(token)?;
            array.push_at(element, position);

            let token = self.next_skipping_newlines()?;
            match token.kind {
                TokenKind::Comma => {}
                TokenKind::RightBracket => break,
                _ => return Err(unexpected(&token, "`,` or `]`")),
            }
        }
        self.depth = depth;
        Ok(array)
    }

    /// A single line of comma separated pairs, without a trailing comma.
    fn inline_table(&mut self, at: Position) -> Result<Table> {
        let depth = self.depth;
        let mut table = Table::with_origin(TableOrigin::Inline, at);
        let mut first = true;
        loop {
            let token = self.tokenizer.next_token(LexMode::Key)?;
            match token.kind {
                TokenKind::RightBrace if first => break,
                TokenKind::RightBrace => {
                    return Err(unexpected(&token, "a key, trailing commas are not allowed"))
                }
                TokenKind::Newline => {
                    return Err(unexpected(&token, "a key, inline tables must be on one line"))
                }
                TokenKind::Key => {}
                _ => return Err(unexpected(&token, "a key")),
            }
            first = false;

            let key = self.dotted_key(token)?;
            self.check_depth(depth + key.len(), key.last.position)?;
            self.depth = depth + key.len();
            let value = self.value()?;
            insert_keyval(&mut table, key, value)?;

            let token = self.tokenizer.next_token(LexMode::Key)?;
            match token.kind {
                TokenKind::Comma => {}
                TokenKind::RightBrace => break,
                _ => return Err(unexpected(&token, "`,` or `}`")),
            }
        }
        self.depth = depth;
        Ok(table)
    }
}

fn unexpected(token: &Token<'_>, expected: &str) -> Error {
    Error::parse(
        ParseErrorKind::UnexpectedToken,
        token.position,
        format!("expected {}, found {}", expected, token.kind),
    )
}

fn invalid_header(token: &Token<'_>, expected: &str) -> Error {
    Error::parse(
        ParseErrorKind::InvalidTableHeader,
        token.position,
        format!("expected {} in table header, found {}", expected, token.kind),
    )
}

fn duplicate_key(key: &Key, existing: &Value) -> Error {
    Error::parse(
        ParseErrorKind::DuplicateKey,
        key.position,
        format!("key `{}` is already defined as {}", key.name, describe(existing)),
    )
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Table(table) => match table.origin {
            TableOrigin::Inline => "an inline table",
            TableOrigin::Dotted => "a table of dotted keys",
            _ => "a table",
        },
        Value::Array(array) if array.is_array_of_tables() => "an array of tables",
        Value::Array(_) => "an array",
        Value::Integer(_) => "an integer",
        other => match other.type_name() {
            "string" => "a string",
            "float" => "a float",
            "boolean" => "a boolean",
            _ => "a datetime",
        },
    }
}

fn header_path(keys: &[Key]) -> String {
    keys.iter()
        .map(|key| key.name.as_str())
        .collect::<Vec<_>>()
        .join(".")
}

fn split_header(keys: &[Key], at: Position) -> Result<(&Key, &[Key])> {
    keys.split_last().ok_or_else(|| {
        Error::parse(
            ParseErrorKind::InvalidTableHeader,
            at,
            "table header without a key",
        )
    })
}

/// Resolves `path` from the root, entering the last table of every array of
/// tables on the way.
fn table_at<'t>(root: &'t mut Table, path: &[String]) -> Option<&'t mut Table> {
    let mut table = root;
    for key in path {
        table = match table.get_mut(key)? {
            Value::Table(child) => child,
            Value::Array(array) => match array.last_mut()? {
                Value::Table(child) => child,
                _ => return None,
            },
            _ => return None,
        };
    }
    Some(table)
}

/// Intermediate segment of a header path.
fn descend_header<'t>(table: &'t mut Table, key: &Key) -> Result<&'t mut Table> {
    if !table.contains_key(&key.name) {
        let implicit = Table::with_origin(TableOrigin::Implicit, key.position);
        table.insert_at(key.name.clone(), Value::Table(implicit), key.position);
    }
    if let Some(existing) = table.get(&key.name) {
        check_header_parent(key, existing)?;
    }
    match table.get_mut(&key.name) {
        Some(Value::Table(child)) => Ok(child),
        Some(Value::Array(array)) => match array.last_mut() {
            Some(Value::Table(child)) => Ok(child),
            _ => Err(not_a_table(key)),
        },
        _ => Err(not_a_table(key)),
    }
}

/// Fails unless `existing` is a table or array of tables a header may enter.
fn check_header_parent(key: &Key, existing: &Value) -> Result<()> {
    match existing {
        Value::Table(child) if !child.is_inline() => Ok(()),
        Value::Array(array) if array.is_array_of_tables() => Ok(()),
        Value::Array(_) => Err(Error::parse(
            ParseErrorKind::MixedArrayTableTypes,
            key.position,
            format!(
                "key `{}` is already defined as {} and cannot hold tables",
                key.name,
                describe(existing)
            ),
        )),
        other => Err(duplicate_key(key, other)),
    }
}

fn not_a_table(key: &Key) -> Error {
    Error::parse(
        ParseErrorKind::MixedArrayTableTypes,
        key.position,
        format!("array `{}` holds a value that is not a table", key.name),
    )
}

/// Final segment of a `[a.b]` header.
fn define_table(table: &mut Table, key: &Key, at: Position) -> Result<()> {
    if !table.contains_key(&key.name) {
        let explicit = Table::with_origin(TableOrigin::Explicit, at);
        table.insert_at(key.name.clone(), Value::Table(explicit), key.position);
        return Ok(());
    }
    match table.get_mut(&key.name) {
        Some(Value::Table(child)) if child.origin == TableOrigin::Implicit => {
            child.origin = TableOrigin::Explicit;
            Ok(())
        }
        Some(Value::Table(child)) if child.origin == TableOrigin::Explicit => Err(Error::parse(
            ParseErrorKind::RedefinedTable,
            at,
            format!("table `{}` is defined more than once", key.name),
        )),
        Some(Value::Array(array)) if array.is_array_of_tables() => Err(Error::parse(
            ParseErrorKind::MixedArrayTableTypes,
            at,
            format!("`{}` is an array of tables, use `[[{}]]`", key.name, key.name),
        )),
        Some(other) => Err(duplicate_key(key, other)),
        None => Ok(()),
    }
}

/// Final segment of a `[[a.b]]` header.
fn append_table(table: &mut Table, key: &Key, at: Position) -> Result<()> {
    if !table.contains_key(&key.name) {
        table.insert_at(
            key.name.clone(),
            Value::Array(Array::of_tables_at(at)),
            key.position,
        );
    }
    match table.get_mut(&key.name) {
        Some(Value::Array(array)) if array.is_array_of_tables() => {
            let element = Table::with_origin(TableOrigin::Explicit, at);
            array.push_at(Value::Table(element), at);
            Ok(())
        }
        Some(other) => Err(Error::parse(
            ParseErrorKind::MixedArrayTableTypes,
            at,
            format!(
                "key `{}` is already defined as {}, not an array of tables",
                key.name,
                describe(other)
            ),
        )),
        None => Err(Error::parse(
            ParseErrorKind::InvalidTableHeader,
            at,
            format!("array `{}` could not be created", key.name),
        )),
    }
}

/// Inserts `a.b.c = value`, creating or extending dotted tables for `a.b`.
fn insert_keyval(table: &mut Table, key: DottedKey, value: Value) -> Result<()> {
    let mut table = table;
    for parent in &key.parents {
        if !table.contains_key(&parent.name) {
            let dotted = Table::with_origin(TableOrigin::Dotted, parent.position);
            table.insert_at(parent.name.clone(), Value::Table(dotted), parent.position);
        }
        match table.get(&parent.name) {
            Some(Value::Table(child)) if child.origin == TableOrigin::Dotted => {}
            Some(other) => return Err(duplicate_key(parent, other)),
            None => {}
        }
        table = match table.get_mut(&parent.name) {
            Some(Value::Table(child)) => child,
            _ => {
                return Err(Error::parse(
                    ParseErrorKind::DuplicateKey,
                    parent.position,
                    format!("table `{}` could not be created", parent.name),
                ))
            }
        };
    }
    if let Some(existing) = table.get(&key.last.name) {
        return Err(duplicate_key(&key.last, existing));
    }
    let position = key.last.position;
    table.insert_at(key.last.name, value, position);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn parse(src: &str) -> Table {
        Parser::new(src).parse().unwrap()
    }

    fn parse_error(src: &str) -> ParseErrorKind {
        match Parser::new(src).parse() {
            Err(Error::Parse { kind, .. }) => kind,
            other => panic!("expected a parse error for {:?}, got {:?}", src, other),
        }
    }

    #[test]
    fn test_keyvals_keep_document_order() {
        let root = parse("b = 1\na = \"two\"\nc = true # done\n");
        let keys: Vec<_> = root.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(root.get("a"), Some(&Value::from("two")));
    }

    #[test]
    fn test_dotted_keys_build_nested_tables() {
        let root = parse("a.b.c = \"x\"\na.b.d = 1");
        let b = root.get("a").and_then(|a| a.get("b")).unwrap();
        assert_eq!(b.get("c"), Some(&Value::from("x")));
        assert_eq!(b.get("d"), Some(&Value::from(1)));
    }

    #[test]
    fn test_headers_select_the_current_table() {
        let root = parse("title = \"t\"\n[server]\nhost = \"h\"\n[server.tls]\non = true\n");
        assert_eq!(root.get("title"), Some(&Value::from("t")));
        let server = root.get("server").unwrap();
        assert_eq!(server.get("host"), Some(&Value::from("h")));
        assert_eq!(server.get("tls").and_then(|t| t.get("on")), Some(&Value::from(true)));
    }

    #[test]
    fn test_array_of_tables() {
        let root = parse("[[x]]\na=1\n[[x]]\na=2");
        let x = root.get("x").and_then(Value::as_array).unwrap();
        assert!(x.is_array_of_tables());
        let a: Vec<_> = x.iter().map(|t| t.get("a").cloned()).collect();
        assert_eq!(a, vec![Some(Value::from(1)), Some(Value::from(2))]);
    }

    #[test]
    fn test_subtable_of_array_element() {
        let root = parse("[[fruit]]\nname = \"apple\"\n[fruit.physical]\ncolor = \"red\"\n[[fruit]]\nname = \"banana\"");
        let fruit = root.get("fruit").and_then(Value::as_array).unwrap();
        assert_eq!(
            fruit.get(0).and_then(|f| f.pointer(&["physical", "color"])),
            Some(&Value::from("red"))
        );
        assert_eq!(fruit.get(1).and_then(|f| f.get("physical")), None);
    }

    #[test]
    fn test_implicit_table_can_be_defined_later() {
        let root = parse("[a.b]\nx = 1\n[a]\ny = 2");
        assert_eq!(root.get("a").and_then(|a| a.get("y")), Some(&Value::from(2)));
        assert_eq!(parse_error("[a.b]\n[a]\n[a]"), ParseErrorKind::RedefinedTable);
    }

    #[test]
    fn test_inline_values() {
        let root = parse("p = { x = 1, y.z = [1, 2,\n 3,] }\ne = {}\nn = [[1], [\"a\"]]");
        let p = root.get("p").and_then(Value::as_table).unwrap();
        assert!(p.is_inline());
        assert_eq!(
            p.get("y").and_then(|y| y.get("z")).and_then(Value::as_array).map(Array::len),
            Some(3)
        );
        assert_eq!(root.get("e").and_then(Value::as_table).map(Table::len), Some(0));
        assert_eq!(root.get("n").and_then(Value::as_array).map(Array::len), Some(2));
    }

    #[test]
    fn test_positions_are_recorded() {
        let root = parse("a = 1\n[t]\n  b = [10, 20]");
        assert_eq!(root.position_of("a"), Some(Position::new(1, 1, 0)));
        let t = root.get("t").and_then(Value::as_table).unwrap();
        assert_eq!(t.position(), Position::new(2, 1, 6));
        let b = t.get("b").and_then(Value::as_array).unwrap();
        assert_eq!(b.position_of(1), Some(Position::new(3, 12, 21)));
    }

    #[test]
    fn test_duplicate_keys() {
        for src in [
            "a = 1\na = 2",
            "a.b = 1\na.b = 2",
            "a = 1\na.b = 2",
            "a = {x = 1}\na.y = 2",
            "p = {x = 1, x = 2}",
            "[t]\nk = 1\n[t.k]",
            "a = {x = 1}\n[a]",
            "a.b.c = \"x\"\n[a.b]\nc = 1\nc = 2",
            "[a]\nb.c = 1\n[a.b]",
            "a = 1\n[a.b]",
        ] {
            assert_eq!(parse_error(src), ParseErrorKind::DuplicateKey, "{}", src);
        }
    }

    #[test]
    fn test_mixed_array_table_types() {
        assert_eq!(parse_error("[a]\n[[a]]"), ParseErrorKind::MixedArrayTableTypes);
        assert_eq!(parse_error("[[a]]\n[a]"), ParseErrorKind::MixedArrayTableTypes);
        assert_eq!(parse_error("a = [1]\n[[a]]"), ParseErrorKind::MixedArrayTableTypes);
        assert_eq!(parse_error("a = []\n[a.b]"), ParseErrorKind::MixedArrayTableTypes);
        assert_eq!(parse_error("a = [{ x = 1 }]\n[a.b]"), ParseErrorKind::MixedArrayTableTypes);
    }

    #[test]
    fn test_invalid_headers() {
        for src in ["[]", "[a", "[a.]", "[[a]", "[a]]", "[a] b = 1", "[a.b c]"] {
            assert_eq!(parse_error(src), ParseErrorKind::InvalidTableHeader, "{}", src);
        }
    }

    #[test]
    fn test_unexpected_tokens() {
        for src in [
            "a = ",
            "a 1",
            "= 1",
            "a = 1 b = 2",
            "a = [1 2]",
            "a = {x = 1,}",
            "a = {x = 1\n}",
            "a = }",
            "a = [1,,]",
        ] {
            assert_eq!(parse_error(src), ParseErrorKind::UnexpectedToken, "{}", src);
        }
    }

    #[test]
    fn test_depth_limit() {
        let nested = format!("a = {}1{}", "[".repeat(10), "]".repeat(10));
        assert!(Parser::new(&nested).with_max_depth(11).parse().is_ok());
        let err = Parser::new(&nested).with_max_depth(10).parse().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse(ParseErrorKind::DepthExceeded));

        assert_eq!(
            Parser::new("[a.b.c]").with_max_depth(2).parse().unwrap_err().kind(),
            ErrorKind::Parse(ParseErrorKind::DepthExceeded)
        );
        assert_eq!(
            Parser::new("[a]\nb.c = 1").with_max_depth(2).parse().unwrap_err().kind(),
            ErrorKind::Parse(ParseErrorKind::DepthExceeded)
        );
    }

    #[test]
    fn test_deep_nesting_is_rejected_not_overflowed() {
        let nested = format!("a = {}", "[".repeat(100_000));
        let err = Parser::new(&nested).parse().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse(ParseErrorKind::DepthExceeded));
    }

    #[test]
    fn test_lex_errors_propagate() {
        let err = Parser::new("a = \"open").parse().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Lex(_)));
    }
}
