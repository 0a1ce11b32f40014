//! Writing value trees as document text.
//!
//! Entries are written in table order, so a written tree parses back with the
//! same key order. A table body holds every entry up to the last one that has
//! to be a `key = value` line. Sub-tables inside the body are flattened into
//! dotted keys and arrays of tables are written inline. The entries after it
//! become `[section]` and `[[section]]` blocks.
//!
//! Tables parsed from `{ ... }` and arrays that are not made of tables are
//! written inline. Tables that came from dotted keys are written as dotted
//! keys again. A table that only holds sections gets no header of its own, so
//! documents that declared `[a.b]` without `[a]` keep that shape.
//!
//! ```rust
//! let tree = serde_toml::parse("title = \"x\"\n[owner]\nname = \"Tom\"").unwrap();
//! let text = serde_toml::to_string(&tree).unwrap();
//! assert_eq!(text, "title = \"x\"\n\n[owner]\nname = \"Tom\"\n");
//! ```

use crate::map::TableOrigin;
use crate::{Array, Table, Value};
use std::fmt::Write as _;

/// Accumulates document text.
pub(crate) struct Encoder {
    output: String,
}

impl Encoder {
    pub(crate) fn new() -> Self {
        Encoder {
            output: String::with_capacity(256),
        }
    }

    pub(crate) fn into_inner(self) -> String {
        self.output
    }

    /// Writes `table` as the root of a document.
    pub(crate) fn write_document(&mut self, table: &Table) {
        let mut path = Vec::new();
        self.write_table(&mut path, table);
    }

    fn write_table(&mut self, path: &mut Vec<String>, table: &Table) {
        let body = body_len(table);
        let mut keys = Vec::new();
        for (key, value) in table.iter().take(body) {
            keys.push(key.as_str());
            self.write_line(&mut keys, value);
            keys.pop();
        }

        for (key, value) in table.iter().skip(body) {
            path.push(key.clone());
            match value {
                Value::Table(child) => {
                    if needs_header(child) {
                        self.write_header(path, false);
                    }
                    self.write_table(path, child);
                }
                Value::Array(array) => {
                    for element in array {
                        if let Value::Table(child) = element {
                            self.write_header(path, true);
                            self.write_table(path, child);
                        }
                    }
                }
                _ => {}
            }
            path.pop();
        }
    }

    /// Writes `value` under the dotted key `keys`, descending into tables
    /// that can be spelled as dotted keys.
    fn write_line<'v>(&mut self, keys: &mut Vec<&'v str>, value: &'v Value) {
        match value {
            Value::Table(table) if !table.is_inline() && !table.is_empty() => {
                for (key, child) in table.iter() {
                    keys.push(key.as_str());
                    self.write_line(keys, child);
                    keys.pop();
                }
            }
            _ => {
                for (i, key) in keys.iter().enumerate() {
                    if i > 0 {
                        self.output.push('.');
                    }
                    write_key(&mut self.output, key);
                }
                self.output.push_str(" = ");
                write_inline(&mut self.output, value);
                self.output.push('\n');
            }
        }
    }

    fn write_header(&mut self, path: &[String], array: bool) {
        if !self.output.is_empty() {
            self.output.push('\n');
        }
        self.output.push_str(if array { "[[" } else { "[" });
        for (i, key) in path.iter().enumerate() {
            if i > 0 {
                self.output.push('.');
            }
            write_key(&mut self.output, key);
        }
        self.output.push_str(if array { "]]\n" } else { "]\n" });
    }
}

/// Tables written under a `[section]` header when they come after the body.
fn is_section(value: &Value) -> bool {
    matches!(
        value,
        Value::Table(table) if !table.is_inline() && table.origin != TableOrigin::Dotted
    )
}

/// Non-empty arrays whose elements are all section tables.
fn is_table_array(value: &Value) -> bool {
    match value {
        Value::Array(array) => !array.is_empty() && array.iter().all(is_section),
        _ => false,
    }
}

/// Number of leading entries written as `key = value` lines: everything up to
/// and including the last entry that cannot be a section.
fn body_len(table: &Table) -> usize {
    table
        .values()
        .enumerate()
        .filter(|(_, value)| !is_section(value) && !is_table_array(value))
        .last()
        .map_or(0, |(i, _)| i + 1)
}

/// A table needs its own header unless it is reachable purely through the
/// headers of its sub-tables.
fn needs_header(table: &Table) -> bool {
    table.is_empty() || body_len(table) > 0
}

/// Writes `value` in inline syntax: strings quoted, tables as `{ k = v }`.
pub(crate) fn write_inline(out: &mut String, value: &Value) {
    match value {
        Value::String(s) => write_string(out, s),
        Value::Integer(i) => {
            let _ = write!(out, "{}", i);
        }
        Value::Float(f) => write_float(out, *f),
        Value::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Datetime(dt) => {
            let _ = write!(out, "{}", dt);
        }
        Value::Array(array) => write_array(out, array),
        Value::Table(table) => {
            if table.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push_str("{ ");
            for (i, (key, value)) in table.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_key(out, key);
                out.push_str(" = ");
                write_inline(out, value);
            }
            out.push_str(" }");
        }
    }
}

fn write_array(out: &mut String, array: &Array) {
    out.push('[');
    for (i, element) in array.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_inline(out, element);
    }
    out.push(']');
}

fn write_float(out: &mut String, f: f64) {
    if f.is_nan() {
        out.push_str("nan");
    } else if f.is_infinite() {
        out.push_str(if f > 0.0 { "inf" } else { "-inf" });
    } else {
        // Debug keeps a fractional part or exponent, so `3.0` stays a float.
        let _ = write!(out, "{:?}", f);
    }
}

#[inline]
fn is_bare_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

fn write_key(out: &mut String, key: &str) {
    if is_bare_key(key) {
        out.push_str(key);
    } else {
        write_string(out, key);
    }
}

/// Writes a basic string, escaping quotes, backslashes and control characters.
fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if c.is_control() && (c as u32) < 0x80 => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn encode(src: &str) -> String {
        let tree = parse(src).unwrap();
        let mut encoder = Encoder::new();
        encoder.write_document(tree.as_table().unwrap());
        encoder.into_inner()
    }

    #[test]
    fn test_plain_keys_before_sections() {
        let text = encode("[a]\nx = 1\n[b]\ny = 2");
        assert_eq!(text, "[a]\nx = 1\n\n[b]\ny = 2\n");
    }

    #[test]
    fn test_implicit_tables_have_no_header() {
        assert_eq!(encode("[a.b]\nc = 1"), "[a.b]\nc = 1\n");
        assert_eq!(encode("[a]\n[a.b]\nc = 1"), "[a.b]\nc = 1\n");
        assert_eq!(encode("[empty]"), "[empty]\n");
    }

    #[test]
    fn test_array_of_tables() {
        let text = encode("[[p]]\nn = 1\n[p.q]\nm = 2\n[[p]]\nn = 3");
        assert_eq!(text, "[[p]]\nn = 1\n\n[p.q]\nm = 2\n\n[[p]]\nn = 3\n");
    }

    #[test]
    fn test_inline_tables_stay_inline() {
        assert_eq!(
            encode("point = { x = 1, y = 2 }\nlist = [{ a = 1 }]\ne = {}"),
            "point = { x = 1, y = 2 }\nlist = [{ a = 1 }]\ne = {}\n"
        );
    }

    #[test]
    fn test_quoted_keys_and_strings() {
        assert_eq!(
            encode("\"a b\" = \"line\\nbreak \\\"q\\\"\"\n'c.d' = '\\x'"),
            "\"a b\" = \"line\\nbreak \\\"q\\\"\"\n\"c.d\" = \"\\\\x\"\n"
        );
        let mut out = String::new();
        write_string(&mut out, "\u{1}é");
        assert_eq!(out, "\"\\u0001é\"");
    }

    #[test]
    fn test_scalars() {
        let mut out = String::new();
        for value in [
            Value::Float(3.0),
            Value::Float(-0.5),
            Value::Float(f64::INFINITY),
            Value::Float(f64::NEG_INFINITY),
            Value::Float(f64::NAN),
            Value::Integer(-7),
            Value::Boolean(false),
        ] {
            write_inline(&mut out, &value);
            out.push(' ');
        }
        assert_eq!(out, "3.0 -0.5 inf -inf nan -7 false ");
    }

    #[test]
    fn test_dotted_keys_stay_in_place() {
        assert_eq!(
            encode("a.b = 1979-05-27T07:32:00Z\nc = 07:32:00"),
            "a.b = 1979-05-27T07:32:00Z\nc = 07:32:00\n"
        );
        assert_eq!(
            encode("[t]\nx.y.z = 1\nx.w = 2\nv = 3"),
            "[t]\nx.y.z = 1\nx.w = 2\nv = 3\n"
        );
    }

    #[test]
    fn test_sections_before_plain_keys_are_flattened() {
        let mut inner = Table::new();
        inner.insert("a", Value::Integer(1));
        inner.insert("e", Value::Table(Table::new()));
        let mut element = Table::new();
        element.insert("n", Value::Integer(1));
        let mut list = Array::new();
        list.push(Value::Table(element));
        let mut root = Table::new();
        root.insert("t", Value::Table(inner.clone()));
        root.insert("list", Value::Array(list));
        root.insert("n", Value::Integer(2));
        root.insert("s", Value::Table(inner));

        let mut encoder = Encoder::new();
        encoder.write_document(&root);
        let text = encoder.into_inner();
        assert_eq!(
            text,
            "t.a = 1\nt.e = {}\nlist = [{ n = 1 }]\nn = 2\n\n[s]\na = 1\n\n[s.e]\n"
        );
        assert_eq!(parse(&text).unwrap(), Value::Table(root));
    }

    #[test]
    fn test_sections_and_arrays_keep_their_order() {
        let src = "[[p]]\nn = 1\n[q]\nm = 2\n[[r]]\nk = 3";
        let text = encode(src);
        assert_eq!(text, "[[p]]\nn = 1\n\n[q]\nm = 2\n\n[[r]]\nk = 3\n");
        assert_eq!(parse(&text).unwrap(), parse(src).unwrap());
    }
}
