//! Document Syntax Reference
//!
//! This module documents the document format accepted by [`parse`](crate::parse)
//! and produced by [`to_string`](crate::to_string). It contains no code.
//!
//! # Overview
//!
//! A document is a sequence of lines. Each line is blank, a comment, a
//! `key = value` pair, or a table header. The root of every document is a
//! table.
//!
//! ```text
//! # comment
//! title = "example"
//!
//! [owner]
//! name = "Tom"
//! dob = 1979-05-27T07:32:00-08:00
//!
//! [[products]]
//! name = "Hammer"
//! sku = 738594937
//! ```
//!
//! # Keys
//!
//! | Form    | Example            | Notes                                    |
//! |---------|--------------------|------------------------------------------|
//! | Bare    | `server_1`, `a-b`  | `A-Z a-z 0-9 _ -` only                   |
//! | Basic   | `"key with space"` | escapes allowed                          |
//! | Literal | `'C:\path'`        | no escapes                               |
//! | Dotted  | `site."google.com"`| each segment is one of the forms above   |
//!
//! A dotted key `a.b.c = 1` creates the tables `a` and `a.b` on the way.
//! Those tables may be extended by further dotted keys, but not by headers.
//!
//! # Values
//!
//! | Type     | Example                                    |
//! |----------|--------------------------------------------|
//! | String   | `"basic\n"`, `'literal'`, `"""multi"""`, `'''multi'''` |
//! | Integer  | `42`, `-17`, `1_000`, `0xDEAD_BEEF`, `0o755`, `0b1101` |
//! | Float    | `3.14`, `-0.01`, `5e+22`, `6.626e-34`, `inf`, `-inf`, `nan` |
//! | Boolean  | `true`, `false`                            |
//! | Datetime | `1979-05-27T07:32:00Z`, `1979-05-27T00:32:00.999999-07:00`, `1979-05-27 07:32:00`, `1979-05-27`, `07:32:00` |
//! | Array    | `[ 1, "two", [3.0] ]`                      |
//! | Inline table | `{ x = 1, y.z = 2 }`                   |
//!
//! There is no null literal. An optional field is expressed by leaving its
//! key out.
//!
//! ## Strings
//!
//! Basic strings accept the escapes `\b \t \n \f \r \" \\ \uXXXX \UXXXXXXXX`.
//! Unicode escapes must name a scalar value. Control characters other than
//! tab must be escaped.
//!
//! Multi-line basic strings drop a newline directly after the opening `"""`.
//! A backslash at the end of a line removes the newline and all whitespace
//! up to the next non-whitespace character. Up to two quotes may appear
//! directly before the closing delimiter.
//!
//! ## Numbers
//!
//! - Decimal integers have no leading zeros; `+` and `-` are allowed.
//! - Hex, octal and binary integers take no sign.
//! - Underscores must sit between two digits.
//! - All integers must fit in 64-bit signed range.
//! - A decimal point must have digits on both sides; an exponent needs digits.
//!
//! ## Arrays
//!
//! Arrays may span lines, hold comments, end with a trailing comma and mix
//! element types.
//!
//! ## Inline Tables
//!
//! Inline tables sit on one line, take no trailing comma and are closed: no
//! key or header may add to them afterwards.
//!
//! # Tables
//!
//! ```text
//! [dog."tater.man"]
//! type.name = "pug"
//! ```
//!
//! - `[a.b]` defines table `a.b`; `a` is created implicitly if needed.
//! - A table created implicitly may later be defined by its own header.
//! - Defining a table twice is an error, whether by header or by key.
//! - The keys in a header may not pass through an inline table or a value.
//!
//! ## Arrays of Tables
//!
//! ```text
//! [[fruits]]
//! name = "apple"
//!
//! [fruits.physical]
//! color = "red"
//!
//! [[fruits]]
//! name = "banana"
//! ```
//!
//! Each `[[fruits]]` header appends a new table. A following `[fruits.x]`
//! header refers to the most recently appended element. A name used for an
//! array of tables can not also be used for a static array or a plain table.
//!
//! # Errors
//!
//! | Input                        | Error                                 |
//! |------------------------------|---------------------------------------|
//! | `a = 1` twice                | `ParseErrorKind::DuplicateKey`        |
//! | `[a]` twice                  | `ParseErrorKind::RedefinedTable`      |
//! | `a = []` then `[[a]]`        | `ParseErrorKind::MixedArrayTableTypes`|
//! | `[]`, `[a] b = 1`            | `ParseErrorKind::InvalidTableHeader`  |
//! | `a = 01`                     | `LexErrorKind::InvalidNumber`         |
//! | `a = "\q"`                   | `LexErrorKind::InvalidEscape`         |
//! | `a = 1979-13-01`             | `LexErrorKind::InvalidDateTime`       |
//!
//! # Encoding
//!
//! The writer emits plain keys first, then `[section]` tables, then
//! `[[section]]` arrays of tables. Keys are bare when they only use
//! `A-Z a-z 0-9 _ -` and quoted otherwise. Strings are always basic strings.
//! Tables that hold nothing but sub-tables get no header of their own.
