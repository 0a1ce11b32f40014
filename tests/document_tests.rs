//! Document syntax conformance: what parses into which tree, and what is rejected.

use serde_toml::{parse, ErrorKind, LexErrorKind, ParseErrorKind, Position, Value};

fn get<'a>(tree: &'a Value, path: &[&str]) -> &'a Value {
    tree.pointer(path)
        .unwrap_or_else(|| panic!("missing {:?} in {}", path, tree))
}

fn error_kind(src: &str) -> ErrorKind {
    match parse(src) {
        Ok(tree) => panic!("expected {:?} to fail, got {}", src, tree),
        Err(e) => e.kind(),
    }
}

#[test]
fn test_string_forms() {
    let tree = parse(
        r#"
basic = "I'm a string. \"You can quote me\". Tab\tNewline\nUnicode \u00E9 \U0001F600"
literal = 'C:\Users\nodejs\templates'
multi = """
Roses are red
Violets are blue"""
folded = """\
       The quick brown \
       fox."""
quotes = """Here are two quotation marks: "". Simple enough."""
trailing = """ends with ""quotes"""""
raw = '''
The first newline is
trimmed in raw strings.
'''
"#,
    )
    .unwrap();

    assert_eq!(
        get(&tree, &["basic"]).as_str(),
        Some("I'm a string. \"You can quote me\". Tab\tNewline\nUnicode é 😀")
    );
    assert_eq!(
        get(&tree, &["literal"]).as_str(),
        Some(r"C:\Users\nodejs\templates")
    );
    assert_eq!(
        get(&tree, &["multi"]).as_str(),
        Some("Roses are red\nViolets are blue")
    );
    assert_eq!(get(&tree, &["folded"]).as_str(), Some("The quick brown fox."));
    assert_eq!(
        get(&tree, &["quotes"]).as_str(),
        Some("Here are two quotation marks: \"\". Simple enough.")
    );
    assert_eq!(get(&tree, &["trailing"]).as_str(), Some("ends with \"\"quotes\"\""));
    assert_eq!(
        get(&tree, &["raw"]).as_str(),
        Some("The first newline is\ntrimmed in raw strings.\n")
    );
}

#[test]
fn test_integer_forms() {
    let tree = parse(
        "a = +99\nb = -17\nc = 0\nd = 1_000\ne = 0xDEAD_beef\nf = 0o755\ng = 0b1101\nh = -9223372036854775808",
    )
    .unwrap();
    let ints: Vec<_> = ["a", "b", "c", "d", "e", "f", "g", "h"]
        .iter()
        .map(|k| get(&tree, &[k]).as_integer())
        .collect();
    assert_eq!(
        ints,
        vec![
            Some(99),
            Some(-17),
            Some(0),
            Some(1000),
            Some(0xDEAD_BEEF),
            Some(0o755),
            Some(0b1101),
            Some(i64::MIN)
        ]
    );
}

#[test]
fn test_float_forms() {
    let tree = parse("a = +1.0\nb = 3.1415\nc = -0.01\nd = 5e+22\ne = 1e06\nf = -2E-2\ng = 6.626e-34\nh = 224_617.445_991").unwrap();
    let floats: Vec<_> = ["a", "b", "c", "d", "e", "f", "g", "h"]
        .iter()
        .map(|k| get(&tree, &[k]))
        .collect();
    assert!(floats.iter().all(|v| v.is_float()));
    assert_eq!(floats[3].as_float(), Some(5e22));
    assert_eq!(floats[7].as_float(), Some(224_617.445_991));
}

#[test]
fn test_keys() {
    let tree = parse(
        "bare_key = 1\nbare-key = 2\n1234 = 3\n\"127.0.0.1\" = 4\n'quoted \"value\"' = 5\nsite.\"google.com\" = true\n\"\" = 6",
    )
    .unwrap();
    assert_eq!(get(&tree, &["1234"]).as_integer(), Some(3));
    assert_eq!(get(&tree, &["127.0.0.1"]).as_integer(), Some(4));
    assert_eq!(get(&tree, &["quoted \"value\""]).as_integer(), Some(5));
    assert_eq!(get(&tree, &["site", "google.com"]).as_bool(), Some(true));
    assert_eq!(get(&tree, &[""]).as_integer(), Some(6));
}

#[test]
fn test_arrays_may_span_lines() {
    let tree = parse("a = [\n  1, # one\n  'two',\n  [3.0],\n]\nb = []").unwrap();
    let a = get(&tree, &["a"]).as_array().unwrap();
    assert_eq!(a.len(), 3);
    assert_eq!(a.get(1).and_then(Value::as_str), Some("two"));
    assert!(get(&tree, &["b"]).as_array().unwrap().is_empty());
}

#[test]
fn test_tables_and_arrays_of_tables() {
    let tree = parse(
        r#"
[fruit]
apple.color = "red"
apple.taste.sweet = true

[[fruits]]
name = "apple"

[fruits.physical]
color = "red"

[[fruits.varieties]]
name = "red delicious"

[[fruits]]
name = "banana"
"#,
    )
    .unwrap();

    assert_eq!(get(&tree, &["fruit", "apple", "taste", "sweet"]).as_bool(), Some(true));
    let fruits = get(&tree, &["fruits"]).as_array().unwrap();
    assert!(fruits.is_array_of_tables());
    assert_eq!(fruits.len(), 2);
    assert_eq!(
        fruits.get(0).and_then(|f| f.pointer(&["physical", "color"])),
        Some(&Value::from("red"))
    );
    assert_eq!(
        fruits
            .get(0)
            .and_then(|f| f.get("varieties"))
            .and_then(Value::as_array)
            .map(|v| v.len()),
        Some(1)
    );
    assert_eq!(fruits.get(1).and_then(|f| f.get("name")), Some(&Value::from("banana")));
}

#[test]
fn test_positions() {
    let tree = parse("[server]\n  host = \"h\"\n  ports = [1, 2]").unwrap();
    let server = get(&tree, &["server"]).as_table().unwrap();
    assert_eq!(server.position_of("host"), Some(Position::new(2, 3, 11)));
    let ports = server.get("ports").and_then(Value::as_array).unwrap();
    assert_eq!(ports.position_of(1).map(|p| p.column), Some(15));
}

#[test]
fn test_structural_errors() {
    let cases: &[(&str, ParseErrorKind)] = &[
        ("a = 1\na = 2", ParseErrorKind::DuplicateKey),
        ("a.b = 1\na.b = 2", ParseErrorKind::DuplicateKey),
        ("a = 1\na.b = 2", ParseErrorKind::DuplicateKey),
        ("a = { b = 1 }\na.c = 2", ParseErrorKind::DuplicateKey),
        ("a = { b = 1 }\n[a]", ParseErrorKind::DuplicateKey),
        ("[a]\nb.c = 1\n[a.b]", ParseErrorKind::DuplicateKey),
        ("[a]\n[a]", ParseErrorKind::RedefinedTable),
        ("[a.b]\n[a]\n[a]", ParseErrorKind::RedefinedTable),
        ("a = []\n[[a]]", ParseErrorKind::MixedArrayTableTypes),
        ("[[a]]\n[a]", ParseErrorKind::MixedArrayTableTypes),
        ("[a]\n[[a]]", ParseErrorKind::MixedArrayTableTypes),
        ("[]", ParseErrorKind::InvalidTableHeader),
        ("[a] b = 1", ParseErrorKind::InvalidTableHeader),
        ("[a", ParseErrorKind::InvalidTableHeader),
        ("a = ", ParseErrorKind::UnexpectedToken),
        ("a = 1 b = 2", ParseErrorKind::UnexpectedToken),
        ("a = { b = 1, }", ParseErrorKind::UnexpectedToken),
        ("= 1", ParseErrorKind::UnexpectedToken),
    ];
    for (src, kind) in cases {
        assert_eq!(error_kind(src), ErrorKind::Parse(*kind), "{:?}", src);
    }
}

#[test]
fn test_lexical_errors() {
    let cases: &[(&str, LexErrorKind)] = &[
        ("a = 01", LexErrorKind::InvalidNumber),
        ("a = 1__0", LexErrorKind::InvalidNumber),
        ("a = +0x1", LexErrorKind::InvalidNumber),
        ("a = 1.", LexErrorKind::InvalidNumber),
        ("a = 9223372036854775808", LexErrorKind::InvalidNumber),
        ("a = \"\\q\"", LexErrorKind::InvalidEscape),
        ("a = \"open", LexErrorKind::UnterminatedString),
        ("a = 1979-13-01", LexErrorKind::InvalidDateTime),
        ("a = 1979-02-30", LexErrorKind::InvalidDateTime),
    ];
    for (src, kind) in cases {
        assert_eq!(error_kind(src), ErrorKind::Lex(*kind), "{:?}", src);
    }
}

#[test]
fn test_error_positions() {
    let err = parse("a = 1\n[b]\nc = 2\nc = 3").unwrap_err();
    assert_eq!(err.position(), Some(Position::new(4, 1, 16)));
    assert!(err.to_string().contains("line 4"));
}
