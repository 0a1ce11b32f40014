//! Parsing a document into a value tree and walking it.
//!
//! Run with: cargo run --example dynamic_tree

use serde_toml::{parse, value, Token, TokenKind, Tokenizer, Value};
use std::error::Error;

const DOCUMENT: &str = r#"
# Package manifest
name = "demo"
version.major = 1
version.minor = 4
authors = ["Ana", "Ben"]
released = 2024-03-01

[dependencies]
serde = { version = "1.0", features = ["derive"] }
"#;

fn describe(value: &Value, depth: usize) {
    let indent = "  ".repeat(depth);
    match value {
        Value::Table(table) => {
            for (key, child) in table.iter() {
                println!("{}{} ({})", indent, key, child.type_name());
                describe(child, depth + 1);
            }
        }
        Value::Array(array) => {
            for (i, element) in array.iter().enumerate() {
                println!("{}[{}] = {}", indent, i, element);
            }
        }
        scalar => println!("{}= {}", indent, scalar),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let tree = parse(DOCUMENT)?;
    describe(&tree, 0);

    let minor = tree.pointer(&["version", "minor"]).and_then(Value::as_integer);
    println!("\nminor version: {:?}", minor);

    if let Some(table) = tree.as_table() {
        for (key, _) in table.iter() {
            println!("{} defined at {:?}", key, table.position_of(key));
        }
    }

    // Build a tree by hand and write it out.
    let generated = value!({
        "name" = "generated",
        "flags" = [true, false],
        "limits" = { "cpu" = 2, "memory" = "512M" }
    });
    println!("\n{}", serde_toml::to_string(&generated)?);

    // The token stream behind the tree.
    let tokens = Tokenizer::new("answer = 42 # comment")
        .keep_comments(true)
        .collect::<Result<Vec<Token<'_>>, _>>()?;
    for token in tokens.iter().filter(|t| t.kind != TokenKind::Eof) {
        println!("{:>8} {:?} at {}", token.kind.to_string(), token.lexeme, token.position);
    }

    Ok(())
}
