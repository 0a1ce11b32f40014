//! Decode options, custom hooks and error reporting.
//!
//! Run with: cargo run --example decode_hooks

use serde::Deserialize;
use serde_toml::{from_str_with_options, DecodeOptions, ErrorKind, KeyMatching, Table, Value};
use std::error::Error;

/// Written in documents as `"250ms"` or `"3s"`, or as `{ millis = 250 }`.
#[derive(Debug, Deserialize)]
struct Timeout {
    millis: u64,
}

#[derive(Debug, Deserialize)]
struct Service {
    name: String,
    connect: Timeout,
    read: Timeout,
}

fn parse_timeout(value: &Value) -> Result<Value, String> {
    let text = match value {
        Value::String(text) => text,
        other => return Ok(other.clone()),
    };
    let millis = if let Some(ms) = text.strip_suffix("ms") {
        ms.parse::<i64>().map_err(|e| e.to_string())?
    } else if let Some(s) = text.strip_suffix('s') {
        s.parse::<i64>().map_err(|e| e.to_string())? * 1000
    } else {
        return Err(format!("{:?} has no unit", text));
    };
    let mut table = Table::new();
    table.insert("millis", Value::Integer(millis));
    Ok(Value::Table(table))
}

fn main() -> Result<(), Box<dyn Error>> {
    let options = DecodeOptions::new()
        .deny_unknown_fields()
        .with_key_matching(KeyMatching::CaseInsensitive)
        .with_hook("Timeout", parse_timeout);

    let service: Service = from_str_with_options(
        "Name = \"api\"\nconnect = \"250ms\"\nread = { millis = 5000 }",
        &options,
    )?;
    println!("{:?}", service);

    let documents = [
        "name = \"api\"\nconnect = \"fast\"\nread = \"1s\"",
        "name = \"api\"\nconnect = \"1s\"\nread = \"1s\"\nretries = 3",
        "name = \"api\"\nconnect = \"1s\"",
        "name = \"api\"\nname = \"again\"",
    ];
    for document in documents {
        match from_str_with_options::<Service>(document, &options) {
            Ok(service) => println!("decoded {:?}", service),
            Err(e) => {
                let stage = match e.kind() {
                    ErrorKind::Lex(_) => "lex",
                    ErrorKind::Parse(_) => "parse",
                    ErrorKind::Bind(_) => "bind",
                    ErrorKind::Configuration => "configuration",
                    ErrorKind::Encode => "encode",
                };
                println!("{} error: {}", stage, e);
            }
        }
    }

    Ok(())
}
