//! Binding a configuration document onto typed structs.
//!
//! Run with: cargo run --example decode_config

use serde::{Deserialize, Serialize};
use serde_toml::{from_str, to_string, OffsetDatetime};
use std::collections::BTreeMap;
use std::error::Error;

#[derive(Debug, Serialize, Deserialize)]
struct Config {
    title: String,
    owner: Owner,
    database: Database,
    servers: BTreeMap<String, Server>,
    #[serde(default)]
    clients: Vec<Client>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Owner {
    name: String,
    dob: OffsetDatetime,
}

#[derive(Debug, Serialize, Deserialize)]
struct Database {
    server: String,
    ports: Vec<u16>,
    connection_max: u32,
    enabled: bool,
    timeout_secs: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Server {
    ip: String,
    dc: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Client {
    name: String,
    #[serde(default)]
    weight: u8,
}

const DOCUMENT: &str = r#"
title = "Example"

[owner]
name = "Tom Preston-Werner"
dob = 1979-05-27T07:32:00-08:00

[database]
server = "192.168.1.1"
ports = [ 8001, 8001, 8002 ]
connection_max = 5000
enabled = true

[servers.alpha]
ip = "10.0.0.1"
dc = "eqdc10"

[servers.beta]
ip = "10.0.0.2"
dc = "eqdc10"

[[clients]]
name = "web"
weight = 3

[[clients]]
name = "batch"
"#;

fn main() -> Result<(), Box<dyn Error>> {
    let config: Config = from_str(DOCUMENT)?;

    println!("{} owned by {}", config.title, config.owner.name);
    println!("  born {}", config.owner.dob.0.to_rfc2822());
    println!(
        "  database {} on ports {:?} (timeout: {:?})",
        config.database.server, config.database.ports, config.database.timeout_secs
    );
    for (name, server) in &config.servers {
        println!("  server {}: {} in {}", name, server.ip, server.dc);
    }
    for client in &config.clients {
        println!("  client {} with weight {}", client.name, client.weight);
    }

    println!("\nRe-encoded:\n{}", to_string(&config)?);

    // A field that does not fit its type reports where it is.
    let broken = DOCUMENT.replace("connection_max = 5000", "connection_max = -1");
    match from_str::<Config>(&broken) {
        Ok(_) => println!("unexpectedly decoded"),
        Err(e) => println!("Error: {}", e),
    }

    Ok(())
}
