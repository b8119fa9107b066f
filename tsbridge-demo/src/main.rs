//! Prints the TypeScript of a small model, or writes it to the path given
//! as first argument.
//!
//! Run with: cargo run -p tsbridge-demo -- models.ts

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;
use tsbridge::prelude::*;

#[derive(Describe)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
struct Address {
    street_name: String,
    house_number: u32,
}

#[derive(Describe)]
#[repr(u8)]
#[allow(dead_code)]
enum Role {
    #[serde(rename = "admin")]
    Admin = 1,
    #[serde(rename = "guest")]
    Guest = 2,
}

#[derive(Describe)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
struct Person {
    full_name: String,
    role: Role,
    addresses: Vec<Address>,
    scores: HashMap<String, f64>,
    born: DateTime<Utc>,
    #[serde(skip)]
    cache: Vec<u8>,
}

fn converter() -> Converter {
    let mut converter = Converter::new().indent("  ");
    converter.add::<Person>();
    converter
}

fn main() -> Result<(), CodegenError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let converter = converter();
    match std::env::args().nth(1) {
        Some(path) => converter.convert_to_file(path),
        None => {
            println!("{}", converter.convert(None)?);
            Ok(())
        }
    }
}
