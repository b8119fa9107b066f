//! Generation from types that are also serialized with serde.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tsbridge::prelude::*;

#[derive(Serialize, Describe)]
#[serde(rename_all = "camelCase")]
struct Audit {
    created_at: DateTime<Utc>,
    created_by: String,
}

#[derive(Serialize, Describe)]
#[repr(i16)]
#[allow(dead_code)]
enum Priority {
    #[serde(rename = "low")]
    Low = 0,
    #[serde(rename = "high-urgency")]
    High = 5,
}

#[derive(Serialize, Describe)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
struct Ticket {
    ticket_id: u64,
    #[serde(rename = "summary")]
    title: String,
    #[serde(flatten)]
    audit: Audit,
    #[serde(skip)]
    internal_notes: String,
    due_dates: Vec<NaiveDate>,
    labels: BTreeMap<String, String>,
    priority_level: u8,
    watchers: Option<Vec<Watcher>>,
}

#[derive(Serialize, Describe)]
struct Watcher {
    email: String,
}

#[derive(Describe)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(dead_code)]
struct Flags {
    dry_run: bool,
    max_retries: i32,
}

fn ticket() -> Ticket {
    Ticket {
        ticket_id: 7,
        title: "broken build".to_string(),
        audit: Audit {
            created_at: DateTime::<Utc>::from_timestamp(0, 0).expect("epoch"),
            created_by: "ops".to_string(),
        },
        internal_notes: String::new(),
        due_dates: Vec::new(),
        labels: BTreeMap::new(),
        priority_level: 1,
        watchers: None,
    }
}

#[test]
fn test_field_names_match_serialized_keys() {
    let json = serde_json::to_value(ticket()).expect("serialize");
    let keys: Vec<&str> = json
        .as_object()
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect();

    let mut converter = Converter::new().create_from_method(false);
    converter.add::<Ticket>();
    let code = converter.convert(None).expect("convert");

    for key in &keys {
        assert!(code.contains(&format!("    {key}: ")), "missing {key} in {code}");
    }
    assert!(!code.contains("internal"));
    assert!(!code.contains("class Audit"));
}

#[test]
fn test_serde_model_output() {
    let mut converter = Converter::new().indent("  ").prefix("Api");
    converter.add::<Ticket>();
    let code = converter.convert(None).expect("convert");

    let expected = "export class ApiWatcher {
  email: string;

  static createFrom(source: any) {
    let result = new ApiWatcher();
    result.email = source[\"email\"];
    return result;
  }
}

export class ApiTicket {
  ticketId: number;
  summary: string;
  createdAt: Date;
  createdBy: string;
  dueDates: Date[];
  labels: {[key: string]: string};
  priorityLevel: number;
  watchers: Watcher[];

  static createFrom(source: any) {
    let result = new ApiTicket();
    result.ticketId = source[\"ticketId\"];
    result.summary = source[\"summary\"];
    result.createdAt = source[\"createdAt\"] ? new Date(source[\"createdAt\"]) : null;
    result.createdBy = source[\"createdBy\"];
    result.dueDates = source[\"dueDates\"] ? source[\"dueDates\"].map(function(element) { return new Date(element); }) : null;
    result.labels = source[\"labels\"];
    result.priorityLevel = source[\"priorityLevel\"];
    result.watchers = source[\"watchers\"] ? source[\"watchers\"].map(function(element) { return Watcher.createFrom(element); }) : null;
    return result;
  }
}";
    assert_eq!(code, expected);
}

#[test]
fn test_enum_values_match_serialized_strings() {
    assert_eq!(
        serde_json::to_string(&Priority::High).expect("serialize"),
        "\"high-urgency\""
    );

    let mut converter = Converter::new();
    converter.add::<Priority>();
    let expected = "export enum Priority {
    Low = 'low',
    HighUrgency = 'high-urgency',
}";
    assert_eq!(converter.convert(None).expect("convert"), expected);
}

#[test]
fn test_screaming_snake_case() {
    let mut converter = Converter::new().use_interface(true).export(false);
    converter.add::<Flags>();
    let expected = "interface Flags {
    DRY_RUN: boolean;
    MAX_RETRIES: number;
}";
    assert_eq!(converter.convert(None).expect("convert"), expected);
}

#[test]
fn test_regeneration_keeps_custom_code() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tickets.ts");

    let mut converter = Converter::new().use_interface(true);
    converter.add::<Watcher>();
    converter.convert_to_file(&path).expect("first run");

    let generated = std::fs::read_to_string(&path).expect("read");
    let edited = generated.replace("    //[end]", "    nickname?: string;\n    //[end]");
    std::fs::write(&path, &edited).expect("edit");

    converter.convert_to_file(&path).expect("second run");
    assert_eq!(std::fs::read_to_string(&path).expect("read"), edited);

    let backups = std::fs::read_dir(dir.path())
        .expect("list")
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "backup"))
        .count();
    assert_eq!(backups, 1);
}

#[test]
fn test_schema_and_derived_types_together() {
    let xml = r#"<typeSchema package="billing">
    <struct name="Invoice">
        <field name="Total" json="total" type="f64"/>
        <field name="Owner" json="owner" type="Owner"/>
    </struct>
    <struct name="Owner">
        <field name="Name" json="name" type="String"/>
    </struct>
    <root type="Invoice"/>
</typeSchema>"#;
    let schema = parse_schema(xml).expect("parse");
    let ir = SchemaIr::from_schema(&schema).expect("lower");

    let mut converter = Converter::new().create_from_method(false);
    converter.add_schema(ir);
    converter.add::<Watcher>();
    let expected = "export class Owner {
    name: string;
}

export class Invoice {
    total: number;
    owner: Owner;
}

export class Watcher {
    email: string;
}";
    assert_eq!(converter.convert(None).expect("convert"), expected);
}
