//! Tests for the JSON-in/JSON-out bindings.

use craftplan::wasm::{
    calculate, get_version, list_ingredients, list_items, parse_catalog, validate_recipe,
};
use serde_json::{json, Value};
use std::io;
use std::sync::{Arc, Mutex};

const WORKSHOP: &str = r#"
    "imported_recipes": {
        "Plank": { "produces": 4, "ingredients": { "Log": 1 }, "craftingTime": 0.25 }
    },
    "custom_recipes": {
        "Chest": { "produces": 1, "ingredients": { "Plank": 8, "Nail": 4 } }
    }
"#;

fn with_workshop(extra: &str) -> String {
    if extra.is_empty() {
        format!("{{{}}}", WORKSHOP)
    } else {
        format!("{{{}, {}}}", WORKSHOP, extra)
    }
}

/// Collects formatted log output so tests can see what was reported.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("log buffer")).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, logs.contents())
}

fn parse(output: String) -> Value {
    serde_json::from_str(&output).expect("json output")
}

#[test]
fn test_calculate() {
    let result = parse(calculate(&with_workshop(r#""item": "Chest", "quantity": 3"#)));

    assert_eq!(result["success"], true);
    assert_eq!(result["error"], Value::Null);
    assert_eq!(
        result["totals"],
        json!([
            { "item": "Log", "quantity": 6 },
            { "item": "Nail", "quantity": 12 }
        ])
    );
    assert_eq!(result["total_crafting_time_hours"], 1.5);
    assert_eq!(result["total_crafting_time_formatted"], "1h 30m");
    assert_eq!(result["tree"]["children"][0]["actualQty"], 24);
    assert_eq!(result["tree"]["selectedVariantName"], "Default");
}

#[test]
fn test_calculate_reports_bad_input() {
    let result = parse(calculate("{"));
    assert_eq!(result["success"], false);
    assert!(result["error"]
        .as_str()
        .expect("message")
        .starts_with("Invalid input"));
}

#[test]
fn test_validate_recipe_returns_updated_custom_recipes() {
    let input = with_workshop(
        r#""name": " Plank ", "recipe": { "produces": 2, "ingredients": { "Branch": 3 } }"#,
    );
    let result = parse(validate_recipe(&input));

    assert_eq!(result["success"], true);
    assert_eq!(result["key"], "Plank (Custom)");
    let custom = result["custom_recipes"].as_object().expect("custom recipes");
    assert!(custom.contains_key("Chest"));
    assert_eq!(custom["Plank"]["ingredients"]["Branch"], 3);
}

#[test]
fn test_validate_recipe_rejects_cycle() {
    let input =
        with_workshop(r#""name": "Log", "recipe": { "produces": 1, "ingredients": { "Chest": 1 } }"#);
    let result = parse(validate_recipe(&input));

    assert_eq!(result["success"], false);
    assert!(result["custom_recipes"].is_null());
    assert!(result["error"].as_str().expect("message").contains("Log"));
}

#[test]
fn test_validate_recipe_reports_rejection() {
    let input = with_workshop(
        r#""name": "Plank", "recipe": { "produces": 0, "ingredients": { "Log": 1 } }"#,
    );
    let (output, logs) = with_captured_logs(|| validate_recipe(&input));
    let result = parse(output);

    assert_eq!(result["success"], false);
    let message = result["error"].as_str().expect("message");
    assert!(message.contains("at least 1 unit"), "{message}");
    assert!(logs.contains(message), "{logs}");
}

#[test]
fn test_list_items_and_ingredients() {
    assert_eq!(parse(list_items(&with_workshop(""))), json!(["Plank", "Chest"]));
    assert_eq!(
        parse(list_ingredients(&with_workshop(""))),
        json!(["Log", "Plank", "Nail"])
    );
    assert_eq!(list_items("not json"), "[]");
}

#[test]
fn test_parse_catalog() {
    let document = r#"{
        "gameInfo": { "name": "Loop World" },
        "recipes": {
            "Egg": { "produces": 1, "ingredients": { "Chicken": 1 } },
            "Chicken": { "produces": 1, "ingredients": { "Egg": 1 } },
            "Omelette": { "produces": 1, "ingredients": { "Egg": 2 } },
            "Toast": { "produces": 1, "ingredients": { "Bread": 1 } }
        }
    }"#;

    let result = parse(parse_catalog(document));
    assert_eq!(result["success"], true);
    assert_eq!(result["source_name"], "Loop World");
    assert_eq!(result["recipe_count"], 4);
    assert_eq!(result["cyclic_items"], json!(["Egg", "Chicken", "Omelette"]));

    let failed = parse(parse_catalog("[]"));
    assert_eq!(failed["success"], false);
    assert_eq!(failed["recipe_count"], 0);
}

#[test]
fn test_get_version() {
    assert_eq!(get_version(), env!("CARGO_PKG_VERSION"));
}
