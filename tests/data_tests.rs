//! Tests for loading imported catalog documents.

use std::fs;

use craftplan::data::{list_sources, parse_catalog_document, CatalogSource, DirectorySource};
use craftplan::error::ImportFetchError;
use craftplan::models::Recipe;
use tempfile::TempDir;

const SATISFACTORY: &str = r#"{
    "gameInfo": { "name": "Satisfactory", "version": "1.0", "url": "https://example.com" },
    "recipes": {
        "Iron Plate": { "produces": 2, "ingredients": { "Iron Ingot": 3 }, "craftingTime": 0.0017 },
        "Iron Ingot": {
            "variants": [
                { "name": "Smelter", "produces": 1, "ingredients": { "Iron Ore": 1 } },
                { "name": "Pure Iron", "produces": 13, "ingredients": { "Iron Ore": 7, "Water": 4 } }
            ]
        }
    }
}"#;

#[test]
fn test_parse_document() {
    let doc = parse_catalog_document(SATISFACTORY).expect("parse");

    assert_eq!(doc.game_info.name, "Satisfactory");
    assert_eq!(doc.game_info.extra["version"], "1.0");
    let names: Vec<&str> = doc.recipes.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Iron Plate", "Iron Ingot"]);
    assert!(matches!(doc.recipes["Iron Ingot"], Recipe::MultiVariant { .. }));
}

#[test]
fn test_parse_rejects_missing_recipes() {
    let err = parse_catalog_document(r#"{ "gameInfo": { "name": "Empty" } }"#).unwrap_err();
    assert!(matches!(err, ImportFetchError::Parse(_)));
}

#[test]
fn test_directory_source_fetch() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("satisfactory.json"), SATISFACTORY).expect("write");
    let source = DirectorySource::new(dir.path());

    let doc = source.fetch("satisfactory").expect("fetch");
    assert_eq!(doc.recipes.len(), 2);
    assert_eq!(
        source.document_path("satisfactory").expect("path"),
        dir.path().join("satisfactory.json")
    );
}

#[test]
fn test_directory_source_errors() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("bad.json"), r#"{ "gameInfo": "#).expect("write");
    let source = DirectorySource::new(dir.path());

    assert!(matches!(
        source.fetch("missing"),
        Err(ImportFetchError::NotFound { source_id, .. }) if source_id == "missing"
    ));
    assert!(matches!(source.fetch("bad"), Err(ImportFetchError::Parse(_))));
    assert!(matches!(
        source.fetch("../bad"),
        Err(ImportFetchError::InvalidSourceId(_))
    ));
}

#[test]
fn test_list_sources() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("valheim.json"), "{}").expect("write");
    fs::write(dir.path().join("minecraft.json"), "{}").expect("write");
    fs::write(dir.path().join("notes.txt"), "").expect("write");
    fs::create_dir(dir.path().join("archive.json")).expect("mkdir");

    assert_eq!(
        list_sources(dir.path()).expect("list"),
        vec!["minecraft", "valheim"]
    );
    assert!(list_sources(&dir.path().join("nowhere"))
        .expect("list")
        .is_empty());
}

#[test]
fn test_parse_error_names_the_item() {
    let err = parse_catalog_document(
        r#"{
            "gameInfo": { "name": "Satisfactory" },
            "recipes": {
                "Iron Ingot": { "produces": 1, "ingredients": { "Iron Ore": 1 } },
                "Iron Plate": { "ingredients": { "Iron Ingot": 3 } }
            }
        }"#,
    )
    .unwrap_err();

    assert!(matches!(err, ImportFetchError::Parse(_)));
    let message = err.to_string();
    assert!(message.contains("\"Iron Plate\""), "{message}");
    assert!(message.contains("produces"), "{message}");
}
