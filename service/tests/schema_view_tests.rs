//! Integration tests for loading and navigating the metamodel

mod helpers;

use helpers::fixtures::{load_fixtures, load_view, meta_path};
use linkml_core::types::Element;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_metamodel_imports_are_merged() {
    let meta = load_view(&meta_path()).await;

    assert!(meta.is_type("string"));
    assert!(meta.is_type("uriorcurie"));
    assert!(meta.get_class("UnitOfMeasure").is_some());
    assert!(meta.get_slot("symbol").is_some());
    assert!(meta.is_enum("relational_role_enum"));

    // The root schema keeps only what meta.yaml declares itself
    assert!(meta.root_schema().types.is_empty());
    assert!(!meta.root_schema().classes.contains_key("UnitOfMeasure"));
    assert_eq!(meta.schema().name, "meta");
}

#[tokio::test]
async fn test_metaclass_ancestry_and_slots() {
    let meta = load_view(&meta_path()).await;

    assert_eq!(
        meta.class_ancestors("slot_definition").unwrap(),
        vec!["slot_definition", "definition", "element"]
    );

    let slots = meta.class_slots("class_definition").unwrap();
    assert_eq!(slots.first().map(String::as_str), Some("slots"));
    assert!(slots.contains(&"is_a".to_string()));
    assert!(slots.contains(&"name".to_string()));
    assert!(!slots.contains(&"range".to_string()));
}

#[tokio::test]
async fn test_identifier_slots_follow_inheritance() {
    let meta = load_view(&meta_path()).await;

    for class in ["element", "definition", "slot_definition", "subset_definition"] {
        let identifier = meta.get_identifier_slot(class).unwrap();
        assert_eq!(identifier.map(|s| s.name), Some("name".to_string()), "{class}");
    }
    for class in ["annotation", "example", "pattern_expression", "UnitOfMeasure"] {
        assert!(meta.get_identifier_slot(class).unwrap().is_none(), "{class}");
    }
}

#[tokio::test]
async fn test_induced_metaslots_keep_ranges() {
    let meta = load_view(&meta_path()).await;

    let examples = meta.induced_slot("examples", "slot_definition").unwrap();
    assert_eq!(examples.range.as_deref(), Some("example"));
    assert!(examples.is_multivalued());

    let unit = meta.induced_slot("unit", "slot_definition").unwrap();
    assert_eq!(unit.range.as_deref(), Some("UnitOfMeasure"));

    let symbol = meta.induced_slot("symbol", "UnitOfMeasure").unwrap();
    assert_eq!(symbol.range.as_deref(), Some("string"));

    assert!(meta.induced_slot("no_such_slot", "class_definition").is_err());
}

#[tokio::test]
async fn test_source_slot_usage_and_imported_slots() {
    let (_, source) = load_fixtures().await;

    let name = source.induced_slot("name", "Person").unwrap();
    assert_eq!(name.required, Some(true));
    assert_eq!(name.description.as_deref(), Some("Full name"));

    let inherited = source.induced_slot("name", "NamedThing").unwrap();
    assert_eq!(inherited.required, None);

    let email = source.induced_slot("email", "Person").unwrap();
    assert_eq!(email.description.as_deref(), Some("Contact address"));
    assert!(!source.root_schema().slots.contains_key("email"));

    let age = source.induced_slot("age", "Person").unwrap();
    let used = age.used_metaslots().unwrap();
    for metaslot in ["range", "pattern", "unit", "examples", "annotations"] {
        assert!(used.contains(&metaslot.to_string()), "{metaslot}");
    }
    assert_eq!(age.annotation_tags(), vec!["source"]);
}
