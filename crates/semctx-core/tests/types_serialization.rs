use pretty_assertions::assert_eq;
use serde_json::json;

use semctx_core::types::*;
use semctx_core::{annotate, ContextOptions, Prefix, SchemaKeys};

#[test]
fn field_annotation_json_keys() {
    let annotation = annotate(
        Some("https://example.com/commonWorkflows/Forces"),
        Some("eV/Å"),
        Some(ContainerKind::List),
        [("description".to_string(), json!("Per-atom forces"))]
            .into_iter()
            .collect(),
    );

    let json = serde_json::to_value(&annotation).unwrap();
    let obj = json.as_object().unwrap();

    // Named slots and extensions sit side by side
    assert_eq!(json["identifier"], "https://example.com/commonWorkflows/Forces");
    assert_eq!(json["unit"], "eV/Å");
    assert_eq!(json["container"], "list");
    assert_eq!(json["description"], "Per-atom forces");
    assert!(!obj.contains_key("extensions"));
}

#[test]
fn field_annotation_optional_fields() {
    let annotation = FieldAnnotation::new().with_description("only a description");
    let json = serde_json::to_value(&annotation).unwrap();
    let obj = json.as_object().unwrap();

    assert_eq!(obj.len(), 1); // only "description"
    assert!(!obj.contains_key("identifier"));
    assert!(!obj.contains_key("unit"));
    assert!(!obj.contains_key("container"));
}

#[test]
fn field_annotation_round_trip_from_json() {
    let annotation: FieldAnnotation = serde_json::from_value(json!({
        "identifier": "https://example.com/x",
        "container": "set",
        "default": 3
    }))
    .unwrap();
    assert_eq!(annotation.identifier.as_deref(), Some("https://example.com/x"));
    assert_eq!(annotation.container, Some(ContainerKind::Set));
    assert_eq!(annotation.extensions.get("default"), Some(&json!(3)));
}

#[test]
fn value_type_json() {
    assert_eq!(
        serde_json::to_value(ValueType::Scalar(ScalarType::Number)).unwrap(),
        json!({"kind": "scalar", "of": "number"})
    );
    assert_eq!(
        serde_json::to_value(ValueType::ObjectMap("Engine".into())).unwrap(),
        json!({"kind": "objectMap", "of": "Engine"})
    );
    assert_eq!(serde_json::to_value(ValueType::Any).unwrap(), json!({"kind": "any"}));
}

#[test]
fn property_definition_json_keys() {
    let property = PropertyDefinition::new(
        "engines",
        ValueType::ObjectMap("Engine".into()),
        FieldAnnotation::new().with_identifier("https://example.com/engines"),
    );
    let json = serde_json::to_value(&property).unwrap();
    let obj = json.as_object().unwrap();

    assert!(obj.contains_key("name"));
    assert!(obj.contains_key("annotation"));
    assert!(obj.contains_key("valueType")); // camelCase
    assert!(!obj.contains_key("value_type"));
    assert_eq!(property.referenced_type(), Some("Engine"));
}

#[test]
fn context_options_json() {
    let options: ContextOptions = serde_json::from_value(json!({
        "vocab": "https://example.org/",
        "prefixes": [{"name": "cw", "expansion": "https://example.org/cw/"}],
        "keys": {"identifier": "@id", "reference": "$ref"}
    }))
    .unwrap();

    assert_eq!(options.prefixes, vec![Prefix::new("cw", "https://example.org/cw/")]);
    assert_eq!(options.keys.identifier, "@id");
    // Unlisted keys keep their defaults
    assert_eq!(options.keys.definitions, SchemaKeys::default().definitions);
}
