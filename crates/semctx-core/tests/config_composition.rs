use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use semctx_core::{compose, ResolvedConfig, TypeBuilder};

fn cfg(value: Value) -> ResolvedConfig {
    match value {
        Value::Object(map) => ResolvedConfig::from(map),
        other => panic!("config must be an object, got {other}"),
    }
}

#[test]
fn own_over_earliest_over_latest() {
    let b = cfg(json!({"a": 1}));
    let c = cfg(json!({"a": 2}));

    assert_eq!(compose(&cfg(json!({"a": 3})), &[&b, &c]).get("a"), Some(&json!(3)));
    assert_eq!(compose(&ResolvedConfig::new(), &[&b, &c]).get("a"), Some(&json!(1)));
    assert_eq!(compose(&ResolvedConfig::new(), &[&c, &b]).get("a"), Some(&json!(2)));
}

#[test]
fn declared_chain_resolves_through_bases() {
    // Base -> Process -> Relax, each layer adding or overriding schema extras.
    let base = TypeBuilder::new("SemanticModel")
        .config(cfg(json!({
            "json_schema_extra": {"additionalProperties": false},
            "validate_assignment": true
        })))
        .build();
    let process = TypeBuilder::new("Process")
        .base(&base)
        .config(cfg(json!({"json_schema_extra": {"title": "Process"}})))
        .build();
    let relax = TypeBuilder::new("RelaxInputs")
        .base(&process)
        .config_entry("validate_assignment", false)
        .build();

    assert_eq!(
        Value::from(relax.config().clone()),
        json!({
            "json_schema_extra": {"additionalProperties": false, "title": "Process"},
            "validate_assignment": false
        })
    );
    assert_eq!(
        relax.config().get_path("json_schema_extra.title"),
        Some(&json!("Process"))
    );
}

#[test]
fn diamond_prefers_first_listed_base() {
    let root = TypeBuilder::new("Root").config_entry("mode", "root").build();
    let left = TypeBuilder::new("Left").base(&root).config_entry("mode", "left").build();
    let right = TypeBuilder::new("Right").base(&root).config_entry("mode", "right").build();
    let joined = TypeBuilder::new("Joined").base(&left).base(&right).build();
    assert_eq!(joined.config().get("mode"), Some(&json!("left")));
}
