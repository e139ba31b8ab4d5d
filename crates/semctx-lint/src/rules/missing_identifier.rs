//! Rule: missing-identifier
//!
//! Reports properties of identified types (and of the root document) that
//! carry no identifier, so they get no term in the compiled context.

use indexmap::IndexMap;
use semctx_core::{ContextOptions, SchemaDocument, SchemaNode};

use super::{escape, identifier_markers};
use crate::{LintDiagnostic, LintRule, LintSeverity};

pub struct MissingIdentifierRule;

impl MissingIdentifierRule {
    fn check_properties(
        &self,
        owner: &str,
        base_path: &str,
        properties: &IndexMap<String, SchemaNode>,
        options: &ContextOptions,
        diagnostics: &mut Vec<LintDiagnostic>,
    ) {
        for (name, property) in properties {
            let path = format!("{base_path}/{}", escape(name));
            let mut markers = Vec::new();
            identifier_markers(property, &path, &options.keys, &mut markers);
            if markers.is_empty() {
                diagnostics.push(LintDiagnostic {
                    rule: self.id().into(),
                    severity: self.default_severity(),
                    file: String::new(),
                    path,
                    message: format!("Property \"{name}\" of {owner} has no identifier"),
                });
            }
        }
    }
}

impl LintRule for MissingIdentifierRule {
    fn id(&self) -> &str {
        "missing-identifier"
    }

    fn description(&self) -> &str {
        "Properties of identified types should carry an identifier"
    }

    fn default_severity(&self) -> LintSeverity {
        LintSeverity::Info
    }

    fn check(&self, doc: &SchemaDocument, options: &ContextOptions) -> Vec<LintDiagnostic> {
        let keys = &options.keys;
        let mut diagnostics = Vec::new();

        if let Some(properties) = doc.properties(keys) {
            let owner = match doc.title(keys) {
                Some(title) => format!("\"{title}\""),
                None => "the document".to_string(),
            };
            let base = format!("#/{}", escape(&keys.properties));
            self.check_properties(&owner, &base, properties, options, &mut diagnostics);
        }

        for (type_name, definition) in doc.definitions(keys).into_iter().flatten() {
            if definition.get(&keys.identifier).and_then(SchemaNode::as_str).is_none() {
                continue;
            }
            let Some(properties) = definition.get(&keys.properties).and_then(SchemaNode::as_object) else {
                continue;
            };
            let base = format!(
                "#/{}/{}/{}",
                escape(&keys.definitions),
                escape(type_name),
                escape(&keys.properties)
            );
            let owner = format!("type \"{type_name}\"");
            self.check_properties(&owner, &base, properties, options, &mut diagnostics);
        }

        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn detects_unannotated_property_of_identified_type() {
        let doc = SchemaDocument::from(json!({
            "properties": {"engine": {"referencedType": "Engine", "identifier": "https://example.com/engine"}},
            "definitions": {
                "Engine": {
                    "identifier": "https://example.com/Engine",
                    "properties": {
                        "code": {"referencedType": "Code"},
                        "options": {"type": "object", "identifier": "https://example.com/Engine/Options"}
                    }
                },
                "Code": {"properties": {"path": {"type": "string"}}}
            }
        }));
        let results = MissingIdentifierRule.check(&doc, &ContextOptions::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "#/definitions/Engine/properties/code");
        assert!(results[0].message.contains("type \"Engine\""));
    }

    #[test]
    fn nested_identifier_counts() {
        let doc = SchemaDocument::from(json!({
            "title": "Job",
            "properties": {
                "tags": {"type": "array", "items": {"identifier": "https://example.com/tags"}},
                "note": {"type": "string"}
            }
        }));
        let results = MissingIdentifierRule.check(&doc, &ContextOptions::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "#/properties/note");
        assert_eq!(results[0].message, "Property \"note\" of \"Job\" has no identifier");
    }

    #[test]
    fn identifier_in_default_value_does_not_count() {
        let doc = SchemaDocument::from(json!({
            "properties": {
                "code": {"type": "object", "default": {"identifier": "3f1c-uuid"}}
            }
        }));
        let results = MissingIdentifierRule.check(&doc, &ContextOptions::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "#/properties/code");
    }
}
