//! Rule: term-shadowing
//!
//! Warns when a top-level term and an identified definition share a name
//! (the compiled context keeps only the definition's entry), and when a
//! term is named like a declared prefix (the prefix declaration is dropped).

use semctx_core::{ContainerKind, ContextOptions, SchemaDocument, SchemaNode};

use super::escape;
use crate::{LintDiagnostic, LintRule, LintSeverity};

pub struct TermShadowingRule;

fn has_marker(node: &SchemaNode, options: &ContextOptions) -> bool {
    let keys = &options.keys;
    let mut found = false;
    node.for_each_schema_object(keys, &mut |map| {
        let identifier = map.get(&keys.identifier).and_then(SchemaNode::as_str).is_some();
        let container = map
            .get(&keys.container)
            .and_then(SchemaNode::as_str)
            .and_then(ContainerKind::parse)
            .is_some();
        found |= identifier || container;
    });
    found
}

impl LintRule for TermShadowingRule {
    fn id(&self) -> &str {
        "term-shadowing"
    }

    fn description(&self) -> &str {
        "Top-level terms should not share a name with an identified type"
    }

    fn default_severity(&self) -> LintSeverity {
        LintSeverity::Warning
    }

    fn check(&self, doc: &SchemaDocument, options: &ContextOptions) -> Vec<LintDiagnostic> {
        let keys = &options.keys;
        let mut diagnostics = Vec::new();

        for (name, property) in doc.properties(keys).into_iter().flatten() {
            if options.prefix(name).is_some() && has_marker(property, options) {
                diagnostics.push(LintDiagnostic {
                    rule: self.id().into(),
                    severity: self.default_severity(),
                    file: String::new(),
                    path: format!("#/{}/{}", escape(&keys.properties), escape(name)),
                    message: format!("Term \"{name}\" replaces the prefix \"{name}\""),
                });
            }
        }

        let Some(definitions) = doc.definitions(keys) else {
            return diagnostics;
        };
        let identified = |name: &str| {
            definitions
                .get(name)
                .and_then(|d| d.get(&keys.identifier))
                .and_then(SchemaNode::as_str)
                .is_some()
        };

        let root_identified = doc.root().get(&keys.identifier).and_then(SchemaNode::as_str).is_some();
        if let Some(title) = doc.title(keys).filter(|_| root_identified) {
            if identified(title) {
                diagnostics.push(LintDiagnostic {
                    rule: self.id().into(),
                    severity: self.default_severity(),
                    file: String::new(),
                    path: format!("#/{}", escape(&keys.title)),
                    message: format!(
                        "Document title \"{title}\" is replaced by the context of type \"{title}\""
                    ),
                });
            }
        }

        for (name, property) in doc.properties(keys).into_iter().flatten() {
            if identified(name) && has_marker(property, options) {
                diagnostics.push(LintDiagnostic {
                    rule: self.id().into(),
                    severity: self.default_severity(),
                    file: String::new(),
                    path: format!("#/{}/{}", escape(&keys.properties), escape(name)),
                    message: format!(
                        "Term \"{name}\" is replaced by the context of type \"{name}\""
                    ),
                });
            }
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
    fn detects_property_named_like_a_type() {
        let doc = SchemaDocument::from(json!({
            "properties": {
                "Engine": {"referencedType": "Engine", "identifier": "https://example.com/uses"},
                "Code": {"type": "string", "identifier": "https://example.com/code"}
            },
            "definitions": {
                "Engine": {"identifier": "https://example.com/Engine", "properties": {}},
                "Code": {"properties": {}}
            }
        }));
        let results = TermShadowingRule.check(&doc, &ContextOptions::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "#/properties/Engine");
    }

    #[test]
    fn detects_title_shadowing() {
        let doc = SchemaDocument::from(json!({
            "title": "Job",
            "identifier": "https://example.com/Job",
            "properties": {},
            "definitions": {"Job": {"identifier": "https://example.com/JobType"}}
        }));
        let results = TermShadowingRule.check(&doc, &ContextOptions::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "#/title");
    }

    #[test]
    fn unmarked_property_is_not_a_term() {
        let doc = SchemaDocument::from(json!({
            "properties": {"Engine": {"referencedType": "Engine"}},
            "definitions": {"Engine": {"identifier": "https://example.com/Engine"}}
        }));
        assert!(TermShadowingRule.check(&doc, &ContextOptions::default()).is_empty());
    }

    #[test]
    fn detects_property_named_like_a_prefix() {
        let doc = SchemaDocument::from(json!({
            "properties": {
                "cw": {"identifier": "https://example.com/commonWorkflows/self"},
                "ex": {"type": "string"}
            }
        }));
        let results = TermShadowingRule.check(&doc, &ContextOptions::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "#/properties/cw");
        assert_eq!(results[0].message, "Term \"cw\" replaces the prefix \"cw\"");
    }
}
