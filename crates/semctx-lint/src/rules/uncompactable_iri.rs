//! Rule: uncompactable-iri
//!
//! Flags identifiers that no declared prefix covers. They end up in the
//! context as full IRIs, which is legal but usually means a missing prefix.

use semctx_core::{Compactor, ContextOptions, SchemaDocument};

use super::identifier_markers;
use crate::{LintDiagnostic, LintRule, LintSeverity};

pub struct UncompactableIriRule;

impl LintRule for UncompactableIriRule {
    fn id(&self) -> &str {
        "uncompactable-iri"
    }

    fn description(&self) -> &str {
        "Identifiers should fall under a declared prefix"
    }

    fn default_severity(&self) -> LintSeverity {
        LintSeverity::Info
    }

    fn check(&self, doc: &SchemaDocument, options: &ContextOptions) -> Vec<LintDiagnostic> {
        let compactor = Compactor::new(options);
        let mut markers = Vec::new();
        identifier_markers(doc.root(), "#", &options.keys, &mut markers);

        markers
            .into_iter()
            .filter(|(_, iri)| !compactor.matches(iri))
            .map(|(path, iri)| LintDiagnostic {
                rule: self.id().into(),
                severity: self.default_severity(),
                file: String::new(),
                path,
                message: format!("Identifier \"{iri}\" matches no declared prefix"),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn flags_only_foreign_iris() {
        let doc = SchemaDocument::from(json!({
            "identifier": "https://example.com/commonWorkflows/relax/Input",
            "properties": {
                "protocol": {"identifier": "https://example.com/commonWorkflows/scf/Protocol"},
                "reference_process": {"identifier": "https://example.org/other/ReferenceProcess"}
            }
        }));
        let results = UncompactableIriRule.check(&doc, &ContextOptions::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "#/properties/reference_process");
    }

    #[test]
    fn respects_configured_prefixes() {
        let doc = SchemaDocument::from(json!({
            "properties": {"x": {"identifier": "https://example.org/other/X"}}
        }));
        let options = ContextOptions::default().with_prefix("other", "https://example.org/other/");
        assert!(UncompactableIriRule.check(&doc, &options).is_empty());
    }
}
