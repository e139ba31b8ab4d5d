//! semctx schema linter — configurable rules for semantic annotation quality.
//!
//! Provides a trait-based rule framework for analyzing annotated schema
//! documents before they are compiled into a linked-data context.

mod rules;

pub use rules::*;
use semctx_core::{ContextOptions, SchemaDocument};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Lint severity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LintSeverity {
    Error,
    Warning,
    Info,
}

// ---------------------------------------------------------------------------
// Lint diagnostic
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintDiagnostic {
    pub rule: String,
    pub severity: LintSeverity,
    pub file: String,
    /// JSON pointer to the offending node, e.g. `#/definitions/Engine/properties/code`.
    pub path: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Lint rule trait
// ---------------------------------------------------------------------------

/// Trait that all lint rules must implement.
pub trait LintRule: Send + Sync {
    /// Unique rule identifier (e.g., "term-shadowing").
    fn id(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// Default severity.
    fn default_severity(&self) -> LintSeverity;

    /// Run the rule against a schema document. The linter fills in `file`.
    fn check(&self, doc: &SchemaDocument, options: &ContextOptions) -> Vec<LintDiagnostic>;
}

// ---------------------------------------------------------------------------
// Lint configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    Off,
    #[default]
    Warn,
    Error,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LintConfig {
    #[serde(default)]
    pub rules: HashMap<String, RuleLevel>,
}

impl LintConfig {
    /// Check if a rule is enabled (not off).
    pub fn is_enabled(&self, rule_id: &str) -> bool {
        !matches!(self.rules.get(rule_id), Some(RuleLevel::Off))
    }

    /// Get the configured severity for a rule, or its default.
    pub fn severity_for(&self, rule: &dyn LintRule) -> LintSeverity {
        match self.rules.get(rule.id()) {
            Some(RuleLevel::Error) => LintSeverity::Error,
            Some(RuleLevel::Warn) => LintSeverity::Warning,
            Some(RuleLevel::Off) => LintSeverity::Warning,
            None => rule.default_severity(),
        }
    }
}

// ---------------------------------------------------------------------------
// Linter engine
// ---------------------------------------------------------------------------

pub struct Linter {
    rules: Vec<Box<dyn LintRule>>,
    config: LintConfig,
}

impl Linter {
    /// Create a new linter with all built-in rules.
    pub fn new(config: LintConfig) -> Self {
        Self {
            rules: builtin_rules(),
            config,
        }
    }

    /// Get a reference to the registered rules.
    pub fn rules(&self) -> &[Box<dyn LintRule>] {
        &self.rules
    }

    /// Run all enabled rules against one schema document.
    pub fn lint(
        &self,
        file: &str,
        doc: &SchemaDocument,
        options: &ContextOptions,
    ) -> Vec<LintDiagnostic> {
        let mut diagnostics = Vec::new();

        for rule in &self.rules {
            if self.config.is_enabled(rule.id()) {
                let severity = self.config.severity_for(rule.as_ref());
                let mut results = rule.check(doc, options);
                for d in &mut results {
                    d.severity = severity.clone();
                    d.file = file.to_string();
                }
                diagnostics.extend(results);
            }
        }

        diagnostics
    }
}

impl Default for Linter {
    fn default() -> Self {
        Self::new(LintConfig::default())
    }
}

/// Return all built-in lint rules.
fn builtin_rules() -> Vec<Box<dyn LintRule>> {
    vec![
        Box::new(MissingIdentifierRule),
        Box::new(TermShadowingRule),
        Box::new(UncompactableIriRule),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn linter_clean_document() {
        let linter = Linter::default();
        let doc = SchemaDocument::from(json!({
            "properties": {
                "name": {"type": "string", "identifier": "https://example.com/name"}
            }
        }));
        let result = linter.lint("clean.schema.json", &doc, &ContextOptions::default());
        assert!(result.is_empty());
    }

    #[test]
    fn linter_stamps_file_and_severity() {
        let mut config = LintConfig::default();
        config.rules.insert("missing-identifier".into(), RuleLevel::Error);
        let linter = Linter::new(config);
        let doc = SchemaDocument::from(json!({"properties": {"name": {"type": "string"}}}));
        let result = linter.lint("a.schema.json", &doc, &ContextOptions::default());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].file, "a.schema.json");
        assert_eq!(result[0].severity, LintSeverity::Error);
    }

    #[test]
    fn config_rule_off() {
        let mut config = LintConfig::default();
        config.rules.insert("test-rule".into(), RuleLevel::Off);
        assert!(!config.is_enabled("test-rule"));
        assert!(config.is_enabled("other-rule"));
    }

    #[test]
    fn config_severity_override() {
        struct TestRule;
        impl LintRule for TestRule {
            fn id(&self) -> &str {
                "test-rule"
            }
            fn description(&self) -> &str {
                "test"
            }
            fn default_severity(&self) -> LintSeverity {
                LintSeverity::Warning
            }
            fn check(&self, _doc: &SchemaDocument, _options: &ContextOptions) -> Vec<LintDiagnostic> {
                vec![]
            }
        }

        let mut config = LintConfig::default();
        config.rules.insert("test-rule".into(), RuleLevel::Error);
        assert_eq!(config.severity_for(&TestRule), LintSeverity::Error);
    }
}
