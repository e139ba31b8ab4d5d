use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalogs::{DEFAULT_PREFIXES, DEFAULT_VOCAB, RE_PREFIX_NAME};
use crate::error::OptionsError;
use crate::schema::SchemaKeys;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefix {
    pub name: String,
    pub expansion: String,
}

impl Prefix {
    pub fn new(name: impl Into<String>, expansion: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expansion: expansion.into(),
        }
    }
}

/// How a context is compiled: the vocabulary and prefix table it declares,
/// and the marker keys it reads from the schema document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextOptions {
    pub vocab: String,
    pub prefixes: Vec<Prefix>,
    pub keys: SchemaKeys,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            vocab: DEFAULT_VOCAB.to_string(),
            prefixes: DEFAULT_PREFIXES
                .iter()
                .map(|(name, expansion)| Prefix::new(*name, *expansion))
                .collect(),
            keys: SchemaKeys::default(),
        }
    }
}

impl ContextOptions {
    /// Options with the given vocabulary and no prefixes.
    pub fn new(vocab: impl Into<String>) -> Self {
        Self {
            vocab: vocab.into(),
            prefixes: Vec::new(),
            keys: SchemaKeys::default(),
        }
    }

    /// Declare a prefix, replacing an existing one with the same name in place.
    pub fn with_prefix(mut self, name: impl Into<String>, expansion: impl Into<String>) -> Self {
        let prefix = Prefix::new(name, expansion);
        match self.prefixes.iter_mut().find(|p| p.name == prefix.name) {
            Some(existing) => existing.expansion = prefix.expansion,
            None => self.prefixes.push(prefix),
        }
        self
    }

    pub fn with_keys(mut self, keys: SchemaKeys) -> Self {
        self.keys = keys;
        self
    }

    pub fn prefix(&self, name: &str) -> Option<&Prefix> {
        self.prefixes.iter().find(|p| p.name == name)
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for prefix in &self.prefixes {
            if !RE_PREFIX_NAME.is_match(&prefix.name) {
                return Err(OptionsError::InvalidPrefix {
                    name: prefix.name.clone(),
                });
            }
            if !seen.insert(&prefix.name) {
                return Err(OptionsError::DuplicatePrefix {
                    name: prefix.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Prefix expansions in absolute form, in declaration order.
    ///
    /// An expansion written as a compact IRI over an earlier prefix
    /// (`cw: ex:commonWorkflows/`) is expanded through that prefix.
    pub fn absolute_prefixes(&self) -> Vec<(&str, String)> {
        let mut resolved: Vec<(&str, String)> = Vec::with_capacity(self.prefixes.len());
        for prefix in &self.prefixes {
            let absolute = prefix
                .expansion
                .split_once(':')
                .and_then(|(head, rest)| {
                    resolved
                        .iter()
                        .find(|(name, _)| *name == head)
                        .map(|(_, base)| format!("{base}{rest}"))
                })
                .unwrap_or_else(|| prefix.expansion.clone());
            resolved.push((prefix.name.as_str(), absolute));
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_common_workflows() {
        let options = ContextOptions::default();
        assert_eq!(options.vocab, "https://example.com/");
        assert_eq!(
            options.prefix("cw").map(|p| p.expansion.as_str()),
            Some("ex:commonWorkflows/")
        );
        assert!(options.validate().is_ok());
    }

    #[test]
    fn compact_expansions_resolve_through_earlier_prefixes() {
        let options = ContextOptions::default();
        let absolute = options.absolute_prefixes();
        assert_eq!(
            absolute,
            vec![
                ("ex", "https://example.com/".to_string()),
                ("cw", "https://example.com/commonWorkflows/".to_string()),
            ]
        );
    }

    #[test]
    fn with_prefix_replaces_in_place() {
        let options = ContextOptions::new("https://example.org/")
            .with_prefix("a", "https://a.example/")
            .with_prefix("b", "https://b.example/")
            .with_prefix("a", "https://a2.example/");
        let names: Vec<&str> = options.prefixes.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(options.prefix("a").unwrap().expansion, "https://a2.example/");
    }

    #[test]
    fn validate_rejects_bad_names() {
        let options = ContextOptions::new("x").with_prefix("1bad", "https://x/");
        assert_eq!(
            options.validate(),
            Err(OptionsError::InvalidPrefix { name: "1bad".into() })
        );

        let mut options = ContextOptions::new("x").with_prefix("ok", "https://x/");
        options.prefixes.push(Prefix::new("ok", "https://y/"));
        assert_eq!(
            options.validate(),
            Err(OptionsError::DuplicatePrefix { name: "ok".into() })
        );
    }

    #[test]
    fn deserialize_partial_options() {
        let options: ContextOptions =
            serde_json::from_str(r#"{"vocab": "https://example.org/"}"#).unwrap();
        assert_eq!(options.vocab, "https://example.org/");
        // Unspecified fields fall back to the defaults.
        assert_eq!(options.prefixes.len(), 2);
        assert_eq!(options.keys, SchemaKeys::default());
    }
}
