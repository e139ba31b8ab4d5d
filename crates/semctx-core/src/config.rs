//! Configuration composition for declared types.
//!
//! A type's configuration is the deep merge of the configurations of the
//! types it is declared from, overlaid with its own. Precedence, key by key:
//! own config, then the earliest-listed base, down to the latest-listed base.
//! Conflicts are never errors; the precedence rule decides.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::trace;

/// The merged configuration map a declared type carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedConfig(Map<String, Value>);

impl ResolvedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a nested value by a dotted path, e.g. `json_schema_extra.title`.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Builder-style insert, used when declaring a type's own config inline.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }
}

impl From<Map<String, Value>> for ResolvedConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<ResolvedConfig> for Value {
    fn from(config: ResolvedConfig) -> Self {
        Value::Object(config.0)
    }
}

/// Merge `overlay` into `base` and return the result.
///
/// Keys present in both are replaced by the overlay's value unless both
/// values are objects, in which case they merge recursively. Lists and
/// scalars are replaced wholesale.
pub fn deep_merge(base: &Map<String, Value>, overlay: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, value) in overlay {
        let next = match (merged.get(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                Value::Object(deep_merge(existing, incoming))
            }
            _ => value.clone(),
        };
        merged.insert(key.clone(), next);
    }
    merged
}

/// Compose a type's resolved configuration from its own config and the
/// already-resolved configs of its bases, given in declaration order.
///
/// Bases are folded last to first, so an earlier base is merged later and
/// wins ties; `own` is merged last of all.
pub fn compose(own: &ResolvedConfig, bases: &[&ResolvedConfig]) -> ResolvedConfig {
    let mut merged = Map::new();
    for (index, base) in bases.iter().enumerate().rev() {
        trace!(base = index, keys = base.len(), "merging base config");
        merged = deep_merge(&merged, base.as_map());
    }
    trace!(keys = own.len(), "merging own config");
    ResolvedConfig(deep_merge(&merged, own.as_map()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cfg(value: Value) -> ResolvedConfig {
        match value {
            Value::Object(map) => ResolvedConfig::from(map),
            other => panic!("config must be an object, got {other}"),
        }
    }

    #[test]
    fn own_config_wins() {
        let b = cfg(json!({"a": 1}));
        let c = cfg(json!({"a": 2}));
        let own = cfg(json!({"a": 3}));
        let resolved = compose(&own, &[&b, &c]);
        assert_eq!(resolved.get("a"), Some(&json!(3)));
    }

    #[test]
    fn earliest_base_wins_without_own() {
        let b = cfg(json!({"a": 1}));
        let c = cfg(json!({"a": 2}));
        let resolved = compose(&ResolvedConfig::new(), &[&b, &c]);
        assert_eq!(resolved.get("a"), Some(&json!(1)));
    }

    #[test]
    fn nested_maps_merge_key_by_key() {
        let b = cfg(json!({"extra": {"x": 1, "y": 1}}));
        let c = cfg(json!({"extra": {"y": 2, "z": 2}}));
        let own = cfg(json!({"extra": {"z": 3}}));
        let resolved = compose(&own, &[&b, &c]);
        assert_eq!(
            Value::from(resolved),
            json!({"extra": {"x": 1, "y": 1, "z": 3}})
        );
    }

    #[test]
    fn lists_replace_wholesale() {
        let base = cfg(json!({"tags": [1, 2, 3]}));
        let own = cfg(json!({"tags": [9]}));
        let resolved = compose(&own, &[&base]);
        assert_eq!(resolved.get("tags"), Some(&json!([9])));
    }

    #[test]
    fn scalar_replaces_map() {
        let base = cfg(json!({"extra": {"x": 1}}));
        let own = cfg(json!({"extra": false}));
        let resolved = compose(&own, &[&base]);
        assert_eq!(resolved.get("extra"), Some(&json!(false)));
    }

    #[test]
    fn compose_is_idempotent() {
        let b = cfg(json!({"a": {"b": 1}, "c": [1]}));
        let c = cfg(json!({"a": {"d": 2}}));
        let own = cfg(json!({"e": true}));
        let first = compose(&own, &[&b, &c]);
        let second = compose(&own, &[&b, &c]);
        assert_eq!(first, second);
    }

    #[test]
    fn no_inputs_is_empty() {
        assert!(compose(&ResolvedConfig::new(), &[]).is_empty());
    }

    #[test]
    fn get_path_walks_nested_objects() {
        let config = cfg(json!({"json_schema_extra": {"identifier": "x"}}));
        assert_eq!(config.get_path("json_schema_extra.identifier"), Some(&json!("x")));
        assert_eq!(config.get_path("json_schema_extra.missing"), None);
        assert_eq!(config.get_path("json_schema_extra.identifier.deeper"), None);
    }
}
