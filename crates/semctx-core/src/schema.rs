//! Schema documents as an explicit tagged tree.
//!
//! Traversal dispatches on [`SchemaNode`] variants instead of inspecting
//! arbitrary JSON, which also keeps the destructive extraction done by the
//! context compiler visible in the types: it needs `&mut SchemaDocument`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalogs::VALUE_KEYWORDS;
use crate::types::ContainerKind;

// ---------------------------------------------------------------------------
// Marker keys
// ---------------------------------------------------------------------------

/// Names of the keys the compiler looks for in a schema document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchemaKeys {
    pub definitions: String,
    pub properties: String,
    pub identifier: String,
    pub container: String,
    pub reference: String,
    pub title: String,
}

impl Default for SchemaKeys {
    fn default() -> Self {
        Self {
            definitions: "definitions".into(),
            properties: "properties".into(),
            identifier: "identifier".into(),
            container: "container".into(),
            reference: "referencedType".into(),
            title: "title".into(),
        }
    }
}

impl SchemaKeys {
    /// Keys used by generators that emit JSON-LD style markers directly into
    /// a JSON Schema: `$defs`, `@id`, `@container` and `$ref` pointers.
    pub fn json_ld() -> Self {
        Self {
            definitions: "$defs".into(),
            properties: "properties".into(),
            identifier: "@id".into(),
            container: "@container".into(),
            reference: "$ref".into(),
            title: "title".into(),
        }
    }

    /// Keys whose value maps a property or type name to its schema.
    pub fn is_name_map(&self, key: &str) -> bool {
        key == self.properties || key == self.definitions
    }
}

/// Whether `key` holds instance data (`default`, `enum`, ...) when it
/// appears in a schema object.
pub fn is_value_keyword(key: &str) -> bool {
    VALUE_KEYWORDS.contains(&key)
}

/// Type name a reference marker points at: the last `/` segment, so both
/// `Foo` and `#/$defs/Foo` name `Foo`.
pub fn reference_name(value: &str) -> &str {
    value.rsplit('/').next().unwrap_or(value)
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// One node of a schema tree. `Scalar` never holds a JSON object or array;
/// conversions from [`Value`] route those into `Object` and `Array`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaNode {
    Object(IndexMap<String, SchemaNode>),
    Array(Vec<SchemaNode>),
    Scalar(Value),
}

impl Default for SchemaNode {
    fn default() -> Self {
        SchemaNode::Object(IndexMap::new())
    }
}

impl SchemaNode {
    pub fn object() -> Self {
        Self::default()
    }

    pub fn string(value: impl Into<String>) -> Self {
        SchemaNode::Scalar(Value::String(value.into()))
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, SchemaNode>> {
        match self {
            SchemaNode::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut IndexMap<String, SchemaNode>> {
        match self {
            SchemaNode::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SchemaNode::Scalar(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&SchemaNode> {
        self.as_object()?.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut SchemaNode> {
        self.as_object_mut()?.get_mut(key)
    }

    /// Insert into an object node. Returns the previous value; a no-op on
    /// arrays and scalars.
    pub fn insert(&mut self, key: impl Into<String>, value: SchemaNode) -> Option<SchemaNode> {
        self.as_object_mut()?.insert(key.into(), value)
    }

    /// Remove a key from an object node, keeping the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<SchemaNode> {
        self.as_object_mut()?.shift_remove(key)
    }

    /// Remove `key` only if it holds a string, and return that string.
    pub fn take_string(&mut self, key: &str) -> Option<String> {
        self.get(key)?.as_str()?;
        match self.remove(key) {
            Some(SchemaNode::Scalar(Value::String(s))) => Some(s),
            _ => None,
        }
    }

    /// Remove `key` only if it holds a valid container hint.
    pub fn take_container(&mut self, key: &str) -> Option<ContainerKind> {
        let kind = ContainerKind::parse(self.get(key)?.as_str()?)?;
        self.remove(key);
        Some(kind)
    }

    /// Visit every schema object in this subtree, including `self`. Maps
    /// keyed by property or type name are walked through but not visited,
    /// and instance values under `default`, `const`, `enum` and `examples`
    /// are not entered.
    pub fn for_each_schema_object<'a>(
        &'a self,
        keys: &SchemaKeys,
        f: &mut impl FnMut(&'a IndexMap<String, SchemaNode>),
    ) {
        self.walk_schema(keys, false, f);
    }

    fn walk_schema<'a>(
        &'a self,
        keys: &SchemaKeys,
        name_map: bool,
        f: &mut impl FnMut(&'a IndexMap<String, SchemaNode>),
    ) {
        match self {
            SchemaNode::Object(map) if name_map => {
                for child in map.values() {
                    child.walk_schema(keys, false, f);
                }
            }
            SchemaNode::Object(map) => {
                f(map);
                for (key, child) in map {
                    if is_value_keyword(key) {
                        continue;
                    }
                    child.walk_schema(keys, keys.is_name_map(key), f);
                }
            }
            SchemaNode::Array(items) => {
                for item in items {
                    item.walk_schema(keys, false, f);
                }
            }
            SchemaNode::Scalar(_) => {}
        }
    }

    /// Type names referenced anywhere in this subtree.
    pub fn references<'a>(&'a self, keys: &SchemaKeys) -> Vec<&'a str> {
        let mut found = Vec::new();
        self.for_each_schema_object(keys, &mut |map| {
            if let Some(target) = map.get(&keys.reference).and_then(SchemaNode::as_str) {
                found.push(reference_name(target));
            }
        });
        found
    }
}

impl From<Value> for SchemaNode {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => {
                SchemaNode::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
            Value::Array(items) => SchemaNode::Array(items.into_iter().map(Into::into).collect()),
            scalar => SchemaNode::Scalar(scalar),
        }
    }
}

impl From<SchemaNode> for Value {
    fn from(node: SchemaNode) -> Self {
        match node {
            SchemaNode::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
            SchemaNode::Array(items) => Value::Array(items.into_iter().map(Into::into).collect()),
            SchemaNode::Scalar(value) => value,
        }
    }
}

impl From<&str> for SchemaNode {
    fn from(value: &str) -> Self {
        SchemaNode::string(value)
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A schema document: a definitions section keyed by type name plus a root
/// properties tree, both possibly carrying identifier/container markers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaDocument {
    root: SchemaNode,
}

impl SchemaDocument {
    pub fn new(root: SchemaNode) -> Self {
        Self { root }
    }

    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    pub fn root(&self) -> &SchemaNode {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut SchemaNode {
        &mut self.root
    }

    pub fn into_root(self) -> SchemaNode {
        self.root
    }

    pub fn title(&self, keys: &SchemaKeys) -> Option<&str> {
        self.root.get(&keys.title)?.as_str()
    }

    pub fn definitions(&self, keys: &SchemaKeys) -> Option<&IndexMap<String, SchemaNode>> {
        self.root.get(&keys.definitions)?.as_object()
    }

    pub fn properties(&self, keys: &SchemaKeys) -> Option<&IndexMap<String, SchemaNode>> {
        self.root.get(&keys.properties)?.as_object()
    }

    /// Number of identifier and container markers left anywhere in the
    /// document. Zero after a successful compile.
    pub fn count_markers(&self, keys: &SchemaKeys) -> usize {
        let mut count = 0;
        self.root.for_each_schema_object(keys, &mut |map| {
            if map.get(&keys.identifier).and_then(SchemaNode::as_str).is_some() {
                count += 1;
            }
            if map
                .get(&keys.container)
                .and_then(SchemaNode::as_str)
                .and_then(ContainerKind::parse)
                .is_some()
            {
                count += 1;
            }
        });
        count
    }
}

impl From<Value> for SchemaDocument {
    fn from(value: Value) -> Self {
        Self::new(value.into())
    }
}

impl From<SchemaDocument> for Value {
    fn from(doc: SchemaDocument) -> Self {
        doc.root.into()
    }
}
