use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::ResolvedConfig;
use crate::declare::SchemaPatch;

// ---------------------------------------------------------------------------
// Field annotations
// ---------------------------------------------------------------------------

/// Container hint for a field's value in the linked-data representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    List,
    Set,
}

impl ContainerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContainerKind::List => "list",
            ContainerKind::Set => "set",
        }
    }

    /// Parse a container marker value. Anything other than `list`/`set` is
    /// not a container hint.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "list" => Some(ContainerKind::List),
            "set" => Some(ContainerKind::Set),
            _ => None,
        }
    }
}

/// Semantic metadata attached to a field descriptor.
///
/// The well-known slots are named; everything else (descriptions, defaults,
/// titles) rides along verbatim in `extensions` and is serialized flat next
/// to them, which is how it ends up in a generated schema node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldAnnotation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<ContainerKind>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Structural value types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    String,
    Number,
    Integer,
    Boolean,
}

impl ScalarType {
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarType::String => "string",
            ScalarType::Number => "number",
            ScalarType::Integer => "integer",
            ScalarType::Boolean => "boolean",
        }
    }
}

/// Structural shape of a property value. Composite shapes name the type
/// they reference; the name is resolved through a [`crate::TypeRegistry`],
/// which keeps cyclic type graphs free of shared ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "camelCase")]
pub enum ValueType {
    Scalar(ScalarType),
    Array(ScalarType),
    Object(String),
    ObjectArray(String),
    ObjectMap(String),
    Any,
}

impl ValueType {
    pub fn referenced_type(&self) -> Option<&str> {
        match self {
            ValueType::Object(name) | ValueType::ObjectArray(name) | ValueType::ObjectMap(name) => {
                Some(name)
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Declared types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    pub annotation: FieldAnnotation,
    #[serde(rename = "valueType")]
    pub value_type: ValueType,
}

impl PropertyDefinition {
    pub fn new(name: impl Into<String>, value_type: ValueType, annotation: FieldAnnotation) -> Self {
        Self {
            name: name.into(),
            annotation,
            value_type,
        }
    }

    pub fn identifier(&self) -> Option<&str> {
        self.annotation.identifier.as_deref()
    }

    pub fn unit(&self) -> Option<&str> {
        self.annotation.unit.as_deref()
    }

    pub fn container(&self) -> Option<ContainerKind> {
        self.annotation.container
    }

    /// Name of the composite type this property's value refers to, if any.
    pub fn referenced_type(&self) -> Option<&str> {
        self.value_type.referenced_type()
    }
}

/// A declared model type. Built once through [`crate::TypeBuilder`] and
/// never mutated afterwards, so the fields are only readable.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    pub(crate) name: String,
    pub(crate) identifier: Option<String>,
    pub(crate) properties: IndexMap<String, PropertyDefinition>,
    pub(crate) config: ResolvedConfig,
    pub(crate) schema_patch: SchemaPatch,
}

impl TypeDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn properties(&self) -> &IndexMap<String, PropertyDefinition> {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.get(name)
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn schema_patch(&self) -> &SchemaPatch {
        &self.schema_patch
    }

    /// Names of the types referenced by this type's properties, in property order.
    pub fn referenced_types(&self) -> impl Iterator<Item = &str> {
        self.properties.values().filter_map(|p| p.referenced_type())
    }
}
