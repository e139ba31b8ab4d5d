//! Field annotation: attach identifier, unit and container metadata to a
//! field without touching its structural type.

use indexmap::IndexMap;
use serde_json::Value;

use crate::types::{ContainerKind, FieldAnnotation};

/// Build a [`FieldAnnotation`].
///
/// Every slot is optional. `extensions` is stored verbatim; nothing here
/// checks IRI well-formedness or unit strings.
pub fn annotate(
    identifier: Option<&str>,
    unit: Option<&str>,
    container: Option<ContainerKind>,
    extensions: IndexMap<String, Value>,
) -> FieldAnnotation {
    FieldAnnotation {
        identifier: identifier.map(String::from),
        unit: unit.map(String::from),
        container,
        extensions,
    }
}

impl FieldAnnotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_container(mut self, container: ContainerKind) -> Self {
        self.container = Some(container);
        self
    }

    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        self.with_extension("description", description.into())
    }

    pub fn is_empty(&self) -> bool {
        self.identifier.is_none()
            && self.unit.is_none()
            && self.container.is_none()
            && self.extensions.is_empty()
    }
}
