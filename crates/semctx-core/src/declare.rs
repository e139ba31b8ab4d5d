//! Type declaration: the one place where a model type's configuration is
//! composed and its own identifier is turned into a schema patch.
//!
//! Declaring is explicit. A [`TypeBuilder`] takes its bases in order, its own
//! identifier and config overrides, and produces an immutable
//! [`TypeDefinition`]. Types declared lazily can sit behind a
//! `std::sync::LazyLock`, which gives the compute-once guarantee.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::catalogs::IDENTIFIER_KEY;
use crate::config::{compose, ResolvedConfig};
use crate::error::RegistryError;
use crate::schema::SchemaNode;
use crate::types::{FieldAnnotation, PropertyDefinition, TypeDefinition, ValueType};

// ---------------------------------------------------------------------------
// Schema patch
// ---------------------------------------------------------------------------

/// Keys a declared type contributes to its own generated schema node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaPatch(IndexMap<String, SchemaNode>);

impl SchemaPatch {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&SchemaNode> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SchemaNode)> {
        self.0.iter()
    }

    /// Write the patch into an object node; existing keys are overwritten.
    pub fn apply(&self, node: &mut SchemaNode) {
        for (key, value) in &self.0 {
            node.insert(key.clone(), value.clone());
        }
    }
}

/// Schema patch carrying a type's own identifier, or an empty patch when the
/// type declares none.
pub fn inject_type_identifier(definition: &TypeDefinition) -> SchemaPatch {
    let mut patch = SchemaPatch::default();
    if let Some(iri) = definition.identifier().filter(|iri| !iri.is_empty()) {
        patch
            .0
            .insert(IDENTIFIER_KEY.to_string(), SchemaNode::string(iri));
    }
    patch
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

pub struct TypeBuilder<'a> {
    name: String,
    identifier: Option<String>,
    bases: Vec<&'a TypeDefinition>,
    config: ResolvedConfig,
    properties: IndexMap<String, PropertyDefinition>,
}

impl<'a> TypeBuilder<'a> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifier: None,
            bases: Vec::new(),
            config: ResolvedConfig::new(),
            properties: IndexMap::new(),
        }
    }

    /// The type's own identifier. Not inherited from bases.
    pub fn identifier(mut self, iri: impl Into<String>) -> Self {
        self.identifier = Some(iri.into());
        self
    }

    /// Add a base type. Bases listed earlier take precedence over later ones.
    pub fn base(mut self, base: &'a TypeDefinition) -> Self {
        self.bases.push(base);
        self
    }

    /// Replace the type's own config overrides.
    pub fn config(mut self, config: ResolvedConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config = self.config.with(key, value);
        self
    }

    pub fn property(
        mut self,
        name: impl Into<String>,
        value_type: ValueType,
        annotation: FieldAnnotation,
    ) -> Self {
        let name = name.into();
        self.properties.insert(
            name.clone(),
            PropertyDefinition::new(name, value_type, annotation),
        );
        self
    }

    /// Resolve config and properties against the bases and freeze the type.
    pub fn build(self) -> TypeDefinition {
        let base_configs: Vec<&ResolvedConfig> = self.bases.iter().map(|b| b.config()).collect();
        let config = compose(&self.config, &base_configs);

        // Inherited properties first (earliest base wins a name), minus the
        // ones this type redeclares; then the type's own.
        let mut properties: IndexMap<String, PropertyDefinition> = IndexMap::new();
        for base in &self.bases {
            for (name, prop) in base.properties() {
                if !properties.contains_key(name) && !self.properties.contains_key(name) {
                    properties.insert(name.clone(), prop.clone());
                }
            }
        }
        properties.extend(self.properties);

        let mut definition = TypeDefinition {
            name: self.name,
            identifier: self.identifier,
            properties,
            config,
            schema_patch: SchemaPatch::default(),
        };
        definition.schema_patch = inject_type_identifier(&definition);

        debug!(
            type_name = %definition.name,
            bases = self.bases.len(),
            properties = definition.properties.len(),
            "declared type"
        );
        definition
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Declared types keyed by name, in registration order.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: IndexMap<String, TypeDefinition>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, definition: TypeDefinition) -> Result<(), RegistryError> {
        if self.types.contains_key(definition.name()) {
            return Err(RegistryError::DuplicateType {
                name: definition.name().to_string(),
            });
        }
        self.types.insert(definition.name().to_string(), definition);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.types.values()
    }

    /// Types reachable from `root` through property references, `root`
    /// excluded, in first-visit order. Cycles are cut by the visited set.
    pub fn reachable_from<'r>(
        &'r self,
        root: &'r TypeDefinition,
    ) -> Result<Vec<&'r TypeDefinition>, RegistryError> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut order: Vec<&TypeDefinition> = Vec::new();
        visited.insert(root.name());
        self.collect_reachable(root, &mut visited, &mut order)?;
        Ok(order)
    }

    fn collect_reachable<'r>(
        &'r self,
        from: &'r TypeDefinition,
        visited: &mut HashSet<&'r str>,
        order: &mut Vec<&'r TypeDefinition>,
    ) -> Result<(), RegistryError> {
        for name in from.referenced_types() {
            if visited.contains(name) {
                continue;
            }
            let target = self.get(name).ok_or_else(|| RegistryError::UnknownType {
                type_name: name.to_string(),
                referenced_by: from.name().to_string(),
            })?;
            visited.insert(target.name());
            order.push(target);
            self.collect_reachable(target, visited, order)?;
        }
        Ok(())
    }
}
