//! Reference schema generator for declared type graphs.
//!
//! Emits the annotated schema document the context compiler reads, with
//! the default marker keys: every type reachable from the root lands in the
//! definitions section, composite properties point at it by name. The root
//! itself is defined there too when a reference leads back to it.

use indexmap::IndexMap;

use crate::declare::TypeRegistry;
use crate::error::RegistryError;
use crate::schema::{SchemaDocument, SchemaKeys, SchemaNode};
use crate::types::{PropertyDefinition, TypeDefinition, ValueType};

pub fn generate_schema(
    root: &TypeDefinition,
    registry: &TypeRegistry,
) -> Result<SchemaDocument, RegistryError> {
    let keys = SchemaKeys::default();
    let reachable = registry.reachable_from(root)?;

    // A root that is referenced back also needs a definitions entry.
    let recursive = std::iter::once(root)
        .chain(reachable.iter().copied())
        .any(|definition| definition.referenced_types().any(|name| name == root.name()));

    let mut node = type_node(root, &keys);
    let defined = recursive.then_some(root).into_iter().chain(reachable);
    let definitions: IndexMap<String, SchemaNode> = defined
        .map(|definition| (definition.name().to_string(), type_node(definition, &keys)))
        .collect();
    if !definitions.is_empty() {
        node.insert(keys.definitions.clone(), SchemaNode::Object(definitions));
    }
    Ok(SchemaDocument::new(node))
}

fn type_node(definition: &TypeDefinition, keys: &SchemaKeys) -> SchemaNode {
    let mut node = SchemaNode::object();
    node.insert(keys.title.clone(), SchemaNode::string(definition.name()));
    node.insert("type", SchemaNode::string("object"));
    definition.schema_patch().apply(&mut node);

    let properties = definition
        .properties()
        .iter()
        .map(|(name, property)| (name.clone(), property_node(property, keys)))
        .collect();
    node.insert(keys.properties.clone(), SchemaNode::Object(properties));
    node
}

fn reference(type_name: &str, keys: &SchemaKeys) -> SchemaNode {
    let mut node = SchemaNode::object();
    node.insert(keys.reference.clone(), SchemaNode::string(type_name));
    node
}

fn property_node(property: &PropertyDefinition, keys: &SchemaKeys) -> SchemaNode {
    let mut node = SchemaNode::object();
    match &property.value_type {
        ValueType::Scalar(scalar) => {
            node.insert("type", SchemaNode::string(scalar.as_str()));
        }
        ValueType::Array(scalar) => {
            let mut items = SchemaNode::object();
            items.insert("type", SchemaNode::string(scalar.as_str()));
            node.insert("type", SchemaNode::string("array"));
            node.insert("items", items);
        }
        ValueType::Object(type_name) => {
            node.insert(keys.reference.clone(), SchemaNode::string(type_name.as_str()));
        }
        ValueType::ObjectArray(type_name) => {
            node.insert("type", SchemaNode::string("array"));
            node.insert("items", reference(type_name, keys));
        }
        ValueType::ObjectMap(type_name) => {
            node.insert("type", SchemaNode::string("object"));
            node.insert("additionalProperties", reference(type_name, keys));
        }
        ValueType::Any => {}
    }

    let annotation = &property.annotation;
    if let Some(identifier) = property.identifier() {
        node.insert(keys.identifier.clone(), SchemaNode::string(identifier));
    }
    if let Some(container) = property.container() {
        node.insert(keys.container.clone(), SchemaNode::string(container.as_str()));
    }
    if let Some(unit) = property.unit() {
        node.insert("unit", SchemaNode::string(unit));
    }
    for (key, value) in &annotation.extensions {
        node.insert(key.clone(), SchemaNode::from(value.clone()));
    }
    node
}
