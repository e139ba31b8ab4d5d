//! Linked-data context compiler.
//!
//! `compile` turns an annotated schema document into a JSON-LD context in
//! two passes over the document:
//!
//! - **Pass A** builds a flat registry with one entry per identified
//!   definition, each carrying a local context of its property terms.
//!   Referenced definitions are resolved first; a visited set keeps cyclic
//!   references (A → B → A) from looping.
//! - **Pass B** walks the root properties and turns every identifier or
//!   container marker into a top-level term named after the nearest
//!   enclosing property.
//!
//! The context is `@vocab` and the prefix table, then the Pass B terms, then
//! the registry (a registry entry replaces a same-named term). Every IRI in
//! it is then compacted against the prefix table.
//!
//! Markers are removed from the document as they are extracted. Compile a
//! clone if the original document is still needed.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use tracing::{debug, trace};

use crate::catalogs::{KW_CONTAINER, KW_CONTEXT, KW_ID, KW_VOCAB};
use crate::error::MalformedSchemaError;
use crate::options::{ContextOptions, Prefix};
use crate::schema::{is_value_keyword, SchemaDocument, SchemaKeys, SchemaNode};
use crate::types::ContainerKind;

// ---------------------------------------------------------------------------
// Context document
// ---------------------------------------------------------------------------

/// A single term definition.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextEntry {
    /// `"term": "<iri>"`
    Iri(String),
    /// `"term": {"@id": "<iri>", "@container": "list"|"set"}`
    Term {
        id: Option<String>,
        container: Option<ContainerKind>,
    },
    /// `"TypeName": {"@id": "<iri>", "@context": {...}}`
    Type {
        id: String,
        context: IndexMap<String, ContextEntry>,
    },
}

impl ContextEntry {
    pub fn id(&self) -> Option<&str> {
        match self {
            ContextEntry::Iri(iri) => Some(iri),
            ContextEntry::Term { id, .. } => id.as_deref(),
            ContextEntry::Type { id, .. } => Some(id),
        }
    }

    pub fn container(&self) -> Option<ContainerKind> {
        match self {
            ContextEntry::Term { container, .. } => *container,
            _ => None,
        }
    }

    pub fn local_context(&self) -> Option<&IndexMap<String, ContextEntry>> {
        match self {
            ContextEntry::Type { context, .. } => Some(context),
            _ => None,
        }
    }

    pub fn to_node(&self) -> SchemaNode {
        match self {
            ContextEntry::Iri(iri) => SchemaNode::string(iri.as_str()),
            ContextEntry::Term { id, container } => {
                let mut node = SchemaNode::object();
                if let Some(id) = id {
                    node.insert(KW_ID, SchemaNode::string(id.as_str()));
                }
                if let Some(container) = container {
                    node.insert(KW_CONTAINER, SchemaNode::string(container.as_str()));
                }
                node
            }
            ContextEntry::Type { id, context } => {
                let mut node = SchemaNode::object();
                node.insert(KW_ID, SchemaNode::string(id.as_str()));
                node.insert(KW_CONTEXT, terms_to_node(context));
                node
            }
        }
    }
}

fn terms_to_node(terms: &IndexMap<String, ContextEntry>) -> SchemaNode {
    SchemaNode::Object(
        terms
            .iter()
            .map(|(name, entry)| (name.clone(), entry.to_node()))
            .collect(),
    )
}

/// A compiled linked-data context.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextDocument {
    vocab: String,
    prefixes: Vec<Prefix>,
    terms: IndexMap<String, ContextEntry>,
}

impl ContextDocument {
    pub fn vocab(&self) -> &str {
        &self.vocab
    }

    pub fn prefixes(&self) -> &[Prefix] {
        &self.prefixes
    }

    pub fn terms(&self) -> &IndexMap<String, ContextEntry> {
        &self.terms
    }

    pub fn get(&self, term: &str) -> Option<&ContextEntry> {
        self.terms.get(term)
    }

    /// Render as an ordered JSON object: `@vocab`, prefixes, then terms.
    pub fn to_node(&self) -> SchemaNode {
        let mut node = SchemaNode::object();
        node.insert(KW_VOCAB, SchemaNode::string(self.vocab.as_str()));
        for prefix in &self.prefixes {
            node.insert(prefix.name.clone(), SchemaNode::string(prefix.expansion.as_str()));
        }
        for (name, entry) in &self.terms {
            node.insert(name.clone(), entry.to_node());
        }
        node
    }

    pub fn to_value(&self) -> serde_json::Value {
        self.to_node().into()
    }
}

impl Serialize for ContextDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_node().serialize(serializer)
    }
}

// ---------------------------------------------------------------------------
// Prefix compaction
// ---------------------------------------------------------------------------

/// Rewrites full IRIs to `prefix:suffix` using the longest matching prefix.
///
/// Matching is done against absolute expansions only, so an IRI that is
/// already compact never matches again.
#[derive(Debug, Clone)]
pub struct Compactor {
    table: Vec<(String, String)>,
}

impl Compactor {
    pub fn new(options: &ContextOptions) -> Self {
        let mut table: Vec<(String, String)> = options
            .absolute_prefixes()
            .into_iter()
            .filter(|(_, expansion)| !expansion.is_empty())
            .map(|(name, expansion)| (expansion, name.to_string()))
            .collect();
        // Stable sort keeps declaration order among equal-length expansions.
        table.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { table }
    }

    /// Drop the named prefixes from the matching table.
    pub fn without(mut self, names: &[&str]) -> Self {
        self.table.retain(|(_, name)| !names.contains(&name.as_str()));
        self
    }

    pub fn compact(&self, iri: &str) -> String {
        for (expansion, name) in &self.table {
            if let Some(suffix) = iri.strip_prefix(expansion.as_str()) {
                trace!(iri, prefix = %name, "compacted IRI");
                return format!("{name}:{suffix}");
            }
        }
        iri.to_string()
    }

    /// Whether some declared prefix covers `iri`.
    pub fn matches(&self, iri: &str) -> bool {
        self.table.iter().any(|(expansion, _)| iri.starts_with(expansion.as_str()))
    }

    pub fn compact_entry(&self, entry: &mut ContextEntry) {
        match entry {
            ContextEntry::Iri(iri) => *iri = self.compact(iri),
            ContextEntry::Term { id, .. } => {
                if let Some(iri) = id {
                    *iri = self.compact(iri);
                }
            }
            ContextEntry::Type { id, context } => {
                *id = self.compact(id);
                for nested in context.values_mut() {
                    self.compact_entry(nested);
                }
            }
        }
    }

    /// Compact every term of a context in place. Prefix declarations and
    /// `@vocab` are left as declared.
    pub fn compact_document(&self, document: &mut ContextDocument) {
        for entry in document.terms.values_mut() {
            self.compact_entry(entry);
        }
    }
}

// ---------------------------------------------------------------------------
// Compilation
// ---------------------------------------------------------------------------

/// Compile the linked-data context of `schema`.
///
/// The document is validated first; on error it is left untouched. On
/// success every identifier and container marker has been removed from it.
pub fn compile(
    schema: &mut SchemaDocument,
    options: &ContextOptions,
) -> Result<ContextDocument, MalformedSchemaError> {
    let keys = &options.keys;
    check_document(schema, keys)?;

    let root = schema.root_mut();
    let registry = match root.get_mut(&keys.definitions).and_then(SchemaNode::as_object_mut) {
        Some(definitions) => build_registry(definitions, keys),
        None => IndexMap::new(),
    };

    let mut terms: IndexMap<String, ContextEntry> = IndexMap::new();

    // The document's own type, when it names itself.
    let root_id = root.take_string(&keys.identifier);
    if let (Some(title), Some(id)) = (root.get(&keys.title).and_then(SchemaNode::as_str), root_id) {
        terms.insert(title.to_string(), ContextEntry::Iri(id));
    }

    let mut root_terms: IndexMap<String, TermParts> = IndexMap::new();
    if let Some(properties) = root.get_mut(&keys.properties) {
        collect_property_terms(properties, keys, &mut root_terms);
    }
    for (name, parts) in root_terms {
        terms.insert(name, parts.into_entry());
    }

    for (name, entry) in registry {
        if terms.contains_key(&name) {
            debug!(term = %name, "registry entry replaces top-level term");
        }
        terms.insert(name, entry);
    }

    let (prefixes, shadowed) = visible_prefixes(options, &terms);
    let mut document = ContextDocument {
        vocab: options.vocab.clone(),
        prefixes,
        terms,
    };
    Compactor::new(options)
        .without(&shadowed)
        .compact_document(&mut document);
    debug!(terms = document.terms.len(), "compiled context");
    Ok(document)
}

/// Prefix declarations that survive next to `terms`, and the names of those
/// replaced by a same-named term. A replaced prefix is not used for
/// compaction, and declarations written over it are emitted in absolute form.
fn visible_prefixes<'o>(
    options: &'o ContextOptions,
    terms: &IndexMap<String, ContextEntry>,
) -> (Vec<Prefix>, Vec<&'o str>) {
    let shadowed: Vec<&str> = options
        .prefixes
        .iter()
        .map(|prefix| prefix.name.as_str())
        .filter(|name| terms.contains_key(*name))
        .collect();
    for name in &shadowed {
        debug!(prefix = %name, "term replaces prefix declaration");
    }

    let absolute = options.absolute_prefixes();
    let prefixes = options
        .prefixes
        .iter()
        .zip(absolute)
        .filter(|(prefix, _)| !shadowed.contains(&prefix.name.as_str()))
        .map(|(prefix, (_, absolute))| {
            let over_shadowed = prefix
                .expansion
                .split_once(':')
                .is_some_and(|(head, _)| shadowed.contains(&head));
            if over_shadowed {
                Prefix::new(prefix.name.clone(), absolute)
            } else {
                prefix.clone()
            }
        })
        .collect();
    (prefixes, shadowed)
}

/// Compile `schema` and return the publishable document:
/// `{"@context": <context>, ...schema without markers}`.
pub fn compile_document(
    mut schema: SchemaDocument,
    options: &ContextOptions,
) -> Result<SchemaNode, MalformedSchemaError> {
    let context = compile(&mut schema, options)?;
    let mut published = SchemaNode::object();
    published.insert(KW_CONTEXT, context.to_node());
    if let SchemaNode::Object(rest) = schema.into_root() {
        for (key, value) in rest {
            published.insert(key, value);
        }
    }
    Ok(published)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn check_document(schema: &SchemaDocument, keys: &SchemaKeys) -> Result<(), MalformedSchemaError> {
    let root = schema.root();
    if root.as_object().is_none() {
        return Err(MalformedSchemaError::NotAnObject { path: "#".into() });
    }

    let properties = match root.get(&keys.properties) {
        None => {
            return Err(MalformedSchemaError::MissingSection {
                section: keys.properties.clone(),
            })
        }
        Some(node) => node.as_object().ok_or_else(|| MalformedSchemaError::NotAnObject {
            path: format!("#/{}", keys.properties),
        })?,
    };

    let definitions = match root.get(&keys.definitions) {
        None => None,
        Some(node) => Some(node.as_object().ok_or_else(|| {
            MalformedSchemaError::NotAnObject {
                path: format!("#/{}", keys.definitions),
            }
        })?),
    };

    let resolve = |owner: &str, property: &SchemaNode| -> Result<(), MalformedSchemaError> {
        for target in property.references(keys) {
            let defined = definitions.ok_or_else(|| MalformedSchemaError::MissingSection {
                section: keys.definitions.clone(),
            })?;
            if !defined.contains_key(target) {
                return Err(MalformedSchemaError::UnresolvedReference {
                    property: owner.to_string(),
                    type_name: target.to_string(),
                });
            }
        }
        Ok(())
    };

    if let Some(definitions) = definitions {
        for (type_name, definition) in definitions {
            if definition.as_object().is_none() {
                return Err(MalformedSchemaError::NotAnObject {
                    path: format!("#/{}/{}", keys.definitions, type_name),
                });
            }
            let Some(type_properties) = definition.get(&keys.properties) else {
                continue;
            };
            let type_properties =
                type_properties
                    .as_object()
                    .ok_or_else(|| MalformedSchemaError::NotAnObject {
                        path: format!("#/{}/{}/{}", keys.definitions, type_name, keys.properties),
                    })?;
            for (name, property) in type_properties {
                resolve(&format!("{type_name}.{name}"), property)?;
            }
        }
    }

    for (name, property) in properties {
        resolve(name, property)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Pass A: definition registry
// ---------------------------------------------------------------------------

fn build_registry(
    definitions: &mut IndexMap<String, SchemaNode>,
    keys: &SchemaKeys,
) -> IndexMap<String, ContextEntry> {
    let mut builder = RegistryBuilder {
        keys,
        visited: HashSet::new(),
        registry: IndexMap::new(),
    };
    let names: Vec<String> = definitions.keys().cloned().collect();
    for name in &names {
        builder.ensure_entry(name, definitions);
    }
    builder.registry
}

struct RegistryBuilder<'k> {
    keys: &'k SchemaKeys,
    visited: HashSet<String>,
    registry: IndexMap<String, ContextEntry>,
}

impl RegistryBuilder<'_> {
    fn ensure_entry(&mut self, name: &str, definitions: &mut IndexMap<String, SchemaNode>) {
        if !self.visited.insert(name.to_string()) {
            trace!(type_name = name, "already visited");
            return;
        }
        let Some(definition) = definitions.get_mut(name) else {
            return;
        };

        let id = definition.take_string(&self.keys.identifier);
        let references: Vec<String> = definition
            .get(&self.keys.properties)
            .and_then(SchemaNode::as_object)
            .into_iter()
            .flat_map(|properties| properties.values())
            .flat_map(|property| property.references(self.keys))
            .map(String::from)
            .collect();
        // Markers outside the properties map have no term to attach to.
        let mut local: IndexMap<String, TermParts> = IndexMap::new();
        collect_terms(definition, None, self.keys, &mut local);

        let Some(id) = id else {
            debug!(type_name = name, "definition has no identifier, skipped");
            return;
        };

        for target in &references {
            if self.visited.contains(target) {
                debug!(type_name = name, reference = %target, "reference already visited");
                continue;
            }
            self.ensure_entry(target, definitions);
        }

        let context = local
            .into_iter()
            .map(|(term, parts)| (term, parts.into_entry()))
            .collect();
        debug!(type_name = name, "registered type context");
        self.registry
            .insert(name.to_string(), ContextEntry::Type { id, context });
    }
}

// ---------------------------------------------------------------------------
// Marker extraction
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct TermParts {
    id: Option<String>,
    container: Option<ContainerKind>,
}

impl TermParts {
    fn merge(&mut self, id: Option<String>, container: Option<ContainerKind>) {
        if id.is_some() {
            self.id = id;
        }
        if container.is_some() {
            self.container = container;
        }
    }

    fn into_entry(self) -> ContextEntry {
        match (self.id, self.container) {
            (Some(id), None) => ContextEntry::Iri(id),
            (id, container) => ContextEntry::Term { id, container },
        }
    }
}

/// Extract terms from a properties map: each property's subtree is walked
/// with the property's name as the enclosing name.
fn collect_property_terms(
    properties: &mut SchemaNode,
    keys: &SchemaKeys,
    terms: &mut IndexMap<String, TermParts>,
) {
    if let SchemaNode::Object(map) = properties {
        for (name, property) in map.iter_mut() {
            collect_terms(property, Some(name.as_str()), keys, terms);
        }
    }
}

/// Remove identifier and container markers from `node` and its subtree,
/// recording them under the nearest enclosing property name. Structural
/// keys (`items`, `anyOf`, ...) and sequence elements inherit the enclosing
/// name; a nested properties map starts new names. Instance values
/// (`default`, `enum`, ...) are left alone.
fn collect_terms(
    node: &mut SchemaNode,
    enclosing: Option<&str>,
    keys: &SchemaKeys,
    terms: &mut IndexMap<String, TermParts>,
) {
    match node {
        SchemaNode::Scalar(_) => {}
        SchemaNode::Array(items) => {
            for item in items.iter_mut() {
                collect_terms(item, enclosing, keys, terms);
            }
        }
        SchemaNode::Object(_) => {
            let id = node.take_string(&keys.identifier);
            let container = node.take_container(&keys.container);
            if id.is_some() || container.is_some() {
                match enclosing {
                    Some(name) => terms.entry(name.to_string()).or_default().merge(id, container),
                    None => trace!("marker outside any property dropped"),
                }
            }
            if let SchemaNode::Object(map) = node {
                for (key, child) in map.iter_mut() {
                    if *key == keys.properties {
                        collect_property_terms(child, keys, terms);
                    } else if is_value_keyword(key) {
                        continue;
                    } else {
                        collect_terms(child, enclosing, keys, terms);
                    }
                }
            }
        }
    }
}
