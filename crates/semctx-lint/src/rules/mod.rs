//! Built-in lint rules.

pub mod missing_identifier;
pub mod term_shadowing;
pub mod uncompactable_iri;

pub use missing_identifier::MissingIdentifierRule;
pub use term_shadowing::TermShadowingRule;
pub use uncompactable_iri::UncompactableIriRule;

use semctx_core::schema::is_value_keyword;
use semctx_core::{SchemaKeys, SchemaNode};

/// Identifier markers in `node`'s subtree, each with its JSON pointer.
/// Instance values (`default`, `enum`, ...) are skipped.
pub(crate) fn identifier_markers<'a>(
    node: &'a SchemaNode,
    path: &str,
    keys: &SchemaKeys,
    found: &mut Vec<(String, &'a str)>,
) {
    walk_markers(node, path, keys, false, found);
}

fn walk_markers<'a>(
    node: &'a SchemaNode,
    path: &str,
    keys: &SchemaKeys,
    name_map: bool,
    found: &mut Vec<(String, &'a str)>,
) {
    match node {
        SchemaNode::Object(map) if name_map => {
            for (name, child) in map {
                walk_markers(child, &format!("{path}/{}", escape(name)), keys, false, found);
            }
        }
        SchemaNode::Object(map) => {
            if let Some(iri) = map.get(&keys.identifier).and_then(SchemaNode::as_str) {
                found.push((path.to_string(), iri));
            }
            for (key, child) in map {
                if is_value_keyword(key) {
                    continue;
                }
                let child_path = format!("{path}/{}", escape(key));
                walk_markers(child, &child_path, keys, keys.is_name_map(key), found);
            }
        }
        SchemaNode::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                walk_markers(item, &format!("{path}/{index}"), keys, false, found);
            }
        }
        SchemaNode::Scalar(_) => {}
    }
}

/// Escape a key for use as a JSON pointer segment.
pub(crate) fn escape(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}
