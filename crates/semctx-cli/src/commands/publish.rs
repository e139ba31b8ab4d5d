use std::path::Path;

use serde_json::{Map, Value};

use semctx_core::{compile_document, ContextOptions};

use crate::{emit, load_schemas};

/// Output each schema document with its `@context` embedded and the
/// annotation markers stripped.
pub fn run_publish(
    input_path: &Path,
    output_file: Option<&Path>,
    options: &ContextOptions,
) -> Result<String, String> {
    let schemas = load_schemas(input_path)?;

    let mut published = Map::new();
    for (path, doc) in schemas {
        let node = compile_document(doc, options).map_err(|e| format!("{path}: {e}"))?;
        published.insert(path, Value::from(node));
    }

    if input_path.is_file() {
        if let Some((_, document)) = published.into_iter().next() {
            return emit(&document, output_file);
        }
        return Err(format!("No document published for {}", input_path.display()));
    }
    emit(&Value::Object(published), output_file)
}
