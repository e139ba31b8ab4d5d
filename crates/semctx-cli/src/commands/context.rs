use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use semctx_core::{compile, ContextOptions};

use crate::{emit, load_schemas};

/// Compile the context of one schema file, or of every schema file in a
/// directory keyed by path.
pub fn run_context(
    input_path: &Path,
    output_file: Option<&Path>,
    options: &ContextOptions,
) -> Result<String, String> {
    let schemas = load_schemas(input_path)?;

    let mut contexts = Map::new();
    for (path, mut doc) in schemas {
        let context = compile(&mut doc, options).map_err(|e| format!("{path}: {e}"))?;
        debug!(file = %path, terms = context.terms().len(), "compiled");
        contexts.insert(path, context.to_value());
    }

    if input_path.is_file() {
        if let Some((_, context)) = contexts.into_iter().next() {
            return emit(&context, output_file);
        }
        return Err(format!("No context compiled for {}", input_path.display()));
    }
    emit(&Value::Object(contexts), output_file)
}
