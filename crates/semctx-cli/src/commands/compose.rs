use std::path::{Path, PathBuf};

use serde_json::Value;

use semctx_core::{compose, ResolvedConfig};

use crate::emit;
use crate::reader::read_config_map;

/// Compose `own` over `bases` (earliest base strongest) and print the
/// resolved config as JSON.
pub fn run_compose(own: &Path, bases: &[PathBuf]) -> Result<String, String> {
    let own = ResolvedConfig::from(read_config_map(own)?);
    let bases = bases
        .iter()
        .map(|path| read_config_map(path).map(ResolvedConfig::from))
        .collect::<Result<Vec<_>, String>>()?;
    let base_refs: Vec<&ResolvedConfig> = bases.iter().collect();

    let resolved = compose(&own, &base_refs);
    emit(&Value::from(resolved), None)
}
