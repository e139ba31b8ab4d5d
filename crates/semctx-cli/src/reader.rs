use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

pub const CONFIG_FILE: &str = "semctx.config.yaml";
const SCHEMA_PATTERN: &str = "**/*.schema.json";

/// A file with its path and content.
pub struct SchemaFile {
    pub path: String,
    pub content: String,
}

/// Project configuration from semctx.config.yaml.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectConfig {
    pub name: Option<String>,
    pub vocab: Option<String>,
    pub prefixes: Option<IndexMap<String, String>>,
    pub keys: Option<String>,
    pub sources: Option<Vec<String>>,
}

/// Read schema files from a path (file or directory).
pub fn read_schema_files(input_path: &Path) -> Result<Vec<SchemaFile>, String> {
    if !input_path.exists() {
        return Err(format!("Path does not exist: {}", input_path.display()));
    }

    if input_path.is_file() {
        let content = fs::read_to_string(input_path)
            .map_err(|e| format!("Failed to read {}: {}", input_path.display(), e))?;
        return Ok(vec![SchemaFile {
            path: input_path.to_string_lossy().to_string(),
            content,
        }]);
    }

    if input_path.is_dir() {
        let config_path = input_path.join(CONFIG_FILE);
        if config_path.exists() {
            let config = read_config_file(&config_path)?;
            if let Some(sources) = config.sources.filter(|s| !s.is_empty()) {
                return read_sources(&sources, input_path);
            }
        }

        return read_sources(&[SCHEMA_PATTERN.to_string()], input_path);
    }

    Err(format!(
        "Path is neither a file nor a directory: {}",
        input_path.display()
    ))
}

/// Read project config from semctx.config.yaml if it exists.
pub fn read_project_config(dir_path: &Path) -> Result<Option<ProjectConfig>, String> {
    let config_path = dir_path.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    read_config_file(&config_path).map(Some)
}

pub fn read_config_file(config_path: &Path) -> Result<ProjectConfig, String> {
    let yaml_content = fs::read_to_string(config_path)
        .map_err(|e| format!("Failed to read config {}: {}", config_path.display(), e))?;
    serde_yaml::from_str(&yaml_content).map_err(|e| format!("Invalid YAML config: {}", e))
}

/// Read a YAML or JSON file whose top level is a mapping.
pub fn read_config_map(path: &Path) -> Result<Map<String, Value>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let value: Value = serde_yaml::from_str(&content)
        .map_err(|e| format!("Invalid config {}: {}", path.display(), e))?;
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(format!("Config {} must be a mapping", path.display())),
    }
}

fn read_sources(patterns: &[String], base_dir: &Path) -> Result<Vec<SchemaFile>, String> {
    let mut files: Vec<SchemaFile> = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for pattern in patterns {
        let full_pattern = base_dir.join(pattern);
        let pattern_str = full_pattern.to_string_lossy().replace('\\', "/");
        let entries = glob::glob(&pattern_str)
            .map_err(|e| format!("Invalid glob pattern '{}': {}", pattern, e))?;

        let mut matched: Vec<PathBuf> = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) => {
                    if path.is_file() && seen.insert(path.clone()) {
                        matched.push(path);
                    }
                }
                Err(e) => return Err(format!("Glob error: {}", e)),
            }
        }
        matched.sort();

        for path in matched {
            let content = fs::read_to_string(&path)
                .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
            files.push(SchemaFile {
                path: path.to_string_lossy().to_string(),
                content,
            });
        }
    }

    Ok(files)
}
