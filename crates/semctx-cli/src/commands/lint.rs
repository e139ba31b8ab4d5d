use std::path::Path;

use semctx_core::ContextOptions;
use semctx_lint::{LintConfig, LintDiagnostic, LintSeverity, Linter};

use crate::load_schemas;

fn severity_label(severity: &LintSeverity) -> &'static str {
    match severity {
        LintSeverity::Error => "error",
        LintSeverity::Warning => "warning",
        LintSeverity::Info => "info",
    }
}

fn sarif_level(severity: &LintSeverity) -> &'static str {
    match severity {
        LintSeverity::Error => "error",
        LintSeverity::Warning => "warning",
        LintSeverity::Info => "note",
    }
}

pub fn run_lint(input_path: &Path, format: &str, options: &ContextOptions) -> Result<String, String> {
    let schemas = load_schemas(input_path)?;

    let config = LintConfig::default();
    let linter = Linter::new(config);
    let results: Vec<LintDiagnostic> = schemas
        .iter()
        .flat_map(|(path, doc)| linter.lint(path, doc, options))
        .collect();
    let file_count = schemas.len();

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&serde_json::json!({
                "diagnostics": results,
                "summary": {
                    "count": results.len(),
                    "files": file_count,
                }
            }))
            .map_err(|e| format!("JSON serialization error: {e}"))?;
            Ok(json)
        }
        "sarif" => {
            let sarif = build_sarif(&results, &linter);
            serde_json::to_string_pretty(&sarif)
                .map_err(|e| format!("SARIF serialization error: {e}"))
        }
        _ => {
            // Human-readable format
            let mut lines: Vec<String> = Vec::new();

            for d in &results {
                lines.push(format!(
                    "{}:{} {}[{}]: {}",
                    d.file,
                    d.path,
                    severity_label(&d.severity),
                    d.rule,
                    d.message
                ));
            }

            let count = results.len();
            let issue_word = if count == 1 { "issue" } else { "issues" };
            let file_word = if file_count == 1 { "file" } else { "files" };
            lines.push(format!(
                "{count} lint {issue_word} in {file_count} {file_word}."
            ));

            Ok(lines.join("\n"))
        }
    }
}

fn build_sarif(results: &[LintDiagnostic], linter: &Linter) -> serde_json::Value {
    let rule_descriptors: Vec<serde_json::Value> = linter
        .rules()
        .iter()
        .map(|r| {
            serde_json::json!({
                "id": r.id(),
                "shortDescription": { "text": r.description() },
                "defaultConfiguration": {
                    "level": sarif_level(&r.default_severity())
                }
            })
        })
        .collect();

    // Schema documents are JSON, so locations are logical (JSON pointer)
    // rather than line/column regions.
    let sarif_results: Vec<serde_json::Value> = results
        .iter()
        .map(|d| {
            serde_json::json!({
                "ruleId": d.rule,
                "level": sarif_level(&d.severity),
                "message": { "text": d.message },
                "locations": [{
                    "physicalLocation": {
                        "artifactLocation": { "uri": d.file }
                    },
                    "logicalLocations": [{
                        "fullyQualifiedName": d.path
                    }]
                }]
            })
        })
        .collect();

    serde_json::json!({
        "$schema": "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/main/sarif-2.1/schema/sarif-schema-2.1.0.json",
        "version": "2.1.0",
        "runs": [{
            "tool": {
                "driver": {
                    "name": "semctx-lint",
                    "version": env!("CARGO_PKG_VERSION"),
                    "rules": rule_descriptors
                }
            },
            "results": sarif_results
        }]
    })
}
