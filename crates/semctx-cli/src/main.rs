mod commands;
mod reader;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use reader::{read_config_file, read_project_config, read_schema_files, ProjectConfig};
use semctx_core::{ContextOptions, SchemaDocument, SchemaKeys};

const LOG_ENV: &str = "SEMCTX_LOG";

#[derive(Parser)]
#[command(
    name = "semctx",
    version,
    about = "semctx — compile JSON-LD contexts from annotated schema documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project config file (defaults to semctx.config.yaml in the input directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Marker key preset: default or json-ld
    #[arg(long, global = true)]
    keys: Option<String>,

    /// Log compiler decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile schema documents into JSON-LD contexts
    Context {
        /// Input path (file or directory, defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Write output to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Output schema documents with their compiled context embedded
    Publish {
        /// Input path (file or directory, defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Write output to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Lint schema documents for annotation issues
    Lint {
        /// Input path (file or directory, defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format: human (default), json or sarif
        #[arg(long, default_value = "human")]
        format: String,
    },

    /// Compose config files, own first, then bases by precedence
    Compose {
        /// The type's own config (YAML or JSON)
        own: PathBuf,

        /// Base configs, earliest (strongest) first
        bases: Vec<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Context { path, output } => {
            resolve_options(path, cli.config.as_deref(), cli.keys.as_deref()).and_then(|options| {
                commands::context::run_context(path, output.as_deref(), &options)
            })
        }
        Commands::Publish { path, output } => {
            resolve_options(path, cli.config.as_deref(), cli.keys.as_deref()).and_then(|options| {
                commands::publish::run_publish(path, output.as_deref(), &options)
            })
        }
        Commands::Lint { path, format } => {
            resolve_options(path, cli.config.as_deref(), cli.keys.as_deref())
                .and_then(|options| commands::lint::run_lint(path, format, &options))
        }
        Commands::Compose { own, bases } => commands::compose::run_compose(own, bases),
    };

    match result {
        Ok(output) => {
            println!("{output}");
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("semctx=debug,semctx_core=debug,semctx_lint=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

/// Build compile options from the project config and command-line flags.
///
/// An explicit `--config` wins over a `semctx.config.yaml` next to the input;
/// `--keys` wins over the config's `keys`.
pub fn resolve_options(
    input_path: &Path,
    config_path: Option<&Path>,
    keys_flag: Option<&str>,
) -> Result<ContextOptions, String> {
    let config = match config_path {
        Some(path) => Some(read_config_file(path)?),
        None if input_path.is_dir() => read_project_config(input_path)?,
        None => None,
    };
    let config = config.unwrap_or_default();
    debug!(project = ?config.name, "resolved project config");

    let mut options = ContextOptions::default();
    let ProjectConfig {
        vocab,
        prefixes,
        keys,
        ..
    } = config;
    if let Some(vocab) = vocab {
        options.vocab = vocab;
    }
    if let Some(prefixes) = prefixes {
        options.prefixes.clear();
        for (name, expansion) in prefixes {
            options = options.with_prefix(name, expansion);
        }
    }
    if let Some(preset) = keys_flag.map(str::to_string).or(keys) {
        options.keys = parse_keys(&preset)?;
    }

    options.validate().map_err(|e| e.to_string())?;
    Ok(options)
}

fn parse_keys(preset: &str) -> Result<SchemaKeys, String> {
    match preset {
        "default" => Ok(SchemaKeys::default()),
        "json-ld" => Ok(SchemaKeys::json_ld()),
        other => Err(format!("Unknown key preset \"{other}\" (expected default or json-ld)")),
    }
}

/// Load and parse every schema document at `input_path`.
pub fn load_schemas(input_path: &Path) -> Result<Vec<(String, SchemaDocument)>, String> {
    let files = read_schema_files(input_path)?;

    if files.is_empty() {
        return Err(format!(
            "No schema files (*.schema.json) found at: {}",
            input_path.display()
        ));
    }

    files
        .into_iter()
        .map(|f| {
            let doc = SchemaDocument::from_json_str(&f.content)
                .map_err(|e| format!("{}: invalid JSON: {e}", f.path))?;
            Ok((f.path, doc))
        })
        .collect()
}

/// Pretty-print `value`, or write it to `output_file` and report where.
pub fn emit(value: &serde_json::Value, output_file: Option<&Path>) -> Result<String, String> {
    let json =
        serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization error: {e}"))?;

    if let Some(out_path) = output_file {
        std::fs::write(out_path, &json)
            .map_err(|e| format!("Failed to write {}: {e}", out_path.display()))?;
        return Ok(format!("Written to {}", out_path.display()));
    }

    Ok(json)
}
