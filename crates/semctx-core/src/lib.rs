pub mod annotate;
pub mod catalogs;
pub mod config;
pub mod context;
pub mod declare;
pub mod error;
pub mod generate;
pub mod normalize;
pub mod options;
pub mod schema;
pub mod types;

pub use annotate::annotate;
pub use config::{compose, deep_merge, ResolvedConfig};
pub use context::{compile, compile_document, Compactor, ContextDocument, ContextEntry};
pub use declare::{inject_type_identifier, SchemaPatch, TypeBuilder, TypeRegistry};
pub use error::{MalformedSchemaError, OptionsError, RegistryError};
pub use generate::generate_schema;
pub use normalize::{normalize, to_json, Choice, ClosedChoice, FieldValue, NumericArray, OpaqueValue};
pub use options::{ContextOptions, Prefix};
pub use schema::{SchemaDocument, SchemaKeys, SchemaNode};
pub use types::*;
