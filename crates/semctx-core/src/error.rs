use thiserror::Error;

/// A schema document that cannot be compiled into a context.
///
/// Raised before any marker is extracted, so a failed compile leaves the
/// document exactly as it was handed in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedSchemaError {
    #[error("schema node at \"{path}\" must be an object")]
    NotAnObject { path: String },

    #[error("schema document has no \"{section}\" section")]
    MissingSection { section: String },

    #[error("property \"{property}\" references type \"{type_name}\" which is not defined")]
    UnresolvedReference { property: String, type_name: String },
}

/// Errors raised while registering declared types or generating schemas from them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("type \"{name}\" is already registered")]
    DuplicateType { name: String },

    #[error("type \"{type_name}\" referenced by \"{referenced_by}\" is not registered")]
    UnknownType {
        type_name: String,
        referenced_by: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("invalid prefix name \"{name}\"")]
    InvalidPrefix { name: String },

    #[error("prefix \"{name}\" is declared more than once")]
    DuplicatePrefix { name: String },
}
