use std::sync::LazyLock;

use regex::Regex;

/// Base vocabulary every published context declares through `@vocab`.
pub const DEFAULT_VOCAB: &str = "https://example.com/";

/// Common-workflow namespace. Field and type identifiers in the domain
/// models are minted under this IRI.
pub const BASE_PREFIX: &str = "https://example.com/commonWorkflows";

/// Built-in prefix table, in declaration order. `cw` is itself declared
/// through `ex`, so it is resolved before compaction.
pub const DEFAULT_PREFIXES: &[(&str, &str)] = &[
    ("ex", "https://example.com/"),
    ("cw", "ex:commonWorkflows/"),
];

/// JSON-LD keywords emitted in context documents.
pub const KW_VOCAB: &str = "@vocab";
pub const KW_ID: &str = "@id";
pub const KW_CONTAINER: &str = "@container";
pub const KW_CONTEXT: &str = "@context";

/// Keywords whose values are instance data, not schema. Markers inside
/// them are ordinary field values.
pub const VALUE_KEYWORDS: &[&str] = &["default", "const", "enum", "examples"];

/// Key under which a declared type's own identifier is written into its
/// generated schema node.
pub const IDENTIFIER_KEY: &str = "identifier";

/// Valid prefix names: letter first, then letters, digits, `_`, `-` or `.`.
pub static RE_PREFIX_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_.\-]*$").unwrap());
