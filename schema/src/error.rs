//! Error types for schema loading, building, and mapping.

use argtree_core::{DefinitionError, ParseError};
use thiserror::Error;

/// Errors that can occur while turning a schema into a command tree or a
/// parse result into a typed value.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A field does not declare a `type`.
    #[error("{command}.{field} has no type")]
    MissingType {
        /// Command declaring the field.
        command: String,
        /// Field name.
        field: String,
    },

    /// A field declares a type outside `string | int | bool`, or a list
    /// type on a positional argument.
    #[error("{command}.{field} has invalid type '{kind}'")]
    InvalidType {
        /// Command declaring the field.
        command: String,
        /// Field name.
        field: String,
        /// Declared type.
        kind: String,
    },

    /// A field's `default` does not fit its declared type.
    #[error("{command}.{field} default does not match type '{kind}'")]
    InvalidDefault {
        /// Command declaring the field.
        command: String,
        /// Field name.
        field: String,
        /// Declared type.
        kind: String,
    },

    /// Two fields of one command share a name, so their values would
    /// land on the same key of the mapped object.
    #[error("{command} has duplicate field '{field}'")]
    DuplicateField {
        /// Command declaring the fields.
        command: String,
        /// Conflicting field name.
        field: String,
    },

    /// The subcommand property shares its name with a field.
    #[error("{command} maps subcommands into '{property}', which is also a field")]
    PropertyCollision {
        /// Command declaring the subcommands.
        command: String,
        /// Conflicting property name.
        property: String,
    },

    /// A `pattern` is not a valid regular expression.
    #[error("invalid pattern: {0}")]
    PatternError(#[from] regex::Error),

    /// The built tree violates a naming invariant.
    #[error("invalid definition: {0}")]
    DefinitionError(#[from] DefinitionError),

    /// Tokens did not parse against the built tree.
    #[error(transparent)]
    ParseError(#[from] ParseError),

    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing, serialization, or typed mapping failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Schema file extension is neither YAML nor JSON.
    #[error("unsupported schema format: {0}")]
    UnknownFormat(String),
}

/// Convenience alias for results with [`SchemaError`].
pub type Result<T> = std::result::Result<T, SchemaError>;
