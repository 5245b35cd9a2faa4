//! Serializable description of a command tree.
//!
//! A schema is plain data: it can be written by hand in YAML or JSON, or
//! assembled in code with the `with_*` builders, and is turned into a
//! [`Command`](argtree_core::Command) by [`CommandSchema::build`].
//!
//! # Example YAML
//!
//! ```yaml
//! name: vcs
//! about: Tiny version control
//! fields:
//!   - name: jobs
//!     type: int
//!     default: 1
//!     flag: { short: j }
//! subcommands:
//!   - name: add
//!     aliases: [a]
//!     fields:
//!       - name: path
//!         type: string
//! ```

use std::io::BufReader;
use std::path::Path;

use argtree_core::Value;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SchemaError};

/// Property that invoked subcommands are mapped into by default.
pub const DEFAULT_PROPERTY: &str = "command";

fn default_property() -> String {
    DEFAULT_PROPERTY.to_string()
}

/// Schema for one command level.
///
/// # Examples
///
/// ```
/// use argtree_schema::{CommandSchema, FieldSchema, FlagSchema};
///
/// let schema = CommandSchema::new("greet")
///     .with_about("Say hello")
///     .with_field(FieldSchema::new("name", "string"))
///     .with_field(FieldSchema::new("loud", "bool").with_flag(FlagSchema::short('l')));
///
/// assert_eq!(schema.fields.len(), 2);
/// assert_eq!(schema.property, "command");
///
/// let yaml = serde_yaml::to_string(&schema).unwrap();
/// let back = CommandSchema::from_yaml(&yaml).unwrap();
/// assert_eq!(back, schema);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSchema {
    /// Command name.
    pub name: String,
    /// Usage description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub about: String,
    /// Version string; the engine default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Authors.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    /// Alternative names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Whether the command may be invoked more than once.
    #[serde(default)]
    pub repeatable: bool,
    /// Arguments and flags, in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
    /// Nested subcommands.
    #[serde(default)]
    pub subcommands: Vec<CommandSchema>,
    /// Property that invoked subcommands are mapped into.
    #[serde(default = "default_property")]
    pub property: String,
}

/// Schema for an argument or flag.
///
/// A field is a flag when it has a [`flag`](Self::flag) attribute and a
/// positional argument otherwise. It is required unless it is marked
/// `optional` or has a `default`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Field name, also its key in the result.
    pub name: String,
    /// `string`, `int`, `bool`, or a list form such as `string[]`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Usage description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub about: String,
    /// Whether an absent value is allowed.
    #[serde(default)]
    pub optional: bool,
    /// Value used when the field is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Flag identifiers; present for flags only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<FlagSchema>,
    /// Regular expression every supplied value must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Rejection reason reported when `pattern` does not match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Flag identifiers of a [`FieldSchema`].
///
/// The long identifier defaults to the field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagSchema {
    /// Short identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    /// Long identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
}

impl FlagSchema {
    /// Flag reachable as `-{short}` and by its field name.
    pub fn short(short: char) -> Self {
        Self {
            short: Some(short),
            long: None,
        }
    }

    /// Flag reachable as `--{long}`.
    pub fn long(long: impl Into<String>) -> Self {
        Self {
            short: None,
            long: Some(long.into()),
        }
    }
}

impl FieldSchema {
    /// Creates a required field of the given type.
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: Some(kind.into()),
            about: String::new(),
            optional: false,
            default: None,
            flag: None,
            pattern: None,
            reason: None,
        }
    }

    /// Adds a description.
    pub fn with_about(mut self, about: impl Into<String>) -> Self {
        self.about = about.into();
        self
    }

    /// Makes the field a flag.
    pub fn with_flag(mut self, flag: FlagSchema) -> Self {
        self.flag = Some(flag);
        self
    }

    /// Allows the field to be absent.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Sets the default value.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Requires every value to match `pattern`, rejecting with `reason`.
    pub fn with_pattern(mut self, pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self.reason = Some(reason.into());
        self
    }

    /// Whether this field is a flag.
    pub fn is_flag(&self) -> bool {
        self.flag.is_some()
    }
}

impl CommandSchema {
    /// Creates an empty schema for a command.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: String::new(),
            version: None,
            authors: Vec::new(),
            aliases: Vec::new(),
            repeatable: false,
            fields: Vec::new(),
            subcommands: Vec::new(),
            property: default_property(),
        }
    }

    /// Adds a description.
    pub fn with_about(mut self, about: impl Into<String>) -> Self {
        self.about = about.into();
        self
    }

    /// Adds an alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Adds a field.
    pub fn with_field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a nested subcommand.
    pub fn with_subcommand(mut self, sub: CommandSchema) -> Self {
        self.subcommands.push(sub);
        self
    }

    /// Sets the property that invoked subcommands are mapped into.
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = property.into();
        self
    }

    /// Finds a direct subcommand schema by name.
    pub fn find_subcommand(&self, name: &str) -> Option<&CommandSchema> {
        self.subcommands.iter().find(|s| s.name == name)
    }

    /// Parses a schema from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::YamlError`] if parsing fails.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses a schema from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::JsonError`] if parsing fails.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a schema file, choosing the format by extension
    /// (`.yaml`, `.yml`, or `.json`).
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownFormat`] for other extensions,
    /// [`SchemaError::IoError`] if the file cannot be read, or a parse error
    /// of the chosen format.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let schema: Self = match ext.as_str() {
            "yaml" | "yml" => {
                let reader = BufReader::new(std::fs::File::open(path)?);
                serde_yaml::from_reader(reader)?
            }
            "json" => {
                let reader = BufReader::new(std::fs::File::open(path)?);
                serde_json::from_reader(reader)?
            }
            _ => return Err(SchemaError::UnknownFormat(path.display().to_string())),
        };
        debug!(path = %path.display(), command = %schema.name, "loaded schema");
        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_yaml_fills_defaults() {
        let schema = CommandSchema::from_yaml("name: app").unwrap();
        assert_eq!(schema, CommandSchema::new("app"));
    }

    #[test]
    fn test_field_type_key_is_renamed() {
        let schema = CommandSchema::from_json(
            r#"{"name": "app", "fields": [{"name": "n", "type": "int", "default": 3}]}"#,
        )
        .unwrap();
        let field = &schema.fields[0];
        assert_eq!(field.kind.as_deref(), Some("int"));
        assert_eq!(field.default, Some(Value::Integer(3)));
        assert!(!field.is_flag());
    }

    #[test]
    fn test_flag_attribute() {
        let schema = CommandSchema::from_yaml(
            "name: app\nfields:\n  - name: out\n    type: string\n    flag: { short: o, long: output }\n",
        )
        .unwrap();
        assert_eq!(
            schema.fields[0].flag,
            Some(FlagSchema {
                short: Some('o'),
                long: Some("output".to_string()),
            })
        );
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.toml");
        std::fs::write(&path, "name = 'app'").unwrap();
        let err = CommandSchema::load(&path).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownFormat(_)));
    }

    #[test]
    fn test_load_json_and_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("app.json");
        std::fs::write(&json, r#"{"name": "app", "about": "from json"}"#).unwrap();
        let yaml = dir.path().join("app.YML");
        std::fs::write(&yaml, "name: app\nabout: from yaml\n").unwrap();

        assert_eq!(CommandSchema::load(&json).unwrap().about, "from json");
        assert_eq!(CommandSchema::load(&yaml).unwrap().about, "from yaml");
    }
}
