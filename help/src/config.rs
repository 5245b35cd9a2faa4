//! Rendering configuration.
//!
//! # Example YAML
//!
//! ```yaml
//! color: never
//! indent: "    "
//! newline: "\n"
//! builtin: true
//! ```
//!
//! Every key is optional; missing keys take the values of
//! [`HelpConfig::default`].

use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::ColorChoice;

/// Errors loading a [`HelpConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Settings for a [`Help`](crate::Help) renderer.
///
/// # Examples
///
/// ```
/// use argtree_help::{ColorChoice, HelpConfig};
///
/// let config: HelpConfig = serde_yaml::from_str("color: never").unwrap();
/// assert_eq!(config.color, ColorChoice::Never);
/// assert_eq!(config.indent, "  ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelpConfig {
    /// When to emit ANSI escapes.
    pub color: ColorChoice,
    /// Indent of list entries.
    pub indent: String,
    /// Line terminator.
    pub newline: String,
    /// Whether to list the builtin `--help` flag and `help` subcommand.
    pub builtin: bool,
}

impl Default for HelpConfig {
    fn default() -> Self {
        Self {
            color: ColorChoice::Auto,
            indent: "  ".to_string(),
            newline: "\n".to_string(),
            builtin: false,
        }
    }
}

impl HelpConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IoError`] if the file cannot be read, or
    /// [`ConfigError::YamlError`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        debug!(path = %path.display(), color = ?config.color, "loaded help config");
        Ok(config)
    }
}
