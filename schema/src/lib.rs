//! Schema-driven command trees.
//!
//! This crate describes an argtree command tree as serde data and maps
//! parse results back into typed Rust values:
//!
//! - [`CommandSchema`] / [`FieldSchema`] / [`FlagSchema`]: the tree as
//!   YAML or JSON ([`CommandSchema::load`]).
//! - [`CommandSchema::build`]: turns a schema into an
//!   [`argtree_core::Command`] through the public builders.
//! - [`CommandSchema::to_json`] / [`CommandSchema::parse_into`]: flatten a
//!   [`Matches`](argtree_core::Matches) and deserialize it into `T`.
//!
//! # Example
//!
//! ```
//! use argtree_schema::CommandSchema;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize, PartialEq)]
//! #[serde(rename_all = "lowercase")]
//! enum Action {
//!     Add { path: String },
//!     Status {},
//! }
//!
//! #[derive(Debug, Deserialize)]
//! struct Vcs {
//!     verbose: bool,
//!     command: Option<Action>,
//! }
//!
//! let schema = CommandSchema::from_yaml(r#"
//! name: vcs
//! fields:
//!   - { name: verbose, type: bool, flag: { short: v } }
//! subcommands:
//!   - name: add
//!     fields: [{ name: path, type: string }]
//!   - name: status
//! "#).unwrap();
//!
//! let vcs: Vcs = schema.parse_into(["-v", "add", "src/"]).unwrap();
//! assert!(vcs.verbose);
//! assert_eq!(vcs.command, Some(Action::Add { path: "src/".into() }));
//! ```

mod build;
mod error;
mod map;
mod types;

pub use error::{Result, SchemaError};
pub use types::{CommandSchema, DEFAULT_PROPERTY, FieldSchema, FlagSchema};
