//! Core definition types and parsing engine for command trees.
//!
//! This crate models a command-line interface as a tree and parses token
//! lists against it:
//!
//! - [`Arg`]: a positional argument, consumed in declaration order.
//! - [`Flag`]: a named `-s` / `--long` option or switch, optionally
//!   repeatable.
//! - [`Command`]: a named node owning arguments, flags, and nested
//!   subcommands, assembled through a [`CommandBuilder`].
//! - [`Parser`]: resolves tokens level by level into [`Matches`], with
//!   opt-in builtin help.
//!
//! Values are checked by a [`Validator`] (string, integer, boolean, or a
//! repeated list of one of those) and then by any [`Custom`] predicates, and
//! are returned as typed [`Value`]s. Failures are reported as
//! [`ParseError`]s that carry the [`Context`] they occurred in.
//!
//! # Example
//!
//! ```
//! use argtree_core::*;
//!
//! let add = Command::builder("add")
//!     .with_arg(Arg::new("path"))
//!     .with_flag(Flag::bool("force").with_short('f'))
//!     .build()
//!     .unwrap();
//! let app = Command::builder("vcs")
//!     .with_flag(Flag::int("jobs").with_short('j').with_default(Value::Integer(1)))
//!     .with_subcommand(add)
//!     .build()
//!     .unwrap();
//!
//! let matches = app.parse(["-j", "4", "add", "-f", "src/"]).unwrap();
//! assert_eq!(matches.flag("jobs"), Some(&Value::Integer(4)));
//! let add = matches.subcommand("add").unwrap();
//! assert_eq!(add.arg("path"), Some(&Value::from("src/")));
//! assert_eq!(add.flag("force"), Some(&Value::Boolean(true)));
//!
//! let err = app.parse(["-j", "four"]).unwrap_err();
//! assert_eq!(err.to_string(), r#"jobs = "four" invalid integer"#);
//! ```

mod context;
mod error;
mod matches;
mod parser;
mod types;
mod validate;
mod validator;
mod value;

pub use context::Context;
pub use error::ParseError;
pub use matches::{Invocation, Matches};
pub use parser::{HELP_COMMAND, HELP_FLAG, Parser};
pub use types::*;
pub use validate::DefinitionError;
pub use validator::{Custom, RawValue, Validator};
pub use value::Value;
