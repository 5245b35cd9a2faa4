//! Text rendering for argtree command trees.
//!
//! - [`Help`]: usage snippets, help pages, and messages for every
//!   [`ParseError`](argtree_core::ParseError) kind, including resolving a
//!   builtin help request to the right subcommand page.
//! - [`Colors`]: styling seam, with [`Ansi`] (through `colored`) and
//!   [`Plain`] implementations chosen by a [`ColorChoice`].
//! - [`HelpConfig`]: renderer settings, loadable from YAML.
//!
//! # Example
//!
//! ```
//! use argtree_core::{Arg, Command, Parser};
//! use argtree_help::Help;
//!
//! let run = Command::builder("run").with_about("Run a script").build().unwrap();
//! let app = Command::builder("app")
//!     .with_arg(Arg::int("jobs"))
//!     .with_subcommand(run)
//!     .build()
//!     .unwrap();
//!
//! let help = Help::plain().with_builtin(true);
//! let err = Parser::new(&app).with_help(true).parse(["help", "run"]).unwrap_err();
//! assert!(help.render(&err).starts_with("Run a script\n\nUsage: app run [OPTIONS]"));
//!
//! let err = app.parse(["many"]).unwrap_err();
//! assert_eq!(
//!     help.render(&err),
//!     "error: invalid value 'many' for <JOBS>: invalid integer\n\n\
//!      For more information, try '--help'.\n",
//! );
//! ```

mod colors;
mod config;
mod render;

pub use colors::{Ansi, ColorChoice, Colors, Plain};
pub use config::{ConfigError, HelpConfig};
pub use render::Help;
