//! Parse results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Value;

/// Values resolved at one command level.
///
/// Every declared argument and flag has an entry; `None` marks an optional
/// field with no value and no default. Only subcommands that were actually
/// invoked appear in `commands`.
///
/// # Examples
///
/// ```
/// use argtree_core::{Arg, Command, Flag, Value};
///
/// let app = Command::builder("app")
///     .with_arg(Arg::new("test"))
///     .with_flag(Flag::new("name"))
///     .build()
///     .unwrap();
///
/// let matches = app.parse(["hello"]).unwrap();
/// assert_eq!(matches.arg("test"), Some(&Value::from("hello")));
/// assert_eq!(matches.flag("name"), None);
/// assert!(matches.flags.contains_key("name"));
///
/// let json = serde_json::to_value(&matches).unwrap();
/// assert_eq!(json["args"]["test"], "hello");
/// assert!(json["flags"]["name"].is_null());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Matches {
    /// Positional argument values by name.
    pub args: BTreeMap<String, Option<Value>>,
    /// Flag values by name.
    pub flags: BTreeMap<String, Option<Value>>,
    /// Invoked subcommands by primary name.
    pub commands: BTreeMap<String, Invocation>,
}

/// Result of invoking one subcommand.
///
/// Repeatable subcommands always record a list of invocations, in
/// command-line order; other subcommands record a single result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Invocation {
    /// A non-repeatable subcommand.
    Single(Matches),
    /// Every invocation of a repeatable subcommand.
    Repeated(Vec<Matches>),
}

impl Invocation {
    /// All invocations as a slice.
    pub fn all(&self) -> &[Matches] {
        match self {
            Self::Single(matches) => std::slice::from_ref(matches),
            Self::Repeated(list) => list,
        }
    }

    /// The first (leftmost) invocation.
    pub fn first(&self) -> Option<&Matches> {
        self.all().first()
    }
}

impl Matches {
    /// Value of a positional argument, if it resolved to one.
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name).and_then(Option::as_ref)
    }

    /// Value of a flag, if it resolved to one.
    pub fn flag(&self, name: &str) -> Option<&Value> {
        self.flags.get(name).and_then(Option::as_ref)
    }

    /// Result of a subcommand; the first invocation for repeatable ones.
    pub fn subcommand(&self, name: &str) -> Option<&Matches> {
        self.commands.get(name).and_then(Invocation::first)
    }

    /// Every invocation of a subcommand, empty if it was not invoked.
    pub fn invocations(&self, name: &str) -> &[Matches] {
        self.commands
            .get(name)
            .map(Invocation::all)
            .unwrap_or_default()
    }

    /// Name of the first invoked subcommand, in name order.
    pub fn subcommand_name(&self) -> Option<&str> {
        self.commands.keys().next().map(String::as_str)
    }
}
