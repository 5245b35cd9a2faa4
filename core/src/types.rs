//! Definition types for command trees.
//!
//! This module defines the declarative model a parser runs against:
//! positional [`Arg`]s, named [`Flag`]s, and [`Command`]s that own both plus
//! nested subcommands. Arguments and flags are configured with consuming
//! `with_*` builder methods; commands are assembled through a
//! [`CommandBuilder`] whose [`build`](CommandBuilder::build) step checks the
//! naming invariants and seals the definition.
//!
//! A built [`Command`] is immutable and cheap to clone. The same tree can be
//! parsed any number of times.

use std::ops::Deref;
use std::sync::Arc;

use crate::validate::{DefinitionError, check_command};
use crate::{Custom, Matches, ParseError, Parser, RawValue, Validator, Value};

/// Version assigned to commands that do not declare one.
pub const DEFAULT_VERSION: &str = "0.1.0";

/// A positional argument.
///
/// Arguments consume tokens in declaration order. An argument is required
/// unless it has a default or is explicitly marked optional.
///
/// # Examples
///
/// ```
/// use argtree_core::{Arg, Validator, Value};
///
/// let name = Arg::new("name").with_about("Who to greet");
/// assert!(name.required);
///
/// let count = Arg::int("count").with_default(Value::Integer(1));
/// assert!(!count.required);
/// assert_eq!(count.validator, Validator::Integer);
/// ```
#[derive(Debug, Clone)]
pub struct Arg {
    /// Name of the argument, also its key in the result.
    pub name: String,
    /// Usage description.
    pub about: String,
    /// Whether a missing value is an error.
    pub required: bool,
    /// Value used when the argument is absent.
    pub default: Option<Value>,
    /// Built-in type check and conversion.
    pub validator: Validator,
    /// Additional checks run after the built-in validator.
    pub custom: Vec<Custom>,
}

impl Arg {
    /// Creates a required argument with the given validator.
    pub fn typed(name: impl Into<String>, validator: Validator) -> Self {
        Self {
            name: name.into(),
            about: String::new(),
            required: true,
            default: None,
            validator,
            custom: Vec::new(),
        }
    }

    /// Creates a required string argument.
    pub fn new(name: impl Into<String>) -> Self {
        Self::typed(name, Validator::String)
    }

    /// Creates a required integer argument.
    pub fn int(name: impl Into<String>) -> Self {
        Self::typed(name, Validator::Integer)
    }

    /// Creates a required boolean argument.
    pub fn bool(name: impl Into<String>) -> Self {
        Self::typed(name, Validator::Boolean)
    }

    /// Adds a description.
    pub fn with_about(mut self, about: impl Into<String>) -> Self {
        self.about = about.into();
        self
    }

    /// Sets the default value; the argument becomes optional.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self.required = false;
        self
    }

    /// Overrides whether the argument is required.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Appends a custom check.
    pub fn with_check<F>(mut self, predicate: F, reason: impl Into<String>) -> Self
    where
        F: Fn(&RawValue) -> bool + Send + Sync + 'static,
    {
        self.custom.push(Custom::new(predicate, reason));
        self
    }
}

/// A named flag (`-s` / `--long`).
///
/// Flags are position independent. A flag that requires a value consumes the
/// token that follows it; a switch (see [`Flag::bool`]) is satisfied by its
/// presence alone.
///
/// # Examples
///
/// ```
/// use argtree_core::Flag;
///
/// let output = Flag::new("output").with_short('o');
/// assert_eq!(output.long, "output");
/// assert!(output.matches("-o"));
/// assert!(output.matches("--output"));
/// assert!(!output.matches("output"));
///
/// let verbose = Flag::bool("verbose");
/// assert!(!verbose.requires_value);
/// ```
#[derive(Debug, Clone)]
pub struct Flag {
    /// Name of the flag, also its key in the result.
    pub name: String,
    /// Usage description.
    pub about: String,
    /// Short identifier, matched as `-{short}`.
    pub short: Option<char>,
    /// Long identifier, matched as `--{long}`.
    pub long: String,
    /// Whether an absent flag is an error.
    pub required: bool,
    /// Value used when the flag is absent.
    pub default: Option<Value>,
    /// Whether the flag consumes the following token.
    pub requires_value: bool,
    /// Whether the flag may occur more than once.
    pub repeatable: bool,
    /// Built-in type check and conversion of a single occurrence.
    pub validator: Validator,
    /// Additional checks run after the built-in validator.
    pub custom: Vec<Custom>,
}

impl Flag {
    /// Creates an optional flag taking a value of the given type.
    pub fn typed(name: impl Into<String>, validator: Validator) -> Self {
        let name = name.into();
        Self {
            long: name.clone(),
            name,
            about: String::new(),
            short: None,
            required: false,
            default: None,
            requires_value: true,
            repeatable: false,
            validator,
            custom: Vec::new(),
        }
    }

    /// Creates an optional string flag.
    pub fn new(name: impl Into<String>) -> Self {
        Self::typed(name, Validator::String)
    }

    /// Creates an optional integer flag.
    pub fn int(name: impl Into<String>) -> Self {
        Self::typed(name, Validator::Integer)
    }

    /// Creates a boolean switch defaulting to `false`.
    pub fn bool(name: impl Into<String>) -> Self {
        let mut flag = Self::typed(name, Validator::Boolean);
        flag.requires_value = false;
        flag.default = Some(Value::Boolean(false));
        flag
    }

    /// Adds a description.
    pub fn with_about(mut self, about: impl Into<String>) -> Self {
        self.about = about.into();
        self
    }

    /// Sets the short identifier.
    pub fn with_short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Replaces the long identifier (defaults to the name).
    pub fn with_long(mut self, long: impl Into<String>) -> Self {
        self.long = long.into();
        self
    }

    /// Sets the default value.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Sets whether the flag must be given.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets whether the flag consumes the following token.
    pub fn requires_value(mut self, requires_value: bool) -> Self {
        self.requires_value = requires_value;
        self
    }

    /// Allows the flag to occur more than once, collecting a list.
    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    /// Appends a custom check.
    pub fn with_check<F>(mut self, predicate: F, reason: impl Into<String>) -> Self
    where
        F: Fn(&RawValue) -> bool + Send + Sync + 'static,
    {
        self.custom.push(Custom::new(predicate, reason));
        self
    }

    /// Checks if a token is exactly `-{short}` or `--{long}`.
    pub fn matches(&self, token: &str) -> bool {
        if let Some(long) = token.strip_prefix("--") {
            return long == self.long;
        }
        match (token.strip_prefix('-'), self.short) {
            (Some(rest), Some(short)) => {
                let mut chars = rest.chars();
                chars.next() == Some(short) && chars.next().is_none()
            }
            _ => false,
        }
    }

    /// Returns the command-line identifiers, long form first.
    pub fn identifiers(&self) -> Vec<String> {
        let mut ids = vec![format!("--{}", self.long)];
        if let Some(short) = self.short {
            ids.push(format!("-{short}"));
        }
        ids
    }
}

/// An argument or flag, as reported in errors.
#[derive(Debug, Clone)]
pub enum Field {
    /// A positional argument.
    Arg(Arg),
    /// A flag.
    Flag(Flag),
}

impl Field {
    /// Name of the field.
    pub fn name(&self) -> &str {
        match self {
            Self::Arg(arg) => &arg.name,
            Self::Flag(flag) => &flag.name,
        }
    }

    /// Short label: the argument name, or `--long` for a flag.
    pub fn label(&self) -> String {
        match self {
            Self::Arg(arg) => arg.name.clone(),
            Self::Flag(flag) => format!("--{}", flag.long),
        }
    }
}

/// Borrowed view over an argument or flag during resolution.
#[derive(Debug, Clone, Copy)]
pub(crate) enum FieldRef<'a> {
    Arg(&'a Arg),
    Flag(&'a Flag),
}

impl FieldRef<'_> {
    pub(crate) fn name(&self) -> &str {
        match self {
            Self::Arg(arg) => &arg.name,
            Self::Flag(flag) => &flag.name,
        }
    }

    pub(crate) fn required(&self) -> bool {
        match self {
            Self::Arg(arg) => arg.required,
            Self::Flag(flag) => flag.required,
        }
    }

    pub(crate) fn default(&self) -> Option<&Value> {
        match self {
            Self::Arg(arg) => arg.default.as_ref(),
            Self::Flag(flag) => flag.default.as_ref(),
        }
    }

    pub(crate) fn requires_value(&self) -> bool {
        match self {
            Self::Arg(_) => true,
            Self::Flag(flag) => flag.requires_value,
        }
    }

    /// Validator for the resolved raw value; repeatable flags get a
    /// [`Validator::Repeated`] wrapper.
    pub(crate) fn validator(&self) -> Validator {
        match self {
            Self::Arg(arg) => arg.validator.clone(),
            Self::Flag(flag) if flag.repeatable => flag.validator.clone().repeated(),
            Self::Flag(flag) => flag.validator.clone(),
        }
    }

    pub(crate) fn custom(&self) -> &[Custom] {
        match self {
            Self::Arg(arg) => &arg.custom,
            Self::Flag(flag) => &flag.custom,
        }
    }

    pub(crate) fn to_field(self) -> Field {
        match self {
            Self::Arg(arg) => Field::Arg(arg.clone()),
            Self::Flag(flag) => Field::Flag(flag.clone()),
        }
    }
}

/// Sealed command definition, reached through [`Command`].
#[derive(Debug)]
pub struct CommandDef {
    /// Primary name.
    pub name: String,
    /// Alternative names a subcommand answers to.
    pub aliases: Vec<String>,
    /// Usage description.
    pub about: String,
    /// Version string.
    pub version: String,
    /// Authors.
    pub authors: Vec<String>,
    /// Positional arguments, in consumption order.
    pub args: Vec<Arg>,
    /// Flags.
    pub flags: Vec<Flag>,
    /// Nested subcommands.
    pub subcommands: Vec<Command>,
    /// Whether this command may be invoked more than once in one parse.
    pub repeatable: bool,
}

/// A built, immutable command definition.
///
/// `Command` is a shared handle; cloning it does not copy the tree. Fields
/// are read through [`Deref`] to [`CommandDef`].
///
/// # Examples
///
/// ```
/// use argtree_core::{Arg, Command, Flag};
///
/// let app = Command::builder("app")
///     .with_about("Example application")
///     .with_flag(Flag::bool("verbose").with_short('v'))
///     .with_subcommand(
///         Command::builder("run")
///             .with_alias("r")
///             .with_arg(Arg::new("script"))
///             .build()
///             .unwrap(),
///     )
///     .build()
///     .unwrap();
///
/// assert_eq!(app.name, "app");
/// assert!(app.find_subcommand("r").is_some());
///
/// let matches = app.parse(["-v", "r", "deploy.sh"]).unwrap();
/// assert_eq!(matches.flag("verbose").and_then(|v| v.as_bool()), Some(true));
/// let run = matches.subcommand("run").unwrap();
/// assert_eq!(run.arg("script").and_then(|v| v.as_str()), Some("deploy.sh"));
/// ```
#[derive(Debug, Clone)]
pub struct Command {
    def: Arc<CommandDef>,
}

impl Deref for Command {
    type Target = CommandDef;

    fn deref(&self) -> &CommandDef {
        &self.def
    }
}

impl Command {
    /// Starts building a command with the given name.
    pub fn builder(name: impl Into<String>) -> CommandBuilder {
        CommandBuilder::new(name)
    }

    /// Iterates the primary name followed by the aliases.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Checks if a token is this command's name or one of its aliases.
    pub fn answers_to(&self, token: &str) -> bool {
        self.name == token || self.aliases.iter().any(|a| a == token)
    }

    /// Finds a direct subcommand by name or alias.
    pub fn find_subcommand(&self, token: &str) -> Option<&Command> {
        self.subcommands.iter().find(|sc| sc.answers_to(token))
    }

    /// Finds a flag by `-{short}` or `--{long}` identifier.
    pub fn find_flag(&self, token: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.matches(token))
    }

    /// Returns `true` if both handles point at the same definition.
    pub fn ptr_eq(&self, other: &Command) -> bool {
        Arc::ptr_eq(&self.def, &other.def)
    }

    /// Parses tokens against this command with builtin help disabled.
    ///
    /// Shorthand for `Parser::new(self).parse(tokens)`.
    pub fn parse<I, S>(&self, tokens: I) -> Result<Matches, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Parser::new(self).parse(tokens)
    }
}

/// Accumulates a command definition until [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    name: String,
    aliases: Vec<String>,
    about: String,
    version: String,
    authors: Vec<String>,
    args: Vec<Arg>,
    flags: Vec<Flag>,
    subcommands: Vec<Command>,
    repeatable: bool,
}

impl CommandBuilder {
    /// Creates a builder for a command with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            about: String::new(),
            version: DEFAULT_VERSION.to_string(),
            authors: Vec::new(),
            args: Vec::new(),
            flags: Vec::new(),
            subcommands: Vec::new(),
            repeatable: false,
        }
    }

    /// Renames the command.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a description.
    pub fn with_about(mut self, about: impl Into<String>) -> Self {
        self.about = about.into();
        self
    }

    /// Sets the version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Adds an author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.authors.push(author.into());
        self
    }

    /// Adds an alias; repeated aliases and the primary name are ignored.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        if alias != self.name && !self.aliases.contains(&alias) {
            self.aliases.push(alias);
        }
        self
    }

    /// Adds a positional argument.
    pub fn with_arg(mut self, arg: Arg) -> Self {
        self.args.push(arg);
        self
    }

    /// Adds a flag.
    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    /// Adds a nested subcommand.
    pub fn with_subcommand(mut self, sub: Command) -> Self {
        self.subcommands.push(sub);
        self
    }

    /// Sets whether the command may be invoked more than once.
    pub fn repeatable(mut self, repeatable: bool) -> Self {
        self.repeatable = repeatable;
        self
    }

    /// Checks the naming invariants and seals the definition.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] for an empty name, duplicate argument
    /// names, duplicate flag identifiers, or subcommand names/aliases that
    /// collide with each other or with this command's own names.
    pub fn build(self) -> Result<Command, DefinitionError> {
        let def = CommandDef {
            name: self.name,
            aliases: self.aliases,
            about: self.about,
            version: self.version,
            authors: self.authors,
            args: self.args,
            flags: self.flags,
            subcommands: self.subcommands,
            repeatable: self.repeatable,
        };
        check_command(&def)?;
        Ok(Command { def: Arc::new(def) })
    }
}
