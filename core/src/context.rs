//! Command path and missing-value bookkeeping for one parse level.

use tracing::debug;

use crate::{Command, Field, ParseError};

/// Active command path plus the required fields found absent at this level.
///
/// The parser creates one context at the root and [`stack`](Self::stack)s a
/// child for every subcommand it descends into. A child starts with an empty
/// missing list of its own.
///
/// # Examples
///
/// ```
/// use argtree_core::{Command, Context};
///
/// let foo = Command::builder("foo").build().unwrap();
/// let app = Command::builder("app").with_subcommand(foo.clone()).build().unwrap();
///
/// let root = Context::new(&app);
/// let child = root.stack(&foo);
/// assert_eq!(child.names(), vec!["app", "foo"]);
/// assert!(child.command().ptr_eq(&foo));
/// assert!(child.missing().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Context {
    ancestors: Vec<Command>,
    command: Command,
    missing: Vec<Field>,
}

impl Context {
    /// Creates a root context.
    pub fn new(root: &Command) -> Self {
        Self {
            ancestors: Vec::new(),
            command: root.clone(),
            missing: Vec::new(),
        }
    }

    /// Returns a child context with `command` appended to the path.
    pub fn stack(&self, command: &Command) -> Self {
        let mut ancestors = self.ancestors.clone();
        ancestors.push(self.command.clone());
        Self {
            ancestors,
            command: command.clone(),
            missing: Vec::new(),
        }
    }

    /// The command at the end of the path.
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// The root command.
    pub fn root(&self) -> &Command {
        self.ancestors.first().unwrap_or(&self.command)
    }

    /// Iterates the path root-first.
    pub fn path(&self) -> impl Iterator<Item = &Command> {
        self.ancestors.iter().chain(std::iter::once(&self.command))
    }

    /// Names along the path, root-first.
    pub fn names(&self) -> Vec<&str> {
        self.path().map(|c| c.name.as_str()).collect()
    }

    /// Number of subcommands below the root.
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }

    /// Required fields registered as absent so far.
    pub fn missing(&self) -> &[Field] {
        &self.missing
    }

    /// Registers a required field that received no value.
    pub fn register_missing(&mut self, field: Field) {
        debug!(
            command = %self.command.name,
            field = field.name(),
            "required value missing"
        );
        self.missing.push(field);
    }

    /// Fails with [`ParseError::Missing`] if any field was registered.
    ///
    /// The registered fields move into the error; the context is left empty.
    pub fn finalize(&mut self) -> Result<(), ParseError> {
        if self.missing.is_empty() {
            return Ok(());
        }
        let missing = std::mem::take(&mut self.missing);
        Err(ParseError::Missing {
            context: self.clone(),
            missing,
        })
    }
}
