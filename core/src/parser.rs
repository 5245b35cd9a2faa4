//! Token parsing engine.
//!
//! The parser resolves one command level at a time, in a fixed order:
//!
//! 1. **Subcommands**: every token naming a subcommand splits the tokens
//!    after it off into that subcommand's scope, which is resolved
//!    recursively before anything else at this level.
//! 2. **Flags**: exact `-s` / `--long` tokens and, for flags that take a
//!    value, the token right after them.
//! 3. **Positional arguments**: whatever is left, in declaration order.
//!
//! Tokens are matched leftmost-first against the first declared candidate.
//! A matched non-repeatable flag or subcommand drops out of matching for the
//! rest of its level, so a second occurrence is treated as an ordinary token.
//!
//! Missing required values are collected per level and reported together;
//! invalid values and leftover tokens fail immediately.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, trace};

use crate::types::FieldRef;
use crate::{Command, Context, Flag, Invocation, Matches, ParseError, RawValue, Value};

/// Long flag that triggers builtin help.
pub const HELP_FLAG: &str = "--help";
/// Subcommand name that triggers builtin help.
pub const HELP_COMMAND: &str = "help";

/// Parses token lists against a command tree.
///
/// The parser only borrows the tree; the definitions are never modified,
/// so one tree can be parsed any number of times.
///
/// # Examples
///
/// ```
/// use argtree_core::{Arg, Command, Parser, ParseError};
///
/// let foo = Command::builder("foo").with_arg(Arg::new("test")).build().unwrap();
/// let app = Command::builder("app")
///     .with_arg(Arg::new("test"))
///     .with_subcommand(foo)
///     .build()
///     .unwrap();
///
/// let parser = Parser::new(&app);
/// let matches = parser.parse(["hello", "foo", "world"]).unwrap();
/// assert_eq!(matches.arg("test").unwrap().as_str(), Some("hello"));
/// let foo = matches.subcommand("foo").unwrap();
/// assert_eq!(foo.arg("test").unwrap().as_str(), Some("world"));
///
/// // Builtin help is opt-in.
/// let err = parser.with_help(true).parse(["foo", "--help"]).unwrap_err();
/// assert!(matches!(err, ParseError::Help { ref path, .. } if path == &["foo"]));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Parser<'a> {
    command: &'a Command,
    help: bool,
}

impl<'a> Parser<'a> {
    /// Creates a parser for the given root command, builtin help disabled.
    pub fn new(command: &'a Command) -> Self {
        Self {
            command,
            help: false,
        }
    }

    /// Enables or disables builtin help.
    ///
    /// With help enabled, a `--help` token raises [`ParseError::Help`] for
    /// the subcommand path named before it, and when the root has
    /// subcommands a `help` token raises it for the names that follow. A
    /// command that declares its own `--help` flag keeps it for its own
    /// level, and a root that declares a `help` subcommand keeps it.
    pub fn with_help(mut self, enabled: bool) -> Self {
        self.help = enabled;
        self
    }

    /// Parses a token list.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Missing`] when required values are absent at a
    /// level, [`ParseError::Invalid`] when a value fails validation,
    /// [`ParseError::Unexpected`] when tokens are left over, and
    /// [`ParseError::Help`] when builtin help is enabled and requested.
    pub fn parse<I, S>(&self, tokens: I) -> Result<Matches, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        let mut ctx = Context::new(self.command);
        debug!(command = %self.command.name, tokens = tokens.len(), "parsing");

        if self.help {
            split_help(self.command, &tokens, &ctx)?;
        }

        let matches = resolve_level(self.command, &mut tokens, &mut ctx)?;
        ctx.finalize()?;
        Ok(matches)
    }
}

fn split_help(root: &Command, tokens: &[String], ctx: &Context) -> Result<(), ParseError> {
    if let Some(pos) = tokens.iter().position(|t| t == HELP_FLAG) {
        let path = subcommand_path(root, &tokens[..pos]);
        if declares_help_flag(root, &path) {
            trace!(?path, "help flag declared by command");
        } else {
            debug!(?path, "help flag requested");
            return Err(ParseError::Help {
                context: ctx.clone(),
                path,
            });
        }
    }

    if root.subcommands.is_empty() || root.find_subcommand(HELP_COMMAND).is_some() {
        return Ok(());
    }
    if let Some(pos) = tokens.iter().position(|t| t == HELP_COMMAND) {
        let path = tokens[pos + 1..].to_vec();
        debug!(?path, "help subcommand requested");
        return Err(ParseError::Help {
            context: ctx.clone(),
            path,
        });
    }
    Ok(())
}

/// Returns `true` if the command at `path` declares its own `--help` flag.
fn declares_help_flag(root: &Command, path: &[String]) -> bool {
    let mut current = root;
    for name in path {
        match current.find_subcommand(name) {
            Some(sub) => current = sub,
            None => return false,
        }
    }
    current.find_flag(HELP_FLAG).is_some()
}

/// Primary names of the subcommands named by `tokens`, walking down from
/// `root`. Tokens that name nothing at the current depth are skipped.
fn subcommand_path(root: &Command, tokens: &[String]) -> Vec<String> {
    let mut current = root;
    let mut path = Vec::new();
    for token in tokens {
        if let Some(sub) = current.find_subcommand(token) {
            path.push(sub.name.clone());
            current = sub;
        }
    }
    path
}

fn resolve_level(
    command: &Command,
    tokens: &mut Vec<String>,
    ctx: &mut Context,
) -> Result<Matches, ParseError> {
    let commands = split_commands(command, tokens, ctx)?;
    let flags = split_flags(command, tokens, ctx)?;
    let args = split_args(command, tokens, ctx)?;
    Ok(Matches {
        args,
        flags,
        commands,
    })
}

fn split_commands(
    command: &Command,
    tokens: &mut Vec<String>,
    ctx: &Context,
) -> Result<BTreeMap<String, Invocation>, ParseError> {
    let mut candidates: Vec<&Command> = command.subcommands.iter().collect();
    let mut found: Vec<(usize, &Command)> = Vec::new();
    for (idx, token) in tokens.iter().enumerate() {
        let Some(pos) = candidates.iter().position(|sc| sc.answers_to(token)) else {
            continue;
        };
        let sub = candidates[pos];
        debug!(parent = %command.name, command = %sub.name, index = idx, "matched subcommand");
        if !sub.repeatable {
            candidates.remove(pos);
        }
        found.push((idx, sub));
    }

    // Highest index first, so splitting a tail off never shifts a pending match.
    let mut resolved: Vec<(&Command, Matches)> = Vec::with_capacity(found.len());
    for (idx, sub) in found.into_iter().rev() {
        let mut tail = tokens.split_off(idx + 1);
        tokens.truncate(idx);
        let mut child = ctx.stack(sub);
        let matches = resolve_level(sub, &mut tail, &mut child)?;
        child.finalize()?;
        resolved.push((sub, matches));
    }

    let mut grouped: BTreeMap<String, (bool, Vec<Matches>)> = BTreeMap::new();
    for (sub, matches) in resolved.into_iter().rev() {
        grouped
            .entry(sub.name.clone())
            .or_insert_with(|| (sub.repeatable, Vec::new()))
            .1
            .push(matches);
    }

    Ok(grouped
        .into_iter()
        .filter_map(|(name, (repeatable, invocations))| {
            let invocation = if repeatable {
                Invocation::Repeated(invocations)
            } else {
                Invocation::Single(invocations.into_iter().next()?)
            };
            Some((name, invocation))
        })
        .collect())
}

fn split_flags(
    command: &Command,
    tokens: &mut Vec<String>,
    ctx: &mut Context,
) -> Result<BTreeMap<String, Option<Value>>, ParseError> {
    let mut candidates: Vec<&Flag> = command.flags.iter().collect();
    let mut positions: Vec<(usize, &Flag)> = Vec::new();
    for (idx, token) in tokens.iter().enumerate() {
        let Some(pos) = candidates.iter().position(|f| f.matches(token)) else {
            continue;
        };
        let flag = candidates[pos];
        if !flag.repeatable {
            candidates.remove(pos);
        }
        positions.push((idx, flag));
    }

    let flag_indices: HashSet<usize> = positions.iter().map(|(idx, _)| *idx).collect();
    let mut consumed = vec![false; tokens.len()];
    let mut occurrences: HashMap<&str, Vec<Option<String>>> = HashMap::new();
    for (idx, flag) in &positions {
        consumed[*idx] = true;
        let next = idx + 1;
        let value = if flag.requires_value && next < tokens.len() && !flag_indices.contains(&next)
        {
            consumed[next] = true;
            Some(tokens[next].clone())
        } else {
            None
        };
        trace!(flag = %flag.name, index = idx, ?value, "flag occurrence");
        occurrences.entry(flag.name.as_str()).or_default().push(value);
    }

    let remaining: Vec<String> = std::mem::take(tokens)
        .into_iter()
        .zip(consumed)
        .filter_map(|(token, used)| (!used).then_some(token))
        .collect();
    *tokens = remaining;

    let mut parsed = BTreeMap::new();
    for flag in &command.flags {
        let raw = match occurrences.remove(flag.name.as_str()) {
            None => None,
            Some(values) if flag.repeatable => Some(RawValue::Repeated(values)),
            Some(values) => Some(RawValue::Single(values.into_iter().next().flatten())),
        };
        let value = resolve(FieldRef::Flag(flag), raw, ctx)?;
        parsed.insert(flag.name.clone(), value);
    }
    Ok(parsed)
}

fn split_args(
    command: &Command,
    tokens: &mut Vec<String>,
    ctx: &mut Context,
) -> Result<BTreeMap<String, Option<Value>>, ParseError> {
    let mut remaining = std::mem::take(tokens).into_iter();
    let mut parsed = BTreeMap::new();
    for arg in &command.args {
        let raw = remaining.next().map(|token| RawValue::Single(Some(token)));
        let value = resolve(FieldRef::Arg(arg), raw, ctx)?;
        parsed.insert(arg.name.clone(), value);
    }

    if let Some(unexpected) = remaining.next() {
        debug!(command = %command.name, token = %unexpected, "unexpected argument");
        return Err(ParseError::Unexpected {
            context: ctx.clone(),
            value: unexpected,
        });
    }
    Ok(parsed)
}

/// Validates and converts one field's raw value.
///
/// `None` means the field did not occur at all.
fn resolve(
    field: FieldRef<'_>,
    raw: Option<RawValue>,
    ctx: &mut Context,
) -> Result<Option<Value>, ParseError> {
    let Some(raw) = raw else {
        if field.required() {
            ctx.register_missing(field.to_field());
            return Ok(None);
        }
        return Ok(field.default().cloned());
    };

    if field.requires_value() && raw.has_null() {
        ctx.register_missing(field.to_field());
        return Ok(None);
    }

    let validator = field.validator();
    if !validator.validate(&raw) {
        debug!(field = field.name(), %raw, "rejected by type check");
        return Err(ParseError::Invalid {
            context: ctx.clone(),
            field: field.to_field(),
            reason: validator.reason(),
            value: raw,
        });
    }
    if let Some(check) = field.custom().iter().find(|c| !c.check(&raw)) {
        debug!(field = field.name(), %raw, reason = check.reason(), "rejected by custom check");
        return Err(ParseError::Invalid {
            context: ctx.clone(),
            field: field.to_field(),
            reason: check.reason().to_string(),
            value: raw,
        });
    }

    Ok(Some(validator.convert(&raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Arg, Field};

    fn app_with_foo() -> Command {
        let foo = Command::builder("foo")
            .with_alias("f")
            .with_arg(Arg::new("test"))
            .build()
            .unwrap();
        Command::builder("app")
            .with_arg(Arg::new("test"))
            .with_subcommand(foo)
            .build()
            .unwrap()
    }

    #[test]
    fn test_subcommand_path_follows_aliases() {
        let app = app_with_foo();
        let tokens = vec!["x".to_string(), "f".to_string(), "y".to_string()];
        assert_eq!(subcommand_path(&app, &tokens), vec!["foo".to_string()]);
    }

    #[test]
    fn test_help_subcommand_collects_following_tokens() {
        let app = app_with_foo();
        let err = Parser::new(&app)
            .with_help(true)
            .parse(["help", "foo"])
            .unwrap_err();
        match err {
            ParseError::Help { path, context } => {
                assert_eq!(path, vec!["foo".to_string()]);
                assert_eq!(context.names(), vec!["app"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_help_disabled_by_default() {
        let app = Command::builder("app").build().unwrap();
        let err = app.parse(["--help"]).unwrap_err();
        assert!(matches!(err, ParseError::Unexpected { value, .. } if value == "--help"));
    }

    #[test]
    fn test_help_subcommand_needs_subcommands() {
        let app = Command::builder("app").with_arg(Arg::new("topic")).build().unwrap();
        let matches = Parser::new(&app).with_help(true).parse(["help"]).unwrap();
        assert_eq!(matches.arg("topic"), Some(&Value::from("help")));
    }

    #[test]
    fn test_declared_help_flag_wins_over_builtin() {
        let app = Command::builder("app")
            .with_flag(Flag::bool("help"))
            .build()
            .unwrap();
        let matches = Parser::new(&app).with_help(true).parse(["--help"]).unwrap();
        assert_eq!(matches.flag("help"), Some(&Value::Boolean(true)));
    }

    #[test]
    fn test_flag_value_skips_adjacent_flag() {
        let app = Command::builder("app")
            .with_flag(Flag::new("name"))
            .with_flag(Flag::bool("force"))
            .build()
            .unwrap();
        let err = app.parse(["--name", "--force"]).unwrap_err();
        match err {
            ParseError::Missing { missing, .. } => {
                assert_eq!(missing.len(), 1);
                assert!(matches!(&missing[0], Field::Flag(f) if f.name == "name"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_batched_before_unexpected_is_not_reported() {
        let app = Command::builder("app")
            .with_flag(Flag::new("mode").required(true))
            .build()
            .unwrap();
        let err = app.parse(["stray"]).unwrap_err();
        assert!(matches!(err, ParseError::Unexpected { value, .. } if value == "stray"));
    }
}
