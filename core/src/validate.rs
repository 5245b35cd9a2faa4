//! Definition validation.
//!
//! Checks the naming invariants of a command definition when it is built,
//! catching duplicate argument names, flag identifiers, and subcommand
//! names before a parse can trip over them. A failure here is a mistake in
//! the definition, not in user input.
//!
//! # Examples
//!
//! ```
//! use argtree_core::*;
//!
//! let ok = Command::builder("app").with_flag(Flag::new("verbose")).build();
//! assert!(ok.is_ok());
//!
//! // Invalid: two flags answer to `-v`
//! let bad = Command::builder("app")
//!     .with_flag(Flag::new("verbose").with_short('v'))
//!     .with_flag(Flag::new("version").with_short('v'))
//!     .build();
//! assert!(matches!(bad, Err(DefinitionError::DuplicateFlag { .. })));
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{Arg, Command, CommandDef, Flag};

/// Definition errors.
///
/// Each variant describes a naming conflict found while building a
/// [`Command`]. The `Display` impl provides a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// An argument or flag has an empty name.
    #[error("{command} has a field with an empty name")]
    EmptyFieldName {
        /// Command declaring the field.
        command: String,
    },
    /// A flag has an empty long identifier.
    #[error("{command} has flag '{flag}' with an empty long form")]
    EmptyLongFlag {
        /// Command declaring the flag.
        command: String,
        /// Name of the flag.
        flag: String,
    },
    /// A flag's short identifier cannot form a `-s` token.
    #[error("{command} has flag '{flag}' with invalid short form '{short}'")]
    InvalidShort {
        /// Command declaring the flag.
        command: String,
        /// Name of the flag.
        flag: String,
        /// Rejected short identifier.
        short: char,
    },
    /// Two arguments share a name.
    #[error("{command} has duplicate argument '{name}'")]
    DuplicateArg {
        /// Command declaring the arguments.
        command: String,
        /// Conflicting name.
        name: String,
    },
    /// Two flags share a name or a `-s`/`--long` identifier.
    #[error("{command} has duplicate flag '{flag}'")]
    DuplicateFlag {
        /// Command declaring the flags.
        command: String,
        /// Conflicting name or identifier.
        flag: String,
    },
    /// Two subcommands, or a subcommand and its parent, share a name or alias.
    #[error("{command} has duplicate subcommand '{name}'")]
    DuplicateSubcommand {
        /// Parent command.
        command: String,
        /// Conflicting name or alias.
        name: String,
    },
}

/// Validates a command definition before it is sealed.
pub(crate) fn check_command(def: &CommandDef) -> Result<(), DefinitionError> {
    if def.name.trim().is_empty() {
        return Err(DefinitionError::EmptyCommandName);
    }
    check_args(&def.name, &def.args)?;
    check_flags(&def.name, &def.flags)?;
    check_subcommands(def, &def.subcommands)
}

fn check_args(command: &str, args: &[Arg]) -> Result<(), DefinitionError> {
    let mut seen: HashSet<&str> = HashSet::new();

    for arg in args {
        if arg.name.trim().is_empty() {
            return Err(DefinitionError::EmptyFieldName {
                command: command.to_string(),
            });
        }
        if !seen.insert(arg.name.as_str()) {
            return Err(DefinitionError::DuplicateArg {
                command: command.to_string(),
                name: arg.name.clone(),
            });
        }
    }

    Ok(())
}

fn check_flags(command: &str, flags: &[Flag]) -> Result<(), DefinitionError> {
    let mut names: HashSet<&str> = HashSet::new();
    let mut seen: HashSet<String> = HashSet::new();

    for flag in flags {
        if flag.name.trim().is_empty() {
            return Err(DefinitionError::EmptyFieldName {
                command: command.to_string(),
            });
        }
        if flag.long.trim().is_empty() {
            return Err(DefinitionError::EmptyLongFlag {
                command: command.to_string(),
                flag: flag.name.clone(),
            });
        }
        if let Some(short) = flag.short.filter(|c| *c == '-' || c.is_whitespace()) {
            return Err(DefinitionError::InvalidShort {
                command: command.to_string(),
                flag: flag.name.clone(),
                short,
            });
        }
        if !names.insert(flag.name.as_str()) {
            return Err(DefinitionError::DuplicateFlag {
                command: command.to_string(),
                flag: flag.name.clone(),
            });
        }
        for id in flag.identifiers() {
            if seen.contains(&id) {
                return Err(DefinitionError::DuplicateFlag {
                    command: command.to_string(),
                    flag: id,
                });
            }
            seen.insert(id);
        }
    }

    Ok(())
}

fn check_subcommands(parent: &CommandDef, subcommands: &[Command]) -> Result<(), DefinitionError> {
    let mut reserved: HashSet<&str> = HashSet::new();
    reserved.insert(parent.name.as_str());
    reserved.extend(parent.aliases.iter().map(String::as_str));

    for sub in subcommands {
        for name in sub.names() {
            if !reserved.insert(name) {
                return Err(DefinitionError::DuplicateSubcommand {
                    command: parent.name.clone(),
                    name: name.to_string(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(name: &str) -> Command {
        Command::builder(name).build().unwrap()
    }

    #[test]
    fn test_rejects_empty_command_name() {
        let err = Command::builder("  ").build().unwrap_err();
        assert_eq!(err, DefinitionError::EmptyCommandName);
    }

    #[test]
    fn test_rejects_duplicate_args() {
        let err = Command::builder("app")
            .with_arg(Arg::new("file"))
            .with_arg(Arg::int("file"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            DefinitionError::DuplicateArg {
                command: "app".to_string(),
                name: "file".to_string(),
            }
        );
        assert_eq!(err.to_string(), "app has duplicate argument 'file'");
    }

    #[test]
    fn test_rejects_duplicate_long_flag() {
        let err = Command::builder("app")
            .with_flag(Flag::new("out"))
            .with_flag(Flag::new("output").with_long("out"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            DefinitionError::DuplicateFlag {
                command: "app".to_string(),
                flag: "--out".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_duplicate_flag_name() {
        let err = Command::builder("app")
            .with_flag(Flag::new("out"))
            .with_flag(Flag::new("out").with_long("output"))
            .build()
            .unwrap_err();
        assert!(matches!(err, DefinitionError::DuplicateFlag { flag, .. } if flag == "out"));
    }

    #[test]
    fn test_rejects_dash_short_flag() {
        let err = Command::builder("app")
            .with_flag(Flag::new("all").with_short('-'))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            DefinitionError::InvalidShort {
                command: "app".to_string(),
                flag: "all".to_string(),
                short: '-',
            }
        );
        assert_eq!(err.to_string(), "app has flag 'all' with invalid short form '-'");
    }

    #[test]
    fn test_rejects_subcommand_alias_collision() {
        let remove = Command::builder("remove").with_alias("rm").build().unwrap();
        let rm = sub("rm");
        let err = Command::builder("app")
            .with_subcommand(remove)
            .with_subcommand(rm)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            DefinitionError::DuplicateSubcommand {
                command: "app".to_string(),
                name: "rm".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_subcommand_named_like_parent() {
        let err = Command::builder("app")
            .with_alias("a")
            .with_subcommand(sub("a"))
            .build()
            .unwrap_err();
        assert!(matches!(err, DefinitionError::DuplicateSubcommand { name, .. } if name == "a"));
    }

    #[test]
    fn test_accepts_same_names_at_different_levels() {
        let inner = Command::builder("foo")
            .with_arg(Arg::new("test"))
            .with_flag(Flag::new("test"))
            .build()
            .unwrap();
        let app = Command::builder("app")
            .with_arg(Arg::new("test"))
            .with_flag(Flag::new("test"))
            .with_subcommand(inner)
            .build();
        assert!(app.is_ok());
    }
}
