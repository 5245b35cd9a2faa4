//! Parse-time error types.
//!
//! Every variant carries the [`Context`] active when the failure happened,
//! so a renderer can rebuild the command path and usage line without
//! re-running the parse.

use thiserror::Error;

use crate::{Context, Field, RawValue};

/// Errors produced while parsing tokens against a command tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// One or more required fields at one command level had no value.
    ///
    /// Raised once per level after every field there was evaluated.
    #[error("missing required values: {}", field_labels(.missing))]
    Missing {
        /// Context of the level that was missing values.
        context: Context,
        /// Every missing field, in evaluation order.
        missing: Vec<Field>,
    },
    /// A supplied value failed its type check or a custom predicate.
    #[error("{} = {value} {reason}", .field.name())]
    Invalid {
        /// Context of the level holding the field.
        context: Context,
        /// The rejected field.
        field: Field,
        /// The raw value as given on the command line.
        value: RawValue,
        /// Built-in type reason or custom reason.
        reason: String,
    },
    /// A token was left over after every positional argument was satisfied.
    #[error("unexpected argument {value:?}")]
    Unexpected {
        /// Context of the level with the leftover token.
        context: Context,
        /// The first leftover token.
        value: String,
    },
    /// Builtin help was requested.
    #[error("help requested")]
    Help {
        /// Root context.
        context: Context,
        /// Subcommand names the help request refers to.
        path: Vec<String>,
    },
}

impl ParseError {
    /// Returns the context carried by this error.
    pub fn context(&self) -> &Context {
        match self {
            Self::Missing { context, .. }
            | Self::Invalid { context, .. }
            | Self::Unexpected { context, .. }
            | Self::Help { context, .. } => context,
        }
    }

    /// Returns `true` for a builtin help request rather than a failure.
    pub fn is_help(&self) -> bool {
        matches!(self, Self::Help { .. })
    }
}

fn field_labels(fields: &[Field]) -> String {
    fields
        .iter()
        .map(Field::label)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Arg, Command, Flag};

    fn ctx() -> Context {
        Context::new(&Command::builder("app").build().unwrap())
    }

    #[test]
    fn test_invalid_message_embeds_name_value_reason() {
        let err = ParseError::Invalid {
            context: ctx(),
            field: Field::Arg(Arg::new("test")),
            value: RawValue::from("world"),
            reason: "invalid hello".to_string(),
        };
        assert_eq!(err.to_string(), r#"test = "world" invalid hello"#);
    }

    #[test]
    fn test_unexpected_message_quotes_token() {
        let err = ParseError::Unexpected {
            context: ctx(),
            value: "fooo".to_string(),
        };
        assert_eq!(err.to_string(), r#"unexpected argument "fooo""#);
        assert!(!err.is_help());
    }

    #[test]
    fn test_missing_message_lists_fields() {
        let err = ParseError::Missing {
            context: ctx(),
            missing: vec![
                Field::Arg(Arg::new("src")),
                Field::Flag(Flag::new("mode").with_long("set-mode")),
            ],
        };
        assert_eq!(err.to_string(), "missing required values: src, --set-mode");
        assert_eq!(err.context().names(), vec!["app"]);
    }
}
