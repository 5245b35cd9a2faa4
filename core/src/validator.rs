//! Type checking and conversion of raw tokens.
//!
//! Every [`Arg`](crate::Arg) and [`Flag`](crate::Flag) carries a built-in
//! [`Validator`] that decides whether a raw token fits its type and converts
//! it into a [`Value`]. Additional [`Custom`] predicates run after the
//! built-in check has accepted the token.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::Value;

const TRUTHY: [&str; 5] = ["1", "true", "y", "ye", "yes"];
const FALSY: [&str; 5] = ["0", "false", "n", "na", "no"];

/// Raw, unconverted value resolved for a field.
///
/// `Single(None)` is a flag that was present without a following value.
/// Repeatable flags collect every occurrence into `Repeated`.
///
/// # Examples
///
/// ```
/// use argtree_core::RawValue;
///
/// let raw = RawValue::from("world");
/// assert_eq!(raw.as_str(), Some("world"));
/// assert_eq!(raw.to_string(), "\"world\"");
/// assert_eq!(RawValue::Single(None).to_string(), "null");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    /// A single occurrence, possibly without a value.
    Single(Option<String>),
    /// Every occurrence of a repeatable flag, in command-line order.
    Repeated(Vec<Option<String>>),
}

impl RawValue {
    /// Returns the token of a single occurrence that carried a value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Single(token) => token.as_deref(),
            Self::Repeated(_) => None,
        }
    }

    /// Iterates every token, including value-less occurrences.
    pub fn tokens(&self) -> impl Iterator<Item = Option<&str>> {
        let items: &[Option<String>] = match self {
            Self::Single(token) => std::slice::from_ref(token),
            Self::Repeated(items) => items,
        };
        items.iter().map(Option::as_deref)
    }

    /// Returns `true` if any occurrence lacks a value.
    pub fn has_null(&self) -> bool {
        self.tokens().any(|t| t.is_none())
    }
}

impl From<&str> for RawValue {
    fn from(token: &str) -> Self {
        Self::Single(Some(token.to_string()))
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Built-in value types.
///
/// # Examples
///
/// ```
/// use argtree_core::{RawValue, Validator, Value};
///
/// let int = Validator::Integer;
/// assert!(int.validate(&RawValue::from("1234")));
/// assert!(!int.validate(&RawValue::from("123hello")));
/// assert_eq!(int.convert(&RawValue::from("1234")), Value::Integer(1234));
///
/// let many = Validator::Boolean.repeated();
/// let raw = RawValue::Repeated(vec![Some("yes".into()), Some("NO".into())]);
/// assert!(many.validate(&raw));
/// assert_eq!(
///     many.convert(&raw),
///     Value::List(vec![Value::Boolean(true), Value::Boolean(false)]),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Validator {
    /// Any token; conversion is the identity.
    #[default]
    String,
    /// Unsigned decimal digits that fit an `i64`.
    Integer,
    /// Case-insensitive `1/true/y/ye/yes` or `0/false/n/na/no`.
    Boolean,
    /// Every item of a list satisfies the inner validator.
    Repeated(Box<Validator>),
}

impl Validator {
    /// Wraps this validator for repeated values.
    pub fn repeated(self) -> Self {
        Self::Repeated(Box::new(self))
    }

    /// Type name used in rejection reasons.
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Repeated(inner) => inner.name(),
        }
    }

    /// Rejection reason reported when [`validate`](Self::validate) fails.
    pub fn reason(&self) -> String {
        format!("invalid {}", self.name())
    }

    /// Checks whether `raw` satisfies this type.
    pub fn validate(&self, raw: &RawValue) -> bool {
        match (self, raw) {
            (Self::Repeated(inner), RawValue::Repeated(items)) => {
                items.iter().all(|item| inner.validate_token(item.as_deref()))
            }
            (Self::Repeated(_), RawValue::Single(_)) => false,
            (_, RawValue::Single(token)) => self.validate_token(token.as_deref()),
            (_, RawValue::Repeated(_)) => false,
        }
    }

    /// Converts `raw` into a [`Value`].
    ///
    /// Assumes [`validate`](Self::validate) accepted `raw`; tokens that do
    /// not fit fall back to the type's zero value instead of failing.
    pub fn convert(&self, raw: &RawValue) -> Value {
        match (self, raw) {
            (Self::Repeated(inner), RawValue::Repeated(items)) => Value::List(
                items
                    .iter()
                    .map(|item| inner.convert_token(item.as_deref()))
                    .collect(),
            ),
            (_, RawValue::Single(token)) => self.convert_token(token.as_deref()),
            (_, RawValue::Repeated(items)) => Value::List(
                items
                    .iter()
                    .map(|item| self.convert_token(item.as_deref()))
                    .collect(),
            ),
        }
    }

    fn validate_token(&self, token: Option<&str>) -> bool {
        match self {
            Self::String => true,
            Self::Integer => token.is_none_or(|t| parse_integer(t).is_some()),
            Self::Boolean => token.is_none_or(|t| parse_bool(t).is_some()),
            Self::Repeated(_) => false,
        }
    }

    fn convert_token(&self, token: Option<&str>) -> Value {
        match self {
            Self::String => Value::String(token.unwrap_or_default().to_string()),
            Self::Integer => Value::Integer(token.and_then(parse_integer).unwrap_or_default()),
            Self::Boolean => Value::Boolean(token.is_none_or(|t| parse_bool(t).unwrap_or(true))),
            Self::Repeated(inner) => Value::List(vec![inner.convert_token(token)]),
        }
    }
}

fn parse_integer(token: &str) -> Option<i64> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

fn parse_bool(token: &str) -> Option<bool> {
    let lowered = token.to_ascii_lowercase();
    if TRUTHY.contains(&lowered.as_str()) {
        Some(true)
    } else if FALSY.contains(&lowered.as_str()) {
        Some(false)
    } else {
        None
    }
}

type Predicate = dyn Fn(&RawValue) -> bool + Send + Sync;

/// User-supplied predicate with a rejection reason.
///
/// Custom checks run in declaration order after the built-in validator; the
/// first failing predicate's reason is reported.
///
/// # Examples
///
/// ```
/// use argtree_core::{Custom, RawValue};
///
/// let hello = Custom::new(|raw| raw.as_str() == Some("hello"), "invalid hello");
/// assert!(hello.check(&RawValue::from("hello")));
/// assert!(!hello.check(&RawValue::from("world")));
/// assert_eq!(hello.reason(), "invalid hello");
/// ```
#[derive(Clone)]
pub struct Custom {
    predicate: Arc<Predicate>,
    reason: String,
}

impl Custom {
    /// Creates a custom check from a predicate and its rejection reason.
    pub fn new<F>(predicate: F, reason: impl Into<String>) -> Self
    where
        F: Fn(&RawValue) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            reason: reason.into(),
        }
    }

    /// Runs the predicate.
    pub fn check(&self, raw: &RawValue) -> bool {
        (self.predicate)(raw)
    }

    /// Reason reported when the predicate rejects a value.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Debug for Custom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Custom")
            .field("reason", &self.reason)
            .finish_non_exhaustive()
    }
}
