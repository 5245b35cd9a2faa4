//! Mapping parse results into typed values.
//!
//! [`CommandSchema::to_json`] flattens one level's arguments and flags into
//! a single object and nests invoked subcommands under the schema's
//! subcommand property:
//!
//! ```json
//! { "jobs": 4, "command": { "add": { "path": "src/", "force": true } } }
//! ```
//!
//! That shape deserializes with serde into a struct whose subcommand
//! property is an externally tagged enum (or a struct of `Option`s when
//! sibling subcommands may be invoked together).

use argtree_core::{Invocation, Matches, Value};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as Json};
use tracing::trace;

use crate::CommandSchema;
use crate::error::Result;

fn value_to_json(value: Option<&Value>) -> Json {
    match value {
        None => Json::Null,
        Some(Value::Boolean(b)) => Json::Bool(*b),
        Some(Value::Integer(i)) => Json::from(*i),
        Some(Value::String(s)) => Json::String(s.clone()),
        Some(Value::List(items)) => Json::Array(items.iter().map(|v| value_to_json(Some(v))).collect()),
    }
}

impl CommandSchema {
    /// Flattens a parse result produced by this schema's tree into JSON.
    ///
    /// When the schema has subcommands, the subcommand property is always
    /// present: `null` if none was invoked, otherwise an object keyed by
    /// subcommand name. Repeatable subcommands map to arrays.
    pub fn to_json(&self, matches: &Matches) -> Json {
        let mut object = Map::new();
        for (name, value) in matches.args.iter().chain(&matches.flags) {
            object.insert(name.clone(), value_to_json(value.as_ref()));
        }

        if !self.subcommands.is_empty() {
            let mut commands = Map::new();
            for (name, invocation) in &matches.commands {
                let Some(sub) = self.find_subcommand(name) else {
                    continue;
                };
                let mapped = match invocation {
                    Invocation::Single(inner) => sub.to_json(inner),
                    Invocation::Repeated(list) => {
                        Json::Array(list.iter().map(|inner| sub.to_json(inner)).collect())
                    }
                };
                commands.insert(name.clone(), mapped);
            }
            let nested = if commands.is_empty() {
                Json::Null
            } else {
                Json::Object(commands)
            };
            object.insert(self.property.clone(), nested);
        }

        Json::Object(object)
    }

    /// Builds the tree, parses `tokens`, and deserializes the result into `T`.
    ///
    /// # Errors
    ///
    /// Returns any build error of [`build`](Self::build),
    /// [`SchemaError::ParseError`](crate::SchemaError::ParseError) when the
    /// tokens do not parse, and
    /// [`SchemaError::JsonError`](crate::SchemaError::JsonError) when the
    /// result does not fit `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use argtree_schema::CommandSchema;
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Greet {
    ///     name: String,
    ///     times: i64,
    /// }
    ///
    /// let schema = CommandSchema::from_yaml(r#"
    /// name: greet
    /// fields:
    ///   - { name: name, type: string }
    ///   - { name: times, type: int, default: 1, flag: { short: t } }
    /// "#).unwrap();
    ///
    /// let greet: Greet = schema.parse_into(["world", "-t", "2"]).unwrap();
    /// assert_eq!(greet.name, "world");
    /// assert_eq!(greet.times, 2);
    /// ```
    pub fn parse_into<T, I, S>(&self, tokens: I) -> Result<T>
    where
        T: DeserializeOwned,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let command = self.build()?;
        let matches = command.parse(tokens)?;
        let json = self.to_json(&matches);
        trace!(command = %self.name, %json, "mapped parse result");
        Ok(serde_json::from_value(json)?)
    }
}
