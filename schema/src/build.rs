//! Conversion from schema to command tree.

use std::collections::HashSet;

use argtree_core::{Arg, Command, Field, Flag, RawValue, Validator, Value};
use regex::Regex;
use tracing::{debug, trace};

use crate::error::{Result, SchemaError};
use crate::{CommandSchema, FieldSchema};

impl CommandSchema {
    /// Builds the command tree described by this schema.
    ///
    /// Only the public builder surface of `argtree-core` is used, so every
    /// naming invariant is checked the same way as for hand-built trees.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingType`], [`SchemaError::InvalidType`], or
    /// [`SchemaError::InvalidDefault`] for a bad field,
    /// [`SchemaError::PatternError`] for a bad `pattern`,
    /// [`SchemaError::DuplicateField`] when two fields share a name
    /// (positional or flag alike),
    /// [`SchemaError::PropertyCollision`] when the subcommand property
    /// shadows a field, and [`SchemaError::DefinitionError`] when the tree
    /// violates a naming invariant.
    ///
    /// # Examples
    ///
    /// ```
    /// use argtree_core::Value;
    /// use argtree_schema::CommandSchema;
    ///
    /// let schema = CommandSchema::from_yaml(r#"
    /// name: app
    /// fields:
    ///   - name: count
    ///     type: int
    ///     default: 1
    ///     flag: { short: c }
    /// "#).unwrap();
    ///
    /// let app = schema.build().unwrap();
    /// let matches = app.parse(["-c", "3"]).unwrap();
    /// assert_eq!(matches.flag("count"), Some(&Value::Integer(3)));
    /// ```
    pub fn build(&self) -> Result<Command> {
        let mut seen: HashSet<&str> = HashSet::new();
        if let Some(field) = self.fields.iter().find(|f| !seen.insert(f.name.as_str())) {
            return Err(SchemaError::DuplicateField {
                command: self.name.clone(),
                field: field.name.clone(),
            });
        }
        if !self.subcommands.is_empty() && self.fields.iter().any(|f| f.name == self.property) {
            return Err(SchemaError::PropertyCollision {
                command: self.name.clone(),
                property: self.property.clone(),
            });
        }

        let mut builder = Command::builder(&self.name)
            .with_about(&self.about)
            .repeatable(self.repeatable);
        if let Some(version) = &self.version {
            builder = builder.with_version(version);
        }
        for author in &self.authors {
            builder = builder.with_author(author);
        }
        for alias in &self.aliases {
            builder = builder.with_alias(alias);
        }

        for field in &self.fields {
            builder = match build_field(&self.name, field)? {
                Field::Arg(arg) => builder.with_arg(arg),
                Field::Flag(flag) => builder.with_flag(flag),
            };
        }
        for sub in &self.subcommands {
            builder = builder.with_subcommand(sub.build()?);
        }

        let command = builder.build()?;
        debug!(
            command = %command.name,
            args = command.args.len(),
            flags = command.flags.len(),
            subcommands = command.subcommands.len(),
            "built command from schema"
        );
        Ok(command)
    }
}

/// Base validator and list marker of a field's declared type.
fn field_type(command: &str, field: &FieldSchema) -> Result<(Validator, bool)> {
    let Some(kind) = field.kind.as_deref() else {
        return Err(SchemaError::MissingType {
            command: command.to_string(),
            field: field.name.clone(),
        });
    };
    let (base, list) = match kind.trim().strip_suffix("[]") {
        Some(base) => (base, true),
        None => (kind.trim(), false),
    };
    let validator = match base {
        "string" => Validator::String,
        "int" => Validator::Integer,
        "bool" => Validator::Boolean,
        _ => {
            return Err(SchemaError::InvalidType {
                command: command.to_string(),
                field: field.name.clone(),
                kind: kind.to_string(),
            });
        }
    };
    Ok((validator, list))
}

fn scalar_fits(validator: &Validator, value: &Value) -> bool {
    matches!(
        (validator, value),
        (Validator::String, Value::String(_))
            | (Validator::Integer, Value::Integer(_))
            | (Validator::Boolean, Value::Boolean(_))
    )
}

fn default_fits(validator: &Validator, list: bool, value: &Value) -> bool {
    match value {
        Value::List(items) if list => items.iter().all(|v| scalar_fits(validator, v)),
        _ if list => false,
        _ => scalar_fits(validator, value),
    }
}

fn matches_pattern(pattern: &Regex, raw: &RawValue) -> bool {
    raw.tokens().all(|token| token.is_none_or(|t| pattern.is_match(t)))
}

fn build_field(command: &str, field: &FieldSchema) -> Result<Field> {
    let (validator, list) = field_type(command, field)?;
    if let Some(default) = &field.default {
        if !default_fits(&validator, list, default) {
            return Err(SchemaError::InvalidDefault {
                command: command.to_string(),
                field: field.name.clone(),
                kind: field.kind.clone().unwrap_or_default(),
            });
        }
    }

    let check = match &field.pattern {
        Some(pattern) => {
            let regex = Regex::new(pattern)?;
            let reason = field
                .reason
                .clone()
                .unwrap_or_else(|| format!("does not match '{pattern}'"));
            Some((regex, reason))
        }
        None => None,
    };
    let required = !field.optional && field.default.is_none();

    let Some(attr) = &field.flag else {
        if list {
            return Err(SchemaError::InvalidType {
                command: command.to_string(),
                field: field.name.clone(),
                kind: field.kind.clone().unwrap_or_default(),
            });
        }
        let mut arg = Arg::typed(&field.name, validator)
            .with_about(&field.about)
            .required(required);
        if let Some(default) = &field.default {
            arg = arg.with_default(default.clone());
        }
        if let Some((regex, reason)) = check {
            arg = arg.with_check(move |raw| matches_pattern(&regex, raw), reason);
        }
        trace!(command, field = %field.name, "schema argument");
        return Ok(Field::Arg(arg));
    };

    // A scalar bool flag is a switch and never required.
    let switch = validator == Validator::Boolean && !list;
    let mut flag = if switch {
        Flag::bool(&field.name)
    } else {
        Flag::typed(&field.name, validator).required(required)
    };
    flag = flag.with_about(&field.about);
    if list {
        flag = flag.repeatable();
    }
    if let Some(short) = attr.short {
        flag = flag.with_short(short);
    }
    if let Some(long) = &attr.long {
        flag = flag.with_long(long);
    }
    if let Some(default) = &field.default {
        flag = flag.with_default(default.clone());
    }
    if let Some((regex, reason)) = check {
        flag = flag.with_check(move |raw| matches_pattern(&regex, raw), reason);
    }
    trace!(command, field = %field.name, "schema flag");
    Ok(Field::Flag(flag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FlagSchema;

    fn field(kind: &str) -> FieldSchema {
        FieldSchema::new("f", kind)
    }

    #[test]
    fn test_field_type_parses_list_forms() {
        assert_eq!(field_type("app", &field("int")).unwrap(), (Validator::Integer, false));
        assert_eq!(field_type("app", &field("bool[]")).unwrap(), (Validator::Boolean, true));
        assert_eq!(field_type("app", &field(" string ")).unwrap(), (Validator::String, false));
    }

    #[test]
    fn test_field_type_errors() {
        let mut untyped = field("string");
        untyped.kind = None;
        assert!(matches!(
            field_type("app", &untyped),
            Err(SchemaError::MissingType { .. })
        ));
        assert!(matches!(
            field_type("app", &field("float")),
            Err(SchemaError::InvalidType { kind, .. }) if kind == "float"
        ));
    }

    #[test]
    fn test_list_argument_is_invalid() {
        let err = build_field("app", &field("string[]")).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidType { .. }));
    }

    #[test]
    fn test_default_must_fit_type() {
        let bad = field("int").with_default("three");
        assert!(matches!(
            build_field("app", &bad),
            Err(SchemaError::InvalidDefault { .. })
        ));

        let list = field("int[]")
            .with_flag(FlagSchema::default())
            .with_default(vec![1i64, 2]);
        assert!(build_field("app", &list).is_ok());
    }

    #[test]
    fn test_switch_ignores_required() {
        let built = build_field("app", &field("bool").with_flag(FlagSchema::short('v'))).unwrap();
        match built {
            Field::Flag(flag) => {
                assert!(!flag.required);
                assert!(!flag.requires_value);
                assert_eq!(flag.short, Some('v'));
                assert_eq!(flag.long, "f");
            }
            Field::Arg(_) => panic!("expected a flag"),
        }
    }

    #[test]
    fn test_bad_pattern() {
        let err = build_field("app", &field("string").with_pattern("(", "nope")).unwrap_err();
        assert!(matches!(err, SchemaError::PatternError(_)));
    }

    #[test]
    fn test_property_collision() {
        let schema = CommandSchema::new("app")
            .with_field(FieldSchema::new("command", "string"))
            .with_subcommand(CommandSchema::new("run"));
        assert!(matches!(
            schema.build(),
            Err(SchemaError::PropertyCollision { .. })
        ));
    }
}
