use std::path::PathBuf;

use argtree_core::{DefinitionError, ParseError, Value};
use argtree_schema::{CommandSchema, FieldSchema, FlagSchema, SchemaError};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn vcs() -> CommandSchema {
    CommandSchema::load(fixture("vcs.yaml")).unwrap()
}

#[derive(Debug, Deserialize, PartialEq)]
struct Vcs {
    jobs: i64,
    verbose: bool,
    command: Option<Action>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
enum Action {
    Add { path: String, force: bool },
    Commit { message: String, tag: Vec<String> },
    Log { limit: Option<i64> },
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

#[test]
fn test_fixture_builds_tree() {
    let app = vcs().build().unwrap();
    assert_eq!(app.name, "vcs");
    assert_eq!(app.version, "2.1.0");
    assert_eq!(app.authors, vec!["Ada Example".to_string()]);
    assert_eq!(app.flags.len(), 2);
    assert_eq!(app.subcommands.len(), 3);

    let add = app.find_subcommand("a").unwrap();
    assert_eq!(add.name, "add");
    assert_eq!(add.args.len(), 1);
    assert!(add.args[0].required);

    let commit = app.find_subcommand("commit").unwrap();
    let tag = commit.find_flag("-t").unwrap();
    assert!(tag.repeatable);
    assert!(!tag.required);

    let log = app.find_subcommand("log").unwrap();
    assert!(!log.args[0].required);
}

#[test]
fn test_duplicate_subcommands_surface_definition_error() {
    let schema = CommandSchema::new("app")
        .with_subcommand(CommandSchema::new("run"))
        .with_subcommand(CommandSchema::new("run"));
    let err = schema.build().unwrap_err();
    assert!(matches!(
        err,
        SchemaError::DefinitionError(DefinitionError::DuplicateSubcommand { .. })
    ));
}

#[test]
fn test_positional_and_flag_sharing_a_name_is_rejected() {
    let schema = CommandSchema::from_yaml(
        r#"
name: app
fields:
  - { name: x, type: string }
  - { name: x, type: string, flag: {} }
"#,
    )
    .unwrap();
    let err = schema.build().unwrap_err();
    assert!(matches!(
        err,
        SchemaError::DuplicateField { ref command, ref field } if command == "app" && field == "x"
    ));
    assert_eq!(err.to_string(), "app has duplicate field 'x'");
}

#[test]
fn test_untyped_field_is_rejected() {
    let schema = CommandSchema::from_yaml("name: app\nfields:\n  - name: x\n").unwrap();
    let err = schema.build().unwrap_err();
    assert_eq!(err.to_string(), "app.x has no type");
}

#[test]
fn test_list_positional_is_rejected() {
    let schema = CommandSchema::new("app").with_field(FieldSchema::new("files", "string[]"));
    let err = schema.build().unwrap_err();
    assert_eq!(err.to_string(), "app.files has invalid type 'string[]'");
}

// ---------------------------------------------------------------------------
// Typed mapping
// ---------------------------------------------------------------------------

#[test]
fn test_parse_into_without_subcommand() {
    let parsed: Vcs = vcs().parse_into(["-v"]).unwrap();
    assert_eq!(
        parsed,
        Vcs {
            jobs: 1,
            verbose: true,
            command: None,
        }
    );
}

#[test]
fn test_parse_into_subcommand_via_alias() {
    let parsed: Vcs = vcs().parse_into(["-j", "4", "a", "-f", "src/"]).unwrap();
    assert_eq!(parsed.jobs, 4);
    assert!(!parsed.verbose);
    assert_eq!(
        parsed.command,
        Some(Action::Add {
            path: "src/".to_string(),
            force: true,
        })
    );
}

#[test]
fn test_parse_into_repeatable_flag() {
    let parsed: Vcs = vcs()
        .parse_into(["commit", "-m", "first", "-t", "v1", "--tag", "stable"])
        .unwrap();
    assert_eq!(
        parsed.command,
        Some(Action::Commit {
            message: "first".to_string(),
            tag: vec!["v1".to_string(), "stable".to_string()],
        })
    );

    let parsed: Vcs = vcs().parse_into(["commit", "-m", "only"]).unwrap();
    assert_eq!(
        parsed.command,
        Some(Action::Commit {
            message: "only".to_string(),
            tag: Vec::new(),
        })
    );
}

#[test]
fn test_parse_into_optional_arg() {
    let parsed: Vcs = vcs().parse_into(["log"]).unwrap();
    assert_eq!(parsed.command, Some(Action::Log { limit: None }));
}

#[test]
fn test_pattern_reason_reported() {
    let err = vcs()
        .parse_into::<Vcs, _, _>(["commit", "-m", " padded"])
        .unwrap_err();
    match err {
        SchemaError::ParseError(ParseError::Invalid { reason, .. }) => {
            assert_eq!(reason, "must not start with whitespace");
        }
        other => panic!("expected invalid value, got: {other}"),
    }
}

#[test]
fn test_parse_errors_pass_through() {
    let err = vcs().parse_into::<Vcs, _, _>(["add"]).unwrap_err();
    assert!(matches!(
        err,
        SchemaError::ParseError(ParseError::Missing { .. })
    ));
    assert_eq!(err.to_string(), "missing required values: path");
}

#[test]
fn test_mismatched_target_is_json_error() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Wrong {
        jobs: String,
    }
    let err = vcs().parse_into::<Wrong, _, _>(Vec::<String>::new()).unwrap_err();
    assert!(matches!(err, SchemaError::JsonError(_)));
}

#[test]
fn test_repeatable_subcommand_maps_to_array() {
    let schema = CommandSchema::new("batch")
        .with_property("steps")
        .with_subcommand({
            let mut step = CommandSchema::new("step")
                .with_field(FieldSchema::new("n", "int"));
            step.repeatable = true;
            step
        });
    let app = schema.build().unwrap();
    let matches = app.parse(["step", "1", "step", "2"]).unwrap();
    assert_eq!(
        schema.to_json(&matches),
        serde_json::json!({ "steps": { "step": [ { "n": 1 }, { "n": 2 } ] } })
    );
}

#[test]
fn test_schema_written_in_code_matches_yaml() {
    let schema = CommandSchema::new("greet")
        .with_field(FieldSchema::new("name", "string").with_default("world"))
        .with_field(
            FieldSchema::new("shout", "bool").with_flag(FlagSchema::long("loud")),
        );
    let app = schema.build().unwrap();
    let matches = app.parse(["--loud"]).unwrap();
    assert_eq!(matches.arg("name"), Some(&Value::from("world")));
    assert_eq!(matches.flag("shout"), Some(&Value::Boolean(true)));

    let json = serde_json::to_string(&schema).unwrap();
    assert_eq!(CommandSchema::from_json(&json).unwrap(), schema);
}
