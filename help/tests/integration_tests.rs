use argtree_core::{Arg, Command, Context, Flag, Parser};
use argtree_help::{ColorChoice, Help, HelpConfig};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn vcs() -> Command {
    let add = Command::builder("add")
        .with_alias("a")
        .with_about("Add files")
        .with_arg(Arg::new("path").with_about("File to add"))
        .with_flag(Flag::bool("force").with_short('f').with_about("Allow ignored files"))
        .build()
        .unwrap();
    let remote = Command::builder("remote")
        .with_about("Manage remotes")
        .with_subcommand(
            Command::builder("show")
                .with_about("Show a remote")
                .with_arg(Arg::new("name"))
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();
    Command::builder("vcs")
        .with_about("Tiny version control")
        .with_flag(Flag::int("jobs").with_short('j').with_about("Parallel jobs"))
        .with_subcommand(add)
        .with_subcommand(remote)
        .build()
        .unwrap()
}

fn render(cmd: &Command, tokens: &[&str]) -> String {
    let err = Parser::new(cmd)
        .with_help(true)
        .parse(tokens.iter().copied())
        .unwrap_err();
    Help::plain().with_builtin(true).render(&err)
}

// ---------------------------------------------------------------------------
// Help pages
// ---------------------------------------------------------------------------

#[test]
fn test_root_help_page() {
    let page = render(&vcs(), &["--help"]);
    let expected = "\
Tiny version control

Usage: vcs [OPTIONS] [COMMAND]

Commands:
  add, a
    Add files
  remote
    Manage remotes
  help
    Print this message or the help of the given subcommand(s)

Options:
  -j, --jobs <JOBS> Parallel jobs
  --help Print help
";
    assert_eq!(page, expected);
}

#[test]
fn test_subcommand_help_page_via_flag() {
    let page = render(&vcs(), &["a", "--help"]);
    let expected = "\
Add files

Usage: vcs add [OPTIONS] <PATH>

Arguments:
  <PATH> File to add

Options:
  -f, --force Allow ignored files
  --help Print help
";
    assert_eq!(page, expected);
}

#[test]
fn test_nested_help_page_via_subcommand() {
    let page = render(&vcs(), &["help", "remote", "show"]);
    assert!(page.starts_with("Show a remote\n\nUsage: vcs remote show [OPTIONS] <NAME>\n"));
    // The help subcommand is only listed at the root.
    assert!(!page.contains("Commands:"));
}

#[test]
fn test_help_for_unknown_subcommand() {
    let page = render(&vcs(), &["help", "remote", "drop"]);
    let expected = "\
error: unrecognized subcommand 'drop'

Usage: vcs remote [OPTIONS] [COMMAND]

For more information, try '--help'.
";
    assert_eq!(page, expected);
}

// ---------------------------------------------------------------------------
// Error messages
// ---------------------------------------------------------------------------

#[test]
fn test_missing_values_message() {
    let err = vcs().parse(["add"]).unwrap_err();
    let out = Help::plain().render(&err);
    let expected = "\
error: the following required arguments were not provided:
  <PATH>

Usage: vcs add [OPTIONS] <PATH>

For more information, try '--help'.
";
    assert_eq!(out, expected);
}

#[test]
fn test_missing_flag_uses_flag_usage() {
    let app = Command::builder("app")
        .with_flag(Flag::new("mode").with_short('m').required(true))
        .build()
        .unwrap();
    let out = Help::plain().render(&app.parse(Vec::<String>::new()).unwrap_err());
    assert!(out.contains("\n  -m, --mode <MODE>\n"));
    assert!(out.contains("Usage: app -m, --mode <MODE>\n"));
}

#[test]
fn test_invalid_value_message() {
    let err = vcs().parse(["--jobs", "lots"]).unwrap_err();
    assert_eq!(
        Help::plain().render(&err),
        "error: invalid value 'lots' for -j, --jobs <JOBS>: invalid integer\n\n\
         For more information, try '--help'.\n"
    );
}

#[test]
fn test_custom_reason_in_invalid_message() {
    let app = Command::builder("app")
        .with_arg(Arg::new("test").with_check(|raw| raw.as_str() == Some("hello"), "invalid hello"))
        .build()
        .unwrap();
    let out = Help::plain().render(&app.parse(["world"]).unwrap_err());
    assert!(out.starts_with("error: invalid value 'world' for <TEST>: invalid hello\n"));
}

#[test]
fn test_unexpected_message() {
    let err = vcs().parse(["add", "a.txt", "b.txt"]).unwrap_err();
    let expected = "\
error: unexpected argument 'b.txt' found

Usage: vcs add [OPTIONS] <PATH>

For more information, try '--help'.
";
    assert_eq!(Help::plain().render(&err), expected);
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn test_renderer_from_config() {
    let config = HelpConfig {
        color: ColorChoice::Never,
        indent: "    ".to_string(),
        newline: "\n".to_string(),
        builtin: false,
    };
    let app = vcs();
    let ctx = Context::new(&app);
    let page = Help::from_config(&config).help(&ctx);
    assert!(page.contains("\n    add, a\n        Add files\n"));
    assert!(!page.contains("--help"));
}
