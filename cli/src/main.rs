use std::path::{Path, PathBuf};
use std::process::ExitCode;

use argtree_core::{Command as Tree, Context, Matches, ParseError, Parser as TreeParser};
use argtree_help::{ColorChoice, Help, HelpConfig};
use argtree_schema::CommandSchema;
use clap::{Args, Parser, Subcommand};
use tracing::debug;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

/// CLI-specific color choice with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliColorChoice {
    Auto,
    Always,
    Never,
}

impl From<CliColorChoice> for ColorChoice {
    fn from(choice: CliColorChoice) -> Self {
        match choice {
            CliColorChoice::Auto => Self::Auto,
            CliColorChoice::Always => Self::Always,
            CliColorChoice::Never => Self::Never,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "argtree")]
#[command(version)]
#[command(about = "Parse command lines against declarative command schemas")]
struct Cli {
    /// Log parser decisions to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse tokens against a schema and print the result.
    Parse(ParseArgs),
    /// Build a schema and report what it declares.
    Check(CheckArgs),
    /// Print the help page of a command in a schema.
    Usage(UsageArgs),
}

/// Rendering options shared by commands that print help or errors.
#[derive(Debug, Args)]
struct RenderArgs {
    /// When to color output (overrides the config file).
    #[arg(long)]
    color: Option<CliColorChoice>,
    /// YAML file with rendering settings.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Schema file (YAML or JSON).
    #[arg(long)]
    schema: PathBuf,
    /// Output format of the parse result.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Print the flattened object that typed mapping consumes.
    #[arg(long)]
    flatten: bool,
    #[command(flatten)]
    render: RenderArgs,
    /// Tokens to parse, after `--`.
    #[arg(last = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Schema file (YAML or JSON).
    #[arg(long)]
    schema: PathBuf,
}

#[derive(Debug, Args)]
struct UsageArgs {
    /// Schema file (YAML or JSON).
    #[arg(long)]
    schema: PathBuf,
    #[command(flatten)]
    render: RenderArgs,
    /// Subcommand names leading to the command to describe.
    path: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Check(args) => run_check(args),
        Command::Usage(args) => run_usage(args),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "argtree=debug,argtree_core=debug,argtree_help=debug,argtree_schema=debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_parse(args: ParseArgs) -> Result<ExitCode, String> {
    let (schema, tree) = load_tree(&args.schema)?;
    let help = renderer(&args.render)?;

    debug!(command = %tree.name, tokens = args.tokens.len(), "parsing tokens");
    let matches = match TreeParser::new(&tree).with_help(true).parse(args.tokens) {
        Ok(matches) => matches,
        Err(ParseError::Help { context, path }) => {
            let page = help.process_help(&context, &path);
            return Ok(emit_page(&tree, &path, &page));
        }
        Err(err) => {
            eprint!("{}", help.render(&err));
            return Ok(ExitCode::FAILURE);
        }
    };

    let rendered = format_matches(&schema, &matches, args.format, args.flatten)?;
    println!("{}", rendered.trim_end());
    Ok(ExitCode::SUCCESS)
}

fn run_check(args: CheckArgs) -> Result<ExitCode, String> {
    let (_, tree) = load_tree(&args.schema)?;
    let totals = count(&tree);
    println!(
        "Schema '{}' is valid: {} command(s), {} argument(s), {} flag(s).",
        tree.name, totals.commands, totals.args, totals.flags
    );
    Ok(ExitCode::SUCCESS)
}

fn run_usage(args: UsageArgs) -> Result<ExitCode, String> {
    let (_, tree) = load_tree(&args.schema)?;
    let help = renderer(&args.render)?;
    let page = help.process_help(&Context::new(&tree), &args.path);
    Ok(emit_page(&tree, &args.path, &page))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Loads a schema file and builds its command tree.
fn load_tree(path: &Path) -> Result<(CommandSchema, Tree), String> {
    let schema = CommandSchema::load(path)
        .map_err(|err| format!("Failed to load schema '{}': {err}", path.display()))?;
    let tree = schema
        .build()
        .map_err(|err| format!("Invalid schema '{}': {err}", path.display()))?;
    Ok((schema, tree))
}

/// Builds the renderer from the optional config file and `--color`.
fn renderer(args: &RenderArgs) -> Result<Help, String> {
    let mut config = match &args.config {
        Some(path) => HelpConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => HelpConfig::default(),
    };
    if let Some(color) = args.color {
        config.color = color.into();
    }
    config.color.apply();
    Ok(Help::from_config(&config).with_builtin(true))
}

fn format_matches(
    schema: &CommandSchema,
    matches: &Matches,
    format: CliOutputFormat,
    flatten: bool,
) -> Result<String, String> {
    let rendered = match format {
        CliOutputFormat::Json if flatten => {
            serde_json::to_string_pretty(&schema.to_json(matches)).map_err(|e| e.to_string())
        }
        CliOutputFormat::Json => serde_json::to_string_pretty(matches).map_err(|e| e.to_string()),
        CliOutputFormat::Yaml if flatten => {
            serde_yaml::to_string(&schema.to_json(matches)).map_err(|e| e.to_string())
        }
        CliOutputFormat::Yaml => serde_yaml::to_string(matches).map_err(|e| e.to_string()),
    };
    rendered.map_err(|err| format!("Failed to serialize result: {err}"))
}

/// Prints a help page for `path`: stdout when the path resolves, otherwise
/// the page is an error and goes to stderr.
fn emit_page(tree: &Tree, path: &[String], page: &str) -> ExitCode {
    if resolves(tree, path) {
        print!("{page}");
        ExitCode::SUCCESS
    } else {
        eprint!("{page}");
        ExitCode::FAILURE
    }
}

/// Returns `true` if every name in `path` resolves to a nested subcommand.
fn resolves(tree: &Tree, path: &[String]) -> bool {
    let mut current = tree;
    for name in path {
        match current.find_subcommand(name) {
            Some(sub) => current = sub,
            None => return false,
        }
    }
    true
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Totals {
    commands: usize,
    args: usize,
    flags: usize,
}

fn count(tree: &Tree) -> Totals {
    let mut totals = Totals {
        commands: 1,
        args: tree.args.len(),
        flags: tree.flags.len(),
    };
    for sub in &tree.subcommands {
        let nested = count(sub);
        totals.commands += nested.commands;
        totals.args += nested.args;
        totals.flags += nested.flags;
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use argtree_core::{Arg, Flag};

    fn tree() -> Tree {
        let show = Tree::builder("show").with_arg(Arg::new("name")).build().unwrap();
        let remote = Tree::builder("remote")
            .with_flag(Flag::bool("verbose"))
            .with_subcommand(show)
            .build()
            .unwrap();
        Tree::builder("vcs")
            .with_flag(Flag::int("jobs"))
            .with_subcommand(remote)
            .build()
            .unwrap()
    }

    #[test]
    fn test_count_walks_subcommands() {
        assert_eq!(
            count(&tree()),
            Totals {
                commands: 3,
                args: 1,
                flags: 2,
            }
        );
    }

    #[test]
    fn test_resolves_path() {
        let tree = tree();
        assert!(resolves(&tree, &[]));
        assert!(resolves(&tree, &["remote".to_string(), "show".to_string()]));
        assert!(!resolves(&tree, &["show".to_string()]));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
