//! Usage snippets, help pages, and error messages.
//!
//! The renderer reads only the public fields of a command tree and the
//! [`Context`] carried by a [`ParseError`]; it never re-runs a parse.

use argtree_core::{Arg, Context, Field, Flag, HELP_COMMAND, HELP_FLAG, ParseError, RawValue};
use tracing::debug;

use crate::{Ansi, Colors, HelpConfig, Plain};

const HELP_FLAG_ABOUT: &str = "Print help";
const HELP_COMMAND_ABOUT: &str = "Print this message or the help of the given subcommand(s)";
const HINT: &str = "For more information, try '--help'.";

/// Renders usage, help pages, and parse errors as text.
///
/// # Examples
///
/// ```
/// use argtree_core::{Arg, Command, Context, Flag};
/// use argtree_help::Help;
///
/// let app = Command::builder("app")
///     .with_about("Copies files")
///     .with_arg(Arg::new("src").with_about("Source path"))
///     .with_flag(Flag::bool("force").with_short('f').with_about("Overwrite"))
///     .build()
///     .unwrap();
///
/// let help = Help::plain();
/// let page = help.help(&Context::new(&app));
/// assert!(page.contains("Usage: app [OPTIONS] <SRC>"));
/// assert!(page.contains("  -f, --force Overwrite"));
///
/// let err = app.parse(["a", "b"]).unwrap_err();
/// assert!(help.render(&err).starts_with("error: unexpected argument 'b' found"));
/// ```
pub struct Help {
    colors: Box<dyn Colors>,
    indent: String,
    newline: String,
    builtin: bool,
}

impl Default for Help {
    fn default() -> Self {
        Self::new()
    }
}

impl Help {
    /// Creates a renderer with ANSI styling, two-space indent, and `\n`.
    pub fn new() -> Self {
        Self {
            colors: Box::new(Ansi),
            indent: "  ".to_string(),
            newline: "\n".to_string(),
            builtin: false,
        }
    }

    /// Creates a renderer without styling.
    pub fn plain() -> Self {
        Self::new().with_colors(Plain)
    }

    /// Creates a renderer from loaded configuration.
    pub fn from_config(config: &HelpConfig) -> Self {
        Self {
            colors: config.color.colors(),
            indent: config.indent.clone(),
            newline: config.newline.clone(),
            builtin: config.builtin,
        }
    }

    /// Replaces the styling.
    pub fn with_colors(mut self, colors: impl Colors + 'static) -> Self {
        self.colors = Box::new(colors);
        self
    }

    /// Sets the indent of list entries.
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Sets the line terminator.
    pub fn with_newline(mut self, newline: impl Into<String>) -> Self {
        self.newline = newline.into();
        self
    }

    /// Lists the builtin `--help` flag and `help` subcommand on help pages.
    ///
    /// Match this to [`Parser::with_help`](argtree_core::Parser::with_help).
    pub fn with_builtin(mut self, builtin: bool) -> Self {
        self.builtin = builtin;
        self
    }

    /// Usage snippet for a positional argument: `<NAME>` or `[NAME]`.
    pub fn arg_usage(&self, arg: &Arg) -> String {
        let name = arg.name.to_uppercase();
        if arg.required {
            format!("<{name}>")
        } else {
            format!("[{name}]")
        }
    }

    /// Usage snippet for a flag.
    ///
    /// Switches render as `-s, --long`; value flags append `<NAME>`, or
    /// `[NAME]` when a default exists, and repeatable flags append `...`.
    pub fn flag_usage(&self, flag: &Flag) -> String {
        let mut usage = match flag.short {
            Some(short) => format!("-{short}, --{}", flag.long),
            None => format!("--{}", flag.long),
        };
        if flag.requires_value {
            let name = flag.name.to_uppercase();
            if flag.default.is_some() {
                usage.push_str(&format!(" [{name}]"));
            } else {
                usage.push_str(&format!(" <{name}>"));
            }
        }
        if flag.repeatable {
            usage.push_str("...");
        }
        usage
    }

    /// One-line usage of the command at the end of `ctx`'s path.
    ///
    /// Lists the command chain, required flags, `[OPTIONS]` when optional
    /// flags exist, the positional placeholders, and `[COMMAND]` when
    /// subcommands exist.
    pub fn cmd_usage(&self, ctx: &Context) -> String {
        let cmd = ctx.command();
        let mut parts: Vec<String> = ctx.names().into_iter().map(String::from).collect();

        parts.extend(cmd.flags.iter().filter(|f| f.required).map(|f| self.flag_usage(f)));
        if cmd.flags.iter().any(|f| !f.required) || self.shows_help_flag(ctx) {
            parts.push("[OPTIONS]".to_string());
        }
        parts.extend(cmd.args.iter().map(|a| self.arg_usage(a)));
        if !cmd.subcommands.is_empty() {
            parts.push("[COMMAND]".to_string());
        }
        parts.join(" ")
    }

    /// Full help page of the command at the end of `ctx`'s path.
    pub fn help(&self, ctx: &Context) -> String {
        let cmd = ctx.command();
        let nl = &self.newline;
        let mut page = String::new();

        if !cmd.about.is_empty() {
            page.push_str(&self.colors.standard(&cmd.about));
            page.push_str(nl);
            page.push_str(nl);
        }
        page.push_str(&self.colors.underline("Usage:"));
        page.push_str(&self.colors.standard(" "));
        page.push_str(&self.colors.standard(&self.cmd_usage(ctx)));
        page.push_str(nl);

        if !cmd.args.is_empty() {
            page.push_str(&self.section("Arguments:"));
            for arg in &cmd.args {
                page.push_str(&self.entry(&self.arg_usage(arg), &arg.about));
            }
        }

        let builtin_command = self.shows_help_command(ctx);
        if !cmd.subcommands.is_empty() || builtin_command {
            page.push_str(&self.section("Commands:"));
            for sub in &cmd.subcommands {
                let names: Vec<&str> = sub.names().collect();
                page.push_str(&self.command_entry(&names.join(", "), &sub.about));
            }
            if builtin_command {
                page.push_str(&self.command_entry(HELP_COMMAND, HELP_COMMAND_ABOUT));
            }
        }

        let builtin_flag = self.shows_help_flag(ctx);
        if !cmd.flags.is_empty() || builtin_flag {
            page.push_str(&self.section("Options:"));
            for flag in &cmd.flags {
                page.push_str(&self.entry(&self.flag_usage(flag), &flag.about));
            }
            if builtin_flag {
                page.push_str(&self.entry(HELP_FLAG, HELP_FLAG_ABOUT));
            }
        }
        page
    }

    /// Resolves a requested help path from `ctx` and renders its page.
    ///
    /// Path items may be names or aliases. The first item that names no
    /// subcommand renders an "unrecognized subcommand" error instead.
    pub fn process_help(&self, ctx: &Context, path: &[String]) -> String {
        let mut current = ctx.clone();
        for name in path {
            let Some(sub) = current.command().find_subcommand(name).cloned() else {
                debug!(command = %current.command().name, subcommand = %name, "unknown help path");
                return self.err_help(&current, name);
            };
            current = current.stack(&sub);
        }
        self.help(&current)
    }

    /// Renders any parse error, or the requested help page.
    pub fn render(&self, err: &ParseError) -> String {
        match err {
            ParseError::Help { context, path } => self.process_help(context, path),
            ParseError::Missing { context, missing } => self.err_missing(context, missing),
            ParseError::Invalid {
                context,
                field,
                value,
                reason,
            } => self.err_invalid(context, field, value, reason),
            ParseError::Unexpected { context, value } => self.err_unexpected(context, value),
        }
    }

    /// Error for a help request naming an unknown subcommand.
    pub fn err_help(&self, ctx: &Context, invalid: &str) -> String {
        let mut out = self.colors.error("error:");
        out.push_str(&self.colors.standard(" unrecognized subcommand "));
        out.push_str(&self.colors.warn(&format!("'{invalid}'")));
        out.push_str(&self.newline);
        out.push_str(&self.err_suffix(ctx));
        out
    }

    /// Error for a value rejected by a validator.
    pub fn err_invalid(&self, _ctx: &Context, field: &Field, value: &RawValue, reason: &str) -> String {
        let mut out = self.colors.error("error:");
        out.push_str(&self.colors.standard(" invalid value "));
        out.push_str(&self.colors.warn(&quote_raw(value)));
        out.push_str(&self.colors.standard(" for "));
        out.push_str(&self.colors.highlight(&self.field_usage(field)));
        out.push_str(&self.colors.standard(&format!(": {reason}")));
        out.push_str(&self.newline.repeat(2));
        out.push_str(&self.colors.standard(HINT));
        out.push_str(&self.newline);
        out
    }

    /// Error listing every required field that had no value.
    pub fn err_missing(&self, ctx: &Context, missing: &[Field]) -> String {
        let mut out = self.colors.error("error:");
        out.push_str(
            &self
                .colors
                .standard(" the following required arguments were not provided:"),
        );
        out.push_str(&self.newline);
        for field in missing {
            out.push_str(&self.indent);
            out.push_str(&self.colors.highlight(&self.field_usage(field)));
            out.push_str(&self.newline);
        }
        out.push_str(&self.err_suffix(ctx));
        out
    }

    /// Error for a leftover token.
    pub fn err_unexpected(&self, ctx: &Context, value: &str) -> String {
        let mut out = self.colors.error("error:");
        out.push_str(&self.colors.standard(" unexpected argument "));
        out.push_str(&self.colors.warn(&format!("'{value}'")));
        out.push_str(&self.colors.standard(" found"));
        out.push_str(&self.newline);
        out.push_str(&self.err_suffix(ctx));
        out
    }

    /// Usage line and `--help` hint appended to errors.
    pub fn err_suffix(&self, ctx: &Context) -> String {
        let mut out = self.newline.clone();
        out.push_str(&self.colors.underline("Usage:"));
        out.push(' ');
        out.push_str(&self.colors.standard(&self.cmd_usage(ctx)));
        out.push_str(&self.newline.repeat(2));
        out.push_str(&self.colors.standard(HINT));
        out.push_str(&self.newline);
        out
    }

    fn field_usage(&self, field: &Field) -> String {
        match field {
            Field::Arg(arg) => self.arg_usage(arg),
            Field::Flag(flag) => self.flag_usage(flag),
        }
    }

    fn section(&self, title: &str) -> String {
        format!("{}{}{}", self.newline, self.colors.underline(title), self.newline)
    }

    fn entry(&self, usage: &str, about: &str) -> String {
        let mut line = format!("{}{}", self.indent, usage);
        if !about.is_empty() {
            line.push(' ');
            line.push_str(&self.colors.standard(about));
        }
        line.push_str(&self.newline);
        line
    }

    fn command_entry(&self, names: &str, about: &str) -> String {
        let mut lines = format!("{}{}{}", self.indent, self.colors.bold(names), self.newline);
        if !about.is_empty() {
            lines.push_str(&self.indent.repeat(2));
            lines.push_str(&self.colors.standard(about));
            lines.push_str(&self.newline);
        }
        lines
    }

    fn shows_help_flag(&self, ctx: &Context) -> bool {
        self.builtin && ctx.root().find_flag(HELP_FLAG).is_none()
    }

    fn shows_help_command(&self, ctx: &Context) -> bool {
        let root = ctx.root();
        self.builtin
            && ctx.depth() == 0
            && !root.subcommands.is_empty()
            && root.find_subcommand(HELP_COMMAND).is_none()
    }
}

fn quote_raw(value: &RawValue) -> String {
    match value.as_str() {
        Some(token) => format!("'{token}'"),
        None => value.to_string(),
    }
}
