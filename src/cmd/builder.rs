/*!
Command tree generation.

The clap `Command` is built from the catalog at startup:

  outline [-v...] [-q] <group> <command> [--flag value ...]
          [--format json|table] [--limit N] [--offset N] [--all]

Parameters are declared optional to clap; required-ness and type coercion are
enforced by the binder so that every input problem surfaces as the same
validation outcome. Pagination flags exist only on paginated commands.
*/

use std::ffi::OsString;
use std::io::Write;

use clap::error::{ContextKind, ErrorKind};
use clap::{Arg, ArgAction, ArgMatches, Command};

use super::bind::{ALL_FLAG, FORMAT_FLAG, LIMIT_FLAG, OFFSET_FLAG, OutputFormat, RawArgs};
use super::catalog::{Catalog, OperationDescriptor, ParamKind, ParamSpec};
use super::format::StyleOptions;
use super::render::render_failure;
use crate::error::{CliError, OutcomeCode};

pub const BIN_NAME: &str = "outline";

pub fn build_command(catalog: &Catalog) -> Command {
    let mut root = Command::new(BIN_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Outline CLI - command-line access to the Outline wiki API")
        .after_help(
            "Configuration: OUTLINE_BASE_URL and OUTLINE_API_KEY, or base_url / api_key in ~/.outline-cli.yml",
        )
        .propagate_version(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .disable_help_subcommand(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Increase log verbosity (-v, -vv, -vvv)"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Only log errors"),
        );

    for group in catalog.groups() {
        let mut cmd = Command::new(group.name)
            .about(group.about)
            .subcommand_required(true)
            .arg_required_else_help(true);
        for op in catalog.operations_in(group.name) {
            cmd = cmd.subcommand(operation_command(op));
        }
        root = root.subcommand(cmd);
    }
    root
}

fn operation_command(op: &'static OperationDescriptor) -> Command {
    let mut cmd = Command::new(op.name).about(op.summary);
    for spec in op.params {
        cmd = cmd.arg(param_arg(spec));
    }
    if op.is_paginated() {
        cmd = cmd
            .arg(
                Arg::new(LIMIT_FLAG)
                    .long(LIMIT_FLAG)
                    .value_name("N")
                    .allow_negative_numbers(true)
                    .action(ArgAction::Append)
                    .help("Page size [default: 25]"),
            )
            .arg(
                Arg::new(OFFSET_FLAG)
                    .long(OFFSET_FLAG)
                    .value_name("N")
                    .allow_negative_numbers(true)
                    .action(ArgAction::Append)
                    .help("Number of items to skip [default: 0]"),
            )
            .arg(
                Arg::new(ALL_FLAG)
                    .long(ALL_FLAG)
                    .action(ArgAction::SetTrue)
                    .help("Fetch every page and return them as one result"),
            );
    }
    cmd.arg(
        Arg::new(FORMAT_FLAG)
            .long(FORMAT_FLAG)
            .value_name("FORMAT")
            .action(ArgAction::Append)
            .help("Output format: json or table [default: json]"),
    )
}

fn param_arg(spec: &'static ParamSpec) -> Arg {
    let help = if spec.required {
        format!("{} (required)", spec.help)
    } else {
        spec.help.to_string()
    };
    let arg = Arg::new(spec.flag)
        .long(spec.flag)
        .help(help)
        .action(ArgAction::Append);
    match spec.kind {
        ParamKind::Boolean => arg
            .value_name(spec.kind.value_name())
            .num_args(0..=1)
            .default_missing_value("true"),
        ParamKind::Integer => arg
            .value_name(spec.kind.value_name())
            .allow_negative_numbers(true),
        kind => arg.value_name(kind.value_name()),
    }
}

/// A parsed command line.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub verbose: u8,
    pub quiet: bool,
    pub group: String,
    pub command: String,
    pub args: RawArgs,
}

pub fn parse<I, S>(catalog: &Catalog, argv: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let mut root = build_command(catalog);
    let matches = root.try_get_matches_from_mut(argv)?;
    let Some((group, command, leaf)) = leaf(&matches) else {
        return Err(root.error(ErrorKind::MissingSubcommand, "a command is required"));
    };
    Ok(Invocation {
        verbose: leaf.get_count("verbose"),
        quiet: leaf.get_flag("quiet"),
        group: group.to_string(),
        command: command.to_string(),
        args: RawArgs::from_matches(leaf),
    })
}

fn leaf(matches: &ArgMatches) -> Option<(&str, &str, &ArgMatches)> {
    let (group, group_matches) = matches.subcommand()?;
    let (command, leaf) = group_matches.subcommand()?;
    Some((group, command, leaf))
}

/// Print help/version, or render a usage error as a validation failure in
/// the format requested on the command line. Returns the exit code.
pub fn report_parse_error<S: AsRef<str>>(
    err: &clap::Error,
    argv: &[S],
    style: &StyleOptions,
    out: &mut impl Write,
) -> i32 {
    if matches!(
        err.kind(),
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    ) {
        // Nothing else to report if the terminal itself is gone.
        let _ = err.print();
        return err.exit_code();
    }

    let message = match (err.kind(), err.get(ContextKind::InvalidSubcommand)) {
        (ErrorKind::InvalidSubcommand, Some(name)) => format!("unknown command `{name}`"),
        _ => first_line(err),
    };
    let format = OutputFormat::sniff(argv).unwrap_or_default();
    let text = render_failure(&CliError::Validation(message), format, style);
    let _ = writeln!(out, "{text}");
    OutcomeCode::ValidationError.exit_code()
}

fn first_line(err: &clap::Error) -> String {
    let rendered = err.render().to_string();
    let line = rendered.lines().next().unwrap_or_default().trim();
    line.strip_prefix("error: ").unwrap_or(line).to_string()
}
