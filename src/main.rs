use std::io::Write;

use outline_cli::api::HttpTransport;
use outline_cli::cmd::{self, Catalog, Dispatcher, OutputFormat, StyleOptions};
use outline_cli::config::ConfigResolver;
use outline_cli::error::CliError;
use outline_cli::utils;

/// outline - Outline wiki from the command line
///
///   outline <group> <command> [--flag value ...] [--format json|table]
///                             [--limit N] [--offset N] [--all]
///
/// Configuration (environment wins over file, per field):
///   OUTLINE_BASE_URL / base_url   e.g. https://wiki.example.com
///   OUTLINE_API_KEY  / api_key
///   OUTLINE_TIMEOUT  / timeout    request timeout in seconds (default 30)
///   file: ~/.outline-cli.yml
///
/// Exit codes:
///   0 success, 2 config/validation, 3 auth/permission, 4 not found,
///   5 rate limited, 6 transport/unknown API error
fn main() {
    let argv: Vec<String> = std::env::args().collect();
    let catalog = Catalog::builtin();
    let style = StyleOptions::detect();
    let mut stdout = std::io::stdout().lock();

    let invocation = match cmd::parse(catalog, &argv) {
        Ok(inv) => inv,
        Err(err) => std::process::exit(cmd::report_parse_error(&err, &argv, &style, &mut stdout)),
    };

    utils::init_logging(utils::derive_level(invocation.verbose, invocation.quiet));

    let transport = match HttpTransport::new() {
        Ok(t) => t,
        Err(e) => {
            let err = CliError::Transport(format!("{e:#}"));
            let format = invocation.args.requested_format().unwrap_or(OutputFormat::Json);
            let text = cmd::render::render_failure(&err, format, &style);
            let _ = writeln!(stdout, "{text}");
            std::process::exit(err.outcome().exit_code());
        }
    };

    let outcome = Dispatcher::new(catalog, ConfigResolver::from_process(), transport)
        .with_style(style)
        .run(&invocation.group, &invocation.command, &invocation.args, &mut stdout);
    std::process::exit(outcome.exit_code());
}
