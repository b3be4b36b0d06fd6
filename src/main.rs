//! sh-profile CLI
//!
//! Profile a local command and open it in the Firefox Profiler.
//! Everything after `--` is the command to run.

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use env_logger::Env;
use std::ffi::OsString;

use sh_profile::commands::{execute_profile, validate_args, ProfileArgs};
use sh_profile::utils::config::{DEFAULT_BIND_HOST, DEFAULT_VISUALIZER_ORIGIN};

/// Run a command and view its output, line by line, in the Firefox Profiler
#[derive(Parser, Debug)]
#[command(name = "sh-profile")]
#[command(version, about, long_about = None)]
#[command(after_help = "Example:\n  sh-profile -- brew upgrade")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the profiler URL instead of opening a browser
    #[arg(long)]
    no_browser: bool,

    /// Profiler origin to open the profile in
    #[arg(long, env = "SH_PROFILE_PROFILER_URL", default_value = DEFAULT_VISUALIZER_ORIGIN)]
    profiler_url: String,

    /// Interface to serve the profile on
    #[arg(long, env = "SH_PROFILE_BIND", default_value = DEFAULT_BIND_HOST)]
    bind: String,

    /// The command to run, given after `--`
    #[arg(last = true, value_name = "COMMAND")]
    command: Vec<String>,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = parse_cli();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let args = ProfileArgs {
        command: cli.command,
        open_browser: !cli.no_browser,
        visualizer_origin: cli.profiler_url,
        bind_host: cli.bind,
    };

    // Validate args first
    validate_args(&args)?;

    execute_profile(args)
}

const NO_COMMAND: &str = "No command was given";
const NO_SEPARATOR: &str = "No -- was found at the start of the command";

/// Why the command line was rejected
#[derive(Debug)]
enum CliRejection {
    /// Our own usage error, printed with the full help
    Usage(&'static str),
    /// Anything else clap reports (help, version, bad flag values)
    Clap(clap::Error),
}

/// Parse arguments, turning a missing command or missing `--` into a
/// usage error with the full help on stderr
fn parse_cli() -> Cli {
    match check_cli(std::env::args_os()) {
        Ok(cli) => cli,
        Err(CliRejection::Usage(reason)) => usage_error(reason),
        Err(CliRejection::Clap(e)) => e.exit(),
    }
}

fn check_cli<I, T>(argv: I) -> Result<Cli, CliRejection>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
    let has_separator = argv.iter().skip(1).any(|arg| arg == "--");

    match Cli::try_parse_from(argv) {
        Ok(cli) if cli.command.is_empty() => Err(CliRejection::Usage(NO_COMMAND)),
        Ok(cli) => Ok(cli),
        // Without `--` the command's words look like unknown arguments
        Err(e) if e.kind() == ErrorKind::UnknownArgument && !has_separator => {
            Err(CliRejection::Usage(NO_SEPARATOR))
        }
        Err(e) => Err(CliRejection::Clap(e)),
    }
}

fn usage_error(reason: &str) -> ! {
    eprintln!("{}\n", reason);
    eprintln!("{}", Cli::command().render_help());
    std::process::exit(1);
}
