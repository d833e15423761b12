//! Expiry Check CLI Application
//!
//! Command-line interface for checking domain expiration dates over RDAP.
//! Argument parsing, configuration precedence and printing live here; the
//! lookups themselves are done by expiry-check-lib.

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args, CommandFactory, Parser, Subcommand};
use console::{style, Term};
use expiry_check_lib::{
    collect_domains, format_results, load_env_config, parse_timeout_string, CheckConfig,
    ConfigManager, EnvConfig, ExpiryChecker, FileConfig, InputSources, OutputFormat,
};
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for expiry-check
#[derive(Parser, Debug)]
#[command(name = "expiry-check")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Sai Dutt G.V <gvs46@protonmail.com>")]
#[command(about = "Check for domain expiration")]
#[command(
    long_about = "Check domain expiration dates using RDAP.\n\nThe RDAP service for each TLD is taken from the IANA bootstrap registry."
)]
#[command(styles = STYLES)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check domain expiration
    #[command(visible_alias = "c")]
    Check(CheckArgs),
}

#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Domain names to check, can be a comma-separated list or repeated
    #[arg(
        short = 'd',
        long = "domain",
        value_name = "DOMAIN",
        value_delimiter = ',',
        action = clap::ArgAction::Append,
        help_heading = "Domain Selection"
    )]
    pub domains: Vec<String>,

    /// Environment variable containing comma-separated domain names
    #[arg(short = 'e', long = "env", value_name = "NAME", help_heading = "Domain Selection")]
    pub env: Option<String>,

    /// Output format: json or text [default: text]
    #[arg(short = 'o', long = "output", value_name = "FORMAT", help_heading = "Output Format")]
    pub output: Option<OutputFormat>,

    /// HTTP timeout per request (e.g. 5s, 2m)
    #[arg(long = "timeout", value_name = "DURATION", value_parser = parse_timeout_arg, help_heading = "Protocol")]
    pub timeout: Option<Duration>,

    /// Alternative RDAP bootstrap registry URL
    #[arg(long = "bootstrap-url", value_name = "URL", help_heading = "Protocol")]
    pub bootstrap_url: Option<String>,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Command::Check(args)) => run_check(args).await,
        None => Cli::command().print_help().map_err(Into::into),
    };

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        process::exit(1);
    }
}

/// Route `tracing` output to stderr.
///
/// `RUST_LOG` wins; otherwise warnings only, or debug with `--verbose`.
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "expiry_check=debug,expiry_check_lib=debug"
    } else {
        "expiry_check=warn,expiry_check_lib=warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact()
        .init();
}

fn parse_timeout_arg(value: &str) -> Result<Duration, String> {
    match parse_timeout_string(value) {
        Some(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(format!(
            "invalid timeout '{}', use format like '5s', '30s', '2m'",
            value
        )),
    }
}

/// Main expiration checking logic
async fn run_check(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(&args, load_env_config())?;

    let sources = InputSources::new(args.domains.clone(), args.env.clone());
    let domains = {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut prompt = Term::stderr();
        collect_domains(&sources, &mut input, &mut prompt)?
    };
    tracing::debug!(count = domains.len(), "collected domains");

    let checker = ExpiryChecker::from_config(&config).await?;
    let results = checker.check_domains(&domains).await;

    print!("{}", format_results(&results, config.output)?);
    Ok(())
}

/// Resolve the run configuration: config file, then `EC_*` environment,
/// then CLI flags.
fn build_config(
    args: &CheckArgs,
    env_config: EnvConfig,
) -> Result<CheckConfig, Box<dyn std::error::Error>> {
    let config_manager = ConfigManager::new();

    let file_config = if let Some(explicit_config_path) = &args.config {
        tracing::debug!("Using explicit config file (CLI --config): {}", explicit_config_path);
        config_manager.load_file(explicit_config_path)?
    } else if let Some(env_config_path) = &env_config.config {
        tracing::debug!("Using explicit config file (EC_CONFIG env var): {}", env_config_path);
        config_manager.load_file(env_config_path)?
    } else {
        config_manager.discover_and_load()
    };

    let config = merge_file_config_into_check_config(CheckConfig::default(), file_config);
    let config = apply_environment_config(config, env_config);
    Ok(apply_cli_args_to_config(config, args))
}

/// Merge FileConfig into CheckConfig. Values were validated on load.
fn merge_file_config_into_check_config(
    mut config: CheckConfig,
    file_config: FileConfig,
) -> CheckConfig {
    if let Some(defaults) = file_config.defaults {
        if let Some(output) = defaults.output.and_then(|o| o.parse().ok()) {
            config.output = output;
        }
        if let Some(secs) = defaults.timeout.as_deref().and_then(parse_timeout_string) {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(url) = defaults.bootstrap_url {
            config.bootstrap_url = url;
        }
    }

    config
}

fn apply_environment_config(mut config: CheckConfig, env_config: EnvConfig) -> CheckConfig {
    if let Some(output) = env_config.output {
        config.output = output;
    }
    if let Some(secs) = env_config.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    if let Some(url) = env_config.bootstrap_url {
        config.bootstrap_url = url;
    }

    config
}

/// CLI args override both environment variables and config file settings.
fn apply_cli_args_to_config(mut config: CheckConfig, args: &CheckArgs) -> CheckConfig {
    if let Some(output) = args.output {
        config.output = output;
    }
    if let Some(timeout) = args.timeout {
        config.timeout = timeout;
    }
    if let Some(url) = &args.bootstrap_url {
        config.bootstrap_url = url.clone();
    }

    config
}
