//! Command dispatch logic for maven-bridge

use super::common::{LogLevel, init_logging};
use super::{GetArgs, InitArgs, ServeArgs, get_artifact, init_config, serve_repository, validate_config};
use crate::{Host, Result};
use camino::Utf8PathBuf;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "maven-bridge", version, about, author)]
#[command(styles = CLAP_STYLES)]
struct Cli {
    /// Path to configuration file [default: one of bridge.[toml|yml|yaml|json] ]
    #[arg(long, short = 'c', value_name = "PATH", global = true)]
    config: Option<Utf8PathBuf>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: BridgeSubcommand,
}

#[derive(Subcommand, Debug)]
enum BridgeSubcommand {
    /// Resolve a repository path and print the document, redirect target, or headers
    Get(GetArgs),
    /// Generate a default configuration file
    Init(InitArgs),
    /// Serve the repository over HTTP for Maven and Gradle clients
    Serve(ServeArgs),
    /// Validate a configuration file
    Validate,
}

/// Parse `args` and run the selected command.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or the command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = Cli::parse_from(args);
    init_logging(cli.log_level);

    match &cli.command {
        BridgeSubcommand::Get(get_args) => get_artifact(host, cli.config.as_ref(), get_args).await,
        BridgeSubcommand::Init(init_args) => init_config(host, init_args),
        BridgeSubcommand::Serve(serve_args) => serve_repository(host, cli.config.as_deref(), serve_args).await,
        BridgeSubcommand::Validate => validate_config(host, cli.config.as_deref()),
    }
}
