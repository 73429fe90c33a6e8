mod cmd;
mod output;
mod prompts;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use alps_setup_lib::consts::EXIT_FAILURE;

use crate::output::{OutputFormat, print_error};

/// alps-setup - fetch, configure, build and install ALPS
#[derive(Parser)]
#[command(name = "alps-setup")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Path to a TOML config file (default: $ALPS_SETUP_CONFIG, then ~/.config/alps-setup/config.toml)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

/// Overrides shared by commands that resolve install paths.
#[derive(Args, Debug, Default)]
pub struct PathArgs {
  /// Directory for the archive, working copy and build tree
  #[arg(long)]
  work_dir: Option<PathBuf>,

  /// Install prefix for the built artifacts
  #[arg(long)]
  prefix: Option<PathBuf>,

  /// Parallel build jobs (default: number of processors)
  #[arg(short, long)]
  jobs: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
  /// Provision, fetch, configure, build, test and install
  Install {
    #[command(flatten)]
    paths: PathArgs,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,

    /// Kill any external command running longer than this (e.g. "45m")
    #[arg(long, value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,
  },

  /// Show the environment and build parameters an install would use
  Plan {
    #[command(flatten)]
    paths: PathArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    output: OutputFormat,
  },

  /// Show platform information
  Info,
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let config = cli.config.as_deref();
  let result = match cli.command {
    Commands::Install { paths, yes, timeout } => cmd::cmd_install(config, paths, yes, timeout),
    Commands::Plan { paths, output } => cmd::cmd_plan(config, paths, output),
    Commands::Info => cmd::cmd_info(config),
  };

  match result {
    Ok(code) => code,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::from(EXIT_FAILURE)
    }
  }
}

fn init_tracing(verbose: bool) {
  let default = if verbose {
    "alps_setup_lib=debug,alps_setup_cli=debug"
  } else {
    "alps_setup_lib=info,alps_setup_cli=info"
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}
