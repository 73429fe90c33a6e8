//! Implementation of the `alps-setup install` command.
//!
//! Runs the full pipeline: prerequisites, Boost archive, ALPS working copy,
//! configuration, confirmation, then build, test and install.

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use alps_setup_lib::consts::EXIT_ABORTED;
use alps_setup_lib::exec::ProcessRunner;
use alps_setup_lib::source::SyncAction;
use alps_setup_lib::{Outcome, Pipeline, Report};

use crate::PathArgs;
use crate::output::{format_duration, print_info, print_stat, print_success, print_warning};
use crate::prompts::confirmation_policy;

/// Execute the install command.
///
/// Exits with [`EXIT_ABORTED`] when the operator declines the configuration,
/// which is not treated as an error.
pub fn cmd_install(config: Option<&Path>, paths: PathArgs, yes: bool, timeout: Option<Duration>) -> Result<ExitCode> {
  let mut setup = super::load_config(config, paths)?;
  setup.assume_yes |= yes;
  let timeout = timeout.or(setup.timeout_secs.map(Duration::from_secs));
  debug!(?setup, ?timeout, "resolved configuration");

  print_info(&format!("Setting up ALPS in {}", setup.work_dir.display()));

  let policy = confirmation_policy(setup.assume_yes);
  let mut pipeline = Pipeline::new(setup, ProcessRunner::with_timeout(timeout), policy);

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let outcome = rt.block_on(pipeline.run()).context("Install failed")?;

  match outcome {
    Outcome::Completed(report) => {
      print_report(&report);
      Ok(ExitCode::SUCCESS)
    }
    Outcome::Aborted => {
      print_warning("Exiting due to unexpected configuration.");
      Ok(ExitCode::from(EXIT_ABORTED))
    }
  }
}

fn print_report(report: &Report) {
  for warning in &report.environment.warnings {
    print_warning(warning);
  }

  println!();
  print_success("ALPS installed!");
  print_stat("Prefix", report.install_prefix.display());
  print_stat("Packages", report.packages_provisioned);
  print_stat("Boost", boost_status(report));
  print_stat(
    "Source",
    match report.sync {
      SyncAction::Cloned => "cloned",
      SyncAction::Pulled => "updated",
    },
  );
  if let Some(sdk) = report.environment.sdk_root() {
    print_stat("SDKROOT", sdk);
  }
  print_stat("Duration", format_duration(report.elapsed));
}

fn boost_status(report: &Report) -> String {
  let state = match (report.artifact.downloaded, report.artifact.extracted) {
    (true, _) => "downloaded",
    (false, true) => "extracted from cached archive",
    (false, false) => "cached",
  };
  format!("{} ({})", report.artifact.root.display(), state)
}
