//! Implementation of the `alps-setup plan` command.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};

use alps_setup_lib::platform::os::Os;
use alps_setup_lib::plan;

use crate::PathArgs;
use crate::output::{OutputFormat, print_json, print_section, print_stat, print_warning};

/// Print what `install` would pass to the build tool without running anything.
pub fn cmd_plan(config: Option<&Path>, paths: PathArgs, output: OutputFormat) -> Result<ExitCode> {
  let setup = super::load_config(config, paths)?;
  let plan = plan(&setup, Os::current()).context("Failed to compute plan")?;

  if output.is_json() {
    print_json(&plan)?;
    return Ok(ExitCode::SUCCESS);
  }

  print_stat("Platform", plan.os);
  print_stat("Work dir", plan.work_dir.display());
  print_stat("Boost", &plan.artifact_url);
  print_stat("Source", &plan.source_remote);
  print_stat("Source dir", plan.layout.source_dir.display());
  print_stat("Build dir", plan.layout.build_dir.display());
  print_stat("Jobs", plan.jobs);

  if !plan.environment.overrides.is_empty() {
    print_section(
      "Environment",
      plan.environment.overrides.iter().map(|(k, v)| (k.as_str(), v.as_str())),
    );
  }
  print_section("Build parameters", plan.parameters.iter());

  for warning in &plan.environment.warnings {
    print_warning(warning);
  }

  Ok(ExitCode::SUCCESS)
}
