mod info;
mod install;
mod plan;

pub use info::cmd_info;
pub use install::cmd_install;
pub use plan::cmd_plan;

use std::path::Path;

use anyhow::{Context, Result};

use alps_setup_lib::SetupConfig;

use crate::PathArgs;

/// Load the layered config and apply command-line overrides on top.
fn load_config(config: Option<&Path>, paths: PathArgs) -> Result<SetupConfig> {
  let mut setup = SetupConfig::load(config).context("Failed to load configuration")?;

  if let Some(work_dir) = paths.work_dir {
    setup.work_dir = work_dir;
  }
  if let Some(prefix) = paths.prefix {
    setup.install_prefix = Some(prefix);
  }
  if let Some(jobs) = paths.jobs {
    setup.jobs = Some(jobs);
  }

  Ok(setup)
}
