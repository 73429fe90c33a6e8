//! Prerequisite installation through an external package manager.

use thiserror::Error;
use tracing::{debug, info};

use crate::config::ProvisionSpec;
use crate::exec::{CommandRunner, Invocation, RunError};

#[derive(Debug, Error)]
pub enum ProvisionError {
  /// The configured manager command is empty.
  #[error("no package manager configured")]
  NoManager,

  #[error("failed to install {packages}: {source}")]
  Install {
    packages: String,
    #[source]
    source: RunError,
  },
}

/// Install every configured package with a single `<manager> install ...` call.
///
/// Returns the number of packages requested. An empty package list is a no-op.
pub async fn provision(runner: &impl CommandRunner, spec: &ProvisionSpec) -> Result<usize, ProvisionError> {
  if spec.packages.is_empty() {
    debug!("no prerequisite packages configured, skipping");
    return Ok(0);
  }

  let (program, manager_args) = spec.manager.split_first().ok_or(ProvisionError::NoManager)?;

  info!(packages = ?spec.packages, manager = %spec.manager.join(" "), "installing prerequisites");

  let invocation = Invocation::new(program.as_str())
    .args(manager_args)
    .arg("install")
    .args(&spec.packages);

  runner
    .run(&invocation)
    .await
    .map_err(|source| ProvisionError::Install {
      packages: spec.packages.join(" "),
      source,
    })?;

  Ok(spec.packages.len())
}
