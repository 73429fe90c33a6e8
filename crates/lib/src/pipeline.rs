//! The install pipeline.
//!
//! Steps run strictly in sequence and the first failure ends the run. Nothing
//! already done is rolled back: the archive, extracted tree, working copy and
//! build tree stay on disk so the next run skips past them.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::artifact::{FetchError, FetchedArtifact, ensure_artifact};
use crate::build::{BuildError, BuildRunner};
use crate::config::SetupConfig;
use crate::configure::{BuildLayout, BuildParameterSet, ConfigurationError, compose_parameters, configure};
use crate::environment::{PlatformEnvironment, resolve_environment};
use crate::exec::CommandRunner;
use crate::gate::{ConfirmationPolicy, Decision, GateError};
use crate::platform::available_cpus;
use crate::platform::os::Os;
use crate::provision::{ProvisionError, provision};
use crate::source::{SyncAction, SyncError, sync_source};

#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("failed to prepare directory '{}': {source}", .path.display())]
  Workspace {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error(transparent)]
  Provision(#[from] ProvisionError),

  #[error(transparent)]
  Fetch(#[from] FetchError),

  #[error(transparent)]
  Sync(#[from] SyncError),

  #[error(transparent)]
  Configuration(#[from] ConfigurationError),

  #[error(transparent)]
  Gate(#[from] GateError),

  #[error(transparent)]
  Build(#[from] BuildError),
}

/// How a run ended when nothing failed.
#[derive(Debug)]
pub enum Outcome {
  Completed(Report),
  /// The operator declined the configuration; no build step ran.
  Aborted,
}

/// What a completed run did.
#[derive(Debug)]
pub struct Report {
  pub packages_provisioned: usize,
  pub artifact: FetchedArtifact,
  pub sync: SyncAction,
  pub environment: PlatformEnvironment,
  pub parameters: BuildParameterSet,
  pub layout: BuildLayout,
  pub install_prefix: PathBuf,
  pub elapsed: Duration,
}

/// The parameters a run would use, computed without running anything.
#[derive(Debug, Serialize)]
pub struct Plan {
  pub os: Os,
  pub work_dir: PathBuf,
  pub artifact_url: String,
  pub source_remote: String,
  pub layout: BuildLayout,
  pub environment: PlatformEnvironment,
  pub parameters: BuildParameterSet,
  pub jobs: usize,
}

/// Sequences provisioning, fetching, syncing, configuring, confirmation and
/// the build phases.
pub struct Pipeline<R, P> {
  config: SetupConfig,
  runner: R,
  policy: P,
  os: Os,
}

impl<R: CommandRunner, P: ConfirmationPolicy> Pipeline<R, P> {
  pub fn new(config: SetupConfig, runner: R, policy: P) -> Self {
    Self {
      config,
      runner,
      policy,
      os: Os::current(),
    }
  }

  /// Resolve the build environment as if running on `os`.
  pub fn with_os(mut self, os: Os) -> Self {
    self.os = os;
    self
  }

  pub async fn run(&mut self) -> Result<Outcome, PipelineError> {
    let start = Instant::now();
    let config = prepare_workspace(&self.config)?;
    let install_prefix = config.install_prefix();
    info!(work_dir = %config.work_dir.display(), prefix = %install_prefix.display(), "workspace ready");

    let packages_provisioned = provision(&self.runner, &config.provision).await?;

    let artifact = ensure_artifact(&self.runner, &config.artifact, &config.tools, &config.work_dir).await?;

    let sync = sync_source(
      &self.runner,
      &config.tools.git,
      &config.source.remote,
      &config.source_dir(),
    )
    .await?;

    let environment = resolve_environment(self.os, &config.sdk);

    let parameters = compose_parameters(
      &install_prefix,
      &artifact.root,
      library_path(self.os),
      &config.work_dir,
    )?;
    let layout = BuildLayout {
      source_dir: config.source_dir(),
      build_dir: config.build_dir(),
    };
    configure(&self.runner, &config.tools.cmake, &layout, &parameters, &environment).await?;

    if self.policy.confirm(&summary(&parameters, &environment))? == Decision::Abort {
      info!("configuration declined by operator");
      return Ok(Outcome::Aborted);
    }

    let jobs = config.jobs.unwrap_or_else(available_cpus);
    BuildRunner::new(&self.runner, &config.tools.cmake, &layout.build_dir, jobs, &environment)
      .run_all()
      .await?;

    info!(prefix = %install_prefix.display(), "installation complete");
    Ok(Outcome::Completed(Report {
      packages_provisioned,
      artifact,
      sync,
      environment,
      parameters,
      layout,
      install_prefix,
      elapsed: start.elapsed(),
    }))
  }
}

/// Compute what `run` would pass to the build tool, touching nothing on disk.
pub fn plan(config: &SetupConfig, os: Os) -> Result<Plan, PipelineError> {
  let work_dir = std::path::absolute(&config.work_dir).map_err(|source| PipelineError::Workspace {
    path: config.work_dir.clone(),
    source,
  })?;
  let config = SetupConfig {
    work_dir: work_dir.clone(),
    ..config.clone()
  };

  let environment = resolve_environment(os, &config.sdk);
  let dependency_root = work_dir.join(config.artifact.stem());
  let parameters = compose_parameters(&config.install_prefix(), &dependency_root, library_path(os), &work_dir)?;

  Ok(Plan {
    os,
    artifact_url: config.artifact.url(),
    source_remote: config.source.remote.clone(),
    layout: BuildLayout {
      source_dir: config.source_dir(),
      build_dir: config.build_dir(),
    },
    environment,
    parameters,
    jobs: config.jobs.unwrap_or_else(available_cpus),
    work_dir,
  })
}

/// Create the work and install directories and make every configured path absolute.
fn prepare_workspace(config: &SetupConfig) -> Result<SetupConfig, PipelineError> {
  let work_dir = create_absolute(&config.work_dir)?;
  let mut prepared = SetupConfig {
    work_dir,
    ..config.clone()
  };
  prepared.install_prefix = Some(create_absolute(&prepared.install_prefix())?);
  Ok(prepared)
}

fn create_absolute(path: &Path) -> Result<PathBuf, PipelineError> {
  let workspace_err = |source| PipelineError::Workspace {
    path: path.to_path_buf(),
    source,
  };
  std::fs::create_dir_all(path).map_err(workspace_err)?;
  dunce::canonicalize(path).map_err(workspace_err)
}

fn library_path(os: Os) -> Option<OsString> {
  std::env::var_os(os.library_path_var())
}

fn summary(parameters: &BuildParameterSet, environment: &PlatformEnvironment) -> String {
  let mut text = String::from("Build configuration:\n");
  text.push_str(&parameters.to_string());
  if !environment.overrides.is_empty() {
    text.push_str("Environment:\n");
    for (key, value) in &environment.overrides {
      text.push_str(&format!("  {}={}\n", key, value));
    }
  }
  text
}
