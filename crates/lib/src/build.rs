//! Build, test and install phases against a configured build tree.

use std::fmt;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::environment::PlatformEnvironment;
use crate::exec::{CommandRunner, Invocation, RunError};

#[derive(Debug, Error)]
#[error("{phase} phase failed: {source}")]
pub struct BuildError {
  pub phase: Phase,
  #[source]
  pub source: RunError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Build,
  Test,
  Install,
}

impl Phase {
  /// Execution order; a phase only runs once every earlier one succeeded.
  pub const ALL: [Phase; 3] = [Phase::Build, Phase::Test, Phase::Install];

  pub fn as_str(&self) -> &'static str {
    match self {
      Phase::Build => "build",
      Phase::Test => "test",
      Phase::Install => "install",
    }
  }

  fn invocation(&self, cmake: &str, build_dir: &Path, jobs: usize) -> Invocation {
    match self {
      Phase::Build => Invocation::new(cmake)
        .arg("--build")
        .arg(build_dir)
        .arg("-j")
        .arg(jobs.to_string()),
      Phase::Test => Invocation::new(cmake).arg("--build").arg(build_dir).arg("-t").arg("test"),
      Phase::Install => Invocation::new(cmake).arg("--install").arg(build_dir),
    }
  }
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Drives the build tool for one configured build tree.
pub struct BuildRunner<'a, R> {
  runner: &'a R,
  cmake: &'a str,
  build_dir: &'a Path,
  jobs: usize,
  env: &'a PlatformEnvironment,
}

impl<'a, R: CommandRunner> BuildRunner<'a, R> {
  pub fn new(runner: &'a R, cmake: &'a str, build_dir: &'a Path, jobs: usize, env: &'a PlatformEnvironment) -> Self {
    Self {
      runner,
      cmake,
      build_dir,
      jobs: jobs.max(1),
      env,
    }
  }

  pub async fn run_phase(&self, phase: Phase) -> Result<(), BuildError> {
    info!(%phase, build_dir = %self.build_dir.display(), "running phase");
    let invocation = phase.invocation(self.cmake, self.build_dir, self.jobs).envs(&self.env.overrides);
    self
      .runner
      .run(&invocation)
      .await
      .map_err(|source| BuildError { phase, source })
  }

  /// Build, test, install, stopping at the first failure.
  pub async fn run_all(&self) -> Result<(), BuildError> {
    for phase in Phase::ALL {
      self.run_phase(phase).await?;
    }
    Ok(())
  }
}
