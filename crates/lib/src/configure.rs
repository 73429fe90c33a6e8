//! Build configuration: composing CMake parameters and generating the build graph.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::consts::{CXX_FLAGS, CXX_STANDARD};
use crate::environment::PlatformEnvironment;
use crate::exec::{CommandRunner, Invocation, RunError};

#[derive(Debug, Error)]
pub enum ConfigurationError {
  /// The configure tool is launched from a different directory than the
  /// installer, so relative paths would resolve somewhere else.
  #[error("{what} must be an absolute path, got '{}'", .path.display())]
  RelativePath { what: &'static str, path: PathBuf },

  #[error("cannot build library search path: {0}")]
  LibraryPath(#[from] std::env::JoinPathsError),

  #[error("failed to create build directory '{}': {source}", .path.display())]
  CreateBuildDir {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("build configuration failed: {0}")]
  Configure(#[source] RunError),
}

/// Ordered `-D<name>=<value>` definitions for the configure step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildParameterSet {
  entries: Vec<(String, String)>,
}

impl BuildParameterSet {
  pub fn get(&self, name: &str) -> Option<&str> {
    self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Render as command-line definitions.
  pub fn to_args(&self) -> Vec<String> {
    self.iter().map(|(k, v)| format!("-D{}={}", k, v)).collect()
  }
}

impl fmt::Display for BuildParameterSet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (name, value) in self.iter() {
      writeln!(f, "  {} = {}", name, value)?;
    }
    Ok(())
  }
}

/// Source and build trees for one configure/build cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildLayout {
  pub source_dir: PathBuf,
  pub build_dir: PathBuf,
}

/// Compose the parameter set.
///
/// `existing_library_path` is the current value of the platform's library
/// search variable. The dependency's `stage/lib` goes first and the existing
/// entries follow; with no existing value, `fallback_library_path` is used in
/// its place.
pub fn compose_parameters(
  install_prefix: &Path,
  dependency_root: &Path,
  existing_library_path: Option<OsString>,
  fallback_library_path: &Path,
) -> Result<BuildParameterSet, ConfigurationError> {
  require_absolute("install prefix", install_prefix)?;
  require_absolute("dependency root", dependency_root)?;

  let mut search = vec![dependency_root.join("stage").join("lib")];
  match existing_library_path.filter(|p| !p.is_empty()) {
    Some(existing) => search.extend(std::env::split_paths(&existing)),
    None => search.push(fallback_library_path.to_path_buf()),
  }
  let library_path = std::env::join_paths(search)?;

  let entries = vec![
    ("CMAKE_INSTALL_PREFIX", lossy(install_prefix)),
    ("Boost_ROOT_DIR", lossy(dependency_root)),
    ("CMAKE_CXX_STANDARD", CXX_STANDARD.to_string()),
    ("CMAKE_CXX_FLAGS", CXX_FLAGS.to_string()),
    ("CMAKE_LIBRARY_PATH", library_path.to_string_lossy().into_owned()),
  ];

  Ok(BuildParameterSet {
    entries: entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
  })
}

fn require_absolute(what: &'static str, path: &Path) -> Result<(), ConfigurationError> {
  if path.is_absolute() {
    Ok(())
  } else {
    Err(ConfigurationError::RelativePath {
      what,
      path: path.to_path_buf(),
    })
  }
}

fn lossy(path: &Path) -> String {
  path.to_string_lossy().into_owned()
}

/// Generate the build graph with a single configure invocation.
///
/// The build directory is created first; it already existing is fine.
pub async fn configure(
  runner: &impl CommandRunner,
  cmake: &str,
  layout: &BuildLayout,
  params: &BuildParameterSet,
  env: &PlatformEnvironment,
) -> Result<(), ConfigurationError> {
  std::fs::create_dir_all(&layout.build_dir).map_err(|source| ConfigurationError::CreateBuildDir {
    path: layout.build_dir.clone(),
    source,
  })?;

  info!(source = %layout.source_dir.display(), build = %layout.build_dir.display(), "configuring build");

  let invocation = Invocation::new(cmake)
    .arg("-S")
    .arg(&layout.source_dir)
    .arg("-B")
    .arg(&layout.build_dir)
    .args(params.to_args())
    .envs(&env.overrides);

  runner.run(&invocation).await.map_err(ConfigurationError::Configure)
}
