//! Installer configuration.
//!
//! Values are layered, later layers winning: built-in defaults, a TOML file,
//! `ALPS_SETUP_*` environment variables, then whatever the CLI sets directly
//! on the loaded [`SetupConfig`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::artifact::PinnedArtifact;
use crate::consts::{
  ALPS_REPOSITORY, BUILD_DIR_NAME, ENV_CONFIG, ENV_PREFIX, ENV_WORK_DIR, PROVISION_PACKAGES, SOURCE_DIR_NAME,
  WORK_DIR_NAME,
};
use crate::environment::SdkLayout;
use crate::platform::paths::default_config_file;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("config file not found: {0}")]
  NotFound(PathBuf),

  #[error("failed to read config file '{path}': {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid config file '{path}': {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SetupConfig {
  /// Directory holding the archive, the working copy and the build tree.
  pub work_dir: PathBuf,
  /// Install destination; `<work_dir>/install/alps` when unset.
  pub install_prefix: Option<PathBuf>,
  /// Skip the interactive confirmation.
  pub assume_yes: bool,
  /// Parallel build jobs; the host's processor count when unset.
  pub jobs: Option<usize>,
  /// Per-command timeout in seconds; commands may run forever when unset.
  pub timeout_secs: Option<u64>,
  pub artifact: PinnedArtifact,
  pub source: SourceSpec,
  pub provision: ProvisionSpec,
  pub tools: ToolSpec,
  pub sdk: SdkLayout,
}

impl Default for SetupConfig {
  fn default() -> Self {
    Self {
      work_dir: PathBuf::from(WORK_DIR_NAME),
      install_prefix: None,
      assume_yes: false,
      jobs: None,
      timeout_secs: None,
      artifact: PinnedArtifact::default(),
      source: SourceSpec::default(),
      provision: ProvisionSpec::default(),
      tools: ToolSpec::default(),
      sdk: SdkLayout::default(),
    }
  }
}

/// The repository to build and where its trees live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceSpec {
  pub remote: String,
  /// Working copy location, relative paths resolve against `work_dir`.
  pub path: PathBuf,
  /// Build tree location, relative paths resolve against `work_dir`.
  pub build_dir: PathBuf,
}

impl Default for SourceSpec {
  fn default() -> Self {
    Self {
      remote: ALPS_REPOSITORY.to_string(),
      path: PathBuf::from(SOURCE_DIR_NAME),
      build_dir: PathBuf::from(BUILD_DIR_NAME),
    }
  }
}

/// Prerequisites installed before anything is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProvisionSpec {
  /// Package manager command line; `install <packages>` is appended.
  pub manager: Vec<String>,
  pub packages: Vec<String>,
}

impl Default for ProvisionSpec {
  fn default() -> Self {
    Self {
      manager: vec!["python3".to_string(), "-m".to_string(), "pip".to_string()],
      packages: PROVISION_PACKAGES.iter().map(|p| p.to_string()).collect(),
    }
  }
}

/// Programs used for each external step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolSpec {
  pub cmake: String,
  pub git: String,
  pub downloader: String,
  pub extractor: String,
}

impl Default for ToolSpec {
  fn default() -> Self {
    Self {
      cmake: "cmake".to_string(),
      git: "git".to_string(),
      downloader: "wget".to_string(),
      extractor: "tar".to_string(),
    }
  }
}

impl SetupConfig {
  /// Load configuration from `explicit`, else `ALPS_SETUP_CONFIG`, else the
  /// per-user config file if it exists, else defaults. Environment overrides
  /// are applied on top.
  ///
  /// A path named explicitly (argument or environment) must exist.
  pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
    let named = explicit
      .map(Path::to_path_buf)
      .or_else(|| std::env::var_os(ENV_CONFIG).map(PathBuf::from));

    let mut config = match named {
      Some(path) => Self::from_file(&path)?,
      None => match default_config_file().filter(|p| p.is_file()) {
        Some(path) => Self::from_file(&path)?,
        None => {
          debug!("no config file, using defaults");
          Self::default()
        }
      },
    };

    config.apply_env();
    Ok(config)
  }

  pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
    if !path.exists() {
      return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    debug!(path = %path.display(), "loaded config file");
    Self::from_toml(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(content)
  }

  fn apply_env(&mut self) {
    if let Some(dir) = std::env::var_os(ENV_WORK_DIR) {
      self.work_dir = PathBuf::from(dir);
    }
    if let Some(prefix) = std::env::var_os(ENV_PREFIX) {
      self.install_prefix = Some(PathBuf::from(prefix));
    }
  }

  /// Install prefix, relative to `work_dir` when not absolute.
  pub fn install_prefix(&self) -> PathBuf {
    match &self.install_prefix {
      Some(prefix) => self.within_work_dir(prefix),
      None => self.work_dir.join("install").join("alps"),
    }
  }

  pub fn source_dir(&self) -> PathBuf {
    self.within_work_dir(&self.source.path)
  }

  pub fn build_dir(&self) -> PathBuf {
    self.within_work_dir(&self.source.build_dir)
  }

  fn within_work_dir(&self, path: &Path) -> PathBuf {
    if path.is_absolute() {
      path.to_path_buf()
    } else {
      self.work_dir.join(path)
    }
  }
}
