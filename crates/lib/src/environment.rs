//! Compiler and SDK environment resolution.
//!
//! The result is an explicit override map handed to every build-tool
//! invocation. The installer's own process environment is left untouched.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::consts::{PINNED_SDK, SDK_CONTAINER, SDK_PREFIX, SDK_SUFFIX};
use crate::platform::os::Os;

/// Where to look for a macOS SDK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SdkLayout {
  /// The SDK the build is known to work with; used verbatim when present.
  pub pinned: PathBuf,
  /// Directory scanned for `MacOSX*.sdk` when the pinned SDK is missing.
  pub container: PathBuf,
}

impl Default for SdkLayout {
  fn default() -> Self {
    let container = PathBuf::from(SDK_CONTAINER);
    Self {
      pinned: container.join(PINNED_SDK),
      container,
    }
  }
}

/// Environment overrides for build subprocesses on one platform.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PlatformEnvironment {
  pub os: Option<Os>,
  pub overrides: BTreeMap<String, String>,
  /// Degraded-resolution notices; never fatal.
  pub warnings: Vec<String>,
}

impl PlatformEnvironment {
  pub fn sdk_root(&self) -> Option<&str> {
    self.overrides.get("SDKROOT").map(String::as_str)
  }
}

/// Resolve the overrides needed to build on `os`.
///
/// Only macOS gets any: `CC`/`CXX` pinned to clang and `SDKROOT` pointing at
/// the pinned SDK or, failing that, the greatest `MacOSX*.sdk` by string
/// comparison. A missing SDK is reported as a warning and `SDKROOT` is left
/// unset so the toolchain default can still be tried.
pub fn resolve_environment(os: Os, layout: &SdkLayout) -> PlatformEnvironment {
  let mut env = PlatformEnvironment {
    os: Some(os),
    ..Default::default()
  };

  if !os.requires_sdk() {
    debug!(%os, "no environment overrides needed");
    return env;
  }

  info!("detected macOS, resolving compiler and SDK");
  env.overrides.insert("CC".to_string(), "clang".to_string());
  env.overrides.insert("CXX".to_string(), "clang++".to_string());

  match find_sdk(layout) {
    Ok(sdk) => {
      info!(sdkroot = %sdk.display(), "using SDK");
      env.overrides.insert("SDKROOT".to_string(), sdk.to_string_lossy().into_owned());
    }
    Err(message) => {
      warn!("{}", message);
      env.warnings.push(message);
    }
  }

  env
}

fn find_sdk(layout: &SdkLayout) -> Result<PathBuf, String> {
  if layout.pinned.exists() {
    return Ok(layout.pinned.clone());
  }
  debug!(pinned = %layout.pinned.display(), "pinned SDK not found, scanning for the latest");

  let entries = std::fs::read_dir(&layout.container).map_err(|_| {
    format!(
      "SDK directory {} not found; check your Xcode command line tools installation",
      layout.container.display()
    )
  })?;

  let names = entries
    .flatten()
    .filter_map(|entry| entry.file_name().into_string().ok());

  latest_sdk(names)
    .map(|name| layout.container.join(name))
    .ok_or_else(|| {
      format!(
        "no macOS SDK found in {}; check your Xcode command line tools installation",
        layout.container.display()
      )
    })
}

/// Pick the lexicographically greatest `MacOSX*.sdk` name.
///
/// String order approximates "newest" and misorders differing digit counts
/// (`MacOSX9.sdk` sorts after `MacOSX10.sdk`).
pub fn latest_sdk(names: impl IntoIterator<Item = String>) -> Option<String> {
  names
    .into_iter()
    .filter(|name| name.starts_with(SDK_PREFIX) && name.ends_with(SDK_SUFFIX))
    .max()
}
