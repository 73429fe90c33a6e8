pub mod os;
pub mod paths;

use os::Os;
use std::fmt;

/// Host description printed by `alps-setup info` and recorded in plans.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Platform {
  pub os: Os,
  pub arch: &'static str,
  pub cpus: usize,
}

impl Platform {
  /// Detect the current platform at runtime
  pub fn current() -> Self {
    Self {
      os: Os::current(),
      arch: std::env::consts::ARCH,
      cpus: available_cpus(),
    }
  }

  /// Returns the platform triple string (e.g., "aarch64-darwin")
  pub fn triple(&self) -> String {
    format!("{}-{}", self.arch, self.os)
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.triple())
  }
}

/// Number of processors the build tool may use, falling back to one when undetectable.
pub fn available_cpus() -> usize {
  std::thread::available_parallelism().map(|p| p.get()).unwrap_or(1)
}
