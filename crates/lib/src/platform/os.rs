use std::fmt;

/// Operating systems the installer knows how to prepare a build for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
  Linux,
  MacOs,
  Windows,
}

impl Os {
  /// Detect the current operating system at runtime.
  ///
  /// Hosts that are neither macOS nor Windows get the Linux treatment: no SDK
  /// resolution and `LD_LIBRARY_PATH` as the library search variable.
  pub fn current() -> Self {
    match std::env::consts::OS {
      "macos" => Self::MacOs,
      "windows" => Self::Windows,
      _ => Self::Linux,
    }
  }

  /// Returns the lowercase string identifier for this OS
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Linux => "linux",
      Self::MacOs => "darwin",
      Self::Windows => "windows",
    }
  }

  /// Whether the native toolchain needs an explicit SDK root to find system headers.
  pub fn requires_sdk(&self) -> bool {
    matches!(self, Self::MacOs)
  }

  /// Environment variable the dynamic loader searches for shared libraries.
  pub fn library_path_var(&self) -> &'static str {
    match self {
      Self::Linux => "LD_LIBRARY_PATH",
      Self::MacOs => "DYLD_LIBRARY_PATH",
      Self::Windows => "PATH",
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
