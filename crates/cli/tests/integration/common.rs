//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

const DOWNLOAD_OK: &str = "echo archive > \"$2\"";

/// Isolated test environment.
///
/// Each test gets its own temporary directory holding the config file, the
/// work directory and stub executables standing in for pip, git, wget, tar
/// and cmake. The downloader stub writes the file named after `-O`; the
/// cmake stub appends its arguments to `cmake.log`.
pub struct TestEnv {
  pub temp: TempDir,
  pub config_path: PathBuf,
}

impl TestEnv {
  /// Every tool succeeds.
  pub fn new() -> Self {
    Self::with_cmake("")
  }

  /// The cmake stub runs `extra` (shell) after logging its arguments.
  pub fn with_cmake(extra: &str) -> Self {
    Self::with_stubs(DOWNLOAD_OK, extra)
  }

  /// The downloader stub runs `script` (shell), called as
  /// `<downloader> -O <file> <url>`.
  pub fn with_downloader(script: &str) -> Self {
    Self::with_stubs(script, "")
  }

  fn with_stubs(download: &str, cmake_extra: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let env = Self {
      config_path: temp.path().join("alps-setup.toml"),
      temp,
    };

    let noop = env.write_script("noop", "exit 0");
    let downloader = env.write_script("download", download);
    let cmake = env.write_script(
      "cmake",
      &format!("echo \"$@\" >> '{}'\n{}", env.cmake_log().display(), cmake_extra),
    );

    let config = format!(
      r#"
work_dir = '{work}'

[provision]
manager = ['{noop}']

[tools]
cmake = '{cmake}'
git = '{noop}'
downloader = '{downloader}'
extractor = '{noop}'
"#,
      work = env.work_dir().display(),
      noop = noop.display(),
      downloader = downloader.display(),
      cmake = cmake.display(),
    );
    std::fs::write(&env.config_path, config).unwrap();
    env
  }

  pub fn work_dir(&self) -> PathBuf {
    self.temp.path().join("work")
  }

  pub fn archive(&self) -> PathBuf {
    self.work_dir().join("boost_1_81_0.tar.gz")
  }

  pub fn cmake_log(&self) -> PathBuf {
    self.temp.path().join("cmake.log")
  }

  /// Lines the cmake stub logged, one per invocation.
  pub fn cmake_calls(&self) -> Vec<String> {
    std::fs::read_to_string(self.cmake_log())
      .unwrap_or_default()
      .lines()
      .map(String::from)
      .collect()
  }

  fn write_script(&self, name: &str, body: &str) -> PathBuf {
    let path = self.temp.path().join("bin").join(name);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    make_executable(&path);
    path
  }

  /// Get a pre-configured Command for the alps-setup binary.
  ///
  /// Points `--config` at the stub config and isolates the environment:
  /// - `XDG_CONFIG_HOME`: no user config picked up
  /// - `ALPS_SETUP_*`: removed so only the config file applies
  /// - `LD_LIBRARY_PATH`: fixed for predictable parameters
  pub fn alps_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("alps-setup");
    cmd.arg("--config").arg(&self.config_path);
    cmd.env("XDG_CONFIG_HOME", self.temp.path());
    cmd.env("LD_LIBRARY_PATH", "/z/lib");
    cmd.env_remove("ALPS_SETUP_CONFIG");
    cmd.env_remove("ALPS_SETUP_WORK_DIR");
    cmd.env_remove("ALPS_SETUP_PREFIX");
    cmd
  }
}

fn make_executable(path: &Path) {
  use std::os::unix::fs::PermissionsExt;

  let mut perms = std::fs::metadata(path).unwrap().permissions();
  perms.set_mode(0o755);
  std::fs::set_permissions(path, perms).unwrap();
}
