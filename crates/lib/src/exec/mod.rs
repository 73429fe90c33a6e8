//! External process invocation.
//!
//! Every tool the installer drives (package manager, downloader, extractor,
//! git, cmake) goes through [`CommandRunner`]. Environment overrides and the
//! working directory travel with each [`Invocation`], so running a step never
//! touches the installer's own process state.

mod runner;

pub use runner::ProcessRunner;

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Errors raised while running an external command.
#[derive(Debug, Error)]
pub enum RunError {
  /// The program could not be started at all (usually: not on PATH).
  #[error("failed to start '{program}': {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// The program ran and exited unsuccessfully.
  #[error("command failed with exit code {}: {command}", display_code(.code))]
  Failed { command: String, code: Option<i32> },

  /// The program exceeded the configured timeout and was killed.
  #[error("command timed out after {}s: {command}", .after.as_secs())]
  TimedOut { command: String, after: Duration },

  /// I/O error while waiting on the child.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

fn display_code(code: &Option<i32>) -> String {
  match code {
    Some(code) => code.to_string(),
    None => "none (terminated by signal)".to_string(),
  }
}

/// A single external command: program, arguments, working directory and the
/// environment variables layered on top of the inherited environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  pub program: String,
  pub args: Vec<OsString>,
  pub cwd: Option<PathBuf>,
  pub env: BTreeMap<String, String>,
}

impl Invocation {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: None,
      env: BTreeMap::new(),
    }
  }

  pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
    self.cwd = Some(dir.as_ref().to_path_buf());
    self
  }

  pub fn envs(mut self, env: &BTreeMap<String, String>) -> Self {
    self.env.extend(env.iter().map(|(k, v)| (k.clone(), v.clone())));
    self
  }

  /// Arguments as lossy strings, mostly for assertions and log lines.
  pub fn arg_strings(&self) -> Vec<String> {
    self.args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
  }
}

impl fmt::Display for Invocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program)?;
    for arg in &self.args {
      let arg = arg.to_string_lossy();
      if arg.contains(char::is_whitespace) {
        write!(f, " \"{}\"", arg)?;
      } else {
        write!(f, " {}", arg)?;
      }
    }
    Ok(())
  }
}

/// Runs invocations to completion, one at a time.
///
/// Implementations must block (asynchronously) until the child exits and map
/// a non-zero exit to [`RunError::Failed`].
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
  async fn run(&self, invocation: &Invocation) -> Result<(), RunError>;
}

impl<R: CommandRunner> CommandRunner for &R {
  async fn run(&self, invocation: &Invocation) -> Result<(), RunError> {
    (**self).run(invocation).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_quotes_arguments_with_spaces() {
    let inv = Invocation::new("cmake")
      .arg("-S")
      .arg("alps-src")
      .arg("-DCMAKE_CXX_FLAGS=-std=c++11 -stdlib=libc++");

    assert_eq!(
      inv.to_string(),
      "cmake -S alps-src \"-DCMAKE_CXX_FLAGS=-std=c++11 -stdlib=libc++\""
    );
  }

  #[test]
  fn envs_merge_into_existing_overrides() {
    let mut overrides = BTreeMap::new();
    overrides.insert("CC".to_string(), "clang".to_string());

    let inv = Invocation::new("cmake").envs(&overrides);

    assert_eq!(inv.env.get("CC").map(String::as_str), Some("clang"));
  }

  #[test]
  fn failed_error_mentions_signal_when_no_code() {
    let err = RunError::Failed {
      command: "git pull".to_string(),
      code: None,
    };
    assert!(err.to_string().contains("terminated by signal"));
  }
}
