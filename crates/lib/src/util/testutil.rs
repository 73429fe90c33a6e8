//! Test utilities for alps-setup-lib.
//!
//! [`RecordingRunner`] stands in for the real process runner: it records
//! every invocation and answers with scripted exit codes, so pipeline tests
//! never need pip, git or cmake installed.

use std::sync::Mutex;

use crate::exec::{CommandRunner, Invocation, RunError};

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(windows)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), script.to_string()])
}

type Hook = Box<dyn Fn(&Invocation) + Send + Sync>;

/// A [`CommandRunner`] that records invocations instead of spawning them.
#[derive(Default)]
pub struct RecordingRunner {
  calls: Mutex<Vec<Invocation>>,
  failures: Vec<(String, i32)>,
  hooks: Vec<Hook>,
  failure_hooks: Vec<Hook>,
}

impl RecordingRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// A runner whose `-O <file>` downloads leave `file` behind in the
  /// invocation's directory.
  pub fn fetching() -> Self {
    Self::new().on_run(|inv| {
      let args = inv.arg_strings();
      if let (Some(cwd), Some("-O"), Some(file)) = (&inv.cwd, args.first().map(String::as_str), args.get(1)) {
        std::fs::write(cwd.join(file), b"archive bytes").unwrap();
      }
    })
  }

  /// Fail any invocation whose rendered command line contains `needle`.
  pub fn fail_when(mut self, needle: &str, code: i32) -> Self {
    self.failures.push((needle.to_string(), code));
    self
  }

  /// Run `hook` on every successful invocation, e.g. to create the files a
  /// real download or extraction would have produced.
  pub fn on_run(mut self, hook: impl Fn(&Invocation) + Send + Sync + 'static) -> Self {
    self.hooks.push(Box::new(hook));
    self
  }

  /// Run `hook` on every failing invocation, e.g. to leave behind the
  /// partial output a real tool would.
  pub fn on_fail(mut self, hook: impl Fn(&Invocation) + Send + Sync + 'static) -> Self {
    self.failure_hooks.push(Box::new(hook));
    self
  }

  pub fn calls(&self) -> Vec<Invocation> {
    self.calls.lock().unwrap().clone()
  }

  /// Rendered command lines, in call order.
  pub fn command_lines(&self) -> Vec<String> {
    self.calls().iter().map(ToString::to_string).collect()
  }

  pub fn count_program(&self, program: &str) -> usize {
    self.calls().iter().filter(|c| c.program == program).count()
  }

  pub fn count_matching(&self, needle: &str) -> usize {
    self.command_lines().iter().filter(|c| c.contains(needle)).count()
  }
}

impl CommandRunner for RecordingRunner {
  async fn run(&self, invocation: &Invocation) -> Result<(), RunError> {
    self.calls.lock().unwrap().push(invocation.clone());

    let command = invocation.to_string();
    if let Some((_, code)) = self.failures.iter().find(|(needle, _)| command.contains(needle.as_str())) {
      for hook in &self.failure_hooks {
        hook(invocation);
      }
      return Err(RunError::Failed {
        command,
        code: Some(*code),
      });
    }

    for hook in &self.hooks {
      hook(invocation);
    }
    Ok(())
  }
}
