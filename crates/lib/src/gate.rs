//! Operator confirmation between configuration and compilation.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::info;

pub const PROMPT: &str = "Confirm Building Configurations? (y/n): ";

#[derive(Debug, Error)]
pub enum GateError {
  #[error("failed to read confirmation: {0}")]
  Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
  Proceed,
  Abort,
}

/// Decides whether the configured build may go ahead.
pub trait ConfirmationPolicy {
  /// `summary` describes the composed configuration being approved.
  fn confirm(&mut self, summary: &str) -> Result<Decision, GateError>;
}

/// Only a single `y`, in either case and with surrounding whitespace
/// ignored, is a yes.
pub fn accepts(input: &str) -> bool {
  input.trim().eq_ignore_ascii_case("y")
}

/// Shows the summary and reads one line of answer.
///
/// End of input counts as an empty answer.
pub struct PromptPolicy<R, W> {
  input: R,
  output: W,
}

impl<R: BufRead, W: Write> PromptPolicy<R, W> {
  pub fn new(input: R, output: W) -> Self {
    Self { input, output }
  }
}

impl PromptPolicy<io::StdinLock<'static>, io::Stderr> {
  /// Prompt on stderr, answer from stdin.
  pub fn stdio() -> Self {
    Self::new(io::stdin().lock(), io::stderr())
  }
}

impl<R: BufRead, W: Write> ConfirmationPolicy for PromptPolicy<R, W> {
  fn confirm(&mut self, summary: &str) -> Result<Decision, GateError> {
    writeln!(self.output, "{}", summary)?;
    write!(self.output, "{}", PROMPT)?;
    self.output.flush()?;

    let mut answer = String::new();
    self.input.read_line(&mut answer)?;

    Ok(if accepts(&answer) {
      Decision::Proceed
    } else {
      Decision::Abort
    })
  }
}

/// Unattended runs: approves without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

impl ConfirmationPolicy for AutoApprove {
  fn confirm(&mut self, _summary: &str) -> Result<Decision, GateError> {
    info!("configuration auto-approved");
    Ok(Decision::Proceed)
  }
}

impl<P: ConfirmationPolicy + ?Sized> ConfirmationPolicy for Box<P> {
  fn confirm(&mut self, summary: &str) -> Result<Decision, GateError> {
    (**self).confirm(summary)
  }
}
