use alps_setup_lib::gate::{AutoApprove, ConfirmationPolicy, PromptPolicy};

/// Pick how the configuration gets approved: `--yes` or `assume_yes` skip the
/// question, otherwise the operator answers on stdin.
pub fn confirmation_policy(assume_yes: bool) -> Box<dyn ConfirmationPolicy> {
  if assume_yes {
    Box::new(AutoApprove)
  } else {
    Box::new(PromptPolicy::stdio())
  }
}
