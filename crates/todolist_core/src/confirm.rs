//! Confirmation collaborator contract.
//!
//! Destructive operations ask this capability before acting; the prompt
//! message names what is about to be deleted so the user decides on the
//! live state, not a stale snapshot.

/// Blocking yes/no prompt consumed by the state core.
pub trait ConfirmPrompt {
    /// Presents `message` and returns the user's decision.
    fn confirm(&mut self, message: &str) -> bool;
}

/// Accepts every prompt. Useful when confirmation is delegated elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl ConfirmPrompt for AlwaysConfirm {
    fn confirm(&mut self, _message: &str) -> bool {
        true
    }
}

/// Declines every prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConfirm;

impl ConfirmPrompt for NeverConfirm {
    fn confirm(&mut self, _message: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::{AlwaysConfirm, ConfirmPrompt, NeverConfirm};

    #[test]
    fn fixed_prompts_answer_consistently() {
        assert!(AlwaysConfirm.confirm("delete everything?"));
        assert!(!NeverConfirm.confirm("delete everything?"));
    }
}
