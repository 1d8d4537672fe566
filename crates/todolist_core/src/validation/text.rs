//! Text validation and sanitization rules.
//!
//! # Responsibility
//! - Reject empty or oversized todo text with typed errors.
//! - Normalize accepted text into its canonical stored form.
//!
//! # Invariants
//! - `sanitize(sanitize(x)) == sanitize(x)` for every input.
//! - Sanitized output never exceeds `MAX_TEXT_CHARS` characters.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Upper bound on todo text length, counted in Unicode scalar values.
pub const MAX_TEXT_CHARS: usize = 500;

/// Validation failures for raw todo text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextError {
    /// Trimmed input is empty.
    Empty,
    /// Trimmed input exceeds `MAX_TEXT_CHARS`.
    TooLong { chars: usize },
}

impl Display for TextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "todo text cannot be empty"),
            Self::TooLong { chars } => write!(
                f,
                "todo text is {chars} characters, cannot exceed {MAX_TEXT_CHARS}"
            ),
        }
    }
}

impl Error for TextError {}

/// Checks raw text against the acceptance rules without modifying it.
pub fn validate_text(raw: &str) -> Result<(), TextError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TextError::Empty);
    }
    let chars = trimmed.chars().count();
    if chars > MAX_TEXT_CHARS {
        return Err(TextError::TooLong { chars });
    }
    Ok(())
}

/// Normalizes raw text into canonical stored form.
///
/// Trims, collapses internal whitespace runs to a single space and truncates
/// to `MAX_TEXT_CHARS`. Pure and total.
pub fn sanitize(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= MAX_TEXT_CHARS {
        return collapsed;
    }
    collapsed.chars().take(MAX_TEXT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::{sanitize, validate_text, TextError, MAX_TEXT_CHARS};

    #[test]
    fn validate_accepts_plain_text() {
        assert_eq!(validate_text("buy milk"), Ok(()));
    }

    #[test]
    fn validate_rejects_empty_and_whitespace_input() {
        assert_eq!(validate_text(""), Err(TextError::Empty));
        assert_eq!(validate_text("   \t\n"), Err(TextError::Empty));
    }

    #[test]
    fn validate_rejects_oversized_input() {
        let long = "x".repeat(MAX_TEXT_CHARS + 1);
        assert_eq!(
            validate_text(&long),
            Err(TextError::TooLong {
                chars: MAX_TEXT_CHARS + 1
            })
        );
    }

    #[test]
    fn validate_counts_trimmed_length() {
        let padded = format!("  {}  ", "x".repeat(MAX_TEXT_CHARS));
        assert_eq!(validate_text(&padded), Ok(()));
    }

    #[test]
    fn sanitize_trims_and_collapses_whitespace() {
        assert_eq!(sanitize("  Learn   Rust  "), "Learn Rust");
        assert_eq!(sanitize("a\t\tb\n c"), "a b c");
    }

    #[test]
    fn sanitize_truncates_to_limit() {
        let long = "y".repeat(MAX_TEXT_CHARS + 50);
        assert_eq!(sanitize(&long).chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn sanitize_is_idempotent() {
        for raw in ["  Buy   milk ", "", "   ", "one two", &"z".repeat(600)] {
            let once = sanitize(raw);
            assert_eq!(sanitize(&once), once);
        }
    }

    #[test]
    fn sanitize_of_whitespace_is_empty() {
        assert_eq!(sanitize(" \t \n"), "");
    }
}
