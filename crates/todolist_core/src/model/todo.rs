//! Todo domain model.
//!
//! # Responsibility
//! - Define the canonical item record and its lifecycle helpers.
//! - Enforce item-level invariants via `Todo::validate`.
//!
//! # Invariants
//! - `id` is stable and never reused for another item.
//! - `text` is never empty or whitespace-only and never exceeds the limit.
//! - `updated_at` is never earlier than `created_at`.

use crate::validation::text::MAX_TEXT_CHARS;
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every todo item.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TodoId = Uuid;

/// Canonical record for one todo item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    /// Stable global ID used for mutation targeting and persistence.
    pub id: TodoId,
    /// Sanitized display text. Never empty, never longer than the limit.
    pub text: String,
    /// Completion flag toggled by the state core.
    pub completed: bool,
    /// Creation instant. Immutable after construction.
    pub created_at: DateTime<Utc>,
    /// Last mutation instant. Bumped on every field change.
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Creates a new item with a generated stable ID.
    ///
    /// The caller supplies `now` so that record timestamps come from the
    /// same clock that drives scheduling.
    ///
    /// # Invariants
    /// - `completed` starts as `false`.
    /// - `created_at == updated_at` at creation.
    pub fn new(text: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self::with_id(crate::validation::ident::generate_id(), text, now)
    }

    /// Creates an item with a caller-provided stable ID.
    ///
    /// Used by load paths where identity already exists in storage.
    pub fn with_id(id: TodoId, text: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks item-level invariants.
    ///
    /// Read paths must reject invalid persisted state instead of masking it.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        if self.text.trim().is_empty() {
            return Err(TodoValidationError::EmptyText { id: self.id });
        }
        let chars = self.text.chars().count();
        if chars > MAX_TEXT_CHARS {
            return Err(TodoValidationError::TextTooLong {
                id: self.id,
                chars,
            });
        }
        if self.updated_at < self.created_at {
            return Err(TodoValidationError::TimestampOrder { id: self.id });
        }
        Ok(())
    }
}

/// Item-level invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    EmptyText { id: TodoId },
    TextTooLong { id: TodoId, chars: usize },
    TimestampOrder { id: TodoId },
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText { id } => write!(f, "todo {id} has empty text"),
            Self::TextTooLong { id, chars } => write!(
                f,
                "todo {id} text is {chars} characters, limit is {MAX_TEXT_CHARS}"
            ),
            Self::TimestampOrder { id } => {
                write!(f, "todo {id} has updated_at earlier than created_at")
            }
        }
    }
}

impl Error for TodoValidationError {}

/// Status filter applied by presentation layers when listing items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    /// Returns whether `todo` is visible under this filter.
    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Active => !todo.completed,
            Self::Completed => todo.completed,
        }
    }

    /// Parses one filter from user-facing string form.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}
