//! Core domain logic for the persistent todo list.
//! This crate is the single source of truth for business invariants.

pub mod clock;
pub mod confirm;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;
pub mod validation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use confirm::{AlwaysConfirm, ConfirmPrompt, NeverConfirm};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::stats::TodoStats;
pub use model::todo::{Filter, Todo, TodoId, TodoValidationError};
pub use service::todo_service::{
    TodoService, TodoServiceError, TodoServiceOptions, DEFAULT_DEBOUNCE, DEFAULT_ERROR_DISPLAY,
};
pub use store::{
    FileMedium, MediumError, MemoryMedium, StorageMedium, StoreError, StoreResult, TodoStorage,
    STORAGE_FORMAT_VERSION, TODO_STORAGE_KEY,
};
pub use validation::ident::{generate_id, generate_id_seeded, is_valid_id};
pub use validation::text::{sanitize, validate_text, TextError, MAX_TEXT_CHARS};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
