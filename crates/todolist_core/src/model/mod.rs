//! Domain model for the todo list core.
//!
//! # Responsibility
//! - Define the canonical data structures owned by the state core.
//! - Keep derived values (stats) as pure functions of the list.
//!
//! # Invariants
//! - Every item is identified by a stable `TodoId` that is never reused.
//! - Display order equals insertion order, newest first.

pub mod stats;
pub mod todo;
