//! Input validation and identifier helpers.
//!
//! # Responsibility
//! - Decide whether raw user text is acceptable and normalize it.
//! - Generate and recognize stable v4 identifiers.
//!
//! # Invariants
//! - `sanitize` is pure and total; it never fails.
//! - Write paths sanitize before constructing domain records.

pub mod ident;
pub mod text;
