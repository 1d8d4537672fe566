//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate storage, clock and confirmation capabilities into the
//!   stateful todo service consumed by presentation layers.
//! - Keep UI layers decoupled from storage and scheduling details.

pub mod todo_service;
