//! Persistent store layer: medium abstraction and the todo storage adapter.
//!
//! # Responsibility
//! - Define the fallible key-value medium contract and its implementations.
//! - Keep envelope format details inside the persistence boundary.
//!
//! # Invariants
//! - Read paths must reject invalid persisted state instead of masking it.
//! - A version mismatch in the envelope is a warning, never a failure.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod adapter;
pub mod medium;

pub use adapter::{TodoStorage, STORAGE_FORMAT_VERSION, TODO_STORAGE_KEY};
pub use medium::{FileMedium, MediumError, MemoryMedium, StorageMedium};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store adapter failures, wrapping the underlying medium or decode cause.
#[derive(Debug)]
pub enum StoreError {
    /// Persisted data exists but could not be decoded into a valid list.
    Read(String),
    /// The medium rejected a write for a reason other than capacity.
    Write(MediumError),
    /// The medium reported capacity exhaustion on write.
    Quota(MediumError),
    /// The medium rejected a key removal.
    Clear(MediumError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read(detail) => write!(f, "failed to read todos from storage: {detail}"),
            Self::Write(err) => write!(f, "failed to save todos to storage: {err}"),
            Self::Quota(_) => write!(f, "storage quota exceeded"),
            Self::Clear(err) => write!(f, "failed to clear storage: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read(_) => None,
            Self::Write(err) | Self::Quota(err) | Self::Clear(err) => Some(err),
        }
    }
}
