//! Key-value storage medium contract and implementations.
//!
//! # Responsibility
//! - Abstract the synchronous string key-value medium behind a trait so the
//!   adapter and the state core never touch a concrete storage directly.
//! - Map medium-specific failures into the shared `MediumError` shape.
//!
//! # Invariants
//! - `get_item` of an absent key is `Ok(None)`, not an error.
//! - Capacity exhaustion is always reported as `MediumError::QuotaExceeded`.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Failures reported by a storage medium.
#[derive(Debug)]
pub enum MediumError {
    /// The medium has no capacity left for the attempted write.
    QuotaExceeded,
    /// The medium is present but refuses all access.
    Disabled,
    /// Any other I/O failure.
    Io(io::Error),
}

impl Display for MediumError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded => write!(f, "storage medium capacity exhausted"),
            Self::Disabled => write!(f, "storage medium is disabled"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MediumError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::QuotaExceeded | Self::Disabled => None,
        }
    }
}

impl From<io::Error> for MediumError {
    fn from(value: io::Error) -> Self {
        match value.kind() {
            io::ErrorKind::StorageFull | io::ErrorKind::QuotaExceeded => Self::QuotaExceeded,
            _ => Self::Io(value),
        }
    }
}

/// Synchronous string key-value storage medium.
pub trait StorageMedium {
    fn get_item(&self, key: &str) -> Result<Option<String>, MediumError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), MediumError>;
    fn remove_item(&mut self, key: &str) -> Result<(), MediumError>;
}

/// File-backed medium storing one file per key under a base directory.
#[derive(Debug, Clone)]
pub struct FileMedium {
    dir: PathBuf,
}

impl FileMedium {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl StorageMedium for FileMedium {
    fn get_item(&self, key: &str) -> Result<Option<String>, MediumError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), MediumError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), MediumError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(Debug, Default)]
struct MemoryMediumState {
    items: BTreeMap<String, String>,
    write_count: u64,
    quota_exceeded: bool,
    disabled: bool,
}

/// In-memory medium with a shared handle.
///
/// Clones view the same underlying state, so a test can keep a handle for
/// inspection and failure injection while the storage adapter owns another.
/// Single-threaded by construction, like the rest of the core.
#[derive(Debug, Clone, Default)]
pub struct MemoryMedium {
    state: Rc<RefCell<MemoryMediumState>>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set_item` calls observed so far.
    pub fn write_count(&self) -> u64 {
        self.state.borrow().write_count
    }

    /// Returns the stored value for `key`, if any.
    pub fn item(&self, key: &str) -> Option<String> {
        self.state.borrow().items.get(key).cloned()
    }

    /// Stores a raw value directly, bypassing failure injection.
    pub fn seed_item(&self, key: &str, value: &str) {
        self.state
            .borrow_mut()
            .items
            .insert(key.to_string(), value.to_string());
    }

    /// When set, every write fails with `MediumError::QuotaExceeded`.
    pub fn set_quota_exceeded(&self, quota_exceeded: bool) {
        self.state.borrow_mut().quota_exceeded = quota_exceeded;
    }

    /// When set, every operation fails with `MediumError::Disabled`.
    pub fn set_disabled(&self, disabled: bool) {
        self.state.borrow_mut().disabled = disabled;
    }
}

impl StorageMedium for MemoryMedium {
    fn get_item(&self, key: &str) -> Result<Option<String>, MediumError> {
        let state = self.state.borrow();
        if state.disabled {
            return Err(MediumError::Disabled);
        }
        Ok(state.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), MediumError> {
        let mut state = self.state.borrow_mut();
        if state.disabled {
            return Err(MediumError::Disabled);
        }
        if state.quota_exceeded {
            return Err(MediumError::QuotaExceeded);
        }
        state.items.insert(key.to_string(), value.to_string());
        state.write_count += 1;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), MediumError> {
        let mut state = self.state.borrow_mut();
        if state.disabled {
            return Err(MediumError::Disabled);
        }
        state.items.remove(key);
        Ok(())
    }
}
