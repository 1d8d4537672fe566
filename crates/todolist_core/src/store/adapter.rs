//! Todo storage adapter over a key-value medium.
//!
//! # Responsibility
//! - Encode the list into the versioned JSON envelope and back.
//! - Classify medium failures into the `StoreError` taxonomy.
//!
//! # Invariants
//! - `probe` never returns an error, only `false`.
//! - Timestamps are persisted as ISO-8601 strings and reconstructed on load.
//! - A detached storage (no medium) turns every operation into a no-op.

use crate::model::todo::{Todo, TodoId};
use crate::store::medium::{MediumError, StorageMedium};
use crate::store::{StoreError, StoreResult};
use crate::validation::ident::is_valid_id;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default logical key for the todo list.
pub const TODO_STORAGE_KEY: &str = "todo-app-data";

/// Static envelope format tag. A mismatch on read is a forward-compatibility
/// seam, not an enforcement point.
pub const STORAGE_FORMAT_VERSION: &str = "1.0.0";

const PROBE_KEY: &str = "__todo_storage_probe__";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StorageEnvelope {
    version: String,
    data: Vec<StoredTodo>,
    last_modified: String,
}

/// Wire shape of one item. Timestamps travel as strings.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTodo {
    id: String,
    text: String,
    completed: bool,
    created_at: String,
    updated_at: String,
}

/// Fallible adapter binding one logical key to a storage medium.
pub struct TodoStorage<M: StorageMedium> {
    medium: Option<M>,
    key: String,
}

impl<M: StorageMedium> TodoStorage<M> {
    /// Binds `medium` to the default logical key.
    pub fn new(medium: M) -> Self {
        Self::with_key(medium, TODO_STORAGE_KEY)
    }

    /// Binds `medium` to a caller-chosen logical key.
    pub fn with_key(medium: M, key: impl Into<String>) -> Self {
        Self {
            medium: Some(medium),
            key: key.into(),
        }
    }

    /// Creates a storage with no medium at all.
    ///
    /// Models execution contexts where no storage environment exists: probe
    /// reports `false`, load yields nothing, save and remove are no-ops.
    pub fn detached() -> Self {
        Self {
            medium: None,
            key: TODO_STORAGE_KEY.to_string(),
        }
    }

    /// The logical key this adapter reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Attempts a throwaway write+delete to decide whether the medium is
    /// usable. Never fails; an unusable or absent medium reports `false`.
    pub fn probe(&mut self) -> bool {
        let Some(medium) = self.medium.as_mut() else {
            return false;
        };
        let usable = medium
            .set_item(PROBE_KEY, "probe")
            .and_then(|()| medium.remove_item(PROBE_KEY))
            .is_ok();
        debug!("event=store_probe module=store usable={usable}");
        usable
    }

    /// Loads the list stored under this adapter's key.
    ///
    /// Returns `Ok(None)` when the key is absent or the storage is detached.
    /// A version mismatch in the envelope is logged and tolerated.
    ///
    /// # Errors
    /// - `StoreError::Read` when the medium read fails, the envelope is not
    ///   valid JSON, or any element has an undecodable id or timestamp.
    pub fn load(&self) -> StoreResult<Option<Vec<Todo>>> {
        let Some(medium) = self.medium.as_ref() else {
            return Ok(None);
        };

        let raw = medium
            .get_item(&self.key)
            .map_err(|err| StoreError::Read(err.to_string()))?;
        let Some(raw) = raw else {
            return Ok(None);
        };

        let envelope: StorageEnvelope = serde_json::from_str(&raw)
            .map_err(|err| StoreError::Read(format!("invalid envelope JSON: {err}")))?;

        if envelope.version != STORAGE_FORMAT_VERSION {
            warn!(
                "event=store_load module=store status=version_mismatch expected={STORAGE_FORMAT_VERSION} got={}",
                envelope.version
            );
        }

        let mut todos = Vec::with_capacity(envelope.data.len());
        for stored in envelope.data {
            todos.push(decode_stored_todo(stored)?);
        }

        debug!(
            "event=store_load module=store status=ok key={} count={}",
            self.key,
            todos.len()
        );
        Ok(Some(todos))
    }

    /// Serializes and writes the list under this adapter's key.
    ///
    /// `now` is recorded as the envelope's `lastModified` stamp. A detached
    /// storage makes this a no-op.
    ///
    /// # Errors
    /// - `StoreError::Quota` when the medium reports capacity exhaustion.
    /// - `StoreError::Write` for any other medium failure.
    pub fn save(&mut self, todos: &[Todo], now: DateTime<Utc>) -> StoreResult<()> {
        let Some(medium) = self.medium.as_mut() else {
            return Ok(());
        };

        let envelope = StorageEnvelope {
            version: STORAGE_FORMAT_VERSION.to_string(),
            data: todos.iter().map(encode_todo).collect(),
            last_modified: now.to_rfc3339(),
        };
        let raw = serde_json::to_string(&envelope)
            .map_err(|err| StoreError::Write(MediumError::Io(std::io::Error::other(err))))?;

        medium.set_item(&self.key, &raw).map_err(|err| match err {
            MediumError::QuotaExceeded => StoreError::Quota(err),
            other => StoreError::Write(other),
        })?;

        debug!(
            "event=store_save module=store status=ok key={} count={}",
            self.key,
            todos.len()
        );
        Ok(())
    }

    /// Removes this adapter's key from the medium.
    ///
    /// # Errors
    /// - `StoreError::Clear` when the medium rejects the removal.
    pub fn remove(&mut self) -> StoreResult<()> {
        let Some(medium) = self.medium.as_mut() else {
            return Ok(());
        };
        medium.remove_item(&self.key).map_err(StoreError::Clear)?;
        debug!("event=store_clear module=store status=ok key={}", self.key);
        Ok(())
    }
}

fn encode_todo(todo: &Todo) -> StoredTodo {
    StoredTodo {
        id: todo.id.to_string(),
        text: todo.text.clone(),
        completed: todo.completed,
        created_at: todo.created_at.to_rfc3339(),
        updated_at: todo.updated_at.to_rfc3339(),
    }
}

fn decode_stored_todo(stored: StoredTodo) -> StoreResult<Todo> {
    if !is_valid_id(&stored.id) {
        return Err(StoreError::Read(format!(
            "invalid id `{}` in stored todo",
            stored.id
        )));
    }
    let id: TodoId = Uuid::parse_str(&stored.id)
        .map_err(|err| StoreError::Read(format!("unparsable id `{}`: {err}", stored.id)))?;

    let created_at = decode_timestamp(&stored.created_at, id, "createdAt")?;
    let updated_at = decode_timestamp(&stored.updated_at, id, "updatedAt")?;

    let todo = Todo {
        id,
        text: stored.text,
        completed: stored.completed,
        created_at,
        updated_at,
    };
    todo.validate()
        .map_err(|err| StoreError::Read(err.to_string()))?;
    Ok(todo)
}

fn decode_timestamp(raw: &str, id: TodoId, field: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| {
            StoreError::Read(format!(
                "failed to parse {field} `{raw}` for todo {id}: {err}"
            ))
        })
}
