//! Stateful todo service: the owner of the canonical in-memory list.
//!
//! # Responsibility
//! - Apply every mutation to the list and keep derived stats consistent.
//! - Coordinate optimistic in-memory updates with debounced persistence.
//! - Hold the single auto-expiring error slot surfaced to presentation.
//!
//! # Invariants
//! - New items prepend; display order is insertion order, newest first.
//! - Mutations never roll back on persistence failure; saving is best-effort
//!   relative to the in-memory state.
//! - After `stop()` no deadline fires and no further save is scheduled.

use crate::clock::Clock;
use crate::confirm::ConfirmPrompt;
use crate::model::stats::TodoStats;
use crate::model::todo::{Filter, Todo, TodoId};
use crate::store::adapter::TodoStorage;
use crate::store::medium::StorageMedium;
use crate::store::StoreError;
use crate::validation::text::sanitize;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

/// Trailing-edge debounce window for persistence writes.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// How long a surfaced error stays visible before auto-clearing.
pub const DEFAULT_ERROR_DISPLAY: Duration = Duration::from_secs(5);

/// Operation failures returned to the immediate caller.
///
/// These never touch the shared error slot; the caller decides whether to
/// surface them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoServiceError {
    /// Input text sanitized to nothing; the list is unchanged.
    InvalidText,
}

impl Display for TodoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidText => write!(f, "invalid todo text"),
        }
    }
}

impl Error for TodoServiceError {}

/// Construction options for `TodoService`.
#[derive(Debug, Clone)]
pub struct TodoServiceOptions {
    /// List adopted before any load happens.
    pub initial_todos: Vec<Todo>,
    /// Whether destructive operations ask the confirmation collaborator.
    pub confirm_delete: bool,
    /// Whether the service loads on start and persists mutations at all.
    pub auto_save: bool,
    /// Trailing-edge debounce window for persistence writes.
    pub debounce: Duration,
    /// Display window for the shared error slot.
    pub error_display: Duration,
}

impl Default for TodoServiceOptions {
    fn default() -> Self {
        Self {
            initial_todos: Vec::new(),
            confirm_delete: true,
            auto_save: true,
            debounce: DEFAULT_DEBOUNCE,
            error_display: DEFAULT_ERROR_DISPLAY,
        }
    }
}

/// The todo state core.
///
/// Single-threaded and cooperative: every operation runs to completion, and
/// scheduled work (the debounced save, the error expiry) is carried as
/// deadline data fired by `tick()`. Drivers call `next_deadline()` to learn
/// how long they may sleep.
pub struct TodoService<M: StorageMedium, C: Clock, P: ConfirmPrompt> {
    storage: TodoStorage<M>,
    clock: C,
    prompt: P,
    confirm_delete: bool,
    auto_save: bool,
    debounce: Duration,
    error_display: Duration,
    todos: Vec<Todo>,
    loading: bool,
    error: Option<String>,
    storage_available: bool,
    save_due: Option<Instant>,
    error_due: Option<Instant>,
    stopped: bool,
}

impl<M: StorageMedium, C: Clock, P: ConfirmPrompt> TodoService<M, C, P> {
    /// Creates a service in the `Loading` state (or directly `Ready` when
    /// auto-persistence is disabled). Call `start()` to perform the initial
    /// load and `stop()` before discarding the instance.
    pub fn new(storage: TodoStorage<M>, clock: C, prompt: P, options: TodoServiceOptions) -> Self {
        Self {
            storage,
            clock,
            prompt,
            confirm_delete: options.confirm_delete,
            auto_save: options.auto_save,
            debounce: options.debounce,
            error_display: options.error_display,
            todos: options.initial_todos,
            loading: options.auto_save,
            error: None,
            storage_available: false,
            save_due: None,
            error_due: None,
            stopped: false,
        }
    }

    /// Performs the initial load.
    ///
    /// An unavailable medium is a warning, not an error: the service becomes
    /// `Ready` with its current list. A present-but-undecodable payload
    /// surfaces a `StoreError` in the shared slot; the list stays usable.
    pub fn start(&mut self) {
        if !self.auto_save {
            self.loading = false;
            info!("event=service_start module=service status=ok persistence=disabled");
            return;
        }

        self.loading = true;
        self.clear_error();

        self.storage_available = self.storage.probe();
        if !self.storage_available {
            warn!("event=service_start module=service status=degraded reason=storage_unavailable");
            self.loading = false;
            return;
        }

        match self.storage.load() {
            Ok(Some(todos)) => {
                info!(
                    "event=service_start module=service status=ok loaded={}",
                    todos.len()
                );
                self.todos = todos;
            }
            Ok(None) => {
                info!("event=service_start module=service status=ok loaded=0 reason=empty_store");
            }
            Err(err) => self.report_error(&err),
        }
        self.loading = false;
    }

    /// Re-enters `Loading` and re-runs the probe/load path.
    pub fn retry(&mut self) {
        info!("event=service_retry module=service");
        self.start();
    }

    /// Cancels pending deadlines and forces one final immediate save.
    ///
    /// Terminal: after this no deadline fires and mutations are no longer
    /// persisted. Idempotent.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.save_due = None;
        self.error_due = None;

        if self.auto_save && self.storage_available {
            // Nobody reads the error slot after teardown; log only.
            if let Err(err) = self.storage.save(&self.todos, self.clock.now_utc()) {
                error!("event=service_stop module=service status=error error={err}");
                return;
            }
        }
        info!("event=service_stop module=service status=ok");
    }

    /// Adds a new item at the front of the list.
    ///
    /// The prepend is optimistic: it happens before any persistence
    /// confirmation. Returns the new item's id.
    ///
    /// # Errors
    /// - `TodoServiceError::InvalidText` when the input sanitizes to
    ///   nothing; the list is unchanged and the error slot untouched.
    pub fn add(&mut self, text: &str) -> Result<TodoId, TodoServiceError> {
        let sanitized = sanitize(text);
        if sanitized.is_empty() {
            return Err(TodoServiceError::InvalidText);
        }

        let todo = Todo::new(sanitized, self.clock.now_utc());
        let id = todo.id;
        self.todos.insert(0, todo);
        self.clear_error();
        self.schedule_save();
        info!(
            "event=todo_add module=service status=ok id={id} total={}",
            self.todos.len()
        );
        Ok(id)
    }

    /// Flips `completed` on the matching item and bumps `updated_at`.
    /// No-op when the id is absent.
    pub fn toggle(&mut self, id: TodoId) {
        self.clear_error();
        let now = self.clock.now_utc();
        if let Some(todo) = self.todos.iter_mut().find(|todo| todo.id == id) {
            todo.completed = !todo.completed;
            todo.updated_at = now;
            info!(
                "event=todo_toggle module=service status=ok id={id} completed={}",
                todo.completed
            );
            self.schedule_save();
        }
    }

    /// Removes the matching item, asking the confirmation collaborator first
    /// when configured and not skipped. Decline leaves the list unchanged.
    pub fn remove(&mut self, id: TodoId, skip_confirm: bool) {
        self.clear_error();
        let Some(index) = self.todos.iter().position(|todo| todo.id == id) else {
            return;
        };

        if self.confirm_delete && !skip_confirm {
            // Message is built from the live item immediately before asking.
            let message = format!(
                "Are you sure you want to delete \"{}\"?",
                self.todos[index].text
            );
            if !self.prompt.confirm(&message) {
                return;
            }
        }

        self.todos.remove(index);
        info!(
            "event=todo_remove module=service status=ok id={id} total={}",
            self.todos.len()
        );
        self.schedule_save();
    }

    /// Replaces the text of the matching item and bumps `updated_at`.
    /// No-op when the id is absent.
    ///
    /// # Errors
    /// - `TodoServiceError::InvalidText` when the input sanitizes to
    ///   nothing; the list is unchanged and the error slot untouched.
    pub fn edit(&mut self, id: TodoId, text: &str) -> Result<(), TodoServiceError> {
        let sanitized = sanitize(text);
        if sanitized.is_empty() {
            return Err(TodoServiceError::InvalidText);
        }

        self.clear_error();
        let now = self.clock.now_utc();
        if let Some(todo) = self.todos.iter_mut().find(|todo| todo.id == id) {
            todo.text = sanitized;
            todo.updated_at = now;
            info!("event=todo_edit module=service status=ok id={id}");
            self.schedule_save();
        }
        Ok(())
    }

    /// Removes every completed item. Never prompts when there is nothing to
    /// remove.
    pub fn clear_completed(&mut self) {
        self.clear_error();
        let completed = self.todos.iter().filter(|todo| todo.completed).count();
        if completed == 0 {
            return;
        }

        if self.confirm_delete {
            let noun = if completed == 1 { "todo" } else { "todos" };
            let message =
                format!("Are you sure you want to delete {completed} completed {noun}?");
            if !self.prompt.confirm(&message) {
                return;
            }
        }

        self.todos.retain(|todo| !todo.completed);
        info!(
            "event=todo_clear_completed module=service status=ok removed={completed} total={}",
            self.todos.len()
        );
        self.schedule_save();
    }

    /// Empties the list. Never prompts when it is already empty.
    pub fn clear_all(&mut self) {
        self.clear_error();
        let total = self.todos.len();
        if total == 0 {
            return;
        }

        if self.confirm_delete {
            let noun = if total == 1 { "todo" } else { "todos" };
            let message = format!("Are you sure you want to delete all {total} {noun}?");
            if !self.prompt.confirm(&message) {
                return;
            }
        }

        self.todos.clear();
        info!("event=todo_clear_all module=service status=ok removed={total}");
        self.schedule_save();
    }

    /// Fires any deadline that is due: the debounced save writes the latest
    /// list, and an expired error slot empties itself.
    pub fn tick(&mut self) {
        let now = self.clock.instant();
        if self.save_due.is_some_and(|due| due <= now) {
            self.save_due = None;
            self.flush_save();
        }
        if self.error_due.is_some_and(|due| due <= now) {
            self.error = None;
            self.error_due = None;
        }
    }

    /// Earliest pending deadline, if any. Drivers may sleep until it.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.save_due, self.error_due) {
            (Some(save), Some(err)) => Some(save.min(err)),
            (save, err) => save.or(err),
        }
    }

    /// Immutable snapshot of the current list.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    /// Items visible under `filter`, in display order.
    pub fn filtered(&self, filter: Filter) -> Vec<&Todo> {
        self.todos
            .iter()
            .filter(|todo| filter.matches(todo))
            .collect()
    }

    /// Derived counts, recomputed on every call.
    pub fn stats(&self) -> TodoStats {
        TodoStats::of(&self.todos)
    }

    /// Whether the initial (or retried) load is still pending.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Current shared error message, if one is being displayed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the storage medium probed usable on the last start.
    pub fn storage_available(&self) -> bool {
        self.storage_available
    }

    fn schedule_save(&mut self) {
        if self.stopped || !self.auto_save || !self.storage_available {
            return;
        }
        // Trailing edge: each mutation resets the window.
        self.save_due = Some(self.clock.instant() + self.debounce);
    }

    fn flush_save(&mut self) {
        match self.storage.save(&self.todos, self.clock.now_utc()) {
            Ok(()) => {
                self.error = None;
                self.error_due = None;
            }
            Err(err) => self.report_error(&err),
        }
    }

    fn report_error(&mut self, err: &StoreError) {
        error!("event=service_error module=service error={err}");
        self.error = Some(err.to_string());
        self.error_due = Some(self.clock.instant() + self.error_display);
    }

    fn clear_error(&mut self) {
        self.error = None;
        self.error_due = None;
    }
}
