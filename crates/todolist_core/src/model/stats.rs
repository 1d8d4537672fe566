//! Derived list statistics.
//!
//! # Invariants
//! - `active + completed == total == list length`, always.
//! - Stats are recomputed from the list on every read, never cached.

use crate::model::todo::Todo;

/// Aggregate counts derived from the current list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TodoStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl TodoStats {
    /// Computes stats as a pure function of `todos`.
    pub fn of(todos: &[Todo]) -> Self {
        let total = todos.len();
        let completed = todos.iter().filter(|todo| todo.completed).count();
        Self {
            total,
            active: total - completed,
            completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TodoStats;
    use crate::model::todo::Todo;
    use chrono::Utc;

    #[test]
    fn empty_list_has_zero_stats() {
        assert_eq!(TodoStats::of(&[]), TodoStats::default());
    }

    #[test]
    fn counts_partition_the_list() {
        let now = Utc::now();
        let mut todos = vec![
            Todo::new("a", now),
            Todo::new("b", now),
            Todo::new("c", now),
        ];
        todos[1].completed = true;

        let stats = TodoStats::of(&todos);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.active + stats.completed, stats.total);
    }
}
