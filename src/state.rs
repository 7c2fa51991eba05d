//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is the root-owned glue the surfaces report into: the current
//! view, the session-wide progress (mutation points + completed challenge
//! ids) and the shared text-generation handle. Mutation of progress is
//! restricted to `add_points` and `mark_complete`; the score only ever
//! grows and nothing is persisted across runs.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::llm::Llm;

// =============================================================================
// VIEW
// =============================================================================

/// Which screen is shown. Navigation is a plain replace — every view is
/// reachable from every view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    Learn,
    Chat,
    Workshop,
    Quiz,
}

// =============================================================================
// PROGRESS
// =============================================================================

/// Session-wide progress accumulator.
pub struct Progress {
    points: AtomicU64,
    completed: Mutex<HashSet<u32>>,
}

impl Progress {
    #[must_use]
    pub fn new() -> Self {
        Self { points: AtomicU64::new(0), completed: Mutex::new(HashSet::new()) }
    }

    /// Add mutation points. Monotonic — there is no subtract operation.
    pub fn add_points(&self, delta: u64) {
        self.points.fetch_add(delta, Ordering::Relaxed);
    }

    /// Current mutation points.
    #[must_use]
    pub fn points(&self) -> u64 {
        self.points.load(Ordering::Relaxed)
    }

    /// Mark a challenge as completed. Idempotent; returns `true` when the id
    /// was newly inserted.
    pub fn mark_complete(&self, id: u32) -> bool {
        self.completed
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(id)
    }

    #[must_use]
    pub fn is_complete(&self, id: u32) -> bool {
        self.completed
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .contains(&id)
    }

    /// Number of distinct completed challenges.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Root application state. Clone is cheap — all fields are Arc-backed.
#[derive(Clone)]
pub struct AppState {
    pub llm: Llm,
    pub progress: Arc<Progress>,
    view: Arc<Mutex<View>>,
}

impl AppState {
    #[must_use]
    pub fn new(llm: Llm) -> Self {
        Self { llm, progress: Arc::new(Progress::new()), view: Arc::new(Mutex::new(View::Home)) }
    }

    /// Replace the current view. No guards.
    pub fn navigate(&self, view: View) {
        *self
            .view
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = view;
    }

    #[must_use]
    pub fn view(&self) -> View {
        *self
            .view
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
