//! Seam between the list wrapper and the view that draws it.

use crate::reconcile::EditScript;

/// Whether an update finished inside [`ListAdapter::apply`] or is still
/// animating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    Finished,
    /// The owner calls [`ListView::finish_update`] once the animation
    /// completes.
    ///
    /// [`ListView::finish_update`]: super::ListView::finish_update
    Animating,
}

/// Applies edit scripts to a live view.
///
/// Implementations apply deletions, then insertions, then moves in one
/// atomic batch, and redraw everything for a full reload.
pub trait ListAdapter<I> {
    /// `items` is the snapshot the view shows once the update is done.
    fn apply(&mut self, script: &EditScript, items: &[I]) -> UpdateStatus;
}

/// Headless adapter that mirrors the rows a real view would show by
/// replaying every script.
#[derive(Debug, Clone)]
pub struct SnapshotAdapter<I> {
    rows: Vec<I>,
    batches: usize,
    full_reloads: usize,
    animate: bool,
}

impl<I> SnapshotAdapter<I> {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            batches: 0,
            full_reloads: 0,
            animate: false,
        }
    }

    /// Report incremental updates as still animating.
    pub fn animating() -> Self {
        Self {
            animate: true,
            ..Self::new()
        }
    }

    pub fn rows(&self) -> &[I] {
        &self.rows
    }

    /// Number of scripts applied, full reloads included.
    pub fn batches(&self) -> usize {
        self.batches
    }

    pub fn full_reloads(&self) -> usize {
        self.full_reloads
    }
}

impl<I> Default for SnapshotAdapter<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Clone + PartialEq + std::fmt::Debug> ListAdapter<I> for SnapshotAdapter<I> {
    fn apply(&mut self, script: &EditScript, items: &[I]) -> UpdateStatus {
        self.batches += 1;
        if script.full_reload {
            self.full_reloads += 1;
        }

        self.rows = script.apply(&self.rows, items);
        if self.rows != items {
            tracing::error!(
                rows = ?self.rows,
                expected = ?items,
                "Edit script did not reproduce the snapshot"
            );
            self.rows = items.to_vec();
        }

        if self.animate && !script.full_reload && !script.is_empty() {
            UpdateStatus::Animating
        } else {
            UpdateStatus::Finished
        }
    }
}
