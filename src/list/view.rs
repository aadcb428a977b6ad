use crate::config::ListConfig;
use crate::error::ListError;
use crate::reconcile::{dedup, diff, EditScript, Identity};

use super::adapter::{ListAdapter, UpdateStatus};
use super::cell::{CellProvider, CellResolver};

/// Notifications produced by [`ListView`] calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    /// A script was handed to the adapter.
    Applied {
        script: EditScript,
        status: UpdateStatus,
    },
    /// An update is animating. The snapshot was parked; only the latest
    /// parked snapshot is applied once the animation finishes.
    Queued,
    /// The list is not visible. The snapshot is applied as a full reload
    /// when the list becomes visible again.
    Deferred,
    EmptyStateChanged { showing: bool },
}

type EmptyPolicy<I> = Box<dyn Fn(&[I]) -> bool + Send>;

/// Wraps a live list view: diffs every new snapshot against the shown
/// one and serializes the resulting updates.
pub struct ListView<I, C, A> {
    adapter: A,
    cells: CellResolver<I, C>,
    snapshot: Vec<I>,
    pending: Option<Vec<I>>,
    updating: bool,
    visible: bool,
    animate: bool,
    empty_policy: EmptyPolicy<I>,
    showing_empty: bool,
}

impl<I, C, A> ListView<I, C, A>
where
    I: Identity,
    A: ListAdapter<I>,
{
    /// `fallback` resolves cells the delegate declines.
    pub fn new(
        adapter: A,
        fallback: Option<Box<dyn CellProvider<I, C>>>,
        config: &ListConfig,
    ) -> Self {
        Self {
            adapter,
            cells: CellResolver::new(fallback),
            snapshot: Vec::new(),
            pending: None,
            updating: false,
            visible: true,
            animate: config.animate,
            empty_policy: Box::new(|items: &[I]| items.is_empty()),
            showing_empty: false,
        }
    }

    /// Replace the predicate deciding when the empty placeholder shows.
    pub fn with_empty_policy(mut self, policy: impl Fn(&[I]) -> bool + Send + 'static) -> Self {
        self.empty_policy = Box::new(policy);
        self
    }

    pub fn set_cell_provider(&mut self, provider: Box<dyn CellProvider<I, C>>) {
        self.cells.set_delegate(provider);
    }

    /// The snapshot the view currently shows. Always duplicate-free.
    pub fn snapshot(&self) -> &[I] {
        &self.snapshot
    }

    pub fn is_updating(&self) -> bool {
        self.updating
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn showing_empty(&self) -> bool {
        self.showing_empty
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    /// Show a new snapshot.
    ///
    /// Hidden lists defer the snapshot. While an update animates the
    /// snapshot is parked and replaces any snapshot parked before it.
    pub fn set(&mut self, items: Vec<I>, animated: bool) -> Vec<ListEvent> {
        if !self.visible {
            self.pending = Some(items);
            return vec![ListEvent::Deferred];
        }
        if self.updating {
            if self.pending.replace(items).is_some() {
                tracing::trace!("Dropping superseded pending snapshot");
            }
            return vec![ListEvent::Queued];
        }
        self.update(items, animated)
    }

    /// The adapter finished animating the last update. A snapshot parked
    /// meanwhile is applied without animation.
    pub fn finish_update(&mut self) -> Vec<ListEvent> {
        if !self.updating {
            return Vec::new();
        }
        self.updating = false;
        self.flush_pending(false)
    }

    pub fn set_visible(&mut self, visible: bool) -> Vec<ListEvent> {
        if self.visible == visible {
            return Vec::new();
        }
        self.visible = visible;
        if visible && !self.updating {
            // Anything parked while hidden is redrawn wholesale.
            return self.flush_pending(false);
        }
        Vec::new()
    }

    pub fn try_cell_at(&self, index: usize) -> Result<C, ListError> {
        let item = self
            .snapshot
            .get(index)
            .ok_or(ListError::IndexOutOfBounds {
                index,
                len: self.snapshot.len(),
            })?;
        self.cells.resolve(index, item)
    }

    /// Cell for the row at `index`.
    ///
    /// # Panics
    ///
    /// When no provider yields a cell. That is a misconfiguration, not a
    /// condition to recover from; use [`try_cell_at`] to check first.
    ///
    /// [`try_cell_at`]: ListView::try_cell_at
    pub fn cell_at(&self, index: usize) -> C {
        match self.try_cell_at(index) {
            Ok(cell) => cell,
            Err(e) => panic!("{e}"),
        }
    }

    fn flush_pending(&mut self, animated: bool) -> Vec<ListEvent> {
        match self.pending.take() {
            Some(items) => self.update(items, animated),
            None => Vec::new(),
        }
    }

    fn update(&mut self, items: Vec<I>, animated: bool) -> Vec<ListEvent> {
        let allow_incremental = animated && self.animate && self.visible;
        let script = diff(&self.snapshot, &items, allow_incremental);
        let items = dedup(&items);

        let status = self.adapter.apply(&script, &items);
        tracing::trace!(
            full_reload = script.full_reload,
            changes = script.change_count(),
            len = items.len(),
            ?status,
            "List update applied"
        );
        self.snapshot = items;

        let mut events = vec![ListEvent::Applied { script, status }];
        let showing = (self.empty_policy)(&self.snapshot);
        if showing != self.showing_empty {
            self.showing_empty = showing;
            events.push(ListEvent::EmptyStateChanged { showing });
        }

        match status {
            UpdateStatus::Animating => self.updating = true,
            UpdateStatus::Finished => events.extend(self.flush_pending(animated)),
        }
        events
    }
}
