//! Edit script produced by the reconciler.

use std::collections::HashSet;

/// A kept item that changed position.
///
/// `from` is the item's index in the old snapshot, `to` its index in the
/// new one. Moves are ordered by `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: usize,
    pub to: usize,
}

/// Minimal set of edits turning one snapshot into the next.
///
/// A list adapter applies `deletions`, then `insertions`, then `moves`
/// inside one batch. When `full_reload` is set every other field is empty
/// and the adapter redraws everything instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditScript {
    /// Indices into the old snapshot, ascending.
    pub deletions: Vec<usize>,
    /// Indices into the new snapshot, ascending.
    pub insertions: Vec<usize>,
    pub moves: Vec<Move>,
    /// Indices into the new snapshot of items present in both snapshots.
    /// Adapters may refresh these cells in place.
    pub updates: Vec<usize>,
    pub full_reload: bool,
}

impl EditScript {
    pub fn full_reload() -> Self {
        Self {
            full_reload: true,
            ..Self::default()
        }
    }

    /// True when there is nothing structural to apply.
    ///
    /// `updates` are not structural and do not count.
    pub fn is_empty(&self) -> bool {
        !self.full_reload
            && self.deletions.is_empty()
            && self.insertions.is_empty()
            && self.moves.is_empty()
    }

    /// Number of structural edits in the script.
    pub fn change_count(&self) -> usize {
        self.deletions.len() + self.insertions.len() + self.moves.len()
    }

    /// Replay the script against `old`, producing the new snapshot.
    ///
    /// `new` supplies the inserted items. Batch semantics: inserted items
    /// land at their insertion index, moved items at their `to` index, and
    /// every other surviving item fills the remaining slots in its old
    /// relative order. The script must have been computed for `old` and
    /// `new`; a full reload simply returns `new`.
    pub fn apply<T: Clone>(&self, old: &[T], new: &[T]) -> Vec<T> {
        if self.full_reload {
            return new.to_vec();
        }

        let deleted: HashSet<usize> = self.deletions.iter().copied().collect();
        let moved: HashSet<usize> = self.moves.iter().map(|mv| mv.from).collect();
        let len = (old.len() + self.insertions.len()).saturating_sub(self.deletions.len());

        let mut slots: Vec<Option<T>> = vec![None; len];
        for &index in &self.insertions {
            if let (Some(slot), Some(item)) = (slots.get_mut(index), new.get(index)) {
                *slot = Some(item.clone());
            }
        }
        for mv in &self.moves {
            if let (Some(slot), Some(item)) = (slots.get_mut(mv.to), old.get(mv.from)) {
                *slot = Some(item.clone());
            }
        }

        let mut stationary = old
            .iter()
            .enumerate()
            .filter(|(index, _)| !deleted.contains(index) && !moved.contains(index))
            .map(|(_, item)| item.clone());

        slots
            .into_iter()
            .filter_map(|slot| slot.or_else(|| stationary.next()))
            .collect()
    }
}
