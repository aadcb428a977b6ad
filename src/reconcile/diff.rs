//! Snapshot reconciliation.

use std::collections::{HashMap, HashSet};
use std::fmt;

use super::script::{EditScript, Move};
use super::Identity;

/// Which input of a diff a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Old,
    New,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Old => write!(f, "old"),
            Side::New => write!(f, "new"),
        }
    }
}

/// Non-fatal problem found while reconciling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The item at `index` repeats an identity seen earlier in the same
    /// snapshot. Only the first occurrence is kept.
    DuplicateIdentity {
        side: Side,
        index: usize,
        item: String,
    },
}

/// Compute the edit script turning `old` into `new`.
///
/// Duplicate identities are logged with `tracing::warn!` and dropped.
pub fn diff<I: Identity>(old: &[I], new: &[I], allow_incremental: bool) -> EditScript {
    diff_with(old, new, allow_incremental, |diagnostic| match diagnostic {
        Diagnostic::DuplicateIdentity { side, index, item } => {
            tracing::warn!(%side, index, item = %item, "found duplicate item identity");
        }
    })
}

/// Like [`diff`], but hands every diagnostic to `report` instead of
/// logging it.
///
/// Both inputs are deduplicated by first occurrence before diffing and
/// all indices in the returned script refer to the deduplicated
/// sequences. Returns a full reload when incremental updates are not
/// allowed or `old` is empty.
pub fn diff_with<I, F>(old: &[I], new: &[I], allow_incremental: bool, mut report: F) -> EditScript
where
    I: Identity,
    F: FnMut(Diagnostic),
{
    let old = unique(old, Side::Old, &mut report);
    let new = unique(new, Side::New, &mut report);

    if !allow_incremental || old.is_empty() {
        return EditScript::full_reload();
    }

    let old_positions: HashMap<&I, usize> = old
        .iter()
        .enumerate()
        .map(|(index, item)| (*item, index))
        .collect();
    let new_set: HashSet<&I> = new.iter().copied().collect();

    let deletions = old
        .iter()
        .enumerate()
        .filter(|(_, item)| !new_set.contains(*item))
        .map(|(index, _)| index)
        .collect();

    let mut insertions = Vec::new();
    let mut updates = Vec::new();
    for (index, item) in new.iter().enumerate() {
        if old_positions.contains_key(item) {
            updates.push(index);
        } else {
            insertions.push(index);
        }
    }

    // Kept items in old order. Walking `new` left to right, everything
    // before `rank` is already in final order.
    let mut kept: Vec<&I> = old
        .iter()
        .copied()
        .filter(|item| new_set.contains(item))
        .collect();
    let mut moves = Vec::new();
    let mut rank = 0;
    for (to, item) in new.iter().enumerate() {
        let Some(&from) = old_positions.get(item) else {
            continue;
        };
        if let Some(offset) = kept[rank..].iter().position(|candidate| candidate == item) {
            if offset != 0 {
                let moved = kept.remove(rank + offset);
                kept.insert(rank, moved);
                moves.push(Move { from, to });
            }
        }
        rank += 1;
    }

    EditScript {
        deletions,
        insertions,
        moves,
        updates,
        full_reload: false,
    }
}

/// Drop repeated identities, keeping the first occurrence of each.
pub fn dedup<I: Identity>(items: &[I]) -> Vec<I> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .filter(|item| seen.insert(*item))
        .cloned()
        .collect()
}

fn unique<'a, I, F>(items: &'a [I], side: Side, report: &mut F) -> Vec<&'a I>
where
    I: Identity,
    F: FnMut(Diagnostic),
{
    let mut seen = HashSet::with_capacity(items.len());
    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        if seen.insert(item) {
            out.push(item);
        } else {
            report(Diagnostic::DuplicateIdentity {
                side,
                index,
                item: format!("{:?}", item),
            });
        }
    }
    out
}
