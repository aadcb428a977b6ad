//! List reconciliation.
//!
//! Turns an old ordered snapshot of identity-bearing items and a new one
//! into an [`EditScript`] that a live, animated list can apply in one
//! batch:
//!
//! ```text
//! old ──┐
//!       ├──→ diff ──→ EditScript ──→ ListAdapter
//! new ──┘
//! ```
//!
//! The reconciler never fails. Duplicate identities are reported as
//! diagnostics and dropped; when incremental updates make no sense it
//! degrades to a full reload.

mod diff;
mod script;

use std::fmt::Debug;
use std::hash::Hash;

pub use diff::{dedup, diff, diff_with, Diagnostic, Side};
pub use script::{EditScript, Move};

/// Identity of a list item.
///
/// Implemented for every `Clone + Eq + Hash + Debug` type.
pub trait Identity: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Identity for T {}
