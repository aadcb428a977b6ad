//! Keyed list reconciliation and cursor-based paging for infinite-scroll
//! lists.
//!
//! - [`reconcile`] diffs two snapshots into an [`EditScript`](reconcile::EditScript).
//! - [`paging`] loads pages on demand and keeps the accumulated items.
//! - [`list`] applies snapshots to a view one update at a time.
//! - [`paged`] binds a loader to a list.

pub mod cache;
pub mod config;
pub mod error;
pub mod list;
pub mod logging;
pub mod mvi;
pub mod operation;
pub mod paged;
pub mod paging;
pub mod reconcile;
