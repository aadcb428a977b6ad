//! List wrapper: snapshot diffing, update serialization, cell resolution
//! and the empty placeholder.

mod adapter;
mod cell;
mod view;

pub use adapter::{ListAdapter, SnapshotAdapter, UpdateStatus};
pub use cell::{CellProvider, CellResolver};
pub use view::{ListEvent, ListView};
