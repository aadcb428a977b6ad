//! Cursor-based paging for infinite-scroll lists.
//!
//! # Architecture
//!
//! Uses MVI (Model-View-Intent):
//! - `state.rs` - paging state (items, cursor, footer, phase)
//! - `intent.rs` - refresh/load-more starts, completions, scroll events
//! - `reducer.rs` - state transitions (pure, no side effects)
//! - `loader.rs` - token minting, fetch dispatch, cache, events
//!
//! ```text
//! Idle ──→ Refreshing ──→ Idle | Failed
//! Idle ──→ LoadingMore ──→ Idle | Failed
//! ```
//!
//! Overlapping requests are resolved by token supersession: a completion
//! is applied only while its token is the loader's current token.

mod intent;
mod loader;
mod reducer;
mod source;
mod state;
mod token;
mod visibility;

pub use intent::PagingIntent;
pub use loader::{Completion, CompletionOutcome, PagingEvent, PagingLoader};
pub use reducer::PagingReducer;
pub use source::{DataSource, DefaultPolicy, Page, PagingPolicy};
pub use state::{FetchKind, FooterState, LoadPhase, PagingState};
pub use token::RequestToken;
pub use visibility::{footer_visible, Rect, ScrollMetrics, Size};
