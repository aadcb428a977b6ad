//! Model-View-Intent primitives used by the paging state machine.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ list / footer
//!    ↑                                  │
//!    └──── scroll, refresh, completion ─┘
//! ```
//!
//! - **State**: snapshot of everything the presentation layer reads
//! - **Intent**: user action or system event (scroll, fetch completion)
//! - **Reducer**: pure function producing the next state

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::State;
