//! Reducer trait.

use super::intent::Intent;
use super::state::State;

/// Reducer transforms state based on intents.
///
/// The reducer is the only place where state transitions happen. It is
/// a pure function: `(State, Intent) -> State`. Anything with side
/// effects (minting tokens, dispatching fetches, writing caches) happens
/// in the caller around the dispatch.
pub trait Reducer {
    type State: State;

    type Intent: Intent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}
