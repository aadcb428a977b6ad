//! Base trait for intents.

/// Marker trait for intent objects.
///
/// Intents are either user actions (pull to refresh, retry tap) or
/// system events (fetch completions, scroll settling). Reducers turn them
/// into new states.
pub trait Intent: Send + 'static {}
