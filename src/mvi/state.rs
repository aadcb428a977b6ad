//! Base trait for reducer state.

/// Marker trait for state objects.
///
/// States are cloned to produce new states and compared to detect
/// changes worth publishing.
pub trait State: Clone + PartialEq + Default + Send + 'static {}
