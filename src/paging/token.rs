//! Request tokens used to discard stale fetch completions.

use std::fmt;

use uuid::Uuid;

/// Unique id minted for every dispatched fetch.
///
/// A completion is applied only while its token is still the loader's
/// current token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(Uuid);

impl RequestToken {
    pub fn mint() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
