//! Capabilities the paging loader consumes.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::reconcile::Identity;

/// One page returned by a [`DataSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct Page<I, C> {
    pub items: Vec<I>,
    /// Continuation for the following page. `None` means this was the
    /// last one.
    pub next: Option<C>,
}

impl<I, C> Page<I, C> {
    pub fn new(items: Vec<I>, next: Option<C>) -> Self {
        Self { items, next }
    }

    /// A page with no continuation.
    pub fn last(items: Vec<I>) -> Self {
        Self { items, next: None }
    }
}

/// Fetches pages by cursor.
///
/// `load(None)` fetches the first page. Errors are returned from the
/// future, never raised synchronously.
#[async_trait]
pub trait DataSource: Send + Sync + 'static {
    type Item: Identity + Send + Sync + 'static;

    type Cursor: Clone + PartialEq + Debug + Send + Sync + 'static;

    async fn load(
        &self,
        cursor: Option<Self::Cursor>,
    ) -> Result<Page<Self::Item, Self::Cursor>, FetchError>;
}

/// Caller hooks consulted by the loader.
///
/// Every method has a default, so an empty impl gives the standard
/// behaviour.
pub trait PagingPolicy: Send {
    /// Checked before every automatic load-more.
    fn should_load_more(&self) -> bool {
        true
    }

    /// Called when a refresh from the first page begins.
    fn on_refresh(&mut self) {}
}

/// Policy with every default.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPolicy;

impl PagingPolicy for DefaultPolicy {}
