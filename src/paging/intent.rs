//! Intents for the paging state machine.

use crate::error::FetchError;
use crate::mvi::Intent;

use super::source::Page;
use super::token::RequestToken;

/// Intents that can be dispatched to the paging reducer.
///
/// Tokens are minted by the caller so the reducer stays pure.
#[derive(Debug, Clone)]
pub enum PagingIntent<I, C> {
    /// Replace items and cursor directly, e.g. from a cached first page.
    Seed { items: Vec<I>, cursor: Option<C> },

    /// Replace items, keeping cursor and footer.
    SetItems { items: Vec<I> },

    /// A refresh from the first page was dispatched. Supersedes any
    /// fetch in flight.
    BeginRefresh {
        token: RequestToken,
        show_indicator: bool,
    },

    /// A load-more was dispatched. Ignored when the load-more guards do
    /// not pass.
    BeginLoadMore { token: RequestToken },

    PageLoaded {
        token: RequestToken,
        page: Page<I, C>,
    },

    LoadFailed {
        token: RequestToken,
        error: FetchError,
    },

    /// Drop a `Failed` footer back to idle (retry tapped, or the footer
    /// scrolled out of view).
    ClearFailure,

    /// Scrolling came to rest. Re-arms automatic load-more.
    ScrollSettled,

    /// Owner is going away. Invalidates the current token.
    Teardown,
}

impl<I, C> Intent for PagingIntent<I, C>
where
    I: Send + 'static,
    C: Send + 'static,
{
}
