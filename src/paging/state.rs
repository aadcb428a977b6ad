use std::fmt::Debug;

use crate::error::FetchError;
use crate::mvi::State;
use crate::reconcile::Identity;

use super::token::RequestToken;

/// Display state of the trailing loading/retry indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FooterState {
    #[default]
    Idle,
    Loading,
    /// Shows a retry affordance. Automatic load-more stays off until the
    /// user retries or the footer scrolls out of view.
    Failed,
}

/// Which loader operation a fetch belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Refresh,
    LoadMore,
}

/// Coarse loader phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Refreshing,
    LoadingMore,
    Failed,
}

/// Everything the paging loader owns.
#[derive(Debug, Clone, PartialEq)]
pub struct PagingState<I, C> {
    /// Accumulated items, unique by identity, in arrival order.
    pub items: Vec<I>,
    /// Cursor of the next page. Once a page has arrived, `None` means
    /// there are no further pages.
    pub cursor: Option<C>,
    /// Re-entrancy guard. True while a fetch is outstanding.
    pub loading: bool,
    pub footer: FooterState,
    /// Whether the footer is part of the rendered list.
    pub footer_attached: bool,
    pub phase: LoadPhase,
    pub current_token: Option<RequestToken>,
    /// Set when a load-more starts, cleared when a page brings new items
    /// and another cursor, or when scrolling settles. Blocks automatic
    /// load-more so an empty page with a cursor cannot retrigger itself.
    pub no_progress: bool,
    /// Operation to rerun on retry while the footer shows `Failed`.
    pub failed_kind: Option<FetchKind>,
    pub last_error: Option<FetchError>,
}

impl<I, C> Default for PagingState<I, C> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cursor: None,
            loading: false,
            footer: FooterState::Idle,
            footer_attached: false,
            phase: LoadPhase::Idle,
            current_token: None,
            no_progress: false,
            failed_kind: None,
            last_error: None,
        }
    }
}

impl<I, C> State for PagingState<I, C>
where
    I: Identity + Send + 'static,
    C: Clone + PartialEq + Debug + Send + 'static,
{
}

impl<I, C> PagingState<I, C> {
    /// Guards of a load-more request: nothing outstanding, a next page
    /// exists, and the footer is not waiting for a manual retry.
    pub fn can_load_more(&self) -> bool {
        !self.loading && self.cursor.is_some() && self.footer != FooterState::Failed
    }

    /// Kind of the fetch currently in flight, if any.
    pub fn in_flight(&self) -> Option<FetchKind> {
        match self.phase {
            LoadPhase::Refreshing => Some(FetchKind::Refresh),
            LoadPhase::LoadingMore => Some(FetchKind::LoadMore),
            LoadPhase::Idle | LoadPhase::Failed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestState = PagingState<u32, String>;

    #[test]
    fn default_is_idle_and_empty() {
        let state = TestState::default();
        assert!(state.items.is_empty());
        assert_eq!(state.footer, FooterState::Idle);
        assert_eq!(state.phase, LoadPhase::Idle);
        assert!(!state.footer_attached);
    }

    #[test]
    fn load_more_needs_cursor() {
        let mut state = TestState::default();
        assert!(!state.can_load_more());
        state.cursor = Some("p2".to_string());
        assert!(state.can_load_more());
        state.footer = FooterState::Failed;
        assert!(!state.can_load_more());
    }

    #[test]
    fn in_flight_follows_phase() {
        let mut state = TestState::default();
        assert_eq!(state.in_flight(), None);
        state.phase = LoadPhase::Refreshing;
        assert_eq!(state.in_flight(), Some(FetchKind::Refresh));
        state.phase = LoadPhase::LoadingMore;
        assert_eq!(state.in_flight(), Some(FetchKind::LoadMore));
    }
}
