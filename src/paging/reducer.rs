//! Reducer for the paging state machine.

use std::collections::HashSet;
use std::fmt::Debug;
use std::marker::PhantomData;

use crate::mvi::Reducer;
use crate::reconcile::{dedup, Identity};

use super::intent::PagingIntent;
use super::state::{FetchKind, FooterState, LoadPhase, PagingState};

/// Reducer for paging state transitions.
///
/// Pure function. Dispatching fetches, writing the cache and publishing
/// events are handled by [`PagingLoader`](super::PagingLoader) around the
/// dispatch call.
pub struct PagingReducer<I, C>(PhantomData<fn() -> (I, C)>);

impl<I, C> Reducer for PagingReducer<I, C>
where
    I: Identity + Send + 'static,
    C: Clone + PartialEq + Debug + Send + 'static,
{
    type State = PagingState<I, C>;
    type Intent = PagingIntent<I, C>;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            PagingIntent::Seed { items, cursor } => {
                state.items = dedup(&items);
                state.footer_attached = cursor.is_some();
                if cursor.is_none() {
                    state.footer = FooterState::Idle;
                }
                state.cursor = cursor;
                state
            }

            PagingIntent::SetItems { items } => {
                state.items = dedup(&items);
                state
            }

            PagingIntent::BeginRefresh {
                token,
                show_indicator,
            } => {
                state.current_token = Some(token);
                state.loading = true;
                state.phase = LoadPhase::Refreshing;
                state.no_progress = false;
                state.failed_kind = None;
                state.last_error = None;
                state.footer_attached = true;
                // Without a refresh indicator the footer is the only sign
                // of progress on an empty list.
                state.footer = if !show_indicator && state.items.is_empty() {
                    FooterState::Loading
                } else {
                    FooterState::Idle
                };
                state
            }

            PagingIntent::BeginLoadMore { token } => {
                if !state.can_load_more() {
                    return state;
                }
                state.current_token = Some(token);
                state.loading = true;
                state.phase = LoadPhase::LoadingMore;
                state.footer = FooterState::Loading;
                state.no_progress = true;
                state
            }

            PagingIntent::PageLoaded { token, page } => {
                if state.current_token != Some(token) {
                    return state;
                }
                let Some(kind) = state.in_flight() else {
                    return state;
                };

                match kind {
                    FetchKind::Refresh => {
                        state.items = dedup(&page.items);
                    }
                    FetchKind::LoadMore => {
                        let appended = append_new(&mut state.items, page.items);
                        if appended > 0 && page.next.is_some() {
                            state.no_progress = false;
                        }
                    }
                }
                state.footer_attached = page.next.is_some();
                state.cursor = page.next;
                state.loading = false;
                state.phase = LoadPhase::Idle;
                state.footer = FooterState::Idle;
                state.failed_kind = None;
                state.last_error = None;
                state
            }

            PagingIntent::LoadFailed { token, error } => {
                if state.current_token != Some(token) {
                    return state;
                }
                let Some(kind) = state.in_flight() else {
                    return state;
                };

                state.loading = false;
                if error.is_cancelled() {
                    state.phase = LoadPhase::Idle;
                    state.footer = FooterState::Idle;
                } else {
                    state.phase = LoadPhase::Failed;
                    state.footer = FooterState::Failed;
                    state.failed_kind = Some(kind);
                    state.last_error = Some(error);
                }
                state
            }

            PagingIntent::ClearFailure => {
                if state.footer == FooterState::Failed {
                    state.footer = FooterState::Idle;
                }
                if state.phase == LoadPhase::Failed {
                    state.phase = LoadPhase::Idle;
                }
                state
            }

            PagingIntent::ScrollSettled => {
                state.no_progress = false;
                state
            }

            PagingIntent::Teardown => {
                state.current_token = None;
                state.loading = false;
                state.phase = LoadPhase::Idle;
                state.footer = FooterState::Idle;
                state
            }
        }
    }
}

/// Append items whose identity is not present yet, in arrival order.
/// Returns how many were appended.
fn append_new<I: Identity>(items: &mut Vec<I>, incoming: Vec<I>) -> usize {
    let before = items.len();
    let mut seen: HashSet<I> = items.iter().cloned().collect();
    for item in incoming {
        if seen.insert(item.clone()) {
            items.push(item);
        }
    }
    items.len() - before
}
