//! Side-effecting shell around the paging reducer.
//!
//! The loader mints request tokens, spawns fetches on the tokio runtime,
//! and applies their completions when the owner asks for them. All state
//! lives on the owner's context; fetch tasks only ever send a
//! [`Completion`] back over a channel.

use std::mem;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::cache::PageCache;
use crate::config::PagingConfig;
use crate::error::FetchError;
use crate::mvi::Reducer;

use super::intent::PagingIntent;
use super::reducer::PagingReducer;
use super::source::{DataSource, DefaultPolicy, Page, PagingPolicy};
use super::state::{FetchKind, FooterState, PagingState};
use super::token::RequestToken;
use super::visibility::{footer_visible, ScrollMetrics};

type Item<S> = <S as DataSource>::Item;
type Cursor<S> = <S as DataSource>::Cursor;

/// Result of a fetch, tagged with the token it was dispatched under.
#[derive(Debug)]
pub struct Completion<I, C> {
    pub token: RequestToken,
    pub result: Result<Page<I, C>, FetchError>,
}

/// What happened to a completion handed to the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The completion matched the current token and changed state.
    Applied {
        kind: FetchKind,
        token: RequestToken,
    },
    /// A newer request superseded this one. State untouched.
    Stale { token: RequestToken },
}

/// Signals published to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum PagingEvent {
    LoadingStarted {
        kind: FetchKind,
        token: RequestToken,
    },
    LoadingFinished {
        kind: FetchKind,
        token: RequestToken,
    },
    FooterChanged {
        footer: FooterState,
        attached: bool,
    },
    ItemsChanged {
        count: usize,
    },
    /// Any non-cancelled fetch failure.
    FetchFailed {
        kind: FetchKind,
        error: FetchError,
    },
    /// A refresh from the first page failed. Only sent alongside
    /// `FetchFailed` for refreshes.
    RefreshFailed {
        error: FetchError,
    },
}

/// Cursor-based incremental loader for an infinite-scroll list.
pub struct PagingLoader<S: DataSource> {
    source: Arc<S>,
    cache: Option<Arc<dyn PageCache<Item<S>>>>,
    policy: Box<dyn PagingPolicy>,
    config: PagingConfig,
    state: PagingState<Item<S>, Cursor<S>>,
    /// Bumped whenever `state.items` changes.
    revision: u64,
    metrics: Option<ScrollMetrics>,
    refresh_requested: bool,
    outstanding: usize,
    completion_tx: mpsc::UnboundedSender<Completion<Item<S>, Cursor<S>>>,
    completion_rx: mpsc::UnboundedReceiver<Completion<Item<S>, Cursor<S>>>,
    tasks: Vec<JoinHandle<()>>,
    events: broadcast::Sender<PagingEvent>,
}

impl<S: DataSource> PagingLoader<S> {
    pub fn new(source: S, config: PagingConfig) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            source: Arc::new(source),
            cache: None,
            policy: Box::new(DefaultPolicy),
            config,
            state: PagingState::default(),
            revision: 0,
            metrics: None,
            refresh_requested: false,
            outstanding: 0,
            completion_tx,
            completion_rx,
            tasks: Vec::new(),
            events,
        }
    }

    /// Attach a first-page cache and show its contents right away.
    pub fn with_cache(mut self, cache: Arc<dyn PageCache<Item<S>>>) -> Self {
        let cached = cache.load_first_page();
        if !cached.is_empty() {
            tracing::debug!(items = cached.len(), "Seeding list from cached first page");
            self.dispatch(PagingIntent::SetItems { items: cached });
        }
        self.cache = Some(cache);
        self
    }

    pub fn with_policy(mut self, policy: impl PagingPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn state(&self) -> &PagingState<Item<S>, Cursor<S>> {
        &self.state
    }

    pub fn items(&self) -> &[Item<S>] {
        &self.state.items
    }

    pub fn cursor(&self) -> Option<&Cursor<S>> {
        self.state.cursor.as_ref()
    }

    pub fn footer(&self) -> FooterState {
        self.state.footer
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    /// Changes every time the item sequence changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn config(&self) -> &PagingConfig {
        &self.config
    }

    /// Number of dispatched fetches whose completion has not been
    /// received yet, stale ones included.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PagingEvent> {
        self.events.subscribe()
    }

    /// Start over from the first page, superseding anything in flight.
    ///
    /// `show_indicator` only has an effect when the list has a refresh
    /// control. Must be called inside a tokio runtime.
    pub fn refresh_from_beginning(&mut self, show_indicator: bool) -> RequestToken {
        self.policy.on_refresh();
        self.refresh_requested = false;

        let token = RequestToken::mint();
        let show_indicator = show_indicator && self.config.refresh_control;
        self.dispatch(PagingIntent::BeginRefresh {
            token,
            show_indicator,
        });
        tracing::debug!(%token, show_indicator, "Refreshing from first page");
        self.spawn_fetch(FetchKind::Refresh, token, None);
        token
    }

    /// Pull-to-refresh released while the user is still dragging. The
    /// refresh starts once scrolling settles.
    pub fn request_refresh(&mut self) {
        self.refresh_requested = true;
    }

    /// Fetch the page after the current cursor.
    ///
    /// Returns `None` without dispatching when a fetch is outstanding,
    /// there is no next page, or the footer is waiting for a retry.
    pub fn load_more(&mut self) -> Option<RequestToken> {
        if !self.state.can_load_more() {
            tracing::trace!(
                loading = self.state.loading,
                has_cursor = self.state.cursor.is_some(),
                footer = ?self.state.footer,
                "Load more skipped"
            );
            return None;
        }

        let token = RequestToken::mint();
        let cursor = self.state.cursor.clone();
        self.dispatch(PagingIntent::BeginLoadMore { token });
        tracing::debug!(%token, cursor = ?cursor, "Loading next page");
        self.spawn_fetch(FetchKind::LoadMore, token, cursor);
        Some(token)
    }

    /// Retry affordance of a failed footer: reruns whichever operation
    /// failed. No-op unless the footer shows `Failed`.
    pub fn retry(&mut self) -> Option<RequestToken> {
        if self.state.footer != FooterState::Failed {
            return None;
        }
        let failed = self.state.failed_kind;
        self.dispatch(PagingIntent::ClearFailure);
        match failed {
            Some(FetchKind::Refresh) => Some(self.refresh_from_beginning(false)),
            Some(FetchKind::LoadMore) | None => self.load_more(),
        }
    }

    /// Replace items and cursor directly.
    pub fn seed(&mut self, items: Vec<Item<S>>, cursor: Option<Cursor<S>>) {
        self.dispatch(PagingIntent::Seed { items, cursor });
    }

    /// Keep only the items for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&Item<S>) -> bool) {
        let items = self
            .state
            .items
            .iter()
            .filter(|item| keep(item))
            .cloned()
            .collect();
        self.dispatch(PagingIntent::SetItems { items });
    }

    /// Scroll offset changed. May start a load-more.
    ///
    /// Metrics are dropped whenever the items change, so a page that
    /// lands while the footer was on screen waits for the next report.
    pub fn scroll_changed(&mut self, metrics: ScrollMetrics) -> Option<RequestToken> {
        self.metrics = Some(metrics);
        self.load_more_if_visible()
    }

    /// Scrolling came to rest (deceleration ended, or a drag ended
    /// without momentum). Re-arms automatic load-more and starts a
    /// refresh requested while dragging.
    pub fn scroll_settled(&mut self) -> Option<RequestToken> {
        self.dispatch(PagingIntent::ScrollSettled);
        if self.refresh_requested {
            return Some(self.refresh_from_beginning(true));
        }
        None
    }

    /// Wait for the next fetch completion and apply it.
    ///
    /// Returns `None` immediately when nothing is outstanding.
    pub async fn next_completion(&mut self) -> Option<CompletionOutcome> {
        if self.outstanding == 0 {
            return None;
        }
        let completion = self.completion_rx.recv().await?;
        Some(self.apply(completion))
    }

    /// Apply every completion that has already arrived, without waiting.
    pub fn drain_completions(&mut self) -> Vec<CompletionOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(completion) = self.completion_rx.try_recv() {
            outcomes.push(self.apply(completion));
        }
        outcomes
    }

    /// Apply a completion directly.
    ///
    /// Completions normally arrive through [`next_completion`]; this is
    /// the same path for callers driving fetches themselves.
    ///
    /// [`next_completion`]: PagingLoader::next_completion
    pub fn apply(&mut self, completion: Completion<Item<S>, Cursor<S>>) -> CompletionOutcome {
        self.outstanding = self.outstanding.saturating_sub(1);
        let Completion { token, result } = completion;

        let kind = match self.state.in_flight() {
            Some(kind) if self.state.current_token == Some(token) => kind,
            _ => {
                tracing::trace!(%token, "Discarding superseded completion");
                return CompletionOutcome::Stale { token };
            }
        };

        match result {
            Ok(page) => {
                let received = page.items.len();
                let has_next = page.next.is_some();
                self.dispatch(PagingIntent::PageLoaded { token, page });
                tracing::debug!(
                    %token,
                    ?kind,
                    received,
                    total = self.state.items.len(),
                    has_next,
                    "Page loaded"
                );
                if kind == FetchKind::Refresh {
                    tracing::info!(items = self.state.items.len(), has_next, "Refresh completed");
                    if let Some(cache) = &self.cache {
                        cache.save_first_page(&self.state.items);
                    }
                }
                let _ = self.events.send(PagingEvent::LoadingFinished { kind, token });
                if has_next {
                    self.load_more_if_visible();
                }
            }
            Err(error) => {
                let cancelled = error.is_cancelled();
                self.dispatch(PagingIntent::LoadFailed {
                    token,
                    error: error.clone(),
                });
                if cancelled {
                    tracing::debug!(%token, ?kind, "Fetch cancelled");
                } else {
                    tracing::warn!(%token, ?kind, error = %error, "Fetch failed");
                    let _ = self.events.send(PagingEvent::FetchFailed {
                        kind,
                        error: error.clone(),
                    });
                    if kind == FetchKind::Refresh {
                        let _ = self.events.send(PagingEvent::RefreshFailed { error });
                    }
                }
                let _ = self.events.send(PagingEvent::LoadingFinished { kind, token });
            }
        }

        CompletionOutcome::Applied { kind, token }
    }

    /// Invalidate the current token and abort outstanding fetch tasks.
    ///
    /// The completion channel is replaced, so results already queued or
    /// still sent by aborted tasks never reach a later fetch's count.
    pub fn teardown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        self.completion_tx = completion_tx;
        self.completion_rx = completion_rx;
        self.outstanding = 0;
        self.refresh_requested = false;
        self.dispatch(PagingIntent::Teardown);
    }

    fn load_more_if_visible(&mut self) -> Option<RequestToken> {
        if !self.config.auto_load_more || !self.policy.should_load_more() {
            return None;
        }

        let visible = self.state.footer_attached
            && self
                .metrics
                .as_ref()
                .is_some_and(|metrics| footer_visible(metrics, self.config.footer_inset));

        if self.state.footer == FooterState::Failed && !visible {
            self.dispatch(PagingIntent::ClearFailure);
        }

        let has_content = !self.config.refresh_control || !self.state.items.is_empty();
        let armed = self.state.footer == FooterState::Idle && !self.state.no_progress;
        if visible && armed && has_content {
            return self.load_more();
        }
        None
    }

    fn spawn_fetch(&mut self, kind: FetchKind, token: RequestToken, cursor: Option<Cursor<S>>) {
        let source = Arc::clone(&self.source);
        let sender = self.completion_tx.clone();

        self.tasks.retain(|task| !task.is_finished());
        self.tasks.push(tokio::spawn(async move {
            let result = source.load(cursor).await;
            if sender.send(Completion { token, result }).is_err() {
                tracing::trace!(%token, "Completion dropped (loader gone)");
            }
        }));
        self.outstanding += 1;

        let _ = self.events.send(PagingEvent::LoadingStarted { kind, token });
    }

    fn dispatch(&mut self, intent: PagingIntent<Item<S>, Cursor<S>>) {
        let before = mem::take(&mut self.state);
        let footer = (before.footer, before.footer_attached);
        let items_before = before.items.clone();

        self.state = PagingReducer::<Item<S>, Cursor<S>>::reduce(before, intent);

        if footer != (self.state.footer, self.state.footer_attached) {
            let _ = self.events.send(PagingEvent::FooterChanged {
                footer: self.state.footer,
                attached: self.state.footer_attached,
            });
        }
        if items_before != self.state.items {
            self.revision += 1;
            // Metrics describe the old content.
            self.metrics = None;
            let _ = self.events.send(PagingEvent::ItemsChanged {
                count: self.state.items.len(),
            });
        }
    }
}

impl<S: DataSource> Drop for PagingLoader<S> {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
