//! A paging loader bound to a list view.
//!
//! Every operation that can change the loader's items pushes the new
//! snapshot into the list, which diffs it against what is on screen.
//! Appended pages are pushed without animation.

use std::sync::Arc;

use crate::cache::PageCache;
use crate::config::Config;
use crate::list::{CellProvider, ListAdapter, ListEvent, ListView};
use crate::paging::{
    CompletionOutcome, DataSource, FetchKind, PagingLoader, PagingPolicy, RequestToken,
    ScrollMetrics,
};

type Item<S> = <S as DataSource>::Item;

pub struct PagedList<S: DataSource, C, A> {
    loader: PagingLoader<S>,
    list: ListView<Item<S>, C, A>,
    animate: bool,
    synced_revision: Option<u64>,
}

impl<S, C, A> PagedList<S, C, A>
where
    S: DataSource,
    A: ListAdapter<Item<S>>,
{
    pub fn new(
        source: S,
        adapter: A,
        fallback: Option<Box<dyn CellProvider<Item<S>, C>>>,
        config: &Config,
    ) -> Self {
        Self {
            loader: PagingLoader::new(source, config.paging.clone()),
            list: ListView::new(adapter, fallback, &config.list),
            animate: config.list.animate,
            synced_revision: None,
        }
    }

    /// Attach a first-page cache. The cached page is shown right away.
    pub fn with_cache(mut self, cache: Arc<dyn PageCache<Item<S>>>) -> Self {
        self.loader = self.loader.with_cache(cache);
        self.sync(self.animate);
        self
    }

    pub fn with_policy(mut self, policy: impl PagingPolicy + 'static) -> Self {
        self.loader = self.loader.with_policy(policy);
        self
    }

    pub fn loader(&self) -> &PagingLoader<S> {
        &self.loader
    }

    pub fn list(&self) -> &ListView<Item<S>, C, A> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListView<Item<S>, C, A> {
        &mut self.list
    }

    pub fn refresh(&mut self, show_indicator: bool) -> (RequestToken, Vec<ListEvent>) {
        let token = self.loader.refresh_from_beginning(show_indicator);
        (token, self.sync(self.animate))
    }

    pub fn load_more(&mut self) -> Option<RequestToken> {
        self.loader.load_more()
    }

    pub fn retry(&mut self) -> (Option<RequestToken>, Vec<ListEvent>) {
        let token = self.loader.retry();
        (token, self.sync(self.animate))
    }

    pub fn request_refresh(&mut self) {
        self.loader.request_refresh();
    }

    pub fn scroll_changed(&mut self, metrics: ScrollMetrics) -> Option<RequestToken> {
        self.loader.scroll_changed(metrics)
    }

    pub fn scroll_settled(&mut self) -> (Option<RequestToken>, Vec<ListEvent>) {
        let token = self.loader.scroll_settled();
        (token, self.sync(self.animate))
    }

    pub fn retain(&mut self, keep: impl FnMut(&Item<S>) -> bool) -> Vec<ListEvent> {
        self.loader.retain(keep);
        self.sync(self.animate)
    }

    /// Wait for the next completion, apply it and update the list.
    pub async fn next_completion(&mut self) -> Option<(CompletionOutcome, Vec<ListEvent>)> {
        let outcome = self.loader.next_completion().await?;
        let animated = !appended(&outcome);
        Some((outcome, self.sync(animated)))
    }

    pub fn drain_completions(&mut self) -> (Vec<CompletionOutcome>, Vec<ListEvent>) {
        let outcomes = self.loader.drain_completions();
        let animated = !outcomes.iter().any(appended);
        (outcomes, self.sync(animated))
    }

    /// Forwarded from the adapter once an animated update completes.
    pub fn finish_update(&mut self) -> Vec<ListEvent> {
        self.list.finish_update()
    }

    pub fn set_visible(&mut self, visible: bool) -> Vec<ListEvent> {
        self.list.set_visible(visible)
    }

    pub fn teardown(&mut self) {
        self.loader.teardown();
    }

    fn sync(&mut self, animated: bool) -> Vec<ListEvent> {
        let revision = self.loader.revision();
        if self.synced_revision == Some(revision) {
            return Vec::new();
        }
        self.synced_revision = Some(revision);
        self.list.set(self.loader.items().to_vec(), animated && self.animate)
    }
}

fn appended(outcome: &CompletionOutcome) -> bool {
    matches!(outcome, CompletionOutcome::Applied { kind: FetchKind::LoadMore, .. })
}
