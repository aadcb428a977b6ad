//! Simulated infinite-scroll feed.
//!
//! Pages come from an in-memory source, the viewport always sits at the
//! bottom of the content, and every edit script the list receives is
//! logged.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use clap::Parser;
use parking_lot::Mutex;
use tokio::sync::broadcast::error::TryRecvError;

use listpager::cache::JsonFileCache;
use listpager::config::Config;
use listpager::error::FetchError;
use listpager::list::{CellProvider, ListAdapter, SnapshotAdapter, UpdateStatus};
use listpager::logging::init_tracing;
use listpager::operation::{LoadingStyle, OperationEvent, OperationTicket, OperationTracker};
use listpager::paged::PagedList;
use listpager::paging::{
    DataSource, FetchKind, FooterState, Page, PagingEvent, Rect, RequestToken, ScrollMetrics,
    Size,
};
use listpager::reconcile::EditScript;

const ROW_HEIGHT: f64 = 44.0;
const VIEWPORT: Size = Size {
    width: 320.0,
    height: 480.0,
};

#[derive(Parser)]
#[command(name = "listpager")]
#[command(about = "Simulate a paged feed and log every list update", long_about = None)]
struct Cli {
    /// Number of pages the feed has
    #[arg(long, default_value = "5")]
    pages: usize,

    /// Items per page
    #[arg(long, default_value = "10")]
    page_size: usize,

    /// Page (0-based) whose first fetch fails
    #[arg(long)]
    fail_page: Option<usize>,

    /// Config file (defaults to the user config path)
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON file caching the first page between runs
    #[arg(long)]
    cache: Option<PathBuf>,
}

/// In-memory feed. Consecutive pages overlap by one item, which the
/// loader drops as a duplicate.
struct FeedSource {
    pages: usize,
    page_size: usize,
    fail_page: Option<usize>,
    failed: Mutex<HashSet<usize>>,
}

#[async_trait]
impl DataSource for FeedSource {
    type Item = String;
    type Cursor = usize;

    async fn load(&self, cursor: Option<usize>) -> Result<Page<String, usize>, FetchError> {
        let page = cursor.unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(20)).await;

        if self.fail_page == Some(page) && self.failed.lock().insert(page) {
            return Err(FetchError::failed(format!("page {page} unavailable")));
        }

        let start = (page * self.page_size).saturating_sub(usize::from(page > 0));
        let end = (page + 1) * self.page_size;
        let items = (start..end).map(|id| format!("item-{id}")).collect();
        let next = (page + 1 < self.pages).then_some(page + 1);
        Ok(Page::new(items, next))
    }
}

/// Adapter that logs each script before mirroring it.
#[derive(Default)]
struct LoggingAdapter {
    rows: SnapshotAdapter<String>,
}

impl ListAdapter<String> for LoggingAdapter {
    fn apply(&mut self, script: &EditScript, items: &[String]) -> UpdateStatus {
        tracing::info!(
            full_reload = script.full_reload,
            deletions = ?script.deletions,
            insertions = script.insertions.len(),
            moves = ?script.moves,
            rows = items.len(),
            "List updated"
        );
        self.rows.apply(script, items)
    }
}

fn metrics_at_bottom(rows: usize) -> ScrollMetrics {
    let content_height = rows as f64 * ROW_HEIGHT;
    let top = (content_height - VIEWPORT.height).max(0.0);
    ScrollMetrics {
        bounds: Rect::new(0.0, top, VIEWPORT.width, VIEWPORT.height),
        content_size: Size::new(VIEWPORT.width, content_height),
        footer_frame: Some(Rect::new(0.0, content_height, VIEWPORT.width, ROW_HEIGHT)),
    }
}

fn style_for(kind: FetchKind) -> LoadingStyle {
    match kind {
        FetchKind::Refresh => LoadingStyle::Opaque,
        FetchKind::LoadMore => LoadingStyle::NonBlocking,
    }
}

fn log_operations(events: &[OperationEvent]) {
    for event in events {
        match event {
            OperationEvent::LoadingShown { indicator } => {
                tracing::debug!(?indicator, "Loading indicator shown")
            }
            OperationEvent::LoadingHidden { indicator } => {
                tracing::debug!(?indicator, "Loading indicator hidden")
            }
            OperationEvent::Failed {
                error,
                retry_offered,
                ..
            } => tracing::info!(error = %error, retry_offered, "Showing failure"),
            OperationEvent::Resolved { .. } => {}
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("loading config")?;

    let source = FeedSource {
        pages: cli.pages,
        page_size: cli.page_size,
        fail_page: cli.fail_page,
        failed: Mutex::new(HashSet::new()),
    };
    let fallback: Box<dyn CellProvider<String, String>> =
        Box::new(|item: &String| Some(format!("[{item}]")));
    let mut feed = PagedList::new(source, LoggingAdapter::default(), Some(fallback), &config);
    if let Some(path) = cli.cache {
        feed = feed.with_cache(Arc::new(JsonFileCache::new(path)));
    }

    let mut paging_events = feed.loader().subscribe();
    let mut operations = OperationTracker::new();
    let mut tickets: HashMap<RequestToken, OperationTicket> = HashMap::new();
    let mut last_error: Option<FetchError> = None;

    feed.refresh(true);

    loop {
        loop {
            let event = match paging_events.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Paging events lagged");
                    continue;
                }
                Err(_) => break,
            };
            match event {
                PagingEvent::LoadingStarted { kind, token } => {
                    let (ticket, events) = operations.begin(style_for(kind), None);
                    log_operations(&events);
                    tickets.insert(token, ticket);
                }
                PagingEvent::FetchFailed { error, .. } => last_error = Some(error),
                PagingEvent::LoadingFinished { token, .. } => {
                    if let Some(ticket) = tickets.remove(&token) {
                        let result = last_error.take().map_or(Ok(()), Err);
                        log_operations(&operations.finish(ticket, result));
                    }
                }
                _ => {}
            }
        }

        if feed.loader().footer() == FooterState::Failed {
            tracing::info!("Retrying failed page");
            feed.retry();
        } else {
            let rows = feed.list().snapshot().len();
            feed.scroll_changed(metrics_at_bottom(rows));
            feed.scroll_settled();
        }

        if feed.next_completion().await.is_none() {
            break;
        }
    }

    let rows = feed.list().snapshot().len();
    if rows > 0 {
        tracing::info!(
            first = %feed.list().cell_at(0),
            last = %feed.list().cell_at(rows - 1),
            rows,
            "Feed complete"
        );
    }
    feed.teardown();
    log_operations(&operations.cancel_all());
    Ok(())
}
