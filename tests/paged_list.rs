mod common;

use std::sync::Arc;

use common::{at_bottom, scripted, RecordingAdapter, ScriptedSource};
use listpager::cache::{MemoryCache, PageCache};
use listpager::config::{Config, ListConfig};
use listpager::list::ListEvent;
use listpager::paged::PagedList;

type Feed = PagedList<ScriptedSource, String, RecordingAdapter>;

fn feed(config: &Config) -> (Feed, common::LoadQueue) {
    let (source, queue) = scripted();
    (
        PagedList::new(source, RecordingAdapter::default(), None, config),
        queue,
    )
}

/// Test that pages flow into the list and appended pages reload without
/// animation.
#[tokio::test]
async fn test_pages_reach_the_list() {
    let (mut feed, mut queue) = feed(&Config::default());

    feed.refresh(true);
    queue.next().await.respond(vec![1, 2, 3], Some("p2"));
    feed.next_completion().await;
    assert_eq!(feed.list().snapshot(), &[1, 2, 3]);

    feed.load_more();
    queue.next().await.respond(vec![3, 4], None);
    let (_, events) = feed.next_completion().await.expect("completion");

    assert_eq!(feed.list().snapshot(), &[1, 2, 3, 4]);
    let script = match &events[0] {
        ListEvent::Applied { script, .. } => script,
        other => panic!("unexpected event {other:?}"),
    };
    assert!(script.full_reload);
    assert_eq!(script.change_count(), 0);
    assert_eq!(feed.list().adapter().rows.rows(), &[1, 2, 3, 4]);
}

/// Test that only a refresh is animated once pages have been appended.
#[tokio::test]
async fn test_append_reloads_while_refresh_diffs() {
    let (mut feed, mut queue) = feed(&Config::default());
    feed.refresh(true);
    queue.next().await.respond(vec![1, 2], Some("p2"));
    feed.next_completion().await;

    feed.load_more();
    queue.next().await.respond(vec![3], Some("p3"));
    feed.next_completion().await;
    assert_eq!(feed.list().snapshot(), &[1, 2, 3]);
    assert!(feed.list().adapter().scripts.last().expect("script").full_reload);

    feed.refresh(true);
    queue.next().await.respond(vec![2, 3, 9], None);
    feed.next_completion().await;

    let last = feed.list().adapter().scripts.last().expect("script");
    assert!(!last.full_reload);
    assert_eq!(last.deletions, vec![0]);
    assert_eq!(last.insertions, vec![2]);
    assert_eq!(feed.list().adapter().rows.rows(), &[2, 3, 9]);
}

/// Test that a refresh replacing the list diffs against the old rows.
#[tokio::test]
async fn test_refresh_diffs_against_shown_rows() {
    let (mut feed, mut queue) = feed(&Config::default());
    feed.refresh(true);
    queue.next().await.respond(vec![1, 2, 3], None);
    feed.next_completion().await;

    feed.refresh(true);
    queue.next().await.respond(vec![3, 1, 4], None);
    feed.next_completion().await;

    let last = feed.list().adapter().scripts.last().expect("script");
    assert_eq!(last.deletions, vec![1]);
    assert_eq!(last.insertions, vec![2]);
    assert_eq!(feed.list().adapter().rows.rows(), &[3, 1, 4]);
}

/// Test that with animation disabled every update is a full reload.
#[tokio::test]
async fn test_animation_disabled_reloads() {
    let config = Config {
        list: ListConfig { animate: false },
        ..Config::default()
    };
    let (mut feed, mut queue) = feed(&config);
    feed.refresh(true);
    queue.next().await.respond(vec![1], Some("p2"));
    feed.next_completion().await;
    feed.load_more();
    queue.next().await.respond(vec![2], None);
    feed.next_completion().await;

    assert!(feed
        .list()
        .adapter()
        .scripts
        .iter()
        .all(|script| script.full_reload));
}

/// Test that a cached page is on screen before any fetch.
#[tokio::test]
async fn test_cached_page_shown_immediately() {
    let cache: Arc<MemoryCache<u32>> = Arc::new(MemoryCache::new());
    cache.save_first_page(&[5, 6]);
    let (feed, _queue) = feed(&Config::default());
    let feed = feed.with_cache(cache);

    assert_eq!(feed.list().snapshot(), &[5, 6]);
}

/// Test that the empty placeholder follows the loaded items.
#[tokio::test]
async fn test_empty_state_follows_items() {
    let (mut feed, mut queue) = feed(&Config::default());
    let (_, events) = feed.refresh(true);
    assert!(events.contains(&ListEvent::EmptyStateChanged { showing: true }));

    queue.next().await.respond(vec![1], None);
    let (_, events) = feed.next_completion().await.expect("completion");
    assert!(events.contains(&ListEvent::EmptyStateChanged { showing: false }));

    let events = feed.retain(|_| false);
    assert!(events.contains(&ListEvent::EmptyStateChanged { showing: true }));
}

/// Test that updates arriving while hidden are applied on show.
#[tokio::test]
async fn test_hidden_list_catches_up_on_show() {
    let (mut feed, mut queue) = feed(&Config::default());
    feed.refresh(true);
    queue.next().await.respond(vec![1], Some("p2"));
    feed.next_completion().await;

    feed.set_visible(false);
    feed.scroll_changed(at_bottom(1));
    queue.next().await.respond(vec![2], None);
    let (_, events) = feed.next_completion().await.expect("completion");
    assert_eq!(events, vec![ListEvent::Deferred]);
    assert_eq!(feed.list().snapshot(), &[1]);

    let events = feed.set_visible(true);
    assert!(matches!(
        &events[0],
        ListEvent::Applied { script, .. } if script.full_reload
    ));
    assert_eq!(feed.list().snapshot(), &[1, 2]);
}

/// Test that teardown stops pending completions from reaching the list.
#[tokio::test]
async fn test_teardown() {
    let (mut feed, mut queue) = feed(&Config::default());
    feed.refresh(true);
    let pending = queue.next().await;
    feed.teardown();
    pending.respond(vec![1], None);

    assert!(feed.next_completion().await.is_none());
    assert!(feed.list().snapshot().is_empty());
    assert!(!feed.loader().is_loading());
}
