//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

use std::time::Duration;

use async_trait::async_trait;
use listpager::error::FetchError;
use listpager::list::{ListAdapter, SnapshotAdapter, UpdateStatus};
use listpager::paging::{DataSource, Page, Rect, ScrollMetrics, Size};
use listpager::reconcile::EditScript;
use tokio::sync::{mpsc, oneshot};

pub type Cursor = &'static str;
pub type TestPage = Page<u32, Cursor>;

/// A load the scripted source is waiting on. The test decides when and
/// how it resolves, so completions can arrive in any order.
pub struct PendingLoad {
    pub cursor: Option<Cursor>,
    reply: oneshot::Sender<Result<TestPage, FetchError>>,
}

impl PendingLoad {
    pub fn respond(self, items: Vec<u32>, next: Option<Cursor>) {
        let _ = self.reply.send(Ok(Page::new(items, next)));
    }

    pub fn fail(self, message: &str) {
        let _ = self.reply.send(Err(FetchError::failed(message)));
    }

    pub fn cancel(self) {
        let _ = self.reply.send(Err(FetchError::Cancelled));
    }
}

/// Data source whose loads block until the test answers them.
pub struct ScriptedSource {
    requests: mpsc::UnboundedSender<PendingLoad>,
}

#[async_trait]
impl DataSource for ScriptedSource {
    type Item = u32;
    type Cursor = Cursor;

    async fn load(&self, cursor: Option<Cursor>) -> Result<TestPage, FetchError> {
        let (reply, response) = oneshot::channel();
        if self.requests.send(PendingLoad { cursor, reply }).is_err() {
            return Err(FetchError::Cancelled);
        }
        response.await.unwrap_or(Err(FetchError::Cancelled))
    }
}

/// Receiving end of the loads a [`ScriptedSource`] was asked for.
pub struct LoadQueue {
    requests: mpsc::UnboundedReceiver<PendingLoad>,
}

impl LoadQueue {
    /// Wait for the next load. Panics after a second.
    pub async fn next(&mut self) -> PendingLoad {
        tokio::time::timeout(Duration::from_secs(1), self.requests.recv())
            .await
            .expect("timed out waiting for a load")
            .expect("source dropped")
    }

    /// Let spawned fetch tasks run, then take a load if one arrived.
    pub async fn try_next(&mut self) -> Option<PendingLoad> {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        self.requests.try_recv().ok()
    }
}

pub fn scripted() -> (ScriptedSource, LoadQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ScriptedSource { requests: tx }, LoadQueue { requests: rx })
}

/// Adapter that keeps every script it was given.
#[derive(Default)]
pub struct RecordingAdapter {
    pub scripts: Vec<EditScript>,
    pub rows: SnapshotAdapter<u32>,
}

impl ListAdapter<u32> for RecordingAdapter {
    fn apply(&mut self, script: &EditScript, items: &[u32]) -> UpdateStatus {
        self.scripts.push(script.clone());
        self.rows.apply(script, items)
    }
}

/// Viewport scrolled to the bottom of `rows` rows, footer in view.
pub fn at_bottom(rows: usize) -> ScrollMetrics {
    let content_height = rows as f64 * 44.0;
    ScrollMetrics {
        bounds: Rect::new(0.0, (content_height - 480.0).max(0.0), 320.0, 480.0),
        content_size: Size::new(320.0, content_height.max(1.0)),
        footer_frame: Some(Rect::new(0.0, content_height, 320.0, 44.0)),
    }
}

/// Viewport at the top of a long list, footer far out of view.
pub fn at_top() -> ScrollMetrics {
    ScrollMetrics {
        bounds: Rect::new(0.0, 0.0, 320.0, 480.0),
        content_size: Size::new(320.0, 5000.0),
        footer_frame: Some(Rect::new(0.0, 5000.0, 320.0, 44.0)),
    }
}
