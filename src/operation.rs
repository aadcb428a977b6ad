//! Bookkeeping for user-visible operations.
//!
//! Each operation is begun with a [`LoadingStyle`] and an optional key.
//! Beginning a keyed operation cancels the previous operation with the
//! same key. Per-indicator counters decide when a loading indicator shows
//! and hides, so overlapping operations share one indicator.

use std::collections::HashMap;
use std::fmt;

use uuid::Uuid;

use crate::error::FetchError;

/// How an operation presents itself while running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadingStyle {
    /// Opaque overlay covering the content.
    Opaque,
    /// Semi-transparent overlay; failures are shown as alerts.
    Translucent,
    /// Progress bar that leaves the content usable.
    NonBlocking,
    /// No indicator at all.
    None,
}

/// Indicator driven by the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    /// Shared by `Opaque` and `Translucent`.
    Overlay,
    Bar,
}

impl LoadingStyle {
    pub fn indicator(self) -> Option<Indicator> {
        match self {
            LoadingStyle::Opaque | LoadingStyle::Translucent => Some(Indicator::Overlay),
            LoadingStyle::NonBlocking => Some(Indicator::Bar),
            LoadingStyle::None => None,
        }
    }
}

/// Handle for one begun operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationTicket(Uuid);

impl fmt::Display for OperationTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationEvent {
    LoadingShown {
        indicator: Indicator,
    },
    LoadingHidden {
        indicator: Indicator,
    },
    /// The operation is over. Cancelled operations resolve with
    /// [`FetchError::Cancelled`].
    Resolved {
        ticket: OperationTicket,
        result: Result<(), FetchError>,
    },
    /// A non-cancelled failure to surface to the user. `style` and `key`
    /// let the caller rerun the operation when a retry is offered.
    Failed {
        ticket: OperationTicket,
        style: LoadingStyle,
        key: Option<String>,
        error: FetchError,
        retry_offered: bool,
    },
}

#[derive(Debug)]
struct Running {
    style: LoadingStyle,
    key: Option<String>,
}

type RetryPolicy = Box<dyn Fn(&FetchError) -> bool + Send>;

pub struct OperationTracker {
    processing: HashMap<OperationTicket, Running>,
    keyed: HashMap<String, OperationTicket>,
    counters: HashMap<Indicator, usize>,
    retry_policy: RetryPolicy,
}

impl Default for OperationTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationTracker {
    /// Retry is offered for every non-cancelled failure.
    pub fn new() -> Self {
        Self {
            processing: HashMap::new(),
            keyed: HashMap::new(),
            counters: HashMap::new(),
            retry_policy: Box::new(|error: &FetchError| !error.is_cancelled()),
        }
    }

    pub fn with_retry_policy(
        mut self,
        policy: impl Fn(&FetchError) -> bool + Send + 'static,
    ) -> Self {
        self.retry_policy = Box::new(policy);
        self
    }

    pub fn is_processing(&self, ticket: OperationTicket) -> bool {
        self.processing.contains_key(&ticket)
    }

    pub fn processing_count(&self) -> usize {
        self.processing.len()
    }

    /// Operations currently holding `indicator` up.
    pub fn loading_count(&self, indicator: Indicator) -> usize {
        self.counters.get(&indicator).copied().unwrap_or(0)
    }

    /// Start tracking an operation.
    ///
    /// The counter is bumped before a keyed predecessor is cancelled, so a
    /// replaced operation never makes the indicator flicker.
    pub fn begin(
        &mut self,
        style: LoadingStyle,
        key: Option<&str>,
    ) -> (OperationTicket, Vec<OperationEvent>) {
        let ticket = OperationTicket(Uuid::new_v4());
        let mut events = Vec::new();

        self.increment(style, &mut events);
        if let Some(previous) = key.and_then(|key| self.keyed.get(key).copied()) {
            tracing::debug!(%previous, replacement = %ticket, "Cancelling keyed operation");
            self.cancel(previous, &mut events);
        }

        self.processing.insert(
            ticket,
            Running {
                style,
                key: key.map(str::to_string),
            },
        );
        if let Some(key) = key {
            self.keyed.insert(key.to_string(), ticket);
        }
        tracing::trace!(%ticket, ?style, ?key, "Operation started");

        (ticket, events)
    }

    /// Resolve an operation. Ignored when the ticket was already resolved
    /// or cancelled.
    pub fn finish(
        &mut self,
        ticket: OperationTicket,
        result: Result<(), FetchError>,
    ) -> Vec<OperationEvent> {
        let Some(running) = self.remove(ticket) else {
            tracing::trace!(%ticket, "Ignoring result of finished operation");
            return Vec::new();
        };

        let mut events = Vec::new();
        self.decrement(running.style, &mut events);

        if let Err(error) = &result {
            if !error.is_cancelled() {
                let retry_offered = (self.retry_policy)(error);
                tracing::warn!(%ticket, error = %error, retry_offered, "Operation failed");
                events.push(OperationEvent::Failed {
                    ticket,
                    style: running.style,
                    key: running.key,
                    error: error.clone(),
                    retry_offered,
                });
            }
        }
        events.push(OperationEvent::Resolved { ticket, result });
        events
    }

    /// Cancel everything still running.
    pub fn cancel_all(&mut self) -> Vec<OperationEvent> {
        let mut events = Vec::new();
        let tickets: Vec<_> = self.processing.keys().copied().collect();
        for ticket in tickets {
            self.cancel(ticket, &mut events);
        }
        events
    }

    fn cancel(&mut self, ticket: OperationTicket, events: &mut Vec<OperationEvent>) {
        if let Some(running) = self.remove(ticket) {
            self.decrement(running.style, events);
            events.push(OperationEvent::Resolved {
                ticket,
                result: Err(FetchError::Cancelled),
            });
        }
    }

    fn remove(&mut self, ticket: OperationTicket) -> Option<Running> {
        let running = self.processing.remove(&ticket)?;
        if let Some(key) = &running.key {
            if self.keyed.get(key) == Some(&ticket) {
                self.keyed.remove(key);
            }
        }
        Some(running)
    }

    fn increment(&mut self, style: LoadingStyle, events: &mut Vec<OperationEvent>) {
        if let Some(indicator) = style.indicator() {
            let count = self.counters.entry(indicator).or_insert(0);
            *count += 1;
            if *count == 1 {
                events.push(OperationEvent::LoadingShown { indicator });
            }
        }
    }

    fn decrement(&mut self, style: LoadingStyle, events: &mut Vec<OperationEvent>) {
        if let Some(indicator) = style.indicator() {
            let count = self.counters.entry(indicator).or_insert(0);
            *count = count.saturating_sub(1);
            if *count == 0 {
                events.push(OperationEvent::LoadingHidden { indicator });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(
        events: &[OperationEvent],
        ticket: OperationTicket,
    ) -> Option<&Result<(), FetchError>> {
        events.iter().find_map(|event| match event {
            OperationEvent::Resolved { ticket: t, result } if *t == ticket => Some(result),
            _ => None,
        })
    }

    #[test]
    fn overlapping_operations_share_indicator() {
        let mut tracker = OperationTracker::new();
        let (first, events) = tracker.begin(LoadingStyle::Opaque, None);
        assert_eq!(
            events,
            vec![OperationEvent::LoadingShown {
                indicator: Indicator::Overlay
            }]
        );

        let (second, events) = tracker.begin(LoadingStyle::Translucent, None);
        assert!(events.is_empty());
        assert_eq!(tracker.loading_count(Indicator::Overlay), 2);

        let events = tracker.finish(first, Ok(()));
        assert!(!events.contains(&OperationEvent::LoadingHidden {
            indicator: Indicator::Overlay
        }));

        let events = tracker.finish(second, Ok(()));
        assert!(events.contains(&OperationEvent::LoadingHidden {
            indicator: Indicator::Overlay
        }));
    }

    #[test]
    fn keyed_begin_cancels_predecessor() {
        let mut tracker = OperationTracker::new();
        let (first, _) = tracker.begin(LoadingStyle::NonBlocking, Some("search"));
        let (second, events) = tracker.begin(LoadingStyle::NonBlocking, Some("search"));

        assert_eq!(resolved(&events, first), Some(&Err(FetchError::Cancelled)));
        assert!(!events
            .iter()
            .any(|event| matches!(event, OperationEvent::LoadingHidden { .. })));
        assert!(!tracker.is_processing(first));
        assert!(tracker.is_processing(second));
        assert_eq!(tracker.loading_count(Indicator::Bar), 1);
    }

    #[test]
    fn late_finish_of_cancelled_ticket_is_ignored() {
        let mut tracker = OperationTracker::new();
        let (first, _) = tracker.begin(LoadingStyle::NonBlocking, Some("k"));
        let (_second, _) = tracker.begin(LoadingStyle::NonBlocking, Some("k"));

        assert!(tracker.finish(first, Err(FetchError::failed("late"))).is_empty());
        assert_eq!(tracker.loading_count(Indicator::Bar), 1);
    }

    #[test]
    fn failure_offers_retry() {
        let mut tracker = OperationTracker::new();
        let (ticket, _) = tracker.begin(LoadingStyle::Opaque, Some("save"));
        let events = tracker.finish(ticket, Err(FetchError::failed("offline")));
        assert!(events.iter().any(|event| matches!(
            event,
            OperationEvent::Failed {
                retry_offered: true,
                key: Some(key),
                style: LoadingStyle::Opaque,
                ..
            } if key == "save"
        )));
    }

    #[test]
    fn retry_policy_can_decline() {
        let mut tracker = OperationTracker::new().with_retry_policy(|_| false);
        let (ticket, _) = tracker.begin(LoadingStyle::None, None);
        let events = tracker.finish(ticket, Err(FetchError::failed("bad input")));
        assert!(events.iter().any(|event| matches!(
            event,
            OperationEvent::Failed {
                retry_offered: false,
                ..
            }
        )));
    }

    #[test]
    fn cancelled_result_is_not_a_failure() {
        let mut tracker = OperationTracker::new();
        let (ticket, _) = tracker.begin(LoadingStyle::None, None);
        let events = tracker.finish(ticket, Err(FetchError::Cancelled));
        assert!(!events
            .iter()
            .any(|event| matches!(event, OperationEvent::Failed { .. })));
    }

    #[test]
    fn cancel_all_resolves_everything() {
        let mut tracker = OperationTracker::new();
        let (a, _) = tracker.begin(LoadingStyle::Opaque, None);
        let (b, _) = tracker.begin(LoadingStyle::NonBlocking, Some("k"));

        let events = tracker.cancel_all();
        assert_eq!(resolved(&events, a), Some(&Err(FetchError::Cancelled)));
        assert_eq!(resolved(&events, b), Some(&Err(FetchError::Cancelled)));
        assert_eq!(tracker.processing_count(), 0);
        assert_eq!(tracker.loading_count(Indicator::Overlay), 0);
        assert_eq!(tracker.loading_count(Indicator::Bar), 0);
    }
}
