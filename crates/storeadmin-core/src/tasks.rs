//! Sequencing and cancellation primitives for screen fetches and search.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

/// Default quiet period for search-as-you-type.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Latest-issued-wins gate for overlapping requests.
///
/// Every request takes a ticket when issued; a completion is applied only if
/// its ticket is still the most recent one, regardless of arrival order.
#[derive(Debug, Default)]
pub struct LatestOnly {
    seq: TaskSeq,
    latest: Option<TaskId>,
}

impl LatestOnly {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket, superseding every earlier one.
    pub fn issue(&mut self) -> TaskId {
        let id = self.seq.next_id();
        self.latest = Some(id);
        id
    }

    pub fn accept(&self, ticket: TaskId) -> bool {
        self.latest == Some(ticket)
    }

    /// Accepts `ticket` once; later calls with the same ticket are rejected.
    pub fn complete(&mut self, ticket: TaskId) -> bool {
        let ok = self.accept(ticket);
        if ok {
            self.latest = None;
        }
        ok
    }

    /// Rejects every outstanding ticket.
    pub fn invalidate(&mut self) {
        self.latest = None;
    }

    pub fn in_flight(&self) -> bool {
        self.latest.is_some()
    }
}

/// Pure debouncer with an injected clock.
///
/// `push` records the latest input and restarts the quiet period; `poll`
/// yields it once the period has elapsed with no further input.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    pending: Option<(String, Instant)>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn push(&mut self, query: impl Into<String>, now: Instant) {
        self.pending = Some((query.into(), now + self.window));
    }

    /// Returns the pending input if its quiet period is over.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => self.pending.take().map(|(query, _)| query),
            _ => None,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// Cancellation scope for the fetches of the current screen.
///
/// Rotating cancels every request started under the previous scope.
#[derive(Debug, Default)]
pub struct ScreenScope {
    token: CancellationToken,
}

impl ScreenScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn rotate(&mut self) -> CancellationToken {
        self.token.cancel();
        self.token = CancellationToken::new();
        self.token.clone()
    }
}
