//! Consumer-side debouncing of journey queries

use journey_core::JourneyQuery;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pending {
    query: JourneyQuery,
    due_ms: u64,
}

/// Query issued by the debouncer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IssuedQuery {
    pub at_ms: u64,
    pub query: JourneyQuery,
}

/// Holds the latest query until the zones have been quiet for `delay_ms`
///
/// A query equal to the last one issued is dropped.
#[derive(Debug, Clone)]
pub struct QueryDebouncer {
    delay_ms: u64,
    pending: Option<Pending>,
    last_issued: Option<JourneyQuery>,
}

impl QueryDebouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
            last_issued: None,
        }
    }

    /// Record a new query observed at `now_ms`, replacing any pending one
    pub fn observe(&mut self, query: JourneyQuery, now_ms: u64) {
        self.pending = Some(Pending {
            query,
            due_ms: now_ms.saturating_add(self.delay_ms),
        });
    }

    /// Issue the pending query if its quiet period has elapsed by `now_ms`
    pub fn poll(&mut self, now_ms: u64) -> Option<IssuedQuery> {
        match self.pending {
            Some(pending) if pending.due_ms <= now_ms => {
                self.pending = None;
                self.issue(pending)
            }
            _ => None,
        }
    }

    /// Issue whatever is pending regardless of time
    pub fn flush(&mut self) -> Option<IssuedQuery> {
        let pending = self.pending.take()?;
        self.issue(pending)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn issue(&mut self, pending: Pending) -> Option<IssuedQuery> {
        if self.last_issued == Some(pending.query) {
            tracing::debug!("Dropping query identical to the last one issued");
            return None;
        }
        self.last_issued = Some(pending.query);
        Some(IssuedQuery {
            at_ms: pending.due_ms,
            query: pending.query,
        })
    }
}
