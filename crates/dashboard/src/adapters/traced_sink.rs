// Rust guideline compliant 2026-10-17

//! Logging decorator for the `StateSink` port.
//!
//! Forwards every transition to the wrapped sink unchanged and records it
//! through `tracing`: connection changes at `info`, everything else at `debug`.

use std::cell::Cell;

use domain::{Action, StateSink};

/// `StateSink` adapter that traces each transition before forwarding it.
#[derive(Debug)]
pub struct TracedSink<'a, S> {
    inner: &'a S,
    applied: Cell<u64>,
}

impl<'a, S: StateSink> TracedSink<'a, S> {
    /// Wrap `inner`.
    #[must_use]
    pub fn new(inner: &'a S) -> Self {
        Self { inner, applied: Cell::new(0) }
    }

    /// Number of transitions forwarded so far.
    #[must_use]
    pub fn applied(&self) -> u64 {
        self.applied.get()
    }
}

impl<S: StateSink> StateSink for TracedSink<'_, S> {
    fn apply(&self, action: Action) {
        match &action {
            Action::SetConnected(connected) => {
                tracing::info!(connected, "traced_sink.connection");
            }
            Action::AddTransaction(tx) => {
                tracing::debug!(
                    transaction_id = %tx.id,
                    risk = ?tx.risk_level,
                    status = ?tx.status,
                    "traced_sink.transaction"
                );
            }
            other => tracing::debug!(transition = other.name(), "traced_sink.transition"),
        }
        self.applied.set(self.applied.get() + 1);
        self.inner.apply(action);
    }
}
