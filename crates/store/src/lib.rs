// Rust guideline compliant 2026-10-17

//! State store -- the single source of truth for the dashboard.
//!
//! [`reduce`] is a pure function from `(AppState, Action)` to `AppState`; it
//! never reads the clock or a random source, so every transition is testable
//! without the simulator. [`Store`] wraps the state in a `RefCell` and
//! implements the `domain::StateSink` port so the simulator can drive it.
//!
//! Read-side views for presentation consumers live in [`selectors`].

pub mod selectors;

use std::cell::{Ref, RefCell};
use std::collections::VecDeque;

use domain::{Action, Agent, FraudMetrics, RealTimeAlert, StateSink, Transaction};
use serde::Serialize;

/// Maximum number of transactions kept; the oldest are dropped first.
pub const TRANSACTION_CAPACITY: usize = 100;

/// Maximum number of alerts kept; the oldest are dropped first.
pub const ALERT_CAPACITY: usize = 50;

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The composite application state read by every presentation consumer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Most recently added first; at most [`TRANSACTION_CAPACITY`] entries.
    pub transactions: VecDeque<Transaction>,
    /// Agent roster, replaced wholesale.
    pub agents: Vec<Agent>,
    pub metrics: FraudMetrics,
    /// Most recently added first; at most [`ALERT_CAPACITY`] entries.
    pub alerts: VecDeque<RealTimeAlert>,
    pub is_connected: bool,
    pub loading: bool,
}

impl Default for AppState {
    /// Empty, disconnected and loading.
    fn default() -> Self {
        Self {
            transactions: VecDeque::new(),
            agents: vec![],
            metrics: FraudMetrics::default(),
            alerts: VecDeque::new(),
            is_connected: false,
            loading: true,
        }
    }
}

/// Insert `item` at the head of `list`, dropping tail entries beyond `capacity`.
fn push_front_bounded<T>(list: &mut VecDeque<T>, item: T, capacity: usize) {
    list.push_front(item);
    list.truncate(capacity);
}

/// Apply one transition to `state` and return the new state.
///
/// Pure and total: no clock, no randomness, no panics.
#[must_use]
pub fn reduce(mut state: AppState, action: Action) -> AppState {
    match action {
        Action::SetLoading(loading) => state.loading = loading,
        Action::SetConnected(connected) => state.is_connected = connected,
        Action::AddTransaction(tx) => {
            push_front_bounded(&mut state.transactions, tx, TRANSACTION_CAPACITY);
        }
        Action::ReplaceAgents(agents) => state.agents = agents,
        Action::ReplaceMetrics(metrics) => state.metrics = metrics,
        Action::AddAlert(alert) => push_front_bounded(&mut state.alerts, alert, ALERT_CAPACITY),
        Action::ClearAlerts => state.alerts.clear(),
        Action::Initialize(data) => {
            state.transactions = data.transactions.into();
            state.transactions.truncate(TRANSACTION_CAPACITY);
            state.agents = data.agents;
            state.metrics = data.metrics;
            state.loading = false;
        }
    }
    state
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Shared handle over one [`AppState`].
///
/// Interior mutability because the `StateSink` port takes `&self`. Borrows
/// never outlive a single call, so the store is safe to share between futures
/// on a `current_thread` runtime.
#[derive(Debug, Default)]
pub struct Store {
    state: RefCell<AppState>,
}

impl Store {
    /// Create a store holding the default (empty, loading) state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `state`.
    #[must_use]
    pub fn with_state(state: AppState) -> Self {
        Self { state: RefCell::new(state) }
    }

    /// Borrow the current state.
    ///
    /// The borrow must be dropped before the next transition is applied.
    #[must_use]
    pub fn state(&self) -> Ref<'_, AppState> {
        self.state.borrow()
    }

    /// Clone the current state.
    #[must_use]
    pub fn snapshot(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// Apply a transition given in its named JSON form.
    ///
    /// Unknown or malformed transitions leave the state unchanged and return
    /// `false`; they are logged but never propagated.
    pub fn dispatch_json(&self, raw: &str) -> bool {
        match Action::from_json(raw) {
            Ok(action) => {
                self.apply(action);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "store.dispatch.rejected");
                false
            }
        }
    }
}

impl StateSink for Store {
    fn apply(&self, action: Action) {
        tracing::debug!(transition = action.name(), "store.apply");
        let mut state = self.state.borrow_mut();
        let old = std::mem::take(&mut *state);
        *state = reduce(old, action);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
