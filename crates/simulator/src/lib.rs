// Rust guideline compliant 2026-10-17

//! Simulator component -- drives synthetic fraud-monitoring activity into a
//! `StateSink` hexagonal port.
//!
//! Three recurring activities share one single-threaded event loop:
//! transaction generation on a re-randomized interval, five staggered agent
//! status timers, and probabilistic metrics refreshes. Every activity goes
//! through the registered sink; with no sink registered they are no-ops.
//!
//! Entry points: [`Simulator::initialize`], [`Simulator::run`],
//! [`Simulator::disconnect`]. Configuration via [`SimulatorConfig::builder`].

pub mod catalog;
pub mod generator;
pub mod scoring;

use std::cell::{Cell, RefCell};
use std::ops::Range;
use std::time::Duration;

use chrono::Utc;
use domain::{Action, Agent, InitialData, RiskLevel, StateSink};
use tokio::sync::Notify;
use tokio::time::Instant;

pub use generator::EventGenerator;

// ---------------------------------------------------------------------------
// SimulatorError
// ---------------------------------------------------------------------------

/// Errors that can occur while configuring the simulator.
///
/// Running the simulation itself has no error path.
#[derive(Debug, thiserror::Error)]
pub enum SimulatorError {
    /// The supplied configuration is invalid.
    #[error("invalid simulator configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// SimulatorConfig + builder
// ---------------------------------------------------------------------------

/// Longest accepted timer period or transaction delay (one year).
pub const MAX_TIMER_PERIOD: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Widest accepted backfill window (one hundred years).
pub const MAX_BACKFILL_WINDOW: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Runtime configuration for a [`Simulator`].
///
/// Construct via [`SimulatorConfig::builder`].
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Range the delay between live transactions is drawn from, re-drawn after every firing.
    pub transaction_interval: Range<Duration>,
    /// Period of the first agent's status timer.
    pub agent_base_period: Duration,
    /// Extra period added per roster position (agent `i` ticks every `base + i * stagger`).
    pub agent_stagger: Duration,
    /// Chance that a live transaction also triggers a metrics refresh.
    pub metrics_refresh_probability: f64,
    /// Number of historical transactions emitted at initialization.
    pub backfill_count: usize,
    /// How far into the past historical transactions may be stamped.
    pub backfill_window: Duration,
    /// Optional RNG seed for reproducible output. `None` seeds from the OS.
    pub seed: Option<u64>,
}

/// Builder for [`SimulatorConfig`].
///
/// Obtain via [`SimulatorConfig::builder`]; finalize with [`build`](Self::build).
#[derive(Debug)]
pub struct SimulatorConfigBuilder {
    config: SimulatorConfig,
}

impl SimulatorConfig {
    /// Create a builder with the dashboard defaults.
    ///
    /// Default values: `transaction_interval = 2000..5000 ms`,
    /// `agent_base_period = 5 s`, `agent_stagger = 1 s`,
    /// `metrics_refresh_probability = 0.3`, `backfill_count = 50`,
    /// `backfill_window = 30 min`, `seed = None`.
    #[must_use]
    pub fn builder() -> SimulatorConfigBuilder {
        SimulatorConfigBuilder {
            config: Self {
                transaction_interval: Duration::from_millis(2_000)..Duration::from_millis(5_000),
                agent_base_period: Duration::from_secs(5),
                agent_stagger: Duration::from_secs(1),
                metrics_refresh_probability: 0.3,
                backfill_count: 50,
                backfill_window: Duration::from_secs(30 * 60),
                seed: None,
            },
        }
    }

    /// Status timer period of the agent at roster position `index`.
    #[must_use]
    pub fn agent_period(&self, index: usize) -> Duration {
        let steps = u32::try_from(index).unwrap_or(u32::MAX);
        self.agent_base_period.saturating_add(self.agent_stagger.saturating_mul(steps))
    }
}

impl SimulatorConfigBuilder {
    /// Override the range live-transaction delays are drawn from.
    #[must_use]
    pub fn transaction_interval(mut self, interval: Range<Duration>) -> Self {
        self.config.transaction_interval = interval;
        self
    }

    /// Override the agent timer base period and per-agent stagger.
    #[must_use]
    pub fn agent_periods(mut self, base: Duration, stagger: Duration) -> Self {
        self.config.agent_base_period = base;
        self.config.agent_stagger = stagger;
        self
    }

    /// Override the chance of a metrics refresh per live transaction.
    #[must_use]
    pub fn metrics_refresh_probability(mut self, p: f64) -> Self {
        self.config.metrics_refresh_probability = p;
        self
    }

    /// Override the size and time span of the initial history.
    #[must_use]
    pub fn backfill(mut self, count: usize, window: Duration) -> Self {
        self.config.backfill_count = count;
        self.config.backfill_window = window;
        self
    }

    /// Fix the RNG seed for deterministic output (useful in tests).
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::InvalidConfig`] when the transaction interval
    /// is empty, starts at zero or ends past [`MAX_TIMER_PERIOD`], an agent
    /// period is zero or longer than [`MAX_TIMER_PERIOD`], the refresh
    /// probability lies outside `[0, 1]`, or the backfill window is wider than
    /// [`MAX_BACKFILL_WINDOW`].
    #[must_use = "the Result must be checked; use ? or unwrap"]
    pub fn build(self) -> Result<SimulatorConfig, SimulatorError> {
        let config = self.config;
        let invalid = |reason: &str| SimulatorError::InvalidConfig { reason: reason.to_owned() };

        if config.transaction_interval.is_empty() || config.transaction_interval.start.is_zero() {
            return Err(invalid("transaction_interval must be a non-empty range starting above zero"));
        }
        if config.transaction_interval.end > MAX_TIMER_PERIOD {
            return Err(invalid("transaction_interval must end within one year"));
        }
        if config.agent_base_period.is_zero() {
            return Err(invalid("agent_base_period must be > 0"));
        }
        if config.agent_period(catalog::ROSTER.len().saturating_sub(1)) > MAX_TIMER_PERIOD {
            return Err(invalid("agent periods must not exceed one year"));
        }
        if !(0.0..=1.0).contains(&config.metrics_refresh_probability) {
            return Err(invalid("metrics_refresh_probability must be within [0, 1]"));
        }
        if config.backfill_window > MAX_BACKFILL_WINDOW {
            return Err(invalid("backfill_window must not exceed one hundred years"));
        }
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Simulator
// ---------------------------------------------------------------------------

/// Lifecycle of a [`Simulator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No sink registered yet.
    Idle,
    /// Sink registered; timers fire while [`Simulator::run`] is polled.
    Running,
    /// Disconnected; no further events are produced.
    Stopped,
}

/// Owns the event generator, the live agent roster and the timer loop.
///
/// Generic over `S: StateSink` for zero-cost static dispatch. The sink is
/// registered by [`initialize`](Self::initialize) and borrowed for `'a`; the
/// simulator is the only writer to it.
#[derive(Debug)]
pub struct Simulator<'a, S: StateSink> {
    config: SimulatorConfig,
    generator: EventGenerator,
    /// Live roster; counters accumulate across status ticks.
    roster: RefCell<Vec<Agent>>,
    sink: Cell<Option<&'a S>>,
    phase: Cell<Phase>,
    /// Wakes the timer loop on disconnect.
    stop: Notify,
}

impl<'a, S: StateSink> Simulator<'a, S> {
    /// Create an idle simulator from `config`.
    #[must_use]
    pub fn new(config: SimulatorConfig) -> Self {
        let generator = EventGenerator::new(config.seed);
        Self {
            config,
            generator,
            roster: RefCell::new(vec![]),
            sink: Cell::new(None),
            phase: Cell::new(Phase::Idle),
            stop: Notify::new(),
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    /// Register `sink` and seed it.
    ///
    /// Emits one `INITIALIZE_DATA` transition (roster, backfilled history
    /// sorted newest first, metrics derived from that history) followed by
    /// `SET_CONNECTED(true)`. Timers start firing once [`run`](Self::run) is
    /// polled. Calling this while already running is ignored.
    pub fn initialize(&self, sink: &'a S) {
        if self.phase.get() == Phase::Running {
            tracing::warn!("simulator.initialize.ignored: already running");
            return;
        }
        self.sink.set(Some(sink));
        self.phase.set(Phase::Running);

        let now = Utc::now();
        let agents = catalog::initial_roster(now);
        let transactions =
            self.generator.backfill(self.config.backfill_count, self.config.backfill_window, now);
        let metrics = generator::metrics_from_history(&transactions);
        *self.roster.borrow_mut() = agents.clone();

        tracing::info!(
            transactions = transactions.len(),
            agents = agents.len(),
            "simulator.initialized"
        );
        self.emit(Action::Initialize(InitialData { transactions, agents, metrics }));
        self.emit(Action::SetConnected(true));
    }

    /// Run the timer loop until [`disconnect`](Self::disconnect) is called.
    ///
    /// Returns immediately when no sink is registered or the simulator is
    /// stopped. Dropping the returned future also cancels every timer.
    pub async fn run(&self) {
        if self.phase.get() != Phase::Running {
            tracing::debug!(phase = ?self.phase.get(), "simulator.run.skipped");
            return;
        }

        let start = Instant::now();
        let mut next_transaction =
            deadline_after(start, self.generator.next_delay(&self.config.transaction_interval));
        let periods: Vec<Duration> =
            (0..self.roster.borrow().len()).map(|i| self.config.agent_period(i)).collect();
        let mut next_agent: Vec<Instant> = periods.iter().map(|p| deadline_after(start, *p)).collect();

        tracing::info!(agent_timers = periods.len(), "simulator.run.started");
        loop {
            let earliest_agent = next_agent
                .iter()
                .enumerate()
                .min_by_key(|(_, deadline)| **deadline)
                .map(|(index, deadline)| (index, *deadline));
            let deadline = match earliest_agent {
                Some((_, agent_deadline)) => next_transaction.min(agent_deadline),
                None => next_transaction,
            };

            // Registering the waiter and checking the phase happen without an
            // await in between, so a disconnect cannot slip through.
            let stopped = self.stop.notified();
            if self.phase.get() != Phase::Running {
                break;
            }
            tokio::select! {
                biased;
                () = stopped => break,
                () = tokio::time::sleep_until(deadline) => {}
            }

            if deadline == next_transaction {
                self.generate_transaction();
                next_transaction =
                    deadline_after(deadline, self.generator.next_delay(&self.config.transaction_interval));
            } else if let Some((index, _)) = earliest_agent {
                self.update_agent_status(index);
                next_agent[index] = deadline_after(deadline, periods[index]);
            }
        }
        tracing::info!("simulator.run.stopped");
    }

    /// Stop every timer and emit `SET_CONNECTED(false)`.
    ///
    /// Idempotent: repeated calls leave the same end state.
    pub fn disconnect(&self) {
        if self.phase.get() == Phase::Running {
            tracing::info!("simulator.disconnect");
        }
        self.phase.set(Phase::Stopped);
        self.stop.notify_waiters();
        if let Some(sink) = self.sink.get() {
            sink.apply(Action::SetConnected(false));
        }
    }

    /// Transaction activity: emit one live transaction, an alert when it is
    /// high risk, and possibly a metrics refresh.
    pub fn generate_transaction(&self) {
        if !self.is_live() {
            return;
        }
        let now = Utc::now();
        let tx = self.generator.create_transaction(now, now);
        tracing::debug!(
            transaction_id = %tx.id,
            amount = tx.amount,
            fraud_score = tx.fraud_score,
            "simulator.transaction.generated"
        );

        let alert = (tx.risk_level == RiskLevel::High).then(|| self.generator.high_risk_alert(&tx, now));
        self.emit(Action::AddTransaction(tx));
        if let Some(alert) = alert {
            tracing::warn!(alert_id = %alert.id, message = %alert.message, "simulator.alert.raised");
            self.emit(Action::AddAlert(alert));
        }

        if self.generator.chance(self.config.metrics_refresh_probability) {
            self.refresh_metrics();
        }
    }

    /// Agent activity: mutate the agent at roster position `index` and emit
    /// the full updated roster. Out-of-range indices are ignored.
    pub fn update_agent_status(&self, index: usize) {
        if !self.is_live() {
            return;
        }
        let roster = {
            let mut roster = self.roster.borrow_mut();
            let Some(agent) = roster.get_mut(index) else {
                tracing::warn!(index, "simulator.agent.unknown_index");
                return;
            };
            self.generator.mutate_agent(agent, Utc::now());
            tracing::debug!(agent_id = %agent.id, status = ?agent.status, "simulator.agent.updated");
            roster.clone()
        }; // borrow dropped before the sink runs
        self.emit(Action::ReplaceAgents(roster));
    }

    /// Metrics activity: replace the metrics with fresh random draws.
    pub fn refresh_metrics(&self) {
        if !self.is_live() {
            return;
        }
        let metrics = self.generator.random_metrics();
        tracing::debug!(total = metrics.total_transactions, "simulator.metrics.refreshed");
        self.emit(Action::ReplaceMetrics(metrics));
    }

    fn is_live(&self) -> bool {
        self.phase.get() == Phase::Running && self.sink.get().is_some()
    }

    fn emit(&self, action: Action) {
        if let Some(sink) = self.sink.get() {
            sink.apply(action);
        }
    }
}

/// `at + delay`, with `delay` capped at [`MAX_TIMER_PERIOD`].
///
/// The config fields are public, so a period may reach the loop unvalidated.
fn deadline_after(at: Instant, delay: Duration) -> Instant {
    at + delay.min(MAX_TIMER_PERIOD)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use store::{Store, TRANSACTION_CAPACITY};

    // ------------------------------------------------------------------
    // Test helpers
    // ------------------------------------------------------------------

    /// Sink that records every transition, with the (paused) clock reading.
    struct RecordingSink {
        events: RefCell<Vec<(Instant, Action)>>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self { events: RefCell::new(vec![]) }
        }

        fn actions(&self) -> Vec<Action> {
            self.events.borrow().iter().map(|(_, a)| a.clone()).collect()
        }

        fn names(&self) -> Vec<&'static str> {
            self.events.borrow().iter().map(|(_, a)| a.name()).collect()
        }

        fn count(&self, name: &str) -> usize {
            self.names().into_iter().filter(|n| *n == name).count()
        }

        fn len(&self) -> usize {
            self.events.borrow().len()
        }
    }

    impl StateSink for RecordingSink {
        fn apply(&self, action: Action) {
            self.events.borrow_mut().push((Instant::now(), action));
        }
    }

    fn seeded(seed: u64) -> SimulatorConfig {
        SimulatorConfig::builder().seed(seed).build().unwrap()
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    #[test]
    fn default_config() {
        let config = SimulatorConfig::builder().build().unwrap();
        assert_eq!(config.transaction_interval, Duration::from_millis(2_000)..Duration::from_millis(5_000));
        assert_eq!(config.backfill_count, 50);
        let periods: Vec<u64> = (0..5).map(|i| config.agent_period(i).as_secs()).collect();
        assert_eq!(periods, vec![5, 6, 7, 8, 9]);
    }

    #[test]
    fn config_rejects_invalid_values() {
        let empty = SimulatorConfig::builder()
            .transaction_interval(Duration::from_secs(3)..Duration::from_secs(3))
            .build();
        assert!(matches!(empty, Err(SimulatorError::InvalidConfig { .. })));

        let zero_start = SimulatorConfig::builder()
            .transaction_interval(Duration::ZERO..Duration::from_secs(1))
            .build();
        assert!(matches!(zero_start, Err(SimulatorError::InvalidConfig { .. })));

        let zero_period = SimulatorConfig::builder().agent_periods(Duration::ZERO, Duration::ZERO).build();
        assert!(matches!(zero_period, Err(SimulatorError::InvalidConfig { .. })));

        for p in [-0.1, 1.5, f64::NAN] {
            let result = SimulatorConfig::builder().metrics_refresh_probability(p).build();
            assert!(matches!(result, Err(SimulatorError::InvalidConfig { .. })), "p = {p}");
        }

        let huge_interval = SimulatorConfig::builder()
            .transaction_interval(Duration::from_secs(1)..Duration::MAX)
            .build();
        assert!(matches!(huge_interval, Err(SimulatorError::InvalidConfig { .. })));

        let huge_base = SimulatorConfig::builder().agent_periods(Duration::MAX, Duration::ZERO).build();
        assert!(matches!(huge_base, Err(SimulatorError::InvalidConfig { .. })));

        // Base fits, but the last agent's staggered period does not.
        let huge_stagger = SimulatorConfig::builder()
            .agent_periods(Duration::from_secs(5), MAX_TIMER_PERIOD / 2)
            .build();
        assert!(matches!(huge_stagger, Err(SimulatorError::InvalidConfig { .. })));

        let huge_window = SimulatorConfig::builder()
            .backfill(50, MAX_BACKFILL_WINDOW + Duration::from_secs(1))
            .build();
        assert!(matches!(huge_window, Err(SimulatorError::InvalidConfig { .. })));
    }

    #[test]
    fn config_accepts_limits() {
        let config = SimulatorConfig::builder()
            .transaction_interval(Duration::from_secs(1)..MAX_TIMER_PERIOD)
            .agent_periods(MAX_TIMER_PERIOD, Duration::ZERO)
            .backfill(50, MAX_BACKFILL_WINDOW)
            .build();
        assert!(config.is_ok());
    }

    #[test]
    fn initialize_with_widest_window_stamps_history_in_the_past() {
        let store = Store::new();
        let simulator = Simulator::new(
            SimulatorConfig::builder().seed(13).backfill(50, MAX_BACKFILL_WINDOW).build().unwrap(),
        );
        let before = Utc::now();
        simulator.initialize(&store);

        let state = store.state();
        assert_eq!(state.transactions.len(), 50);
        assert!(state.transactions.iter().all(|tx| tx.timestamp <= before + chrono::TimeDelta::seconds(1)));
    }

    // ------------------------------------------------------------------
    // Initialization
    // ------------------------------------------------------------------

    #[test]
    fn initialize_emits_data_then_connected() {
        let sink = RecordingSink::new();
        let simulator = Simulator::new(seeded(1));
        simulator.initialize(&sink);

        assert_eq!(sink.names(), vec!["INITIALIZE_DATA", "SET_CONNECTED"]);
        let actions = sink.actions();
        let Action::Initialize(data) = &actions[0] else {
            panic!("first transition must be INITIALIZE_DATA");
        };
        assert_eq!(data.agents.len(), 5);
        assert_eq!(data.transactions.len(), 50);
        assert_eq!(data.metrics.total_transactions, 45_050);
        assert_eq!(actions[1], Action::SetConnected(true));
        assert_eq!(simulator.phase(), Phase::Running);
    }

    #[test]
    fn initialize_populates_store_before_any_timer() {
        let store = Store::new();
        let simulator = Simulator::new(seeded(2));
        simulator.initialize(&store);

        let state = store.state();
        let ids: HashSet<&str> = state.agents.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids.len(), 5, "five distinct agent identities");
        assert_eq!(state.transactions.len(), 50);
        for (newer, older) in state.transactions.iter().zip(state.transactions.iter().skip(1)) {
            assert!(newer.timestamp >= older.timestamp, "history must be newest first");
        }
        assert!(state.transactions.iter().all(domain::Transaction::is_consistent));
        assert!(!state.loading);
        assert!(state.is_connected);
    }

    #[test]
    fn initialize_twice_is_ignored() {
        let sink = RecordingSink::new();
        let simulator = Simulator::new(seeded(3));
        simulator.initialize(&sink);
        simulator.initialize(&sink);
        assert_eq!(sink.len(), 2);
    }

    // ------------------------------------------------------------------
    // Activities
    // ------------------------------------------------------------------

    #[test]
    fn activities_without_sink_are_noops() {
        let simulator: Simulator<'_, RecordingSink> = Simulator::new(seeded(4));
        simulator.generate_transaction();
        simulator.update_agent_status(0);
        simulator.refresh_metrics();
        simulator.disconnect();
        assert_eq!(simulator.phase(), Phase::Stopped);
    }

    #[test]
    fn high_risk_transactions_raise_alerts() {
        let sink = RecordingSink::new();
        let simulator = Simulator::new(seeded(5));
        simulator.initialize(&sink);
        for _ in 0..300 {
            simulator.generate_transaction();
        }

        let actions = sink.actions();
        let mut high = 0;
        for (i, action) in actions.iter().enumerate() {
            if let Action::AddTransaction(tx) = action {
                assert!(tx.is_consistent());
                if tx.risk_level == RiskLevel::High {
                    high += 1;
                    let Some(Action::AddAlert(alert)) = actions.get(i + 1) else {
                        panic!("high-risk transaction must be followed by an alert");
                    };
                    assert_eq!(alert.transaction_id.as_deref(), Some(tx.id.as_str()));
                }
            }
        }
        assert_eq!(sink.count("ADD_ALERT"), high);
        assert_eq!(sink.count("ADD_TRANSACTION"), 300);
        // p = 0.3 over 300 firings.
        let refreshes = sink.count("UPDATE_METRICS");
        assert!((40..=140).contains(&refreshes), "metrics refreshes {refreshes}");
    }

    #[test]
    fn agent_ticks_accumulate_on_live_roster() {
        let sink = RecordingSink::new();
        let simulator = Simulator::new(seeded(6));
        simulator.initialize(&sink);
        let initial = simulator.roster.borrow().clone();

        for _ in 0..100 {
            simulator.update_agent_status(2);
        }
        simulator.update_agent_status(99);

        let actions = sink.actions();
        let Some(Action::ReplaceAgents(last)) = actions.last() else {
            panic!("last transition must be UPDATE_AGENTS");
        };
        assert_eq!(last.len(), 5);
        assert!(last[2].processed_transactions >= initial[2].processed_transactions);
        assert!(last[2].detected_fraud >= initial[2].detected_fraud);
        assert!(last[2].accuracy.to_bits() == initial[2].accuracy.to_bits());
        // Untouched agents keep their startup values.
        assert_eq!(last[0], initial[0]);
        assert_eq!(last[4], initial[4]);
        assert_eq!(sink.count("UPDATE_AGENTS"), 100, "out-of-range index must be ignored");
    }

    // ------------------------------------------------------------------
    // Shutdown
    // ------------------------------------------------------------------

    #[test]
    fn disconnect_is_idempotent() {
        let store = Store::new();
        let simulator = Simulator::new(seeded(7));
        simulator.initialize(&store);

        simulator.disconnect();
        let once = store.snapshot();
        simulator.disconnect();
        let twice = store.snapshot();

        assert_eq!(once, twice);
        assert!(!twice.is_connected);
        assert_eq!(simulator.phase(), Phase::Stopped);
    }

    #[test]
    fn no_events_after_disconnect() {
        let sink = RecordingSink::new();
        let simulator = Simulator::new(seeded(8));
        simulator.initialize(&sink);
        simulator.disconnect();
        let before = sink.len();

        simulator.generate_transaction();
        simulator.update_agent_status(0);
        simulator.refresh_metrics();
        assert_eq!(sink.len(), before);
    }

    #[tokio::test]
    async fn run_without_initialize_returns_immediately() {
        let simulator: Simulator<'_, RecordingSink> = Simulator::new(seeded(9));
        simulator.run().await;
        assert_eq!(simulator.phase(), Phase::Idle);
    }

    // ------------------------------------------------------------------
    // Timer loop (paused clock)
    // ------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn timers_fire_on_schedule_and_stop_on_disconnect() {
        let sink = RecordingSink::new();
        let simulator = Simulator::new(seeded(10));
        simulator.initialize(&sink);

        let outcome = tokio::time::timeout(Duration::from_secs(3_600), async {
            tokio::join!(simulator.run(), async {
                // 61.5 s avoids ties with any agent deadline.
                tokio::time::sleep(Duration::from_millis(61_500)).await;
                simulator.disconnect();
            })
        })
        .await;
        assert!(outcome.is_ok(), "run must return after disconnect");

        // Agent periods 5..9 s within 61.5 s: 12 + 10 + 8 + 7 + 6 ticks.
        assert_eq!(sink.count("UPDATE_AGENTS"), 43);
        // Delays in [2, 5) s: between 12 and 30 firings.
        let transactions = sink.count("ADD_TRANSACTION");
        assert!((12..=30).contains(&transactions), "transactions {transactions}");
        assert_eq!(sink.names().last().copied(), Some("SET_CONNECTED"));

        // Nothing fires after teardown, however long we wait.
        let after = sink.len();
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(sink.len(), after);
    }

    #[tokio::test(start_paused = true)]
    async fn agent_timers_are_staggered() {
        let sink = RecordingSink::new();
        let simulator = Simulator::new(
            SimulatorConfig::builder()
                .seed(11)
                // Push transactions out of the observed window.
                .transaction_interval(Duration::from_secs(1_000)..Duration::from_secs(1_001))
                .build()
                .unwrap(),
        );
        let start = Instant::now();
        simulator.initialize(&sink);

        tokio::join!(simulator.run(), async {
            tokio::time::sleep(Duration::from_millis(10_500)).await;
            simulator.disconnect();
        });

        let offsets: Vec<u128> = sink
            .events
            .borrow()
            .iter()
            .filter(|(_, a)| matches!(a, Action::ReplaceAgents(_)))
            .map(|(at, _)| at.duration_since(start).as_millis())
            .collect();
        // Agent 0 ticks at 5 s and 10 s; agents 1..4 once each at 6..9 s.
        assert_eq!(offsets, vec![5_000, 6_000, 7_000, 8_000, 9_000, 10_000]);
        assert_eq!(sink.count("ADD_TRANSACTION"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn unvalidated_periods_are_capped() {
        let mut config = seeded(14);
        config.agent_base_period = Duration::MAX;
        config.agent_stagger = Duration::MAX;
        config.transaction_interval = Duration::MAX..Duration::MAX;
        let sink = RecordingSink::new();
        let simulator = Simulator::new(config);
        simulator.initialize(&sink);

        tokio::join!(simulator.run(), async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            simulator.disconnect();
        });

        // Every deadline sits a year out: nothing fires before the disconnect.
        assert_eq!(sink.names(), vec!["INITIALIZE_DATA", "SET_CONNECTED", "SET_CONNECTED"]);
        assert_eq!(simulator.phase(), Phase::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_run_cancels_timers() {
        let store = Store::new();
        let simulator = Simulator::new(seeded(12));
        simulator.initialize(&store);

        let _ = tokio::time::timeout(Duration::from_secs(30), simulator.run()).await;
        let frozen = store.snapshot();
        tokio::time::sleep(Duration::from_secs(120)).await;

        assert_eq!(store.snapshot(), frozen);
        // At least six live transactions on top of the history within 30 s.
        assert!(frozen.transactions.len() >= 56);
        assert!(frozen.transactions.len() <= TRANSACTION_CAPACITY);
        assert_eq!(frozen.agents.len(), 5);
        assert!(frozen.is_connected);
    }
}
