// Rust guideline compliant 2026-10-17

//! Synthetic event generation: transactions, alerts, metrics and agent
//! status mutations.
//!
//! [`EventGenerator`] owns the only random source. Every method takes the
//! current time as a parameter, so a seeded generator fed the same clock
//! readings produces identical output.

use std::cell::RefCell;
use std::ops::Range;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Timelike as _, Utc};
use domain::{
    Agent, AgentAnalysis, AlertKind, FraudMetrics, RealTimeAlert, RiskDistribution, RiskLevel,
    Severity, Transaction, TransactionStatus, ratio,
};
use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};

use crate::catalog::{
    AGENT_STATUSES, LOCATIONS, MERCHANT_ID_SPACE, MERCHANTS, PAYMENT_METHODS, ROSTER,
    USER_ID_SPACE, reasons_for,
};
use crate::scoring::{MAX_PERTURBATION, fraud_score};

/// Probability that a generated amount comes from the high-value band.
const HIGH_VALUE_PROBABILITY: f64 = 0.1;

/// Probability that an agent status tick also records one detected fraud.
const DETECTION_PROBABILITY: f64 = 0.1;

/// Length of the random id suffix.
const ID_SUFFIX_LEN: usize = 9;

/// Produces synthetic domain records from a single seeded RNG.
#[derive(Debug)]
pub struct EventGenerator {
    /// Interior mutability required because all public methods take `&self`.
    rng: RefCell<StdRng>,
}

impl EventGenerator {
    /// Create a generator.
    ///
    /// `seed = Some(s)` produces deterministic results; `None` seeds from the OS.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self { rng: RefCell::new(rng) }
    }

    /// Synthesize one transaction stamped `timestamp`, generated at `now`.
    ///
    /// 90% of amounts fall in `[10, 510)`, 10% in `[1000, 6000)`, both with
    /// two-decimal precision. Risk level and status are derived from the
    /// score, so the returned transaction always passes
    /// [`Transaction::is_consistent`].
    #[must_use]
    pub fn create_transaction(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> Transaction {
        let mut rng = self.rng.borrow_mut();

        // Integer cents: every value is exactly two-decimal.
        let cents = if rng.random_bool(HIGH_VALUE_PROBABILITY) {
            rng.random_range(100_000_u32..600_000)
        } else {
            rng.random_range(1_000_u32..51_000)
        };
        let amount = f64::from(cents) / 100.0;

        let perturbation = rng.random_range(0.0..MAX_PERTURBATION);
        let score = fraud_score(amount, timestamp.hour(), perturbation);
        let risk_level = RiskLevel::from_score(score);

        let id = format!("txn-{}-{}", now.timestamp_millis(), random_suffix(&mut rng));
        let user_id = format!("user-{}", rng.random_range(0..USER_ID_SPACE));
        let merchant_id = format!("merchant-{}", rng.random_range(0..MERCHANT_ID_SPACE));
        let merchant_name = pick(&mut rng, MERCHANTS).to_owned();
        let location = pick(&mut rng, LOCATIONS).to_owned();
        let payment_method = pick(&mut rng, PAYMENT_METHODS).to_owned();
        let agent_analysis = analyze(&mut rng, risk_level, now);

        Transaction {
            id,
            amount,
            timestamp,
            user_id,
            merchant_id,
            merchant_name,
            location,
            payment_method,
            fraud_score: score,
            risk_level,
            status: TransactionStatus::for_risk(risk_level),
            agent_analysis,
        }
    }

    /// Synthesize `count` historical transactions stamped up to `window`
    /// before `now`, sorted newest first.
    #[must_use]
    pub fn backfill(&self, count: usize, window: Duration, now: DateTime<Utc>) -> Vec<Transaction> {
        let window_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX);
        let mut history: Vec<Transaction> = (0..count)
            .map(|_| {
                let offset_ms = if window_ms == 0 {
                    0
                } else {
                    self.rng.borrow_mut().random_range(0..window_ms)
                };
                let offset = TimeDelta::from_std(Duration::from_millis(offset_ms))
                    .unwrap_or(TimeDelta::zero());
                let timestamp = now.checked_sub_signed(offset).unwrap_or(DateTime::<Utc>::MIN_UTC);
                self.create_transaction(timestamp, now)
            })
            .collect();
        history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        history
    }

    /// Build the `fraud_detected` alert raised for a high-risk transaction.
    #[must_use]
    pub fn high_risk_alert(&self, tx: &Transaction, now: DateTime<Utc>) -> RealTimeAlert {
        let suffix = random_suffix(&mut self.rng.borrow_mut());
        RealTimeAlert {
            id: format!("alert-{}-{suffix}", now.timestamp_millis()),
            kind: AlertKind::FraudDetected,
            message: format!(
                "High-risk transaction detected: ${} at {}",
                format_amount(tx.amount),
                tx.merchant_name
            ),
            severity: Severity::High,
            timestamp: now,
            transaction_id: Some(tx.id.clone()),
            agent_id: tx.agent_analysis.first().map(|a| a.agent_id.clone()),
        }
    }

    /// Fresh display metrics drawn independently within fixed ranges.
    ///
    /// Unrelated to the transaction history; the risk-distribution
    /// percentages are independent draws and need not sum to 100.
    #[must_use]
    pub fn random_metrics(&self) -> FraudMetrics {
        let mut rng = self.rng.borrow_mut();
        FraudMetrics {
            total_transactions: 50_000 + rng.random_range(0..1_000_u64),
            fraud_detected: 2_500 + rng.random_range(0..500_u64),
            false_positives: 150 + rng.random_range(0..100_u64),
            accuracy: rng.random_range(92.0..97.0),
            avg_processing_time: rng.random_range(150.0..350.0),
            risk_distribution: RiskDistribution {
                low: rng.random_range(70.0..90.0),
                medium: rng.random_range(8.0..23.0),
                high: rng.random_range(2.0..10.0),
            },
        }
    }

    /// Apply one status tick to `agent`: new uniform status, activity time
    /// `now`, `[0, 5)` more processed transactions and, with probability 0.1,
    /// one more detected fraud. Accuracy is left unchanged.
    pub fn mutate_agent(&self, agent: &mut Agent, now: DateTime<Utc>) {
        let mut rng = self.rng.borrow_mut();
        agent.status = AGENT_STATUSES[rng.random_range(0..AGENT_STATUSES.len())];
        agent.last_activity = now;
        agent.processed_transactions += rng.random_range(0..5_u64);
        if rng.random_bool(DETECTION_PROBABILITY) {
            agent.detected_fraud += 1;
        }
    }

    /// Delay until the next live transaction, uniform in `range`
    /// (millisecond resolution). An empty range yields its start.
    #[must_use]
    pub fn next_delay(&self, range: &Range<Duration>) -> Duration {
        let start = u64::try_from(range.start.as_millis()).unwrap_or(u64::MAX);
        let end = u64::try_from(range.end.as_millis()).unwrap_or(u64::MAX);
        if start >= end {
            return range.start;
        }
        Duration::from_millis(self.rng.borrow_mut().random_range(start..end))
    }

    /// Draw `true` with probability `p`.
    pub(crate) fn chance(&self, p: f64) -> bool {
        self.rng.borrow_mut().random_bool(p.clamp(0.0, 1.0))
    }
}

/// Startup metrics derived from the backfilled history plus fixed base offsets.
///
/// The offsets make the headline numbers look like a long-running system;
/// they are display values, not an invariant over the history. An empty
/// history yields NaN risk percentages.
#[must_use]
#[expect(clippy::cast_precision_loss, reason = "history length is tiny compared to 2^52")]
pub fn metrics_from_history(history: &[Transaction]) -> FraudMetrics {
    let total = history.len() as u64;
    let suspicious = history.iter().filter(|tx| tx.status.is_suspicious()).count() as u64;
    let count = |risk: RiskLevel| history.iter().filter(|tx| tx.risk_level == risk).count() as f64;
    let percent = |risk: RiskLevel| ratio(count(risk), total as f64) * 100.0;

    FraudMetrics {
        total_transactions: total + 45_000,
        fraud_detected: suspicious + 2_400,
        false_positives: suspicious / 10 + 140,
        accuracy: 93.5,
        avg_processing_time: 180.0,
        risk_distribution: RiskDistribution {
            low: percent(RiskLevel::Low),
            medium: percent(RiskLevel::Medium),
            high: percent(RiskLevel::High),
        },
    }
}

/// Render an amount with thousands separators and two decimals (`1,234.50`).
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "amounts are positive and far below u64::MAX cents"
)]
pub fn format_amount(amount: f64) -> String {
    let cents = (amount.max(0.0) * 100.0).round() as u64;
    let digits = (cents / 100).to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{grouped}.{:02}", cents % 100)
}

/// Two to four annotations from the roster prefix, keyed by `risk`.
fn analyze(rng: &mut StdRng, risk: RiskLevel, now: DateTime<Utc>) -> Vec<AgentAnalysis> {
    let count = rng.random_range(2..=4_usize);
    ROSTER[..count]
        .iter()
        .map(|spec| AgentAnalysis {
            agent_id: spec.id.to_owned(),
            agent_name: spec.name.to_owned(),
            confidence: rng.random_range(70.0..100.0),
            reasoning: pick(rng, reasons_for(risk)).to_owned(),
            timestamp: now,
        })
        .collect()
}

/// Uniform choice from a non-empty table.
fn pick<'a>(rng: &mut StdRng, table: &[&'a str]) -> &'a str {
    // Index is always in bounds: derived from len().
    table[rng.random_range(0..table.len())]
}

/// Short hex suffix taken from a UUID built from random bytes.
fn random_suffix(rng: &mut StdRng) -> String {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    let uuid = uuid::Builder::from_random_bytes(bytes).into_uuid();
    uuid.simple().to_string()[..ID_SUFFIX_LEN].to_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
