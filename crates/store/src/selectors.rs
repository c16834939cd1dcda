// Rust guideline compliant 2026-10-17

//! Read-side views over [`AppState`] for presentation consumers.
//!
//! All functions are pure: they derive from the state alone and never read
//! the clock. Hour-of-day bucketing uses UTC.

use std::collections::vec_deque;

use chrono::{DateTime, Timelike as _, Utc};
use domain::{AgentStatus, RiskLevel, Transaction};
use serde::Serialize;

use crate::AppState;

/// Number of transactions the live stream view shows.
pub const STREAM_VIEW_LEN: usize = 20;

/// The first `n` transactions, newest first.
#[must_use]
pub fn recent_transactions(state: &AppState, n: usize) -> vec_deque::Iter<'_, Transaction> {
    state.transactions.range(..n.min(state.transactions.len()))
}

/// One point of the fraud-score trend chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskPoint {
    pub timestamp: DateTime<Utc>,
    pub fraud_score: u8,
    pub amount: f64,
}

/// The `n` most recent transactions as chart points, oldest first.
#[must_use]
pub fn risk_timeline(state: &AppState, n: usize) -> Vec<RiskPoint> {
    recent_transactions(state, n)
        .rev()
        .map(|tx| RiskPoint {
            timestamp: tx.timestamp,
            fraud_score: tx.fraud_score,
            amount: tx.amount,
        })
        .collect()
}

/// Transaction activity within one hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyBucket {
    /// Hour of day, `0..24`.
    pub hour: u32,
    pub transactions: usize,
    pub high_risk: usize,
    /// `high_risk / transactions * 100`; `0` for an empty bucket.
    pub fraud_rate: f64,
}

/// Exactly 24 buckets, indexed by hour of day.
#[must_use]
#[expect(clippy::cast_precision_loss, reason = "bucket counts never exceed the store capacity")]
pub fn hourly_activity(state: &AppState) -> Vec<HourlyBucket> {
    let mut buckets: Vec<HourlyBucket> = (0..24)
        .map(|hour| HourlyBucket { hour, transactions: 0, high_risk: 0, fraud_rate: 0.0 })
        .collect();
    for tx in &state.transactions {
        // hour() is always < 24.
        let bucket = &mut buckets[tx.timestamp.hour() as usize];
        bucket.transactions += 1;
        if tx.risk_level == RiskLevel::High {
            bucket.high_risk += 1;
        }
    }
    for bucket in &mut buckets {
        if bucket.transactions > 0 {
            bucket.fraud_rate = bucket.high_risk as f64 / bucket.transactions as f64 * 100.0;
        }
    }
    buckets
}

/// Number of alerts with severity `high` or `critical`.
#[must_use]
pub fn urgent_alert_count(state: &AppState) -> usize {
    state.alerts.iter().filter(|a| a.severity.is_urgent()).count()
}

/// Number of agents currently `active`.
#[must_use]
pub fn active_agent_count(state: &AppState) -> usize {
    state.agents.iter().filter(|a| a.status == AgentStatus::Active).count()
}

/// One-line rollup of the dashboard header and metric cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub transactions: usize,
    pub alerts: usize,
    pub urgent_alerts: usize,
    pub active_agents: usize,
    pub total_transactions: u64,
    pub fraud_detected: u64,
    /// Percentage; NaN when no transactions are counted.
    pub detection_rate: f64,
    pub latest_fraud_score: Option<u8>,
    pub is_connected: bool,
    pub loading: bool,
}

impl DashboardSummary {
    /// Summarize `state`.
    #[must_use]
    pub fn from_state(state: &AppState) -> Self {
        Self {
            transactions: state.transactions.len(),
            alerts: state.alerts.len(),
            urgent_alerts: urgent_alert_count(state),
            active_agents: active_agent_count(state),
            total_transactions: state.metrics.total_transactions,
            fraud_detected: state.metrics.fraud_detected,
            detection_rate: state.metrics.detection_rate(),
            latest_fraud_score: state.transactions.front().map(|tx| tx.fraud_score),
            is_connected: state.is_connected,
            loading: state.loading,
        }
    }
}
