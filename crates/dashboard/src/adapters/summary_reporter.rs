// Rust guideline compliant 2026-10-17

//! Periodic dashboard summary, logged through `tracing`.
//!
//! Stands in for the presentation layer: it only reads the store, via the
//! `store::selectors` views.

use std::cell::Cell;
use std::time::Duration;

use store::Store;
use store::selectors::{DashboardSummary, STREAM_VIEW_LEN, hourly_activity, recent_transactions};

/// Logs a [`DashboardSummary`] of a [`Store`] every `period`.
#[derive(Debug)]
pub struct SummaryReporter {
    period: Duration,
    reports: Cell<u64>,
}

impl SummaryReporter {
    /// Create a reporter that fires every `period`.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self { period, reports: Cell::new(0) }
    }

    /// Number of summaries logged so far.
    #[must_use]
    pub fn reports(&self) -> u64 {
        self.reports.get()
    }

    /// Summarize `store` once and log the result.
    pub fn report_once(&self, store: &Store) -> DashboardSummary {
        // The borrow ends before this function returns; no await in between.
        let state = store.state();
        let summary = DashboardSummary::from_state(&state);
        let stream_high_risk = recent_transactions(&state, STREAM_VIEW_LEN)
            .filter(|tx| tx.risk_level == domain::RiskLevel::High)
            .count();
        let busiest_hour = hourly_activity(&state)
            .into_iter()
            .max_by_key(|bucket| bucket.transactions)
            .filter(|bucket| bucket.transactions > 0)
            .map(|bucket| bucket.hour);

        tracing::info!(
            transactions = summary.transactions,
            alerts = summary.alerts,
            urgent_alerts = summary.urgent_alerts,
            active_agents = summary.active_agents,
            detection_rate = %format!("{:.2}%", summary.detection_rate),
            stream_high_risk,
            busiest_hour = ?busiest_hour,
            connected = summary.is_connected,
            "dashboard.summary"
        );
        self.reports.set(self.reports.get() + 1);
        summary
    }

    /// Log a summary every `period`, forever. Cancel by dropping the future.
    pub async fn run(&self, store: &Store) {
        let mut interval = tokio::time::interval(self.period);
        // The first tick completes immediately; skip it so the first report
        // reflects at least one period of activity.
        interval.tick().await;
        loop {
            interval.tick().await;
            self.report_once(store);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SummaryReporter;
    use domain::{Action, FraudMetrics, StateSink as _};
    use std::time::Duration;
    use store::Store;

    #[test]
    fn report_reflects_store() {
        let store = Store::new();
        store.apply(Action::SetConnected(true));
        store.apply(Action::ReplaceMetrics(FraudMetrics {
            total_transactions: 400,
            fraud_detected: 20,
            ..FraudMetrics::default()
        }));

        let reporter = SummaryReporter::new(Duration::from_secs(10));
        let summary = reporter.report_once(&store);

        assert!(summary.is_connected);
        assert!((summary.detection_rate - 5.0).abs() < 1e-9);
        assert_eq!(reporter.reports(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn run_reports_once_per_period() {
        let store = Store::new();
        let reporter = SummaryReporter::new(Duration::from_secs(10));

        let _ = tokio::time::timeout(Duration::from_secs(35), reporter.run(&store)).await;

        // Ticks at 10, 20 and 30 s.
        assert_eq!(reporter.reports(), 3);
    }
}
