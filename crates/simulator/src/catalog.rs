// Rust guideline compliant 2026-10-17

//! Fixed enumerations the generator draws from: merchants, locations,
//! payment methods, the five-agent roster, and reasoning phrases.
//!
//! Every index into these tables is derived from the table length, so
//! lookups never panic.

use chrono::{DateTime, TimeDelta, Utc};
use domain::{Agent, AgentKind, AgentStatus, RiskLevel};

pub const MERCHANTS: &[&str] = &[
    "Amazon",
    "Walmart",
    "Target",
    "Best Buy",
    "Home Depot",
    "Starbucks",
    "McDonald's",
    "Shell",
    "Exxon",
    "CVS",
    "Walgreens",
    "Apple Store",
    "Nike",
    "Adidas",
    "Zara",
];

pub const LOCATIONS: &[&str] = &[
    "New York, NY",
    "Los Angeles, CA",
    "Chicago, IL",
    "Houston, TX",
    "Phoenix, AZ",
    "Philadelphia, PA",
    "San Antonio, TX",
    "San Diego, CA",
    "Dallas, TX",
    "San Jose, CA",
    "Austin, TX",
    "Jacksonville, FL",
];

pub const PAYMENT_METHODS: &[&str] = &["Credit Card", "Debit Card", "Digital Wallet", "Bank Transfer"];

/// Exclusive upper bound of the numeric part of `user-<n>`.
pub const USER_ID_SPACE: u32 = 10_000;

/// Exclusive upper bound of the numeric part of `merchant-<n>`.
pub const MERCHANT_ID_SPACE: u32 = 1_000;

/// Static description of one roster agent at startup.
#[derive(Debug, Clone, Copy)]
pub struct AgentSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: AgentKind,
    pub status: AgentStatus,
    pub accuracy: f64,
    pub processed_transactions: u64,
    pub detected_fraud: u64,
    /// Minutes before startup the agent was last active.
    pub idle_minutes: i64,
}

/// The five fixed agent identities, in analysis order.
pub const ROSTER: [AgentSpec; 5] = [
    AgentSpec {
        id: "agent-pattern",
        name: "Pattern Recognition Agent",
        kind: AgentKind::Pattern,
        status: AgentStatus::Active,
        accuracy: 94.2,
        processed_transactions: 15_420,
        detected_fraud: 1_247,
        idle_minutes: 0,
    },
    AgentSpec {
        id: "agent-anomaly",
        name: "Anomaly Detection Agent",
        kind: AgentKind::Anomaly,
        status: AgentStatus::Processing,
        accuracy: 91.8,
        processed_transactions: 12_890,
        detected_fraud: 892,
        idle_minutes: 0,
    },
    AgentSpec {
        id: "agent-behavioral",
        name: "Behavioral Analysis Agent",
        kind: AgentKind::Behavioral,
        status: AgentStatus::Active,
        accuracy: 89.5,
        processed_transactions: 18_750,
        detected_fraud: 1_456,
        idle_minutes: 0,
    },
    AgentSpec {
        id: "agent-network",
        name: "Network Analysis Agent",
        kind: AgentKind::Network,
        status: AgentStatus::Idle,
        accuracy: 87.3,
        processed_transactions: 9_340,
        detected_fraud: 567,
        idle_minutes: 5,
    },
    AgentSpec {
        id: "agent-rules",
        name: "Rule-Based Agent",
        kind: AgentKind::RuleBased,
        status: AgentStatus::Active,
        accuracy: 96.1,
        processed_transactions: 22_100,
        detected_fraud: 1_890,
        idle_minutes: 0,
    },
];

/// Statuses an agent may move to on a status tick.
pub const AGENT_STATUSES: [AgentStatus; 3] =
    [AgentStatus::Active, AgentStatus::Processing, AgentStatus::Idle];

/// Build the startup roster with activity times relative to `now`.
#[must_use]
pub fn initial_roster(now: DateTime<Utc>) -> Vec<Agent> {
    ROSTER
        .iter()
        .map(|spec| Agent {
            id: spec.id.to_owned(),
            name: spec.name.to_owned(),
            kind: spec.kind,
            status: spec.status,
            accuracy: spec.accuracy,
            processed_transactions: spec.processed_transactions,
            detected_fraud: spec.detected_fraud,
            last_activity: now - TimeDelta::minutes(spec.idle_minutes),
        })
        .collect()
}

const HIGH_RISK_REASONS: [&str; 5] = [
    "Unusual spending pattern detected",
    "Transaction amount exceeds normal behavior",
    "Suspicious merchant category",
    "Geolocation anomaly identified",
    "Multiple rapid transactions detected",
];

const MEDIUM_RISK_REASONS: [&str; 5] = [
    "Slightly elevated risk factors",
    "Minor deviation from user pattern",
    "Merchant risk score moderate",
    "Time-based risk factors present",
    "Payment method risk assessment",
];

const LOW_RISK_REASONS: [&str; 5] = [
    "Transaction within normal parameters",
    "Consistent with user behavior",
    "Low-risk merchant and location",
    "Standard transaction pattern",
    "No anomalies detected",
];

/// Reasoning phrases an agent may attach to a transaction of the given risk.
#[must_use]
pub fn reasons_for(risk: RiskLevel) -> &'static [&'static str] {
    match risk {
        RiskLevel::High => &HIGH_RISK_REASONS,
        RiskLevel::Medium => &MEDIUM_RISK_REASONS,
        RiskLevel::Low => &LOW_RISK_REASONS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn roster_ids_are_distinct() {
        let ids: HashSet<_> = ROSTER.iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn initial_roster_offsets_idle_agent() {
        let now = Utc::now();
        let roster = initial_roster(now);
        assert_eq!(roster.len(), 5);
        assert_eq!(roster[0].last_activity, now);
        assert_eq!(roster[3].id, "agent-network");
        assert_eq!(roster[3].last_activity, now - TimeDelta::minutes(5));
    }

    #[test]
    fn five_phrases_per_risk_level() {
        for risk in [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High] {
            assert_eq!(reasons_for(risk).len(), 5);
        }
        assert!(reasons_for(RiskLevel::High).contains(&"Geolocation anomaly identified"));
    }
}
