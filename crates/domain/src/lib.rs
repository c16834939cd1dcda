// Rust guideline compliant 2026-10-17

//! Shared domain types for the fraud-monitoring simulation.
//!
//! Defines the synthetic records (`Transaction`, `Agent`, `FraudMetrics`,
//! `RealTimeAlert`), the closed set of state transitions (`Action`), and the
//! `StateSink` port through which the simulator hands transitions to the
//! state store. All other crates depend on this one; it depends on none of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Risk classification
// ---------------------------------------------------------------------------

/// Fraud score at or above which a transaction is classified `High`.
pub const HIGH_RISK_THRESHOLD: u8 = 70;

/// Fraud score at or above which a transaction is classified `Medium`.
pub const MEDIUM_RISK_THRESHOLD: u8 = 40;

/// Categorical risk bucket derived from a fraud score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Score below 40.
    Low,
    /// Score in `[40, 70)`.
    Medium,
    /// Score of 70 or more.
    High,
}

impl RiskLevel {
    /// Classify a fraud score using the fixed 70 / 40 thresholds.
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        if score >= HIGH_RISK_THRESHOLD {
            Self::High
        } else if score >= MEDIUM_RISK_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Outcome attached to a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Low risk; let through.
    Approved,
    /// Medium or high risk; held for review.
    Flagged,
    /// Rejected outright. Never produced by the simulator, but a valid state.
    Blocked,
}

impl TransactionStatus {
    /// Status the simulator assigns for a given risk level.
    #[must_use]
    pub fn for_risk(risk: RiskLevel) -> Self {
        match risk {
            RiskLevel::Low => Self::Approved,
            RiskLevel::Medium | RiskLevel::High => Self::Flagged,
        }
    }

    /// `true` for statuses counted as detected fraud (`Flagged`, `Blocked`).
    #[must_use]
    pub fn is_suspicious(self) -> bool {
        matches!(self, Self::Flagged | Self::Blocked)
    }
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

/// One agent's annotation on a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentAnalysis {
    /// Roster id of the annotating agent.
    pub agent_id: String,
    /// Display name of the annotating agent.
    pub agent_name: String,
    /// Confidence percentage in `[70, 100)`.
    pub confidence: f64,
    /// Human-readable justification keyed by the transaction's risk level.
    pub reasoning: String,
    /// Generation time of the annotation.
    pub timestamp: DateTime<Utc>,
}

/// A synthetic payment event. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// `txn-<unix millis>-<random suffix>`.
    pub id: String,
    /// Positive amount with two-decimal precision.
    pub amount: f64,
    /// Event time; hour of day feeds the score.
    pub timestamp: DateTime<Utc>,
    /// `user-<n>` drawn from a fixed id space.
    pub user_id: String,
    /// `merchant-<n>` drawn from a fixed id space.
    pub merchant_id: String,
    /// Display name from the merchant catalog.
    pub merchant_name: String,
    /// `City, ST` from the location catalog.
    pub location: String,
    /// One of the catalog payment methods.
    pub payment_method: String,
    /// Integer score in `[0, 100]`.
    pub fraud_score: u8,
    /// Always [`RiskLevel::from_score`] of `fraud_score`.
    pub risk_level: RiskLevel,
    /// Outcome assigned from `risk_level`.
    pub status: TransactionStatus,
    /// Two to four annotations, in roster order.
    pub agent_analysis: Vec<AgentAnalysis>,
}

impl Transaction {
    /// `true` when `risk_level` matches `fraud_score` and `status` is one the
    /// simulator could have assigned for that risk level.
    ///
    /// `Blocked` is accepted for medium and high risk since it is a stricter
    /// outcome than `Flagged`.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let risk = RiskLevel::from_score(self.fraud_score);
        if self.fraud_score > 100 || risk != self.risk_level {
            return false;
        }
        match self.status {
            TransactionStatus::Blocked => risk != RiskLevel::Low,
            status => status == TransactionStatus::for_risk(risk),
        }
    }
}

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

/// Analysis specialty of a roster agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentKind {
    Pattern,
    Anomaly,
    Behavioral,
    Network,
    RuleBased,
}

/// Current activity of a roster agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Active,
    Processing,
    Idle,
}

/// A named synthetic analysis identity with mutable status and counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// Stable roster id, e.g. `agent-pattern`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Analysis family; serialized as `type`.
    #[serde(rename = "type")]
    pub kind: AgentKind,
    /// Current activity state.
    pub status: AgentStatus,
    /// Percentage fixed at roster creation; status updates never touch it.
    pub accuracy: f64,
    /// Non-decreasing counter.
    pub processed_transactions: u64,
    /// Non-decreasing counter.
    pub detected_fraud: u64,
    /// Time of the last status update.
    pub last_activity: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Low / medium / high percentages. Drawn independently, so they need not sum to 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskDistribution {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

/// Aggregate display metrics. Replaced wholesale on every update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudMetrics {
    pub total_transactions: u64,
    pub fraud_detected: u64,
    pub false_positives: u64,
    pub accuracy: f64,
    /// Milliseconds.
    pub avg_processing_time: f64,
    pub risk_distribution: RiskDistribution,
}

impl FraudMetrics {
    /// Percentage of transactions detected as fraud.
    ///
    /// Returns `f64::NAN` when `total_transactions` is zero.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "display ratio over counters far below 2^52")]
    pub fn detection_rate(&self) -> f64 {
        ratio(self.fraud_detected as f64, self.total_transactions as f64) * 100.0
    }
}

/// `numerator / denominator`, or `f64::NAN` when the denominator is zero.
#[must_use]
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        f64::NAN
    } else {
        numerator / denominator
    }
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

/// Category of a real-time alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    FraudDetected,
    HighRisk,
    SystemAlert,
}

/// Alert severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// `true` for `High` and `Critical`.
    #[must_use]
    pub fn is_urgent(self) -> bool {
        self >= Self::High
    }
}

/// A synthetic notification. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealTimeAlert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Payload of [`Action::Initialize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialData {
    pub transactions: Vec<Transaction>,
    pub agents: Vec<Agent>,
    pub metrics: FraudMetrics,
}

/// The closed set of named state transitions.
///
/// Serialized as `{"type": NAME, "payload": ...}` using the dashboard's
/// transition names (see [`Action::name`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Action {
    #[serde(rename = "SET_LOADING")]
    SetLoading(bool),
    #[serde(rename = "SET_CONNECTED")]
    SetConnected(bool),
    #[serde(rename = "ADD_TRANSACTION")]
    AddTransaction(Transaction),
    #[serde(rename = "UPDATE_AGENTS")]
    ReplaceAgents(Vec<Agent>),
    #[serde(rename = "UPDATE_METRICS")]
    ReplaceMetrics(FraudMetrics),
    #[serde(rename = "ADD_ALERT")]
    AddAlert(RealTimeAlert),
    #[serde(rename = "CLEAR_ALERTS")]
    ClearAlerts,
    #[serde(rename = "INITIALIZE_DATA")]
    Initialize(InitialData),
}

/// Every transition name accepted by [`Action::from_json`].
pub const ACTION_NAMES: &[&str] = &[
    "SET_LOADING",
    "SET_CONNECTED",
    "ADD_TRANSACTION",
    "UPDATE_AGENTS",
    "UPDATE_METRICS",
    "ADD_ALERT",
    "CLEAR_ALERTS",
    "INITIALIZE_DATA",
];

impl Action {
    /// Wire name of this transition.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetLoading(_) => "SET_LOADING",
            Self::SetConnected(_) => "SET_CONNECTED",
            Self::AddTransaction(_) => "ADD_TRANSACTION",
            Self::ReplaceAgents(_) => "UPDATE_AGENTS",
            Self::ReplaceMetrics(_) => "UPDATE_METRICS",
            Self::AddAlert(_) => "ADD_ALERT",
            Self::ClearAlerts => "CLEAR_ALERTS",
            Self::Initialize(_) => "INITIALIZE_DATA",
        }
    }

    /// Parse a named transition from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::Unknown`] when the `type` field names no known
    /// transition, or [`ActionError::Malformed`] when the document or payload
    /// does not match the transition's shape. A payload on `CLEAR_ALERTS` is
    /// ignored.
    pub fn from_json(raw: &str) -> Result<Self, ActionError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| ActionError::Malformed { reason: e.to_string() })?;
        let Some(name) = value.get("type").and_then(serde_json::Value::as_str) else {
            return Err(ActionError::Malformed {
                reason: "missing string field `type`".to_owned(),
            });
        };
        if !ACTION_NAMES.contains(&name) {
            return Err(ActionError::Unknown { name: name.to_owned() });
        }
        if name == Self::ClearAlerts.name() {
            return Ok(Self::ClearAlerts);
        }
        serde_json::from_value(value).map_err(|e| ActionError::Malformed { reason: e.to_string() })
    }
}

/// Errors from parsing a named transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// The transition name is not one of [`ACTION_NAMES`].
    #[error("unknown transition: {name}")]
    Unknown {
        /// The name that was supplied.
        name: String,
    },
    /// The document could not be decoded into a transition.
    #[error("malformed transition: {reason}")]
    Malformed {
        /// Human-readable description.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Port
// ---------------------------------------------------------------------------

/// Hexagonal port: receiver of state transitions.
///
/// The simulator depends exclusively on this trait -- never on a concrete
/// store. Application is synchronous and total; there is no error path.
pub trait StateSink {
    /// Apply one transition.
    fn apply(&self, action: Action);
}

impl<T: StateSink + ?Sized> StateSink for &T {
    fn apply(&self, action: Action) {
        (**self).apply(action);
    }
}
