// Rust guideline compliant 2026-10-17

//! Deterministic part of the synthetic fraud score.
//!
//! The generator adds a uniform perturbation in `[0, MAX_PERTURBATION)` to
//! [`base_score`]; everything else here is a pure function so the mapping
//! from amount and hour to score can be tested exactly.

/// Exclusive upper bound of the random term added to the base score.
pub const MAX_PERTURBATION: f64 = 40.0;

/// `true` for the late-night hours 23:00 through 05:59.
#[must_use]
pub fn is_night_hour(hour: u32) -> bool {
    hour >= 23 || hour <= 5
}

/// Score contribution of the amount and the hour of day.
#[must_use]
pub fn base_score(amount: f64, hour: u32) -> f64 {
    let mut score = if amount > 1000.0 {
        30.0
    } else if amount > 500.0 {
        15.0
    } else if amount < 5.0 {
        10.0
    } else {
        0.0
    };
    if is_night_hour(hour) {
        score += 20.0;
    }
    score
}

/// Final integer score in `[0, 100]` for a given perturbation.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is clamped to [0, 100] and rounded before the cast"
)]
pub fn fraud_score(amount: f64, hour: u32, perturbation: f64) -> u8 {
    (base_score(amount, hour) + perturbation).clamp(0.0, 100.0).round() as u8
}
