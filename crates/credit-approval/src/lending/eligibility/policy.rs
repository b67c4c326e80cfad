use serde::{Deserialize, Serialize};

use super::super::scoring::CreditScore;
use super::config::EligibilityConfig;

/// Shared message for every declined request.
pub const REJECTION_MESSAGE: &str = "Loan not approved due to eligibility criteria";

/// Score band a request falls into.
///
/// Bands are open below and closed above: 51..=100 prime, 31..=50 elevated,
/// 11..=30 high risk, 0..=10 declined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Prime,
    Elevated,
    HighRisk,
    Declined,
}

impl RiskTier {
    pub fn for_score(score: CreditScore) -> Self {
        match score.value() {
            51..=u8::MAX => RiskTier::Prime,
            31..=50 => RiskTier::Elevated,
            11..=30 => RiskTier::HighRisk,
            _ => RiskTier::Declined,
        }
    }

    /// Minimum rate the tier charges, if it corrects the requested rate at all.
    pub fn rate_floor(self, config: &EligibilityConfig) -> Option<f64> {
        match self {
            RiskTier::Elevated => Some(config.elevated_rate_floor),
            RiskTier::HighRisk => Some(config.high_risk_rate_floor),
            RiskTier::Prime | RiskTier::Declined => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskTier::Prime => "prime",
            RiskTier::Elevated => "elevated",
            RiskTier::HighRisk => "high_risk",
            RiskTier::Declined => "declined",
        }
    }
}

/// Why a request was declined. Score and affordability declines stay distinguishable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    CreditScore { score: CreditScore },
    Affordability { installment: f64, limit: f64 },
}

impl RejectionReason {
    pub fn summary(&self) -> String {
        match self {
            RejectionReason::CreditScore { score } => {
                format!("credit score {score} is below the approval threshold")
            }
            RejectionReason::Affordability { installment, limit } => format!(
                "monthly installment {:.2} exceeds affordable limit {:.2}",
                installment, limit
            ),
        }
    }
}

/// Adjudication result for a loan request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EligibilityDecision {
    Approved { installment: f64 },
    Rejected(RejectionReason),
}

impl EligibilityDecision {
    pub fn is_approved(&self) -> bool {
        matches!(self, EligibilityDecision::Approved { .. })
    }

    pub fn summary(&self) -> String {
        match self {
            EligibilityDecision::Approved { installment } => {
                format!("loan approved with monthly installment {:.2}", installment)
            }
            EligibilityDecision::Rejected(reason) => reason.summary(),
        }
    }
}

/// Rate actually charged for `tier`: the requested rate, raised to the tier floor.
pub(crate) fn corrected_rate(tier: RiskTier, requested: f64, config: &EligibilityConfig) -> f64 {
    match tier.rate_floor(config) {
        Some(floor) => requested.max(floor),
        None => requested,
    }
}
