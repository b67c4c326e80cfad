mod config;
mod policy;

pub use config::EligibilityConfig;
pub use policy::{EligibilityDecision, RejectionReason, RiskTier, REJECTION_MESSAGE};

use serde::{Deserialize, Serialize};

use super::domain::Customer;
use super::installment::{monthly_installment, InstallmentError};
use super::request::LoanTerms;
use super::scoring::CreditScore;
use policy::corrected_rate;

/// Stateless evaluator mapping a score and loan terms to a decision.
#[derive(Debug, Clone, Default)]
pub struct EligibilityEngine {
    config: EligibilityConfig,
}

impl EligibilityEngine {
    pub fn new(config: EligibilityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EligibilityConfig {
        &self.config
    }

    /// Tier by score, correct the rate, then apply the affordability gate.
    pub fn evaluate(
        &self,
        customer: &Customer,
        terms: &LoanTerms,
        score: CreditScore,
    ) -> Result<EligibilityOutcome, InstallmentError> {
        let tier = RiskTier::for_score(score);
        let requested_rate = terms.rate();

        if tier == RiskTier::Declined {
            return Ok(EligibilityOutcome {
                decision: EligibilityDecision::Rejected(RejectionReason::CreditScore { score }),
                tier,
                credit_score: score,
                requested_rate,
                applied_rate: requested_rate,
            });
        }

        let applied_rate = corrected_rate(tier, requested_rate, &self.config);
        let installment =
            monthly_installment(terms.amount(), applied_rate, i64::from(terms.tenure()))?;
        let limit = customer.installment_ceiling(self.config.max_installment_ratio);

        let decision = if installment > limit {
            EligibilityDecision::Rejected(RejectionReason::Affordability { installment, limit })
        } else {
            EligibilityDecision::Approved { installment }
        };

        Ok(EligibilityOutcome {
            decision,
            tier,
            credit_score: score,
            requested_rate,
            applied_rate,
        })
    }
}

/// Decision plus the requested and corrected rates so callers can show the correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityOutcome {
    pub decision: EligibilityDecision,
    pub tier: RiskTier,
    pub credit_score: CreditScore,
    pub requested_rate: f64,
    pub applied_rate: f64,
}

impl EligibilityOutcome {
    pub fn approved(&self) -> bool {
        self.decision.is_approved()
    }

    /// Monthly installment, present only when the request is approved.
    pub fn installment(&self) -> Option<f64> {
        match self.decision {
            EligibilityDecision::Approved { installment } => Some(installment),
            EligibilityDecision::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&RejectionReason> {
        match &self.decision {
            EligibilityDecision::Rejected(reason) => Some(reason),
            EligibilityDecision::Approved { .. } => None,
        }
    }
}
