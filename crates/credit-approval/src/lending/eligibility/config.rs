use serde::{Deserialize, Serialize};

use crate::config::LendingConfig;

/// Policy knobs for rate correction and the affordability gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityConfig {
    pub max_installment_ratio: f64,
    pub elevated_rate_floor: f64,
    pub high_risk_rate_floor: f64,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            max_installment_ratio: 0.5,
            elevated_rate_floor: 12.0,
            high_risk_rate_floor: 16.0,
        }
    }
}

impl From<&LendingConfig> for EligibilityConfig {
    fn from(value: &LendingConfig) -> Self {
        Self {
            max_installment_ratio: value.max_installment_ratio,
            ..Self::default()
        }
    }
}
