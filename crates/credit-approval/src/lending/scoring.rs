use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::domain::{Customer, LoanHistoryRecord, LoanHistoryStatus};

const STARTING_SCORE: i32 = 100;
const LATE_LOAN_PENALTY: i32 = 10;
const LOAN_COUNT_PENALTY: i32 = 2;
const LOAN_COUNT_CAP: i32 = 20;
const CURRENT_YEAR_PENALTY: i32 = 5;
const CURRENT_YEAR_CAP: i32 = 15;
const VOLUME_THRESHOLD: f64 = 500_000.0;
const VOLUME_PENALTY: i32 = 10;

/// Integrity score in `[0, 100]`, recomputed for every decision and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreditScore(u8);

impl CreditScore {
    pub const MAX: CreditScore = CreditScore(100);
    pub const ZERO: CreditScore = CreditScore(0);

    /// Clamp an arbitrary running total into the valid range.
    pub fn clamped(raw: i32) -> Self {
        Self(raw.clamp(0, 100) as u8)
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for CreditScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Signals that can lower a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    RepaymentHistory,
    LoanCount,
    CurrentYearActivity,
    LoanVolume,
    ActiveExposure,
}

/// One deduction applied while scoring, kept for audit trails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreDeduction {
    pub factor: ScoreFactor,
    pub points: i32,
    pub notes: String,
}

/// Final score plus the deductions that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditScoreReport {
    pub score: CreditScore,
    pub deductions: Vec<ScoreDeduction>,
    /// Active balances exceeded the approved limit and forced the score to zero.
    pub exposure_breach: bool,
}

/// Score `customer` from their loan history as of `as_of`.
///
/// Records belonging to other customers are ignored. "Current year" means the calendar
/// year of `as_of`.
pub fn compute_score(
    customer: &Customer,
    history: &[LoanHistoryRecord],
    as_of: NaiveDate,
) -> CreditScoreReport {
    let records: Vec<&LoanHistoryRecord> = history
        .iter()
        .filter(|record| record.customer_id == customer.id)
        .collect();

    let total = records.len() as i32;
    let mut deductions = Vec::new();
    let mut score = STARTING_SCORE;

    let on_time = records
        .iter()
        .filter(|record| record.status == LoanHistoryStatus::PaidOnTime)
        .count() as i32;
    let not_on_time = total - on_time;
    if not_on_time > 0 {
        let points = not_on_time * LATE_LOAN_PENALTY;
        deductions.push(ScoreDeduction {
            factor: ScoreFactor::RepaymentHistory,
            points,
            notes: format!("{not_on_time} of {total} loan(s) not paid on time"),
        });
        score -= points;
    }

    let count_points = (total * LOAN_COUNT_PENALTY).min(LOAN_COUNT_CAP);
    if count_points > 0 {
        deductions.push(ScoreDeduction {
            factor: ScoreFactor::LoanCount,
            points: count_points,
            notes: format!("{total} past loan(s)"),
        });
        score -= count_points;
    }

    let current_year = as_of.year();
    let current_year_loans = records
        .iter()
        .filter(|record| record.year == current_year)
        .count() as i32;
    let activity_points = (current_year_loans * CURRENT_YEAR_PENALTY).min(CURRENT_YEAR_CAP);
    if activity_points > 0 {
        deductions.push(ScoreDeduction {
            factor: ScoreFactor::CurrentYearActivity,
            points: activity_points,
            notes: format!("{current_year_loans} loan(s) in {current_year}"),
        });
        score -= activity_points;
    }

    let total_volume: f64 = records.iter().map(|record| record.loan_amount).sum();
    if total_volume > VOLUME_THRESHOLD {
        deductions.push(ScoreDeduction {
            factor: ScoreFactor::LoanVolume,
            points: VOLUME_PENALTY,
            notes: format!("total borrowed {total_volume:.2} exceeds {VOLUME_THRESHOLD:.0}"),
        });
        score -= VOLUME_PENALTY;
    }

    let active_sum: f64 = records
        .iter()
        .filter(|record| record.status == LoanHistoryStatus::Active)
        .map(|record| record.loan_amount)
        .sum();
    if active_sum > customer.approved_limit as f64 {
        deductions.push(ScoreDeduction {
            factor: ScoreFactor::ActiveExposure,
            points: score.max(0),
            notes: format!(
                "active balance {active_sum:.2} exceeds approved limit {}",
                customer.approved_limit
            ),
        });
        return CreditScoreReport {
            score: CreditScore::ZERO,
            deductions,
            exposure_breach: true,
        };
    }

    CreditScoreReport {
        score: CreditScore::clamped(score),
        deductions,
        exposure_breach: false,
    }
}
