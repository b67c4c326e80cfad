use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Multiplier applied to monthly income when deriving the approved limit.
pub const APPROVED_LIMIT_INCOME_MULTIPLIER: u64 = 36;
/// Approved limits are rounded to the nearest lakh.
pub const APPROVED_LIMIT_ROUNDING: u64 = 100_000;

/// Identifier wrapper for registered customers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CustomerId(pub u64);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier wrapper for recorded loans.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LoanId(pub u64);

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registered borrower. The approved limit is fixed when the record is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub monthly_income: u64,
    pub phone_number: String,
    pub approved_limit: u64,
    pub current_debt: f64,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Largest installment the customer can carry under the given income ratio.
    pub fn installment_ceiling(&self, max_installment_ratio: f64) -> f64 {
        self.monthly_income as f64 * max_installment_ratio
    }
}

/// Fields needed to create a customer; the repository assigns the identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub monthly_income: u64,
    pub phone_number: String,
    pub approved_limit: u64,
    pub current_debt: f64,
}

impl NewCustomer {
    pub fn into_customer(self, id: CustomerId) -> Customer {
        Customer {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            monthly_income: self.monthly_income,
            phone_number: self.phone_number,
            approved_limit: self.approved_limit,
            current_debt: self.current_debt,
        }
    }
}

/// `36 × monthly_income` rounded to the nearest 100,000.
///
/// Exact halves round to the even multiple, so 450,000 becomes 400,000 while 550,000
/// becomes 600,000.
pub fn approved_limit_for(monthly_income: u64) -> u64 {
    let raw = monthly_income.saturating_mul(APPROVED_LIMIT_INCOME_MULTIPLIER);
    let quotient = raw / APPROVED_LIMIT_ROUNDING;
    let remainder = raw % APPROVED_LIMIT_ROUNDING;
    let half = APPROVED_LIMIT_ROUNDING / 2;

    let rounded = if remainder > half || (remainder == half && quotient % 2 == 1) {
        quotient.saturating_add(1)
    } else {
        quotient
    };

    rounded.saturating_mul(APPROVED_LIMIT_ROUNDING)
}

/// Approved loan as stored by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub customer_id: CustomerId,
    pub loan_amount: f64,
    pub tenure: u32,
    /// Rate the customer asked for.
    pub interest_rate: f64,
    /// Rate actually charged after the eligibility correction.
    pub applied_rate: f64,
    pub monthly_installment: f64,
    pub approved: bool,
    pub emis_paid_on_time: bool,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Loan {
    /// Installments still owed at `as_of`, always within `[0, tenure]`.
    ///
    /// One installment falls due per full calendar month after the start date.
    pub fn remaining_installments(&self, as_of: NaiveDate) -> u32 {
        let elapsed = months_elapsed(self.start_date, as_of);
        self.tenure.saturating_sub(elapsed)
    }

    /// Project the loan into the shape the scoring engine consumes.
    pub fn history_record(&self, as_of: NaiveDate) -> LoanHistoryRecord {
        let status = if as_of < self.end_date {
            LoanHistoryStatus::Active
        } else if self.emis_paid_on_time {
            LoanHistoryStatus::PaidOnTime
        } else {
            LoanHistoryStatus::Other
        };

        LoanHistoryRecord {
            customer_id: self.customer_id,
            loan_amount: self.loan_amount,
            status,
            year: self.start_date.year(),
        }
    }
}

/// Whole calendar months between `start` and `as_of`; zero when `as_of` is not after `start`.
pub fn months_elapsed(start: NaiveDate, as_of: NaiveDate) -> u32 {
    if as_of <= start {
        return 0;
    }

    let mut months = (as_of.year() - start.year()) * 12 + as_of.month() as i32
        - start.month() as i32;
    if as_of.day() < start.day() {
        months -= 1;
    }

    months.max(0) as u32
}

/// Fields needed to record a loan; the repository assigns the identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLoan {
    pub customer_id: CustomerId,
    pub loan_amount: f64,
    pub tenure: u32,
    pub interest_rate: f64,
    pub applied_rate: f64,
    pub monthly_installment: f64,
    pub emis_paid_on_time: bool,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl NewLoan {
    pub fn into_loan(self, id: LoanId) -> Loan {
        Loan {
            id,
            customer_id: self.customer_id,
            loan_amount: self.loan_amount,
            tenure: self.tenure,
            interest_rate: self.interest_rate,
            applied_rate: self.applied_rate,
            monthly_installment: self.monthly_installment,
            approved: true,
            emis_paid_on_time: self.emis_paid_on_time,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Repayment standing of a historical loan as seen by the scoring engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanHistoryStatus {
    PaidOnTime,
    Active,
    Other,
}

impl LoanHistoryStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LoanHistoryStatus::PaidOnTime => "paid_on_time",
            LoanHistoryStatus::Active => "active",
            LoanHistoryStatus::Other => "other",
        }
    }
}

/// Read-only history entry used to compute a credit score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanHistoryRecord {
    pub customer_id: CustomerId,
    pub loan_amount: f64,
    pub status: LoanHistoryStatus,
    pub year: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn loan(tenure: u32, start: NaiveDate, end: NaiveDate, on_time: bool) -> Loan {
        Loan {
            id: LoanId(1),
            customer_id: CustomerId(7),
            loan_amount: 250_000.0,
            tenure,
            interest_rate: 11.0,
            applied_rate: 12.0,
            monthly_installment: 11_768.37,
            approved: true,
            emis_paid_on_time: on_time,
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn approved_limit_rounds_to_nearest_lakh() {
        assert_eq!(approved_limit_for(50_000), 1_800_000);
        assert_eq!(approved_limit_for(40_000), 1_400_000);
        assert_eq!(approved_limit_for(42_000), 1_500_000);
        assert_eq!(approved_limit_for(1_000), 0);
        assert_eq!(approved_limit_for(0), 0);
    }

    #[test]
    fn approved_limit_ties_round_to_even() {
        // 36 × 12,500 = 450,000 and 36 × 37,500 = 1,350,000.
        assert_eq!(approved_limit_for(12_500), 400_000);
        assert_eq!(approved_limit_for(37_500), 1_400_000);
    }

    #[test]
    fn remaining_installments_counts_full_months() {
        let start = date(2024, 1, 15);
        let record = loan(12, start, date(2025, 1, 15), true);

        assert_eq!(record.remaining_installments(date(2024, 1, 15)), 12);
        assert_eq!(record.remaining_installments(date(2024, 2, 14)), 12);
        assert_eq!(record.remaining_installments(date(2024, 2, 15)), 11);
        assert_eq!(record.remaining_installments(date(2024, 7, 20)), 6);
    }

    #[test]
    fn remaining_installments_stays_within_tenure() {
        let start = date(2024, 3, 1);
        let record = loan(6, start, date(2024, 9, 1), true);

        assert_eq!(record.remaining_installments(date(2023, 12, 1)), 6);
        assert_eq!(record.remaining_installments(date(2024, 9, 1)), 0);
        assert_eq!(record.remaining_installments(date(2031, 1, 1)), 0);
    }

    #[test]
    fn history_record_derives_status_from_dates() {
        let record = loan(12, date(2023, 6, 1), date(2024, 6, 1), true);
        assert_eq!(
            record.history_record(date(2024, 1, 1)).status,
            LoanHistoryStatus::Active
        );
        assert_eq!(
            record.history_record(date(2024, 6, 1)).status,
            LoanHistoryStatus::PaidOnTime
        );

        let late = loan(12, date(2023, 6, 1), date(2024, 6, 1), false);
        let history = late.history_record(date(2025, 1, 1));
        assert_eq!(history.status, LoanHistoryStatus::Other);
        assert_eq!(history.year, 2023);
        assert_eq!(history.customer_id, CustomerId(7));
    }
}
