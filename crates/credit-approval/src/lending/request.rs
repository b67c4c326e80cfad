//! Typed request payloads and their validation.
//!
//! Everything the lending service receives has passed through one of these schemas, so the
//! scoring and policy code never sees partially-typed data.

use serde::{Deserialize, Deserializer, Serialize};

use super::domain::{approved_limit_for, CustomerId, NewCustomer};
use super::installment::InstallmentError;

const MAX_PHONE_DIGITS: usize = 15;

/// Client-input failures. Never coerced; surfaced as bad requests.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("invalid {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },
    #[error("malformed request: {0}")]
    Malformed(String),
}

impl From<InstallmentError> for ValidationError {
    fn from(value: InstallmentError) -> Self {
        let field = match value {
            InstallmentError::NonPositivePrincipal(_) => "loan_amount",
            InstallmentError::NegativeRate(_) => "interest_rate",
            InstallmentError::NonPositiveTenure(_) => "tenure",
        };
        ValidationError::InvalidArgument {
            field,
            reason: value.to_string(),
        }
    }
}

/// Payload for `/register`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterCustomerRequest {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub monthly_income: u64,
    #[serde(deserialize_with = "string_or_number")]
    pub phone_number: String,
}

impl RegisterCustomerRequest {
    /// Validate the payload and derive the approved limit.
    pub fn into_new_customer(self) -> Result<NewCustomer, ValidationError> {
        let first_name = required_text("first_name", &self.first_name)?;
        let last_name = required_text("last_name", &self.last_name)?;
        let phone_number = required_text("phone_number", &self.phone_number)?;

        let digits = phone_number.strip_prefix('+').unwrap_or(&phone_number);
        if digits.is_empty()
            || digits.len() > MAX_PHONE_DIGITS
            || !digits.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ValidationError::InvalidArgument {
                field: "phone_number",
                reason: format!("expected up to {MAX_PHONE_DIGITS} digits, got '{phone_number}'"),
            });
        }

        if self.age == 0 {
            return Err(ValidationError::InvalidArgument {
                field: "age",
                reason: "must be positive".to_string(),
            });
        }
        if self.monthly_income == 0 {
            return Err(ValidationError::InvalidArgument {
                field: "monthly_income",
                reason: "must be positive".to_string(),
            });
        }

        Ok(NewCustomer {
            first_name,
            last_name,
            age: self.age,
            monthly_income: self.monthly_income,
            phone_number,
            approved_limit: approved_limit_for(self.monthly_income),
            current_debt: 0.0,
        })
    }
}

fn required_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Payload for `/check-eligibility` and `/create-loan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    #[serde(alias = "id")]
    pub customer_id: CustomerId,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub tenure: i64,
}

impl LoanRequest {
    pub fn terms(&self) -> Result<LoanTerms, ValidationError> {
        LoanTerms::new(self.loan_amount, self.interest_rate, self.tenure)
    }
}

/// Loan amount, requested annual rate and tenure that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoanTerms {
    amount: f64,
    rate: f64,
    tenure: u32,
}

impl LoanTerms {
    pub fn new(amount: f64, rate: f64, tenure: i64) -> Result<Self, ValidationError> {
        if !(amount.is_finite() && amount > 0.0) {
            return Err(InstallmentError::NonPositivePrincipal(amount).into());
        }
        if !(rate.is_finite() && rate >= 0.0) {
            return Err(InstallmentError::NegativeRate(rate).into());
        }
        let tenure = u32::try_from(tenure)
            .ok()
            .filter(|months| *months >= 1)
            .ok_or(InstallmentError::NonPositiveTenure(tenure))?;

        Ok(Self {
            amount,
            rate,
            tenure,
        })
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn tenure(&self) -> u32 {
        self.tenure
    }
}

/// Accept phone numbers sent either as JSON strings or bare integers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(value) => value,
        Raw::Number(value) => value.to_string(),
    })
}
