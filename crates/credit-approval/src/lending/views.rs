//! Response shapes returned by the HTTP layer.

use serde::Serialize;

use super::domain::{Customer, CustomerId, Loan, LoanId};
use super::eligibility::{RejectionReason, REJECTION_MESSAGE};
use super::service::{EligibilityCheck, LoanOutcome};

#[derive(Debug, Clone, Serialize)]
pub struct RegisteredCustomerView {
    pub customer_id: CustomerId,
    pub name: String,
    pub age: u32,
    pub monthly_income: u64,
    pub approved_limit: u64,
    pub phone_number: String,
}

impl From<&Customer> for RegisteredCustomerView {
    fn from(customer: &Customer) -> Self {
        Self {
            customer_id: customer.id,
            name: customer.full_name(),
            age: customer.age,
            monthly_income: customer.monthly_income,
            approved_limit: customer.approved_limit,
            phone_number: customer.phone_number.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EligibilityView {
    pub customer_id: CustomerId,
    pub approval: bool,
    pub interest_rate: f64,
    pub corrected_interest_rate: f64,
    pub tenure: u32,
    pub monthly_installment: Option<f64>,
    pub credit_score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectionReason>,
}

impl From<&EligibilityCheck> for EligibilityView {
    fn from(check: &EligibilityCheck) -> Self {
        let outcome = &check.outcome;
        Self {
            customer_id: check.customer_id,
            approval: outcome.approved(),
            interest_rate: outcome.requested_rate,
            corrected_interest_rate: outcome.applied_rate,
            tenure: check.tenure,
            monthly_installment: outcome.installment(),
            credit_score: outcome.credit_score.value(),
            reason: outcome.rejection().cloned(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoanCreationView {
    pub loan_id: Option<LoanId>,
    pub customer_id: CustomerId,
    pub loan_approved: bool,
    pub message: String,
    pub monthly_installment: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectionReason>,
}

impl From<&LoanOutcome> for LoanCreationView {
    fn from(outcome: &LoanOutcome) -> Self {
        match outcome {
            LoanOutcome::Approved { loan } => Self {
                loan_id: Some(loan.id),
                customer_id: loan.customer_id,
                loan_approved: true,
                message: "Loan approved successfully".to_string(),
                monthly_installment: Some(loan.monthly_installment),
                reason: None,
            },
            LoanOutcome::Rejected {
                customer_id,
                reason,
            } => Self {
                loan_id: None,
                customer_id: *customer_id,
                loan_approved: false,
                message: REJECTION_MESSAGE.to_string(),
                monthly_installment: None,
                reason: Some(reason.clone()),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoanCustomerView {
    pub customer_id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub age: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoanDetailView {
    pub loan_id: LoanId,
    pub customer: LoanCustomerView,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub monthly_installment: f64,
    pub tenure: u32,
}

impl LoanDetailView {
    pub fn new(loan: &Loan, customer: &Customer) -> Self {
        Self {
            loan_id: loan.id,
            customer: LoanCustomerView {
                customer_id: customer.id,
                first_name: customer.first_name.clone(),
                last_name: customer.last_name.clone(),
                phone_number: customer.phone_number.clone(),
                age: customer.age,
            },
            loan_amount: loan.loan_amount,
            interest_rate: loan.applied_rate,
            monthly_installment: loan.monthly_installment,
            tenure: loan.tenure,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerLoanView {
    pub loan_id: LoanId,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub monthly_installment: f64,
    pub repayments_left: u32,
}
