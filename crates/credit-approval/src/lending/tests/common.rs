use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::lending::clock::FixedClock;
use crate::lending::domain::{
    approved_limit_for, Customer, CustomerId, Loan, LoanHistoryRecord, LoanHistoryStatus, LoanId,
    NewCustomer, NewLoan,
};
use crate::lending::eligibility::{EligibilityConfig, EligibilityEngine};
use crate::lending::repository::{LendingRepository, RepositoryError};
use crate::lending::request::{LoanRequest, RegisterCustomerRequest};
use crate::lending::service::LendingService;
use crate::lending::store::InMemoryLendingRepository;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn as_of() -> NaiveDate {
    date(2024, 6, 15)
}

pub(super) fn customer(id: u64, monthly_income: u64) -> Customer {
    Customer {
        id: CustomerId(id),
        first_name: "Asha".to_string(),
        last_name: "Verma".to_string(),
        age: 34,
        monthly_income,
        phone_number: format!("98765{id:05}"),
        approved_limit: approved_limit_for(monthly_income),
        current_debt: 0.0,
    }
}

pub(super) fn record(
    customer_id: u64,
    status: LoanHistoryStatus,
    loan_amount: f64,
    year: i32,
) -> LoanHistoryRecord {
    LoanHistoryRecord {
        customer_id: CustomerId(customer_id),
        loan_amount,
        status,
        year,
    }
}

pub(super) fn register_request(phone_number: &str, monthly_income: u64) -> RegisterCustomerRequest {
    RegisterCustomerRequest {
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        age: 30,
        monthly_income,
        phone_number: phone_number.to_string(),
    }
}

pub(super) fn loan_request(
    customer_id: CustomerId,
    loan_amount: f64,
    interest_rate: f64,
    tenure: i64,
) -> LoanRequest {
    LoanRequest {
        customer_id,
        loan_amount,
        interest_rate,
        tenure,
    }
}

/// A loan on file for `customer_id`, shaped like an imported historical record.
pub(super) fn historical_loan(
    customer_id: CustomerId,
    loan_amount: f64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    emis_paid_on_time: bool,
) -> NewLoan {
    NewLoan {
        customer_id,
        loan_amount,
        tenure: 12,
        interest_rate: 11.0,
        applied_rate: 11.0,
        monthly_installment: loan_amount / 12.0,
        emis_paid_on_time,
        start_date,
        end_date,
    }
}

pub(super) fn evaluation_engine() -> EligibilityEngine {
    EligibilityEngine::new(EligibilityConfig::default())
}

pub(super) fn build_service() -> (
    LendingService<InMemoryLendingRepository>,
    Arc<InMemoryLendingRepository>,
) {
    let repository = Arc::new(InMemoryLendingRepository::default());
    let service = LendingService::with_clock(
        repository.clone(),
        EligibilityConfig::default(),
        Arc::new(FixedClock(as_of())),
    );
    (service, repository)
}

pub(super) struct UnavailableRepository;

impl LendingRepository for UnavailableRepository {
    fn insert_customer(&self, _customer: NewCustomer) -> Result<Customer, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert_customers(&self, _customers: Vec<Customer>) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn get_customer(&self, _id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn create_loan(&self, _loan: NewLoan) -> Result<Loan, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert_loan(&self, _loan: Loan) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn get_loan(&self, _id: LoanId) -> Result<Option<Loan>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_loans(&self, _customer_id: CustomerId) -> Result<Vec<Loan>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
