use chrono::NaiveDate;

use super::domain::{Customer, CustomerId, Loan, LoanHistoryRecord, LoanId, NewCustomer, NewLoan};

/// Storage abstraction so the lending service can be exercised in isolation.
///
/// Each write is atomic: a failed call leaves no partial record behind.
pub trait LendingRepository: Send + Sync {
    /// Store a new customer under a fresh id. Duplicate phone numbers conflict.
    fn insert_customer(&self, customer: NewCustomer) -> Result<Customer, RepositoryError>;
    /// Insert or replace a batch of customers keeping their ids, as batch imports do.
    ///
    /// All or nothing: a phone number held by a customer outside the batch, or repeated
    /// within it, conflicts and leaves the store untouched. Phones may move between
    /// customers of the same batch.
    fn upsert_customers(&self, customers: Vec<Customer>) -> Result<(), RepositoryError>;
    fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;

    /// Store a new loan under a fresh id. The owning customer must exist.
    fn create_loan(&self, loan: NewLoan) -> Result<Loan, RepositoryError>;
    /// Insert or replace a loan keeping its id, as batch imports do.
    fn upsert_loan(&self, loan: Loan) -> Result<(), RepositoryError>;
    fn get_loan(&self, id: LoanId) -> Result<Option<Loan>, RepositoryError>;
    /// Loans owned by `customer_id`, ordered by loan id.
    fn list_loans(&self, customer_id: CustomerId) -> Result<Vec<Loan>, RepositoryError>;

    /// History records for scoring, with each loan's standing judged at `as_of`.
    fn list_loan_history(
        &self,
        customer_id: CustomerId,
        as_of: NaiveDate,
    ) -> Result<Vec<LoanHistoryRecord>, RepositoryError> {
        Ok(self
            .list_loans(customer_id)?
            .iter()
            .map(|loan| loan.history_record(as_of))
            .collect())
    }
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists: {0}")]
    Conflict(String),
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
