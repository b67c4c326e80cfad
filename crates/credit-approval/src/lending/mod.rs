//! Customer registration, credit scoring, loan eligibility and loan records.

pub mod clock;
pub mod domain;
pub mod eligibility;
pub mod installment;
pub mod repository;
pub mod request;
pub mod router;
pub mod scoring;
pub mod service;
pub mod store;
pub mod views;

#[cfg(test)]
mod tests;

pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::{
    approved_limit_for, Customer, CustomerId, Loan, LoanHistoryRecord, LoanHistoryStatus,
    LoanId, NewCustomer, NewLoan,
};
pub use eligibility::{
    EligibilityConfig, EligibilityDecision, EligibilityEngine, EligibilityOutcome,
    RejectionReason, RiskTier, REJECTION_MESSAGE,
};
pub use installment::{monthly_installment, InstallmentError};
pub use repository::{LendingRepository, RepositoryError};
pub use request::{LoanRequest, LoanTerms, RegisterCustomerRequest, ValidationError};
pub use router::lending_router;
pub use scoring::{compute_score, CreditScore, CreditScoreReport, ScoreDeduction, ScoreFactor};
pub use service::{EligibilityCheck, LendingService, LendingServiceError, LoanOutcome};
pub use store::InMemoryLendingRepository;
pub use views::{
    CustomerLoanView, EligibilityView, LoanCreationView, LoanCustomerView, LoanDetailView,
    RegisteredCustomerView,
};
