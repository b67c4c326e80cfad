use std::sync::Arc;

use chrono::{Months, NaiveDate};
use tracing::{debug, info};

use super::clock::{Clock, SystemClock};
use super::domain::{Customer, CustomerId, Loan, LoanId, NewLoan};
use super::eligibility::{
    EligibilityConfig, EligibilityDecision, EligibilityEngine, EligibilityOutcome,
    RejectionReason,
};
use super::repository::{LendingRepository, RepositoryError};
use super::request::{LoanRequest, LoanTerms, RegisterCustomerRequest, ValidationError};
use super::scoring::{compute_score, CreditScoreReport};
use super::views::CustomerLoanView;

/// Service composing the repository, scoring engine and eligibility policy.
pub struct LendingService<R> {
    repository: Arc<R>,
    engine: Arc<EligibilityEngine>,
    clock: Arc<dyn Clock>,
}

impl<R> LendingService<R>
where
    R: LendingRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: EligibilityConfig) -> Self {
        Self::with_clock(repository, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        repository: Arc<R>,
        config: EligibilityConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            engine: Arc::new(EligibilityEngine::new(config)),
            clock,
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Register a customer, deriving their approved limit from income.
    pub fn register_customer(
        &self,
        request: RegisterCustomerRequest,
    ) -> Result<Customer, LendingServiceError> {
        let new_customer = request.into_new_customer()?;
        let customer = self.repository.insert_customer(new_customer)?;
        info!(
            customer_id = %customer.id,
            approved_limit = customer.approved_limit,
            "customer registered"
        );
        Ok(customer)
    }

    /// Score a customer from their full loan history at `as_of`.
    pub fn credit_report(
        &self,
        customer: &Customer,
        as_of: NaiveDate,
    ) -> Result<CreditScoreReport, LendingServiceError> {
        let history = self.repository.list_loan_history(customer.id, as_of)?;
        Ok(compute_score(customer, &history, as_of))
    }

    /// Evaluate a loan request without recording anything.
    pub fn check_eligibility(
        &self,
        request: &LoanRequest,
    ) -> Result<EligibilityCheck, LendingServiceError> {
        let as_of = self.today();
        let (customer, terms, outcome) = self.evaluate(request, as_of)?;
        Ok(EligibilityCheck {
            customer_id: customer.id,
            tenure: terms.tenure(),
            outcome,
        })
    }

    /// Evaluate a loan request and record the loan when it is approved.
    pub fn open_loan(&self, request: &LoanRequest) -> Result<LoanOutcome, LendingServiceError> {
        let as_of = self.today();
        let (customer, terms, outcome) = self.evaluate(request, as_of)?;

        let installment = match outcome.decision {
            EligibilityDecision::Approved { installment } => installment,
            EligibilityDecision::Rejected(reason) => {
                info!(
                    customer_id = %customer.id,
                    reason = %reason.summary(),
                    "loan not approved"
                );
                return Ok(LoanOutcome::Rejected {
                    customer_id: customer.id,
                    reason,
                });
            }
        };

        let end_date = as_of
            .checked_add_months(Months::new(terms.tenure()))
            .ok_or_else(|| ValidationError::InvalidArgument {
                field: "tenure",
                reason: format!("{} months runs past the supported calendar", terms.tenure()),
            })?;

        let loan = self.repository.create_loan(NewLoan {
            customer_id: customer.id,
            loan_amount: terms.amount(),
            tenure: terms.tenure(),
            interest_rate: outcome.requested_rate,
            applied_rate: outcome.applied_rate,
            monthly_installment: installment,
            emis_paid_on_time: true,
            start_date: as_of,
            end_date,
        })?;

        info!(
            customer_id = %customer.id,
            loan_id = %loan.id,
            applied_rate = loan.applied_rate,
            monthly_installment = loan.monthly_installment,
            "loan created"
        );
        Ok(LoanOutcome::Approved { loan })
    }

    /// Fetch a loan together with its owning customer.
    pub fn get_loan(&self, loan_id: LoanId) -> Result<(Loan, Customer), LendingServiceError> {
        let loan = self
            .repository
            .get_loan(loan_id)?
            .ok_or(LendingServiceError::LoanNotFound(loan_id))?;
        let customer = self
            .repository
            .get_customer(loan.customer_id)?
            .ok_or(LendingServiceError::CustomerNotFound(loan.customer_id))?;
        Ok((loan, customer))
    }

    /// List a customer's loans with the installments still owed today.
    pub fn get_customer_loans(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<CustomerLoanView>, LendingServiceError> {
        let customer = self.customer(customer_id)?;
        let as_of = self.today();

        Ok(self
            .repository
            .list_loans(customer.id)?
            .iter()
            .map(|loan| CustomerLoanView {
                loan_id: loan.id,
                loan_amount: loan.loan_amount,
                interest_rate: loan.applied_rate,
                monthly_installment: loan.monthly_installment,
                repayments_left: loan.remaining_installments(as_of),
            })
            .collect())
    }

    fn customer(&self, customer_id: CustomerId) -> Result<Customer, LendingServiceError> {
        self.repository
            .get_customer(customer_id)?
            .ok_or(LendingServiceError::CustomerNotFound(customer_id))
    }

    fn evaluate(
        &self,
        request: &LoanRequest,
        as_of: NaiveDate,
    ) -> Result<(Customer, LoanTerms, EligibilityOutcome), LendingServiceError> {
        let terms = request.terms()?;
        let customer = self.customer(request.customer_id)?;
        let report = self.credit_report(&customer, as_of)?;
        debug!(
            customer_id = %customer.id,
            score = %report.score,
            deductions = report.deductions.len(),
            exposure_breach = report.exposure_breach,
            "credit score computed"
        );

        let outcome = self
            .engine
            .evaluate(&customer, &terms, report.score)
            .map_err(ValidationError::from)?;
        info!(
            customer_id = %customer.id,
            score = %outcome.credit_score,
            tier = outcome.tier.label(),
            approved = outcome.approved(),
            "eligibility evaluated"
        );

        Ok((customer, terms, outcome))
    }
}

/// Result of an eligibility check for API responses.
#[derive(Debug, Clone, PartialEq)]
pub struct EligibilityCheck {
    pub customer_id: CustomerId,
    pub tenure: u32,
    pub outcome: EligibilityOutcome,
}

/// Business outcome of a loan request. A rejection is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum LoanOutcome {
    Approved {
        loan: Loan,
    },
    Rejected {
        customer_id: CustomerId,
        reason: RejectionReason,
    },
}

impl LoanOutcome {
    pub fn is_approved(&self) -> bool {
        matches!(self, LoanOutcome::Approved { .. })
    }
}

/// Error raised by the lending service.
#[derive(Debug, thiserror::Error)]
pub enum LendingServiceError {
    #[error("customer {0} not found")]
    CustomerNotFound(CustomerId),
    #[error("loan {0} not found")]
    LoanNotFound(LoanId),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
