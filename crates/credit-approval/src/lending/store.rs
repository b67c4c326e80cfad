use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{Customer, CustomerId, Loan, LoanId, NewCustomer, NewLoan};
use super::repository::{LendingRepository, RepositoryError};

/// Process-local store backing the service and batch imports.
#[derive(Default, Clone)]
pub struct InMemoryLendingRepository {
    state: Arc<Mutex<StoreState>>,
}

#[derive(Default)]
struct StoreState {
    customers: BTreeMap<CustomerId, Customer>,
    loans: BTreeMap<LoanId, Loan>,
    last_customer_id: u64,
    last_loan_id: u64,
}

impl StoreState {
    fn phone_taken(&self, phone_number: &str) -> bool {
        self.customers
            .values()
            .any(|customer| customer.phone_number == phone_number)
    }
}

impl InMemoryLendingRepository {
    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store lock poisoned".to_string()))
    }

    pub fn customer_count(&self) -> Result<usize, RepositoryError> {
        Ok(self.lock()?.customers.len())
    }

    pub fn loan_count(&self) -> Result<usize, RepositoryError> {
        Ok(self.lock()?.loans.len())
    }
}

impl LendingRepository for InMemoryLendingRepository {
    fn insert_customer(&self, customer: NewCustomer) -> Result<Customer, RepositoryError> {
        let mut state = self.lock()?;
        if state.phone_taken(&customer.phone_number) {
            return Err(RepositoryError::Conflict(format!(
                "phone number {} is already registered",
                customer.phone_number
            )));
        }

        state.last_customer_id += 1;
        let stored = customer.into_customer(CustomerId(state.last_customer_id));
        state.customers.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn upsert_customers(&self, customers: Vec<Customer>) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;

        let batch_ids: HashSet<CustomerId> =
            customers.iter().map(|customer| customer.id).collect();
        let mut batch_phones = HashSet::new();
        for customer in &customers {
            let held_outside = state.customers.values().any(|existing| {
                existing.phone_number == customer.phone_number && !batch_ids.contains(&existing.id)
            });
            if held_outside || !batch_phones.insert(customer.phone_number.as_str()) {
                return Err(RepositoryError::Conflict(format!(
                    "phone number {} is already registered",
                    customer.phone_number
                )));
            }
        }

        for customer in customers {
            state.last_customer_id = state.last_customer_id.max(customer.id.0);
            state.customers.insert(customer.id, customer);
        }
        Ok(())
    }

    fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        Ok(self.lock()?.customers.get(&id).cloned())
    }

    fn create_loan(&self, loan: NewLoan) -> Result<Loan, RepositoryError> {
        let mut state = self.lock()?;
        if !state.customers.contains_key(&loan.customer_id) {
            return Err(RepositoryError::NotFound);
        }

        state.last_loan_id += 1;
        let stored = loan.into_loan(LoanId(state.last_loan_id));
        state.loans.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn upsert_loan(&self, loan: Loan) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        if !state.customers.contains_key(&loan.customer_id) {
            return Err(RepositoryError::NotFound);
        }

        state.last_loan_id = state.last_loan_id.max(loan.id.0);
        state.loans.insert(loan.id, loan);
        Ok(())
    }

    fn get_loan(&self, id: LoanId) -> Result<Option<Loan>, RepositoryError> {
        Ok(self.lock()?.loans.get(&id).cloned())
    }

    fn list_loans(&self, customer_id: CustomerId) -> Result<Vec<Loan>, RepositoryError> {
        Ok(self
            .lock()?
            .loans
            .values()
            .filter(|loan| loan.customer_id == customer_id)
            .cloned()
            .collect())
    }
}
