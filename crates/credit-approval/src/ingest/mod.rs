//! One-shot batch import of customer and loan exports.
//!
//! Each batch is decoded and checked in full before the first write, so a bad row or a
//! loan pointing at an unknown customer rejects the whole file. Rows upsert by id, which
//! makes re-running an import harmless.

mod parser;

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::lending::{CustomerId, LendingRepository, RepositoryError};
use parser::{parse_customers, parse_loans, RowError};

#[derive(Debug)]
pub enum IngestError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: u64, reason: String },
    DuplicateId { line: u64, id: u64 },
    UnknownCustomer { line: u64, customer_id: CustomerId },
    Repository(RepositoryError),
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::Io(err) => write!(f, "failed to read export: {}", err),
            IngestError::Csv(err) => write!(f, "invalid CSV data: {}", err),
            IngestError::InvalidRow { line, reason } => write!(f, "line {}: {}", line, reason),
            IngestError::DuplicateId { line, id } => {
                write!(f, "line {}: id {} appears more than once", line, id)
            }
            IngestError::UnknownCustomer { line, customer_id } => write!(
                f,
                "line {}: loan references unknown customer {}",
                line, customer_id
            ),
            IngestError::Repository(err) => write!(f, "could not store imported rows: {}", err),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Io(err) => Some(err),
            IngestError::Csv(err) => Some(err),
            IngestError::Repository(err) => Some(err),
            IngestError::InvalidRow { .. }
            | IngestError::DuplicateId { .. }
            | IngestError::UnknownCustomer { .. } => None,
        }
    }
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<RepositoryError> for IngestError {
    fn from(err: RepositoryError) -> Self {
        Self::Repository(err)
    }
}

impl From<RowError> for IngestError {
    fn from(err: RowError) -> Self {
        match err {
            RowError::Csv(err) => Self::Csv(err),
            RowError::Invalid { line, reason } => Self::InvalidRow { line, reason },
        }
    }
}

/// Which export a batch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestKind {
    Customers,
    Loans,
}

impl IngestKind {
    pub const fn label(self) -> &'static str {
        match self {
            IngestKind::Customers => "customers",
            IngestKind::Loans => "loans",
        }
    }
}

/// Summary of a completed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub kind: IngestKind,
    pub rows: usize,
}

/// Imports exports into a lending repository.
pub struct BatchIngestor<R> {
    repository: Arc<R>,
}

impl<R> BatchIngestor<R>
where
    R: LendingRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn customers_from_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<IngestReport, IngestError> {
        let file = std::fs::File::open(path)?;
        self.customers_from_reader(file)
    }

    pub fn customers_from_reader<T: Read>(&self, reader: T) -> Result<IngestReport, IngestError> {
        let rows = parse_customers(reader)?;

        let mut ids = HashSet::new();
        let mut phones = HashSet::new();
        for row in &rows {
            if !ids.insert(row.value.id) {
                return Err(IngestError::DuplicateId {
                    line: row.line,
                    id: row.value.id.0,
                });
            }
            if !phones.insert(row.value.phone_number.as_str()) {
                return Err(IngestError::InvalidRow {
                    line: row.line,
                    reason: format!("phone number {} repeated", row.value.phone_number),
                });
            }
        }

        let count = rows.len();
        self.repository
            .upsert_customers(rows.into_iter().map(|row| row.value).collect())?;

        info!(rows = count, kind = IngestKind::Customers.label(), "batch imported");
        Ok(IngestReport {
            kind: IngestKind::Customers,
            rows: count,
        })
    }

    pub fn loans_from_path<P: AsRef<Path>>(&self, path: P) -> Result<IngestReport, IngestError> {
        let file = std::fs::File::open(path)?;
        self.loans_from_reader(file)
    }

    pub fn loans_from_reader<T: Read>(&self, reader: T) -> Result<IngestReport, IngestError> {
        let rows = parse_loans(reader)?;

        let mut ids = HashSet::new();
        let mut known_customers = HashSet::new();
        for row in &rows {
            if !ids.insert(row.value.id) {
                return Err(IngestError::DuplicateId {
                    line: row.line,
                    id: row.value.id.0,
                });
            }

            let customer_id = row.value.customer_id;
            if known_customers.contains(&customer_id) {
                continue;
            }
            if self.repository.get_customer(customer_id)?.is_none() {
                return Err(IngestError::UnknownCustomer {
                    line: row.line,
                    customer_id,
                });
            }
            known_customers.insert(customer_id);
        }

        for row in &rows {
            self.repository.upsert_loan(row.value.clone())?;
        }

        info!(rows = rows.len(), kind = IngestKind::Loans.label(), "batch imported");
        Ok(IngestReport {
            kind: IngestKind::Loans,
            rows: rows.len(),
        })
    }
}
