use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::lending::{approved_limit_for, Customer, CustomerId, Loan, LoanId};

/// A parsed row together with the CSV line it came from.
#[derive(Debug)]
pub(crate) struct Parsed<T> {
    pub(crate) line: u64,
    pub(crate) value: T,
}

pub(crate) fn parse_customers<R: Read>(
    reader: R,
) -> Result<Vec<Parsed<Customer>>, RowError> {
    let mut csv_reader = reader_for(reader);
    let mut customers = Vec::new();

    for (index, record) in csv_reader.deserialize::<CustomerRow>().enumerate() {
        let row = record.map_err(RowError::Csv)?;
        let line = index as u64 + 2;
        customers.push(Parsed {
            line,
            value: row.into_customer(line)?,
        });
    }

    Ok(customers)
}

pub(crate) fn parse_loans<R: Read>(reader: R) -> Result<Vec<Parsed<Loan>>, RowError> {
    let mut csv_reader = reader_for(reader);
    let mut loans = Vec::new();

    for (index, record) in csv_reader.deserialize::<LoanRow>().enumerate() {
        let row = record.map_err(RowError::Csv)?;
        let line = index as u64 + 2;
        loans.push(Parsed {
            line,
            value: row.into_loan(line)?,
        });
    }

    Ok(loans)
}

// Line numbers are 1-based and the header occupies line 1.
fn reader_for<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Row-level failure raised while decoding an export.
#[derive(Debug)]
pub(crate) enum RowError {
    Csv(csv::Error),
    Invalid { line: u64, reason: String },
}

#[derive(Debug, Deserialize)]
struct CustomerRow {
    customer_id: u64,
    first_name: String,
    last_name: String,
    age: u32,
    phone_number: String,
    monthly_salary: u64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    approved_limit: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    current_debt: Option<String>,
}

impl CustomerRow {
    fn into_customer(self, line: u64) -> Result<Customer, RowError> {
        let approved_limit = match self.approved_limit.as_deref() {
            Some(raw) => parse_number::<u64>(raw, "approved_limit", line)?,
            None => approved_limit_for(self.monthly_salary),
        };
        let current_debt = match self.current_debt.as_deref() {
            Some(raw) => parse_number::<f64>(raw, "current_debt", line)?,
            None => 0.0,
        };

        Ok(Customer {
            id: CustomerId(self.customer_id),
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            monthly_income: self.monthly_salary,
            phone_number: self.phone_number,
            approved_limit,
            current_debt,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LoanRow {
    customer_id: u64,
    loan_id: u64,
    loan_amount: f64,
    tenure: u32,
    interest_rate: f64,
    monthly_repayment: f64,
    emis_paid_on_time: String,
    start_date: String,
    end_date: String,
}

impl LoanRow {
    fn into_loan(self, line: u64) -> Result<Loan, RowError> {
        if self.tenure == 0 {
            return Err(RowError::Invalid {
                line,
                reason: "tenure must be at least one month".to_string(),
            });
        }

        let emis_paid_on_time = parse_on_time(&self.emis_paid_on_time, self.tenure).ok_or_else(
            || RowError::Invalid {
                line,
                reason: format!(
                    "emis_paid_on_time '{}' is neither a flag nor a count",
                    self.emis_paid_on_time
                ),
            },
        )?;
        let start_date = parse_date(&self.start_date).ok_or_else(|| RowError::Invalid {
            line,
            reason: format!("unrecognized start_date '{}'", self.start_date),
        })?;
        let end_date = parse_date(&self.end_date).ok_or_else(|| RowError::Invalid {
            line,
            reason: format!("unrecognized end_date '{}'", self.end_date),
        })?;
        if end_date < start_date {
            return Err(RowError::Invalid {
                line,
                reason: format!("end_date {end_date} precedes start_date {start_date}"),
            });
        }

        Ok(Loan {
            id: LoanId(self.loan_id),
            customer_id: CustomerId(self.customer_id),
            loan_amount: self.loan_amount,
            tenure: self.tenure,
            interest_rate: self.interest_rate,
            applied_rate: self.interest_rate,
            monthly_installment: self.monthly_repayment,
            approved: true,
            emis_paid_on_time,
            start_date,
            end_date,
        })
    }
}

/// Exports carry either a yes/no flag or the number of EMIs paid on time.
fn parse_on_time(raw: &str, tenure: u32) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" => Some(true),
        "false" | "no" | "n" => Some(false),
        other => other.parse::<u32>().ok().map(|count| count >= tenure),
    }
}

fn parse_number<T: std::str::FromStr>(
    raw: &str,
    field: &str,
    line: u64,
) -> Result<T, RowError> {
    raw.trim().parse::<T>().map_err(|_| RowError::Invalid {
        line,
        reason: format!("{field} '{raw}' is not a number"),
    })
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    NaiveDate::parse_from_str(trimmed, "%d/%m/%Y").ok()
}
