use chrono::NaiveDate;
use credit_approval::config::IngestConfig;
use credit_approval::ingest::{BatchIngestor, IngestError, IngestReport};
use credit_approval::lending::LendingRepository;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads the configured exports into `repository`, customers first.
pub(crate) fn seed_repository<R>(
    repository: &Arc<R>,
    config: &IngestConfig,
) -> Result<Vec<IngestReport>, IngestError>
where
    R: LendingRepository,
{
    let ingestor = BatchIngestor::new(Arc::clone(repository));
    let mut reports = Vec::new();

    if let Some(path) = &config.customer_data {
        reports.push(ingestor.customers_from_path(path)?);
    }
    if let Some(path) = &config.loan_data {
        reports.push(ingestor.loans_from_path(path)?);
    }

    Ok(reports)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
