use crate::infra::{parse_date, seed_repository};
use crate::server;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use credit_approval::config::IngestConfig;
use credit_approval::error::AppError;
use credit_approval::lending::{
    CreditScoreReport, Customer, CustomerId, EligibilityConfig, FixedClock,
    InMemoryLendingRepository, LendingRepository, LendingService, LendingServiceError,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "Credit Approval Service",
    about = "Serve the credit approval API or work with customer and loan exports",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Validate customer and loan exports as a one-shot batch import
    Ingest(IngestArgs),
    /// Print the credit score breakdown for one customer from exported data
    Score(ScoreArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct IngestArgs {
    /// Customer CSV export
    #[arg(long)]
    pub(crate) customers: PathBuf,
    /// Loan CSV export; every row must reference a customer from the customer export
    #[arg(long)]
    pub(crate) loans: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Customer CSV export
    #[arg(long)]
    pub(crate) customers: PathBuf,
    /// Loan CSV export
    #[arg(long)]
    pub(crate) loans: PathBuf,
    /// Customer to score
    #[arg(long)]
    pub(crate) customer_id: u64,
    /// Evaluation date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Ingest(args) => run_ingest(args),
        Command::Score(args) => run_score(args),
    }
}

fn run_ingest(args: IngestArgs) -> Result<(), AppError> {
    let repository = Arc::new(InMemoryLendingRepository::default());
    let reports = seed_repository(
        &repository,
        &IngestConfig {
            customer_data: Some(args.customers),
            loan_data: args.loans,
        },
    )?;

    for report in reports {
        println!("{:<10} {} row(s)", report.kind.label(), report.rows);
    }
    Ok(())
}

fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let repository = Arc::new(InMemoryLendingRepository::default());
    seed_repository(
        &repository,
        &IngestConfig {
            customer_data: Some(args.customers),
            loan_data: Some(args.loans),
        },
    )?;

    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let service = LendingService::with_clock(
        repository,
        EligibilityConfig::default(),
        Arc::new(FixedClock(as_of)),
    );
    let (customer, report) = customer_report(&service, CustomerId(args.customer_id))?;

    println!(
        "{} (customer {}) as of {}: score {}",
        customer.full_name(),
        customer.id,
        as_of,
        report.score
    );
    for deduction in &report.deductions {
        println!("  -{:<3} {}", deduction.points, deduction.notes);
    }
    if report.exposure_breach {
        println!("  active balances exceed the approved limit; score forced to 0");
    }
    Ok(())
}

fn customer_report<R>(
    service: &LendingService<R>,
    customer_id: CustomerId,
) -> Result<(Customer, CreditScoreReport), LendingServiceError>
where
    R: LendingRepository + 'static,
{
    let customer = service
        .repository()
        .get_customer(customer_id)?
        .ok_or(LendingServiceError::CustomerNotFound(customer_id))?;
    let report = service.credit_report(&customer, service.today())?;
    Ok((customer, report))
}
