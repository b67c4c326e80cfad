use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::warn;

use super::domain::{CustomerId, LoanId};
use super::repository::{LendingRepository, RepositoryError};
use super::request::{LoanRequest, RegisterCustomerRequest, ValidationError};
use super::service::{LendingService, LendingServiceError};
use super::views::{EligibilityView, LoanCreationView, LoanDetailView, RegisteredCustomerView};

/// Router builder exposing the customer and loan endpoints.
pub fn lending_router<R>(service: Arc<LendingService<R>>) -> Router
where
    R: LendingRepository + 'static,
{
    Router::new()
        .route("/register", post(register_handler::<R>))
        .route("/check-eligibility", post(check_eligibility_handler::<R>))
        .route("/create-loan", post(create_loan_handler::<R>))
        .route("/view-loan/:loan_id", get(view_loan_handler::<R>))
        .route("/view-loans/:customer_id", get(view_loans_handler::<R>))
        .with_state(service)
}

pub(crate) async fn register_handler<R>(
    State(service): State<Arc<LendingService<R>>>,
    payload: Result<Json<RegisterCustomerRequest>, JsonRejection>,
) -> Response
where
    R: LendingRepository + 'static,
{
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return malformed_response(rejection),
    };

    match service.register_customer(request) {
        Ok(customer) => (
            StatusCode::CREATED,
            Json(RegisteredCustomerView::from(&customer)),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn check_eligibility_handler<R>(
    State(service): State<Arc<LendingService<R>>>,
    payload: Result<Json<LoanRequest>, JsonRejection>,
) -> Response
where
    R: LendingRepository + 'static,
{
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return malformed_response(rejection),
    };

    match service.check_eligibility(&request) {
        Ok(check) => (StatusCode::OK, Json(EligibilityView::from(&check))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_loan_handler<R>(
    State(service): State<Arc<LendingService<R>>>,
    payload: Result<Json<LoanRequest>, JsonRejection>,
) -> Response
where
    R: LendingRepository + 'static,
{
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return malformed_response(rejection),
    };

    match service.open_loan(&request) {
        Ok(outcome) => {
            let status = if outcome.is_approved() {
                StatusCode::CREATED
            } else {
                StatusCode::BAD_REQUEST
            };
            (status, Json(LoanCreationView::from(&outcome))).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn view_loan_handler<R>(
    State(service): State<Arc<LendingService<R>>>,
    Path(loan_id): Path<u64>,
) -> Response
where
    R: LendingRepository + 'static,
{
    match service.get_loan(LoanId(loan_id)) {
        Ok((loan, customer)) => {
            (StatusCode::OK, Json(LoanDetailView::new(&loan, &customer))).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn view_loans_handler<R>(
    State(service): State<Arc<LendingService<R>>>,
    Path(customer_id): Path<u64>,
) -> Response
where
    R: LendingRepository + 'static,
{
    match service.get_customer_loans(CustomerId(customer_id)) {
        Ok(loans) => (StatusCode::OK, Json(loans)).into_response(),
        Err(error) => error_response(error),
    }
}

fn malformed_response(rejection: JsonRejection) -> Response {
    let error = ValidationError::Malformed(rejection.body_text());
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": error.to_string() })),
    )
        .into_response()
}

pub(crate) fn error_response(error: LendingServiceError) -> Response {
    let status = error.status_code();
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        warn!(%error, "repository unavailable");
    }

    (status, Json(json!({ "error": error.to_string() }))).into_response()
}

impl LendingServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            LendingServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            LendingServiceError::CustomerNotFound(_)
            | LendingServiceError::LoanNotFound(_)
            | LendingServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            LendingServiceError::Repository(error) => repository_status(error),
        }
    }
}

/// Status for a storage failure: conflicts are the caller's data, the rest is ours.
pub(crate) fn repository_status(error: &RepositoryError) -> StatusCode {
    match error {
        RepositoryError::Conflict(_) => StatusCode::CONFLICT,
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
