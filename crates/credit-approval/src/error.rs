use crate::config::ConfigError;
use crate::ingest::IngestError;
use crate::lending::router::repository_status;
use crate::lending::LendingServiceError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Ingest(IngestError),
    Lending(LendingServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Ingest(err) => write!(f, "ingest error: {}", err),
            AppError::Lending(err) => write!(f, "lending error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Ingest(err) => Some(err),
            AppError::Lending(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Ingest(IngestError::Repository(err)) => repository_status(err),
            AppError::Ingest(_) => StatusCode::BAD_REQUEST,
            AppError::Lending(err) => err.status_code(),
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<IngestError> for AppError {
    fn from(value: IngestError) -> Self {
        Self::Ingest(value)
    }
}

impl From<LendingServiceError> for AppError {
    fn from(value: LendingServiceError) -> Self {
        Self::Lending(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lending::{CustomerId, RepositoryError};

    fn status_of(error: AppError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn ingest_failures_map_to_client_or_server_statuses() {
        assert_eq!(
            status_of(AppError::Ingest(IngestError::UnknownCustomer {
                line: 2,
                customer_id: CustomerId(9),
            })),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Ingest(IngestError::Repository(
                RepositoryError::Conflict("phone number 111 is already registered".to_string())
            ))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Ingest(IngestError::Repository(
                RepositoryError::Unavailable("store lock poisoned".to_string())
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unknown_customer_maps_to_not_found() {
        let error = AppError::from(LendingServiceError::CustomerNotFound(CustomerId(7)));
        assert_eq!(error.to_string(), "lending error: customer 7 not found");
        assert_eq!(status_of(error), StatusCode::NOT_FOUND);
    }
}
