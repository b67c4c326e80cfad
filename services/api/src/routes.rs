use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use credit_approval::error::AppError;
use credit_approval::ingest::{BatchIngestor, IngestReport};
use credit_approval::lending::{lending_router, LendingRepository, LendingService};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

pub(crate) fn with_lending_routes<R>(service: Arc<LendingService<R>>) -> axum::Router
where
    R: LendingRepository + 'static,
{
    let repository = Arc::clone(service.repository());

    lending_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/admin/ingest/customers",
            axum::routing::post(ingest_customers_endpoint::<R>),
        )
        .route(
            "/admin/ingest/loans",
            axum::routing::post(ingest_loans_endpoint::<R>),
        )
        .layer(Extension(repository))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Accepts a customer CSV export as the raw request body.
pub(crate) async fn ingest_customers_endpoint<R>(
    Extension(repository): Extension<Arc<R>>,
    body: String,
) -> Result<Json<IngestReport>, AppError>
where
    R: LendingRepository + 'static,
{
    let report = BatchIngestor::new(repository).customers_from_reader(Cursor::new(body))?;
    Ok(Json(report))
}

/// Accepts a loan CSV export as the raw request body.
pub(crate) async fn ingest_loans_endpoint<R>(
    Extension(repository): Extension<Arc<R>>,
    body: String,
) -> Result<Json<IngestReport>, AppError>
where
    R: LendingRepository + 'static,
{
    let report = BatchIngestor::new(repository).loans_from_reader(Cursor::new(body))?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use chrono::NaiveDate;
    use credit_approval::lending::{EligibilityConfig, FixedClock, InMemoryLendingRepository};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    const CUSTOMERS: &str = "\
customer_id,first_name,last_name,age,phone_number,monthly_salary,approved_limit,current_debt
1,Aaron,Garcia,63,9629317944,9000,300000,0
2,Aarush,Kumar,38,9133154060,40000,1400000,
";

    const LOANS: &str = "\
customer_id,loan_id,loan_amount,tenure,interest_rate,monthly_repayment,emis_paid_on_time,start_date,end_date
2,1910,500000,36,12.0,16607,true,2023-02-01,2026-02-01
";

    fn app(ready: bool) -> (axum::Router, Arc<InMemoryLendingRepository>) {
        let repository = Arc::new(InMemoryLendingRepository::default());
        let clock = FixedClock(NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date"));
        let service = Arc::new(LendingService::with_clock(
            repository.clone(),
            EligibilityConfig::default(),
            Arc::new(clock),
        ));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };

        let router = with_lending_routes(service).layer(Extension(state));
        (router, repository)
    }

    fn csv_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "text/csv")
            .body(Body::from(body.to_owned()))
            .expect("request builds")
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_tracks_the_flag() {
        let (router, _) = app(false);
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let (router, _) = app(true);
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ready");
    }

    #[tokio::test]
    async fn ingest_endpoints_load_exports_served_by_lending_routes() {
        let (router, repository) = app(true);

        let response = router
            .clone()
            .oneshot(csv_request("/admin/ingest/customers", CUSTOMERS))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["kind"], "customers");
        assert_eq!(body["rows"], 2);

        let response = router
            .clone()
            .oneshot(csv_request("/admin/ingest/loans", LOANS))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(repository.loan_count().expect("store readable"), 1);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/view-loans/2")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        let loans = json_body(response).await;
        assert_eq!(loans[0]["loan_id"], 1910);
        assert_eq!(loans[0]["repayments_left"], 20);
    }

    #[tokio::test]
    async fn customer_batch_reusing_a_stored_phone_conflicts() {
        let (router, repository) = app(true);
        let response = router
            .clone()
            .oneshot(csv_request("/admin/ingest/customers", CUSTOMERS))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let clashing = "\
customer_id,first_name,last_name,age,phone_number,monthly_salary,approved_limit,current_debt
5,Bela,Iyer,29,9000000005,30000,,0
6,Chirag,Rao,41,9629317944,60000,,0
";
        let response = router
            .oneshot(csv_request("/admin/ingest/customers", clashing))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = json_body(response).await;
        assert!(body["error"]
            .as_str()
            .expect("error message")
            .contains("9629317944"));
        assert_eq!(repository.customer_count().expect("store readable"), 2);
    }

    #[tokio::test]
    async fn loans_for_unknown_customers_are_rejected_as_bad_requests() {
        let (router, repository) = app(true);

        let response = router
            .oneshot(csv_request("/admin/ingest/loans", LOANS))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"]
            .as_str()
            .expect("error message")
            .contains("unknown customer"));
        assert_eq!(repository.loan_count().expect("store readable"), 0);
    }
}
