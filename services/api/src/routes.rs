use crate::infra::{deserialize_optional_date, AppState, EvaluationResponse};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;
use tender_scoring::error::AppError;
use tender_scoring::import::{EconomicOfferImporter, EvaluationBundle};
use tender_scoring::scoring::{ScoringConfiguration, ValidationReport};

#[derive(Debug, Deserialize)]
pub(crate) struct EvaluationRequest {
    #[serde(flatten)]
    pub(crate) bundle: EvaluationBundle,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) evaluated_on: Option<NaiveDate>,
    /// Optional CSV export of economic offers, folded into the bundle's offers.
    #[serde(default)]
    pub(crate) offers_csv: Option<String>,
}

pub(crate) fn scoring_routes() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/evaluations", post(evaluation_endpoint))
        .route(
            "/api/v1/configurations/validate",
            post(validate_configuration_endpoint),
        )
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

pub(crate) async fn evaluation_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<EvaluationRequest>,
) -> Result<Json<EvaluationResponse>, AppError> {
    let EvaluationRequest {
        mut bundle,
        evaluated_on,
        offers_csv,
    } = payload;

    if let Some(csv) = offers_csv {
        let offers = EconomicOfferImporter::from_reader(Cursor::new(csv.into_bytes()))?;
        bundle.merge_offers(offers);
    }

    let report = state.service.evaluate(&bundle)?;
    let evaluated_on = evaluated_on.unwrap_or_else(|| Local::now().date_naive());

    Ok(Json(EvaluationResponse {
        evaluated_on,
        report,
    }))
}

pub(crate) async fn validate_configuration_endpoint(
    Extension(state): Extension<AppState>,
    Json(configuration): Json<ScoringConfiguration>,
) -> Json<ValidationReport> {
    Json(state.service.validate(&configuration))
}
