use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::scoring_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tender_scoring::config::AppConfig;
use tender_scoring::error::AppError;
use tender_scoring::service::EvaluationService;
use tender_scoring::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let thresholds = config.scoring.thresholds()?;
    let thresholds_source = config
        .scoring
        .thresholds_path
        .as_deref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        service: EvaluationService::new(thresholds),
    };

    let app = scoring_routes()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        thresholds = %thresholds_source,
        "tender scoring service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
