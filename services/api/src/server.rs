use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_review_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use bswd_review::config::AppConfig;
use bswd_review::error::AppError;
use bswd_review::review::ApplicationReviewService;
use bswd_review::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
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

    let review_service = Arc::new(ApplicationReviewService::from_config(&config.reasoning)?);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        reasoning_provider: review_service.reasoning_provider(),
    };

    let reasoning = review_service.reasoning_provider().unwrap_or("template");
    let app = with_review_routes(review_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        reasoning,
        "bswd review service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
