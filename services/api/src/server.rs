use crate::cli::ServeArgs;
use crate::infra::{AppState, FixtureCarrierLookup, SnapshotRuleStore};
use crate::routes::with_inspection_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use package_insight::config::AppConfig;
use package_insight::error::AppError;
use package_insight::inspection::InspectionService;
use package_insight::telemetry;
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

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let rules = Arc::new(SnapshotRuleStore::from_path(
        config.sources.rules_path.as_deref(),
    )?);
    let carrier = Arc::new(FixtureCarrierLookup::from_path(
        config.sources.carrier_fixtures_path.as_deref(),
    )?);
    let inspection_service = Arc::new(InspectionService::new(
        carrier,
        rules,
        config.scoring.clone(),
    ));

    let app = with_inspection_routes(inspection_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "package insight service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
