use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySelectionStore};
use crate::routes::with_development_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use housing_index::config::AppConfig;
use housing_index::developments::DevelopmentMapService;
use housing_index::error::AppError;
use housing_index::ingest::DataSource;
use housing_index::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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
    if let Some(data) = args.data.take() {
        config.data.path = Some(data);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let source = DataSource::from_optional_path(config.data.path.clone());
    let store = Arc::new(InMemorySelectionStore::default());
    let service = Arc::new(DevelopmentMapService::load(source, store)?);
    info!(
        source = %service.source().describe(),
        developments = service.catalog().len(),
        "development catalog scored"
    );

    let app = with_development_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "housing imbalance index ready");

    axum::serve(listener, app).await?;
    Ok(())
}
