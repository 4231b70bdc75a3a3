use crate::cli::ServeArgs;
use crate::infra::{terms_repository, AppState};
use crate::routes::with_terms_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use give_help::config::AppConfig;
use give_help::error::AppError;
use give_help::telemetry;
use give_help::terms::TermsService;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = terms_repository(config.terms.seed_file.as_deref())?;
    let terms_service = Arc::new(TermsService::new(Arc::new(repository)));

    let app = with_terms_routes(terms_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "give help api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
