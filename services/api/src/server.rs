use crate::cli::ServeArgs;
use crate::infra::{
    load_records, AppState, InMemoryBusinessRepository, InMemoryVerificationNotifier,
};
use crate::routes::with_business_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use kapital_admin::businesses::{BusinessCompletionService, BusinessRepository, VerificationNotifier};
use kapital_admin::config::AppConfig;
use kapital_admin::error::AppError;
use kapital_admin::telemetry;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

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

    let repository = Arc::new(InMemoryBusinessRepository::default());
    let notifier = Arc::new(InMemoryVerificationNotifier::default());
    let service = Arc::new(
        BusinessCompletionService::new(repository, notifier)
            .with_queue_limit(config.businesses.verification_queue_limit),
    );

    if let Some(seed_file) = config.businesses.seed_file.as_deref() {
        seed_businesses(&service, seed_file)?;
    }

    let app = with_business_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "lending admin service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Register and score every record in the seed file. Records that collide
/// with an existing id are skipped.
pub(crate) fn seed_businesses<R, N>(
    service: &BusinessCompletionService<R, N>,
    path: &Path,
) -> Result<usize, AppError>
where
    R: BusinessRepository + 'static,
    N: VerificationNotifier + 'static,
{
    let records = load_records(path)?;
    let mut seeded = 0;

    for record in records {
        let entry = match service.register(record) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping seed record");
                continue;
            }
        };
        service.score(&entry.id)?;
        seeded += 1;
    }

    info!(seeded, path = %path.display(), "seeded businesses");
    Ok(seeded)
}
