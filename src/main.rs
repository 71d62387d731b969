//! AlgoJudge Tester - Application Entry Point
//!
//! This is the main entry point for the judge subsystem server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use bollard::Docker;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use algojudge_tester::{
    benchmark::SandboxRunner,
    config::CONFIG,
    db,
    handlers,
    models::LanguageRegistry,
    services::{ContestSolutionsQuery, JudgeOrchestrator, ProblemFetcher},
    state::AppState,
};

const DOCKER_READY_MAX_ATTEMPTS: u32 = 10;
const DOCKER_READY_RETRY_DELAY: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| CONFIG.server.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting AlgoJudge tester...");

    // Initialize database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(CONFIG.database.max_connections)
        .connect(&CONFIG.database.url)
        .await?;

    // Run database migrations
    tracing::info!("Running database migrations...");
    db::run_migrations(&db_pool).await?;

    // Connect to Docker, retrying with a bounded backoff: the daemon may
    // still be starting up when this process does (e.g. under compose).
    tracing::info!("Connecting to Docker...");
    let docker = connect_docker_with_retry().await?;

    // Load the language registry (C1). A broken registry is startup-fatal.
    tracing::info!(path = %CONFIG.languages.config_path, "Loading language registry...");
    let languages = Arc::new(
        LanguageRegistry::load(&CONFIG.languages.config_path)
            .expect("failed to load language registry"),
    );
    tracing::info!(languages = languages.public_list().len(), "Language registry loaded");

    let sandbox = SandboxRunner::new(docker, languages.clone(), CONFIG.docker.scratch_dir.clone());

    // Best-effort image pre-pull; failures are logged, not fatal (C2's
    // startup hook — a missing image surfaces as per-test RE later).
    sandbox.pull_required_images().await;

    let content_service_timeout = Duration::from_secs(CONFIG.content_service.timeout_seconds);
    let problem_fetcher = Arc::new(ProblemFetcher::new(
        CONFIG.content_service.base_url.clone(),
        content_service_timeout,
    ));
    let contest_query = ContestSolutionsQuery::new(
        CONFIG.content_service.base_url.clone(),
        content_service_timeout,
    );

    let orchestrator = JudgeOrchestrator::spawn(
        db_pool.clone(),
        sandbox,
        problem_fetcher.clone(),
        &CONFIG.worker,
    );

    // Create application state
    let state = AppState::new(
        db_pool,
        languages,
        orchestrator,
        contest_query,
        problem_fetcher,
        CONFIG.clone(),
    );

    // Build the router
    let app = Router::new()
        .merge(handlers::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start the server
    let addr = SocketAddr::new(CONFIG.server.host.parse()?, CONFIG.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Retry the initial Docker daemon connection with a bounded backoff rather
/// than failing on the first attempt — the daemon may still be starting.
async fn connect_docker_with_retry() -> anyhow::Result<Docker> {
    let mut last_err = None;
    let socket_path = CONFIG
        .docker
        .socket_path
        .strip_prefix("unix://")
        .unwrap_or(&CONFIG.docker.socket_path);

    for attempt in 1..=DOCKER_READY_MAX_ATTEMPTS {
        match Docker::connect_with_socket(socket_path, 120, bollard::API_DEFAULT_VERSION) {
            Ok(docker) => match docker.version().await {
                Ok(info) => {
                    tracing::info!(
                        version = %info.version.unwrap_or_default(),
                        attempt,
                        "Connected to Docker"
                    );
                    return Ok(docker);
                }
                Err(err) => last_err = Some(anyhow::Error::from(err)),
            },
            Err(err) => last_err = Some(anyhow::Error::from(err)),
        }

        tracing::warn!(attempt, max = DOCKER_READY_MAX_ATTEMPTS, "Docker not ready yet, retrying...");
        tokio::time::sleep(DOCKER_READY_RETRY_DELAY).await;
    }

    Err(last_err.unwrap_or_else(|| anyhow::anyhow!("failed to connect to Docker")))
}
