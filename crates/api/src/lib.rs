//! Ad Performance Predictor API Server
//!
//! REST API for predicting ad performance, generating optimization
//! suggestions, and keeping a per-user history of saved predictions.

use axum::{
    extract::{DefaultBodyLimit, State},
    http::header,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use oracle::{DisabledOracle, GeminiOracle, Oracle};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use storage::{MemoryStore, SqliteStore, Store};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub mod error;
pub mod middleware;
pub mod orchestrator;
pub mod rate_limit;
mod routes;
pub mod settings;
pub mod telemetry;

pub use settings::{AppConfig, StorageBackend};
pub use error::ApiError;
pub use orchestrator::PredictionService;

use auth::TokenIssuer;
use rate_limit::{create_governor_config, RateLimitError};

/// Application state shared across handlers
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub predictions: PredictionService,
    pub tokens: TokenIssuer,
    pub config: AppConfig,
    pub version: String,
    pub start_time: Instant,
    pub metrics: PrometheusHandle,
}

impl AppState {
    /// Assemble state from explicit parts
    pub fn new(
        config: AppConfig,
        store: Arc<dyn Store>,
        oracle: Arc<dyn Oracle>,
    ) -> Result<Self, auth::AuthError> {
        let predictions =
            PredictionService::new(oracle, Duration::from_millis(config.oracle.timeout_ms));
        let tokens = TokenIssuer::new(
            config.auth.jwt_secret.as_bytes(),
            config.auth.token_ttl_secs,
        )?;

        Ok(Self {
            store,
            predictions,
            tokens,
            config,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
            metrics: telemetry::install_recorder(),
        })
    }

    /// Build state from configuration: pick the store backend and the oracle
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn Store> = match config.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
            StorageBackend::Sqlite => {
                Arc::new(SqliteStore::connect(&config.storage.sqlite_url).await?)
            }
        };

        let oracle: Arc<dyn Oracle> = if config.oracle.is_configured() {
            Arc::new(GeminiOracle::new(config.oracle.to_gemini())?)
        } else {
            info!("No oracle API key configured, using fallback predictions only");
            Arc::new(DisabledOracle)
        };

        if config.auth.jwt_secret == settings::DEV_JWT_SECRET {
            warn!("JWT secret not set; using insecure development default");
        }

        Ok(Self::new(config, store, oracle)?)
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
    /// Oracle in use, "Gemini AI" or "Mock AI"
    pub ai: String,
    pub uptime_seconds: u64,
    pub saved_predictions: Option<usize>,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Result<Router, RateLimitError> {
    let protected = Router::new()
        .route("/api/auth/me", get(routes::auth::me))
        .route("/api/ad/predict", post(routes::ads::predict))
        .route("/api/ad/suggestions", post(routes::ads::suggestions))
        .route("/api/ad/save", post(routes::ads::save))
        .route("/api/ad/history", get(routes::ads::history))
        .route("/api/ad/:id", get(routes::ads::detail))
        .route("/api/planner/budget", post(routes::planner::budget))
        .route("/api/planner/audience", post(routes::planner::audience))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    let mut api = Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/auth/signup", post(routes::auth::signup))
        .route("/api/auth/login", post(routes::auth::login))
        .merge(protected);

    if state.config.rate_limit.enabled {
        let config = create_governor_config(&state.config.rate_limit)?;
        api = api.layer(GovernorLayer { config });
    }

    let body_limit = state.config.server.body_limit_bytes;
    Ok(Router::new()
        .route("/metrics", get(metrics_handler))
        .merge(api)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::disable()),
        )
        .with_state(state))
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (status, saved_predictions) = match state.store.prediction_count().await {
        Ok(count) => ("ok", Some(count)),
        Err(e) => {
            warn!("Health check could not reach store: {}", e);
            ("degraded", None)
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
        message: "AI Ad Performance Predictor API is running".to_string(),
        version: state.version.clone(),
        ai: state.predictions.oracle_name().to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        saved_predictions,
    })
}

/// Prometheus exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Initialize logging from `RUST_LOG` (default `info`)
pub fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    // a subscriber may already be set, e.g. by an embedding test
    if let Err(e) = result {
        eprintln!("Logging already initialized: {}", e);
    }
}

/// Serve the router, exposing peer addresses to the rate limiter
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the server
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let addr = config.server.bind_addr();
    let state = Arc::new(AppState::from_config(config).await?);
    info!(
        "Storage: {:?}, AI: {}",
        state.config.storage.backend,
        state.predictions.oracle_name()
    );
    let app = create_router(state)?;

    let listener = TcpListener::bind(&addr).await?;
    info!("Starting API server on {}", listener.local_addr()?);

    serve(listener, app).await?;
    Ok(())
}
