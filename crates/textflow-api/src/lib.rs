//! Textflow API: HTTP surface over the analysis pipeline
pub mod config;
pub mod handlers;
pub mod metrics;
pub mod middleware;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use textflow_core::PipelineRunner;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

pub use config::{ConfigError, LogLevel, ServiceConfig};
pub use metrics::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub runner: Arc<PipelineRunner>,
    pub config: Arc<ServiceConfig>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Builds the runner from the enabled stages in `config`
    pub fn from_config(config: ServiceConfig) -> anyhow::Result<Self> {
        let definition = config
            .pipeline_definition()
            .context("invalid pipeline definition")?;
        let runner = textflow_stages::build_runner(&definition)
            .context("failed to build pipeline")?
            .with_policy(config.error_policy);
        let metrics = Metrics::new().context("failed to register metrics")?;

        Ok(Self {
            runner: Arc::new(runner),
            config: Arc::new(config),
            metrics: Arc::new(metrics),
        })
    }
}

pub fn create_app(state: AppState) -> Router {
    let cors = middleware::cors(&state.config.allowed_origins);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/tools", get(handlers::list_tools))
        .route("/process", post(handlers::process))
        .route("/process/batch", post(handlers::process_batch))
        .route("/metrics", get(handlers::metrics))
        .layer(axum::middleware::from_fn(middleware::request_id))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// `RUST_LOG` wins over the configured level when set
pub fn init_tracing(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter()));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub async fn run(config: ServiceConfig) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let state = AppState::from_config(config)?;
    tracing::info!(
        pipeline = %state.runner.pipeline_id(),
        policy = ?state.runner.policy(),
        "pipeline ready"
    );

    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("Textflow API listening on {}", addr);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
