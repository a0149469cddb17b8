//! Metas dashboard API server.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use http::{HeaderValue, Method};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use metas_dashboard::adapters::http::{dashboard_routes, DashboardAppState};
use metas_dashboard::adapters::{JsonFileSource, MemoizingSource};
use metas_dashboard::application::DomainLoader;
use metas_dashboard::config::{AppConfig, ServerConfig};
use metas_dashboard::ports::MetricsSource;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let files: Arc<dyn MetricsSource> = Arc::new(JsonFileSource::new(&config.source.data_dir));
    let source: Arc<dyn MetricsSource> = if config.source.memoize {
        Arc::new(MemoizingSource::new(files))
    } else {
        files
    };

    let loader = DomainLoader::new(source, Arc::new(config.domains.clone()));
    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(dashboard_routes(DashboardAppState::new(loader)))
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(
        %addr,
        domains = config.domains.domains().len(),
        data_dir = %config.source.data_dir.display(),
        "Metas dashboard listening"
    );
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if server.is_production() {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET])
        .allow_headers(Any)
}
