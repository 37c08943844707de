use anyhow::Result;
use axum::{
    middleware,
    routing::{any, get},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    auth,
    config::Config,
    fetcher::Fetcher,
    handlers::{self, AppState},
    metrics,
    middleware::method_validator,
    signals::shutdown_signal,
};

/// Start the exporter server
///
/// This function:
/// 1. Initializes metrics (when enabled)
/// 2. Builds the fetcher and the shared state
/// 3. Binds to the configured address
/// 4. Serves requests until SIGINT/SIGTERM
pub async fn start_server(config: Config) -> Result<()> {
    let metrics_handle = if config.metrics.enabled {
        info!("Initializing Prometheus metrics...");
        Some(Arc::new(metrics::init_metrics()?))
    } else {
        None
    };

    let config = Arc::new(config);
    let fetcher = Fetcher::new()?;
    let state = AppState::new(config.clone(), fetcher)?;

    let app = create_router(state, metrics_handle);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    info!("Starting content exporter on {}", addr);
    info!(
        "Target: {} (mime type '{}', timeout {}s), basic auth {}",
        config.target.url,
        config.target.mime_type,
        config.target.timeout_seconds,
        if config.basic_auth.is_some() { "configured" } else { "not configured" }
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Build the router with all routes and middleware
///
/// Content routes are method-validated; the `*BasicAuth` routes additionally
/// require basic authentication. The metrics route is mounted only when a
/// handle is supplied.
pub fn create_router(state: AppState, metrics_handle: Option<Arc<PrometheusHandle>>) -> Router {
    let metrics_endpoint = state.config.metrics.endpoint.clone();

    let protected_routes = Router::new()
        .route("/jsonBasicAuth", any(handlers::writers::json_writer))
        .route("/htmlBasicAuth", any(handlers::writers::html_writer))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::basic_auth_middleware,
        ));

    let content_routes = Router::new()
        .route("/jsonNoBasicAuth", any(handlers::writers::json_writer))
        .route("/htmlNoBasicAuth", any(handlers::writers::html_writer))
        .merge(protected_routes)
        // Outermost, so the method is checked before credentials. Route layers
        // leave the 404 fallback untouched.
        .route_layer(middleware::from_fn(method_validator))
        .with_state(state);

    let mut app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(content_routes);

    if let Some(handle) = metrics_handle {
        app = app.route(
            &metrics_endpoint,
            get(handlers::metrics_handler::metrics).with_state(handle),
        );
    }

    app.layer(TraceLayer::new_for_http())
}
