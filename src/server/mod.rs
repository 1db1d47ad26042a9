use crate::catalog::CatalogService;
use crate::config::Config;
use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub mod auth;
mod error;
pub mod routes_admin;
pub mod routes_catalog;

pub use error::{ApiError, Flash, FlashLevel};

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub catalog: CatalogService,
    /// Key for signing session cookies
    session_secret: Arc<[u8]>,
}

impl AppContext {
    /// Build the context, generating a per-process session secret when none
    /// is configured.
    pub fn new(config: Config, catalog: CatalogService) -> Self {
        let session_secret = config
            .server
            .auth
            .session_secret
            .clone()
            .unwrap_or_else(|| {
                tracing::debug!("No session_secret configured, sessions end on restart");
                auth::generate_secret()
            });

        Self {
            config: Arc::new(config),
            catalog,
            session_secret: Arc::from(session_secret.into_bytes()),
        }
    }

    pub fn session_secret(&self) -> &[u8] {
        &self.session_secret
    }
}

/// Run a catalog operation on the blocking pool.
pub(crate) async fn run_blocking<T, F>(f: F) -> std::result::Result<T, ApiError>
where
    F: FnOnce() -> sweetshop_common::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            ApiError::from(sweetshop_common::Error::internal(format!(
                "Catalog task failed: {}",
                e
            )))
        })?
        .map_err(ApiError::from)
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let photo_prefix = ctx.catalog.photos().url_prefix().to_string();
    let photo_root = ctx.catalog.photos().root().to_path_buf();
    let max_upload_bytes = ctx.config.server.max_upload_bytes;
    let static_dir = ctx.config.server.static_dir.clone();

    let mut app = Router::new()
        // Health check
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        // Product photos
        .nest_service(&photo_prefix, ServeDir::new(photo_root))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx);

    // Serve static files if directory is provided
    // Uses SPA fallback: serves index.html for any route that doesn't match a file
    if let Some(dir) = static_dir {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            let index_path = dir.join("index.html");
            app = app.fallback_service(
                ServeDir::new(&dir)
                    .append_index_html_on_directories(true)
                    .not_found_service(ServeFile::new(index_path)),
            );
        }
    }

    app
}

fn api_routes() -> Router<AppContext> {
    // Auth routes are public; admin routes authenticate through the
    // `AdminSession` extractor.
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/status", get(auth::auth_status))
        .merge(routes_catalog::catalog_routes())
        .merge(routes_admin::admin_routes())
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server
pub async fn start_server(config: Config, catalog: CatalogService) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let ctx = AppContext::new(config, catalog);
    if ctx.config.server.auth.enabled && ctx.config.server.auth.password_hash.is_none() {
        tracing::warn!("Auth is enabled but no admin password is configured; admin login is unavailable");
    }

    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
