//! HTTP server for the document vault

pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use state::AppState;

/// The assembled vault server: configuration plus wired application state
pub struct VaultServer {
    config: AppConfig,
    state: AppState,
}

impl VaultServer {
    /// Wire up state from configuration and the hosted providers
    pub fn new(config: AppConfig) -> Result<Self> {
        let state = AppState::new(config.clone())?;
        Ok(Self { config, state })
    }

    /// Wrap pre-built state; tests use this to inject mock providers
    pub fn with_state(config: AppConfig, state: AppState) -> Self {
        Self { config, state }
    }

    fn build_router(&self) -> Router {
        let router = Router::new()
            .route("/health", get(health))
            .route("/ready", get(readiness))
            .nest(
                "/api",
                routes::api_routes(self.config.server.max_upload_size),
            )
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new());

        if !self.config.server.enable_cors {
            return router;
        }
        // Browser clients call the API directly, so CORS sits outermost
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    }

    /// Bind and serve until the process is stopped
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid listen address: {}", e)))?;
        let router = self.build_router();

        tracing::info!("Vault server listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        self.state.set_ready(true);
        axum::serve(listener, router)
            .await
            .map_err(|e| Error::internal(format!("Server error: {}", e)))?;
        Ok(())
    }

    /// The host:port this server binds to
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
