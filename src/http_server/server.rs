//! # HTTP Server
//!
//! Combines the moderation and health routers into one axum service.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::routes::{moderation_routes, AppState};
use crate::config::ServiceConfig;
use crate::moderation::ModerationService;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

pub struct HttpServer {
    config: ServiceConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: ServiceConfig, service: ModerationService) -> Self {
        let router = Self::build_router(&config, Arc::new(AppState::new(service)));
        Self { config, router }
    }

    fn build_router(config: &ServiceConfig, state: Arc<AppState>) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .route("/health", get(health_handler))
            .merge(moderation_routes(state))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "moderation service listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("moderation service stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; serve until the process is killed.
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{JwtConfig, JwtManager};
    use crate::store::MemoryStore;

    fn service() -> ModerationService {
        ModerationService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(JwtManager::new(JwtConfig::new("server-test", 72))),
        )
    }

    #[test]
    fn test_server_with_custom_port() {
        let server = HttpServer::new(ServiceConfig::with_port(9090), service());
        assert_eq!(server.socket_addr(), "0.0.0.0:9090");
    }

    #[test]
    fn test_router_builds_with_origin_list() {
        let config = ServiceConfig {
            cors_origins: vec!["http://localhost:3000".to_string()],
            ..ServiceConfig::default()
        };
        let _router = HttpServer::new(config, service()).router();
    }
}
