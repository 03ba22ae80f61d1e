//! HTTP server.

use crate::error::WebError;
use crate::routes;
use crate::state::AppState;
use std::future::Future;
use stockroom_core::ServerConfig;
use tokio::net::TcpListener;

/// The Stockroom web server.
pub struct StockroomServer {
    config: ServerConfig,
    state: AppState,
}

impl StockroomServer {
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Serve until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> Result<(), WebError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = routes::create_router(self.state);

        let listener = TcpListener::bind(&self.config.bind)
            .await
            .map_err(|e| WebError::StartupFailed(format!("bind {}: {e}", self.config.bind)))?;

        tracing::info!(address = %self.config.bind, "stockroom listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| WebError::StartupFailed(e.to_string()))?;

        tracing::info!("stockroom stopped");
        Ok(())
    }

    pub fn bind_address(&self) -> &str {
        &self.config.bind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::{AppConfig, DatabaseConfig};
    use stockroom_store::Store;

    #[tokio::test]
    async fn test_server_creation() {
        let cfg = AppConfig::default();
        let store = Store::connect(&DatabaseConfig {
            url: "sqlite::memory:".into(),
            max_connections: 1,
        })
        .await
        .unwrap();
        let server = StockroomServer::new(cfg.server.clone(), AppState::from_config(&cfg, store));
        assert_eq!(server.bind_address(), "0.0.0.0:3000");
    }
}
