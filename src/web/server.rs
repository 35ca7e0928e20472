//! Web server for revdash.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::config::{ServerConfig, WebConfig};
use crate::{Result, RevdashError};

use super::handlers::AppState;
use super::router::{create_health_router, create_router, create_static_router};

/// Web server for the dashboard API and live chat.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Web configuration.
    web_config: WebConfig,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(server: &ServerConfig, web: &WebConfig, app_state: AppState) -> Result<Self> {
        let addr = format!("{}:{}", server.host, server.port)
            .parse()
            .map_err(|e| RevdashError::Config(format!("invalid server address: {}", e)))?;

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            web_config: web.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn router(&self) -> Router {
        let mut router = create_router(self.app_state.clone(), &self.web_config.cors_origins)
            .merge(create_health_router());

        if self.web_config.serve_static {
            if let Some(static_router) = create_static_router(&self.web_config.static_path) {
                router = router.merge(static_router);
            }
        }

        router.layer(CompressionLayer::new())
    }

    /// Run the web server until `shutdown` completes.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Web server stopped");
        Ok(())
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let router = self.router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatService, MessageStore, RoomRegistry};
    use crate::config::Config;
    use crate::Database;

    async fn create_test_server(host: &str) -> Result<WebServer> {
        let db = Database::open_in_memory().await.unwrap();
        let chat = ChatService::new(
            MessageStore::new(db.pool().clone()),
            Arc::new(RoomRegistry::new()),
        );
        let config = Config::default();
        let server = ServerConfig {
            host: host.to_string(),
            port: 0,
        };
        WebServer::new(&server, &config.web, AppState::new(chat, &config)?)
    }

    #[tokio::test]
    async fn test_web_server_new() {
        let server = create_test_server("127.0.0.1").await.unwrap();
        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
    }

    #[tokio::test]
    async fn test_web_server_invalid_host() {
        assert!(matches!(
            create_test_server("not a host").await,
            Err(RevdashError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_web_server_run() {
        let server = create_test_server("127.0.0.1").await.unwrap();
        let addr = server.run_with_addr().await.unwrap();

        let client = reqwest::Client::new();
        let resp = client
            .get(format!("http://{}/health", addr))
            .send()
            .await
            .unwrap();

        assert!(resp.status().is_success());
        assert_eq!(resp.text().await.unwrap(), "OK");
    }

    #[tokio::test]
    async fn test_web_server_graceful_shutdown() {
        let server = create_test_server("127.0.0.1").await.unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(server.run(async {
            let _ = rx.await;
        }));

        tx.send(()).unwrap();
        assert!(handle.await.unwrap().is_ok());
    }
}
