//! Test helpers for web API tests.
//!
//! Builds the real router over an in-memory database, and spawns fake
//! upstream APIs on loopback ports.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum_test::TestServer;

use revdash::chat::{ChatService, MessageStore, RoomKey, RoomRegistry};
use revdash::config::Config;
use revdash::web::{create_router, AppState};
use revdash::Database;

/// A running test server and the state behind it.
pub struct TestApp {
    pub server: TestServer,
    pub chat: ChatService,
    pub db: Database,
}

/// Create a test server with default configuration.
pub async fn create_test_app() -> TestApp {
    create_test_app_with(Config::default()).await
}

/// Create a test server with the given configuration.
pub async fn create_test_app_with(config: Config) -> TestApp {
    build_test_app(config, false).await
}

/// Create a test server listening on a real port, for WebSocket tests.
pub async fn create_http_test_app() -> TestApp {
    build_test_app(Config::default(), true).await
}

async fn build_test_app(config: Config, http_transport: bool) -> TestApp {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let chat = ChatService::new(
        MessageStore::new(db.pool().clone()),
        Arc::new(RoomRegistry::new()),
    );
    let state = AppState::new(chat.clone(), &config).expect("Failed to create app state");

    let router = create_router(Arc::new(state), &config.web.cors_origins);
    let server = if http_transport {
        TestServer::builder()
            .http_transport()
            .build(router)
            .expect("Failed to create test server")
    } else {
        TestServer::new(router).expect("Failed to create test server")
    };

    TestApp { server, chat, db }
}

/// Serve `router` on a loopback port and return its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind upstream");
    let addr = listener.local_addr().expect("Failed to get upstream addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Upstream failed");
    });
    format!("http://{}", addr)
}

/// Wait until `key` has `expected` live members.
pub async fn wait_for_members(chat: &ChatService, key: &RoomKey, expected: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while chat.registry().member_count(key).await != expected {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("Timed out waiting for room members");
}
