//! CORS middleware configuration.

use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

/// Methods used by the dashboard and chat API.
const METHODS: [Method; 4] = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

/// Parse configured origins, skipping invalid entries.
fn parse_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect()
}

/// Create a CORS layer from configuration.
///
/// With no valid origins configured any origin is allowed, without credentials.
pub fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let parsed = parse_origins(origins);

    if parsed.is_empty() {
        CorsLayer::new()
            .allow_methods(METHODS)
            .allow_headers(Any)
            .allow_origin(Any)
    } else {
        CorsLayer::new()
            .allow_methods(METHODS)
            .allow_headers([CONTENT_TYPE, ACCEPT])
            .allow_credentials(true)
            .allow_origin(parsed)
    }
}
