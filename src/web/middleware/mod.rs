//! Middleware for the dashboard API.

pub mod cors;

pub use cors::create_cors_layer;
