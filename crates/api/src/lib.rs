//! HTTP API: configuration, use cases, routing, and request/response mapping.

pub mod app;
pub mod config;
