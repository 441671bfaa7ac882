//! HTTP API: catalogue browsing and shopper sessions.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
