//! Tracing/logging setup shared by storefront binaries.

/// Initialize process-wide tracing from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    let config = tracing::LogConfig::from_env();
    if !tracing::init(config) {
        ::tracing::debug!("tracing subscriber already installed");
    }
}

/// Tracing configuration (filters, output format).
pub mod tracing;
