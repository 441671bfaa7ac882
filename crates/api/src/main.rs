use std::sync::Arc;

use anyhow::Context;

use lumiere_api::app::{build_app, services};
use lumiere_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    lumiere_observability::init();

    let config = ApiConfig::from_env()?;
    let services = services::build_services(&config).context("failed to load catalogue")?;
    let app = build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
