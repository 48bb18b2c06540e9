use std::sync::Arc;

use anyhow::Context;

use bizops_api::config::ApiConfig;
use bizops_auth::Registry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bizops_observability::init();

    let config = ApiConfig::from_env()?;

    // Fail fast: no request is served against a partially built registry.
    let registry = Registry::build(config.role_definitions()?)
        .context("invalid role definitions")?;

    let app = bizops_api::app::build_app(&config.jwt_secret, Arc::new(registry));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
