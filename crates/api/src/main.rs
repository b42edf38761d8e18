use std::sync::Arc;

use anyhow::Context;

use livelum_api::app::{build_app, services};
use livelum_api::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;
    livelum_observability::init_with(config.log_format);

    let services = services::build_services(&config.storage)
        .await
        .context("failed to initialize storage")?;
    let app = build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, persistent = config.is_persistent(), "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
