use anyhow::Context;

use vending_infra::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vending_observability::init();

    let settings = Settings::from_env().context("failed to load settings")?;

    let app = vending_api::app::build_app(&settings)
        .await
        .context("failed to open record store")?;

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
