use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, warn};

use plinth::logging::init_tracing;
use plinth::metrics::{init_metrics, metrics_app};
use plinth::plinth_config::{AuthConfig, CorsConfig, ServerConfig};
use plinth::router::init_router;
use plinth::state::init_app_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing()?;

    let auth_config = AuthConfig::from_env()?;
    let server_config = ServerConfig::from_env()?;
    let state = init_app_state(&auth_config, &server_config, CorsConfig::from_env())?;

    let features = state
        .feature_discovery
        .client()?
        .get_backend_features()
        .await?;
    let app = init_router(state, &features);

    if let Some(handle) = init_metrics()? {
        let metrics_addr = format!("{}:{}", server_config.host, server_config.metrics_port);
        let listener = tokio::net::TcpListener::bind(&metrics_addr)
            .await
            .with_context(|| format!("failed to bind metrics listener on {metrics_addr}"))?;
        info!(addr = %metrics_addr, "metrics server listening");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                warn!(error = %e, "metrics server stopped");
            }
        });
    }

    let addr = server_config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(
        addr = %addr,
        plugins = features.plugin_ids().count(),
        "server listening"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
