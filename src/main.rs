use covid_dashboard::{router, AppState, Config, CovidApi};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    let source = CovidApi::new(&config.api_base_url, config.request_timeout)?;
    info!(
        base_url = source.base_url(),
        timeout_secs = config.request_timeout.as_secs(),
        default_country = %config.default_country,
        "using covid data source"
    );

    let state = AppState::new(source, config.default_country);
    let _sweeper = state.spawn_idle_sweeper(config.session_ttl);
    info!(session_ttl_secs = config.session_ttl.as_secs(), "sweeping idle sessions");

    let app = router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
