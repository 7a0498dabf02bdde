// Remittance Dashboard - Web Server
// Renders the dashboard once, then serves it until Ctrl+C

use anyhow::Result;
use remittance_dashboard::server::{serve, AppState};
use remittance_dashboard::{Config, VERSION};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .init();
    info!(version = VERSION, "remittance dashboard starting");

    let config = Config::from_env()?;
    let state = AppState::build()?;

    serve(&config, state).await
}
