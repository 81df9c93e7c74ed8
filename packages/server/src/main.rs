use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use server::config::AppConfig;
use server::database;
use server::payments::stripe::StripeClient;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;

    let db = database::init_db(&config.database.url).await?;
    info!("Database connected and schema synced");

    let payments = Arc::new(
        StripeClient::new(&config.stripe).map_err(|e| anyhow::anyhow!("{e}"))?,
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        db,
        config,
        payments,
    };

    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("ContestHub server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
