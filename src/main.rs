use std::process::ExitCode;
use time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::Key};
use tracing_subscriber::EnvFilter;

use finance_tracker_server::{
    app,
    config::Config,
    constants::{SESSION_EXPIRY_DAYS, SESSION_NAME},
    database,
    state::AppState,
};

#[tokio::main]
async fn main() -> ExitCode {
    // load environment variables
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let db = database::init_db(&config.data_path).await?;
    tracing::info!(data_path = %config.data_path, "database ready");

    // TODO: periodic cleanup of expired sessions for long-running deployments
    let store = MemoryStore::default();
    let key = Key::try_from(config.session_secret.as_bytes())
        .map_err(|e| anyhow::anyhow!("Invalid session secret: {}", e))?;
    let session_layer = SessionManagerLayer::new(store)
        .with_secure(false)
        .with_name(SESSION_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::days(SESSION_EXPIRY_DAYS)))
        .with_signed(key);

    let state = AppState::new(db, config.summary);
    let router = app(state, config.client_url.clone()).layer(session_layer);

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!(
        address = %bind_address,
        balance_policy = ?config.summary.balance_policy,
        year_filter = ?config.summary.year_match,
        "server listening"
    );

    axum::serve(listener, router).await?;
    Ok(())
}
