use std::sync::Arc;

use motorista::auth::StaticCredentials;
use motorista::config::AppConfig;
use motorista::error::AppError;
use motorista::routes::create_router;
use motorista::services::{storage::FileStore, tips::TipService};
use motorista::state::AppState;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;

    let storage = FileStore::new(config.data_root.clone());
    storage.ensure_structure().await?;

    let credentials =
        StaticCredentials::new(config.admin_user.clone(), config.admin_password.clone());

    let tips = TipService::new(config.api_key.clone());
    tips.refresh();

    let state = AppState::new(
        config.clone(),
        Arc::new(storage),
        Arc::new(credentials),
        tips,
    );

    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,motorista=debug".into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
