mod api;
mod bootstrap;
mod health;
mod uploads;

use anyhow::Result;
use shedquote_core::config::{AppConfig, LoadOptions};
use tokio::net::TcpListener;

fn init_logging(config: &AppConfig) {
    use shedquote_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations.
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;

    health::spawn(
        &app.config.server.bind_address,
        app.config.server.health_check_port,
        app.db_pool.clone(),
    )
    .await?;

    let api_state = api::ApiState::sql(app.db_pool.clone());
    let upload_state = uploads::UploadState::from_config(&app.config.uploads);
    let router = api::router(api_state).merge(uploads::router(upload_state));

    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.api_port);
    let listener = TcpListener::bind(&address).await?;

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        "shedquote-server listening"
    );

    let grace_period_secs = app.config.server.graceful_shutdown_secs;
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!(
                event_name = "system.server.shutdown_signal",
                correlation_id = "shutdown",
                grace_period_secs,
                "shutdown signal received, draining in-flight requests"
            );
        })
        .await?;

    tracing::info!(
        event_name = "system.server.stopped",
        correlation_id = "shutdown",
        "shedquote-server stopped"
    );

    Ok(())
}
