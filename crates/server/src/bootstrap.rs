use shedquote_core::config::{AppConfig, ConfigError, LoadOptions};
use shedquote_db::{connect_with_settings, migrations, DbPool};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("upload directory `{path}` could not be created: {source}")]
    UploadDir { path: String, source: std::io::Error },
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    tokio::fs::create_dir_all(&config.uploads.dir).await.map_err(|source| {
        BootstrapError::UploadDir { path: config.uploads.dir.display().to_string(), source }
    })?;
    info!(
        event_name = "system.bootstrap.upload_dir_ready",
        correlation_id = "bootstrap",
        upload_dir = %config.uploads.dir.display(),
        "upload directory available"
    );

    Ok(Application { config, db_pool })
}

#[cfg(test)]
mod tests {
    use shedquote_core::config::{ConfigOverrides, LoadOptions};

    use super::bootstrap;

    fn options(database_url: &str, uploads_dir: std::path::PathBuf) -> LoadOptions {
        LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some(database_url.to_string()),
                uploads_dir: Some(uploads_dir),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }

    #[tokio::test]
    async fn bootstrap_prepares_schema_and_upload_dir() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let uploads_dir = dir.path().join("uploads");

        let app = bootstrap(options("sqlite::memory:?cache=shared", uploads_dir.clone()))
            .await
            .expect("bootstrap should succeed");

        let (table_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master
             WHERE type = 'table' AND name IN ('shed_design', 'customer_quote', 'users')",
        )
        .fetch_one(&app.db_pool)
        .await
        .expect("expected baseline tables after bootstrap");
        assert_eq!(table_count, 3, "bootstrap should expose the baseline tables");

        assert!(uploads_dir.is_dir(), "bootstrap should create the upload directory");

        app.db_pool.close().await;
    }

    #[tokio::test]
    async fn bootstrap_fails_fast_on_invalid_config() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let result = bootstrap(options("postgres://not-sqlite", dir.path().to_path_buf())).await;

        assert!(result.is_err());
        let message = result.err().expect("error").to_string();
        assert!(message.contains("database.url"));
    }
}
