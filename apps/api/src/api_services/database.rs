use std::str::FromStr;
use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tasktrail_core::AppError;
use tracing::info;

use crate::api_config::ApiConfig;

/// Connection pools for the two independent stores.
#[derive(Clone)]
pub struct DatabasePools {
    pub entity_pool: PgPool,
    pub audit_pool: PgPool,
}

pub async fn connect_and_migrate(config: &ApiConfig) -> Result<DatabasePools, AppError> {
    let entity_pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&entity_pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    let audit_pool = connect_audit_store(config).await?;

    info!(namespace = %config.audit_namespace, "database migrations applied");

    Ok(DatabasePools {
        entity_pool,
        audit_pool,
    })
}

async fn connect_audit_store(config: &ApiConfig) -> Result<PgPool, AppError> {
    let options = PgConnectOptions::from_str(&config.audit_database_url)
        .map_err(|error| AppError::Validation(format!("invalid AUDIT_DATABASE_URL: {error}")))?
        .options([("search_path", config.audit_namespace.as_str())]);

    let audit_pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(config.audit_write_timeout)
        .connect_with(options)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to connect to audit store: {error}"))
        })?;

    // The namespace is validated as a plain identifier when configuration loads.
    sqlx::query(&format!(
        "CREATE SCHEMA IF NOT EXISTS {}",
        config.audit_namespace
    ))
    .execute(&audit_pool)
    .await
    .map_err(|error| AppError::Internal(format!("failed to create audit namespace: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/audit_migrations")
        .run(&audit_pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run audit migrations: {error}")))?;

    Ok(audit_pool)
}
