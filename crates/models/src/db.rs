use std::time::Duration;

use configs::{AppConfig, DatabaseConfig, StartupConfig};
use migration::MigratorTrait;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use tracing::{error, info, warn};

use crate::errors::ModelError;

/// Build connect options from the shared database config.
pub fn connect_options(cfg: &DatabaseConfig) -> ConnectOptions {
    let mut opt = ConnectOptions::new(cfg.url.clone());
    opt.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .sqlx_logging(cfg.sqlx_logging);
    opt
}

pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let db = Database::connect(connect_options(cfg)).await?;
    Ok(db)
}

/// Connect using `config.toml` / environment resolution.
pub async fn connect() -> anyhow::Result<DatabaseConnection> {
    let cfg = AppConfig::load_and_validate()?;
    connect_with_config(&cfg.database).await
}

/// Round-trip a trivial statement through the pool.
pub async fn ping(db: &DatabaseConnection) -> Result<(), ModelError> {
    let backend = db.get_database_backend();
    db.execute(Statement::from_string(backend, "SELECT 1")).await?;
    Ok(())
}

async fn try_init(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let db = connect_with_config(cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Poll the store until it accepts a connection and the `drugs` table exists.
///
/// Makes `startup.init_attempts` attempts spaced by `startup.init_retry_delay_secs`.
/// This is the only retry loop in the services; request handlers never retry.
pub async fn init_store(
    cfg: &DatabaseConfig,
    startup: &StartupConfig,
) -> Result<DatabaseConnection, ModelError> {
    let attempts = startup.init_attempts.max(1);
    let mut last = String::new();
    for attempt in 1..=attempts {
        match try_init(cfg).await {
            Ok(db) => {
                info!(event = "store_ready", attempt, "database initialized");
                return Ok(db);
            }
            Err(e) => {
                warn!(event = "store_init_failed", attempt, attempts, error = %e, "store init attempt failed");
                last = e.to_string();
                if attempt < attempts {
                    tokio::time::sleep(startup.retry_delay()).await;
                }
            }
        }
    }
    error!(event = "store_unavailable", attempts, "giving up on store initialization");
    Err(ModelError::StoreUnavailable { attempts, reason: last })
}
