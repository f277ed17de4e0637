use std::future::Future;
use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::config::db::{db_url, DbKind, RuntimeEnv};
use crate::error::AppError;

const CONNECT_ATTEMPTS: u32 = 10;
const CONNECT_INTERVAL_MS: u64 = 500;
/// Recycling the only connection of an in-memory database would drop its data
const MEMORY_DB_LIFETIME: Duration = Duration::from_secs(60 * 60 * 24 * 365);

fn engine_name(kind: DbKind) -> &'static str {
    match kind {
        DbKind::Postgres => "postgresql",
        DbKind::SqliteFile | DbKind::SqliteMemory => "sqlite",
    }
}

/// Retry a connection attempt with fixed interval delays.
/// Returns the error of the last attempt after all retries are exhausted.
async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 1;
    loop {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(attempts = attempt, interval_ms, "connection_retry=success");
                }
                return Ok(result);
            }
            Err(e) if attempt >= max_attempts => return Err(e),
            Err(_) => {
                warn!(attempt, max_attempts, interval_ms, "connection_retry=failed");
                tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                attempt += 1;
            }
        }
    }
}

/// Pool options per engine.
///
/// An in-memory SQLite database lives inside a single connection, so the
/// pool is pinned to exactly one; concurrent transactions queue on acquire.
fn connect_options(url: String, kind: DbKind) -> ConnectOptions {
    let mut opts = ConnectOptions::new(url);
    opts.sqlx_logging(false);
    match kind {
        DbKind::Postgres => {
            opts.max_connections(20)
                .min_connections(1)
                .acquire_timeout(Duration::from_secs(5));
        }
        DbKind::SqliteFile => {
            opts.max_connections(5)
                .min_connections(1)
                .acquire_timeout(Duration::from_secs(10));
        }
        DbKind::SqliteMemory => {
            opts.max_connections(1)
                .min_connections(1)
                .acquire_timeout(Duration::from_secs(30))
                .idle_timeout(MEMORY_DB_LIFETIME)
                .max_lifetime(MEMORY_DB_LIFETIME);
        }
    }
    opts
}

/// Open a pool for the given environment and engine. Does NOT migrate.
pub async fn connect_db(env: RuntimeEnv, kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let url = db_url(env, kind)?;
    info!(engine = engine_name(kind), env = ?env, "connecting to database");

    match kind {
        DbKind::Postgres => {
            retry_connection(
                || {
                    let opts = connect_options(url.clone(), kind);
                    async move { Database::connect(opts).await.map_err(AppError::from) }
                },
                CONNECT_ATTEMPTS,
                CONNECT_INTERVAL_MS,
            )
            .await
        }
        DbKind::SqliteFile | DbKind::SqliteMemory => {
            Ok(Database::connect(connect_options(url, kind)).await?)
        }
    }
}

/// Single entrypoint for the backend: connect, then apply pending migrations.
pub async fn bootstrap_db(env: RuntimeEnv, kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(env, kind).await?;
    migrate(&conn, MigrationCommand::Up).await?;
    info!(engine = engine_name(kind), "database ready");
    Ok(conn)
}

/// Connect and run one migration command; used by the migration CLI.
pub async fn run_migration(
    env: RuntimeEnv,
    kind: DbKind,
    command: MigrationCommand,
) -> Result<(), AppError> {
    let conn = connect_db(env, kind).await?;
    migrate(&conn, command).await?;
    Ok(())
}
