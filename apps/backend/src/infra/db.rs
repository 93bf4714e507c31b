use std::future::Future;
use std::time::Duration;

use migration::{migrate, MigrationCommand, Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::{info, trace, warn};

use crate::config::db::{db_url, sanitize_db_url, DbKind};
use crate::errors::domain::{DomainError, InfraErrorKind, StoragePhase};

const PG_CONNECT_ATTEMPTS: u32 = 5;
const PG_CONNECT_INTERVAL_MS: u64 = 500;
const PINNED_CONNECTION_LIFETIME: Duration = Duration::from_secs(60 * 60 * 24 * 365);

fn connect_failed(url: &str, e: DbErr) -> DomainError {
    DomainError::infra(
        InfraErrorKind::Unavailable,
        StoragePhase::Read,
        format!("failed to connect to {}: {e}", sanitize_db_url(url)),
    )
}

async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, DomainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
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

/// Pool options for `kind`. In-memory SQLite is pinned to one connection,
/// since every new connection would open a fresh, empty database.
pub fn connect_options(kind: DbKind, url: &str) -> ConnectOptions {
    let mut opt = ConnectOptions::new(url.to_owned());
    opt.acquire_timeout(Duration::from_secs(5)).sqlx_logging(false);
    match kind {
        DbKind::SqliteMemory => {
            opt.min_connections(1)
                .max_connections(1)
                .idle_timeout(PINNED_CONNECTION_LIFETIME)
                .max_lifetime(PINNED_CONNECTION_LIFETIME);
        }
        DbKind::SqliteFile => {
            opt.max_connections(1);
        }
        DbKind::Postgres => {
            opt.max_connections(10);
        }
    }
    opt
}

/// True when every defined migration has been applied.
async fn schema_is_current(conn: &DatabaseConnection) -> Result<bool, DbErr> {
    let expected = Migrator::migrations();
    let applied = match Migrator::get_applied_migrations(conn).await {
        Ok(applied) => applied,
        Err(DbErr::Exec(_)) => {
            trace!(fastpath = "miss", reason = "migration_table_missing");
            return Ok(false);
        }
        Err(e) => return Err(e),
    };
    let current = applied.len() == expected.len()
        && applied.last().map(|m| m.name().to_string())
            == expected.last().map(|m| m.name().to_string());
    trace!(
        fastpath = if current { "hit" } else { "miss" },
        applied = applied.len(),
        expected = expected.len()
    );
    Ok(current)
}

/// Connect to the configured database and bring its schema up to date.
pub async fn connect_db(kind: DbKind) -> Result<DatabaseConnection, DomainError> {
    let url = db_url(kind)?;
    connect_url(kind, &url).await
}

/// As `connect_db`, with an explicit URL.
pub async fn connect_url(kind: DbKind, url: &str) -> Result<DatabaseConnection, DomainError> {
    let conn = open_pool(kind, url).await?;

    if !schema_is_current(&conn).await.map_err(migration_failed)? {
        migrate(&conn, MigrationCommand::Up)
            .await
            .map_err(migration_failed)?;
    }

    info!(db = %sanitize_db_url(url), ?kind, "database ready");
    Ok(conn)
}

/// Open a pool without touching the schema. Postgres is retried while the
/// server comes up.
pub async fn open_pool(kind: DbKind, url: &str) -> Result<DatabaseConnection, DomainError> {
    let opt = connect_options(kind, url);
    if kind == DbKind::Postgres {
        retry_connection(
            || {
                let opt = opt.clone();
                async move { Database::connect(opt).await.map_err(|e| connect_failed(url, e)) }
            },
            PG_CONNECT_ATTEMPTS,
            PG_CONNECT_INTERVAL_MS,
        )
        .await
    } else {
        Database::connect(opt)
            .await
            .map_err(|e| connect_failed(url, e))
    }
}

/// Run a single migration command against the configured database.
pub async fn run_migration(kind: DbKind, command: MigrationCommand) -> Result<(), DomainError> {
    let url = db_url(kind)?;
    let conn = open_pool(kind, &url).await?;
    info!(db = %sanitize_db_url(&url), ?kind, ?command, "migration target");
    migrate(&conn, command).await.map_err(migration_failed)
}

fn migration_failed(e: DbErr) -> DomainError {
    DomainError::infra(
        InfraErrorKind::Other("Migration".into()),
        StoragePhase::Write,
        format!("schema migration failed: {e}"),
    )
}
