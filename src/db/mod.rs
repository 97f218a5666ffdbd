//! Database module for persistent storage of detected swaps and the sync
//! watermark.
//!
//! # Architecture
//!
//! - `models`: Data structures that map to database tables
//! - `gateway`: Capability traits consumed by the scanner
//! - `repository`: [`SqliteGateway`], the SQLite implementation
//! - Connection pooling with SQLite WAL mode for concurrency
//! - Embedded migrations under `migrations/`

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
    SqlitePool,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::error::{ScannerError, ScannerResult};

pub mod gateway;
pub mod models;
pub mod repository;

pub use gateway::{PersistenceWriter, SwapQuery, SyncReader};
pub use models::{InsertOutcome, SwapRecord, SyncWatermark};
pub use repository::SqliteGateway;

const REQUIRED_TABLES: [&str; 2] = ["swap_events", "sync_info"];

/// Creates a SQLite connection pool, runs migrations and verifies the schema.
///
/// # Configuration
///
/// - **WAL mode**: Enables concurrent readers during writes
/// - **Busy timeout**: 30 seconds to handle lock contention
/// - **Max connections**: 5, or 1 for in-memory databases
/// - **Min connections**: 1 (keep one connection warm)
///
/// # Errors
///
/// Returns an error if the URL is invalid, the database cannot be opened
/// or a migration fails.
///
/// # Example
///
/// ```no_run
/// use bridge_swap_scanner::db::create_pool;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool("sqlite:./swaps.db").await?;
///     Ok(())
/// }
/// ```
pub async fn create_pool(database_url: &str) -> ScannerResult<SqlitePool> {
    info!(database_url, "Connecting to database");

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| {
            ScannerError::database(
                format!("Failed to parse database URL: {database_url}"),
                Some(Box::new(e)),
            )
        })?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(30));

    // Every connection to an in-memory database would see its own copy
    let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await
        .map_err(|e| {
            ScannerError::database(
                format!("Failed to connect to database at {database_url}"),
                Some(Box::new(e)),
            )
        })?;

    info!("Running database migrations");
    run_migrations(&pool).await?;
    verify_database(&pool).await?;
    info!("Database migrations complete");

    Ok(pool)
}

/// Runs database migrations to ensure schema is up-to-date.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub async fn run_migrations(pool: &SqlitePool) -> ScannerResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| ScannerError::database("Failed to run database migrations", Some(Box::new(e))))?;

    Ok(())
}

/// Verify that required tables exist after migrations.
///
/// # Errors
///
/// Returns an error if a required table is missing.
pub async fn verify_database(pool: &SqlitePool) -> ScannerResult<()> {
    let rows = sqlx::query_as::<_, (String,)>(
        r#"
        SELECT name FROM sqlite_master
        WHERE type='table' AND name IN ('swap_events', 'sync_info')
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| ScannerError::database("Failed to verify database schema", Some(Box::new(e))))?;

    if rows.len() < REQUIRED_TABLES.len() {
        return Err(ScannerError::database(
            format!(
                "Database schema incomplete. Expected {} tables, found {}",
                REQUIRED_TABLES.len(),
                rows.len()
            ),
            None,
        ));
    }

    Ok(())
}

/// Connect, migrate and wrap the database at `database_url`.
///
/// # Errors
///
/// Returns an error if [`create_pool`] fails.
pub async fn connect_gateway(database_url: &str) -> ScannerResult<SqliteGateway> {
    Ok(SqliteGateway::new(create_pool(database_url).await?))
}
