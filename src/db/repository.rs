//! SQLite persistence gateway.
//!
//! Implements [`SyncReader`], [`PersistenceWriter`] and [`SwapQuery`] on
//! top of a shared `SqlitePool`. One gateway is shared by the source and
//! destination scanners.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::gateway::{PersistenceWriter, SwapQuery, SyncReader};
use super::models::{InsertOutcome, SwapRecord, SyncWatermark};
use crate::error::{ScannerError, ScannerResult};
use crate::swap::SwapTxType;

/// Gateway for all database operations.
///
/// Wraps a SQLite connection pool; cloning shares the pool.
#[derive(Debug, Clone)]
pub struct SqliteGateway {
    pool: SqlitePool,
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl SqliteGateway {
    /// Creates a new gateway with the given connection pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Health check for database connectivity.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be reached.
    pub async fn health_check(&self) -> ScannerResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| ScannerError::database("Database health check failed", Some(Box::new(e))))?;

        Ok(())
    }

    /// Number of stored swaps of `kind`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn count_swaps(&self, kind: SwapTxType) -> ScannerResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM swap_events WHERE kind = ?")
            .bind(kind.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ScannerError::database("Failed to count swaps", Some(Box::new(e))))?;

        Ok(count)
    }
}

#[async_trait]
impl SyncReader for SqliteGateway {
    async fn get_sync_watermark(&self) -> ScannerResult<SyncWatermark> {
        let watermark = sqlx::query_as::<_, SyncWatermark>(
            r#"
            SELECT src_start_height, src_synced_height, dst_start_height, dst_synced_height
            FROM sync_info
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ScannerError::database("Failed to read sync info", Some(Box::new(e))))?;

        Ok(watermark.unwrap_or_default())
    }
}

#[async_trait]
impl PersistenceWriter for SqliteGateway {
    #[instrument(skip(self))]
    async fn set_start_height(&self, src_start: i64, dst_start: i64) -> ScannerResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sync_info (id, src_start_height, dst_start_height, updated_at)
            VALUES (1, ?1, ?2, ?3)
            ON CONFLICT (id) DO UPDATE SET
                src_start_height = CASE
                    WHEN sync_info.src_start_height = 0 THEN excluded.src_start_height
                    ELSE sync_info.src_start_height END,
                dst_start_height = CASE
                    WHEN sync_info.dst_start_height = 0 THEN excluded.dst_start_height
                    ELSE sync_info.dst_start_height END,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(src_start)
        .bind(dst_start)
        .bind(chrono::Utc::now().timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| ScannerError::database("Failed to set start height", Some(Box::new(e))))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_synced_height(&self, src_synced: i64, dst_synced: i64) -> ScannerResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sync_info (id, src_synced_height, dst_synced_height, updated_at)
            VALUES (1, ?1, ?2, ?3)
            ON CONFLICT (id) DO UPDATE SET
                src_synced_height = MAX(sync_info.src_synced_height, excluded.src_synced_height),
                dst_synced_height = MAX(sync_info.dst_synced_height, excluded.dst_synced_height),
                updated_at = excluded.updated_at
            "#,
        )
        .bind(src_synced)
        .bind(dst_synced)
        .bind(chrono::Utc::now().timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| ScannerError::database("Failed to update synced height", Some(Box::new(e))))?;

        Ok(())
    }

    #[instrument(skip(self, record), fields(pair_id = %record.pair_id, tx = %record.tx_hash))]
    async fn add_swap(&self, kind: SwapTxType, record: &SwapRecord) -> ScannerResult<InsertOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO swap_events (
                kind, pair_id, tx_hash, block_number, block_time,
                amount, famount, user, bind, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (kind, pair_id, tx_hash) DO NOTHING
            "#,
        )
        .bind(kind.as_str())
        .bind(&record.pair_id)
        .bind(&record.tx_hash)
        .bind(record.block_number)
        .bind(record.block_time)
        .bind(&record.amount)
        .bind(record.famount)
        .bind(&record.user)
        .bind(&record.bind)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            ScannerError::database(format!("Failed to insert {kind} swap"), Some(Box::new(e)))
        })?;

        if result.rows_affected() == 0 {
            debug!(%kind, "Swap already recorded");
            return Ok(InsertOutcome::Duplicate);
        }
        Ok(InsertOutcome::Inserted)
    }
}

#[async_trait]
impl SwapQuery for SqliteGateway {
    async fn find_swaps_by_tx(&self, kind: SwapTxType, tx_hash: &str) -> ScannerResult<Vec<SwapRecord>> {
        sqlx::query_as::<_, SwapRecord>(
            "SELECT * FROM swap_events WHERE kind = ? AND tx_hash = ? ORDER BY id",
        )
        .bind(kind.as_str())
        .bind(tx_hash.to_lowercase())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ScannerError::database("Failed to query swap by tx", Some(Box::new(e))))
    }

    async fn find_swaps_in_block_range(
        &self,
        kind: SwapTxType,
        pair_id: &str,
        start: u64,
        end: u64,
    ) -> ScannerResult<Vec<SwapRecord>> {
        sqlx::query_as::<_, SwapRecord>(
            r#"
            SELECT * FROM swap_events
            WHERE kind = ? AND pair_id = ? AND block_number >= ? AND block_number < ?
            ORDER BY block_number ASC, id ASC
            "#,
        )
        .bind(kind.as_str())
        .bind(pair_id)
        .bind(to_i64(start))
        .bind(to_i64(end))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ScannerError::database("Failed to query swaps by block range", Some(Box::new(e))))
    }

    async fn find_swaps_in_time_range(
        &self,
        kind: SwapTxType,
        pair_id: &str,
        start: u64,
        end: u64,
    ) -> ScannerResult<Vec<SwapRecord>> {
        sqlx::query_as::<_, SwapRecord>(
            r#"
            SELECT * FROM swap_events
            WHERE kind = ? AND pair_id = ? AND block_time >= ? AND block_time < ?
            ORDER BY block_time ASC, id ASC
            "#,
        )
        .bind(kind.as_str())
        .bind(pair_id)
        .bind(to_i64(start))
        .bind(to_i64(end))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ScannerError::database("Failed to query swaps by time range", Some(Box::new(e))))
    }

    async fn find_user_swaps_in_time_range(
        &self,
        kind: SwapTxType,
        pair_id: &str,
        user: &str,
        start: u64,
        end: u64,
    ) -> ScannerResult<Vec<SwapRecord>> {
        sqlx::query_as::<_, SwapRecord>(
            r#"
            SELECT * FROM swap_events
            WHERE kind = ? AND pair_id = ? AND user = ? AND block_time >= ? AND block_time < ?
            ORDER BY block_time ASC, id ASC
            "#,
        )
        .bind(kind.as_str())
        .bind(pair_id)
        .bind(user.to_lowercase())
        .bind(to_i64(start))
        .bind(to_i64(end))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ScannerError::database("Failed to query user swaps", Some(Box::new(e))))
    }
}
