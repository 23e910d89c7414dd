//! SQLite-backed request store.
//!
//! One table, one row per verification request. The descriptor and result
//! columns hold JSON text; the store treats both as opaque. The
//! pending -> terminal transition is a single conditional UPDATE, so
//! concurrent callbacks for the same id cannot both win.

use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

use super::{RequestStore, StoreError, StoreResult, TerminalOutcome};
use crate::request::{RequestId, VerificationRequest, VerificationStatus, VerificationType};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS verification_requests (
    id                TEXT PRIMARY KEY,
    descriptor        TEXT NOT NULL,
    target_email      TEXT NOT NULL,
    sender_email      TEXT NOT NULL,
    message           TEXT,
    verification_type TEXT NOT NULL,
    status            TEXT NOT NULL,
    result            TEXT,
    created_at        INTEGER NOT NULL,
    verified_at       INTEGER
);
CREATE INDEX IF NOT EXISTS idx_verification_requests_created_at
    ON verification_requests (created_at DESC);
CREATE INDEX IF NOT EXISTS idx_verification_requests_status
    ON verification_requests (status);
";

/// SQLite request store.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `path` and ensure the
    /// schema exists.
    pub async fn connect(path: &Path) -> StoreResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(backend)?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> StoreResult<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn decode_row(row: &sqlx::sqlite::SqliteRow) -> StoreResult<VerificationRequest> {
    let id: String = row.try_get("id").map_err(backend)?;
    let descriptor_json: String = row.try_get("descriptor").map_err(backend)?;
    let descriptor = serde_json::from_str(&descriptor_json)
        .map_err(|e| StoreError::Corrupt(format!("descriptor for {id}: {e}")))?;

    let type_name: String = row.try_get("verification_type").map_err(backend)?;
    let verification_type = VerificationType::parse(&type_name)
        .ok_or_else(|| StoreError::Corrupt(format!("verification_type for {id}: {type_name}")))?;

    let status_name: String = row.try_get("status").map_err(backend)?;
    let status = VerificationStatus::parse(&status_name)
        .ok_or_else(|| StoreError::Corrupt(format!("status for {id}: {status_name}")))?;

    let result_json: Option<String> = row.try_get("result").map_err(backend)?;
    let result = match result_json {
        Some(json) => Some(
            serde_json::from_str(&json)
                .map_err(|e| StoreError::Corrupt(format!("result for {id}: {e}")))?,
        ),
        None => None,
    };

    let created_at: i64 = row.try_get("created_at").map_err(backend)?;
    let verified_at: Option<i64> = row.try_get("verified_at").map_err(backend)?;

    Ok(VerificationRequest {
        id: RequestId::parse(&id).map_err(|e| StoreError::Corrupt(e.to_string()))?,
        descriptor,
        target_email: row.try_get("target_email").map_err(backend)?,
        sender_email: row.try_get("sender_email").map_err(backend)?,
        message: row.try_get("message").map_err(backend)?,
        verification_type,
        status,
        result,
        created_at: created_at as u64,
        verified_at: verified_at.map(|v| v as u64),
    })
}

#[async_trait]
impl RequestStore for SqliteStore {
    async fn put(&self, record: &VerificationRequest) -> StoreResult<()> {
        let descriptor_json = serde_json::to_string(&record.descriptor)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let query = sqlx::query(
            "INSERT INTO verification_requests \
             (id, descriptor, target_email, sender_email, message, \
              verification_type, status, result, created_at, verified_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, ?8, NULL)",
        )
        .bind(record.id.as_str())
        .bind(descriptor_json)
        .bind(&record.target_email)
        .bind(&record.sender_email)
        .bind(record.message.as_deref())
        .bind(record.verification_type.name())
        .bind(record.status.as_str())
        .bind(record.created_at as i64);

        match query.execute(&self.pool).await {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db))
                if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
            {
                Err(StoreError::DuplicateId(record.id.to_string()))
            }
            Err(e) => Err(backend(e)),
        }
    }

    async fn get(&self, id: &RequestId) -> StoreResult<Option<VerificationRequest>> {
        let row = sqlx::query("SELECT * FROM verification_requests WHERE id = ?1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;

        row.as_ref().map(decode_row).transpose()
    }

    async fn update_if_pending(
        &self,
        id: &RequestId,
        outcome: &TerminalOutcome,
    ) -> StoreResult<bool> {
        let updated = match outcome {
            TerminalOutcome::Completed {
                result,
                verified_at,
            } => {
                let result_json = serde_json::to_string(result)
                    .map_err(|e| StoreError::Corrupt(e.to_string()))?;
                sqlx::query(
                    "UPDATE verification_requests \
                     SET status = 'completed', result = ?1, verified_at = ?2 \
                     WHERE id = ?3 AND status = 'pending'",
                )
                .bind(result_json)
                .bind(*verified_at as i64)
                .bind(id.as_str())
                .execute(&self.pool)
                .await
                .map_err(backend)?
            }
            TerminalOutcome::Failed => sqlx::query(
                "UPDATE verification_requests \
                 SET status = 'failed' \
                 WHERE id = ?1 AND status = 'pending'",
            )
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(backend)?,
        };

        Ok(updated.rows_affected() == 1)
    }
}
