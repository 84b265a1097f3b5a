//! SQLite-backed record store.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::QueryBuilder;
use tracing::{info, instrument};

use crate::{NewRecord, Record, RecordFilter, StoreError};

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at TEXT NOT NULL,
    model TEXT NOT NULL,
    temperature REAL NOT NULL,
    max_tokens INTEGER NOT NULL,
    system_message TEXT NOT NULL,
    user_message TEXT NOT NULL,
    assistant_message TEXT NOT NULL,
    input_tokens INTEGER NOT NULL,
    output_tokens INTEGER NOT NULL
)";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the on-disk exchange log.
///
/// Opening is idempotent: the schema is created if missing and existing
/// records are never touched. WAL journaling plus a busy timeout keep
/// parallel invocations on the same machine safe.
pub struct RecordStore {
    pool: SqlitePool,
}

impl RecordStore {
    /// Open (or create) the store at `path`, creating parent directories.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(BUSY_TIMEOUT);

        Self::connect(options).await
    }

    /// In-memory store for tests.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.busy_timeout(BUSY_TIMEOUT);
        Self::connect(options).await
    }

    async fn connect(options: SqliteConnectOptions) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        sqlx::query(SCHEMA).execute(&pool).await?;
        info!("record store ready");
        Ok(Self { pool })
    }

    /// Insert one immutable record, stamping the current UTC time.
    ///
    /// Returns the new record's id. A failed write is surfaced to the
    /// caller; nothing is retried or dropped silently.
    pub async fn append(&self, record: NewRecord) -> Result<i64, StoreError> {
        let result = sqlx::query(
            "INSERT INTO records (
                created_at, model, temperature, max_tokens,
                system_message, user_message, assistant_message,
                input_tokens, output_tokens
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(Utc::now())
        .bind(&record.model)
        .bind(record.temperature)
        .bind(record.max_tokens)
        .bind(&record.system_message)
        .bind(&record.user_message)
        .bind(&record.assistant_message)
        .bind(record.input_tokens)
        .bind(record.output_tokens)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Read records matching `filter`, in insertion order.
    ///
    /// Each call re-reads from the store, so a fresh query observes records
    /// appended since the last one.
    pub async fn query(&self, filter: &RecordFilter) -> Result<Vec<Record>, StoreError> {
        let mut builder = QueryBuilder::new(
            "SELECT id, created_at, model, temperature, max_tokens, \
             system_message, user_message, assistant_message, \
             input_tokens, output_tokens FROM records",
        );
        if let Some(model) = &filter.model {
            builder.push(" WHERE model = ").push_bind(model);
        }
        builder.push(" ORDER BY id ASC");
        if let Some(limit) = filter.limit {
            builder.push(" LIMIT ").push_bind(i64::from(limit));
        }

        let records = builder
            .build_query_as::<Record>()
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    /// Close the underlying pool gracefully.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(model: &str, n: i64) -> NewRecord {
        NewRecord {
            model: model.to_string(),
            temperature: 0.8,
            max_tokens: 1000,
            system_message: "You write code.".to_string(),
            user_message: format!("request {n}"),
            assistant_message: format!("```python\nprint({n})\n```"),
            input_tokens: 10 + n,
            output_tokens: 20 + n,
        }
    }

    #[tokio::test]
    async fn test_append_then_query_preserves_fields_and_order() {
        let store = RecordStore::in_memory().await.unwrap();
        for n in 0..5 {
            store.append(sample("gpt-3.5-turbo", n)).await.unwrap();
        }

        let records = store.query(&RecordFilter::default()).await.unwrap();
        assert_eq!(records.len(), 5);
        for (n, record) in records.iter().enumerate() {
            let n = n as i64;
            assert_eq!(record.user_message, format!("request {n}"));
            assert_eq!(record.input_tokens, 10 + n);
            assert_eq!(record.output_tokens, 20 + n);
            assert_eq!(record.temperature, 0.8);
            assert_eq!(record.max_tokens, 1000);
        }
        // Insertion order matches id order.
        assert!(records.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn test_open_is_idempotent_and_durable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("db.sqlite");

        let store = RecordStore::open(&path).await.unwrap();
        store.append(sample("gpt-3.5-turbo", 1)).await.unwrap();
        store.close().await;

        // Reopening must not destroy prior records.
        let store = RecordStore::open(&path).await.unwrap();
        let records = store.query(&RecordFilter::default()).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_message, "request 1");
        store.close().await;
    }

    #[tokio::test]
    async fn test_filter_by_model_and_limit() {
        let store = RecordStore::in_memory().await.unwrap();
        store.append(sample("gpt-3.5-turbo", 1)).await.unwrap();
        store.append(sample("gpt-4", 2)).await.unwrap();
        store.append(sample("gpt-4", 3)).await.unwrap();

        let records = store.query(&RecordFilter::for_model("gpt-4")).await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.model == "gpt-4"));

        let limited = store
            .query(&RecordFilter::default().with_limit(1))
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].user_message, "request 1");
    }

    #[tokio::test]
    async fn test_fresh_query_observes_new_records() {
        let store = RecordStore::in_memory().await.unwrap();
        assert!(store.query(&RecordFilter::default()).await.unwrap().is_empty());

        store.append(sample("gpt-3.5-turbo", 1)).await.unwrap();
        assert_eq!(store.query(&RecordFilter::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_timestamps_are_recent_utc() {
        let store = RecordStore::in_memory().await.unwrap();
        store.append(sample("gpt-3.5-turbo", 1)).await.unwrap();

        let records = store.query(&RecordFilter::default()).await.unwrap();
        let age = Utc::now() - records[0].created_at;
        assert!(age > chrono::Duration::seconds(-1));
        assert!(age < chrono::Duration::seconds(60));
    }
}
