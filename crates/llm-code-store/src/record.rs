//! Persisted exchange record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One persisted request/response exchange.
///
/// Write-once: records are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Record {
    /// Rowid; insertion order.
    pub id: i64,
    /// When the record was written (UTC).
    pub created_at: DateTime<Utc>,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: i64,
    pub system_message: String,
    pub user_message: String,
    pub assistant_message: String,
    pub input_tokens: i64,
    pub output_tokens: i64,
}

/// Fields of a record to append; id and timestamp are generated on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: i64,
    pub system_message: String,
    pub user_message: String,
    pub assistant_message: String,
    pub input_tokens: i64,
    pub output_tokens: i64,
}

/// Query filter; an empty filter returns every record in insertion order.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    /// Only records produced by this model.
    pub model: Option<String>,
    /// Cap on the number of records returned.
    pub limit: Option<u32>,
}

impl RecordFilter {
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: Some(model.into()),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}
