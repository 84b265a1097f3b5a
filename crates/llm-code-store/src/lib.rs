//! Append-only record store for completed exchanges.
//!
//! Every completed request/response exchange is persisted as one immutable
//! [`Record`] in a local SQLite database. Records are written once, never
//! updated or pruned, and can be read back in insertion order for
//! inspection tooling.

mod error;
mod record;
mod store;

pub use error::StoreError;
pub use record::{NewRecord, Record, RecordFilter};
pub use store::RecordStore;
