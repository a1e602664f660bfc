//! Record store contract and persistence implementations.
//!
//! # Responsibility
//! - Define the collection-oriented CRUD contract ingestion and services
//!   write through.
//! - Isolate SQLite query details from pipeline orchestration.
//!
//! # Invariants
//! - Identity is store-assigned at create time and never reused.
//! - `list_all` ordering is deterministic: `created_at ASC, uuid ASC`.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod sqlite;

/// Stable identifier assigned by the store when a record is created.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type RecordId = Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from record store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Target record does not exist.
    NotFound(RecordId),
    /// Persisted data cannot be converted to a valid record.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from an expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "record store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "record store requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "record store requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One persisted record together with its store-assigned identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<R> {
    /// Store-assigned stable identity.
    pub id: RecordId,
    /// The record payload as it was persisted.
    pub record: R,
}

/// Collection-oriented CRUD contract for one record schema.
///
/// Ingestion writes every row through `create`; single-record entry uses the
/// same path, so batch and manual writes cannot diverge.
pub trait RecordStore {
    /// Persisted record shape for this collection.
    type Record;
    /// Partial-update shape; `None` fields are left unchanged.
    type Patch;

    /// Stable collection name used for ingest guard keys and log events.
    fn collection(&self) -> &'static str;

    /// Persists one record and returns its store-assigned identity.
    fn create(&self, record: &Self::Record) -> StoreResult<RecordId>;

    /// Lists the full collection in `created_at ASC, uuid ASC` order.
    fn list_all(&self) -> StoreResult<Vec<Stored<Self::Record>>>;

    /// Applies a partial update to an existing record.
    fn update(&self, id: RecordId, patch: &Self::Patch) -> StoreResult<()>;

    /// Removes one record permanently.
    fn delete(&self, id: RecordId) -> StoreResult<()>;
}
