//! Single-record use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for manual add, edit, and delete flows.
//! - Delegate persistence to the record store implementation.
//!
//! # Invariants
//! - Single-record operations surface store errors unchanged.
//! - Manual entries pass the same field validation as uploaded rows.

use crate::ingest::tabular::RawRow;
use crate::ingest::validate::{RowSchema, ValidationError};
use crate::store::{RecordId, RecordStore, StoreError, StoreResult, Stored};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from one manually entered record.
#[derive(Debug)]
pub enum EntryError {
    /// The entered fields failed schema validation.
    Validation(ValidationError),
    /// The store rejected the write.
    Store(StoreError),
}

impl Display for EntryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EntryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ValidationError> for EntryError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for EntryError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Use-case service for single-record operations on one collection.
pub struct RecordService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> RecordService<S> {
    /// Creates a service over the provided store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates one record, returning its stable ID.
    pub fn create(&self, record: &S::Record) -> StoreResult<RecordId> {
        self.store.create(record)
    }

    /// Lists the whole collection in persisted order.
    pub fn list_all(&self) -> StoreResult<Vec<Stored<S::Record>>> {
        self.store.list_all()
    }

    /// Applies a partial update to one record by ID.
    ///
    /// Returns store-level not-found errors unchanged.
    pub fn update(&self, id: RecordId, patch: &S::Patch) -> StoreResult<()> {
        self.store.update(id, patch)
    }

    /// Deletes one record by ID.
    pub fn delete(&self, id: RecordId) -> StoreResult<()> {
        self.store.delete(id)
    }
}

impl<S> RecordService<S>
where
    S: RecordStore,
    S::Record: RowSchema,
{
    /// Validates one manually entered field set and persists it.
    ///
    /// The entry validates exactly like an uploaded row and reports
    /// validation failures as row 0.
    pub fn submit_entry(&self, fields: HashMap<String, String>) -> Result<RecordId, EntryError> {
        let row = RawRow { index: 0, fields };
        let record = S::Record::from_row(&row)?;
        Ok(self.store.create(&record)?)
    }
}
