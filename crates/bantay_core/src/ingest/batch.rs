//! Batch ingestion driver.
//!
//! # Responsibility
//! - Run one upload end to end: parse, validate and persist row by row.
//! - Keep per-row failures isolated while reporting exact accounting.
//! - Enforce the one-upload-per-collection rule.
//!
//! # Invariants
//! - Rows are written in strict input order, one at a time.
//! - `persisted + failed` equals the number of rows processed.
//! - Cancellation is checked before each row write; already-persisted rows
//!   are never rolled back.
//! - Re-running the same input duplicates records: there is no dedup key.

use crate::ingest::tabular::{parse_delimited, ParseError, RawRow, TabularOptions};
use crate::ingest::validate::{RowSchema, ValidationError};
use crate::store::{RecordStore, StoreError};
use log::{info, warn};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

static ACTIVE_COLLECTIONS: Lazy<Mutex<HashSet<&'static str>>> =
    Lazy::new(|| Mutex::new(HashSet::new()));

/// Cooperative cancellation flag shared between an upload and its caller.
///
/// Cancelling stops the run before the next row write; it never unwinds
/// rows that were already persisted.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a stop before the next row write.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Progress snapshot delivered after each successful row write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestProgress {
    /// Rows successfully persisted so far.
    pub completed: usize,
    /// Total data rows in the upload.
    pub total: usize,
    /// `round(completed / total * 100)`, monotonically non-decreasing
    /// within one run.
    pub percent: u8,
}

impl IngestProgress {
    pub fn new(completed: usize, total: usize) -> Self {
        let percent = if total == 0 {
            100
        } else {
            ((completed as f64 / total as f64) * 100.0).round() as u8
        };
        Self {
            completed,
            total,
            percent,
        }
    }
}

/// Why one row was not persisted.
#[derive(Debug)]
pub enum RowError {
    Validation(ValidationError),
    Store(StoreError),
}

impl Display for RowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RowError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

/// One skipped row together with the reason it was skipped.
#[derive(Debug)]
pub struct RowFailure {
    /// 0-based data row index within the upload.
    pub row: usize,
    pub error: RowError,
}

/// Accounting for one finished or cancelled upload.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Rows written to the store.
    pub persisted: usize,
    /// Rows skipped by validation or store failure.
    pub failed: usize,
    /// Per-row failure details, in input order.
    pub failures: Vec<RowFailure>,
    /// Index of the first unprocessed row when the run was cancelled.
    pub cancelled_at: Option<usize>,
}

impl IngestReport {
    /// Returns how many rows were processed before the run ended.
    pub fn rows_processed(&self) -> usize {
        self.persisted + self.failed
    }
}

/// Errors that end a run before row processing.
#[derive(Debug)]
pub enum IngestError {
    /// Structural parse failure; nothing was written.
    Parse(ParseError),
    /// Another upload into the same collection is still running.
    CollectionBusy(&'static str),
}

impl Display for IngestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::CollectionBusy(collection) => {
                write!(f, "an upload into `{collection}` is already running")
            }
        }
    }
}

impl Error for IngestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::CollectionBusy(_) => None,
        }
    }
}

impl From<ParseError> for IngestError {
    fn from(value: ParseError) -> Self {
        Self::Parse(value)
    }
}

/// Exclusive permit for uploading into one collection.
///
/// Held for the whole run and released on drop, including error paths.
struct IngestPermit {
    collection: &'static str,
}

impl IngestPermit {
    fn acquire(collection: &'static str) -> Result<Self, IngestError> {
        let mut active = ACTIVE_COLLECTIONS
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !active.insert(collection) {
            return Err(IngestError::CollectionBusy(collection));
        }
        Ok(Self { collection })
    }
}

impl Drop for IngestPermit {
    fn drop(&mut self) {
        let mut active = ACTIVE_COLLECTIONS
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        active.remove(self.collection);
    }
}

/// Drives validated uploads into one record store.
pub struct BatchIngestor<S> {
    store: S,
}

impl<S> BatchIngestor<S>
where
    S: RecordStore,
    S::Record: RowSchema,
{
    /// Creates an ingestor writing through the provided store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Runs one upload end to end.
    ///
    /// `on_progress` observes a snapshot after every successful row write.
    /// Per-row failures are collected into the report; only a structural
    /// parse failure or a busy collection aborts the run.
    pub fn ingest(
        &self,
        text: &str,
        options: &TabularOptions,
        cancel: &CancelToken,
        mut on_progress: impl FnMut(IngestProgress),
    ) -> Result<IngestReport, IngestError> {
        let collection = self.store.collection();
        let _permit = IngestPermit::acquire(collection)?;

        let started_at = Instant::now();
        info!("event=ingest_run module=ingest status=start collection={collection}");

        let rows = match parse_delimited(text, options) {
            Ok(rows) => rows,
            Err(err) => {
                warn!(
                    "event=ingest_run module=ingest status=error collection={collection} error_code=parse_failed error={err}"
                );
                return Err(err.into());
            }
        };
        let total = rows.len();

        let mut report = IngestReport::default();
        for row in &rows {
            if cancel.is_cancelled() {
                report.cancelled_at = Some(row.index);
                break;
            }
            self.process_row(row, total, &mut report, &mut on_progress);
        }

        let status = if report.cancelled_at.is_some() {
            "cancelled"
        } else {
            "ok"
        };
        info!(
            "event=ingest_run module=ingest status={status} collection={collection} total={total} persisted={} failed={} duration_ms={}",
            report.persisted,
            report.failed,
            started_at.elapsed().as_millis()
        );

        Ok(report)
    }

    fn process_row(
        &self,
        row: &RawRow,
        total: usize,
        report: &mut IngestReport,
        on_progress: &mut impl FnMut(IngestProgress),
    ) {
        let collection = self.store.collection();

        let record = match S::Record::from_row(row) {
            Ok(record) => record,
            Err(err) => {
                warn!(
                    "event=ingest_row module=ingest status=error collection={collection} row={} error_code=validation_failed error={err}",
                    row.index
                );
                report.failed += 1;
                report.failures.push(RowFailure {
                    row: row.index,
                    error: RowError::Validation(err),
                });
                return;
            }
        };

        match self.store.create(&record) {
            Ok(_) => {
                report.persisted += 1;
                on_progress(IngestProgress::new(report.persisted, total));
            }
            Err(err) => {
                warn!(
                    "event=ingest_row module=ingest status=error collection={collection} row={} error_code=store_failed error={err}",
                    row.index
                );
                report.failed += 1;
                report.failures.push(RowFailure {
                    row: row.index,
                    error: RowError::Store(err),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CancelToken, IngestError, IngestPermit, IngestProgress};

    #[test]
    fn progress_percent_rounds_to_nearest_integer() {
        assert_eq!(IngestProgress::new(1, 3).percent, 33);
        assert_eq!(IngestProgress::new(2, 3).percent, 67);
        assert_eq!(IngestProgress::new(1, 2).percent, 50);
        assert_eq!(IngestProgress::new(3, 3).percent, 100);
    }

    #[test]
    fn cancel_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let observer = token.clone();
        assert!(!observer.is_cancelled());
        token.cancel();
        assert!(observer.is_cancelled());
    }

    #[test]
    fn permit_is_exclusive_per_collection_and_released_on_drop() {
        let first = IngestPermit::acquire("unit_permit_collection").unwrap();
        let busy = IngestPermit::acquire("unit_permit_collection");
        assert!(matches!(
            busy,
            Err(IngestError::CollectionBusy("unit_permit_collection"))
        ));

        let other = IngestPermit::acquire("unit_permit_other").unwrap();
        drop(other);

        drop(first);
        let reacquired = IngestPermit::acquire("unit_permit_collection");
        assert!(reacquired.is_ok());
    }
}
