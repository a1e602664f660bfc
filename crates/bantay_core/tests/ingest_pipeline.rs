use bantay_core::db::open_db_in_memory;
use bantay_core::{
    rollup_by_region, BatchIngestor, CancelToken, IngestError, IngestProgress, ParseError,
    RecordId, RecordStore, RegionTotals, RowError, SqliteCaseReportStore, StoreError, StoreResult,
    Stored, TabularOptions, ValidationError,
};
use std::cell::Cell;
use std::sync::{Mutex, PoisonError};

// The ingest guard is process-global, so ingesting tests serialize on this
// lock instead of tripping each other's single-flight check.
static INGEST_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn end_to_end_mixed_batch_reports_and_rolls_up() {
    let _guard = INGEST_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let conn = open_db_in_memory().unwrap();
    let ingestor = BatchIngestor::new(SqliteCaseReportStore::try_new(&conn).unwrap());

    let csv = "loc,cases,deaths,date,Region,year\n\
               A,10,1,2024-01-01,R1,2024\n\
               B,bad,0,2024-01-02,R1,2024";

    let mut snapshots: Vec<IngestProgress> = Vec::new();
    let report = ingestor
        .ingest(csv, &TabularOptions::default(), &CancelToken::new(), |p| {
            snapshots.push(p)
        })
        .unwrap();

    assert_eq!(report.persisted, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.cancelled_at, None);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].row, 1);
    assert!(matches!(
        report.failures[0].error,
        RowError::Validation(ValidationError::InvalidInteger { column: "cases", .. })
    ));

    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].completed, 1);
    assert_eq!(snapshots[0].total, 2);
    assert_eq!(snapshots[0].percent, 50);

    let store = SqliteCaseReportStore::try_new(&conn).unwrap();
    let records: Vec<_> = store
        .list_all()
        .unwrap()
        .into_iter()
        .map(|item| item.record)
        .collect();
    let totals = rollup_by_region(&records);
    assert_eq!(totals["r1"], RegionTotals { cases: 10, deaths: 1 });
}

#[test]
fn failed_rows_equal_invalid_rows_when_store_is_healthy() {
    let _guard = INGEST_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let conn = open_db_in_memory().unwrap();
    let ingestor = BatchIngestor::new(SqliteCaseReportStore::try_new(&conn).unwrap());

    let csv = "loc,cases,deaths,date,Region,year\n\
               A,1,0,2024-01-01,R1,2024\n\
               B,2,0,not-a-date,R1,2024\n\
               C,3,0,2024-01-03,R1,2024\n\
               D,4,,2024-01-04,R1,2024\n\
               E,5,0,2024-01-05,R2,2024";

    let mut snapshots: Vec<IngestProgress> = Vec::new();
    let report = ingestor
        .ingest(csv, &TabularOptions::default(), &CancelToken::new(), |p| {
            snapshots.push(p)
        })
        .unwrap();

    assert_eq!(report.persisted, 3);
    assert_eq!(report.failed, 2);
    assert_eq!(report.rows_processed(), 5);
    let failed_rows: Vec<usize> = report.failures.iter().map(|failure| failure.row).collect();
    assert_eq!(failed_rows, vec![1, 3]);

    let percents: Vec<u8> = snapshots.iter().map(|p| p.percent).collect();
    assert_eq!(percents, vec![20, 40, 60]);
}

#[test]
fn injected_store_failures_are_isolated_per_row() {
    let _guard = INGEST_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let conn = open_db_in_memory().unwrap();
    let flaky = FailOnNth {
        inner: SqliteCaseReportStore::try_new(&conn).unwrap(),
        fail_call: 1,
        calls: Cell::new(0),
    };
    let ingestor = BatchIngestor::new(flaky);

    let csv = "loc,cases,deaths,date,Region,year\n\
               A,1,0,2024-01-01,R1,2024\n\
               B,2,0,2024-01-02,R1,2024\n\
               C,3,0,2024-01-03,R1,2024";

    let mut snapshots: Vec<IngestProgress> = Vec::new();
    let report = ingestor
        .ingest(csv, &TabularOptions::default(), &CancelToken::new(), |p| {
            snapshots.push(p)
        })
        .unwrap();

    assert_eq!(report.persisted, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.failures[0].row, 1);
    assert!(matches!(
        report.failures[0].error,
        RowError::Store(StoreError::InvalidData(_))
    ));

    // One row failed, so progress never reaches 100.
    let percents: Vec<u8> = snapshots.iter().map(|p| p.percent).collect();
    assert_eq!(percents, vec![33, 67]);

    let store = SqliteCaseReportStore::try_new(&conn).unwrap();
    assert_eq!(store.list_all().unwrap().len(), 2);
}

#[test]
fn parse_error_aborts_before_any_write() {
    let _guard = INGEST_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let conn = open_db_in_memory().unwrap();
    let ingestor = BatchIngestor::new(SqliteCaseReportStore::try_new(&conn).unwrap());

    let csv = "loc,cases,deaths,date,Region,year\n\
               A,1,0,2024-01-01,R1,2024\n\
               B,2,0\n\
               C,3,0,2024-01-03,R1,2024";

    let err = ingestor
        .ingest(csv, &TabularOptions::default(), &CancelToken::new(), |_| {})
        .unwrap_err();
    assert!(matches!(
        err,
        IngestError::Parse(ParseError::MalformedStream { line: 3, .. })
    ));

    let store = SqliteCaseReportStore::try_new(&conn).unwrap();
    assert!(store.list_all().unwrap().is_empty());
}

#[test]
fn cancellation_stops_before_the_next_row_write() {
    let _guard = INGEST_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let conn = open_db_in_memory().unwrap();
    let ingestor = BatchIngestor::new(SqliteCaseReportStore::try_new(&conn).unwrap());

    let csv = "loc,cases,deaths,date,Region,year\n\
               A,1,0,2024-01-01,R1,2024\n\
               B,2,0,2024-01-02,R1,2024\n\
               C,3,0,2024-01-03,R1,2024";

    let token = CancelToken::new();
    let report = ingestor
        .ingest(csv, &TabularOptions::default(), &token, |p| {
            if p.completed == 1 {
                token.cancel();
            }
        })
        .unwrap();

    assert_eq!(report.persisted, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(report.cancelled_at, Some(1));

    let store = SqliteCaseReportStore::try_new(&conn).unwrap();
    assert_eq!(store.list_all().unwrap().len(), 1);
}

#[test]
fn pre_cancelled_run_writes_nothing() {
    let _guard = INGEST_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let conn = open_db_in_memory().unwrap();
    let ingestor = BatchIngestor::new(SqliteCaseReportStore::try_new(&conn).unwrap());

    let csv = "loc,cases,deaths,date,Region,year\n\
               A,1,0,2024-01-01,R1,2024";

    let token = CancelToken::new();
    token.cancel();
    let report = ingestor
        .ingest(csv, &TabularOptions::default(), &token, |_| {})
        .unwrap();

    assert_eq!(report.persisted, 0);
    assert_eq!(report.cancelled_at, Some(0));

    let store = SqliteCaseReportStore::try_new(&conn).unwrap();
    assert!(store.list_all().unwrap().is_empty());
}

#[test]
fn reingesting_the_same_csv_appends_duplicates() {
    let _guard = INGEST_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let conn = open_db_in_memory().unwrap();
    let ingestor = BatchIngestor::new(SqliteCaseReportStore::try_new(&conn).unwrap());

    let csv = "loc,cases,deaths,date,Region,year\n\
               \n\
               A,1,0,2024-01-01,R1,2024\n\
               \n\
               B,2,0,2024-01-02,R1,2024";

    for _ in 0..2 {
        let report = ingestor
            .ingest(csv, &TabularOptions::default(), &CancelToken::new(), |_| {})
            .unwrap();
        assert_eq!(report.persisted, 2);
    }

    let store = SqliteCaseReportStore::try_new(&conn).unwrap();
    assert_eq!(store.list_all().unwrap().len(), 4);
}

struct FailOnNth<S> {
    inner: S,
    fail_call: usize,
    calls: Cell<usize>,
}

impl<S: RecordStore> RecordStore for FailOnNth<S> {
    type Record = S::Record;
    type Patch = S::Patch;

    fn collection(&self) -> &'static str {
        self.inner.collection()
    }

    fn create(&self, record: &Self::Record) -> StoreResult<RecordId> {
        let call = self.calls.get();
        self.calls.set(call + 1);
        if call == self.fail_call {
            return Err(StoreError::InvalidData("injected write failure".to_string()));
        }
        self.inner.create(record)
    }

    fn list_all(&self) -> StoreResult<Vec<Stored<Self::Record>>> {
        self.inner.list_all()
    }

    fn update(&self, id: RecordId, patch: &Self::Patch) -> StoreResult<()> {
        self.inner.update(id, patch)
    }

    fn delete(&self, id: RecordId) -> StoreResult<()> {
        self.inner.delete(id)
    }
}
