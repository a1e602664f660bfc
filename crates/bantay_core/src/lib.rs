//! Core domain logic for Bantay.
//! This crate is the single source of truth for business invariants.

pub mod aggregate;
pub mod db;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;
pub mod view;

pub use aggregate::breakdown::{
    academic_breakdown, categorical_breakdown, socioeconomic_breakdown, LabelShare,
};
pub use aggregate::color::{scale_color, LegendEntry, LEGEND};
pub use aggregate::geo::{choropleth, rollup_by_region, RegionShading, RegionTotals};
pub use aggregate::histogram::{nat_result_histogram, BIN_COUNT, BIN_LABELS};
pub use aggregate::series::{
    bubble_series, scatter_series, time_series, BubbleSeries, ScatterSeries, TimeBucket, TimeUnit,
};
pub use ingest::batch::{
    BatchIngestor, CancelToken, IngestError, IngestProgress, IngestReport, RowError, RowFailure,
};
pub use ingest::tabular::{parse_delimited, ParseError, RawRow, TabularOptions};
pub use ingest::validate::{RowSchema, ValidationError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::boundary::{parse_boundaries, Boundary, BoundaryError};
pub use model::case_report::{CaseReport, CaseReportPatch};
pub use model::test_score::{
    AcademicDescription, SocioEconomicStatus, TestScore, TestScorePatch,
};
pub use service::record_service::{EntryError, RecordService};
pub use store::sqlite::{SqliteCaseReportStore, SqliteTestScoreStore};
pub use store::{RecordId, RecordStore, StoreError, StoreResult, Stored};
pub use view::sort::{
    sort_records, sort_stored, CaseReportField, Direction, SortConfig, TestScoreField,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
