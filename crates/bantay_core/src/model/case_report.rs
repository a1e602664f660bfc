//! Dengue case report model.
//!
//! # Responsibility
//! - Define the per-location case/death report operators enter and upload.
//! - Keep the reporting period explicit for calendar grouping.
//!
//! # Invariants
//! - `cases` and `deaths` are non-negative by construction.
//! - Calendar grouping derives from `date`; `year` is carried verbatim from
//!   the source file and is not required to agree with `date`.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One reported dengue observation for a location within a region.
///
/// `deaths > cases` is representable on purpose: source files contain
/// corrections and late reports, and rejecting them would make historical
/// uploads fail. Consistency is left to upstream data quality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseReport {
    /// Reporting location, usually a city or municipality.
    pub location: String,
    /// Confirmed case count for the period.
    pub cases: u32,
    /// Death count for the period.
    pub deaths: u32,
    /// Reporting period date.
    pub date: NaiveDate,
    /// Administrative region used by the choropleth rollup.
    pub region: String,
    /// Source-file year column, stored verbatim.
    pub year: i32,
}

impl CaseReport {
    /// Creates a report whose `year` defaults to the calendar year of `date`.
    ///
    /// Upload paths that carry an explicit year column set the field directly.
    pub fn new(
        location: impl Into<String>,
        region: impl Into<String>,
        date: NaiveDate,
        cases: u32,
        deaths: u32,
    ) -> Self {
        Self {
            location: location.into(),
            cases,
            deaths,
            date,
            region: region.into(),
            year: date.year(),
        }
    }
}

/// Partial update for one stored case report. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseReportPatch {
    pub location: Option<String>,
    pub cases: Option<u32>,
    pub deaths: Option<u32>,
    pub date: Option<NaiveDate>,
    pub region: Option<String>,
    pub year: Option<i32>,
}

impl CaseReportPatch {
    /// Returns whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.location.is_none()
            && self.cases.is_none()
            && self.deaths.is_none()
            && self.date.is_none()
            && self.region.is_none()
            && self.year.is_none()
    }
}
