//! Table sorting state and typed field comparators.
//!
//! # Responsibility
//! - Model the sort state of a record table as an explicit value with a pure
//!   click reducer, not ambient UI state.
//! - Dispatch field comparisons through closed enums instead of string keys.
//!
//! # Invariants
//! - Clicking the sorted field flips direction; any other field resets to
//!   ascending.
//! - Strings order lexicographically, numbers numerically, enum fields by
//!   their dataset label.

use crate::model::case_report::CaseReport;
use crate::model::test_score::TestScore;
use crate::store::Stored;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort direction of one table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// A sortable record field with a typed comparator.
pub trait SortField<R>: Copy {
    fn compare(self, a: &R, b: &R) -> Ordering;
}

/// Current sort state of one record table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig<F> {
    pub field: F,
    pub direction: Direction,
}

impl<F: PartialEq + Copy> SortConfig<F> {
    /// Initial state for a freshly selected field.
    pub fn new(field: F) -> Self {
        Self {
            field,
            direction: Direction::Ascending,
        }
    }

    /// Reducer for a column header click: the sorted field flips direction,
    /// any other field resets to ascending.
    #[must_use]
    pub fn toggle(self, field: F) -> Self {
        if self.field == field {
            Self {
                field,
                direction: self.direction.flipped(),
            }
        } else {
            Self::new(field)
        }
    }
}

impl<F> SortConfig<F> {
    /// Comparator under this state's field and direction.
    pub fn compare<R>(&self, a: &R, b: &R) -> Ordering
    where
        F: SortField<R>,
    {
        let ordering = self.field.compare(a, b);
        match self.direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }
}

/// Sorts plain records under `config`.
pub fn sort_records<R, F: SortField<R>>(records: &mut [R], config: SortConfig<F>) {
    records.sort_by(|a, b| config.compare(a, b));
}

/// Sorts stored records by their payload fields under `config`.
pub fn sort_stored<R, F: SortField<R>>(records: &mut [Stored<R>], config: SortConfig<F>) {
    records.sort_by(|a, b| config.compare(&a.record, &b.record));
}

/// Sortable columns of the case report table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseReportField {
    Location,
    Cases,
    Deaths,
    Date,
    Region,
    Year,
}

impl CaseReportField {
    /// All sortable columns, in table order.
    pub const ALL: [Self; 6] = [
        Self::Location,
        Self::Cases,
        Self::Deaths,
        Self::Date,
        Self::Region,
        Self::Year,
    ];

    /// Stable key used on CLI and config surfaces.
    pub fn key(self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Cases => "cases",
            Self::Deaths => "deaths",
            Self::Date => "date",
            Self::Region => "region",
            Self::Year => "year",
        }
    }

    /// Parses a column key back into the field.
    pub fn parse_key(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == value)
    }
}

impl SortField<CaseReport> for CaseReportField {
    fn compare(self, a: &CaseReport, b: &CaseReport) -> Ordering {
        match self {
            Self::Location => a.location.cmp(&b.location),
            Self::Cases => a.cases.cmp(&b.cases),
            Self::Deaths => a.deaths.cmp(&b.deaths),
            Self::Date => a.date.cmp(&b.date),
            Self::Region => a.region.cmp(&b.region),
            Self::Year => a.year.cmp(&b.year),
        }
    }
}

/// Sortable columns of the test score table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestScoreField {
    Respondent,
    Age,
    Sex,
    EthnicGroup,
    AcademicPerformance,
    AcademicDescription,
    Iq,
    SchoolType,
    SocioEconomicStatus,
    StudyHabit,
    NatResult,
}

impl TestScoreField {
    /// All sortable columns, in table order.
    pub const ALL: [Self; 11] = [
        Self::Respondent,
        Self::Age,
        Self::Sex,
        Self::EthnicGroup,
        Self::AcademicPerformance,
        Self::AcademicDescription,
        Self::Iq,
        Self::SchoolType,
        Self::SocioEconomicStatus,
        Self::StudyHabit,
        Self::NatResult,
    ];

    /// Stable key used on CLI and config surfaces.
    pub fn key(self) -> &'static str {
        match self {
            Self::Respondent => "respondent",
            Self::Age => "age",
            Self::Sex => "sex",
            Self::EthnicGroup => "ethnic_group",
            Self::AcademicPerformance => "academic_performance",
            Self::AcademicDescription => "academic_description",
            Self::Iq => "iq",
            Self::SchoolType => "school_type",
            Self::SocioEconomicStatus => "socioeconomic_status",
            Self::StudyHabit => "study_habit",
            Self::NatResult => "nat_result",
        }
    }

    /// Parses a column key back into the field.
    pub fn parse_key(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == value)
    }
}

impl SortField<TestScore> for TestScoreField {
    fn compare(self, a: &TestScore, b: &TestScore) -> Ordering {
        match self {
            Self::Respondent => a.respondent.cmp(&b.respondent),
            Self::Age => a.age.cmp(&b.age),
            Self::Sex => a.sex.cmp(&b.sex),
            Self::EthnicGroup => a.ethnic_group.cmp(&b.ethnic_group),
            Self::AcademicPerformance => compare_f64(a.academic_performance, b.academic_performance),
            Self::AcademicDescription => a
                .academic_description
                .label()
                .cmp(b.academic_description.label()),
            Self::Iq => a.iq.cmp(&b.iq),
            Self::SchoolType => a.school_type.cmp(&b.school_type),
            Self::SocioEconomicStatus => a
                .socioeconomic_status
                .label()
                .cmp(b.socioeconomic_status.label()),
            Self::StudyHabit => a.study_habit.cmp(&b.study_habit),
            Self::NatResult => compare_f64(a.nat_result, b.nat_result),
        }
    }
}

fn compare_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::{
        sort_records, sort_stored, CaseReportField, Direction, SortConfig, TestScoreField,
    };
    use crate::model::case_report::CaseReport;
    use crate::store::Stored;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn report(location: &str, cases: u32) -> CaseReport {
        CaseReport::new(
            location.to_string(),
            "Bicol".to_string(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            cases,
            0,
        )
    }

    #[test]
    fn clicking_the_sorted_field_flips_direction() {
        let config = SortConfig::new(CaseReportField::Cases);
        assert_eq!(config.direction, Direction::Ascending);

        let config = config.toggle(CaseReportField::Cases);
        assert_eq!(config.direction, Direction::Descending);

        let config = config.toggle(CaseReportField::Cases);
        assert_eq!(config.direction, Direction::Ascending);
    }

    #[test]
    fn clicking_another_field_resets_to_ascending() {
        let config = SortConfig::new(CaseReportField::Cases)
            .toggle(CaseReportField::Cases)
            .toggle(CaseReportField::Date);
        assert_eq!(config.field, CaseReportField::Date);
        assert_eq!(config.direction, Direction::Ascending);
    }

    #[test]
    fn sorts_strings_lexicographically_and_numbers_numerically() {
        let mut records = vec![report("Naga", 30), report("Legazpi", 7), report("Iriga", 100)];

        sort_records(&mut records, SortConfig::new(CaseReportField::Location));
        assert_eq!(records[0].location, "Iriga");
        assert_eq!(records[2].location, "Naga");

        sort_records(&mut records, SortConfig::new(CaseReportField::Cases));
        assert_eq!(records[0].cases, 7);
        assert_eq!(records[2].cases, 100);
    }

    #[test]
    fn descending_reverses_the_ascending_order() {
        let mut records = vec![report("A", 1), report("B", 2)];
        let config = SortConfig::new(CaseReportField::Cases).toggle(CaseReportField::Cases);

        sort_records(&mut records, config);
        assert_eq!(records[0].cases, 2);
    }

    #[test]
    fn stored_records_sort_by_payload_fields() {
        let mut records = vec![
            Stored { id: Uuid::new_v4(), record: report("X", 9) },
            Stored { id: Uuid::new_v4(), record: report("Y", 2) },
        ];

        sort_stored(&mut records, SortConfig::new(CaseReportField::Cases));
        assert_eq!(records[0].record.cases, 2);
    }

    #[test]
    fn column_keys_round_trip() {
        for field in CaseReportField::ALL {
            assert_eq!(CaseReportField::parse_key(field.key()), Some(field));
        }
        for field in TestScoreField::ALL {
            assert_eq!(TestScoreField::parse_key(field.key()), Some(field));
        }
        assert_eq!(CaseReportField::parse_key("loc"), None);
    }
}
