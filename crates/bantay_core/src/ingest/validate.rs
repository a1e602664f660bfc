//! Row validation against the two record schemas.
//!
//! # Responsibility
//! - Check field presence, coerce typed columns and match enum labels.
//! - Produce one `Result` per row so failures stay isolated.
//!
//! # Invariants
//! - Columns are checked in schema order; the first failure names the row
//!   and the offending column.
//! - A row either becomes a complete record or no record at all.

use crate::ingest::tabular::RawRow;
use crate::model::case_report::CaseReport;
use crate::model::test_score::{AcademicDescription, SocioEconomicStatus, TestScore};
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Accepted date layouts, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Per-row validation failure. Carries the 0-based row index and the first
/// offending column in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingField {
        row: usize,
        column: &'static str,
    },
    InvalidInteger {
        row: usize,
        column: &'static str,
        value: String,
    },
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },
    InvalidDate {
        row: usize,
        column: &'static str,
        value: String,
    },
    UnknownLabel {
        row: usize,
        column: &'static str,
        value: String,
    },
    OutOfRange {
        row: usize,
        column: &'static str,
        value: String,
    },
}

impl ValidationError {
    /// Returns the 0-based index of the failing row.
    pub fn row(&self) -> usize {
        match self {
            Self::MissingField { row, .. }
            | Self::InvalidInteger { row, .. }
            | Self::InvalidNumber { row, .. }
            | Self::InvalidDate { row, .. }
            | Self::UnknownLabel { row, .. }
            | Self::OutOfRange { row, .. } => *row,
        }
    }

    /// Returns the source column that failed first.
    pub fn column(&self) -> &'static str {
        match self {
            Self::MissingField { column, .. }
            | Self::InvalidInteger { column, .. }
            | Self::InvalidNumber { column, .. }
            | Self::InvalidDate { column, .. }
            | Self::UnknownLabel { column, .. }
            | Self::OutOfRange { column, .. } => column,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { row, column } => {
                write!(f, "row {row}: required field `{column}` is missing or empty")
            }
            Self::InvalidInteger { row, column, value } => {
                write!(f, "row {row}: field `{column}` has non-integer value `{value}`")
            }
            Self::InvalidNumber { row, column, value } => {
                write!(f, "row {row}: field `{column}` has non-numeric value `{value}`")
            }
            Self::InvalidDate { row, column, value } => {
                write!(f, "row {row}: field `{column}` has unrecognized date `{value}`")
            }
            Self::UnknownLabel { row, column, value } => {
                write!(f, "row {row}: field `{column}` has unknown label `{value}`")
            }
            Self::OutOfRange { row, column, value } => {
                write!(f, "row {row}: field `{column}` value `{value}` is out of range")
            }
        }
    }
}

impl Error for ValidationError {}

/// Schema contract mapping parsed rows onto one record type.
pub trait RowSchema: Sized {
    /// Required source columns, in validation order.
    const COLUMNS: &'static [&'static str];

    /// Builds one record from a parsed row, or reports the first failure.
    fn from_row(row: &RawRow) -> Result<Self, ValidationError>;
}

impl RowSchema for CaseReport {
    const COLUMNS: &'static [&'static str] = &["loc", "cases", "deaths", "date", "Region", "year"];

    fn from_row(row: &RawRow) -> Result<Self, ValidationError> {
        let location = require(row, "loc")?.to_string();
        let cases = parse_u32(row, "cases")?;
        let deaths = parse_u32(row, "deaths")?;
        let date = parse_date(row, "date")?;
        let region = require(row, "Region")?.to_string();
        let year = parse_i32(row, "year")?;

        Ok(Self {
            location,
            cases,
            deaths,
            date,
            region,
            year,
        })
    }
}

impl RowSchema for TestScore {
    const COLUMNS: &'static [&'static str] = &[
        "Respondents",
        "Age",
        "sex",
        "Ethnic",
        "academic_performance",
        "academic_description",
        "IQ",
        "type_school",
        "socio_economic_status",
        "Study_Habit",
        "NAT_Results",
    ];

    fn from_row(row: &RawRow) -> Result<Self, ValidationError> {
        let respondent = require(row, "Respondents")?.to_string();

        let age = parse_u32(row, "Age")?;
        if age == 0 {
            return Err(ValidationError::OutOfRange {
                row: row.index,
                column: "Age",
                value: age.to_string(),
            });
        }

        let sex = require(row, "sex")?.to_string();
        let ethnic_group = require(row, "Ethnic")?.to_string();
        let academic_performance = parse_f64(row, "academic_performance")?;

        let description_text = require(row, "academic_description")?;
        let academic_description = AcademicDescription::parse_label(description_text)
            .ok_or_else(|| ValidationError::UnknownLabel {
                row: row.index,
                column: "academic_description",
                value: description_text.to_string(),
            })?;

        let iq = require(row, "IQ")?.to_string();
        let school_type = require(row, "type_school")?.to_string();

        let status_text = require(row, "socio_economic_status")?;
        let socioeconomic_status = SocioEconomicStatus::parse_label(status_text).ok_or_else(
            || ValidationError::UnknownLabel {
                row: row.index,
                column: "socio_economic_status",
                value: status_text.to_string(),
            },
        )?;

        let study_habit = require(row, "Study_Habit")?.to_string();
        let nat_result = parse_f64(row, "NAT_Results")?;

        Ok(Self {
            respondent,
            age,
            sex,
            ethnic_group,
            academic_performance,
            academic_description,
            iq,
            school_type,
            socioeconomic_status,
            study_habit,
            nat_result,
        })
    }
}

fn require<'row>(row: &'row RawRow, column: &'static str) -> Result<&'row str, ValidationError> {
    let value = row.field(column).map_or("", str::trim);
    if value.is_empty() {
        return Err(ValidationError::MissingField {
            row: row.index,
            column,
        });
    }
    Ok(value)
}

fn parse_u32(row: &RawRow, column: &'static str) -> Result<u32, ValidationError> {
    let text = require(row, column)?;
    text.parse::<u32>()
        .map_err(|_| ValidationError::InvalidInteger {
            row: row.index,
            column,
            value: text.to_string(),
        })
}

fn parse_i32(row: &RawRow, column: &'static str) -> Result<i32, ValidationError> {
    let text = require(row, column)?;
    text.parse::<i32>()
        .map_err(|_| ValidationError::InvalidInteger {
            row: row.index,
            column,
            value: text.to_string(),
        })
}

fn parse_f64(row: &RawRow, column: &'static str) -> Result<f64, ValidationError> {
    let text = require(row, column)?;
    text.parse::<f64>()
        .map_err(|_| ValidationError::InvalidNumber {
            row: row.index,
            column,
            value: text.to_string(),
        })
}

fn parse_date(row: &RawRow, column: &'static str) -> Result<NaiveDate, ValidationError> {
    let text = require(row, column)?;
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Ok(date);
        }
    }
    Err(ValidationError::InvalidDate {
        row: row.index,
        column,
        value: text.to_string(),
    })
}
