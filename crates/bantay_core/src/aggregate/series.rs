//! Time series and point projections of case reports.
//!
//! # Responsibility
//! - Group case reports by month or year for the trend line chart.
//! - Project each report onto scatter and bubble chart points.
//!
//! # Invariants
//! - Group order is first-encounter order over the input, not chronological.
//! - Labels and x encodings derive from `date`, never from the carried
//!   `year` column.
//! - Projections emit one point per input report; the axis unit changes the
//!   `x` encoding only and never filters records.

use crate::model::case_report::CaseReport;
use chrono::Datelike;
use serde::Serialize;
use std::collections::HashMap;

/// X-axis unit for trend and projection charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Month,
    Year,
}

impl TimeUnit {
    /// Grouping label for one report under this unit.
    fn bucket_label(self, report: &CaseReport) -> String {
        match self {
            Self::Month => report.date.format("%b %Y").to_string(),
            Self::Year => report.date.format("%Y").to_string(),
        }
    }

    /// Numeric x encoding for one report under this unit.
    fn x_value(self, report: &CaseReport) -> f64 {
        match self {
            Self::Month => f64::from(report.date.month()),
            Self::Year => f64::from(report.date.year()),
        }
    }
}

/// Case and death sums for one month or year group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeBucket {
    pub label: String,
    pub cases: u64,
    pub deaths: u64,
}

/// Sums cases and deaths per month or year, preserving first-encounter order.
pub fn time_series(reports: &[CaseReport], unit: TimeUnit) -> Vec<TimeBucket> {
    let mut order: Vec<String> = Vec::new();
    let mut sums: HashMap<String, (u64, u64)> = HashMap::new();
    for report in reports {
        let label = unit.bucket_label(report);
        if !sums.contains_key(&label) {
            order.push(label.clone());
        }
        let entry = sums.entry(label).or_default();
        entry.0 += u64::from(report.cases);
        entry.1 += u64::from(report.deaths);
    }

    order
        .into_iter()
        .map(|label| {
            let (cases, deaths) = sums.remove(&label).unwrap_or_default();
            TimeBucket { label, cases, deaths }
        })
        .collect()
}

/// One scatter chart point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

/// One bubble chart point. `r` is the render radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BubblePoint {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

/// Parallel case and death scatter series over one report snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub cases: Vec<ScatterPoint>,
    pub deaths: Vec<ScatterPoint>,
}

/// Parallel case and death bubble series over one report snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleSeries {
    pub cases: Vec<BubblePoint>,
    pub deaths: Vec<BubblePoint>,
}

/// Projects every report onto case and death scatter points.
pub fn scatter_series(reports: &[CaseReport], unit: TimeUnit) -> ScatterSeries {
    ScatterSeries {
        cases: reports
            .iter()
            .map(|report| ScatterPoint {
                x: unit.x_value(report),
                y: f64::from(report.cases),
            })
            .collect(),
        deaths: reports
            .iter()
            .map(|report| ScatterPoint {
                x: unit.x_value(report),
                y: f64::from(report.deaths),
            })
            .collect(),
    }
}

/// Projects every report onto case and death bubble points.
///
/// Each point's radius derives from the opposite metric.
pub fn bubble_series(reports: &[CaseReport], unit: TimeUnit) -> BubbleSeries {
    BubbleSeries {
        cases: reports
            .iter()
            .map(|report| BubblePoint {
                x: unit.x_value(report),
                y: f64::from(report.cases),
                r: bubble_radius(report.deaths),
            })
            .collect(),
        deaths: reports
            .iter()
            .map(|report| BubblePoint {
                x: unit.x_value(report),
                y: f64::from(report.deaths),
                r: bubble_radius(report.cases),
            })
            .collect(),
    }
}

/// Render radius for one bubble: `sqrt(metric) * 2`.
fn bubble_radius(metric: u32) -> f64 {
    f64::from(metric).sqrt() * 2.0
}
