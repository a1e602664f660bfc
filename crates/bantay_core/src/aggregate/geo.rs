//! Regional rollup for the choropleth map.
//!
//! # Responsibility
//! - Sum cases and deaths per region and join the totals onto named map
//!   boundaries.
//!
//! # Invariants
//! - Region names join case-insensitively.
//! - Every boundary appears in the output; unmatched boundaries carry zeros.
//! - Reports whose region matches no boundary drop out of the join silently.

use crate::model::boundary::Boundary;
use crate::model::case_report::CaseReport;
use serde::Serialize;
use std::collections::HashMap;

/// Case and death sums for one region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegionTotals {
    pub cases: u64,
    pub deaths: u64,
}

/// Sums cases and deaths per lowercased region name.
pub fn rollup_by_region(reports: &[CaseReport]) -> HashMap<String, RegionTotals> {
    let mut totals: HashMap<String, RegionTotals> = HashMap::new();
    for report in reports {
        let entry = totals.entry(report.region.to_lowercase()).or_default();
        entry.cases += u64::from(report.cases);
        entry.deaths += u64::from(report.deaths);
    }
    totals
}

/// One boundary joined with its regional totals, ready for map shading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionShading<'b> {
    pub boundary: &'b Boundary,
    pub totals: RegionTotals,
}

/// Joins regional totals onto boundaries, one entry per boundary in input
/// order. Boundaries without reports get zero totals.
pub fn choropleth<'b>(
    boundaries: &'b [Boundary],
    reports: &[CaseReport],
) -> Vec<RegionShading<'b>> {
    let totals = rollup_by_region(reports);
    boundaries
        .iter()
        .map(|boundary| RegionShading {
            boundary,
            totals: totals
                .get(&boundary.name.to_lowercase())
                .copied()
                .unwrap_or_default(),
        })
        .collect()
}
