//! Choropleth color scale.
//!
//! Maps a regional case count to one of nine fixed colors. Band edges are
//! inclusive: a count equal to a threshold takes the band at or above it.

use serde::Serialize;

/// Scale colors in ascending severity order. Band 0 is the no-data white.
pub const SCALE_COLORS: [&str; 9] = [
    "#FFFFFF", "#0000FF", "#00FFFF", "#00FF00", "#FFFF00", "#FFA500", "#FF0000", "#800026",
    "#2C003E",
];

/// Ascending case-count thresholds separating the scale bands.
pub const CASE_THRESHOLDS: [u64; 8] = [10, 100, 1_000, 5_000, 10_000, 50_000, 100_000, 200_000];

/// Returns the scale band for a case count, `0..SCALE_COLORS.len()`.
pub fn scale_band(cases: u64) -> usize {
    CASE_THRESHOLDS
        .iter()
        .filter(|threshold| cases >= **threshold)
        .count()
}

/// Returns the fill color for a case count.
pub fn scale_color(cases: u64) -> &'static str {
    SCALE_COLORS[scale_band(cases)]
}

/// One legend row pairing a color with its case-count range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub color: &'static str,
    pub label: &'static str,
}

/// Legend rows in band order, lowest range first.
pub const LEGEND: [LegendEntry; 9] = [
    LegendEntry { color: "#FFFFFF", label: "0 - 9 Cases" },
    LegendEntry { color: "#0000FF", label: "10 - 99 Cases" },
    LegendEntry { color: "#00FFFF", label: "100 - 999 Cases" },
    LegendEntry { color: "#00FF00", label: "1,000 - 4,999 Cases" },
    LegendEntry { color: "#FFFF00", label: "5,000 - 9,999 Cases" },
    LegendEntry { color: "#FFA500", label: "10,000 - 49,999 Cases" },
    LegendEntry { color: "#FF0000", label: "50,000 - 99,999 Cases" },
    LegendEntry { color: "#800026", label: "100,000 - 199,999 Cases" },
    LegendEntry { color: "#2C003E", label: "200,000+ Cases" },
];
