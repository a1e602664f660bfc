//! NAT score histogram.
//!
//! # Responsibility
//! - Bucket scores into fixed-width decade bins for the score bar chart.
//!
//! # Invariants
//! - Bin counts always sum to the number of input values.
//! - Values outside `[0, 100)`, including NaN, land in the overflow bin.

use crate::model::test_score::TestScore;

/// Ten in-range decade bins plus one trailing overflow bin.
pub const BIN_COUNT: usize = 11;

/// Chart labels, one per bin in histogram output order.
pub const BIN_LABELS: [&str; BIN_COUNT] = [
    "0-9", "10-19", "20-29", "30-39", "40-49", "50-59", "60-69", "70-79", "80-89", "90-99",
    "out of range",
];

/// Returns the bin for one score. Scores outside `[0, 100)` overflow.
pub fn bin_index(value: f64) -> usize {
    if (0.0..100.0).contains(&value) {
        (value / 10.0) as usize
    } else {
        BIN_COUNT - 1
    }
}

/// Buckets raw score values into decade bins.
pub fn score_histogram(values: impl IntoIterator<Item = f64>) -> [u64; BIN_COUNT] {
    let mut bins = [0u64; BIN_COUNT];
    for value in values {
        bins[bin_index(value)] += 1;
    }
    bins
}

/// Buckets the NAT result of each score record.
pub fn nat_result_histogram(scores: &[TestScore]) -> [u64; BIN_COUNT] {
    score_histogram(scores.iter().map(|score| score.nat_result))
}
