//! Categorical breakdown shares.
//!
//! # Responsibility
//! - Count a closed label set over one categorical field and express each
//!   label's share as a two-decimal percentage.
//!
//! # Invariants
//! - Values outside the label set count toward neither the per-label counts
//!   nor the percentage denominator.
//! - With no matching values every percentage is `0.00`, never NaN.

use crate::model::test_score::{AcademicDescription, SocioEconomicStatus, TestScore};
use serde::Serialize;

/// One label's slice of a categorical breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelShare {
    pub label: &'static str,
    pub count: u64,
    pub percent: f64,
}

/// Counts each label over `values` and derives two-decimal percentages.
///
/// Output order follows `labels`. Matching is exact and case-sensitive.
pub fn categorical_breakdown<'a, I>(labels: &[&'static str], values: I) -> Vec<LabelShare>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = vec![0u64; labels.len()];
    for value in values {
        if let Some(slot) = labels.iter().position(|label| *label == value) {
            counts[slot] += 1;
        }
    }

    let total: u64 = counts.iter().sum();
    labels
        .iter()
        .zip(counts)
        .map(|(&label, count)| LabelShare {
            label,
            count,
            percent: percent_of(count, total),
        })
        .collect()
}

/// Socioeconomic bracket shares over a score snapshot, in chart order.
pub fn socioeconomic_breakdown(scores: &[TestScore]) -> Vec<LabelShare> {
    categorical_breakdown(
        &SocioEconomicStatus::labels(),
        scores.iter().map(|score| score.socioeconomic_status.label()),
    )
}

/// Academic description shares over a score snapshot, in chart order.
pub fn academic_breakdown(scores: &[TestScore]) -> Vec<LabelShare> {
    categorical_breakdown(
        &AcademicDescription::labels(),
        scores.iter().map(|score| score.academic_description.label()),
    )
}

fn percent_of(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(100.0 * count as f64 / total as f64)
}

/// Rounds to two decimals, half away from zero.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::{categorical_breakdown, socioeconomic_breakdown, LabelShare};
    use crate::model::test_score::{AcademicDescription, SocioEconomicStatus, TestScore};

    fn score(status: SocioEconomicStatus) -> TestScore {
        TestScore {
            respondent: "R".to_string(),
            age: 14,
            sex: "F".to_string(),
            ethnic_group: "Cebuano".to_string(),
            academic_performance: 85.0,
            academic_description: AcademicDescription::Satisfactory,
            iq: "Average".to_string(),
            school_type: "Public".to_string(),
            socioeconomic_status: status,
            study_habit: "Good".to_string(),
            nat_result: 70.0,
        }
    }

    #[test]
    fn shares_follow_label_order_with_two_decimal_percents() {
        let shares =
            categorical_breakdown(&["red", "green", "blue"], ["red", "blue", "red"]);
        assert_eq!(
            shares,
            vec![
                LabelShare { label: "red", count: 2, percent: 66.67 },
                LabelShare { label: "green", count: 0, percent: 0.0 },
                LabelShare { label: "blue", count: 1, percent: 33.33 },
            ]
        );
    }

    #[test]
    fn unknown_values_count_toward_neither_side() {
        let shares = categorical_breakdown(&["yes", "no"], ["yes", "maybe", "no", "YES"]);
        assert_eq!(shares[0].count, 1);
        assert_eq!(shares[0].percent, 50.0);
        assert_eq!(shares[1].count, 1);
        assert_eq!(shares[1].percent, 50.0);
    }

    #[test]
    fn empty_input_yields_all_zero_percentages() {
        let shares = categorical_breakdown(&["a", "b"], std::iter::empty::<&str>());
        assert_eq!(shares.len(), 2);
        assert!(shares.iter().all(|share| share.count == 0 && share.percent == 0.0));
    }

    #[test]
    fn socioeconomic_shares_keep_chart_order() {
        let scores = vec![
            score(SocioEconomicStatus::BelowPovertyLine),
            score(SocioEconomicStatus::OnPovertyLine),
            score(SocioEconomicStatus::BelowPovertyLine),
        ];
        let shares = socioeconomic_breakdown(&scores);
        assert_eq!(shares[0].label, "On poverty line");
        assert_eq!(shares[0].count, 1);
        assert_eq!(shares[1].label, "Above poverty line");
        assert_eq!(shares[1].count, 0);
        assert_eq!(shares[2].label, "Below poverty line");
        assert_eq!(shares[2].count, 2);
    }
}
