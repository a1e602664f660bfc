//! National achievement test (NAT) score model.
//!
//! # Responsibility
//! - Define the per-respondent score record operators enter and upload.
//! - Pin the closed label sets used by the categorical breakdown charts.
//!
//! # Invariants
//! - Enum labels are the exact, case-sensitive dataset strings.
//! - `labels()` order is the presentation order of the breakdown charts.

use serde::{Deserialize, Serialize};

/// Socioeconomic bracket of one respondent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocioEconomicStatus {
    OnPovertyLine,
    AbovePovertyLine,
    BelowPovertyLine,
}

impl SocioEconomicStatus {
    /// All variants, in breakdown chart order.
    pub const ALL: [Self; 3] = [
        Self::OnPovertyLine,
        Self::AbovePovertyLine,
        Self::BelowPovertyLine,
    ];

    /// Returns the dataset label for this bracket.
    pub fn label(self) -> &'static str {
        match self {
            Self::OnPovertyLine => "On poverty line",
            Self::AbovePovertyLine => "Above poverty line",
            Self::BelowPovertyLine => "Below poverty line",
        }
    }

    /// Parses the exact dataset label. Matching is case-sensitive.
    pub fn parse_label(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.label() == value)
    }

    /// Breakdown chart labels, in presentation order.
    pub fn labels() -> [&'static str; 3] {
        Self::ALL.map(Self::label)
    }
}

/// Qualitative academic performance bracket of one respondent.
///
/// Variant order matches the dataset's chart order, not severity order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcademicDescription {
    Outstanding,
    Satisfactory,
    DidNotMeetExpectation,
    FairlySatisfactory,
    VerySatisfactory,
}

impl AcademicDescription {
    /// All variants, in breakdown chart order.
    pub const ALL: [Self; 5] = [
        Self::Outstanding,
        Self::Satisfactory,
        Self::DidNotMeetExpectation,
        Self::FairlySatisfactory,
        Self::VerySatisfactory,
    ];

    /// Returns the dataset label for this bracket.
    pub fn label(self) -> &'static str {
        match self {
            Self::Outstanding => "Outstanding",
            Self::Satisfactory => "Satisfactory",
            Self::DidNotMeetExpectation => "Did not meet expectation",
            Self::FairlySatisfactory => "Fairly Satisfactory",
            Self::VerySatisfactory => "Very Satisfactory",
        }
    }

    /// Parses the exact dataset label. Matching is case-sensitive.
    pub fn parse_label(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|desc| desc.label() == value)
    }

    /// Breakdown chart labels, in presentation order.
    pub fn labels() -> [&'static str; 5] {
        Self::ALL.map(Self::label)
    }
}

/// One respondent's NAT result with demographic and study attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestScore {
    /// Respondent name or anonymized identifier.
    pub respondent: String,
    /// Respondent age in years, strictly positive.
    pub age: u32,
    /// Sex as recorded in the source file.
    pub sex: String,
    /// Ethnic group as recorded in the source file.
    pub ethnic_group: String,
    /// Numeric academic performance grade.
    pub academic_performance: f64,
    /// Qualitative performance bracket.
    pub academic_description: AcademicDescription,
    /// IQ bracket as recorded in the source file.
    pub iq: String,
    /// School type, e.g. public or private.
    pub school_type: String,
    /// Socioeconomic bracket.
    pub socioeconomic_status: SocioEconomicStatus,
    /// Study habit bracket as recorded in the source file.
    pub study_habit: String,
    /// NAT score, nominally within `[0, 100)`. Out-of-range values are kept
    /// and fall into the histogram overflow bin.
    pub nat_result: f64,
}

/// Partial update for one stored test score. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestScorePatch {
    pub respondent: Option<String>,
    pub age: Option<u32>,
    pub sex: Option<String>,
    pub ethnic_group: Option<String>,
    pub academic_performance: Option<f64>,
    pub academic_description: Option<AcademicDescription>,
    pub iq: Option<String>,
    pub school_type: Option<String>,
    pub socioeconomic_status: Option<SocioEconomicStatus>,
    pub study_habit: Option<String>,
    pub nat_result: Option<f64>,
}

impl TestScorePatch {
    /// Returns whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.respondent.is_none()
            && self.age.is_none()
            && self.sex.is_none()
            && self.ethnic_group.is_none()
            && self.academic_performance.is_none()
            && self.academic_description.is_none()
            && self.iq.is_none()
            && self.school_type.is_none()
            && self.socioeconomic_status.is_none()
            && self.study_habit.is_none()
            && self.nat_result.is_none()
    }
}
