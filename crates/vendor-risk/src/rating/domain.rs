use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete outcome assigned to a vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    NoInformationProvided,
    #[serde(rename = "n_a")]
    NotApplicable,
    VeryFavorable,
    Favorable,
    Neutral,
    Unfavorable,
    VeryUnfavorable,
}

impl Rating {
    /// Tiers walked by the rating determiner, most favorable first.
    pub const fn tiers() -> [Self; 4] {
        [
            Self::VeryFavorable,
            Self::Favorable,
            Self::Neutral,
            Self::Unfavorable,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoInformationProvided => "no_information_provided",
            Self::NotApplicable => "n_a",
            Self::VeryFavorable => "very_favorable",
            Self::Favorable => "favorable",
            Self::Neutral => "neutral",
            Self::Unfavorable => "unfavorable",
            Self::VeryUnfavorable => "very_unfavorable",
        }
    }

    /// Favorability rank for graded outcomes; lower is better.
    ///
    /// The degenerate outcomes are not graded and return `None`.
    pub const fn rank(self) -> Option<u8> {
        match self {
            Self::VeryFavorable => Some(0),
            Self::Favorable => Some(1),
            Self::Neutral => Some(2),
            Self::Unfavorable => Some(3),
            Self::VeryUnfavorable => Some(4),
            Self::NoInformationProvided | Self::NotApplicable => None,
        }
    }

    pub const fn is_degenerate(self) -> bool {
        matches!(self, Self::NoInformationProvided | Self::NotApplicable)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Facts about the vendor derived from the notes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorContext {
    pub handles_pii: bool,
    pub remote_work_allowed: bool,
    pub software_provider: bool,
}

/// Context block attached to every result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextReport {
    #[serde(flatten)]
    pub vendor: VendorContext,
    pub incident_elements: Vec<String>,
}

/// Breakdown for a tier that was met.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierDetails {
    pub rating: Rating,
    pub satisfied_controls: Vec<String>,
    pub missing_controls: Vec<String>,
    pub incident_response_elements: Vec<String>,
    pub info_tech_overview: Vec<String>,
}

/// Breakdown for the worst-case fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackDetails {
    pub reason: String,
    pub missing_controls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoDetails {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RatingDetails {
    Tier(TierDetails),
    Fallback(FallbackDetails),
    Empty(NoDetails),
}

impl RatingDetails {
    pub fn empty() -> Self {
        Self::Empty(NoDetails {})
    }

    pub fn missing_controls(&self) -> &[String] {
        match self {
            Self::Tier(details) => &details.missing_controls,
            Self::Fallback(details) => &details.missing_controls,
            Self::Empty(_) => &[],
        }
    }
}

/// The record handed back to callers for one set of notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub rating: Rating,
    pub details: RatingDetails,
    pub context: ContextReport,
}

impl EvaluationResult {
    pub(crate) fn degenerate(rating: Rating) -> Self {
        debug_assert!(rating.is_degenerate(), "{rating} is not a short-circuit outcome");
        Self {
            rating,
            details: RatingDetails::empty(),
            context: ContextReport::default(),
        }
    }
}
