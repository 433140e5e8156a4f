//! Vendor risk rating from free-form analyst notes.
//!
//! The evaluator normalizes the notes, derives context facts, resolves every
//! catalog control, and walks the rating tiers from most to least favorable.
//! Each call starts from scratch; the rule document is only ever read.

pub mod batch;
mod collectors;
mod context;
mod controls;
mod cross;
pub mod document;
pub mod domain;
mod matcher;
mod normalizer;
mod overrides;
mod policy;
pub mod router;

#[cfg(test)]
mod tests;

pub use batch::{BatchError, BatchRow, BatchSummary};
pub use context::SOFTWARE_PROVIDER_KEYWORDS;
pub use controls::{ControlStatus, ControlStatusMap, EvidenceSource};
pub use document::{ControlCategory, RuleDocument, RulesError};
pub use domain::{
    ContextReport, EvaluationResult, FallbackDetails, Rating, RatingDetails, TierDetails,
    VendorContext,
};
pub use overrides::designated;
pub use policy::TierCheck;
pub use router::rating_router;

use collectors::collect_present;
use controls::ControlEvaluation;
use normalizer::Corpus;
use overrides::OverrideTable;
use policy::{determine_rating, RatingSignals};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

/// Result plus the control-level audit trail behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationTrace {
    pub result: EvaluationResult,
    pub controls: Vec<ControlStatus>,
}

/// Stateless evaluator over one immutable rule document.
///
/// Safe to share across threads; every call builds its own working state.
#[derive(Debug, Clone)]
pub struct RiskRatingEvaluator {
    rules: RuleDocument,
    overrides: OverrideTable,
}

impl RiskRatingEvaluator {
    pub fn new(rules: RuleDocument) -> Self {
        let overrides = OverrideTable::from_document(&rules);
        Self { rules, overrides }
    }

    pub fn standard() -> Self {
        Self::new(RuleDocument::standard())
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RulesError> {
        RuleDocument::from_path(path).map(Self::new)
    }

    pub fn rules(&self) -> &RuleDocument {
        &self.rules
    }

    pub fn evaluate(&self, notes: &str) -> EvaluationResult {
        self.trace(notes).result
    }

    /// Evaluate and keep every control status for audit output.
    pub fn trace(&self, notes: &str) -> EvaluationTrace {
        let corpus = Corpus::new(notes);

        if corpus.is_empty() {
            return degenerate(Rating::NoInformationProvided);
        }
        if corpus.declares_not_applicable() {
            return degenerate(Rating::NotApplicable);
        }

        let context = context::resolve_context(&corpus, &self.rules.conditions);
        debug!(?context, "vendor context resolved");

        let cross_satisfied =
            cross::cross_satisfied_controls(&corpus, &self.rules.conditions.cross_satisfaction);

        let controls = ControlEvaluation {
            corpus: &corpus,
            context,
            cross_satisfied: &cross_satisfied,
            overrides: &self.overrides,
        }
        .evaluate(&self.rules.catalog);

        let incident_elements =
            collect_present(&corpus, &self.rules.catalog.incident_response_elements);
        let info_tech_overview = collect_present(&corpus, self.overview_vocabulary());

        let signals = RatingSignals {
            context,
            controls: &controls,
            incident_elements: &incident_elements,
            info_tech_overview: &info_tech_overview,
        };
        let (rating, details) = determine_rating(&self.rules.ratings, &signals);
        debug!(%rating, "vendor rated");

        EvaluationTrace {
            result: EvaluationResult {
                rating,
                details,
                context: ContextReport {
                    vendor: context,
                    incident_elements: sorted(incident_elements),
                },
            },
            controls: controls.into_vec(),
        }
    }

    /// The most favorable tier's overview list doubles as the detection vocabulary.
    fn overview_vocabulary(&self) -> &[String] {
        &self.rules.ratings.very_favorable.info_tech_overview.required
    }
}

fn degenerate(rating: Rating) -> EvaluationTrace {
    debug!(%rating, "notes short-circuited");
    EvaluationTrace {
        result: EvaluationResult::degenerate(rating),
        controls: Vec::new(),
    }
}

fn sorted(values: BTreeSet<String>) -> Vec<String> {
    values.into_iter().collect()
}
