use crate::rating::document::ControlCategory;
use crate::rating::{ControlStatus, EvaluationTrace, RiskRatingEvaluator, RuleDocument};

pub(super) const HANDLES_PII: &str = "The vendor stores PII";
pub(super) const SOFTWARE_PROVIDER: &str = "The vendor provides software to its customers";
pub(super) const REMOTE_WORK: &str = "Employees are permitted to work remotely";

pub(super) fn evaluator() -> RiskRatingEvaluator {
    RiskRatingEvaluator::standard()
}

pub(super) fn rules() -> RuleDocument {
    RuleDocument::standard()
}

/// Join statements into one block of notes.
pub(super) fn notes<S: AsRef<str>>(statements: &[S]) -> String {
    statements
        .iter()
        .map(|statement| statement.as_ref())
        .collect::<Vec<_>>()
        .join(". ")
}

pub(super) fn control_texts(category: ControlCategory) -> Vec<String> {
    rules()
        .catalog
        .section(category)
        .iter()
        .map(|control| control.text.clone())
        .collect()
}

pub(super) fn text_of(control_id: &str) -> String {
    rules()
        .catalog
        .controls()
        .find(|(_, control)| control.id == control_id)
        .map(|(_, control)| control.text.clone())
        .unwrap_or_else(|| panic!("unknown control {control_id}"))
}

pub(super) fn overview_statements() -> Vec<String> {
    rules().ratings.very_favorable.info_tech_overview.required
}

pub(super) fn incident_elements() -> Vec<String> {
    rules().catalog.incident_response_elements
}

/// Every statement a vendor outside the software, remote, and PII contexts
/// needs for the most favorable tier.
pub(super) fn very_favorable_statements() -> Vec<String> {
    let mut statements = overview_statements();
    for category in [
        ControlCategory::LogicalAccess,
        ControlCategory::NetworkPii,
        ControlCategory::Network,
        ControlCategory::BusinessContinuity,
    ] {
        statements.extend(control_texts(category));
    }
    statements.extend(incident_elements());
    statements
}

pub(super) fn status<'a>(trace: &'a EvaluationTrace, control_id: &str) -> &'a ControlStatus {
    trace
        .controls
        .iter()
        .find(|status| status.control_id == control_id)
        .unwrap_or_else(|| panic!("control {control_id} missing from trace"))
}
