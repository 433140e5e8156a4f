use super::domain::Rating;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

const STANDARD_RULES: &str = include_str!("../../rules/rating_rules.json");

/// Errors raised while loading a rule document.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("failed to read rule document: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed rule document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("control '{0}' is declared more than once in the catalog")]
    DuplicateControl(String),
}

/// Conditions, control catalog, and rating tiers driving an evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDocument {
    pub conditions: Conditions,
    pub catalog: Catalog,
    pub ratings: Ratings,
}

impl RuleDocument {
    /// The rule set shipped with the crate.
    pub fn standard() -> Self {
        // The embedded document is covered by tests; a parse failure is a build defect.
        Self::from_json_str(STANDARD_RULES).expect("embedded rule document is valid")
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RulesError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RulesError> {
        let document: Self = serde_json::from_reader(reader)?;
        document.validate()?;
        Ok(document)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, RulesError> {
        let document: Self = serde_json::from_str(raw)?;
        document.validate()?;
        Ok(document)
    }

    fn validate(&self) -> Result<(), RulesError> {
        let mut seen = HashSet::new();
        for (_, control) in self.catalog.controls() {
            if !seen.insert(control.id.as_str()) {
                return Err(RulesError::DuplicateControl(control.id.clone()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conditions {
    pub logical_access_controls: LogicalAccessConditions,
    pub network_information_security: NetworkConditions,
    pub remote_workforce: RemoteWorkforceConditions,
    pub cross_satisfaction: Vec<CrossSatisfactionRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogicalAccessConditions {
    pub pii_positive_statements: Vec<String>,
    pub enforce_mfa_critical_or_pii_if_company_handles_pii: bool,
    pub passwords_encrypted_in_transit_only_if_negative_statement_present: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConditions {
    pub enforce_pii_controls_if_company_handles_pii: bool,
    pub do_not_enforce_need_to_know_if_least_privilege_statement_present: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteWorkforceConditions {
    pub enforce_only_if_remote_work_allowed: String,
}

/// "If any of these statements are present, these controls are met."
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossSatisfactionRule {
    pub if_any_statement_present: Vec<String>,
    pub then_mark_controls_met: Vec<String>,
}

/// Category a control belongs to, fixed by the catalog section declaring it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlCategory {
    LogicalAccess,
    NetworkPii,
    Network,
    ChangeManagement,
    RemoteWorkforce,
    BusinessContinuity,
}

impl ControlCategory {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::LogicalAccess,
            Self::NetworkPii,
            Self::Network,
            Self::ChangeManagement,
            Self::RemoteWorkforce,
            Self::BusinessContinuity,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::LogicalAccess => "Logical Access",
            Self::NetworkPii => "Network / PII",
            Self::Network => "Network & Information Security",
            Self::ChangeManagement => "Change Management & SDLC",
            Self::RemoteWorkforce => "Remote Workforce",
            Self::BusinessContinuity => "Business Continuity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlDefinition {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub logical_access_controls: Vec<ControlDefinition>,
    pub network_information_security: NetworkCatalog,
    pub change_mgmt_sdlc: Vec<ControlDefinition>,
    pub remote_workforce: Vec<ControlDefinition>,
    pub business_continuity: Vec<ControlDefinition>,
    pub incident_response_elements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkCatalog {
    pub pii_controls: Vec<ControlDefinition>,
    pub controls: Vec<ControlDefinition>,
}

impl Catalog {
    pub fn section(&self, category: ControlCategory) -> &[ControlDefinition] {
        match category {
            ControlCategory::LogicalAccess => &self.logical_access_controls,
            ControlCategory::NetworkPii => &self.network_information_security.pii_controls,
            ControlCategory::Network => &self.network_information_security.controls,
            ControlCategory::ChangeManagement => &self.change_mgmt_sdlc,
            ControlCategory::RemoteWorkforce => &self.remote_workforce,
            ControlCategory::BusinessContinuity => &self.business_continuity,
        }
    }

    /// Every control paired with its category, in category then catalog order.
    pub fn controls(&self) -> impl Iterator<Item = (ControlCategory, &ControlDefinition)> + '_ {
        ControlCategory::ordered().into_iter().flat_map(move |category| {
            self.section(category)
                .iter()
                .map(move |control| (category, control))
        })
    }
}

/// The four graded tiers; each one must be present in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ratings {
    pub very_favorable: TierRequirements,
    pub favorable: TierRequirements,
    pub neutral: TierRequirements,
    pub unfavorable: TierRequirements,
}

impl Ratings {
    /// Tiers in descending order of favorability.
    pub fn ordered(&self) -> [(Rating, &TierRequirements); 4] {
        [
            (Rating::VeryFavorable, &self.very_favorable),
            (Rating::Favorable, &self.favorable),
            (Rating::Neutral, &self.neutral),
            (Rating::Unfavorable, &self.unfavorable),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierRequirements {
    pub info_tech_overview: OverviewRequirement,
    pub logical_access_controls: AccessRequirement,
    pub network_information_security: NetworkRequirement,
    pub change_mgmt_sdlc: ChangeManagementRequirement,
    pub remote_workforce: RemoteWorkforceRequirement,
    pub incident_response: IncidentResponseRequirement,
    pub business_continuity: BusinessContinuityRequirement,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverviewRequirement {
    pub required: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessRequirement {
    pub required_all: bool,
    pub min_count: usize,
    pub must_include_tag: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkRequirement {
    pub pii_controls_required_if_company_handles_pii: bool,
    pub controls_required_all: bool,
    pub min_count: usize,
    pub must_include_tag: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeManagementRequirement {
    pub required_all: bool,
    pub require_change_mgmt_process: bool,
    pub min_count: usize,
    pub min_count_from: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteWorkforceRequirement {
    pub required_all: bool,
    pub min_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncidentResponseRequirement {
    pub min_elements: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessContinuityRequirement {
    pub required: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_document_loads() {
        let document = RuleDocument::standard();
        assert!(!document.catalog.logical_access_controls.is_empty());
        assert_eq!(
            document.ratings.very_favorable.incident_response.min_elements,
            Some(4)
        );
    }

    const ALL_TIERS: &str =
        r#"{ "very_favorable": {}, "favorable": {}, "neutral": {}, "unfavorable": {} }"#;

    #[test]
    fn missing_conditions_section_is_rejected() {
        let raw = format!(r#"{{ "catalog": {{}}, "ratings": {ALL_TIERS} }}"#);
        let error = RuleDocument::from_json_str(&raw).expect_err("conditions missing");
        assert!(matches!(error, RulesError::Parse(_)));
        assert!(error.to_string().contains("conditions"));
    }

    #[test]
    fn missing_catalog_section_is_rejected() {
        let raw = format!(r#"{{ "conditions": {{}}, "ratings": {ALL_TIERS} }}"#);
        let error = RuleDocument::from_json_str(&raw).expect_err("catalog missing");
        assert!(matches!(error, RulesError::Parse(_)));
        assert!(error.to_string().contains("catalog"));
    }

    #[test]
    fn missing_tier_is_rejected() {
        let raw = r#"{
            "conditions": {},
            "catalog": {},
            "ratings": { "very_favorable": {}, "favorable": {}, "neutral": {} }
        }"#;
        let error = RuleDocument::from_json_str(raw).expect_err("unfavorable missing");
        assert!(error.to_string().contains("unfavorable"));
    }

    #[test]
    fn optional_fields_default_to_no_requirement() {
        let raw = r#"{
            "conditions": {},
            "catalog": {},
            "ratings": {
                "very_favorable": {}, "favorable": {}, "neutral": {}, "unfavorable": {}
            }
        }"#;
        let document = RuleDocument::from_json_str(raw).expect("minimal document loads");
        assert_eq!(document.ratings.neutral, TierRequirements::default());
        assert!(document.conditions.cross_satisfaction.is_empty());
        assert_eq!(document.catalog.controls().count(), 0);
    }

    #[test]
    fn duplicate_control_ids_are_rejected() {
        let raw = r#"{
            "conditions": {},
            "catalog": {
                "logical_access_controls": [{ "id": "lac_x", "text": "x" }],
                "business_continuity": [{ "id": "lac_x", "text": "y" }]
            },
            "ratings": {
                "very_favorable": {}, "favorable": {}, "neutral": {}, "unfavorable": {}
            }
        }"#;
        match RuleDocument::from_json_str(raw) {
            Err(RulesError::DuplicateControl(id)) => assert_eq!(id, "lac_x"),
            other => panic!("expected duplicate control error, got {other:?}"),
        }
    }

    #[test]
    fn controls_carry_their_section_category() {
        let document = RuleDocument::standard();
        let categories: Vec<_> = document
            .catalog
            .controls()
            .filter(|(_, control)| control.id.starts_with("net_"))
            .map(|(category, control)| (control.id.as_str(), category))
            .collect();

        assert!(categories.contains(&("net_pii_need_to_know", ControlCategory::NetworkPii)));
        assert!(categories.contains(&("net_firewall", ControlCategory::Network)));
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = RuleDocument::from_path("./does-not-exist.json").expect_err("io error");
        assert!(matches!(error, RulesError::Io(_)));
    }
}
