//! Control identifiers with special handling, expressed as a lookup table.
//!
//! Each rule document condition that singles out controls is turned into
//! [`ControlOverride`] entries once, when the evaluator is built. Matching and control
//! evaluation only consult the table.

use super::document::RuleDocument;
use std::collections::HashMap;

/// Identifiers the rule document conditions refer to.
pub mod designated {
    pub const MFA_CRITICAL_OR_PII: &str = "lac_mfa_critical_or_pii";
    pub const PASSWORDS_ENCRYPTED_IN_TRANSIT: &str = "lac_passwords_encrypted_in_transit";
    pub const LEAST_PRIVILEGE: &str = "lac_least_privilege";
    pub const NEED_TO_KNOW: &str = "net_pii_need_to_know";
    pub const CHANGE_MGMT_PROCESS: &str = "chg_change_mgmt_process";
    pub const BUSINESS_CONTINUITY_PLAN: &str = "bcp_plan";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ControlOverride {
    /// Direct text evidence is void when any of these statements is present.
    NegatedBy(Vec<String>),
    /// Only counted when the vendor handles PII.
    RequiredOnlyWhenHandlingPii,
    /// Recorded as met and not required once the named control is satisfied.
    WaivedBy(String),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct OverrideTable {
    entries: HashMap<String, Vec<ControlOverride>>,
}

impl OverrideTable {
    pub(crate) fn from_document(document: &RuleDocument) -> Self {
        let mut table = Self::default();
        let conditions = &document.conditions;
        let logical = &conditions.logical_access_controls;
        let network = &conditions.network_information_security;

        let negatives = &logical.passwords_encrypted_in_transit_only_if_negative_statement_present;
        if !negatives.is_empty() {
            table.insert(
                designated::PASSWORDS_ENCRYPTED_IN_TRANSIT,
                ControlOverride::NegatedBy(negatives.clone()),
            );
        }

        if logical.enforce_mfa_critical_or_pii_if_company_handles_pii {
            table.insert(
                designated::MFA_CRITICAL_OR_PII,
                ControlOverride::RequiredOnlyWhenHandlingPii,
            );
        }

        if network.enforce_pii_controls_if_company_handles_pii {
            for control in &document.catalog.network_information_security.pii_controls {
                table.insert(&control.id, ControlOverride::RequiredOnlyWhenHandlingPii);
            }
        }

        if network.do_not_enforce_need_to_know_if_least_privilege_statement_present {
            table.insert(
                designated::NEED_TO_KNOW,
                ControlOverride::WaivedBy(designated::LEAST_PRIVILEGE.to_string()),
            );
        }

        table
    }

    pub(crate) fn insert(&mut self, control_id: &str, rule: ControlOverride) {
        self.entries
            .entry(control_id.to_string())
            .or_default()
            .push(rule);
    }

    pub(crate) fn for_control(&self, control_id: &str) -> &[ControlOverride] {
        self.entries
            .get(control_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub(crate) fn negations(&self, control_id: &str) -> impl Iterator<Item = &str> + '_ {
        self.for_control(control_id)
            .iter()
            .filter_map(|rule| match rule {
                ControlOverride::NegatedBy(statements) => Some(statements),
                _ => None,
            })
            .flatten()
            .map(String::as_str)
    }

    pub(crate) fn requires_pii(&self, control_id: &str) -> bool {
        self.for_control(control_id)
            .contains(&ControlOverride::RequiredOnlyWhenHandlingPii)
    }

    pub(crate) fn waiver(&self, control_id: &str) -> Option<&str> {
        self.for_control(control_id).iter().find_map(|rule| match rule {
            ControlOverride::WaivedBy(source) => Some(source.as_str()),
            _ => None,
        })
    }
}
