use super::controls::{ControlStatus, ControlStatusMap};
use super::document::{
    AccessRequirement, BusinessContinuityRequirement, ChangeManagementRequirement,
    ControlCategory, IncidentResponseRequirement, NetworkRequirement, OverviewRequirement,
    Ratings, RemoteWorkforceRequirement, TierRequirements,
};
use super::domain::{FallbackDetails, Rating, RatingDetails, TierDetails, VendorContext};
use super::overrides::designated;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

pub(crate) const FALLBACK_REASON: &str =
    "Vendor did not satisfy the minimum safeguards for an unfavorable rating.";

/// Composite checks a tier is made of, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TierCheck {
    InfoTechOverview,
    LogicalAccess,
    NetworkSecurity,
    ChangeManagement,
    RemoteWorkforce,
    IncidentResponse,
    BusinessContinuity,
}

/// Everything the rating determiner reads for one evaluation.
pub(crate) struct RatingSignals<'a> {
    pub(crate) context: VendorContext,
    pub(crate) controls: &'a ControlStatusMap,
    pub(crate) incident_elements: &'a BTreeSet<String>,
    pub(crate) info_tech_overview: &'a BTreeSet<String>,
}

impl RatingSignals<'_> {
    /// The first failing check, or `None` when the tier is met.
    pub(crate) fn first_failure(&self, tier: &TierRequirements) -> Option<TierCheck> {
        if !self.meets_overview(&tier.info_tech_overview) {
            return Some(TierCheck::InfoTechOverview);
        }
        if !self.meets_logical_access(&tier.logical_access_controls) {
            return Some(TierCheck::LogicalAccess);
        }
        if !self.meets_network(&tier.network_information_security) {
            return Some(TierCheck::NetworkSecurity);
        }
        if !self.meets_change_management(&tier.change_mgmt_sdlc) {
            return Some(TierCheck::ChangeManagement);
        }
        if !self.meets_remote_workforce(&tier.remote_workforce) {
            return Some(TierCheck::RemoteWorkforce);
        }
        if !self.meets_incident_response(&tier.incident_response) {
            return Some(TierCheck::IncidentResponse);
        }
        if !self.meets_business_continuity(&tier.business_continuity) {
            return Some(TierCheck::BusinessContinuity);
        }
        None
    }

    fn meets_overview(&self, requirement: &OverviewRequirement) -> bool {
        requirement
            .required
            .iter()
            .all(|statement| self.info_tech_overview.contains(statement))
    }

    fn meets_logical_access(&self, requirement: &AccessRequirement) -> bool {
        let required: Vec<&ControlStatus> = self
            .controls
            .required_in(ControlCategory::LogicalAccess)
            .collect();

        if requirement.required_all {
            return all_satisfied(&required);
        }
        meets_count_and_tag(
            &required,
            requirement.min_count,
            requirement.must_include_tag.as_deref(),
        )
    }

    fn meets_network(&self, requirement: &NetworkRequirement) -> bool {
        if requirement.pii_controls_required_if_company_handles_pii && self.context.handles_pii {
            let pii: Vec<&ControlStatus> = self
                .controls
                .required_in(ControlCategory::NetworkPii)
                .collect();
            if pii.is_empty() || !all_satisfied(&pii) {
                return false;
            }
        }

        let required: Vec<&ControlStatus> = self
            .controls
            .required_in(ControlCategory::Network)
            .collect();

        if requirement.controls_required_all {
            return all_satisfied(&required);
        }
        meets_count_and_tag(
            &required,
            requirement.min_count,
            requirement.must_include_tag.as_deref(),
        )
    }

    fn meets_change_management(&self, requirement: &ChangeManagementRequirement) -> bool {
        if !self.context.software_provider {
            return true;
        }

        let required: Vec<&ControlStatus> = self
            .controls
            .required_in(ControlCategory::ChangeManagement)
            .collect();

        if requirement.required_all {
            return all_satisfied(&required);
        }

        if requirement.require_change_mgmt_process
            && !self.controls.is_satisfied(designated::CHANGE_MGMT_PROCESS)
        {
            return false;
        }

        let satisfied = if requirement.min_count_from.is_empty() {
            satisfied_count(&required)
        } else {
            requirement
                .min_count_from
                .iter()
                .filter(|control_id| self.controls.is_satisfied(control_id))
                .count()
        };
        satisfied >= requirement.min_count
    }

    fn meets_remote_workforce(&self, requirement: &RemoteWorkforceRequirement) -> bool {
        if !self.context.remote_work_allowed {
            return true;
        }

        let required: Vec<&ControlStatus> = self
            .controls
            .required_in(ControlCategory::RemoteWorkforce)
            .collect();

        if requirement.required_all {
            return all_satisfied(&required);
        }
        satisfied_count(&required) >= requirement.min_count
    }

    fn meets_incident_response(&self, requirement: &IncidentResponseRequirement) -> bool {
        requirement
            .min_elements
            .map_or(true, |minimum| self.incident_elements.len() >= minimum)
    }

    fn meets_business_continuity(&self, requirement: &BusinessContinuityRequirement) -> bool {
        !requirement.required || self.controls.is_satisfied(designated::BUSINESS_CONTINUITY_PLAN)
    }

    fn tier_details(&self, rating: Rating) -> TierDetails {
        TierDetails {
            rating,
            satisfied_controls: self.controls.satisfied_required_ids(),
            missing_controls: self.controls.missing_ids(),
            incident_response_elements: self.incident_elements.iter().cloned().collect(),
            info_tech_overview: self.info_tech_overview.iter().cloned().collect(),
        }
    }
}

fn all_satisfied(controls: &[&ControlStatus]) -> bool {
    controls.iter().all(|status| status.satisfied)
}

fn satisfied_count(controls: &[&ControlStatus]) -> usize {
    controls.iter().filter(|status| status.satisfied).count()
}

fn meets_count_and_tag(controls: &[&ControlStatus], min_count: usize, tag: Option<&str>) -> bool {
    if satisfied_count(controls) < min_count {
        return false;
    }
    match tag {
        Some(tag) if !tag.is_empty() => controls
            .iter()
            .any(|status| status.satisfied && status.has_tag(tag)),
        _ => true,
    }
}

/// Walk the tiers most favorable first; the first one fully met wins.
pub(crate) fn determine_rating(
    ratings: &Ratings,
    signals: &RatingSignals<'_>,
) -> (Rating, RatingDetails) {
    for (rating, requirements) in ratings.ordered() {
        match signals.first_failure(requirements) {
            None => {
                debug!(%rating, "tier requirements met");
                return (rating, RatingDetails::Tier(signals.tier_details(rating)));
            }
            Some(check) => debug!(%rating, ?check, "tier requirements not met"),
        }
    }

    (
        Rating::VeryUnfavorable,
        RatingDetails::Fallback(FallbackDetails {
            reason: FALLBACK_REASON.to_string(),
            missing_controls: signals.controls.missing_ids(),
        }),
    )
}
