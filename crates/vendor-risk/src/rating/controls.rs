use super::document::{Catalog, ControlCategory, ControlDefinition};
use super::domain::VendorContext;
use super::matcher::control_satisfied_by_text;
use super::normalizer::Corpus;
use super::overrides::OverrideTable;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Where a control's satisfaction came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceSource {
    Direct,
    CrossSatisfied,
    Waived,
    None,
}

/// Per-evaluation status of one catalog control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlStatus {
    pub control_id: String,
    pub category: ControlCategory,
    pub required: bool,
    pub satisfied: bool,
    pub tags: Vec<String>,
    pub evidence: EvidenceSource,
}

impl ControlStatus {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate == tag)
    }

    pub fn is_missing(&self) -> bool {
        self.required && !self.satisfied
    }
}

/// Control statuses in catalog order with lookup by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlStatusMap {
    entries: Vec<ControlStatus>,
    index: HashMap<String, usize>,
}

impl ControlStatusMap {
    fn push(&mut self, status: ControlStatus) {
        self.index
            .insert(status.control_id.clone(), self.entries.len());
        self.entries.push(status);
    }

    pub fn get(&self, control_id: &str) -> Option<&ControlStatus> {
        self.index.get(control_id).map(|&position| &self.entries[position])
    }

    fn get_mut(&mut self, control_id: &str) -> Option<&mut ControlStatus> {
        let position = *self.index.get(control_id)?;
        self.entries.get_mut(position)
    }

    pub fn is_satisfied(&self, control_id: &str) -> bool {
        self.get(control_id).is_some_and(|status| status.satisfied)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ControlStatus> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Required controls of one category.
    pub fn required_in(
        &self,
        category: ControlCategory,
    ) -> impl Iterator<Item = &ControlStatus> + '_ {
        self.entries
            .iter()
            .filter(move |status| status.category == category && status.required)
    }

    pub fn satisfied_required_ids(&self) -> Vec<String> {
        sorted_ids(self.entries.iter().filter(|s| s.required && s.satisfied))
    }

    pub fn missing_ids(&self) -> Vec<String> {
        sorted_ids(self.entries.iter().filter(|s| s.is_missing()))
    }

    pub fn into_vec(self) -> Vec<ControlStatus> {
        self.entries
    }
}

fn sorted_ids<'a>(statuses: impl Iterator<Item = &'a ControlStatus>) -> Vec<String> {
    let mut ids: Vec<String> = statuses.map(|s| s.control_id.clone()).collect();
    ids.sort();
    ids
}

/// Inputs shared by every control check in one evaluation.
pub(crate) struct ControlEvaluation<'a> {
    pub(crate) corpus: &'a Corpus,
    pub(crate) context: VendorContext,
    pub(crate) cross_satisfied: &'a BTreeSet<String>,
    pub(crate) overrides: &'a OverrideTable,
}

impl ControlEvaluation<'_> {
    /// Resolve every catalog control, then apply waivers between controls.
    pub(crate) fn evaluate(&self, catalog: &Catalog) -> ControlStatusMap {
        let mut statuses = ControlStatusMap::default();
        for (category, control) in catalog.controls() {
            statuses.push(self.check_control(category, control));
        }
        self.apply_waivers(&mut statuses);
        statuses
    }

    fn check_control(&self, category: ControlCategory, control: &ControlDefinition) -> ControlStatus {
        let required = self.is_required(category, &control.id);

        let evidence = if self.cross_satisfied.contains(&control.id) {
            EvidenceSource::CrossSatisfied
        } else if control_satisfied_by_text(self.corpus, self.overrides, &control.id, &control.text)
        {
            EvidenceSource::Direct
        } else {
            EvidenceSource::None
        };

        ControlStatus {
            control_id: control.id.clone(),
            category,
            required,
            satisfied: evidence != EvidenceSource::None,
            tags: control.tags.clone(),
            evidence,
        }
    }

    fn is_required(&self, category: ControlCategory, control_id: &str) -> bool {
        let context = self.context;
        match category {
            ControlCategory::LogicalAccess | ControlCategory::NetworkPii => {
                context.handles_pii || !self.overrides.requires_pii(control_id)
            }
            ControlCategory::Network | ControlCategory::BusinessContinuity => true,
            ControlCategory::ChangeManagement => context.software_provider,
            ControlCategory::RemoteWorkforce => context.remote_work_allowed,
        }
    }

    fn apply_waivers(&self, statuses: &mut ControlStatusMap) {
        let waived: Vec<String> = statuses
            .iter()
            .filter(|status| {
                self.overrides
                    .waiver(&status.control_id)
                    .is_some_and(|source| statuses.is_satisfied(source))
            })
            .map(|status| status.control_id.clone())
            .collect();

        for control_id in waived {
            if let Some(status) = statuses.get_mut(&control_id) {
                status.required = false;
                status.satisfied = true;
                status.evidence = EvidenceSource::Waived;
            }
        }
    }
}
