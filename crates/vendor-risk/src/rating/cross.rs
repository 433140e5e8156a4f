use super::document::CrossSatisfactionRule;
use super::normalizer::Corpus;
use std::collections::BTreeSet;
use tracing::debug;

/// Controls granted satisfaction because a related statement was found.
pub(crate) fn cross_satisfied_controls(
    corpus: &Corpus,
    rules: &[CrossSatisfactionRule],
) -> BTreeSet<String> {
    let mut satisfied = BTreeSet::new();

    for rule in rules {
        let trigger = rule
            .if_any_statement_present
            .iter()
            .find(|statement| corpus.statement_present(statement));

        if let Some(trigger) = trigger {
            debug!(%trigger, controls = ?rule.then_mark_controls_met, "cross-satisfaction applied");
            satisfied.extend(rule.then_mark_controls_met.iter().cloned());
        }
    }

    satisfied
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(triggers: &[&str], controls: &[&str]) -> CrossSatisfactionRule {
        CrossSatisfactionRule {
            if_any_statement_present: triggers.iter().map(|s| s.to_string()).collect(),
            then_mark_controls_met: controls.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn any_trigger_marks_all_targets() {
        let rules = vec![rule(
            &["soc 2 type ii report", "iso 27001 certified"],
            &["lac_access_reviews", "net_logging_monitoring"],
        )];
        let satisfied =
            cross_satisfied_controls(&Corpus::new("The vendor is ISO 27001 certified."), &rules);

        assert_eq!(
            satisfied.into_iter().collect::<Vec<_>>(),
            vec!["lac_access_reviews", "net_logging_monitoring"]
        );
    }

    #[test]
    fn rules_accumulate_independently_of_order() {
        let first = rule(&["alpha"], &["a_one", "shared"]);
        let second = rule(&["beta"], &["b_one", "shared"]);
        let corpus = Corpus::new("alpha and beta");

        let forward = cross_satisfied_controls(&corpus, &[first.clone(), second.clone()]);
        let reverse = cross_satisfied_controls(&corpus, &[second, first]);

        assert_eq!(forward, reverse);
        assert_eq!(forward.len(), 3);
    }

    #[test]
    fn no_trigger_yields_empty_set() {
        let rules = vec![rule(&["soc 2"], &["lac_access_reviews"]), rule(&[""], &["x"])];
        assert!(cross_satisfied_controls(&Corpus::new("nothing"), &rules).is_empty());
    }
}
