use super::normalizer::Corpus;
use super::overrides::OverrideTable;

/// Tail phrases shorter than this many words are too generic to count as evidence.
const MIN_TAIL_WORDS: usize = 2;

/// Decide whether the notes contain direct evidence for a control.
///
/// Checks, in order: the control text, the raw identifier, then the identifier's
/// tail segments as a phrase (`lac_mfa_critical_or_pii` -> "mfa critical or pii").
/// A negating statement registered for the control voids any positive match.
pub(crate) fn control_satisfied_by_text(
    corpus: &Corpus,
    overrides: &OverrideTable,
    control_id: &str,
    control_text: &str,
) -> bool {
    let positive = corpus.statement_present(control_text)
        || (!control_id.is_empty() && corpus.contains(control_id))
        || tail_phrase(control_id).is_some_and(|phrase| corpus.contains(&phrase));

    if !positive {
        return false;
    }

    !overrides
        .negations(control_id)
        .any(|negative| corpus.statement_present(negative))
}

fn tail_phrase(control_id: &str) -> Option<String> {
    let segments: Vec<&str> = control_id
        .split('_')
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.len() <= MIN_TAIL_WORDS {
        return None;
    }

    Some(segments[1..].join(" ").to_lowercase())
}
