use super::normalizer::Corpus;
use std::collections::BTreeSet;

/// Statements from `vocabulary` found verbatim in the notes.
///
/// Used for incident-response elements and information-technology overview
/// facts; no identifier fallbacks apply.
pub(crate) fn collect_present(corpus: &Corpus, vocabulary: &[String]) -> BTreeSet<String> {
    vocabulary
        .iter()
        .filter(|statement| corpus.statement_present(statement))
        .cloned()
        .collect()
}
