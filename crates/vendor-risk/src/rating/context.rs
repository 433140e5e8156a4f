use super::document::Conditions;
use super::domain::VendorContext;
use super::normalizer::Corpus;

/// Phrases identifying a vendor that builds or hosts software.
pub const SOFTWARE_PROVIDER_KEYWORDS: [&str; 9] = [
    "software provider",
    "software development",
    "develops software",
    "developing software",
    "builds software",
    "provides software",
    "saas",
    "platform as a service",
    "application development",
];

pub(crate) fn resolve_context(corpus: &Corpus, conditions: &Conditions) -> VendorContext {
    let handles_pii = conditions
        .logical_access_controls
        .pii_positive_statements
        .iter()
        .any(|statement| corpus.statement_present(statement));

    let remote_statement = &conditions.remote_workforce.enforce_only_if_remote_work_allowed;
    let remote_work_allowed =
        !remote_statement.is_empty() && corpus.statement_present(remote_statement);

    let software_provider = SOFTWARE_PROVIDER_KEYWORDS
        .iter()
        .any(|phrase| corpus.contains(phrase));

    VendorContext {
        handles_pii,
        remote_work_allowed,
        software_provider,
    }
}
