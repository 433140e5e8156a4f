use regex::Regex;
use std::sync::OnceLock;

const MISENCODED_ELLIPSIS: &str = "\u{e2}\u{20ac}\u{a6}";

/// Lower-case, repair the mis-encoded ellipsis, and collapse whitespace runs.
///
/// The ASCII information separators (U+001C..U+001F) count as whitespace too.
pub(crate) fn normalize(value: &str) -> String {
    let lowered = value.to_lowercase().replace(MISENCODED_ELLIPSIS, "...");
    whitespace_run()
        .replace_all(&lowered, " ")
        .trim_matches(' ')
        .to_string()
}

/// Normalized notes that every statement check runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Corpus(String);

impl Corpus {
    pub(crate) fn new(raw: &str) -> Self {
        Self(normalize(raw))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw substring test, without normalizing the needle.
    pub(crate) fn contains(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }

    /// True when the normalized statement occurs contiguously in the notes.
    pub(crate) fn statement_present(&self, statement: &str) -> bool {
        let normalized = normalize(statement);
        !normalized.is_empty() && self.0.contains(&normalized)
    }

    /// Notes that explicitly mark the questionnaire as not applicable.
    pub(crate) fn declares_not_applicable(&self) -> bool {
        self.0.contains("not applicable") || standalone_na().is_match(&self.0)
    }
}

fn whitespace_run() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[\s\x1C-\x1F]+").expect("static pattern compiles"))
}

fn standalone_na() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\bn/a\b").expect("static pattern compiles"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_case_and_whitespace() {
        let normalized = normalize("  Access  is\tGranted\n\nbased on   LEAST privilege  ");
        assert_eq!(normalized, "access is granted based on least privilege");
    }

    #[test]
    fn normalize_repairs_misencoded_ellipsis() {
        assert_eq!(normalize("Pending review\u{e2}\u{20ac}\u{a6}"), "pending review...");
    }

    #[test]
    fn normalize_collapses_separator_controls_and_unicode_spaces() {
        assert_eq!(
            normalize("\u{1c}Firewalls\u{1f}are\u{a0}\u{2003}deployed\u{1e}"),
            "firewalls are deployed"
        );
    }

    #[test]
    fn normalize_is_total_on_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t "), "");
    }

    #[test]
    fn statement_present_normalizes_both_sides() {
        let corpus = Corpus::new("Vendor notes: PII is   ENCRYPTED at rest.");
        assert!(corpus.statement_present("pii is encrypted at rest"));
        assert!(corpus.statement_present("  PII IS ENCRYPTED\nAT REST "));
        assert!(!corpus.statement_present("pii is encrypted in transit"));
    }

    #[test]
    fn empty_statement_is_never_present() {
        let corpus = Corpus::new("anything at all");
        assert!(!corpus.statement_present(""));
        assert!(!corpus.statement_present("   "));
    }

    #[test]
    fn not_applicable_detection_requires_standalone_token() {
        assert!(Corpus::new("N/A").declares_not_applicable());
        assert!(Corpus::new("Section is Not Applicable to this vendor").declares_not_applicable());
        assert!(Corpus::new("status: n/a.").declares_not_applicable());
        assert!(!Corpus::new("dn/abc").declares_not_applicable());
        assert!(!Corpus::new("the vendor stores pii").declares_not_applicable());
    }
}
