use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};
use vendor_risk::config::RulesConfig;
use vendor_risk::error::AppError;
use vendor_risk::rating::RiskRatingEvaluator;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Resolve the rule document: `--rules` flag, then `RISK_RULES_PATH`, then the
/// embedded standard rules. A flag pointing at a missing file is ignored.
pub(crate) fn load_evaluator(
    cli_rules: Option<PathBuf>,
    config: &RulesConfig,
) -> Result<RiskRatingEvaluator, AppError> {
    let flagged = cli_rules.filter(|path| {
        let exists = path.is_file();
        if !exists {
            warn!(path = %path.display(), "rules file not found; using configured rules");
        }
        exists
    });

    match flagged.or_else(|| config.path.clone()) {
        Some(path) => {
            let evaluator = RiskRatingEvaluator::from_path(&path)?;
            info!(path = %path.display(), "loaded rule document");
            Ok(evaluator)
        }
        None => Ok(RiskRatingEvaluator::standard()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use vendor_risk::rating::RuleDocument;

    fn rules_file(document: &RuleDocument) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        let raw = serde_json::to_string(document).expect("rules serialize");
        file.write_all(raw.as_bytes()).expect("rules written");
        file
    }

    #[test]
    fn defaults_to_standard_rules() {
        let evaluator =
            load_evaluator(None, &RulesConfig { path: None }).expect("standard rules load");
        assert_eq!(evaluator.rules(), &RuleDocument::standard());
    }

    #[test]
    fn flag_takes_precedence_over_config() {
        let mut custom = RuleDocument::standard();
        custom.catalog.incident_response_elements = vec!["tabletop exercise".to_string()];
        let flagged = rules_file(&custom);

        let evaluator = load_evaluator(
            Some(flagged.path().to_path_buf()),
            &RulesConfig {
                path: Some(PathBuf::from("/nonexistent/rules.json")),
            },
        )
        .expect("flagged rules load");

        assert_eq!(
            evaluator.rules().catalog.incident_response_elements,
            vec!["tabletop exercise".to_string()]
        );
    }

    #[test]
    fn missing_flag_path_falls_back_to_config() {
        let mut custom = RuleDocument::standard();
        custom.catalog.incident_response_elements.clear();
        let configured = rules_file(&custom);

        let evaluator = load_evaluator(
            Some(PathBuf::from("./no-such-rules.json")),
            &RulesConfig {
                path: Some(configured.path().to_path_buf()),
            },
        )
        .expect("configured rules load");

        assert!(evaluator.rules().catalog.incident_response_elements.is_empty());
    }

    #[test]
    fn unreadable_configured_rules_are_an_error() {
        let error = load_evaluator(
            None,
            &RulesConfig {
                path: Some(PathBuf::from("./no-such-rules.json")),
            },
        )
        .expect_err("configured path must exist");
        assert!(matches!(error, AppError::Rules(_)));
    }
}
