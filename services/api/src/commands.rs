use crate::infra::load_evaluator;
use clap::Args;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use vendor_risk::config::AppConfig;
use vendor_risk::error::AppError;
use vendor_risk::rating::{ControlStatus, EvidenceSource, RiskRatingEvaluator};

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Path to a notes file, or the notes text itself
    pub(crate) notes: String,
    /// Rule document to evaluate against (defaults to RISK_RULES_PATH or the standard rules)
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Also write the JSON result to this file
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Print the per-control status table to stderr
    #[arg(long)]
    pub(crate) explain: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV file with `vendor` and `notes` columns
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Rule document to evaluate against (defaults to RISK_RULES_PATH or the standard rules)
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Write the rated CSV here instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run_evaluate(args: EvaluateArgs, config: &AppConfig) -> Result<(), AppError> {
    let EvaluateArgs {
        notes,
        rules,
        output,
        explain,
    } = args;

    let evaluator = load_evaluator(rules, &config.rules)?;
    let notes = read_notes(&notes)?;
    let (rendered, controls) = evaluate_notes(&evaluator, &notes)?;

    if explain {
        eprint!("{}", render_control_table(&controls));
    }
    println!("{rendered}");

    if let Some(path) = output {
        fs::write(&path, format!("{rendered}\n"))?;
        info!(path = %path.display(), "evaluation written");
    }

    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs, config: &AppConfig) -> Result<(), AppError> {
    let BatchArgs {
        input,
        rules,
        output,
    } = args;

    let evaluator = load_evaluator(rules, &config.rules)?;
    let summary = evaluator.evaluate_csv_path(&input)?;

    match output {
        Some(path) => {
            summary.write_csv(fs::File::create(&path)?)?;
            info!(
                path = %path.display(),
                vendors = summary.rows.len(),
                "batch ratings written"
            );
        }
        None => summary.write_csv(io::stdout().lock())?,
    }

    for (rating, count) in &summary.tally {
        eprintln!("{rating}: {count}");
    }

    Ok(())
}

/// Treat the argument as a file when one exists at that path.
pub(crate) fn read_notes(raw: &str) -> io::Result<String> {
    let path = Path::new(raw);
    if path.is_file() {
        fs::read_to_string(path)
    } else {
        Ok(raw.to_string())
    }
}

pub(crate) fn evaluate_notes(
    evaluator: &RiskRatingEvaluator,
    notes: &str,
) -> Result<(String, Vec<ControlStatus>), AppError> {
    let trace = evaluator.trace(notes);
    let rendered = serde_json::to_string_pretty(&trace.result)?;
    info!(rating = %trace.result.rating, "notes evaluated");
    Ok((rendered, trace.controls))
}

pub(crate) fn render_control_table(controls: &[ControlStatus]) -> String {
    let mut table = String::new();
    let _ = writeln!(
        table,
        "{:<40} {:<32} {:<9} {:<10} evidence",
        "control", "category", "required", "satisfied"
    );
    for status in controls {
        let _ = writeln!(
            table,
            "{:<40} {:<32} {:<9} {:<10} {}",
            status.control_id,
            status.category.label(),
            yes_no(status.required),
            yes_no(status.satisfied),
            evidence_label(status.evidence)
        );
    }
    table
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn evidence_label(evidence: EvidenceSource) -> &'static str {
    match evidence {
        EvidenceSource::Direct => "direct",
        EvidenceSource::CrossSatisfied => "cross-satisfied",
        EvidenceSource::Waived => "waived",
        EvidenceSource::None => "-",
    }
}
