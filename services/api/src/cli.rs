use crate::commands::{run_batch, run_evaluate, BatchArgs, EvaluateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use vendor_risk::config::AppConfig;
use vendor_risk::error::AppError;
use vendor_risk::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "vendor-risk",
    about = "Rate vendor security posture from analyst notes",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Rate one vendor from a notes file or inline text
    Evaluate(EvaluateArgs),
    /// Rate every vendor in a CSV file
    Batch(BatchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Rule document to serve (defaults to RISK_RULES_PATH or the standard rules)
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match command {
        Command::Serve(args) => server::run(args, config).await,
        Command::Evaluate(args) => run_evaluate(args, &config),
        Command::Batch(args) => run_batch(args, &config),
    }
}
