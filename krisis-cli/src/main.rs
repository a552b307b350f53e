//! Krisis CLI - golden-set evaluation gate

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use krisis_core::config::EvalConfig;
use krisis_core::eval::{EvalHarness, hygiene, load_cases};

#[derive(Parser)]
#[command(name = "krisis")]
#[command(about = "Deterministic routing evaluation gate", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay the golden set and apply the pass-rate gate
    Run {
        /// Path to the JSONL golden set
        #[arg(short, long, default_value = "tests.jsonl")]
        cases: PathBuf,

        /// Where to write the JSON report
        #[arg(short, long, default_value = "report.json")]
        report: PathBuf,

        /// Override the configured pass-rate threshold (0.0 to 1.0)
        #[arg(short, long)]
        threshold: Option<f64>,
    },
    /// Check the golden set for hygiene violations
    Hygiene {
        /// Path to the JSONL golden set
        #[arg(short, long, default_value = "tests.jsonl")]
        cases: PathBuf,
    },
    /// Version information
    Version,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Version => {
            println!("krisis {}", env!("CARGO_PKG_VERSION"));
            println!("krisis-core {}", krisis_core::VERSION);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Run {
            cases,
            report,
            threshold,
        } => run_gate(cases, report, threshold).await,
        Commands::Hygiene { cases } => run_hygiene(cases),
    }
}

async fn run_gate(
    cases_path: PathBuf,
    report_path: PathBuf,
    threshold: Option<f64>,
) -> Result<ExitCode> {
    let mut config = EvalConfig::load()?;
    if let Some(threshold) = threshold {
        config = config.with_threshold(threshold);
        config.validate()?;
    }

    let cases = load_cases(&cases_path)
        .with_context(|| format!("failed to load golden set from {}", cases_path.display()))?;
    tracing::info!(count = cases.len(), path = %cases_path.display(), "loaded golden set");

    let harness = EvalHarness::with_config(config);
    let run_report = harness.run(&cases).await?;

    print!("{}", run_report.render_text());

    run_report
        .save(&report_path)
        .with_context(|| format!("failed to write report to {}", report_path.display()))?;
    println!("\nWrote {}", report_path.display());

    // Binary gate: the exit code is derived solely from the pass flag.
    if run_report.passed {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn run_hygiene(cases_path: PathBuf) -> Result<ExitCode> {
    let cases = load_cases(&cases_path)
        .with_context(|| format!("failed to load golden set from {}", cases_path.display()))?;

    let violations = hygiene::check_cases(&cases);
    if violations.is_empty() {
        println!("Hygiene PASS ({} cases)", cases.len());
        return Ok(ExitCode::SUCCESS);
    }

    println!("Hygiene FAIL:");
    for violation in &violations {
        println!("  {}", violation);
    }
    Ok(ExitCode::FAILURE)
}
