//! Compare command: judge two guidance files against each other

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;

use gbench_cli::Reporter;
use gbench_core::DocumentAnalyzer;

use super::{connect_backend, project_name_for};

#[derive(Args)]
pub struct CompareArgs {
    /// First guidance file to compare
    pub file_a: PathBuf,

    /// Second guidance file to compare
    pub file_b: PathBuf,

    /// Display name for the first version
    #[arg(long)]
    pub name_a: Option<String>,

    /// Display name for the second version
    #[arg(long)]
    pub name_b: Option<String>,

    /// Ollama model to use for analysis
    #[arg(short, long, env = "OLLAMA_MODEL", default_value = "llama3.2:latest")]
    pub model: String,

    /// Ollama API host
    #[arg(long, env = "OLLAMA_HOST", default_value = "http://localhost:11434")]
    pub host: String,

    /// Directory for saving reports
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(short, long, default_value_t = 120)]
    pub timeout: u64,

    /// Suppress console output (only save reports)
    #[arg(short, long)]
    pub quiet: bool,
}

pub async fn run(args: CompareArgs) -> Result<()> {
    let name_a = args
        .name_a
        .clone()
        .unwrap_or_else(|| project_name_for(&args.file_a));
    let name_b = args
        .name_b
        .clone()
        .unwrap_or_else(|| project_name_for(&args.file_b));

    let client = connect_backend(&args.host, &args.model, args.timeout, args.quiet).await?;

    let analyzer = DocumentAnalyzer::new(client);
    let result = analyzer
        .compare(&args.file_a, &args.file_b, &name_a, &name_b)
        .await;

    // Either side failing to analyze is fatal for presentation.
    if let Some(error) = &result.version_a.analysis.error {
        bail!("analyzing {} failed: {error}", args.file_a.display());
    }
    if let Some(error) = &result.version_b.analysis.error {
        bail!("analyzing {} failed: {error}", args.file_b.display());
    }

    let reporter = Reporter::new(args.output_dir.clone())?;
    if !args.quiet {
        reporter.print_comparison(&result);
    }

    let report_path = reporter.save_comparison_report(&result)?;
    println!();
    println!("{}", "Report saved:".bold());
    println!("  {}", report_path.display().to_string().cyan());
    Ok(())
}
