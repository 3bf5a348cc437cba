//! Audit command: analyze a single guidance file

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;

use gbench_cli::Reporter;
use gbench_core::DocumentAnalyzer;

use super::{connect_backend, project_name_for};

#[derive(Args)]
pub struct AuditArgs {
    /// Path to the guidance file to audit
    pub file: PathBuf,

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

pub async fn run(args: AuditArgs) -> Result<()> {
    let project_name = project_name_for(&args.file);
    let client = connect_backend(&args.host, &args.model, args.timeout, args.quiet).await?;

    let analyzer = DocumentAnalyzer::new(client);
    let result = analyzer.analyze(&args.file, &project_name).await;

    if let Some(error) = &result.error {
        bail!("analyzing {} failed: {error}", args.file.display());
    }

    let reporter = Reporter::new(args.output_dir.clone())?;
    if !args.quiet {
        reporter.print_audit(&result, &args.file);
    }

    let report_path = reporter.save_audit_report(&result, &args.file)?;
    println!();
    println!("{}", "Report saved:".bold());
    println!("  {}", report_path.display().to_string().cyan());
    Ok(())
}
