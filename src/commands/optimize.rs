//! Optimize command: iteratively improve a guidance file

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use gbench_cli::{print_connection_help, Reporter};
use gbench_core::Optimizer;

use super::connect_backend;

#[derive(Args)]
pub struct OptimizeArgs {
    /// Guidance file to optimize
    pub file: PathBuf,

    /// Number of optimization iterations
    #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..=10))]
    pub iterations: u32,

    /// Ollama model to use for optimization
    #[arg(short, long, env = "OLLAMA_MODEL", default_value = "llama3.2:latest")]
    pub model: String,

    /// Ollama API host
    #[arg(long, env = "OLLAMA_HOST", default_value = "http://localhost:11434")]
    pub host: String,

    /// Output path for the optimized file (default: sibling .optimized.md)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(short, long, default_value_t = 180)]
    pub timeout: u64,

    /// Suppress detailed output
    #[arg(short, long)]
    pub quiet: bool,
}

pub async fn run(args: OptimizeArgs) -> Result<()> {
    let client = connect_backend(&args.host, &args.model, args.timeout, args.quiet).await?;

    if !args.quiet {
        println!(
            "{} {} ({} iterations)",
            "Optimizing".cyan().bold(),
            args.file.display(),
            args.iterations
        );
        println!();
    }

    let optimizer = Optimizer::new(client);
    let result = match optimizer
        .optimize(&args.file, args.iterations, args.output.as_deref())
        .await
    {
        Ok(result) => result,
        Err(e) => {
            // The whole run is all-or-nothing; a mid-round backend failure
            // means no partial output exists to report.
            if e.is_connection() {
                print_connection_help(&args.host);
            }
            return Err(e.into());
        }
    };

    if !args.quiet {
        let reporter = Reporter::new(None)?;
        reporter.print_optimization(&result);
    }
    Ok(())
}
