//! gbench - benchmark and optimize project guidance files with local LLMs

mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gbench")]
#[command(version)]
#[command(about = "Benchmark and optimize project guidance files for AI coding assistants")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit a single guidance file for quality and completeness
    Audit(commands::audit::AuditArgs),
    /// Compare two guidance files and determine which is better
    Compare(commands::compare::CompareArgs),
    /// Iteratively improve a guidance file using meta-prompting
    Optimize(commands::optimize::OptimizeArgs),
    /// Check Ollama connectivity and available models
    Check(commands::check::CheckArgs),
    /// List available Ollama models
    Models(commands::models::ModelsArgs),
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.debug);

    let outcome = match cli.command {
        Commands::Audit(args) => commands::audit::run(args).await,
        Commands::Compare(args) => commands::compare::run(args).await,
        Commands::Optimize(args) => commands::optimize::run(args).await,
        Commands::Check(args) => commands::check::run(args).await,
        Commands::Models(args) => commands::models::run(args).await,
    };

    if let Err(e) = outcome {
        eprintln!("{} {e}", "Error:".red().bold());
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool, debug: bool) {
    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "gbench={level},gbench_core={level},gbench_ollama={level},gbench_cli={level}"
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
