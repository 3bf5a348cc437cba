//! Check command: verify Ollama connectivity and model availability

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;

use gbench_cli::print_connection_help;
use gbench_ollama::{OllamaClient, OllamaConfig};

#[derive(Args)]
pub struct CheckArgs {
    /// Ollama API host
    #[arg(long, env = "OLLAMA_HOST", default_value = "http://localhost:11434")]
    pub host: String,

    /// Check whether a specific model is available
    #[arg(short, long)]
    pub model: Option<String>,
}

pub async fn run(args: CheckArgs) -> Result<()> {
    println!("Checking Ollama at {}...", args.host.cyan());
    println!();

    let config = OllamaConfig::default().with_host(&args.host);
    let client = OllamaClient::new(config)?;

    let models = client.list_models().await;
    if models.is_empty() {
        print_connection_help(&args.host);
        bail!("cannot connect to Ollama at {}", args.host);
    }

    println!("{} Ollama is running", "✓".green());
    println!();
    println!("{}", "Available models:".bold());

    let mut sorted = models.clone();
    sorted.sort();
    for name in &sorted {
        if Some(name) == args.model.as_ref() {
            println!("  {} {}", name.cyan(), "✓ selected".green());
        } else {
            println!("  {name}");
        }
    }

    if let Some(model) = &args.model {
        if models.iter().any(|name| name == model) {
            println!();
            println!("{} Model '{model}' is available", "✓".green());
        } else {
            println!();
            println!("{} Model '{model}' not found", "⚠".yellow());
            println!("Pull it with: {}", format!("ollama pull {model}").cyan());
            bail!("model '{model}' is not available");
        }
    }
    Ok(())
}
