//! Models command: list what the Ollama server has available

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;

use gbench_ollama::{OllamaClient, OllamaConfig};

#[derive(Args)]
pub struct ModelsArgs {
    /// Ollama API host
    #[arg(long, env = "OLLAMA_HOST", default_value = "http://localhost:11434")]
    pub host: String,
}

pub async fn run(args: ModelsArgs) -> Result<()> {
    let config = OllamaConfig::default().with_host(&args.host);
    let client = OllamaClient::new(config)?;

    let mut models = client.list_models().await;
    if models.is_empty() {
        bail!("cannot connect to Ollama at {} or no models available", args.host);
    }
    models.sort();

    println!("{}", "Available models:".bold());
    for name in &models {
        println!("  • {name}");
    }
    println!();
    println!("{}", format!("Total: {} models", models.len()).dimmed());
    Ok(())
}
