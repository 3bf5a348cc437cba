//! CLI subcommands

pub mod audit;
pub mod check;
pub mod compare;
pub mod models;
pub mod optimize;

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Result};
use colored::Colorize;

use gbench_cli::print_connection_help;
use gbench_ollama::{OllamaClient, OllamaConfig};

/// Build a client for the given flags and verify the backend is ready.
///
/// On failure this prints the recovery path (start the server, pull the
/// model) before bailing, so the user never sees a bare error.
pub(crate) async fn connect_backend(
    host: &str,
    model: &str,
    timeout_secs: u64,
    quiet: bool,
) -> Result<OllamaClient> {
    let config = OllamaConfig::default()
        .with_host(host)
        .with_model(model)
        .with_timeout(Duration::from_secs(timeout_secs));
    let client = OllamaClient::new(config)?;

    if !client.check_health().await {
        print_connection_help(host);

        let available = client.list_models().await;
        if !available.is_empty() {
            eprintln!();
            eprintln!("Available models: {}", available.join(", "));
            if !available.iter().any(|name| name == model) {
                eprintln!();
                eprintln!("Model '{model}' not found. Pull it with:");
                eprintln!("  {}", format!("ollama pull {model}").cyan());
            }
        }
        bail!("Ollama is not ready at {host}");
    }

    if !quiet {
        println!("{} Ollama ready (model: {model})", "✓".green());
        println!();
    }
    Ok(client)
}

/// Parent directory name, used as the project name for prompts and display.
pub(crate) fn project_name_for(path: &Path) -> String {
    path.parent()
        .and_then(|parent| parent.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_name_is_parent_directory() {
        assert_eq!(project_name_for(Path::new("/work/demo/CLAUDE.md")), "demo");
    }

    #[test]
    fn test_project_name_without_parent() {
        assert_eq!(project_name_for(Path::new("CLAUDE.md")), "Unknown");
    }
}
