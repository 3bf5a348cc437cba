//! Ollama integration for gbench
//!
//! This crate provides the Ollama implementation of the `LlmProvider` trait:
//! a thin retrying client over the local Ollama text-generation endpoint.

mod client;
mod config;


pub use client::OllamaClient;
pub use config::OllamaConfig;

// Re-export core types for convenience
pub use gbench_core::{Error, LlmProvider, Result};
