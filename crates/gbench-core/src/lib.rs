//! Core evaluation and optimization loop for gbench
//!
//! This crate holds everything that makes gbench tick: the value types for
//! analysis and optimization outcomes, the error taxonomy, the `LlmProvider`
//! trait that abstracts over inference backends, the lenient parser for
//! free-text evaluation replies, and the analyzer/optimizer built on top of
//! them. Presentation and transport live in sibling crates.

pub mod analyzer;
pub mod error;
pub mod llm;
pub mod optimizer;
pub mod parser;
pub mod types;

pub use analyzer::DocumentAnalyzer;
pub use error::{Error, Result};
pub use llm::LlmProvider;
pub use optimizer::{MetaPrompter, Optimizer};
pub use types::{
    AnalysisResult, ComparisonResult, OptimizationIteration, OptimizationResult, VersionReport,
    Winner, DIMENSIONS,
};
