//! Value types produced by analysis, comparison, and optimization
//!
//! All of these are plain value objects: created by the call that returns
//! them, never mutated afterwards, never shared.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The five fixed evaluation dimensions, each scored 0-100.
pub const DIMENSIONS: [&str; 5] = [
    "clarity",
    "completeness",
    "actionability",
    "standards",
    "context",
];

/// Outcome of scoring one document version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Overall score 0-100; the primary ranking key.
    pub score: f64,
    /// Document size in characters.
    pub file_size: usize,
    /// Per-dimension scores keyed by dimension name (may include "overall").
    pub dimension_scores: BTreeMap<String, f64>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    /// Free-form analysis text; falls back to the raw model output when the
    /// structured section is missing.
    pub detailed_analysis: String,
    /// Present when the document could not be analyzed. An errored result is
    /// invalid for ranking and all other fields are zero/empty.
    pub error: Option<String>,
}

impl AnalysisResult {
    /// Build the invalid-for-ranking form: error message set, score zero,
    /// everything else empty.
    pub fn errored(message: impl Into<String>, file_size: usize) -> Self {
        Self {
            file_size,
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_errored(&self) -> bool {
        self.error.is_some()
    }
}

/// Which side of a comparison won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    A,
    B,
    Tie,
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Winner::A => write!(f, "A"),
            Winner::B => write!(f, "B"),
            Winner::Tie => write!(f, "TIE"),
        }
    }
}

/// One side of a comparison: display name, source path, and its analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionReport {
    pub name: String,
    pub path: PathBuf,
    pub analysis: AnalysisResult,
}

/// Outcome of comparing two document versions.
///
/// `winner` is a strict score comparison: A wins iff `score_a > score_b`,
/// and a tie requires exact equality. `score_delta` is the absolute
/// difference, zero iff tied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub version_a: VersionReport,
    pub version_b: VersionReport,
    pub winner: Winner,
    pub score_delta: f64,
}

/// Outcome of a single rewrite-then-rescore round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationIteration {
    /// 1-based round number.
    pub iteration: u32,
    /// Score after this round's rewrite.
    pub score: f64,
    /// Score the round started from.
    pub previous_score: f64,
    /// `score - previous_score`; negative when the round regressed.
    pub delta: f64,
    /// The rewritten document text this round produced.
    pub content: String,
    pub analysis: AnalysisResult,
}

/// Outcome of a whole optimization run.
///
/// `final_score` is the maximum score across `iterations` and
/// `final_content` is the text of the first iteration achieving it; a
/// later-but-worse round stays in the history but never in the selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub original_score: f64,
    pub final_score: f64,
    /// `final_score - original_score`.
    pub total_improvement: f64,
    /// Chronological round history, one entry per configured iteration.
    pub iterations: Vec<OptimizationIteration>,
    pub original_content: String,
    pub final_content: String,
    /// Where the selected document was persisted.
    pub output_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errored_result_is_zeroed() {
        let result = AnalysisResult::errored("File not found: CLAUDE.md", 0);

        assert_eq!(result.score, 0.0);
        assert_eq!(result.file_size, 0);
        assert!(result.dimension_scores.is_empty());
        assert!(result.strengths.is_empty());
        assert!(result.is_errored());
        assert_eq!(result.error.as_deref(), Some("File not found: CLAUDE.md"));
    }

    #[test]
    fn test_errored_result_keeps_file_size() {
        let result = AnalysisResult::errored("backend error: boom", 1234);
        assert_eq!(result.file_size, 1234);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_winner_display() {
        assert_eq!(Winner::A.to_string(), "A");
        assert_eq!(Winner::B.to_string(), "B");
        assert_eq!(Winner::Tie.to_string(), "TIE");
    }
}
