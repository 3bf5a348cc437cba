//! Guidance file analyzer
//!
//! Scores a guidance document on the five fixed dimensions by prompting the
//! inference backend and parsing its reply, and compares two documents by
//! running two fully independent analyses.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, info};

use crate::llm::LlmProvider;
use crate::parser;
use crate::types::{AnalysisResult, ComparisonResult, VersionReport, Winner};

/// Document content beyond this many characters is cut from the evaluation
/// prompt, with a notice, to keep prompts bounded.
const MAX_CONTENT_CHARS: usize = 4000;

/// Low temperature biases the judge toward consistent scoring.
const ANALYSIS_TEMPERATURE: f32 = 0.3;

const SYSTEM_PROMPT: &str = "\
You are an expert at evaluating project guidance files (CLAUDE.md, AGENTS.md) for AI coding assistants.

A good guidance file should:
1. **Be Clear & Specific**: Explicit commands, patterns, and examples
2. **Cover Key Areas**: Testing, quality checks, architecture, common pitfalls
3. **Be Actionable**: Concrete instructions, not vague guidelines
4. **Include Standards**: TDD workflow, type safety, code quality requirements
5. **Provide Context**: Project structure, common commands, troubleshooting

Evaluate files on these dimensions and provide constructive feedback.";

/// Analyzes and compares guidance files for effectiveness.
pub struct DocumentAnalyzer<P: LlmProvider> {
    provider: P,
}

impl<P: LlmProvider> DocumentAnalyzer<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Analyze a single guidance file for quality and completeness.
    ///
    /// Always returns a displayable result: a missing or unreadable file,
    /// and any backend failure, come back as an errored [`AnalysisResult`]
    /// rather than an `Err`, so compare and batch flows can report per-side
    /// failures uniformly.
    pub async fn analyze(&self, path: &Path, project_name: &str) -> AnalysisResult {
        info!("analyzing {}", path.display());

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return AnalysisResult::errored(format!("File not found: {}", path.display()), 0);
            }
            Err(e) => {
                return AnalysisResult::errored(
                    format!("Cannot read {}: {}", path.display(), e),
                    0,
                );
            }
        };
        let file_size = content.chars().count();

        let prompt = build_analysis_prompt(&content, project_name);

        match self
            .provider
            .generate(&prompt, Some(SYSTEM_PROMPT), ANALYSIS_TEMPERATURE)
            .await
        {
            Ok(response) => {
                debug!("raw response head: {}", response.chars().take(200).collect::<String>());
                let result = parser::parse_analysis(&response, file_size);
                info!("analysis complete: score={:.1}/100", result.score);
                result
            }
            Err(e) => AnalysisResult::errored(e.to_string(), file_size),
        }
    }

    /// Compare two guidance files with two independent analyses.
    ///
    /// Each document is judged without seeing the other; the winner is a
    /// strict score comparison with no tolerance band. A side that failed to
    /// analyze still appears in the result, carrying its error, and the
    /// presentation layer decides whether that is fatal.
    pub async fn compare(
        &self,
        path_a: &Path,
        path_b: &Path,
        name_a: &str,
        name_b: &str,
    ) -> ComparisonResult {
        info!("comparing {} vs {}", path_a.display(), path_b.display());

        let analysis_a = self.analyze(path_a, name_a).await;
        let analysis_b = self.analyze(path_b, name_b).await;

        let (winner, score_delta) = if analysis_a.score > analysis_b.score {
            (Winner::A, analysis_a.score - analysis_b.score)
        } else if analysis_b.score > analysis_a.score {
            (Winner::B, analysis_b.score - analysis_a.score)
        } else {
            (Winner::Tie, 0.0)
        };

        ComparisonResult {
            version_a: VersionReport {
                name: name_a.to_string(),
                path: path_a.to_path_buf(),
                analysis: analysis_a,
            },
            version_b: VersionReport {
                name: name_b.to_string(),
                path: path_b.to_path_buf(),
                analysis: analysis_b,
            },
            winner,
            score_delta,
        }
    }
}

/// Build the evaluation prompt: document stats, project context, and the
/// content itself truncated to [`MAX_CONTENT_CHARS`].
fn build_analysis_prompt(content: &str, project_name: &str) -> String {
    let char_count = content.chars().count();
    let line_count = content.split('\n').count();

    let mut shown: String = content.chars().take(MAX_CONTENT_CHARS).collect();
    if char_count > MAX_CONTENT_CHARS {
        shown.push_str(&format!(
            "\n\n[... truncated, {} more chars ...]",
            char_count - MAX_CONTENT_CHARS
        ));
    }

    format!(
        "# Guidance File Analysis

## Project Context
**Project**: {project_name}
**File Size**: {char_count} characters, {line_count} lines

## File Content
```markdown
{shown}
```

## Your Task

Analyze this guidance file and provide scores (0-100) for:

1. **Clarity** (0-100): Are instructions clear and specific?
2. **Completeness** (0-100): Covers all essential areas?
3. **Actionability** (0-100): Provides concrete, executable guidance?
4. **Standards** (0-100): Enforces quality standards (TDD, types, testing)?
5. **Context** (0-100): Adequate project context and structure?

Then provide:
- **Overall Score** (0-100): Weighted average
- **Strengths**: What this file does well (3-5 points)
- **Weaknesses**: What could be improved (3-5 points)
- **Recommendations**: Specific improvements (3-5 points)

Format your response as:

CLARITY: <score 0-100>
COMPLETENESS: <score 0-100>
ACTIONABILITY: <score 0-100>
STANDARDS: <score 0-100>
CONTEXT: <score 0-100>
OVERALL: <score 0-100>

STRENGTHS:
- <strength 1>
- <strength 2>
- <strength 3>

WEAKNESSES:
- <weakness 1>
- <weakness 2>
- <weakness 3>

RECOMMENDATIONS:
- <recommendation 1>
- <recommendation 2>
- <recommendation 3>

DETAILED_ANALYSIS:
<Your detailed analysis here>
"
    )
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::llm::test_support::ScriptedProvider;
    use crate::Error;

    const SCORED_RESPONSE: &str = "\
CLARITY: 85
COMPLETENESS: 70
ACTIONABILITY: 80
STANDARDS: 90
CONTEXT: 75
OVERALL: 80

STRENGTHS:
- Clear build commands
- Good testing standards

WEAKNESSES:
- Missing architecture documentation

RECOMMENDATIONS:
- Add architecture overview

DETAILED_ANALYSIS:
Solid foundations.
";

    fn sample_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".md")
            .tempfile()
            .expect("create temp file");
        file.write_all(content.as_bytes()).expect("write temp file");
        file
    }

    #[tokio::test]
    async fn test_analyze_returns_scored_result() {
        let file = sample_file("# CLAUDE.md\n\n## Build\nnpm run build\n");
        let analyzer = DocumentAnalyzer::new(ScriptedProvider::with_response(SCORED_RESPONSE));

        let result = analyzer.analyze(file.path(), "Test Project").await;

        assert!(result.error.is_none());
        assert_eq!(result.score, 80.0);
        assert!(result.file_size > 0);
        assert_eq!(result.dimension_scores.len(), 6);
        assert!(!result.strengths.is_empty());
    }

    #[tokio::test]
    async fn test_analyze_missing_file_returns_errored_result() {
        let analyzer = DocumentAnalyzer::new(ScriptedProvider::with_response(SCORED_RESPONSE));

        let result = analyzer
            .analyze(Path::new("/nonexistent/CLAUDE.md"), "Test Project")
            .await;

        assert_eq!(result.score, 0.0);
        assert_eq!(result.file_size, 0);
        let message = result.error.expect("error message set");
        assert!(message.contains("File not found"));
    }

    #[tokio::test]
    async fn test_analyze_absorbs_backend_errors() {
        let file = sample_file("# CLAUDE.md\n");
        let provider = ScriptedProvider::with_sequence(vec![Err(Error::Connection(
            "cannot connect to ollama".into(),
        ))]);
        let analyzer = DocumentAnalyzer::new(provider);

        let result = analyzer.analyze(file.path(), "Test Project").await;

        assert_eq!(result.score, 0.0);
        assert!(result.error.expect("error set").contains("connection error"));
    }

    #[tokio::test]
    async fn test_compare_picks_higher_score() {
        let file_a = sample_file("# CLAUDE.md\n\nRich guidance.\n");
        let file_b = sample_file("# CLAUDE.md\n\nThin.\n");
        let provider = ScriptedProvider::with_sequence(vec![
            Ok("OVERALL: 87\n".to_string()),
            Ok("OVERALL: 60\n".to_string()),
        ]);
        let analyzer = DocumentAnalyzer::new(provider.clone());

        let result = analyzer
            .compare(file_a.path(), file_b.path(), "Project A", "Project B")
            .await;

        assert_eq!(result.winner, Winner::A);
        assert_eq!(result.score_delta, 27.0);
        assert_eq!(result.version_a.name, "Project A");
        assert_eq!(result.version_b.name, "Project B");
        // Two fully independent evaluations, one per side.
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_compare_equal_scores_is_tie() {
        let file_a = sample_file("# CLAUDE.md\n");
        let file_b = sample_file("# AGENTS.md\n");
        let provider = ScriptedProvider::with_sequence(vec![
            Ok("OVERALL: 75\n".to_string()),
            Ok("OVERALL: 75\n".to_string()),
        ]);
        let analyzer = DocumentAnalyzer::new(provider);

        let result = analyzer
            .compare(file_a.path(), file_b.path(), "A", "B")
            .await;

        assert_eq!(result.winner, Winner::Tie);
        assert_eq!(result.score_delta, 0.0);
    }

    #[tokio::test]
    async fn test_compare_surfaces_per_side_errors() {
        let file_a = sample_file("# CLAUDE.md\n");
        let provider = ScriptedProvider::with_response("OVERALL: 70\n");
        let analyzer = DocumentAnalyzer::new(provider);

        let result = analyzer
            .compare(file_a.path(), Path::new("/nonexistent/CLAUDE.md"), "A", "B")
            .await;

        assert!(result.version_a.analysis.error.is_none());
        assert!(result.version_b.analysis.error.is_some());
        assert_eq!(result.winner, Winner::A);
    }

    #[test]
    fn test_prompt_truncates_long_content() {
        let content = "x".repeat(5000);
        let prompt = build_analysis_prompt(&content, "Big Project");

        assert!(prompt.contains("[... truncated, 1000 more chars ...]"));
        assert!(prompt.contains("5000 characters"));
    }

    #[test]
    fn test_prompt_leaves_short_content_alone() {
        let prompt = build_analysis_prompt("# CLAUDE.md\nshort\n", "Small Project");
        assert!(!prompt.contains("truncated"));
        assert!(prompt.contains("Small Project"));
    }
}
