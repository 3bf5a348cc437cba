//! Meta-prompting optimizer
//!
//! Iteratively improves a guidance file: a [`MetaPrompter`] asks the backend
//! to rewrite the document against its latest evaluation feedback, and the
//! [`Optimizer`] runs a bounded rewrite-then-rescore loop, keeping the best
//! version seen across all rounds.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::analyzer::DocumentAnalyzer;
use crate::llm::LlmProvider;
use crate::types::{AnalysisResult, OptimizationIteration, OptimizationResult};
use crate::Result;

/// Sentinel markers the rewrite prompt instructs the model to wrap its
/// output in; strategy 1 of the extraction chain.
const BEGIN_MARKER: &str = "<<<BEGIN_GUIDANCE>>>";
const END_MARKER: &str = "<<<END_GUIDANCE>>>";

/// Document content beyond this many characters is cut from the improvement
/// prompt, with a notice.
const MAX_DOCUMENT_CHARS: usize = 15000;

/// Higher temperature than analysis, to permit creative rewriting.
const REWRITE_TEMPERATURE: f32 = 0.5;

/// Canonical document-opening headings; strategy 2 returns everything from
/// the first match onward.
const HEADING_PATTERNS: [&str; 5] = [
    "# CLAUDE.md\n",
    "# AGENTS.md\n",
    "# Project Overview\n",
    "# Overview\n",
    "# Development",
];

/// Known meta-commentary phrases (prompt echoes and narration); strategy 3
/// skips lines matching any of these, case-insensitively.
const SKIP_PATTERNS: [&str; 10] = [
    "# Guidance File Improvement Task",
    "## Current Document",
    "## Current Performance",
    "## Issues Identified",
    "## Your Task",
    "I can help",
    "Here is a revised version",
    "Here's the improved version",
    "Based on the provided",
    "**Improvement Plan**",
];

const SYSTEM_PROMPT: &str = "\
You are an expert at optimizing project guidance files for AI coding assistants.

CRITICAL OUTPUT RULES:
- Output ONLY the complete, improved guidance file content
- Start your response with the marker: <<<BEGIN_GUIDANCE>>>
- Then immediately output the file content starting with its top-level heading (e.g. \"# CLAUDE.md\")
- End your response with the marker: <<<END_GUIDANCE>>>
- Do NOT include any explanations, commentary, or meta-text outside the markers
- Do NOT say \"Here's the improved version\" or similar phrases
- Output the raw markdown file ready to save between the markers

Your task: Improve the guidance file by:
1. Preserving all working guidance (keep what's good)
2. Strengthening areas that scored poorly in the evaluation
3. Adding concrete examples where needed
4. Maintaining the original structure and organization
5. Keeping it actionable and specific

EXAMPLE OUTPUT FORMAT:
<<<BEGIN_GUIDANCE>>>
# CLAUDE.md

## Project Overview
[Your improved content here]
<<<END_GUIDANCE>>>";

/// Generates improved guidance files via meta-prompting.
pub struct MetaPrompter<P: LlmProvider> {
    provider: P,
}

impl<P: LlmProvider> MetaPrompter<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Rewrite `current_content` against the feedback in `analysis`.
    ///
    /// Unlike analysis, a backend failure here propagates: a failed rewrite
    /// must abort the enclosing optimization round rather than feed garbage
    /// forward.
    pub async fn improve(
        &self,
        current_content: &str,
        analysis: &AnalysisResult,
        iteration: u32,
    ) -> Result<String> {
        info!("generating improved document (iteration {})", iteration);

        let prompt = build_meta_prompt(current_content, analysis, iteration);
        let raw = self
            .provider
            .generate(&prompt, Some(SYSTEM_PROMPT), REWRITE_TEMPERATURE)
            .await?;

        let improved = extract_clean_document(&raw);
        info!(
            "generated improved document ({} chars)",
            improved.chars().count()
        );
        Ok(improved)
    }
}

/// Build the improvement prompt: current document, prior scores, identified
/// issues, and preservation instructions.
fn build_meta_prompt(content: &str, analysis: &AnalysisResult, iteration: u32) -> String {
    let dim_scores_text = analysis
        .dimension_scores
        .iter()
        .filter(|(name, _)| name.as_str() != "overall")
        .map(|(name, score)| format!("  - {name}: {score:.0}/100"))
        .collect::<Vec<_>>()
        .join("\n");
    let dim_scores_text = if dim_scores_text.is_empty() {
        "  No dimension scores available".to_string()
    } else {
        dim_scores_text
    };

    let weaknesses_text = bullet_block(&analysis.weaknesses, "  No specific weaknesses identified");
    let recommendations_text = bullet_block(&analysis.recommendations, "  No specific recommendations");

    let char_count = content.chars().count();
    let shown: String = content.chars().take(MAX_DOCUMENT_CHARS).collect();
    let truncated_notice = if char_count > MAX_DOCUMENT_CHARS {
        format!(
            "\n\n[Note: Full file is {char_count} chars. Showing first {MAX_DOCUMENT_CHARS} for context.]\n"
        )
    } else {
        String::new()
    };

    let score = analysis.score;
    format!(
        "# Guidance File Improvement Task (Iteration {iteration})

## Current Document
```markdown
{shown}
```{truncated_notice}

## Current Performance
**Overall Score**: {score:.1}/100

**Dimension Scores**:
{dim_scores_text}

## Issues Identified

**Weaknesses**:
{weaknesses_text}

**Recommendations**:
{recommendations_text}

## Your Task

Improve this guidance file to address the weaknesses and recommendations above.

**Focus Areas** (prioritize low-scoring dimensions):
1. If Clarity is low: Make instructions more explicit and specific
2. If Completeness is low: Add missing essential sections
3. If Actionability is low: Add concrete examples and commands
4. If Standards is low: Strengthen TDD, type safety, quality check requirements
5. If Context is low: Add more project structure and architecture info

**CRITICAL: Preservation Requirements**:
- **PRESERVE ALL WORKING CONTENT**: Do NOT remove sections that aren't mentioned in weaknesses
- **MAINTAIN OR INCREASE LENGTH**: Don't over-simplify
- **KEEP ALL SECTIONS**: Preserve existing structure
- **ADD, DON'T REPLACE**: Strengthen weak areas by adding, not removing
- **TARGET ADDITIONS**: Only modify sections related to identified weaknesses

**Output Format**:
Provide ONLY the improved file content between the markers.
Do not include explanations or commentary.
"
    )
}

fn bullet_block(items: &[String], empty_text: &str) -> String {
    if items.is_empty() {
        return empty_text.to_string();
    }
    items
        .iter()
        .map(|item| format!("  - {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pull the clean document out of a free-form rewrite reply.
///
/// Models do not reliably follow the output rules, so four strategies are
/// tried in order: sentinel markers, canonical opening headings, skipping
/// known meta-commentary lines up to the first real heading, and finally the
/// trimmed raw reply. The chain always yields usable text; only the last
/// resort is logged as a quality degradation.
fn extract_clean_document(raw: &str) -> String {
    // Strategy 1: between the sentinel markers.
    if let (Some(begin), Some(end)) = (raw.find(BEGIN_MARKER), raw.find(END_MARKER)) {
        let start = begin + BEGIN_MARKER.len();
        if start <= end {
            debug!("extracted document using sentinel markers");
            return raw[start..end].trim().to_string();
        }
    }

    // Strategy 2: from the first canonical opening heading onward.
    for pattern in HEADING_PATTERNS {
        if let Some(index) = raw.find(pattern) {
            warn!("extracted document using heading pattern: {}", pattern.trim());
            return raw[index..].trim().to_string();
        }
    }

    // Strategy 3: skip meta-commentary until a heading line starts the
    // actual document.
    let lines: Vec<&str> = raw.split('\n').collect();
    let mut start_line = 0;
    for (index, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let lower = line.to_lowercase();
        if SKIP_PATTERNS
            .iter()
            .any(|skip| lower.contains(&skip.to_lowercase()))
        {
            continue;
        }
        if trimmed.starts_with('#') {
            start_line = index;
            break;
        }
    }
    if start_line > 0 {
        warn!("extracted document by skipping {} meta-text lines", start_line);
        return lines[start_line..].join("\n").trim().to_string();
    }

    // Strategy 4: give back whatever the model said.
    warn!("could not extract a clean document, returning raw output");
    raw.trim().to_string()
}

/// Orchestrates the optimization loop.
pub struct Optimizer<P: LlmProvider> {
    analyzer: DocumentAnalyzer<P>,
    prompter: MetaPrompter<P>,
}

impl<P: LlmProvider + Clone> Optimizer<P> {
    pub fn new(provider: P) -> Self {
        Self {
            analyzer: DocumentAnalyzer::new(provider.clone()),
            prompter: MetaPrompter::new(provider),
        }
    }
}

impl<P: LlmProvider> Optimizer<P> {
    /// Run `iterations` rounds of rewrite-then-rescore over the file at
    /// `path` and persist the best version seen.
    ///
    /// Each round feeds the latest document forward even when its score
    /// regressed; rolling back would trap the loop in local minima. The
    /// final selection is the highest-scoring round across the whole
    /// history (first such round on ties), not the last one.
    ///
    /// A backend or rewrite failure mid-round is fatal to the run: the error
    /// propagates and no partial result is returned.
    pub async fn optimize(
        &self,
        path: &Path,
        iterations: u32,
        output_path: Option<&Path>,
    ) -> Result<OptimizationResult> {
        info!(
            "starting optimization of {} ({} iterations)",
            path.display(),
            iterations
        );

        let original_content = fs::read_to_string(path)?;
        let project_name = path
            .parent()
            .and_then(|parent| parent.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Unknown".to_string());

        info!("evaluating baseline document");
        let baseline = self.analyzer.analyze(path, &project_name).await;
        let original_score = baseline.score;
        info!("baseline score: {:.1}/100", original_score);

        let candidate_dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let mut history: Vec<OptimizationIteration> = Vec::with_capacity(iterations as usize);
        let mut current_content = original_content.clone();
        let mut current_score = original_score;
        let mut current_analysis = baseline;

        for iteration in 1..=iterations {
            info!("--- iteration {}/{} ---", iteration, iterations);

            let improved_content = self
                .prompter
                .improve(&current_content, &current_analysis, iteration)
                .await?;

            // The candidate goes through a real file so its evaluation is
            // identical to a cold analysis; the temp file is removed on
            // every exit path, including errors.
            let candidate = tempfile::Builder::new()
                .prefix(".gbench_iter_")
                .suffix(".md")
                .tempfile_in(&candidate_dir)?;
            fs::write(candidate.path(), &improved_content)?;

            let improved_analysis = self
                .analyzer
                .analyze(candidate.path(), &format!("{project_name} (iter {iteration})"))
                .await;
            drop(candidate);

            let improved_score = improved_analysis.score;
            let delta = improved_score - current_score;
            info!(
                "iteration {}: {:.1} -> {:.1} ({:+.1})",
                iteration, current_score, improved_score, delta
            );

            history.push(OptimizationIteration {
                iteration,
                score: improved_score,
                previous_score: current_score,
                delta,
                content: improved_content.clone(),
                analysis: improved_analysis.clone(),
            });

            current_content = improved_content;
            current_score = improved_score;
            current_analysis = improved_analysis;
        }

        // Best-of-history selection; strict comparison keeps the first of
        // equal maxima.
        let (final_score, final_content) = match history
            .iter()
            .reduce(|best, candidate| if candidate.score > best.score { candidate } else { best })
        {
            Some(best) => (best.score, best.content.clone()),
            None => (original_score, original_content.clone()),
        };

        let output = match output_path {
            Some(explicit) => explicit.to_path_buf(),
            None => default_output_path(path),
        };
        fs::write(&output, &final_content)?;

        let total_improvement = final_score - original_score;
        info!(
            "optimization complete: {:.1} -> {:.1} ({:+.1} points), saved to {}",
            original_score,
            final_score,
            total_improvement,
            output.display()
        );

        Ok(OptimizationResult {
            original_score,
            final_score,
            total_improvement,
            iterations: history,
            original_content,
            final_content,
            output_path: Some(output),
        })
    }
}

/// Sibling "optimized" file next to the original, used when the caller gave
/// no explicit output location.
fn default_output_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("document");
    path.with_file_name(format!("{stem}.optimized.md"))
}
