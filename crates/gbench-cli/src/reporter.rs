//! Report generation for audits, comparisons, and optimization runs
//!
//! Prints colored console summaries and saves plain-text reports with
//! timestamped filenames. HTML output is deliberately not offered.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use colored::Colorize;

use gbench_core::{
    AnalysisResult, ComparisonResult, OptimizationResult, Result, Winner, DIMENSIONS,
};

use crate::ui::{score_bar, style_delta, style_score, terminal_bar_width};

/// Generates audit, comparison, and optimization reports.
pub struct Reporter {
    output_dir: PathBuf,
}

impl Reporter {
    /// Create a reporter saving into `output_dir`, defaulting to
    /// `~/.gbench/reports`. The directory is created if missing.
    pub fn new(output_dir: Option<PathBuf>) -> Result<Self> {
        let output_dir = match output_dir {
            Some(dir) => dir,
            None => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".gbench")
                .join("reports"),
        };
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Print an audit summary to the console.
    pub fn print_audit(&self, result: &AnalysisResult, path: &Path) {
        println!();
        println!("{}", "Guidance File Audit".bold());
        println!("File: {}", path.display().to_string().cyan());
        println!("Size: {} chars", result.file_size);
        println!();

        let width = terminal_bar_width();
        println!("Overall Score: {}", style_score(result.score));
        println!("{}", score_bar(result.score, width));
        println!();

        println!("{}", "Dimension Scores".bold());
        for dimension in DIMENSIONS {
            let score = result
                .dimension_scores
                .get(dimension)
                .copied()
                .unwrap_or(0.0);
            println!(
                "  {:<14} {:>3.0}  {}",
                dimension,
                score,
                score_bar(score, width)
            );
        }

        print_bullets("Strengths", &result.strengths, &"✓".green());
        print_bullets("Weaknesses", &result.weaknesses, &"✗".yellow());
        print_bullets("Recommendations", &result.recommendations, &"→".cyan());

        if !result.detailed_analysis.is_empty() {
            println!();
            println!("{}", "Detailed Analysis".bold());
            println!("{}", result.detailed_analysis.dimmed());
        }
    }

    /// Print a comparison summary to the console.
    pub fn print_comparison(&self, result: &ComparisonResult) {
        println!();
        println!("{}", "Guidance File Comparison".bold());
        println!();

        let trophy = |side: Winner| if result.winner == side { " 🏆" } else { "" };
        println!(
            "  A: {:<24} {}{}",
            result.version_a.name,
            style_score(result.version_a.analysis.score),
            trophy(Winner::A)
        );
        println!(
            "  B: {:<24} {}{}",
            result.version_b.name,
            style_score(result.version_b.analysis.score),
            trophy(Winner::B)
        );
        println!();

        match result.winner {
            Winner::Tie => println!("{}", "Result: TIE".yellow()),
            side => println!(
                "{}",
                format!("Winner: Version {} (+{:.1} points)", side, result.score_delta).green()
            ),
        }

        println!();
        println!("{}", "Dimension Scores".bold());
        println!("  {:<14} {:>9} {:>9} {:>7}", "Dimension", "Version A", "Version B", "Delta");
        for dimension in DIMENSIONS {
            let score_a = dimension_score(&result.version_a.analysis, dimension);
            let score_b = dimension_score(&result.version_b.analysis, dimension);
            println!(
                "  {:<14} {:>9.0} {:>9.0} {:>7}",
                dimension,
                score_a,
                score_b,
                style_delta(score_a - score_b)
            );
        }

        for (label, report) in [("Version A", &result.version_a), ("Version B", &result.version_b)] {
            println!();
            println!("{}", format!("{label}: {}", report.name).cyan().bold());
            print_bullets("Strengths", &report.analysis.strengths, &"✓".green());
            print_bullets("Weaknesses", &report.analysis.weaknesses, &"✗".yellow());
        }
    }

    /// Print an optimization run summary to the console.
    pub fn print_optimization(&self, result: &OptimizationResult) {
        println!();
        println!("{}", "Optimization Complete".bold());
        println!();
        println!("Original Score: {:.1}/100", result.original_score);
        println!("Final Score: {}", style_score(result.final_score));
        println!(
            "Improvement: {} points",
            style_delta(result.total_improvement)
        );

        println!();
        println!("{}", "Iteration Progress".bold());
        println!("  {:<9} {:>9} {:>7}  {}", "Iteration", "Score", "Delta", "Status");
        for iteration in &result.iterations {
            let is_best = iteration.score == result.final_score;
            let status = if is_best { "Best".green() } else { "".normal() };
            println!(
                "  {:<9} {:>5.1}/100 {:>7}  {}",
                iteration.iteration,
                iteration.score,
                style_delta(iteration.delta),
                status
            );
        }

        if let Some(output_path) = &result.output_path {
            println!();
            println!(
                "Output saved to: {}",
                output_path.display().to_string().cyan()
            );
        }

        let original_size = result.original_content.chars().count();
        let final_size = result.final_content.chars().count();
        let size_pct = if original_size > 0 {
            (final_size as f64 - original_size as f64) / original_size as f64 * 100.0
        } else {
            0.0
        };
        println!();
        println!(
            "{}",
            format!("Size: {original_size} -> {final_size} chars ({size_pct:+.1}%)").dimmed()
        );
    }

    /// Save an audit as a plain-text report; returns the written path.
    pub fn save_audit_report(&self, result: &AnalysisResult, path: &Path) -> Result<PathBuf> {
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("document");
        let filename = format!(
            "audit_{}_{}.txt",
            sanitize(stem),
            Local::now().format("%Y%m%d_%H%M%S")
        );
        let report_path = self.output_dir.join(filename);

        let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        fs::write(&report_path, render_audit_text(result, path, &generated_at))?;
        Ok(report_path)
    }

    /// Save a comparison as a plain-text report; returns the written path.
    pub fn save_comparison_report(&self, result: &ComparisonResult) -> Result<PathBuf> {
        let filename = format!(
            "comparison_{}_vs_{}_{}.txt",
            sanitize(&result.version_a.name),
            sanitize(&result.version_b.name),
            Local::now().format("%Y%m%d_%H%M%S")
        );
        let report_path = self.output_dir.join(filename);

        let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        fs::write(&report_path, render_comparison_text(result, &generated_at))?;
        Ok(report_path)
    }
}

fn dimension_score(analysis: &AnalysisResult, dimension: &str) -> f64 {
    analysis.dimension_scores.get(dimension).copied().unwrap_or(0.0)
}

fn print_bullets(title: &str, items: &[String], glyph: &colored::ColoredString) {
    if items.is_empty() {
        return;
    }
    println!();
    println!("{}", format!("{title}:").bold());
    for item in items {
        println!("  {glyph} {item}");
    }
}

/// Report filenames never carry path separators from project names.
fn sanitize(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}

fn render_audit_text(result: &AnalysisResult, path: &Path, generated_at: &str) -> String {
    let mut out = String::new();
    out.push_str("============================================================\n");
    out.push_str(" GUIDANCE FILE AUDIT\n");
    out.push_str("============================================================\n");
    out.push_str(&format!("Generated: {generated_at}\n"));
    out.push_str(&format!("File: {}\n", path.display()));
    out.push_str(&format!("Size: {} chars\n\n", result.file_size));

    out.push_str(&format!("Overall Score: {:.1}/100\n\n", result.score));

    out.push_str("Dimension Scores\n----------------\n");
    for dimension in DIMENSIONS {
        out.push_str(&format!(
            "  {:<14} {:>5.1}\n",
            dimension,
            dimension_score(result, dimension)
        ));
    }

    push_text_bullets(&mut out, "Strengths", &result.strengths, '+');
    push_text_bullets(&mut out, "Weaknesses", &result.weaknesses, '-');
    push_text_bullets(&mut out, "Recommendations", &result.recommendations, '*');

    if !result.detailed_analysis.is_empty() {
        out.push_str("\nDetailed Analysis\n-----------------\n");
        out.push_str(&result.detailed_analysis);
        out.push('\n');
    }
    out
}

fn render_comparison_text(result: &ComparisonResult, generated_at: &str) -> String {
    let mut out = String::new();
    out.push_str("============================================================\n");
    out.push_str(" GUIDANCE FILE COMPARISON\n");
    out.push_str("============================================================\n");
    out.push_str(&format!("Generated: {generated_at}\n\n"));

    out.push_str(&format!(
        "A: {} ({})\n   Score: {:.1}/100\n",
        result.version_a.name,
        result.version_a.path.display(),
        result.version_a.analysis.score
    ));
    out.push_str(&format!(
        "B: {} ({})\n   Score: {:.1}/100\n\n",
        result.version_b.name,
        result.version_b.path.display(),
        result.version_b.analysis.score
    ));

    match result.winner {
        Winner::Tie => out.push_str("Result: TIE\n"),
        side => out.push_str(&format!(
            "Winner: Version {} (+{:.1} points)\n",
            side, result.score_delta
        )),
    }

    out.push_str("\nDimension Scores\n----------------\n");
    out.push_str(&format!(
        "  {:<14} {:>9} {:>9} {:>7}\n",
        "Dimension", "Version A", "Version B", "Delta"
    ));
    for dimension in DIMENSIONS {
        let score_a = dimension_score(&result.version_a.analysis, dimension);
        let score_b = dimension_score(&result.version_b.analysis, dimension);
        out.push_str(&format!(
            "  {:<14} {:>9.0} {:>9.0} {:>+7.0}\n",
            dimension,
            score_a,
            score_b,
            score_a - score_b
        ));
    }

    for (label, report) in [("Version A", &result.version_a), ("Version B", &result.version_b)] {
        out.push_str(&format!("\n{label}: {}\n", report.name));
        push_text_bullets(&mut out, "Strengths", &report.analysis.strengths, '+');
        push_text_bullets(&mut out, "Weaknesses", &report.analysis.weaknesses, '-');
    }
    out
}

fn push_text_bullets(out: &mut String, title: &str, items: &[String], glyph: char) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("\n{title}\n"));
    out.push_str(&format!("{}\n", "-".repeat(title.len())));
    for item in items {
        out.push_str(&format!("  {glyph} {item}\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_analysis() -> AnalysisResult {
        let mut result = AnalysisResult {
            score: 75.0,
            file_size: 1000,
            strengths: vec!["Well organized".to_string(), "Clear commands".to_string()],
            weaknesses: vec!["Missing examples".to_string()],
            recommendations: vec!["Add code examples".to_string()],
            detailed_analysis: "Good coverage of the basics.".to_string(),
            ..AnalysisResult::default()
        };
        for (dimension, score) in [
            ("clarity", 80.0),
            ("completeness", 70.0),
            ("actionability", 75.0),
            ("standards", 80.0),
            ("context", 70.0),
        ] {
            result.dimension_scores.insert(dimension.to_string(), score);
        }
        result
    }

    #[test]
    fn test_audit_text_report_contents() {
        let text = render_audit_text(
            &sample_analysis(),
            Path::new("/work/demo/CLAUDE.md"),
            "2026-08-06 12:00:00",
        );

        assert!(text.contains("GUIDANCE FILE AUDIT"));
        assert!(text.contains("Overall Score: 75.0/100"));
        assert!(text.contains("clarity"));
        assert!(text.contains("+ Well organized"));
        assert!(text.contains("- Missing examples"));
        assert!(text.contains("* Add code examples"));
        assert!(text.contains("Good coverage of the basics."));
    }

    #[test]
    fn test_comparison_text_report_contents() {
        let comparison = ComparisonResult {
            version_a: gbench_core::VersionReport {
                name: "Project A".to_string(),
                path: PathBuf::from("/a/CLAUDE.md"),
                analysis: sample_analysis(),
            },
            version_b: gbench_core::VersionReport {
                name: "Project B".to_string(),
                path: PathBuf::from("/b/CLAUDE.md"),
                analysis: AnalysisResult {
                    score: 62.0,
                    ..sample_analysis()
                },
            },
            winner: Winner::A,
            score_delta: 13.0,
        };

        let text = render_comparison_text(&comparison, "2026-08-06 12:00:00");

        assert!(text.contains("Winner: Version A (+13.0 points)"));
        assert!(text.contains("Project A"));
        assert!(text.contains("Project B"));
        assert!(text.contains("Dimension Scores"));
    }

    #[test]
    fn test_save_audit_report_writes_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let reporter = Reporter::new(Some(dir.path().to_path_buf())).expect("reporter");

        let report_path = reporter
            .save_audit_report(&sample_analysis(), Path::new("/work/demo/CLAUDE.md"))
            .expect("save report");

        assert!(report_path.exists());
        let name = report_path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("audit_CLAUDE_"));
        assert!(name.ends_with(".txt"));
        let contents = fs::read_to_string(&report_path).expect("read report");
        assert!(contents.contains("Overall Score: 75.0/100"));
    }

    #[test]
    fn test_reporter_creates_output_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("deep").join("reports");

        let reporter = Reporter::new(Some(nested.clone())).expect("reporter");

        assert!(nested.is_dir());
        assert_eq!(reporter.output_dir(), nested.as_path());
    }

    #[test]
    fn test_sanitize_strips_path_separators() {
        assert_eq!(sanitize("a/b\\c"), "a_b_c");
    }
}
