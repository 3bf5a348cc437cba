//! Lenient parser for free-text evaluation replies
//!
//! The analysis prompt asks the model for a fixed textual layout, but models
//! drift: markdown emphasis around score lines, `(85/100)` instead of
//! `: 85`, bullet lists that wander off. This module extracts whatever
//! structure is present and degrades gracefully over what is not. Parsing is
//! a pure function of the input text and never fails; the worst case is an
//! [`AnalysisResult`] with empty structured fields and the raw reply as the
//! detailed-analysis fallback.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::types::{AnalysisResult, DIMENSIONS};

/// How much of the raw reply stands in for the detailed analysis when the
/// response carries no `DETAILED_ANALYSIS:` section.
const DETAILED_FALLBACK_CHARS: usize = 1000;

/// Bullet lists are capped at this many entries per section.
const MAX_BULLETS: usize = 5;

/// Matches the `Keyword (85/100)` score form; captures the text between the
/// opening paren and the slash.
fn paren_score_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(([^/()]*)/").expect("valid regex"))
}

/// Parse a raw evaluation reply into a complete [`AnalysisResult`].
///
/// `file_size` is the character count of the document that was analyzed; it
/// is carried through untouched.
pub fn parse_analysis(response: &str, file_size: usize) -> AnalysisResult {
    let scores = extract_scores(response);

    let strengths = extract_bullets(response, "STRENGTHS");
    let weaknesses = extract_bullets(response, "WEAKNESSES");
    let recommendations = extract_bullets(response, "RECOMMENDATIONS");

    let detailed_analysis = extract_detailed_analysis(response)
        .unwrap_or_else(|| truncate_chars(response, DETAILED_FALLBACK_CHARS));

    // An explicit overall wins; otherwise fall back to the mean of whatever
    // dimensions were captured. An explicit `OVERALL: 0` is indistinguishable
    // from an absent one and also triggers the fallback.
    let mut score = scores.get("overall").copied().unwrap_or(0.0);
    if score == 0.0 && !scores.is_empty() {
        let dims: Vec<f64> = scores
            .iter()
            .filter(|(name, _)| name.as_str() != "overall")
            .map(|(_, value)| *value)
            .collect();
        if !dims.is_empty() {
            score = dims.iter().sum::<f64>() / dims.len() as f64;
        }
    }

    AnalysisResult {
        score,
        file_size,
        dimension_scores: scores,
        strengths,
        weaknesses,
        recommendations,
        detailed_analysis,
        error: None,
    }
}

/// Scan every line for dimension keywords and collect whatever scores parse.
///
/// Two forms are recognized, tried in order on each matching line:
/// `KEYWORD: <number>` (first whitespace-delimited token after the last
/// colon) and `Keyword (<number>/100)`. Lines whose number does not parse
/// are silently skipped.
fn extract_scores(response: &str) -> BTreeMap<String, f64> {
    let mut scores = BTreeMap::new();

    for line in response.lines() {
        let line_upper = line.to_uppercase();
        for metric in DIMENSIONS.iter().chain(std::iter::once(&"overall")) {
            if !line_upper.contains(&metric.to_uppercase()) {
                continue;
            }

            // Markdown emphasis ends up glued to the numbers otherwise.
            let clean = line.replace("**", "").replace("###", "");
            let clean = clean.trim();

            let parsed = if let Some((_, after_colon)) = clean.rsplit_once(':') {
                after_colon
                    .split_whitespace()
                    .next()
                    .and_then(|token| token.parse::<f64>().ok())
            } else if clean.contains('(') && clean.contains('/') {
                paren_score_re()
                    .captures(clean)
                    .and_then(|caps| caps[1].trim().parse::<f64>().ok())
            } else {
                None
            };

            if let Some(value) = parsed {
                scores.insert(metric.to_string(), value);
            }
        }
    }

    scores
}

/// Collect the `- ` bullets following a `SECTION:` line.
///
/// Collection stops at the first non-empty line that is not a bullet; blank
/// lines inside the section are skipped. At most [`MAX_BULLETS`] entries are
/// returned.
fn extract_bullets(text: &str, section: &str) -> Vec<String> {
    let header = format!("{section}:");
    let mut items = Vec::new();
    let mut in_section = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if line.contains(&header) {
            in_section = true;
        } else if in_section && trimmed.starts_with('-') {
            items.push(trimmed.trim_matches(['-', ' ']).to_string());
        } else if in_section && !trimmed.is_empty() {
            break;
        }
    }

    items.truncate(MAX_BULLETS);
    items
}

/// The text following the `DETAILED_ANALYSIS:` marker, if present.
fn extract_detailed_analysis(response: &str) -> Option<String> {
    response
        .split_once("DETAILED_ANALYSIS:")
        .map(|(_, rest)| rest.trim().to_string())
}

/// Truncate to at most `max_chars` characters on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => text[..index].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "\
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
- No troubleshooting section

RECOMMENDATIONS:
- Add architecture overview
- Include common pitfalls section

DETAILED_ANALYSIS:
Good foundational guidance with gaps in architecture coverage.
";

    #[test]
    fn test_parses_well_formed_response() {
        let result = parse_analysis(WELL_FORMED, 1500);

        assert_eq!(result.score, 80.0);
        assert_eq!(result.file_size, 1500);
        assert_eq!(result.dimension_scores.get("clarity"), Some(&85.0));
        assert_eq!(result.dimension_scores.get("completeness"), Some(&70.0));
        assert_eq!(result.dimension_scores.get("actionability"), Some(&80.0));
        assert_eq!(result.dimension_scores.get("standards"), Some(&90.0));
        assert_eq!(result.dimension_scores.get("context"), Some(&75.0));
        assert_eq!(result.strengths.len(), 2);
        assert_eq!(result.weaknesses[0], "Missing architecture documentation");
        assert_eq!(
            result.detailed_analysis,
            "Good foundational guidance with gaps in architecture coverage."
        );
        assert!(result.error.is_none());
    }

    #[test]
    fn test_parses_markdown_wrapped_scores() {
        let response = "**CLARITY: 85**\n**COMPLETENESS: 70**\n### OVERALL: 78\n";
        let result = parse_analysis(response, 100);

        assert_eq!(result.dimension_scores.get("clarity"), Some(&85.0));
        assert_eq!(result.dimension_scores.get("completeness"), Some(&70.0));
        assert_eq!(result.score, 78.0);
    }

    #[test]
    fn test_parses_parenthesized_scores() {
        let response = "Clarity (90/100)\nCompleteness (72/100)\n";
        let result = parse_analysis(response, 100);

        assert_eq!(result.dimension_scores.get("clarity"), Some(&90.0));
        assert_eq!(result.dimension_scores.get("completeness"), Some(&72.0));
    }

    #[test]
    fn test_malformed_score_lines_are_skipped() {
        let response = "CLARITY: excellent\nCOMPLETENESS: 70\nSTANDARDS:\n";
        let result = parse_analysis(response, 100);

        assert!(!result.dimension_scores.contains_key("clarity"));
        assert!(!result.dimension_scores.contains_key("standards"));
        assert_eq!(result.dimension_scores.get("completeness"), Some(&70.0));
    }

    #[test]
    fn test_overall_falls_back_to_dimension_mean() {
        let response = "\
CLARITY: 80
COMPLETENESS: 80
ACTIONABILITY: 80
STANDARDS: 80
CONTEXT: 80
";
        let result = parse_analysis(response, 100);
        assert_eq!(result.score, 80.0);
    }

    #[test]
    fn test_overall_fallback_with_partial_dimensions() {
        let response = "CLARITY: 60\nCONTEXT: 90\n";
        let result = parse_analysis(response, 100);
        assert_eq!(result.score, 75.0);
    }

    #[test]
    fn test_explicit_overall_wins_over_mean() {
        let response = "CLARITY: 60\nCONTEXT: 90\nOVERALL: 70\n";
        let result = parse_analysis(response, 100);
        assert_eq!(result.score, 70.0);
    }

    #[test]
    fn test_bullets_capped_at_five() {
        let response = "\
STRENGTHS:
- One
- Two
- Three
- Four
- Five
- Six
- Seven
";
        let result = parse_analysis(response, 100);
        assert_eq!(result.strengths.len(), 5);
        assert_eq!(result.strengths[4], "Five");
    }

    #[test]
    fn test_bullets_stop_at_non_bullet_line() {
        let response = "\
WEAKNESSES:
- Too brief
- Missing commands
That was the list.
- Not collected
";
        let result = parse_analysis(response, 100);
        assert_eq!(result.weaknesses, vec!["Too brief", "Missing commands"]);
    }

    #[test]
    fn test_bullets_survive_blank_lines() {
        let response = "\
RECOMMENDATIONS:
- Add examples

- Document architecture
";
        let result = parse_analysis(response, 100);
        assert_eq!(
            result.recommendations,
            vec!["Add examples", "Document architecture"]
        );
    }

    #[test]
    fn test_detailed_analysis_falls_back_to_raw_prefix() {
        let long_reply = "x".repeat(1500);
        let result = parse_analysis(&long_reply, 100);
        assert_eq!(result.detailed_analysis.chars().count(), 1000);
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let first = parse_analysis(WELL_FORMED, 1500);
        let second = parse_analysis(WELL_FORMED, 1500);
        assert_eq!(first, second);
    }

    #[test]
    fn test_garbage_input_yields_empty_result() {
        let result = parse_analysis("the model rambled about nothing useful", 42);

        assert_eq!(result.score, 0.0);
        assert!(result.dimension_scores.is_empty());
        assert!(result.strengths.is_empty());
        assert_eq!(
            result.detailed_analysis,
            "the model rambled about nothing useful"
        );
        assert!(result.error.is_none());
    }
}
