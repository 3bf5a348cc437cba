//! Console styling helpers

use colored::{ColoredString, Colorize};
use crossterm::terminal::size;

/// Scores at or above this render green.
const SCORE_HIGH_THRESHOLD: f64 = 70.0;
/// Scores at or above this (but below high) render yellow; below, red.
const SCORE_MEDIUM_THRESHOLD: f64 = 50.0;

fn score_color(score: f64) -> &'static str {
    if score >= SCORE_HIGH_THRESHOLD {
        "green"
    } else if score >= SCORE_MEDIUM_THRESHOLD {
        "yellow"
    } else {
        "red"
    }
}

/// Color a `score/100` figure by quality band.
pub fn style_score(score: f64) -> ColoredString {
    let text = format!("{score:.1}/100");
    match score_color(score) {
        "green" => text.green(),
        "yellow" => text.yellow(),
        _ => text.red(),
    }
}

/// Color a signed delta: green for gains, red for losses, plain for zero.
pub fn style_delta(delta: f64) -> ColoredString {
    let text = format!("{delta:+.1}");
    if delta > 0.0 {
        text.green()
    } else if delta < 0.0 {
        text.red()
    } else {
        text.normal()
    }
}

/// A horizontal bar visualizing `score` out of 100 in `width` cells.
pub fn score_bar(score: f64, width: usize) -> String {
    let clamped = score.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Bar width that fits the current terminal, leaving room for labels.
pub fn terminal_bar_width() -> usize {
    let terminal_width = size().map(|(w, _)| w as usize).unwrap_or(80);
    terminal_width.saturating_sub(40).clamp(10, 40)
}

/// Standard hint printed when the Ollama backend is unreachable.
pub fn print_connection_help(host: &str) {
    eprintln!("{} Cannot connect to Ollama at {}", "✗".red(), host.cyan());
    eprintln!("Ensure Ollama is running: {}", "ollama serve".cyan());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_color_thresholds() {
        assert_eq!(score_color(85.0), "green");
        assert_eq!(score_color(70.0), "green");
        assert_eq!(score_color(69.9), "yellow");
        assert_eq!(score_color(50.0), "yellow");
        assert_eq!(score_color(49.9), "red");
        assert_eq!(score_color(0.0), "red");
    }

    #[test]
    fn test_score_bar_proportions() {
        assert_eq!(score_bar(0.0, 10), "░░░░░░░░░░");
        assert_eq!(score_bar(100.0, 10), "██████████");
        assert_eq!(score_bar(50.0, 10), "█████░░░░░");
    }

    #[test]
    fn test_score_bar_clamps_out_of_range() {
        assert_eq!(score_bar(150.0, 10), "██████████");
        assert_eq!(score_bar(-5.0, 10), "░░░░░░░░░░");
    }
}
