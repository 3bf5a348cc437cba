//! Console reporting and UI helpers for gbench

mod reporter;
mod ui;

pub use reporter::Reporter;
pub use ui::{print_connection_help, score_bar, style_delta, style_score, terminal_bar_width};

// Re-export core types
pub use gbench_core::{Error, Result};
