//! Terminal display utilities for robust CLI output formatting.
//!
//! This module provides utilities for formatting CLI output that handles
//! different screen sizes, Unicode text, and terminal capabilities.

use std::io::{self, IsTerminal};
use std::sync::OnceLock;
use terminal_size::terminal_size;

/// Terminal information with cached size and capabilities.
#[derive(Debug, Clone)]
pub struct Terminal {
    width: usize,
    is_tty: bool,
}

static TERMINAL_INFO: OnceLock<Terminal> = OnceLock::new();

/// Get the global terminal information, initialized on first call.
pub fn terminal_info() -> &'static Terminal {
    TERMINAL_INFO.get_or_init(|| {
        let width = terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(DEFAULT_WIDTH);

        Terminal {
            width,
            is_tty: io::stdout().is_terminal(),
        }
    })
}

/// Default width when terminal size cannot be determined.
pub const DEFAULT_WIDTH: usize = 100;

/// Get the current terminal width in characters.
#[inline]
pub fn terminal_width() -> usize {
    terminal_info().width
}

/// Check if stdout is a terminal.
#[inline]
pub fn is_terminal() -> bool {
    terminal_info().is_tty
}

fn display_width(text: &str) -> usize {
    text.chars()
        .map(|c| unicode_width::UnicodeWidthChar::width(c).unwrap_or(1))
        .sum()
}

/// Truncate text to fit within the specified width using unicode-aware truncation.
///
/// Returns a string that fits within `max_width` columns, appending an
/// ellipsis if truncation occurred.
///
/// # Examples
///
/// ```
/// use paper_mdc::utils::truncate_with_ellipsis;
///
/// assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
/// assert_eq!(truncate_with_ellipsis("Hi", 8), "Hi");
/// ```
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }

    if display_width(text) <= max_width {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut width = 0;
    let mut truncated = String::new();
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(1);
        if width + w > budget {
            break;
        }
        width += w;
        truncated.push(c);
    }

    format!("{}...", truncated)
}

/// Truncate text at word boundaries to fit within the specified width.
///
/// Prefers to cut at the last complete word before the limit, falling back to
/// [`truncate_with_ellipsis`] when there is no usable space.
pub fn truncate_at_word(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }

    if display_width(text) <= max_width {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut width = 0;
    let mut last_space = None;
    for (i, c) in text.char_indices() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(1);
        if width + w > budget {
            break;
        }
        if c == ' ' {
            last_space = Some(i);
        }
        width += w;
    }

    match last_space {
        Some(i) if i > 0 => format!("{}...", text[..i].trim_end()),
        _ => truncate_with_ellipsis(text, max_width),
    }
}

/// Collapse all whitespace runs (including newlines) into single spaces.
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Column width configuration for table display.
#[derive(Debug, Clone, Copy)]
pub struct ColumnConfig {
    pub min_width: usize,
    pub max_width: usize,
    pub weight: usize,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        ColumnConfig {
            min_width: 1,
            max_width: usize::MAX,
            weight: 1,
        }
    }
}

impl ColumnConfig {
    /// Create a new column config with minimum width.
    pub fn new(min_width: usize) -> Self {
        ColumnConfig {
            min_width,
            ..Default::default()
        }
    }

    /// Set the maximum width.
    pub fn max(mut self, max_width: usize) -> Self {
        self.max_width = max_width;
        self
    }

    /// Set the weight for space distribution.
    pub fn weight(mut self, weight: usize) -> Self {
        self.weight = weight;
        self
    }
}

/// Calculate column widths from a list of column configurations.
///
/// Every column gets at least its minimum. Space left over (after one
/// separator between columns) is shared by weight, up to each maximum.
pub fn calculate_column_widths(terminal_width: usize, configs: &[ColumnConfig]) -> Vec<usize> {
    let mut widths: Vec<usize> = configs.iter().map(|c| c.min_width).collect();
    if configs.is_empty() {
        return widths;
    }

    let separator_width = configs.len() - 1;
    let available_width = terminal_width.saturating_sub(separator_width);
    let min_sum: usize = widths.iter().sum();
    if min_sum >= available_width {
        return widths;
    }

    let mut remaining = available_width - min_sum;
    let total_weight: usize = configs.iter().map(|c| c.weight).sum();
    if total_weight == 0 {
        return widths;
    }

    let extra = remaining;
    for (i, config) in configs.iter().enumerate() {
        let share = extra * config.weight / total_weight;
        let room = config.max_width.saturating_sub(widths[i]);
        let take = share.min(room).min(remaining);
        widths[i] += take;
        remaining -= take;
    }

    widths
}

/// Widths for a two-column (label, text) summary table.
pub fn summary_table_columns(terminal_width: usize) -> (usize, usize) {
    let configs = [
        ColumnConfig::new(12).max(30).weight(1),
        ColumnConfig::new(30).weight(4),
    ];
    let widths = calculate_column_widths(terminal_width, &configs);
    (widths[0], widths[1])
}

/// Format a paper title for display, truncating if necessary.
pub fn format_title(title: &str, max_width: usize) -> String {
    if max_width <= 3 {
        return "...".to_string();
    }
    truncate_at_word(&single_line(title), max_width)
}

/// Format authors for display, truncating if necessary.
pub fn format_authors(authors: &[String], max_width: usize) -> String {
    if max_width <= 3 {
        return "...".to_string();
    }
    truncate_with_ellipsis(&authors.join(", "), max_width)
}
