//! Raw table detection on plain page text.
//!
//! A table is a run of at least [`MIN_TABLE_ROWS`] consecutive lines that all
//! split into the same number of cells (two or more) on `|`, tabs, or gaps of
//! two or more spaces.

use regex::Regex;
use std::sync::OnceLock;

use crate::models::Table;

/// Fewest consecutive rows that count as a table
pub const MIN_TABLE_ROWS: usize = 3;

fn cell_separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"\s*\|\s*|\t+|\s{2,}").expect("cell separator pattern"))
}

/// Split a line into cells, or `None` if it does not look like a table row
fn split_cells(line: &str) -> Option<Vec<String>> {
    let trimmed = line.trim().trim_matches('|').trim();
    if trimmed.is_empty() {
        return None;
    }

    let cells: Vec<String> = cell_separator()
        .split(trimmed)
        .map(|cell| cell.trim().to_string())
        .collect();

    (cells.len() >= 2).then_some(cells)
}

/// Find raw tables in the text of one page
pub fn detect_tables(page_number: usize, text: &str) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut run: Vec<Vec<String>> = Vec::new();

    let mut flush = |run: &mut Vec<Vec<String>>| {
        if run.len() >= MIN_TABLE_ROWS {
            tables.push(Table {
                page_number,
                rows: std::mem::take(run),
            });
        } else {
            run.clear();
        }
    };

    for line in text.lines() {
        match split_cells(line) {
            Some(cells) => {
                if run.first().is_some_and(|first| first.len() != cells.len()) {
                    flush(&mut run);
                }
                run.push(cells);
            }
            None => flush(&mut run),
        }
    }
    flush(&mut run);

    tables
}
