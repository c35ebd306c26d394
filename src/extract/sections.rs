//! Splits full text into titled sections on header-looking lines.

use regex::Regex;
use std::sync::OnceLock;

use crate::models::Section;

/// Header lines must be shorter than this many characters
const MAX_HEADER_CHARS: usize = 100;

fn header_patterns() -> &'static [Regex; 3] {
    static HEADERS: OnceLock<[Regex; 3]> = OnceLock::new();
    HEADERS.get_or_init(|| {
        [
            // "1. Introduction"
            Regex::new(r"^\d+\.\s*[A-Z].+").expect("numbered header pattern"),
            // "RELATED WORK"
            Regex::new(r"^[A-Z][A-Z\s]+$").expect("all-caps header pattern"),
            // "Related Work"
            Regex::new(r"^[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*$").expect("title-case header pattern"),
        ]
    })
}

/// Result of segmenting a document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segmentation {
    /// Lines before the first header; they belong to no section
    pub preamble: Option<String>,
    pub sections: Vec<Section>,
}

/// Whether a line (already stripped) reads as a section header
pub fn is_header(stripped: &str) -> bool {
    stripped.chars().count() < MAX_HEADER_CHARS
        && header_patterns().iter().any(|p| p.is_match(stripped))
}

/// Partition `text` into sections.
///
/// A header closes the open section and opens a new one titled with the
/// stripped header line. Every other line goes to the open section.
pub fn segment(text: &str) -> Segmentation {
    let mut preamble: Vec<&str> = Vec::new();
    let mut sections = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in text.split('\n') {
        let stripped = line.trim();
        if is_header(stripped) {
            if let Some((title, body)) = current.take() {
                sections.push(Section {
                    title,
                    content: body.join("\n"),
                });
            }
            current = Some((stripped.to_string(), Vec::new()));
            continue;
        }

        match current.as_mut() {
            Some((_, body)) => body.push(line),
            None => preamble.push(line),
        }
    }

    if let Some((title, body)) = current {
        sections.push(Section {
            title,
            content: body.join("\n"),
        });
    }

    if !preamble.is_empty() {
        tracing::debug!(
            lines = preamble.len(),
            "text before the first section header is not part of any section"
        );
    }

    Segmentation {
        preamble: (!preamble.is_empty()).then(|| preamble.join("\n")),
        sections,
    }
}
