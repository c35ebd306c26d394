//! Best-effort bibliographic metadata from the first page.

use regex::Regex;
use std::sync::OnceLock;

use crate::models::PaperMetadata;

/// Lines of page 1 that are considered at all
const HEAD_LINES: usize = 20;
/// Non-empty lines searched for a title
const TITLE_LINES: usize = 10;
/// Lines searched for an author list
const AUTHOR_LINES: usize = 15;

struct Patterns {
    authors: [Regex; 2],
    year: Regex,
    doi: Regex,
    abstract_start: Regex,
    abstract_end: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        authors: [
            Regex::new(r"[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*(?:\s+and\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)*")
                .expect("full-name author pattern"),
            Regex::new(r"[A-Z]\.\s*[A-Z][a-z]+(?:\s+and\s+[A-Z]\.\s*[A-Z][a-z]+)*")
                .expect("initials author pattern"),
        ],
        year: Regex::new(r"\b(?:19|20)\d{2}\b").expect("year pattern"),
        doi: Regex::new(r"(?i)DOI[:\s]*([0-9]+\.[0-9]+/\S+)").expect("doi pattern"),
        abstract_start: Regex::new(r"(?i)abstract[:\s]*").expect("abstract pattern"),
        abstract_end: Regex::new(r"(?i)\n\s*(?:1\.|introduction|keywords|index terms)")
            .expect("abstract terminator pattern"),
    })
}

/// Extract metadata from the first page text and the full document text
pub fn extract_metadata(first_page: &str, full_text: &str) -> PaperMetadata {
    let lines: Vec<&str> = first_page.split('\n').take(HEAD_LINES).collect();

    PaperMetadata {
        title: find_title(&lines),
        authors: find_authors(&lines),
        year: find_year(&lines),
        doi: find_doi(full_text),
        r#abstract: find_abstract(full_text),
    }
}

/// First substantial line that is not a section marker
pub fn find_title(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .take(TITLE_LINES)
        .find(|line| {
            let lower = line.to_lowercase();
            line.chars().count() > 10
                && !lower.starts_with("abstract")
                && !lower.starts_with("introduction")
        })
        .map(str::to_string)
}

/// First line that looks like a list of author names
pub fn find_authors(lines: &[&str]) -> Vec<String> {
    for line in lines.iter().take(AUTHOR_LINES) {
        for pattern in &patterns().authors {
            let Some(found) = pattern.find(line) else {
                continue;
            };
            let text = found.as_str();
            if text.chars().count() <= 5 {
                continue;
            }

            let parts: Vec<&str> = if text.contains(" and ") {
                text.split(" and ").collect()
            } else if text.contains(',') {
                text.split(',').collect()
            } else {
                vec![text]
            };

            let authors: Vec<String> = parts
                .into_iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
            if !authors.is_empty() {
                return authors;
            }
        }
    }
    Vec::new()
}

/// First 19xx/20xx token scanning top to bottom
pub fn find_year(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .find_map(|line| patterns().year.find(line))
        .map(|m| m.as_str().to_string())
}

/// First `DOI: prefix/suffix` anywhere in the text
pub fn find_doi(text: &str) -> Option<String> {
    patterns()
        .doi
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Text between an `abstract` marker and the next section marker
pub fn find_abstract(text: &str) -> Option<String> {
    let p = patterns();
    let start = p.abstract_start.find(text)?;
    let body = &text[start.end()..];

    // At least one character of body before the terminator
    let first = body.chars().next()?;
    let end = p.abstract_end.find_at(body, first.len_utf8())?;

    Some(body[..end.start()].trim().to_string())
}
