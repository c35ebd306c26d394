//! Chapter structure for book-length PDFs.
//!
//! Books are run through the same extractor as papers; these helpers locate
//! chapter headings in the full text and cut out a single chapter.

use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::generate::GenerateError;
use crate::models::ExtractedContent;

/// Titles that look like numbered headings but are not chapters
const NOT_CHAPTERS: [&str; 3] = ["introduction", "abstract", "preface"];
/// Lines inspected after a candidate `CHAPTER` heading
const HEADING_WINDOW: usize = 5;
/// Lines inspected after a candidate `Chapter N: title` line
const BODY_WINDOW: usize = 10;
/// Characters a real chapter start has within [`BODY_WINDOW`] lines
const MIN_BODY_CHARS: usize = 200;

struct Patterns {
    headings: [Regex; 2],
    next_chapter: Regex,
    appendix: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        headings: [
            Regex::new(r"(?i)^Chapter\s+(\d+)[:\s]+(.+)$").expect("chapter heading pattern"),
            Regex::new(r"(?i)^\s*(\d+)\.\s*([a-z].+)$").expect("numbered heading pattern"),
        ],
        next_chapter: Regex::new(r"(?i)^Chapter\s+\d+:").expect("next chapter pattern"),
        appendix: Regex::new(r"(?i)^Appendix\s+[a-z]").expect("appendix pattern"),
    })
}

/// A chapter heading found in the text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chapter {
    pub number: String,
    pub title: String,
    /// 0-based line in the full text
    pub line: usize,
    /// Page the heading is on (approximate)
    pub page: usize,
}

impl Chapter {
    fn sort_key(&self) -> (u64, usize) {
        (self.number.parse().unwrap_or(u64::MAX), self.line)
    }
}

/// One chapter's text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterText {
    pub number: u32,
    pub title: String,
    pub content: String,
    pub start_line: usize,
    /// Exclusive
    pub end_line: usize,
}

/// Find chapter headings, deduplicated and ordered by chapter number
pub fn detect_chapters(content: &ExtractedContent) -> Vec<Chapter> {
    let p = patterns();
    let mut seen = HashSet::new();
    let mut chapters = Vec::new();

    for (index, line) in content.full_text.split('\n').enumerate() {
        let stripped = line.trim();
        let Some(caps) = p.headings.iter().find_map(|re| re.captures(stripped)) else {
            continue;
        };

        let number = caps[1].to_string();
        let title = caps[2].trim().to_string();
        if title.chars().count() <= 5 || NOT_CHAPTERS.contains(&title.to_lowercase().as_str()) {
            continue;
        }

        if seen.insert((number.clone(), title.to_lowercase())) {
            chapters.push(Chapter {
                page: content.page_for_line(index),
                number,
                title,
                line: index,
            });
        }
    }

    chapters.sort_by_key(Chapter::sort_key);
    chapters
}

fn find_start(lines: &[&str], number: u32, title: &str) -> Option<usize> {
    let upper_title = title.to_uppercase();

    // Spelled-out heading followed by chapter prose, not a contents entry
    let heading = lines.iter().enumerate().position(|(i, line)| {
        let upper = line.to_uppercase();
        if !upper.contains("CHAPTER") || !upper.contains(&upper_title) || i + HEADING_WINDOW >= lines.len() {
            return false;
        }
        let window = lines[i..i + HEADING_WINDOW].join("\n").to_lowercase();
        ["introduction", "what is", "this chapter"]
            .iter()
            .any(|marker| window.contains(marker))
    });
    if heading.is_some() {
        return heading;
    }

    let numbered = Regex::new(&format!(
        r"(?i)^Chapter\s+{number}:\s+{}",
        regex::escape(title)
    ))
    .ok()?;
    lines.iter().enumerate().position(|(i, line)| {
        numbered.is_match(line)
            && i + BODY_WINDOW < lines.len()
            && lines[i..i + BODY_WINDOW].join("\n").len() > MIN_BODY_CHARS
    })
}

/// Cut chapter `number` titled `title` out of the full text.
///
/// Ends at the next `Chapter N:` or `Appendix X` line, else at the end of the
/// text. `None` when the chapter start cannot be found.
pub fn extract_chapter(content: &ExtractedContent, number: u32, title: &str) -> Option<ChapterText> {
    let p = patterns();
    let lines: Vec<&str> = content.full_text.split('\n').collect();

    let Some(start) = find_start(&lines, number, title) else {
        tracing::warn!("Could not find start of chapter {}", number);
        return None;
    };

    let end = (start + 1..lines.len())
        .find(|&i| {
            let line = lines[i].trim();
            p.next_chapter.is_match(line) || p.appendix.is_match(line)
        })
        .unwrap_or(lines.len());

    tracing::debug!(start, end, "Chapter {} located", number);
    Some(ChapterText {
        number,
        title: title.to_string(),
        content: lines[start..end].join("\n"),
        start_line: start,
        end_line: end,
    })
}

/// Plain-text chapter structure report
pub fn render_structure(chapters: &[Chapter]) -> String {
    let mut out = String::from("CHAPTER STRUCTURE\n");
    out.push_str(&"=".repeat(50));
    out.push_str("\n\n");
    for chapter in chapters {
        out.push_str(&format!(
            "Chapter {}: {}\n  Page: ~{}\n  Line: {}\n\n",
            chapter.number, chapter.title, chapter.page, chapter.line
        ));
    }
    out
}

fn write(path: PathBuf, contents: &str) -> Result<PathBuf, GenerateError> {
    fs::write(&path, contents).map_err(|source| GenerateError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Write `extracted_book_text.txt` and `book_structure.txt` into `dir`
pub fn write_book_report(
    dir: &Path,
    content: &ExtractedContent,
    chapters: &[Chapter],
) -> Result<(PathBuf, PathBuf), GenerateError> {
    let text = write(dir.join("extracted_book_text.txt"), &content.full_text)?;
    let structure = write(dir.join("book_structure.txt"), &render_structure(chapters))?;
    Ok((text, structure))
}

/// Write `chapter_<n>_extracted.txt` into `dir`
pub fn write_chapter(dir: &Path, chapter: &ChapterText) -> Result<PathBuf, GenerateError> {
    write(
        dir.join(format!("chapter_{}_extracted.txt", chapter.number)),
        &chapter.content,
    )
}
