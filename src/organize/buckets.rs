//! Keyword-driven sentence extraction for the named buckets.

use regex::Regex;

use crate::config::{compile, RuleError};
use crate::extract::is_header;

/// Sentences shorter than this (after trimming) are discarded
const MIN_SENTENCE_CHARS: usize = 21;
/// Trailing phrases shorter than this are discarded
const MIN_PHRASE_CHARS: usize = 11;

/// How a keyword pulls text out of the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// The period-bounded sentence around the keyword
    Sentence,
    /// The phrase after `keyword:` up to the next period
    Trailing,
}

/// A bucket filled by one regex per keyword, in keyword order
#[derive(Debug, Clone)]
pub struct KeywordBucket {
    shape: Shape,
    patterns: Vec<Regex>,
    cap: usize,
}

impl KeywordBucket {
    pub fn new(shape: Shape, keywords: &[String], cap: usize) -> Result<Self, RuleError> {
        let patterns = keywords
            .iter()
            .map(|keyword| {
                let keyword = regex::escape(keyword);
                match shape {
                    Shape::Sentence => compile(&format!(r"(?i)[^.]*{keyword}[^.]*\.")),
                    Shape::Trailing => compile(&format!(r"(?i){keyword}[:\s]+([^.]+)")),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            shape,
            patterns,
            cap,
        })
    }

    /// Candidates for every keyword, concatenated then truncated to the cap.
    ///
    /// No deduplication: a sentence with two keywords appears twice.
    pub fn collect(&self, text: &str) -> Vec<String> {
        let mut found = Vec::new();
        for pattern in &self.patterns {
            match self.shape {
                Shape::Sentence => found.extend(
                    pattern
                        .find_iter(text)
                        .map(|m| m.as_str().trim())
                        .filter(|s| s.chars().count() >= MIN_SENTENCE_CHARS)
                        .map(str::to_string),
                ),
                Shape::Trailing => found.extend(
                    pattern
                        .captures_iter(text)
                        .filter_map(|caps| caps.get(1))
                        .map(|m| m.as_str().trim())
                        .filter(|s| s.chars().count() >= MIN_PHRASE_CHARS)
                        .map(str::to_string),
                ),
            }
        }
        found.truncate(self.cap);
        found
    }
}

/// Split text into sentences.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace or the end of
/// the text, or at a blank line. A period inside a number does not end one.
/// A line break next to a section header also ends one, so headers never
/// run into the body text.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut line_start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let next = chars.peek().map(|&(_, n)| n);
        let end = match c {
            '.' | '!' | '?' if next.map_or(true, char::is_whitespace) => Some(i + c.len_utf8()),
            '\n' if next == Some('\n')
                || is_header(text[line_start..i].trim())
                || is_header(line_at(text, i + 1)) =>
            {
                Some(i)
            }
            _ => None,
        };
        if c == '\n' {
            line_start = i + 1;
        }

        if let Some(end) = end {
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// The trimmed line beginning at byte offset `from`
fn line_at(text: &str, from: usize) -> &str {
    let rest = &text[from..];
    rest.split('\n').next().unwrap_or(rest).trim()
}

/// Sentences that mention a measurement
#[derive(Debug, Clone)]
pub struct MetricBucket {
    patterns: Vec<Regex>,
    cap: usize,
}

impl MetricBucket {
    pub fn new(patterns: &[String], cap: usize) -> Result<Self, RuleError> {
        Ok(Self {
            patterns: crate::config::compile_all(patterns)?,
            cap,
        })
    }

    /// For each pattern in order, every sentence it matches
    pub fn collect(&self, text: &str) -> Vec<String> {
        let sentences: Vec<&str> = split_sentences(text)
            .into_iter()
            .filter(|s| s.chars().count() >= MIN_SENTENCE_CHARS)
            .collect();

        let mut found = Vec::new();
        for pattern in &self.patterns {
            found.extend(
                sentences
                    .iter()
                    .filter(|s| pattern.is_match(s))
                    .map(|s| s.to_string()),
            );
        }
        found.truncate(self.cap);
        found
    }
}
