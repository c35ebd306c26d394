//! Models for content extracted from a paper PDF.

use serde::{Deserialize, Serialize};

/// Bibliographic metadata recovered from the first pages of a paper.
///
/// Every field is best-effort: `None` (or an empty author list) means the
/// heuristic found nothing, which is not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaperMetadata {
    /// Paper title
    pub title: Option<String>,

    /// Authors in the order they were found
    #[serde(default)]
    pub authors: Vec<String>,

    /// Four-digit publication year
    pub year: Option<String>,

    /// Digital Object Identifier (without the `DOI:` prefix)
    pub doi: Option<String>,

    /// Abstract text, trimmed
    pub r#abstract: Option<String>,
}

impl PaperMetadata {
    /// Returns the authors joined with `", "`, or `None` when no authors were found
    pub fn author_line(&self) -> Option<String> {
        if self.authors.is_empty() {
            None
        } else {
            Some(self.authors.join(", "))
        }
    }
}

/// One physical page of the PDF
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number
    pub page_number: usize,

    /// Raw page text
    pub text: String,

    /// Page width in PDF points, when the backend knows it
    pub width: Option<f64>,

    /// Page height in PDF points, when the backend knows it
    pub height: Option<f64>,
}

impl Page {
    /// Create a page without geometry
    pub fn new(page_number: usize, text: impl Into<String>) -> Self {
        Self {
            page_number,
            text: text.into(),
            width: None,
            height: None,
        }
    }

    /// Number of lines on this page
    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }
}

/// A raw table found on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Page the table was found on
    pub page_number: usize,

    /// Cell text, row by row
    pub rows: Vec<Vec<String>>,
}

/// A titled slice of the paper's text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Header line that opened the section (stripped)
    pub title: String,

    /// Lines up to the next header, joined with `\n`
    pub content: String,
}

/// A run of code-like lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Guessed language, `unknown` when nothing matched
    pub language: String,

    /// The code lines joined with `\n`
    pub code: String,

    /// 0-based line index of the first code line in the full text
    pub line_number: usize,

    /// Text surrounding the block, filled in by the organizer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl CodeBlock {
    /// The leading `n` characters of the code, used to locate the block in other text
    pub fn head(&self, n: usize) -> &str {
        match self.code.char_indices().nth(n) {
            Some((idx, _)) => &self.code[..idx],
            None => &self.code,
        }
    }
}

/// Everything pulled out of a single PDF
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedContent {
    /// Best-effort bibliographic metadata
    pub metadata: PaperMetadata,

    /// Non-empty page texts joined by a blank line
    pub full_text: String,

    /// Pages with text, in document order
    pub pages: Vec<Page>,

    /// Raw tables from all pages
    pub tables: Vec<Table>,

    /// Text before the first detected section header
    pub preamble: Option<String>,

    /// Sections in document order
    pub sections: Vec<Section>,

    /// Detected code blocks in document order
    pub code_blocks: Vec<CodeBlock>,

    /// Raw formula matches, possibly with duplicates
    pub formulas: Vec<String>,
}

impl ExtractedContent {
    /// Text of the first page, or an empty string for a document without text
    pub fn first_page_text(&self) -> &str {
        self.pages.first().map(|p| p.text.as_str()).unwrap_or("")
    }

    /// Page number that holds the given 0-based line of `full_text`.
    ///
    /// Lines are counted page by page, with the blank separator line between
    /// pages attributed to the following page. Falls back to page 1 past the end.
    pub fn page_for_line(&self, line: usize) -> usize {
        let mut seen = 0;
        for page in &self.pages {
            let lines = page.line_count();
            if seen + lines > line {
                return page.page_number;
            }
            seen += lines + 1;
        }
        1
    }
}
