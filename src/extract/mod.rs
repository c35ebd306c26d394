//! Structural extraction from paper PDFs.
//!
//! - [`PdfExtractor`]: checks the input path, reads pages through a [`PageBackend`]
//!   and runs the [`ContentExtractor`] over them
//! - [`ContentExtractor`]: turns page texts into metadata, sections, code blocks,
//!   formulas and raw tables
//!
//! # Example
//!
//! ```no_run
//! use paper_mdc::extract::extract_pdf;
//!
//! let content = extract_pdf("papers/mip-splatting.pdf")?;
//! println!("{} pages, {} sections", content.pages.len(), content.sections.len());
//! # Ok::<(), paper_mdc::extract::ExtractError>(())
//! ```

mod backend;
mod detect;
mod metadata;
mod sections;
mod tables;

pub use backend::{default_backend, is_available, PageBackend, RawPage};
#[cfg(feature = "lopdf-backend")]
pub use backend::LopdfBackend;
#[cfg(feature = "pdf-extract-backend")]
pub use backend::PdfExtractBackend;
pub use detect::{CodeDetector, FormulaDetector};
pub use metadata::{extract_metadata, find_abstract, find_authors, find_doi, find_title, find_year};
pub use sections::{is_header, segment, Segmentation};
pub use tables::detect_tables;

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{ClassifierRules, RuleError};
use crate::models::{CodeBlock, ExtractedContent, Page, PaperMetadata};

/// Errors that can occur during PDF extraction
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("No PDF extraction backend available; build with `lopdf-backend` or `pdf-extract-backend`")]
    BackendUnavailable,

    #[error("Failed to extract text from PDF: {0}")]
    ExtractionFailed(String),

    #[error(transparent)]
    Rules(#[from] RuleError),
}

/// Turns raw page texts into structured content
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    code: CodeDetector,
    formulas: FormulaDetector,
}

impl ContentExtractor {
    pub fn new(rules: &ClassifierRules) -> Result<Self, RuleError> {
        Ok(Self {
            code: CodeDetector::new(rules)?,
            formulas: FormulaDetector::new(rules)?,
        })
    }

    /// Build the extracted content for a document's pages.
    ///
    /// Pages without text are skipped but still scanned for tables.
    pub fn extract_pages(&self, raw_pages: Vec<RawPage>) -> ExtractedContent {
        let mut content = ExtractedContent::default();

        for raw in raw_pages {
            content
                .tables
                .extend(detect_tables(raw.page_number, &raw.text));
            if raw.text.is_empty() {
                continue;
            }
            content.pages.push(Page {
                page_number: raw.page_number,
                text: raw.text,
                width: raw.width,
                height: raw.height,
            });
        }

        content.full_text = content
            .pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        content.metadata = extract_metadata(content.first_page_text(), &content.full_text);

        let segmentation = segment(&content.full_text);
        content.preamble = segmentation.preamble;
        content.sections = segmentation.sections;

        content.code_blocks = self.code.detect(&content.full_text);
        content.formulas = self.formulas.detect(&content.full_text);

        content
    }
}

/// Extracts content from one PDF file
pub struct PdfExtractor {
    path: PathBuf,
    backend: Box<dyn PageBackend>,
    extractor: ContentExtractor,
}

impl std::fmt::Debug for PdfExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfExtractor")
            .field("path", &self.path)
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl PdfExtractor {
    /// Create an extractor with the default rules and backend
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ExtractError> {
        Self::with_rules(path, &ClassifierRules::default())
    }

    /// Create an extractor with custom rules and the default backend
    pub fn with_rules(path: impl AsRef<Path>, rules: &ClassifierRules) -> Result<Self, ExtractError> {
        let path = check_path(path.as_ref())?;
        let backend = default_backend()?;
        Ok(Self {
            path,
            backend,
            extractor: ContentExtractor::new(rules)?,
        })
    }

    /// Create an extractor with an explicit backend
    pub fn with_backend(
        path: impl AsRef<Path>,
        backend: Box<dyn PageBackend>,
        rules: &ClassifierRules,
    ) -> Result<Self, ExtractError> {
        let path = check_path(path.as_ref())?;
        Ok(Self {
            path,
            backend,
            extractor: ContentExtractor::new(rules)?,
        })
    }

    /// Name of the backend in use
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Extract all content from the PDF
    pub fn extract(&self) -> Result<ExtractedContent, ExtractError> {
        tracing::debug!(
            path = %self.path.display(),
            backend = self.backend.name(),
            "extracting PDF"
        );
        let pages = self.backend.load_pages(&self.path)?;
        let content = self.extractor.extract_pages(pages);

        if content.full_text.trim().is_empty() {
            // Likely a scanned or image-only PDF
            tracing::warn!("No text extracted from {}", self.path.display());
        }
        Ok(content)
    }
}

fn check_path(path: &Path) -> Result<PathBuf, ExtractError> {
    if !path.is_file() {
        return Err(ExtractError::NotFound(path.to_path_buf()));
    }
    Ok(path.to_path_buf())
}

/// Extract content from a PDF with default rules
pub fn extract_pdf(path: impl AsRef<Path>) -> Result<ExtractedContent, ExtractError> {
    PdfExtractor::new(path)?.extract()
}

/// Section content kept in a dump
const DUMP_SECTION_CHARS: usize = 500;

/// Section entry of an [`ExtractionDump`], content cut short
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionPreview {
    pub title: String,
    pub content: String,
}

/// JSON dump of an extraction, for inspecting what the heuristics saw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionDump {
    pub metadata: PaperMetadata,
    pub pages: usize,
    pub sections: Vec<SectionPreview>,
    pub formulas: Vec<String>,
    pub code_blocks: Vec<CodeBlock>,
    pub tables: usize,
    pub full_text: String,
}

impl From<&ExtractedContent> for ExtractionDump {
    fn from(content: &ExtractedContent) -> Self {
        Self {
            metadata: content.metadata.clone(),
            pages: content.pages.len(),
            sections: content
                .sections
                .iter()
                .map(|s| SectionPreview {
                    title: s.title.clone(),
                    content: s.content.chars().take(DUMP_SECTION_CHARS).collect(),
                })
                .collect(),
            formulas: content.formulas.clone(),
            code_blocks: content.code_blocks.clone(),
            tables: content.tables.len(),
            full_text: content.full_text.clone(),
        }
    }
}
