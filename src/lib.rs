//! # paper-mdc
//!
//! Turns scientific-paper PDFs into `.mdc` reference documents for AI coding
//! assistants, plus a README explaining how to use each one.
//!
//! ## Architecture
//!
//! The library is organized as a pipeline of modules:
//!
//! - [`extract`]: page text, metadata, sections, code blocks and formulas from a PDF
//! - [`organize`]: sorts extracted content into a fixed set of buckets
//! - [`classify`]: picks a topic folder and names the paper after its key technique
//! - [`generate`]: renders and writes the `.mdc` document and README
//! - [`pipeline`]: runs all of the above for one paper
//! - [`book`]: chapter detection and extraction for book-length PDFs
//! - [`models`]: data passed between the stages
//! - [`config`]: configuration and the heuristic rule tables
//! - [`utils`]: path validation, slugs and terminal formatting

pub mod book;
pub mod classify;
pub mod config;
pub mod extract;
pub mod generate;
pub mod models;
pub mod organize;
pub mod pipeline;
pub mod utils;

// Re-export commonly used types
pub use config::{ClassifierRules, Config};
pub use extract::{extract_pdf, ExtractError, PdfExtractor};
pub use models::{ExtractedContent, OrganizedContent};
pub use organize::organize_content;
pub use pipeline::{process_paper, PaperProcessor, ProcessError, ProcessingResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
