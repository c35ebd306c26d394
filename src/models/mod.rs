//! Core data structures for extracted and organized paper content.

mod organized;
mod paper;

pub use organized::{OrganizedContent, OrganizedSection};
pub use paper::{CodeBlock, ExtractedContent, Page, PaperMetadata, Section, Table};
