//! Organized view of a paper, ready for rendering.

use serde::{Deserialize, Serialize};

use super::paper::{CodeBlock, PaperMetadata};

/// A section re-labelled with the artifacts found inside it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizedSection {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub code_blocks: Vec<CodeBlock>,
    #[serde(default)]
    pub formulas: Vec<String>,
    #[serde(default)]
    pub key_concepts: Vec<String>,
}

impl OrganizedSection {
    /// Create a section with no attached artifacts
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }
}

/// The fixed set of buckets a paper is organized into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizedContent {
    pub metadata: PaperMetadata,

    /// Abstract from the metadata or an `Abstract` section, empty when neither exists
    pub r#abstract: String,

    pub key_concepts: Vec<String>,
    pub methodology: OrganizedSection,
    pub implementation_patterns: Vec<String>,
    pub code_examples: Vec<CodeBlock>,

    /// Deduplicated formulas without surrounding `$` delimiters
    pub formulas: Vec<String>,

    pub best_practices: Vec<String>,
    pub performance_metrics: Vec<String>,
    pub limitations: Vec<String>,
    pub related_techniques: Vec<String>,
    pub practical_applications: Vec<String>,
    pub sections: Vec<OrganizedSection>,
}

impl OrganizedContent {
    /// An empty organization for the given metadata
    pub fn new(metadata: PaperMetadata) -> Self {
        Self {
            metadata,
            r#abstract: String::new(),
            key_concepts: Vec::new(),
            methodology: OrganizedSection::new("Methodology", ""),
            implementation_patterns: Vec::new(),
            code_examples: Vec::new(),
            formulas: Vec::new(),
            best_practices: Vec::new(),
            performance_metrics: Vec::new(),
            limitations: Vec::new(),
            related_techniques: Vec::new(),
            practical_applications: Vec::new(),
            sections: Vec::new(),
        }
    }

    /// Title to display, with a generic fallback
    pub fn display_title(&self) -> &str {
        self.metadata
            .title
            .as_deref()
            .unwrap_or("Scientific Paper Technique")
    }
}
