//! End-to-end processing of one paper.
//!
//! extract → organize → choose target folder → name → render → write → find related

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::classify::{folder_name, TopicClassifier, TopicMatch};
use crate::config::{ClassifierRules, Config, RuleError};
use crate::extract::{ExtractError, PageBackend, PdfExtractor};
use crate::generate::{find_related_documents, write_reference, GenerateError};
use crate::models::{ExtractedContent, OrganizedContent};
use crate::organize::ContentOrganizer;
use crate::utils::{validate_output_folder, ValidationError};

/// Errors that abort processing a paper
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Rules(#[from] RuleError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Generate(#[from] GenerateError),
}

/// Bibliographic summary of a processed paper
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataSummary {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub year: Option<String>,
}

/// Counts reported after processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessingStats {
    pub pages: usize,
    pub tables: usize,
    pub sections: usize,
    pub code_examples: usize,
    pub formulas: usize,
    pub key_concepts: usize,
}

/// Outcome of processing one paper
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingResult {
    pub success: bool,
    pub mdc_path: PathBuf,
    pub readme_path: PathBuf,
    pub paper_folder: PathBuf,
    pub target_folder: PathBuf,
    /// Classification result; absent when the output folder was given explicitly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<TopicMatch>,
    pub related_documents: Vec<PathBuf>,
    pub metadata: MetadataSummary,
    pub stats: ProcessingStats,
}

/// Turns paper PDFs into reference documents under a workspace root
#[derive(Debug, Clone)]
pub struct PaperProcessor {
    workspace_root: PathBuf,
    rules: ClassifierRules,
    find_related: bool,
    organizer: ContentOrganizer,
    classifier: TopicClassifier,
}

impl PaperProcessor {
    /// Processor with the default rules
    pub fn new(workspace_root: impl Into<PathBuf>) -> Result<Self, ProcessError> {
        Self::with_rules(workspace_root, ClassifierRules::default())
    }

    /// Processor with custom rules
    pub fn with_rules(
        workspace_root: impl Into<PathBuf>,
        rules: ClassifierRules,
    ) -> Result<Self, ProcessError> {
        Ok(Self {
            workspace_root: workspace_root.into(),
            organizer: ContentOrganizer::new(&rules)?,
            classifier: TopicClassifier::new(&rules),
            rules,
            find_related: true,
        })
    }

    /// Processor from loaded configuration
    pub fn from_config(config: &Config) -> Result<Self, ProcessError> {
        Ok(Self::with_rules(config.output.workspace_root.clone(), config.rules.clone())?
            .find_related(config.output.find_related))
    }

    /// Enable or disable the related-document scan
    pub fn find_related(mut self, enabled: bool) -> Self {
        self.find_related = enabled;
        self
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Process a PDF with the default backend
    pub fn process(
        &self,
        pdf_path: &Path,
        output_folder: Option<&str>,
    ) -> Result<ProcessingResult, ProcessError> {
        tracing::info!("Processing paper: {}", pdf_path.display());
        let extractor = PdfExtractor::with_rules(pdf_path, &self.rules)?;
        self.process_extracted(self.extract(&extractor)?, output_folder)
    }

    /// Process a PDF read through an explicit backend
    pub fn process_with_backend(
        &self,
        pdf_path: &Path,
        backend: Box<dyn PageBackend>,
        output_folder: Option<&str>,
    ) -> Result<ProcessingResult, ProcessError> {
        tracing::info!("Processing paper: {}", pdf_path.display());
        let extractor = PdfExtractor::with_backend(pdf_path, backend, &self.rules)?;
        self.process_extracted(self.extract(&extractor)?, output_folder)
    }

    fn extract(&self, extractor: &PdfExtractor) -> Result<ExtractedContent, ProcessError> {
        tracing::info!("Step 1: Extracting content ({} backend)", extractor.backend_name());
        let extracted = extractor.extract()?;
        tracing::info!(
            pages = extracted.pages.len(),
            sections = extracted.sections.len(),
            code_blocks = extracted.code_blocks.len(),
            tables = extracted.tables.len(),
            "Extracted content"
        );
        Ok(extracted)
    }

    /// Organize, classify and write already extracted content
    pub fn process_extracted(
        &self,
        extracted: ExtractedContent,
        output_folder: Option<&str>,
    ) -> Result<ProcessingResult, ProcessError> {
        tracing::info!("Step 2: Organizing content");
        let organized = self.organizer.organize(&extracted);
        tracing::info!(
            key_concepts = organized.key_concepts.len(),
            code_examples = organized.code_examples.len(),
            formulas = organized.formulas.len(),
            "Organized content"
        );

        tracing::info!("Step 3: Determining output location");
        let (target_folder, topic) = self.target_folder(&organized, output_folder)?;
        tracing::info!("Target folder: {}", target_folder.display());

        let slug = folder_name(&organized);
        tracing::info!("Step 4: Writing reference documents as {}", slug);
        let files = write_reference(&target_folder, &slug, &organized)?;
        tracing::info!("Created {}", files.mdc_path.display());

        let related_documents = if self.find_related {
            tracing::info!("Step 5: Identifying related documents");
            let mut related = find_related_documents(
                &self.workspace_root,
                &self.rules.topic_names(),
                &organized.key_concepts,
            );
            related.retain(|path| path != &files.mdc_path);
            tracing::info!("Found {} related documents", related.len());
            related
        } else {
            Vec::new()
        };

        Ok(ProcessingResult {
            success: true,
            mdc_path: files.mdc_path,
            readme_path: files.readme_path,
            paper_folder: files.paper_folder,
            target_folder,
            topic,
            related_documents,
            metadata: MetadataSummary {
                title: organized.metadata.title.clone(),
                authors: organized.metadata.authors.clone(),
                year: organized.metadata.year.clone(),
            },
            stats: ProcessingStats {
                pages: extracted.pages.len(),
                tables: extracted.tables.len(),
                sections: organized.sections.len(),
                code_examples: organized.code_examples.len(),
                formulas: organized.formulas.len(),
                key_concepts: organized.key_concepts.len(),
            },
        })
    }

    /// Explicit folder under the workspace root, else the classified topic folder
    pub fn target_folder(
        &self,
        organized: &OrganizedContent,
        output_folder: Option<&str>,
    ) -> Result<(PathBuf, Option<TopicMatch>), ProcessError> {
        if let Some(folder) = output_folder {
            let folder = validate_output_folder(folder)?;
            return Ok((self.workspace_root.join(folder), None));
        }

        let topic = self.classifier.classify(organized);
        tracing::debug!(topic = %topic.topic, score = topic.score, "Classified paper");
        Ok((self.workspace_root.join(&topic.topic), Some(topic)))
    }
}

/// Process a paper with default rules under `workspace_root`
pub fn process_paper(
    pdf_path: &Path,
    workspace_root: &Path,
    output_folder: Option<&str>,
) -> Result<ProcessingResult, ProcessError> {
    PaperProcessor::new(workspace_root)?.process(pdf_path, output_folder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PaperMetadata, Page};

    fn extracted(title: &str, text: &str) -> ExtractedContent {
        ExtractedContent {
            metadata: PaperMetadata {
                title: Some(title.to_string()),
                ..Default::default()
            },
            full_text: text.to_string(),
            pages: vec![Page::new(1, text)],
            ..Default::default()
        }
    }

    #[test]
    fn test_explicit_folder_skips_classification() {
        let dir = tempfile::tempdir().unwrap();
        let processor = PaperProcessor::new(dir.path()).unwrap();

        let result = processor
            .process_extracted(extracted("Some Paper", "text"), Some("custom/area"))
            .unwrap();
        assert_eq!(result.target_folder, dir.path().join("custom/area"));
        assert_eq!(result.topic, None);
        assert!(result.mdc_path.starts_with(dir.path().join("custom/area")));
    }

    #[test]
    fn test_traversal_is_rejected_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let processor = PaperProcessor::new(dir.path().join("root")).unwrap();

        let result = processor.process_extracted(extracted("Some Paper", "text"), Some("../escape"));
        assert!(matches!(
            result,
            Err(ProcessError::Validation(ValidationError::PathTraversal(_)))
        ));
        assert!(!dir.path().join("escape").exists());
    }

    #[test]
    fn test_classified_folder_and_stats() {
        let dir = tempfile::tempdir().unwrap();
        let processor = PaperProcessor::new(dir.path()).unwrap();

        let result = processor
            .process_extracted(extracted("on things", "nothing to see"), None)
            .unwrap();
        assert_eq!(
            result.topic,
            Some(TopicMatch {
                topic: "ai".to_string(),
                score: 0
            })
        );
        assert_eq!(result.target_folder, dir.path().join("ai"));
        assert_eq!(result.paper_folder, dir.path().join("ai/on-things"));
        assert_eq!(result.stats.pages, 1);
        assert!(result.readme_path.is_file());
    }

    #[test]
    fn test_new_document_is_not_its_own_relative() {
        let dir = tempfile::tempdir().unwrap();
        let processor = PaperProcessor::new(dir.path()).unwrap();
        let text = "Splatting is fast.";

        let first = processor
            .process_extracted(extracted("Splat Paper", text), None)
            .unwrap();
        assert!(first.related_documents.is_empty());

        let second = processor
            .process_extracted(extracted("Other Splat Paper", text), Some("engines"))
            .unwrap();
        assert_eq!(second.related_documents, vec![first.mdc_path]);
    }

    #[test]
    fn test_related_scan_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let processor = PaperProcessor::new(dir.path()).unwrap().find_related(false);
        let text = "Splatting is fast.";

        processor
            .process_extracted(extracted("Splat Paper", text), None)
            .unwrap();
        let second = processor
            .process_extracted(extracted("Other Splat Paper", text), Some("engines"))
            .unwrap();
        assert!(second.related_documents.is_empty());
    }

    #[test]
    fn test_result_serializes() {
        let dir = tempfile::tempdir().unwrap();
        let result = PaperProcessor::new(dir.path())
            .unwrap()
            .process_extracted(extracted("Some Paper", "text"), None)
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["topic"]["topic"], "ai");
        assert_eq!(json["metadata"]["title"], "Some Paper");
        assert!(json["stats"]["sections"].is_number());
    }
}
