//! Sorts extracted paper content into fixed buckets.
//!
//! The [`ContentOrganizer`] runs its steps in a fixed order over one
//! [`ExtractedContent`] and produces an [`OrganizedContent`]. Every bucket is
//! built from keyword tables in [`ClassifierRules`], so results are fully
//! determined by the rules and the input text.

mod buckets;
mod concepts;

pub use buckets::{split_sentences, KeywordBucket, MetricBucket, Shape};
pub use concepts::{key_concepts, section_concepts};

use crate::config::{BucketCaps, ClassifierRules, RuleError};
use crate::models::{CodeBlock, ExtractedContent, OrganizedContent, OrganizedSection, Section};

/// Characters of a block's code used to find it inside a section
const SECTION_MATCH_CHARS: usize = 100;
/// Characters of a block's code used to find it inside the full text
const CONTEXT_MATCH_CHARS: usize = 50;
/// Characters of context kept on each side of a code example
const CONTEXT_RADIUS: usize = 200;

/// Organizes extracted content into buckets
#[derive(Debug, Clone)]
pub struct ContentOrganizer {
    caps: BucketCaps,
    methodology_keywords: Vec<String>,
    implementation: KeywordBucket,
    best_practices: KeywordBucket,
    metrics: MetricBucket,
    limitations: KeywordBucket,
    related: KeywordBucket,
    applications: KeywordBucket,
}

impl ContentOrganizer {
    pub fn new(rules: &ClassifierRules) -> Result<Self, RuleError> {
        let caps = rules.caps.clone();
        Ok(Self {
            methodology_keywords: rules
                .methodology_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            implementation: KeywordBucket::new(
                Shape::Trailing,
                &rules.implementation_keywords,
                caps.implementation_patterns,
            )?,
            best_practices: KeywordBucket::new(
                Shape::Sentence,
                &rules.best_practice_keywords,
                caps.best_practices,
            )?,
            metrics: MetricBucket::new(&rules.metric_patterns, caps.performance_metrics)?,
            limitations: KeywordBucket::new(
                Shape::Sentence,
                &rules.limitation_keywords,
                caps.limitations,
            )?,
            related: KeywordBucket::new(
                Shape::Sentence,
                &rules.related_keywords,
                caps.related_techniques,
            )?,
            applications: KeywordBucket::new(
                Shape::Sentence,
                &rules.application_keywords,
                caps.practical_applications,
            )?,
            caps,
        })
    }

    /// Organize one document
    pub fn organize(&self, content: &ExtractedContent) -> OrganizedContent {
        let text = content.full_text.as_str();
        let mut organized = OrganizedContent::new(content.metadata.clone());

        organized.r#abstract = find_abstract(content);
        organized.sections = content
            .sections
            .iter()
            .map(|s| self.organize_section(s, content))
            .collect();
        organized.key_concepts = key_concepts(
            text,
            content.sections.iter().map(|s| s.title.as_str()),
            self.caps.key_concepts,
        );
        organized.methodology = self.methodology(content);
        organized.implementation_patterns = self.implementation.collect(text);
        organized.code_examples = code_examples(content);
        organized.formulas = dedup_formulas(&content.formulas);
        organized.best_practices = self.best_practices.collect(text);
        organized.performance_metrics = self.metrics.collect(text);
        organized.limitations = self.limitations.collect(text);
        organized.related_techniques = self.related.collect(text);
        organized.practical_applications = self.applications.collect(text);

        tracing::debug!(
            sections = organized.sections.len(),
            concepts = organized.key_concepts.len(),
            code_examples = organized.code_examples.len(),
            formulas = organized.formulas.len(),
            "organized content"
        );
        organized
    }

    fn organize_section(&self, section: &Section, content: &ExtractedContent) -> OrganizedSection {
        OrganizedSection {
            title: section.title.clone(),
            content: section.content.clone(),
            code_blocks: blocks_within(&section.content, &content.code_blocks),
            formulas: dedup_formulas(&formulas_within(&section.content, &content.formulas)),
            key_concepts: section_concepts(&section.content, self.caps.section_concepts),
        }
    }

    fn is_methodology(&self, title: &str) -> bool {
        let lower = title.to_lowercase();
        self.methodology_keywords.iter().any(|k| lower.contains(k))
    }

    fn methodology(&self, content: &ExtractedContent) -> OrganizedSection {
        let mut methodology = OrganizedSection::new("Methodology", "");
        let mut parts = Vec::new();

        for section in content.sections.iter().filter(|s| self.is_methodology(&s.title)) {
            parts.push(section.content.as_str());
            methodology
                .code_blocks
                .extend(blocks_within(&section.content, &content.code_blocks));
            methodology
                .formulas
                .extend(formulas_within(&section.content, &content.formulas));
        }

        methodology.content = parts.join("\n\n");
        methodology.formulas = dedup_formulas(&methodology.formulas);
        methodology
    }
}

/// Organize with the default rules
pub fn organize_content(content: &ExtractedContent) -> Result<OrganizedContent, RuleError> {
    Ok(ContentOrganizer::new(&ClassifierRules::default())?.organize(content))
}

fn find_abstract(content: &ExtractedContent) -> String {
    if let Some(text) = content.metadata.r#abstract.as_deref() {
        if !text.is_empty() {
            return text.to_string();
        }
    }

    content
        .sections
        .iter()
        .find(|s| s.title.to_lowercase().contains("abstract"))
        .map(|s| s.content.trim().to_string())
        .unwrap_or_default()
}

fn blocks_within(text: &str, blocks: &[CodeBlock]) -> Vec<CodeBlock> {
    blocks
        .iter()
        .filter(|b| text.contains(b.head(SECTION_MATCH_CHARS)))
        .cloned()
        .collect()
}

fn formulas_within(text: &str, formulas: &[String]) -> Vec<String> {
    formulas
        .iter()
        .filter(|f| text.contains(f.as_str()))
        .cloned()
        .collect()
}

/// Every code block, with surrounding text attached when it can be located
fn code_examples(content: &ExtractedContent) -> Vec<CodeBlock> {
    let text = content.full_text.as_str();
    content
        .code_blocks
        .iter()
        .map(|block| {
            let mut block = block.clone();
            if let Some(idx) = text.find(block.head(CONTEXT_MATCH_CHARS)) {
                if idx > 0 {
                    block.context = Some(context_window(text, idx, idx + block.code.len()));
                }
            }
            block
        })
        .collect()
}

/// Text from `CONTEXT_RADIUS` chars before `start` to that many after `end`
fn context_window(text: &str, start: usize, end: usize) -> String {
    let from = text[..start]
        .char_indices()
        .rev()
        .nth(CONTEXT_RADIUS - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let mut end = end.min(text.len());
    while !text.is_char_boundary(end) {
        end += 1;
    }
    let to = text[end..]
        .char_indices()
        .nth(CONTEXT_RADIUS)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    text[from..to].to_string()
}

/// Strip every surrounding `$` and surrounding whitespace
pub fn strip_formula(formula: &str) -> &str {
    let mut current = formula.trim();
    loop {
        let next = current.trim_matches('$').trim();
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Clean formulas, dropping empties and later duplicates
pub fn dedup_formulas(formulas: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    formulas
        .iter()
        .map(|f| strip_formula(f))
        .filter(|f| !f.is_empty())
        .filter(|f| seen.insert(f.to_string()))
        .map(str::to_string)
        .collect()
}
