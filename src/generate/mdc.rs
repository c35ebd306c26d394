//! Markdown rule document rendering.

use regex::Regex;
use std::sync::OnceLock;

use crate::models::{CodeBlock, OrganizedContent};

/// Section titles (numbering stripped) already covered by dedicated parts
const COVERED_SECTIONS: [&str; 3] = ["abstract", "introduction", "methodology"];

fn numbering() -> &'static Regex {
    static NUMBERING: OnceLock<Regex> = OnceLock::new();
    NUMBERING.get_or_init(|| Regex::new(r"^\s*(?:\d+\.)*\d*\.?\s*").expect("section numbering pattern"))
}

/// Section title without leading numbering, lowercased
pub fn normalized_title(title: &str) -> String {
    numbering().replace(title.trim(), "").trim().to_lowercase()
}

/// Line-oriented markdown builder
#[derive(Debug, Default)]
struct Doc {
    lines: Vec<String>,
}

impl Doc {
    fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn heading(&mut self, level: usize, title: &str) {
        self.line(format!("{} {}", "#".repeat(level), title));
        self.blank();
    }

    fn bullets(&mut self, title: &str, items: &[String]) {
        if items.is_empty() {
            return;
        }
        self.heading(2, title);
        for item in items {
            self.line(format!("- {item}"));
        }
        self.blank();
    }

    fn formulas(&mut self, formulas: &[String]) {
        for formula in formulas {
            self.line(format!("$${formula}$$"));
            self.blank();
        }
    }

    fn code(&mut self, block: &CodeBlock) {
        self.line(format!("```{}", block.language));
        self.line(block.code.as_str());
        self.line("```");
        self.blank();
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }
}

/// Render the `.mdc` reference document
pub fn render_mdc(organized: &OrganizedContent) -> String {
    let metadata = &organized.metadata;
    let mut doc = Doc::default();

    doc.line("---");
    doc.line("alwaysApply: false");
    doc.line("---");
    doc.blank();

    doc.heading(1, organized.display_title());

    doc.line("## Paper Metadata");
    if let Some(title) = &metadata.title {
        doc.line(format!("- **Title:** {title}"));
    }
    if let Some(authors) = metadata.author_line() {
        doc.line(format!("- **Authors:** {authors}"));
    }
    if let Some(year) = &metadata.year {
        doc.line(format!("- **Year:** {year}"));
    }
    if let Some(doi) = &metadata.doi {
        doc.line(format!("- **DOI/URL:** {doi}"));
    }
    doc.blank();

    if !organized.r#abstract.is_empty() {
        doc.heading(2, "Abstract / Summary");
        doc.line(organized.r#abstract.as_str());
        doc.blank();
    }

    doc.bullets("Key Concepts and Techniques", &organized.key_concepts);

    let methodology = &organized.methodology;
    if !methodology.content.is_empty() {
        doc.heading(2, "Methodology and Algorithms");
        doc.line(methodology.content.as_str());
        doc.blank();

        if !methodology.formulas.is_empty() {
            doc.heading(3, "Mathematical Foundations");
            doc.formulas(&methodology.formulas);
        }
    }

    doc.bullets("Implementation Patterns", &organized.implementation_patterns);

    let examples: Vec<&CodeBlock> = organized
        .code_examples
        .iter()
        .filter(|b| !b.code.is_empty())
        .collect();
    if !examples.is_empty() {
        doc.heading(2, "Code Examples and Snippets");
        for (i, block) in examples.into_iter().enumerate() {
            doc.heading(3, &format!("Code Example {}", i + 1));
            doc.code(block);
        }
    }

    if !organized.formulas.is_empty() {
        doc.heading(2, "Mathematical Foundations");
        doc.formulas(&organized.formulas);
    }

    doc.bullets("Best Practices and Recommendations", &organized.best_practices);
    doc.bullets("Performance Metrics and Benchmarks", &organized.performance_metrics);
    doc.bullets("Limitations and Assumptions", &organized.limitations);
    doc.bullets("Related Techniques and References", &organized.related_techniques);
    doc.bullets("Practical Applications", &organized.practical_applications);

    for section in &organized.sections {
        if COVERED_SECTIONS.contains(&normalized_title(&section.title).as_str()) {
            continue;
        }
        doc.heading(2, &section.title);
        doc.line(section.content.as_str());
        doc.blank();
    }

    doc.finish()
}
