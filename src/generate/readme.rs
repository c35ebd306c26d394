//! Companion README explaining a generated reference document.

use crate::models::OrganizedContent;
use crate::utils::validate_doi;

/// Key concepts listed in the README
const README_CONCEPTS: usize = 10;

const CONTENTS: [&str; 11] = [
    "Paper metadata and abstract",
    "Key concepts and techniques",
    "Methodology and algorithms",
    "Implementation patterns",
    "Code examples and snippets",
    "Mathematical foundations (formulas)",
    "Best practices and recommendations",
    "Performance metrics and benchmarks",
    "Limitations and assumptions",
    "Related techniques and references",
    "Practical applications",
];

/// Render `README.md` for the folder `folder` holding `filename`
pub fn render_readme(organized: &OrganizedContent, folder: &str, filename: &str) -> String {
    let metadata = &organized.metadata;
    let title = organized.display_title();
    let authors = metadata.author_line().unwrap_or_else(|| "Unknown".to_string());
    let year = metadata.year.as_deref().unwrap_or("Unknown");
    let path = format!("{folder}/{filename}");

    let mut out = String::new();
    let mut line = |text: &str| {
        out.push_str(text);
        out.push('\n');
    };

    line(&format!("# {title}"));
    line("");
    line(&format!("**Authors:** {authors}  "));
    line(&format!("**Year:** {year}"));
    line("");
    line("---");
    line("");
    line("## What is This?");
    line("");
    line(&format!(
        "This folder holds an MDC rule file derived from the paper **{title}**."
    ));
    line("");
    line(
        "The rule file is a condensed, implementation-oriented reference: the \
         techniques, patterns and formulas of the paper, laid out so an editor \
         assistant can load it as context while you write code.",
    );
    line("");
    line("## Contents");
    line("");
    line(&format!("- **`{filename}`** - the rule file, containing:"));
    for item in CONTENTS {
        line(&format!("  - {item}"));
    }
    line("");
    line("- **`README.md`** - this file");
    line("");
    line("## How It Was Generated");
    line("");
    line("The rule file was produced automatically from the PDF:");
    line("");
    line("1. **Text extraction** - every page is read and split into sections");
    line("2. **Detection** - code blocks, formulas and tables are located");
    line("3. **Organization** - sentences are sorted into the buckets listed above");
    line("4. **Classification** - the paper is filed under the best matching topic folder");
    line("");
    line("## How to Use It");
    line("");
    line("Mention the file when asking for an implementation:");
    line("");
    line("```");
    line(&format!("\"Use the techniques from {path} to implement [feature]\""));
    line(&format!("\"Follow the patterns in {path} for [use case]\""));
    line(&format!("\"Apply the methodology from {path}\""));
    line("```");
    line("");
    line("Or reference it from a project rules file:");
    line("");
    line("```");
    line(&format!("@{path}"));
    line("```");
    line("");
    line("## Key Concepts");
    line("");
    if organized.key_concepts.is_empty() {
        line("- (no key concepts were detected)");
    } else {
        for concept in organized.key_concepts.iter().take(README_CONCEPTS) {
            line(&format!("- {concept}"));
        }
    }
    line("");
    line("## Related Resources");
    line("");
    if let Some(doi) = &metadata.doi {
        match validate_doi(doi) {
            Ok(normalized) => line(&format!(
                "- **Original Paper DOI:** [{doi}](https://doi.org/{normalized})"
            )),
            Err(_) => line(&format!("- **Original Paper DOI:** {doi}")),
        }
    }
    line(&format!("- **Paper Title:** {title}"));
    line("");
    line("## Notes");
    line("");
    line("- Generated heuristically; verify critical details against the original paper");
    line("- Code examples are copied from the paper and may need adaptation");
    line("- Review the limitations section before relying on a technique");

    out
}
