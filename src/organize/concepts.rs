//! Capitalized-phrase and acronym harvesting.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

struct Patterns {
    definitions: [Regex; 3],
    title_word: Regex,
    capitalized: Regex,
    acronym: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        definitions: [
            // "Gaussian Splatting is ..."
            Regex::new(r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s+(?i:is|are|refers to|denotes)\b")
                .expect("defined-term pattern"),
            // "a technique called Mip Filtering"
            Regex::new(
                r"(?i:technique|method|approach|algorithm|pattern|framework)\s+(?i:called|named|termed)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
            )
            .expect("named-technique pattern"),
            Regex::new(r"\b([A-Z][A-Z]+)\b").expect("acronym pattern"),
        ],
        title_word: Regex::new(r"\b[A-Z][a-z]+\b").expect("title word pattern"),
        capitalized: Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\b")
            .expect("capitalized phrase pattern"),
        acronym: Regex::new(r"\b[A-Z]{2,}\b").expect("acronym pattern"),
    })
}

/// Document-level concepts: defined terms, named techniques, acronyms and
/// capitalized words from section titles. Sorted, at most `cap`.
pub fn key_concepts<'a>(
    full_text: &str,
    section_titles: impl IntoIterator<Item = &'a str>,
    cap: usize,
) -> Vec<String> {
    let p = patterns();
    let mut concepts = BTreeSet::new();

    for pattern in &p.definitions {
        for caps in pattern.captures_iter(full_text) {
            let Some(term) = caps.get(1) else { continue };
            let term = term.as_str().trim();
            let len = term.chars().count();
            if len > 2 && len < 50 {
                concepts.insert(term.to_string());
            }
        }
    }

    for title in section_titles {
        concepts.extend(p.title_word.find_iter(title).map(|m| m.as_str().to_string()));
    }

    concepts.into_iter().take(cap).collect()
}

/// Capitalized phrases and acronyms inside one section. Sorted, at most `cap`.
pub fn section_concepts(content: &str, cap: usize) -> Vec<String> {
    let p = patterns();
    let mut concepts = BTreeSet::new();

    for m in p.capitalized.find_iter(content) {
        let len = m.as_str().chars().count();
        if len > 3 && len < 30 {
            concepts.insert(m.as_str().to_string());
        }
    }
    concepts.extend(p.acronym.find_iter(content).map(|m| m.as_str().to_string()));

    concepts.into_iter().take(cap).collect()
}
