//! Picks a short "key technique" name for a paper.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::models::OrganizedContent;
use crate::utils::{slugify, FALLBACK_SLUG};

/// Words never accepted as a technique name
const STOP_WORDS: [&str; 5] = ["the", "and", "for", "with", "using"];
/// Leading key concepts considered
const CONCEPT_CANDIDATES: usize = 5;

struct Patterns {
    title: [Regex; 3],
    abstract_phrases: [Regex; 2],
    methodology_name: Regex,
    numbered_algorithm: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        title: [
            // leading phrase or phrase after a colon
            Regex::new(r"(?:^|:\s)([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)").expect("title phrase pattern"),
            Regex::new(r"([A-Z]{2,})").expect("title acronym pattern"),
            Regex::new(r"([a-z]+(?:-[a-z]+)+)").expect("hyphenated term pattern"),
        ],
        abstract_phrases: [
            Regex::new(
                r"(?:propose|introduce|present|develop|design)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
            )
            .expect("proposal pattern"),
            Regex::new(
                r"([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s+(?:method|approach|technique|algorithm|framework|system)",
            )
            .expect("named method pattern"),
        ],
        methodology_name: Regex::new(
            r"([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s+(?:algorithm|method|technique)",
        )
        .expect("methodology name pattern"),
        numbered_algorithm: Regex::new(
            r"(?:Algorithm|Method|Technique)\s+(\d+):\s*([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
        )
        .expect("numbered algorithm pattern"),
    })
}

fn usable(candidate: &str) -> bool {
    let len = candidate.chars().count();
    len > 3 && len < 30
}

fn captures(pattern: &Regex, text: &str, group: usize) -> Vec<String> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(group))
        .map(|m| m.as_str().to_string())
        .filter(|c| usable(c))
        .collect()
}

/// Candidate lists in priority order: key concepts, title tokens, abstract
/// phrasing, methodology algorithm names.
pub fn technique_candidates(organized: &OrganizedContent) -> [Vec<String>; 4] {
    let p = patterns();

    let concepts = organized
        .key_concepts
        .iter()
        .take(CONCEPT_CANDIDATES)
        .filter(|c| usable(c))
        .cloned()
        .collect();

    let title = organized.metadata.title.as_deref().unwrap_or("");
    let title_tokens = p
        .title
        .iter()
        .flat_map(|pattern| captures(pattern, title, 1))
        .collect();

    let abstract_phrases = p
        .abstract_phrases
        .iter()
        .flat_map(|pattern| captures(pattern, &organized.r#abstract, 1))
        .collect();

    let methodology = &organized.methodology.content;
    let mut method_names = captures(&p.methodology_name, methodology, 1);
    method_names.extend(captures(&p.numbered_algorithm, methodology, 2));

    [concepts, title_tokens, abstract_phrases, method_names]
}

fn dedup(candidates: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| {
            let lower = c.to_lowercase();
            !STOP_WORDS.contains(&lower.as_str()) && seen.insert(lower)
        })
        .collect()
}

fn is_all_caps(candidate: &str) -> bool {
    candidate.chars().any(char::is_alphabetic) && !candidate.chars().any(char::is_lowercase)
}

/// The key technique name, or `None` when no source yields a candidate.
///
/// The first non-empty candidate list wins. Within it, the first entry that
/// is all-caps or at most three words is preferred, else its first entry.
pub fn key_technique_name(organized: &OrganizedContent) -> Option<String> {
    let list = technique_candidates(organized)
        .into_iter()
        .map(dedup)
        .find(|list| !list.is_empty())?;

    list.iter()
        .find(|c| is_all_caps(c) || c.split_whitespace().count() <= 3)
        .or_else(|| list.first())
        .cloned()
}

/// Folder name for a paper: slug of the technique name, else of the title
pub fn folder_name(organized: &OrganizedContent) -> String {
    let base = key_technique_name(organized)
        .or_else(|| organized.metadata.title.clone())
        .unwrap_or_else(|| FALLBACK_SLUG.to_string());
    slugify(&base)
}

/// File name of the generated reference document
pub fn mdc_filename(folder: &str) -> String {
    format!("{folder}.mdc")
}
