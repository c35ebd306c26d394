//! Topic classification and naming of organized papers.
//!
//! A paper lands in one of the topic folders from [`ClassifierRules::topics`],
//! scored by how many of each topic's keywords occur in its abstract, key
//! concepts and methodology. Its own folder and file are named after its key
//! technique (see [`key_technique_name`]).

mod technique;

pub use technique::{folder_name, key_technique_name, mdc_filename, technique_candidates};

use serde::Serialize;

use crate::config::{ClassifierRules, TopicRule};
use crate::models::OrganizedContent;

/// The chosen topic and the keyword count that won it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicMatch {
    pub topic: String,
    pub score: usize,
}

/// Scores organized content against the topic table
#[derive(Debug, Clone)]
pub struct TopicClassifier {
    topics: Vec<TopicRule>,
    fallback: String,
}

impl TopicClassifier {
    pub fn new(rules: &ClassifierRules) -> Self {
        Self {
            topics: rules.topics.clone(),
            fallback: rules.fallback_topic.clone(),
        }
    }

    /// Lowercased text the topic keywords are matched against
    pub fn classification_text(organized: &OrganizedContent) -> String {
        [
            organized.r#abstract.as_str(),
            &organized.key_concepts.join(" "),
            &organized.methodology.content,
        ]
        .join(" ")
        .to_lowercase()
    }

    /// Score of every topic, in table order
    pub fn scores(&self, organized: &OrganizedContent) -> Vec<(&str, usize)> {
        let text = Self::classification_text(organized);
        self.topics
            .iter()
            .map(|topic| {
                let score = topic
                    .keywords
                    .iter()
                    .filter(|k| text.contains(&k.to_lowercase()))
                    .count();
                (topic.name.as_str(), score)
            })
            .collect()
    }

    /// Highest-scoring topic; ties go to the earlier topic, all-zero to the fallback
    pub fn classify(&self, organized: &OrganizedContent) -> TopicMatch {
        let mut best: Option<(&str, usize)> = None;
        for (name, score) in self.scores(organized) {
            if score > 0 && best.map_or(true, |(_, top)| score > top) {
                best = Some((name, score));
            }
        }

        match best {
            Some((topic, score)) => TopicMatch {
                topic: topic.to_string(),
                score,
            },
            None => TopicMatch {
                topic: self.fallback.clone(),
                score: 0,
            },
        }
    }
}

/// Classify with the default rules
pub fn classify_topic(organized: &OrganizedContent) -> TopicMatch {
    TopicClassifier::new(&ClassifierRules::default()).classify(organized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaperMetadata;

    fn organized(abstract_text: &str) -> OrganizedContent {
        let mut content = OrganizedContent::new(PaperMetadata::default());
        content.r#abstract = abstract_text.to_string();
        content
    }

    fn fixture_rules() -> ClassifierRules {
        ClassifierRules {
            topics: vec![
                TopicRule {
                    name: "graphics".to_string(),
                    keywords: vec!["render".to_string(), "shader".to_string()],
                },
                TopicRule {
                    name: "systems".to_string(),
                    keywords: vec!["kernel".to_string(), "scheduler".to_string()],
                },
            ],
            fallback_topic: "misc".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_content_falls_back() {
        let result = classify_topic(&organized(""));
        assert_eq!(
            result,
            TopicMatch {
                topic: "ai".to_string(),
                score: 0
            }
        );
    }

    #[test]
    fn test_highest_score_wins() {
        let classifier = TopicClassifier::new(&fixture_rules());
        let result = classifier.classify(&organized("A kernel scheduler that can render."));
        assert_eq!(result.topic, "systems");
        assert_eq!(result.score, 2);
    }

    #[test]
    fn test_tie_goes_to_first_topic() {
        let classifier = TopicClassifier::new(&fixture_rules());
        let result = classifier.classify(&organized("A shader in the kernel."));
        assert_eq!(result.topic, "graphics");
        assert_eq!(result.score, 1);
    }

    #[test]
    fn test_matching_is_case_insensitive_over_all_inputs() {
        let classifier = TopicClassifier::new(&fixture_rules());
        let mut content = organized("");
        content.key_concepts = vec!["Shader Graphs".to_string()];
        content.methodology.content = "Our RENDER loop.".to_string();

        assert_eq!(classifier.scores(&content), vec![("graphics", 2), ("systems", 0)]);
    }

    #[test]
    fn test_fixture_fallback() {
        let classifier = TopicClassifier::new(&fixture_rules());
        assert_eq!(classifier.classify(&organized("nothing relevant")).topic, "misc");
    }

    #[test]
    fn test_default_table_rendering_paper() {
        let content = organized(
            "We present an alias-free rendering framework with a novel optimization of the 3D filter.",
        );
        let result = classify_topic(&content);
        // "rendering" and "framework" beat "optimization" alone
        assert_eq!(result.topic, "engines");
    }
}
