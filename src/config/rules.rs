//! Keyword and pattern tables that drive the heuristics.
//!
//! Every table has a built-in default. A config file may replace any of them,
//! and tests build fixture tables directly.
//!
//! ```toml
//! [rules]
//! fallback_topic = "ai"
//!
//! [[rules.topics]]
//! name = "ai"
//! keywords = ["machine learning", "neural network"]
//!
//! [rules.caps]
//! best_practices = 20
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while compiling rule tables
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Compile a list of patterns, keeping table order
pub(crate) fn compile_all(patterns: &[String]) -> Result<Vec<Regex>, RuleError> {
    patterns.iter().map(|p| compile(p)).collect()
}

pub(crate) fn compile(pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Language guess entry: a block is `name` if it contains any indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageRule {
    pub name: String,
    pub indicators: Vec<String>,
}

/// Topic folder entry used by the classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicRule {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Maximum number of entries kept per bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketCaps {
    pub key_concepts: usize,
    pub section_concepts: usize,
    pub implementation_patterns: usize,
    pub best_practices: usize,
    pub performance_metrics: usize,
    pub limitations: usize,
    pub related_techniques: usize,
    pub practical_applications: usize,
}

impl Default for BucketCaps {
    fn default() -> Self {
        Self {
            key_concepts: 20,
            section_concepts: 10,
            implementation_patterns: 15,
            best_practices: 20,
            performance_metrics: 15,
            limitations: 15,
            related_techniques: 15,
            practical_applications: 15,
        }
    }
}

/// All tables used by extraction, organization and classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierRules {
    /// Per-line regexes that mark a line as code
    pub code_indicators: Vec<String>,

    /// Language guesses, first match wins
    pub languages: Vec<LanguageRule>,

    /// Formula regexes, run over the full text in order
    pub formula_patterns: Vec<String>,

    /// Section titles containing one of these feed the methodology bucket
    pub methodology_keywords: Vec<String>,

    /// Keywords whose trailing phrase becomes an implementation pattern
    pub implementation_keywords: Vec<String>,

    pub best_practice_keywords: Vec<String>,
    pub limitation_keywords: Vec<String>,
    pub related_keywords: Vec<String>,
    pub application_keywords: Vec<String>,

    /// Regexes marking a sentence as a performance metric
    pub metric_patterns: Vec<String>,

    /// Topic folders in tie-break order
    pub topics: Vec<TopicRule>,

    /// Topic chosen when no keyword scores
    pub fallback_topic: String,

    pub caps: BucketCaps,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn language(name: &str, indicators: &[&str]) -> LanguageRule {
    LanguageRule {
        name: name.to_string(),
        indicators: strings(indicators),
    }
}

fn topic(name: &str, keywords: &[&str]) -> TopicRule {
    TopicRule {
        name: name.to_string(),
        keywords: strings(keywords),
    }
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            code_indicators: strings(&[
                r"^\s*```",
                r"function\s+\w+\s*\(",
                r"def\s+\w+\s*\(",
                r"class\s+\w+",
                r"import\s+\w+",
                r"#include\s*<",
                r"public\s+class",
            ]),
            languages: vec![
                language("python", &["def ", "import ", "print(", "if __name__"]),
                language(
                    "javascript",
                    &["function ", "const ", "let ", "=>", "console.log"],
                ),
                language(
                    "java",
                    &["public class", "public static void", "System.out.println"],
                ),
                language("cpp", &["#include", "using namespace", "std::"]),
                language("c", &["#include", "int main(", "printf("]),
            ],
            formula_patterns: strings(&[
                r"\$[^$]+\$",
                r"\$\$[^$]+\$\$",
                r"(?s)\\begin\{equation\}.*?\\end\{equation\}",
                r"[A-Za-z]\s*=\s*[^=]+",
                r"\\[a-z]+\s*\([^)]+\)",
            ]),
            methodology_keywords: strings(&[
                "methodology",
                "method",
                "approach",
                "algorithm",
                "technique",
                "framework",
                "architecture",
                "design",
            ]),
            implementation_keywords: strings(&[
                "pattern",
                "design pattern",
                "architecture pattern",
                "implementation",
                "structure",
                "organization",
                "component",
                "module",
                "layer",
            ]),
            best_practice_keywords: strings(&[
                "best practice",
                "recommendation",
                "should",
                "must",
                "guideline",
                "suggestion",
                "advice",
                "tip",
            ]),
            limitation_keywords: strings(&[
                "limitation",
                "assumption",
                "constraint",
                "restriction",
                "drawback",
                "weakness",
                "challenge",
                "issue",
                "assumes",
                "requires",
                "depends on",
            ]),
            related_keywords: strings(&[
                "similar to",
                "compared to",
                "based on",
                "extends",
                "improves upon",
                "alternative to",
                "related work",
            ]),
            application_keywords: strings(&[
                "application",
                "use case",
                "scenario",
                "example",
                "case study",
                "real-world",
                "practical",
                "deployment",
            ]),
            metric_patterns: strings(&[
                r"(?i)\d+\.?\d*\s*(?:ms|seconds?|milliseconds?)\b",
                r"(?i)\d+\.?\d*\s*(?:%|percent)",
                r"(?i)\d+\.?\d*\s*(?:x|times)\s+(?:faster|slower|better)",
                r"(?i)(?:accuracy|precision|recall|F1|score)[:\s]+\d+\.?\d*",
                r"\d+\.?\d*\s*(?:MB|GB|KB)\b",
            ]),
            topics: vec![
                topic(
                    "ai",
                    &[
                        "machine learning",
                        "neural network",
                        "deep learning",
                        "ai",
                        "artificial intelligence",
                        "nlp",
                        "natural language",
                        "computer vision",
                        "transformer",
                        "attention",
                        "reinforcement learning",
                        "classification",
                        "regression",
                        "model training",
                    ],
                ),
                topic(
                    "engines",
                    &[
                        "engine",
                        "architecture",
                        "framework",
                        "system design",
                        "platform",
                        "rendering",
                        "game engine",
                        "core system",
                        "component architecture",
                    ],
                ),
                topic(
                    "backend",
                    &[
                        "backend",
                        "server",
                        "database",
                        "api",
                        "rest",
                        "graphql",
                        "authentication",
                        "authorization",
                        "data processing",
                        "pipeline",
                        "etl",
                        "storage",
                        "microservice",
                        "distributed system",
                    ],
                ),
                topic(
                    "development-tools",
                    &[
                        "development",
                        "testing",
                        "debugging",
                        "build",
                        "deployment",
                        "ci/cd",
                        "code organization",
                        "refactoring",
                        "code review",
                        "version control",
                        "workflow",
                        "methodology",
                        "best practices",
                    ],
                ),
                topic(
                    "science-maths",
                    &[
                        "mathematical",
                        "algorithm",
                        "computation",
                        "numerical",
                        "statistical",
                        "analysis",
                        "optimization",
                        "linear algebra",
                        "calculus",
                        "geometry",
                        "scientific computing",
                        "data analysis",
                        "simulation",
                    ],
                ),
                topic(
                    "apis-integration",
                    &[
                        "api",
                        "integration",
                        "service",
                        "third-party",
                        "external",
                        "webhook",
                        "sdk",
                        "client library",
                        "service communication",
                        "rpc",
                    ],
                ),
                topic(
                    "web-design",
                    &[
                        "frontend",
                        "ui",
                        "ux",
                        "user interface",
                        "user experience",
                        "design",
                        "react",
                        "vue",
                        "angular",
                        "javascript",
                        "typescript",
                        "css",
                        "html",
                        "client-side",
                        "browser",
                        "web application",
                    ],
                ),
            ],
            fallback_topic: "ai".to_string(),
            caps: BucketCaps::default(),
        }
    }
}

impl ClassifierRules {
    /// Names of all topic folders, in table order
    pub fn topic_names(&self) -> Vec<&str> {
        self.topics.iter().map(|t| t.name.as_str()).collect()
    }

    /// Check that every regex in the tables compiles
    pub fn validate(&self) -> Result<(), RuleError> {
        compile_all(&self.code_indicators)?;
        compile_all(&self.formula_patterns)?;
        compile_all(&self.metric_patterns)?;
        Ok(())
    }
}
