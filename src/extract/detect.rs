//! Code block and formula detectors.

use regex::Regex;

use crate::config::{compile_all, ClassifierRules, LanguageRule, RuleError};
use crate::models::CodeBlock;

/// Runs of code-like lines need more than this many lines to count
const MIN_BLOCK_LINES: usize = 2;

/// Finds runs of code-looking lines and guesses their language
#[derive(Debug, Clone)]
pub struct CodeDetector {
    indicators: Vec<Regex>,
    languages: Vec<LanguageRule>,
}

impl CodeDetector {
    pub fn new(rules: &ClassifierRules) -> Result<Self, RuleError> {
        Ok(Self {
            indicators: compile_all(&rules.code_indicators)?,
            languages: rules.languages.clone(),
        })
    }

    /// Whether a single line matches any code indicator
    pub fn looks_like_code(&self, line: &str) -> bool {
        self.indicators.iter().any(|p| p.is_match(line))
    }

    /// Collect code blocks from the text, in document order
    pub fn detect(&self, text: &str) -> Vec<CodeBlock> {
        let mut blocks = Vec::new();
        let mut run: Vec<&str> = Vec::new();
        let mut run_start = 0;

        for (index, line) in text.split('\n').enumerate() {
            if self.looks_like_code(line) {
                if run.is_empty() {
                    run_start = index;
                }
                run.push(line);
            } else {
                self.close_run(&mut run, run_start, &mut blocks);
            }
        }
        self.close_run(&mut run, run_start, &mut blocks);

        blocks
    }

    fn close_run(&self, run: &mut Vec<&str>, start: usize, blocks: &mut Vec<CodeBlock>) {
        if run.len() > MIN_BLOCK_LINES {
            let code = run.join("\n");
            blocks.push(CodeBlock {
                language: self.detect_language(&code).to_string(),
                code,
                line_number: start,
                context: None,
            });
        }
        run.clear();
    }

    /// First language whose indicator appears in the lowercased code
    pub fn detect_language(&self, code: &str) -> &str {
        let lower = code.to_lowercase();
        self.languages
            .iter()
            .find(|lang| {
                lang.indicators
                    .iter()
                    .any(|indicator| lower.contains(&indicator.to_lowercase()))
            })
            .map(|lang| lang.name.as_str())
            .unwrap_or("unknown")
    }
}

/// Collects formula-looking spans from the full text
#[derive(Debug, Clone)]
pub struct FormulaDetector {
    patterns: Vec<Regex>,
}

impl FormulaDetector {
    pub fn new(rules: &ClassifierRules) -> Result<Self, RuleError> {
        Ok(Self {
            patterns: compile_all(&rules.formula_patterns)?,
        })
    }

    /// Every match of every pattern, grouped by pattern order.
    ///
    /// No check is made that a match is really mathematics.
    pub fn detect(&self, text: &str) -> Vec<String> {
        self.patterns
            .iter()
            .flat_map(|p| p.find_iter(text).map(|m| m.as_str().to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_detector() -> CodeDetector {
        CodeDetector::new(&ClassifierRules::default()).unwrap()
    }

    #[test]
    fn test_looks_like_code() {
        let detector = code_detector();
        assert!(detector.looks_like_code("def render(x):"));
        assert!(detector.looks_like_code("import numpy as np"));
        assert!(detector.looks_like_code("#include <stdio.h>"));
        assert!(detector.looks_like_code("```python"));
        assert!(!detector.looks_like_code("We render the scene."));
    }

    #[test]
    fn test_detect_block_needs_three_lines() {
        let detector = code_detector();
        let text = "Prose.\nimport os\nimport sys\nProse again.";
        assert!(detector.detect(text).is_empty());

        let text = "Prose.\nimport os\nimport sys\ndef main():\nProse again.";
        let blocks = detector.detect(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].line_number, 1);
        assert_eq!(blocks[0].language, "python");
        assert_eq!(blocks[0].code, "import os\nimport sys\ndef main():");
    }

    #[test]
    fn test_block_at_end_of_text_is_kept() {
        let detector = code_detector();
        let text = "Listing:\nfunction a() {\nfunction b() {\nfunction c() {";
        let blocks = detector.detect(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].language, "javascript");
    }

    #[test]
    fn test_detect_language_table_order() {
        let detector = code_detector();
        assert_eq!(detector.detect_language("#include <iostream>\nstd::cout"), "cpp");
        assert_eq!(detector.detect_language("PUBLIC CLASS Foo"), "java");
        assert_eq!(detector.detect_language("SELECT * FROM t"), "unknown");
    }

    #[test]
    fn test_fixture_language_table() {
        let rules = ClassifierRules {
            languages: vec![LanguageRule {
                name: "rust".to_string(),
                indicators: vec!["fn ".to_string()],
            }],
            ..Default::default()
        };
        let detector = CodeDetector::new(&rules).unwrap();
        assert_eq!(detector.detect_language("fn main() {}"), "rust");
        assert_eq!(detector.detect_language("def main():"), "unknown");
    }

    #[test]
    fn test_formula_patterns() {
        let detector = FormulaDetector::new(&ClassifierRules::default()).unwrap();
        let formulas = detector.detect("Energy $E=mc^2$ and \\sin(x) appear.");

        assert_eq!(formulas[0], "$E=mc^2$");
        assert!(formulas.iter().any(|f| f == "\\sin(x)"));
        // the bare equation pattern over-matches prose
        assert!(formulas.iter().any(|f| f.starts_with("E=mc^2$ and")));
    }

    #[test]
    fn test_equation_environment_spans_lines() {
        let detector = FormulaDetector::new(&ClassifierRules::default()).unwrap();
        let formulas = detector.detect("\\begin{equation}\na + b\n\\end{equation}");
        assert!(formulas.contains(&"\\begin{equation}\na + b\n\\end{equation}".to_string()));
    }
}
