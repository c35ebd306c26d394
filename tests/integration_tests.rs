//! Integration tests for paper-mdc
//!
//! These tests drive the whole pipeline over synthetic page texts through a
//! stand-in PDF backend, so no PDF fixtures are needed.

use paper_mdc::classify::TopicClassifier;
use paper_mdc::config::{ClassifierRules, TopicRule};
use paper_mdc::extract::{segment, ContentExtractor, ExtractError, PageBackend, RawPage};
use paper_mdc::models::{OrganizedContent, PaperMetadata};
use paper_mdc::organize::{dedup_formulas, organize_content};
use paper_mdc::utils::slugify;
use paper_mdc::{PaperProcessor, ProcessError};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const TITLE: &str = "Mip-Splatting: Alias-Free 3D Gaussian Splatting";

const ABSTRACT: &str = "Recently, 3D Gaussian Splatting has demonstrated impressive novel view \
synthesis results, reaching high fidelity and efficiency.";

fn page_one() -> String {
    format!(
        "{TITLE}\n\
         Zehao Yu and Anpei Chen and Binbin Huang\n\
         University of Tubingen, 2024\n\
         Abstract\n   {ABSTRACT}   \n\
         1. Introduction\n\
         Novel view synthesis is a core problem in graphics and vision.\n\
         The method is based on 3D Gaussian Splatting with a smoothing filter."
    )
}

fn page_two() -> String {
    "3. Method\n\
     We apply a 3D smoothing filter to each Gaussian primitive.\n\
     The energy is $E=mc^2$ and again $E=mc^2$ as before.\n\
     We also use $\\sigma^2$ for the variance and $E=mc^2$ once more.\n\
     Our method achieves 95.3% accuracy on the benchmark.\n\
     A limitation is that the filter needs known camera intrinsics."
        .to_string()
}

fn pages() -> Vec<RawPage> {
    vec![RawPage::new(1, page_one()), RawPage::new(2, page_two())]
}

/// Serves fixed page texts for any path
struct SyntheticBackend(Vec<RawPage>);

impl PageBackend for SyntheticBackend {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn load_pages(&self, _path: &Path) -> Result<Vec<RawPage>, ExtractError> {
        Ok(self.0.clone())
    }
}

/// Fails partway through a document
struct BrokenBackend;

impl PageBackend for BrokenBackend {
    fn name(&self) -> &'static str {
        "broken"
    }

    fn load_pages(&self, _path: &Path) -> Result<Vec<RawPage>, ExtractError> {
        Err(ExtractError::ExtractionFailed("bad object at page 2".to_string()))
    }
}

fn fixture_rules() -> ClassifierRules {
    ClassifierRules {
        topics: vec![
            TopicRule {
                name: "databases".to_string(),
                keywords: vec!["database".to_string(), "query".to_string()],
            },
            TopicRule {
                name: "graphics".to_string(),
                keywords: vec!["splatting".to_string(), "gaussian".to_string()],
            },
        ],
        fallback_topic: "databases".to_string(),
        ..ClassifierRules::default()
    }
}

#[test]
fn test_metadata_from_first_page() {
    let extractor = ContentExtractor::new(&ClassifierRules::default()).unwrap();
    let content = extractor.extract_pages(pages());

    assert_eq!(content.pages.len(), 2);
    assert_eq!(content.metadata.title.as_deref(), Some(TITLE));
    assert_eq!(content.metadata.r#abstract.as_deref(), Some(ABSTRACT));
    assert_eq!(content.metadata.year.as_deref(), Some("2024"));
    assert_eq!(
        content.metadata.authors,
        vec!["Zehao Yu", "Anpei Chen", "Binbin Huang"]
    );
}

#[test]
fn test_metric_sentence_kept_verbatim() {
    let extractor = ContentExtractor::new(&ClassifierRules::default()).unwrap();
    let organized = organize_content(&extractor.extract_pages(pages())).unwrap();

    assert!(organized
        .performance_metrics
        .iter()
        .any(|m| m == "Our method achieves 95.3% accuracy on the benchmark."));
}

#[test]
fn test_metric_sentence_after_unpunctuated_header() {
    let extractor = ContentExtractor::new(&ClassifierRules::default()).unwrap();
    let content = extractor.extract_pages(vec![RawPage::new(
        1,
        "4. Experiments\nOur method achieves 95.3% accuracy on the benchmark.\nMore text follows here.",
    )]);
    let organized = organize_content(&content).unwrap();

    assert_eq!(
        organized.performance_metrics,
        vec!["Our method achieves 95.3% accuracy on the benchmark."]
    );
}

#[test]
fn test_repeated_formula_appears_once() {
    let extractor = ContentExtractor::new(&ClassifierRules::default()).unwrap();
    let organized = organize_content(&extractor.extract_pages(pages())).unwrap();

    let count = organized.formulas.iter().filter(|f| *f == "E=mc^2").count();
    assert_eq!(count, 1);

    let energy = organized.formulas.iter().position(|f| f == "E=mc^2");
    let sigma = organized.formulas.iter().position(|f| f == "\\sigma^2");
    assert!(energy.is_some() && sigma.is_some());
    assert!(energy < sigma);
}

#[test]
fn test_formula_dedup_is_idempotent() {
    let raw: Vec<String> = ["$a+b$", "$$a+b$$", " $c$ ", "$", "$$x = y$$", "c"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let once = dedup_formulas(&raw);
    assert_eq!(once, vec!["a+b", "c", "x = y"]);
    assert_eq!(dedup_formulas(&once), once);
}

#[test]
fn test_slugs_are_total_and_idempotent() {
    let inputs = [
        "Mip-Splatting: Alias-Free 3D Gaussian Splatting",
        "   ",
        "???",
        "Über Schnelle Rendering-Verfahren",
        "A very long technique name that keeps going well past the fifty character limit",
        "already-a-slug",
        "--Leading and trailing--",
    ];

    for input in inputs {
        let slug = slugify(input);
        assert!(!slug.is_empty(), "empty slug for {input:?}");
        assert!(format!("{slug}.mdc").len() <= 54, "slug too long: {slug}");
        assert!(!slug.starts_with('-') && !slug.ends_with('-'), "{slug}");
        assert!(!slug.contains("--"), "{slug}");
        assert!(
            slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
            "{slug}"
        );
        assert_eq!(slugify(&slug), slug);
    }
}

#[test]
fn test_empty_content_uses_fallback_topic() {
    let organized = OrganizedContent::new(PaperMetadata::default());

    let topic = TopicClassifier::new(&ClassifierRules::default()).classify(&organized);
    assert_eq!(topic.topic, "ai");
    assert_eq!(topic.score, 0);

    let topic = TopicClassifier::new(&fixture_rules()).classify(&organized);
    assert_eq!(topic.topic, "databases");
    assert_eq!(topic.score, 0);
}

#[test]
fn test_classification_is_deterministic() {
    let extractor = ContentExtractor::new(&ClassifierRules::default()).unwrap();
    let organized = organize_content(&extractor.extract_pages(pages())).unwrap();
    let classifier = TopicClassifier::new(&ClassifierRules::default());

    let first = classifier.classify(&organized);
    for _ in 0..5 {
        assert_eq!(classifier.classify(&organized), first);
    }
}

#[test]
fn test_segmentation_keeps_every_line() {
    let text = "Preprint notice\nunder review\n1. Introduction\nFirst line.\n  indented\nRELATED WORK\nPrior art.\nResults\nNumbers.";
    let segmentation = segment(text);

    let mut rebuilt: Vec<String> = Vec::new();
    if let Some(preamble) = &segmentation.preamble {
        rebuilt.extend(preamble.split('\n').map(str::to_string));
    }
    for section in &segmentation.sections {
        rebuilt.push(section.title.clone());
        rebuilt.extend(section.content.split('\n').map(str::to_string));
    }

    assert_eq!(rebuilt, text.split('\n').collect::<Vec<_>>());
}

#[test]
fn test_full_pipeline_writes_reference_documents() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("mip-splatting.pdf");
    fs::write(&pdf, b"%PDF-1.7 placeholder").unwrap();
    let root = dir.path().join("workspace");

    let processor = PaperProcessor::with_rules(&root, fixture_rules()).unwrap();
    let result = processor
        .process_with_backend(&pdf, Box::new(SyntheticBackend(pages())), None)
        .unwrap();

    assert!(result.success);
    let topic = result.topic.clone().unwrap();
    assert_eq!(topic.topic, "graphics");
    assert_eq!(topic.score, 2);
    assert_eq!(result.target_folder, root.join("graphics"));
    assert_eq!(result.paper_folder.parent(), Some(root.join("graphics").as_path()));

    let slug = result
        .paper_folder
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap()
        .to_string();
    assert_eq!(result.mdc_path, result.paper_folder.join(format!("{slug}.mdc")));
    assert_eq!(result.readme_path, result.paper_folder.join("README.md"));

    let mdc = fs::read_to_string(&result.mdc_path).unwrap();
    assert!(mdc.starts_with("---\nalwaysApply: false\n---\n"));
    assert!(mdc.contains(TITLE));
    assert!(mdc.contains("$$E=mc^2$$"));

    let readme = fs::read_to_string(&result.readme_path).unwrap();
    assert!(readme.contains(&format!("{slug}.mdc")));

    assert_eq!(result.metadata.title.as_deref(), Some(TITLE));
    assert_eq!(result.stats.pages, 2);
    assert!(result.stats.formulas >= 2);
    assert!(result.related_documents.is_empty());
}

#[test]
fn test_second_paper_finds_the_first() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("paper.pdf");
    fs::write(&pdf, b"%PDF-1.7 placeholder").unwrap();
    let root = dir.path().join("workspace");
    let processor = PaperProcessor::with_rules(&root, fixture_rules()).unwrap();

    let first = processor
        .process_with_backend(&pdf, Box::new(SyntheticBackend(pages())), None)
        .unwrap();
    let second = processor
        .process_with_backend(
            &pdf,
            Box::new(SyntheticBackend(pages())),
            Some("graphics/follow-ups"),
        )
        .unwrap();

    assert_eq!(second.topic, None);
    assert_eq!(second.target_folder, root.join("graphics/follow-ups"));
    assert_eq!(second.related_documents, vec![first.mdc_path]);
}

#[test]
fn test_traversal_folder_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("paper.pdf");
    fs::write(&pdf, b"%PDF-1.7 placeholder").unwrap();
    let root = dir.path().join("workspace");

    let processor = PaperProcessor::new(&root).unwrap();
    let result = processor.process_with_backend(
        &pdf,
        Box::new(SyntheticBackend(pages())),
        Some("../outside"),
    );

    assert!(matches!(result, Err(ProcessError::Validation(_))));
    assert!(!dir.path().join("outside").exists());
}

#[test]
fn test_missing_pdf_aborts_before_processing() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("workspace");
    let processor = PaperProcessor::new(&root).unwrap();

    let result = processor.process_with_backend(
        &dir.path().join("missing.pdf"),
        Box::new(SyntheticBackend(pages())),
        None,
    );

    assert!(matches!(
        result,
        Err(ProcessError::Extract(ExtractError::NotFound(_)))
    ));
    assert!(!root.exists());
}

#[test]
fn test_backend_failure_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("paper.pdf");
    fs::write(&pdf, b"%PDF-1.7 placeholder").unwrap();
    let root = dir.path().join("workspace");

    let result = PaperProcessor::new(&root)
        .unwrap()
        .process_with_backend(&pdf, Box::new(BrokenBackend), None);

    assert!(matches!(
        result,
        Err(ProcessError::Extract(ExtractError::ExtractionFailed(_)))
    ));
    assert!(!root.exists());
}

/// Run the binary in `dir` with no user configuration in reach
fn run_cli(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_paper-mdc"))
        .args(args)
        .current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_cli_process_without_pdf_prints_usage() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_cli(dir.path(), &["process"]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage: paper-mdc process <path_to_pdf>"), "{stdout}");
    assert!(stdout.contains("Example: paper-mdc process"), "{stdout}");
}

#[test]
fn test_cli_missing_pdf_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_cli(dir.path(), &["process", "/nonexistent/paper.pdf"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Error: PDF file not found: /nonexistent/paper.pdf"),
        "{stderr}"
    );
    assert!(output.stdout.is_empty());
}

#[test]
fn test_cli_without_command_prints_usage() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_cli(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage: paper-mdc <command> [args]"), "{stdout}");
    assert!(stdout.contains("process <pdf>"), "{stdout}");
}

#[test]
fn test_cli_json_log_lines() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_cli(
        dir.path(),
        &["-v", "--log-format", "json", "process", "/nonexistent/paper.pdf"],
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    let log_lines: Vec<&str> = stderr.lines().filter(|l| l.starts_with('{')).collect();
    assert!(!log_lines.is_empty(), "{stderr}");
    for line in log_lines {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(value.get("level").is_some());
    }
}
