use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{Attribute, Cell, Table};
use owo_colors::OwoColorize;
use paper_mdc::book::{detect_chapters, extract_chapter, render_structure, write_book_report, write_chapter};
use paper_mdc::config::{find_config_file, get_config, load_config, Config, ConfigFile};
use paper_mdc::extract::{ExtractionDump, PdfExtractor};
use paper_mdc::models::{ExtractedContent, OrganizedContent};
use paper_mdc::organize::ContentOrganizer;
use paper_mdc::pipeline::{PaperProcessor, ProcessingResult};
use paper_mdc::utils::{
    format_authors, format_title, is_terminal, single_line, summary_table_columns, terminal_width,
    truncate_with_ellipsis,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// paper-mdc - Turn scientific papers into reference documents for AI coding assistants
#[derive(Parser, Debug)]
#[command(name = "paper-mdc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Turn scientific-paper PDFs into .mdc reference documents", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v debug, -vv trace)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Log line format (default: from config, else text)
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

impl OutputFormat {
    fn resolve(self) -> Self {
        match self {
            OutputFormat::Auto if is_terminal() => OutputFormat::Table,
            OutputFormat::Auto => OutputFormat::Json,
            other => other,
        }
    }
}

/// Format of log lines on stderr
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn from_config(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a paper into an .mdc document and README
    #[command(alias = "p")]
    Process {
        /// Path to the paper PDF
        pdf: Option<PathBuf>,

        /// Root holding the topic folders (default: from config, else ".")
        workspace_root: Option<PathBuf>,

        /// Folder under the workspace root; skips topic classification
        output_folder: Option<String>,

        /// Skip the scan for related documents
        #[arg(long)]
        no_related: bool,
    },

    /// Extract structure from a PDF and summarize it
    Extract {
        /// Path to the PDF
        pdf: Option<PathBuf>,

        /// Also write the full extraction as JSON to this file
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
    },

    /// Extract and organize a paper without writing documents
    Organize {
        /// Path to the paper PDF
        pdf: Option<PathBuf>,
    },

    /// Detect the chapter structure of a book
    Chapters {
        /// Path to the book PDF
        pdf: Option<PathBuf>,

        /// Directory for the extracted text and structure report
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Extract a single chapter of a book
    Chapter {
        /// Path to the book PDF
        pdf: Option<PathBuf>,

        /// Chapter number
        number: Option<u32>,

        /// Chapter title as printed in the book
        title: Option<String>,

        /// Directory for the chapter text
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Write a configuration file with every default rule table
    InitConfig {
        /// Destination (default: ./paper-mdc.toml)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Print a usage line and exit with status 1
fn usage(line: &str, example: &str) -> ! {
    println!("Usage: paper-mdc {line}");
    println!("Example: paper-mdc {example}");
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        eprintln!("{e:?}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    let config = match &config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => get_config(),
    };
    config.rules.validate().context("Invalid rule tables")?;

    init_tracing(&cli, &config);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    let format = cli.output.resolve();

    match cli.command {
        Some(Commands::Process {
            pdf,
            workspace_root,
            output_folder,
            no_related,
        }) => {
            let Some(pdf) = pdf else {
                usage(
                    "process <path_to_pdf> [workspace_root] [output_folder]",
                    "process papers/attention-is-all-you-need.pdf . ai/",
                );
            };

            let mut config = config;
            if let Some(root) = workspace_root {
                config.output.workspace_root = root;
            }
            let find_related = config.output.find_related && !no_related;
            let processor = PaperProcessor::from_config(&config)?.find_related(find_related);

            let result = processor.process(&pdf, output_folder.as_deref())?;
            output_processing_result(&result, format)?;
        }

        Some(Commands::Extract { pdf, json }) => {
            let Some(pdf) = pdf else {
                usage("extract <path_to_pdf> [--json FILE]", "extract papers/mip-splatting.pdf");
            };

            let content = extract(&pdf, &config)?;
            let dump = ExtractionDump::from(&content);
            if let Some(json_path) = json {
                let text = serde_json::to_string_pretty(&dump)?;
                std::fs::write(&json_path, text)
                    .with_context(|| format!("Failed to write {}", json_path.display()))?;
                if !cli.quiet {
                    eprintln!("Extraction written to {}", json_path.display());
                }
            }
            output_extraction(&content, &dump, format)?;
        }

        Some(Commands::Organize { pdf }) => {
            let Some(pdf) = pdf else {
                usage("organize <path_to_pdf>", "organize papers/mip-splatting.pdf");
            };

            let content = extract(&pdf, &config)?;
            let organized = ContentOrganizer::new(&config.rules)?.organize(&content);
            output_organized(&organized, format)?;
        }

        Some(Commands::Chapters { pdf, out_dir }) => {
            let Some(pdf) = pdf else {
                usage("chapters <path_to_pdf> [--out-dir DIR]", "chapters books/intro-to-ai.pdf");
            };

            let content = extract(&pdf, &config)?;
            let chapters = detect_chapters(&content);
            let (text_path, structure_path) = write_book_report(&out_dir, &content, &chapters)?;
            tracing::info!(
                "Wrote {} and {}",
                text_path.display(),
                structure_path.display()
            );

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&chapters)?),
                OutputFormat::Plain => print!("{}", render_structure(&chapters)),
                _ => {
                    let mut table = Table::new();
                    table.load_preset(comfy_table::presets::UTF8_FULL);
                    table.set_header(vec!["#", "Title", "Page", "Line"]);
                    let title_width = terminal_width().saturating_sub(30).max(20);
                    for chapter in &chapters {
                        table.add_row(vec![
                            Cell::new(&chapter.number),
                            Cell::new(format_title(&chapter.title, title_width))
                                .add_attribute(Attribute::Bold),
                            Cell::new(format!("~{}", chapter.page)),
                            Cell::new(chapter.line),
                        ]);
                    }
                    println!("{table}");
                    println!(
                        "{} {} chapters found",
                        "✓".green().bold(),
                        chapters.len()
                    );
                }
            }
        }

        Some(Commands::Chapter {
            pdf,
            number,
            title,
            out_dir,
        }) => {
            let (Some(pdf), Some(number), Some(title)) = (pdf, number, title) else {
                usage(
                    "chapter <path_to_pdf> <number> <title> [--out-dir DIR]",
                    "chapter books/intro-to-ai.pdf 3 \"Supervised Learning\"",
                );
            };

            let content = extract(&pdf, &config)?;
            let Some(chapter) = extract_chapter(&content, number, &title) else {
                bail!("Could not find chapter {number}: {title}");
            };
            let path = write_chapter(&out_dir, &chapter)?;

            match format {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({
                        "number": chapter.number,
                        "title": chapter.title,
                        "start_line": chapter.start_line,
                        "end_line": chapter.end_line,
                        "characters": chapter.content.chars().count(),
                        "path": path,
                    })
                ),
                _ => {
                    println!(
                        "Chapter {}: {} (lines {}-{})",
                        chapter.number, chapter.title, chapter.start_line, chapter.end_line
                    );
                    println!("Written to {}", path.display());
                }
            }
        }

        Some(Commands::InitConfig { path, force }) => {
            let path = path.unwrap_or_else(|| PathBuf::from("paper-mdc.toml"));
            if path.exists() && !force {
                bail!(
                    "{} already exists; pass --force to overwrite",
                    path.display()
                );
            }
            ConfigFile::from(get_config()).save(&path)?;
            if !cli.quiet {
                println!("Wrote default configuration to {}", path.display());
            }
        }

        None => {
            println!("paper-mdc v{}", paper_mdc::VERSION);
            println!();
            println!("Commands:");
            println!("  process <pdf> [root] [folder]  - Create an .mdc document from a paper");
            println!("  extract <pdf>                  - Show what was extracted from a PDF");
            println!("  organize <pdf>                 - Show how a paper would be organized");
            println!("  chapters <pdf>                 - List the chapters of a book");
            println!("  chapter <pdf> <n> <title>      - Extract one chapter of a book");
            println!("  init-config                    - Write a default configuration file");
            println!();
            usage(
                "<command> [args]",
                "process papers/attention-is-all-you-need.pdf . ai/",
            );
        }
    }

    Ok(())
}

fn init_tracing(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => config.logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    let json = cli
        .log_format
        .unwrap_or_else(|| LogFormat::from_config(&config.logging.format))
        == LogFormat::Json;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("paper_mdc={}", level)),
        ))
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

fn extract(pdf: &Path, config: &Config) -> Result<ExtractedContent> {
    let extractor = PdfExtractor::with_rules(pdf, &config.rules)?;
    tracing::debug!("Using {} backend", extractor.backend_name());
    Ok(extractor.extract()?)
}

/// Two-column summary table sized to the terminal
fn summary_table(rows: &[(&str, String)]) -> Table {
    let (_, value_width) = summary_table_columns(terminal_width());
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    for (label, value) in rows {
        table.add_row(vec![
            Cell::new(label).add_attribute(Attribute::Bold),
            Cell::new(truncate_with_ellipsis(&single_line(value), value_width)),
        ]);
    }
    table
}

fn title_and_authors(title: Option<&str>, authors: &[String]) -> (String, String) {
    let (_, value_width) = summary_table_columns(terminal_width());
    (
        title
            .map(|t| format_title(t, value_width))
            .unwrap_or_else(|| "-".to_string()),
        format_authors(authors, value_width),
    )
}

fn output_processing_result(result: &ProcessingResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
        OutputFormat::Plain => {
            println!("\n{}", "=".repeat(60));
            println!("Processing Complete!");
            println!("{}", "=".repeat(60));
            println!("MDC created: {}", result.mdc_path.display());
            println!(
                "Title: {}",
                result.metadata.title.as_deref().unwrap_or("None")
            );
            println!("Related MDCs found: {}", result.related_documents.len());
            if !result.related_documents.is_empty() {
                println!("\nConsider updating these related MDCs:");
                for path in &result.related_documents {
                    println!("  - {}", path.display());
                }
            }
        }
        _ => {
            let (title, authors) = title_and_authors(result.metadata.title.as_deref(), &result.metadata.authors);
            let topic = match &result.topic {
                Some(t) => format!("{} (score {})", t.topic, t.score),
                None => "explicit folder".to_string(),
            };
            let rows = [
                ("Title", title),
                ("Authors", authors),
                ("Year", result.metadata.year.clone().unwrap_or_default()),
                ("Topic", topic),
                ("MDC", result.mdc_path.display().to_string()),
                ("README", result.readme_path.display().to_string()),
                ("Pages", result.stats.pages.to_string()),
                ("Sections", result.stats.sections.to_string()),
                ("Key concepts", result.stats.key_concepts.to_string()),
                ("Code examples", result.stats.code_examples.to_string()),
                ("Formulas", result.stats.formulas.to_string()),
                ("Tables", result.stats.tables.to_string()),
            ];

            println!();
            println!("{} {}", "✓".green().bold(), "Processing complete".bold());
            println!("{}", summary_table(&rows));

            if !result.related_documents.is_empty() {
                println!();
                println!(
                    "{}",
                    format!(
                        "━━━ {} related documents to review ━━━",
                        result.related_documents.len()
                    )
                    .bold()
                    .cyan()
                );
                for path in &result.related_documents {
                    println!("  {} {}", "•".yellow(), path.display());
                }
            }
        }
    }
    Ok(())
}

fn output_extraction(
    content: &ExtractedContent,
    dump: &ExtractionDump,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(dump)?);
        }
        OutputFormat::Plain => {
            println!("Extracted {} pages", content.pages.len());
            println!("Found {} sections", content.sections.len());
            println!("Found {} code blocks", content.code_blocks.len());
            println!("Found {} formulas", content.formulas.len());
            println!(
                "\nTitle: {}",
                content.metadata.title.as_deref().unwrap_or("None")
            );
            println!("Authors: {}", content.metadata.authors.join(", "));
            println!(
                "Year: {}",
                content.metadata.year.as_deref().unwrap_or("None")
            );
        }
        _ => {
            let (title, authors) = title_and_authors(content.metadata.title.as_deref(), &content.metadata.authors);
            let rows = [
                ("Title", title),
                ("Authors", authors),
                ("Year", content.metadata.year.clone().unwrap_or_default()),
                ("DOI", content.metadata.doi.clone().unwrap_or_default()),
                ("Pages", content.pages.len().to_string()),
                ("Sections", content.sections.len().to_string()),
                ("Code blocks", content.code_blocks.len().to_string()),
                ("Formulas", content.formulas.len().to_string()),
                ("Tables", content.tables.len().to_string()),
            ];
            println!("{}", summary_table(&rows));
        }
    }
    Ok(())
}

fn output_organized(organized: &OrganizedContent, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(organized)?);
        }
        OutputFormat::Plain => {
            println!("Organized content from: {}", organized.display_title());
            println!("Key concepts: {}", organized.key_concepts.len());
            println!("Code examples: {}", organized.code_examples.len());
            println!("Formulas: {}", organized.formulas.len());
            println!("Best practices: {}", organized.best_practices.len());
            println!("Sections: {}", organized.sections.len());
        }
        _ => {
            let (title, _) = title_and_authors(organized.metadata.title.as_deref(), &organized.metadata.authors);
            let rows = [
                ("Title", title),
                ("Key concepts", organized.key_concepts.len().to_string()),
                (
                    "Implementation",
                    organized.implementation_patterns.len().to_string(),
                ),
                ("Code examples", organized.code_examples.len().to_string()),
                ("Formulas", organized.formulas.len().to_string()),
                ("Best practices", organized.best_practices.len().to_string()),
                ("Metrics", organized.performance_metrics.len().to_string()),
                ("Limitations", organized.limitations.len().to_string()),
                ("Related", organized.related_techniques.len().to_string()),
                (
                    "Applications",
                    organized.practical_applications.len().to_string(),
                ),
                ("Sections", organized.sections.len().to_string()),
            ];
            println!("{}", summary_table(&rows));

            if !organized.key_concepts.is_empty() {
                println!(
                    "{} {}",
                    "Concepts:".cyan().bold(),
                    organized.key_concepts.join(", ")
                );
            }
        }
    }
    Ok(())
}
