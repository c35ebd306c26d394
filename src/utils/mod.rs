//! Utility modules shared by the pipeline and the CLI.
//!
//! - [`validate_output_folder`]: reject output folders that would escape the workspace root
//! - [`validate_doi`]: normalize a DOI before linking it
//! - [`slugify`]: filesystem-safe folder and file stems
//! - [`truncate_with_ellipsis`], [`truncate_at_word`]: width-aware truncation for terminal output
//!
//! # Slugs
//!
//! ```rust
//! use paper_mdc::utils::slugify;
//!
//! assert_eq!(slugify("Mip-Splatting: Alias-Free"), "mip-splatting-alias-free");
//! assert_eq!(slugify("???"), "paper-technique");
//! ```

mod display;
mod validate;

pub use display::{
    calculate_column_widths, format_authors, format_title, is_terminal, single_line,
    summary_table_columns, terminal_info, terminal_width, truncate_at_word, truncate_with_ellipsis,
    ColumnConfig, Terminal, DEFAULT_WIDTH,
};
pub use validate::{
    slugify, validate_doi, validate_output_folder, ValidationError, FALLBACK_SLUG, MAX_SLUG_CHARS,
};
