//! Input validation for output folders, DOIs and generated slugs.
//!
//! Output folders come from the command line and are joined onto the
//! workspace root, so they are checked for path traversal before any
//! directory is created.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Slugs are cut to this many characters
pub const MAX_SLUG_CHARS: usize = 50;

/// Slug used when nothing usable is left after cleaning
pub const FALLBACK_SLUG: &str = "paper-technique";

/// Validation error types
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid output folder: {0}")]
    InvalidFolder(String),

    #[error("Invalid DOI format: {0}")]
    InvalidDoi(String),

    #[error("Path traversal detected: {0}")]
    PathTraversal(String),
}

/// Validate an output folder given relative to the workspace root.
///
/// Only plain relative components are accepted; the result never escapes the
/// root it is joined onto.
pub fn validate_output_folder(folder: &str) -> Result<PathBuf, ValidationError> {
    let folder = folder.trim();

    if folder.is_empty() {
        return Err(ValidationError::InvalidFolder("empty folder".to_string()));
    }

    if folder.contains('\0') {
        return Err(ValidationError::InvalidFolder(
            "contains null byte".to_string(),
        ));
    }

    if folder.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFolder(
            "contains control characters".to_string(),
        ));
    }

    // Windows drive prefixes are not caught by Path on unix
    if folder.starts_with('\\') || folder.contains(":\\") || folder.contains(":/") {
        return Err(ValidationError::PathTraversal(folder.to_string()));
    }

    let mut clean = PathBuf::new();
    for component in Path::new(folder).components() {
        match component {
            Component::Normal(part) => {
                if part.to_string_lossy().contains("..") {
                    return Err(ValidationError::PathTraversal(folder.to_string()));
                }
                clean.push(part);
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ValidationError::PathTraversal(folder.to_string()));
            }
        }
    }

    if clean.as_os_str().is_empty() {
        return Err(ValidationError::InvalidFolder(folder.to_string()));
    }

    Ok(clean)
}

/// Validate and normalize a DOI
///
/// DOIs have the format "10.xxxx/xxxxxx" where xxxx is a registrant code
/// and xxxxxx is an item ID.
pub fn validate_doi(doi: &str) -> Result<String, ValidationError> {
    let doi = doi.trim().to_lowercase();

    if doi.is_empty() {
        return Err(ValidationError::InvalidDoi("empty DOI".to_string()));
    }

    let doi = doi.strip_prefix("doi:").unwrap_or(&doi);
    let doi = doi.strip_prefix("https://doi.org/").unwrap_or(doi);
    let doi = doi.strip_prefix("http://doi.org/").unwrap_or(doi);

    if !doi.starts_with("10.") {
        return Err(ValidationError::InvalidDoi(
            "DOI must start with '10.'".to_string(),
        ));
    }

    if !doi.contains('/') {
        return Err(ValidationError::InvalidDoi(
            "DOI must contain a slash".to_string(),
        ));
    }

    if doi.contains("..") {
        return Err(ValidationError::InvalidDoi(
            "path traversal detected".to_string(),
        ));
    }

    Ok(doi.to_string())
}

/// Turn a name into a lowercase hyphenated folder/file stem.
///
/// Always returns a non-empty string of `[a-z0-9]` runs joined by single
/// hyphens, at most [`MAX_SLUG_CHARS`] long. Applying it twice changes nothing.
pub fn slugify(name: &str) -> String {
    let mut slug = String::new();
    let mut pending_hyphen = false;

    for ch in name.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else if ch == '-' || ch.is_whitespace() {
            pending_hyphen = true;
        }
        // anything else is dropped without separating words
    }

    // slug is ASCII, byte truncation is safe
    slug.truncate(MAX_SLUG_CHARS);
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}
