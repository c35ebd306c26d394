//! Reference document generation.
//!
//! - [`render_mdc`]: the `.mdc` rule document, sections in a fixed order
//! - [`render_readme`]: a companion README explaining how to use it
//! - [`write_reference`]: writes both into `<target>/<slug>/`
//! - [`find_related_documents`]: existing rule files that share key concepts

mod mdc;
mod readme;
mod related;

pub use mdc::{normalized_title, render_mdc};
pub use readme::render_readme;
pub use related::find_related_documents;

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::classify::mdc_filename;
use crate::models::OrganizedContent;

/// Errors that can occur while writing generated files
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Paths of a written reference document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceFiles {
    pub paper_folder: PathBuf,
    pub mdc_path: PathBuf,
    pub readme_path: PathBuf,
}

fn write_file(path: &Path, contents: &str) -> Result<(), GenerateError> {
    fs::write(path, contents).map_err(|source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `<target>/<slug>/<slug>.mdc` and `<target>/<slug>/README.md`.
///
/// Missing parent directories are created; existing files are overwritten.
pub fn write_reference(
    target_folder: &Path,
    slug: &str,
    organized: &OrganizedContent,
) -> Result<ReferenceFiles, GenerateError> {
    let paper_folder = target_folder.join(slug);
    fs::create_dir_all(&paper_folder).map_err(|source| GenerateError::CreateDir {
        path: paper_folder.clone(),
        source,
    })?;

    let filename = mdc_filename(slug);
    let mdc_path = paper_folder.join(&filename);
    write_file(&mdc_path, &render_mdc(organized))?;
    tracing::debug!("Wrote {}", mdc_path.display());

    let readme_path = paper_folder.join("README.md");
    write_file(&readme_path, &render_readme(organized, slug, &filename))?;
    tracing::debug!("Wrote {}", readme_path.display());

    Ok(ReferenceFiles {
        paper_folder,
        mdc_path,
        readme_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaperMetadata;

    #[test]
    fn test_write_reference_creates_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("ai");
        let organized = OrganizedContent::new(PaperMetadata {
            title: Some("Mip-Splatting".to_string()),
            ..Default::default()
        });

        let files = write_reference(&target, "mip-splatting", &organized).unwrap();
        assert_eq!(files.paper_folder, target.join("mip-splatting"));
        assert_eq!(files.mdc_path, target.join("mip-splatting/mip-splatting.mdc"));

        let mdc = fs::read_to_string(&files.mdc_path).unwrap();
        assert!(mdc.starts_with("---\nalwaysApply: false\n---\n"));
        let readme = fs::read_to_string(&files.readme_path).unwrap();
        assert!(readme.contains("mip-splatting/mip-splatting.mdc"));
    }

    #[test]
    fn test_write_reference_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let organized = OrganizedContent::new(PaperMetadata::default());

        let first = write_reference(dir.path(), "paper-technique", &organized).unwrap();
        fs::write(&first.mdc_path, "stale").unwrap();
        let second = write_reference(dir.path(), "paper-technique", &organized).unwrap();

        assert_eq!(first, second);
        assert_ne!(fs::read_to_string(&second.mdc_path).unwrap(), "stale");
    }

    #[test]
    fn test_write_reference_reports_blocked_folder() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("ai");
        fs::write(&blocker, "a file, not a folder").unwrap();

        let result = write_reference(&blocker, "slug", &OrganizedContent::new(PaperMetadata::default()));
        assert!(matches!(result, Err(GenerateError::CreateDir { .. })));
    }
}
