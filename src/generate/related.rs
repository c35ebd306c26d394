//! Finds existing rule files that share key concepts with a new paper.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Key concepts used for matching
const MATCH_CONCEPTS: usize = 10;
/// Characters read from the head of each candidate file
const HEAD_CHARS: usize = 2000;

/// Every `*.mdc` under `dir`, recursively, sorted per directory.
///
/// Symlinked directories are not descended into.
fn collect_mdc_files(dir: &Path, found: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    let mut entries: Vec<(PathBuf, fs::FileType)> = entries
        .filter_map(|e| e.ok())
        .filter_map(|e| e.file_type().ok().map(|ft| (e.path(), ft)))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    for (path, file_type) in entries {
        if file_type.is_dir() {
            collect_mdc_files(&path, found);
        } else if file_type.is_symlink() && path.is_dir() {
            tracing::debug!("Not following directory link {}", path.display());
        } else if path.extension().is_some_and(|ext| ext == "mdc") {
            found.push(path);
        }
    }
}

/// Lowercased first [`HEAD_CHARS`] characters of a file
fn read_head(path: &Path) -> std::io::Result<String> {
    let mut bytes = Vec::new();
    // 4 bytes per char covers any UTF-8 text
    fs::File::open(path)?
        .take((HEAD_CHARS * 4) as u64)
        .read_to_end(&mut bytes)?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text.chars().take(HEAD_CHARS).collect::<String>().to_lowercase())
}

/// Rule files under the topic folders whose head mentions any of the first
/// ten key concepts, case-insensitively. Files that cannot be read are skipped.
pub fn find_related_documents(
    workspace_root: &Path,
    topics: &[&str],
    key_concepts: &[String],
) -> Vec<PathBuf> {
    let keywords: Vec<String> = key_concepts
        .iter()
        .take(MATCH_CONCEPTS)
        .map(|k| k.to_lowercase())
        .collect();
    if keywords.is_empty() {
        return Vec::new();
    }

    let mut related = Vec::new();
    for topic in topics {
        let folder = workspace_root.join(topic);
        if !folder.is_dir() {
            continue;
        }

        let mut files = Vec::new();
        collect_mdc_files(&folder, &mut files);

        for file in files {
            match read_head(&file) {
                Ok(head) if keywords.iter().any(|k| head.contains(k.as_str())) => {
                    related.push(file);
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!("Skipping unreadable {}: {}", file.display(), e);
                }
            }
        }
    }

    related
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concepts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_finds_matching_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("ai/nerf")).unwrap();
        fs::create_dir_all(root.join("engines")).unwrap();
        fs::create_dir_all(root.join("unlisted")).unwrap();

        fs::write(root.join("ai/nerf/nerf.mdc"), "# NeRF\nUses Gaussian Splatting too").unwrap();
        fs::write(root.join("ai/other.mdc"), "# Unrelated").unwrap();
        fs::write(root.join("ai/notes.md"), "gaussian splatting").unwrap();
        fs::write(root.join("engines/render.mdc"), "GAUSSIAN SPLATTING engine").unwrap();
        fs::write(root.join("unlisted/x.mdc"), "gaussian splatting").unwrap();

        let related = find_related_documents(
            root,
            &["ai", "engines", "backend"],
            &concepts(&["Gaussian Splatting"]),
        );
        assert_eq!(
            related,
            vec![root.join("ai/nerf/nerf.mdc"), root.join("engines/render.mdc")]
        );
    }

    #[test]
    fn test_only_head_of_file_is_searched() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("ai")).unwrap();
        fs::write(
            root.join("ai/long.mdc"),
            format!("{}needle", "x".repeat(HEAD_CHARS)),
        )
        .unwrap();

        assert!(find_related_documents(root, &["ai"], &concepts(&["needle"])).is_empty());
    }

    #[test]
    fn test_no_concepts_no_matches() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("ai")).unwrap();
        fs::write(dir.path().join("ai/a.mdc"), "anything").unwrap();
        assert!(find_related_documents(dir.path(), &["ai"], &[]).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_links_are_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("ai")).unwrap();
        fs::write(root.join("ai/a.mdc"), "# Gaussian Splatting").unwrap();
        std::os::unix::fs::symlink(root.join("ai"), root.join("ai/loop")).unwrap();

        let related = find_related_documents(root, &["ai"], &concepts(&["Gaussian Splatting"]));
        assert_eq!(related, vec![root.join("ai/a.mdc")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_linked_rule_file_is_searched() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("ai")).unwrap();
        fs::create_dir_all(root.join("shared")).unwrap();
        fs::write(root.join("shared/s.mdc"), "gaussian splatting notes").unwrap();
        std::os::unix::fs::symlink(root.join("shared/s.mdc"), root.join("ai/s.mdc")).unwrap();

        let related = find_related_documents(root, &["ai"], &concepts(&["Gaussian Splatting"]));
        assert_eq!(related, vec![root.join("ai/s.mdc")]);
    }
}
