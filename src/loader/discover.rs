//! Subtitle file discovery.

use super::has_supported_extension;
use crate::error::{Result, SporError};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Recursively enumerate subtitle files under a directory.
///
/// Missing or permission-denied directories are treated as empty rather than
/// errors; any other read error propagates. The result is sorted
/// lexicographically.
pub async fn discover_files(directory: impl AsRef<Path>, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![directory.as_ref().to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::PermissionDenied) => {
                debug!("skipping unreadable directory {}: {}", dir.display(), e);
                continue;
            }
            Err(e) => return Err(SporError::Io(e)),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let file_type = entry.file_type().await?;

            if file_type.is_dir() {
                if recursive {
                    pending.push(path);
                }
            } else if file_type.is_file() && has_supported_extension(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    debug!("discovered {} subtitle files", files.len());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        std::fs::write(path, "WEBVTT\n").unwrap();
    }

    #[tokio::test]
    async fn test_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("b.vtt"));
        touch(&dir.path().join("a.vtt"));
        touch(&dir.path().join("c.webvtt"));
        touch(&dir.path().join("ignored.srt"));
        touch(&dir.path().join("notes.txt"));

        let files = discover_files(dir.path(), true).await.unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.vtt", "b.vtt", "c.webvtt"]);
    }

    #[tokio::test]
    async fn test_recursion_toggle() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("top.vtt"));
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        touch(&dir.path().join("nested").join("deep.vtt"));

        let recursive = discover_files(dir.path(), true).await.unwrap();
        assert_eq!(recursive.len(), 2);

        let flat = discover_files(dir.path(), false).await.unwrap();
        assert_eq!(flat.len(), 1);
        assert!(flat[0].ends_with("top.vtt"));
    }

    #[tokio::test]
    async fn test_missing_directory_is_empty() {
        let files = discover_files("/definitely/not/a/real/dir", true)
            .await
            .unwrap();
        assert!(files.is_empty());
    }
}
