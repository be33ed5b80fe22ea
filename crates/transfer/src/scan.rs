//! Directory scanning for upload.
//!
//! Recursively walks a directory and produces the files to upload with
//! relative paths normalized to forward slashes.

use std::path::{Path, PathBuf};

use crate::TransferError;

/// A regular file found under a scanned root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    /// Full path on disk.
    pub path: PathBuf,
    /// Path relative to the root, `/`-separated, no leading separator.
    pub relative_path: String,
    /// Size in bytes.
    pub size: u64,
}

/// Scans `root` recursively and returns every regular file under it.
///
/// Symlinked directories are not followed; symlinks to files are included.
/// Results are sorted by relative path.
pub fn scan_directory(root: &Path) -> Result<Vec<LocalFile>, TransferError> {
    let mut files = Vec::new();
    walk_dir(root, root, &mut files)?;
    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(files)
}

fn walk_dir(root: &Path, current: &Path, files: &mut Vec<LocalFile>) -> Result<(), TransferError> {
    let entries = std::fs::read_dir(current)?;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();

        if entry.file_type()?.is_dir() {
            walk_dir(root, &path, files)?;
            continue;
        }

        let metadata = std::fs::metadata(&path)?;
        if !metadata.is_file() {
            continue;
        }

        let rel_path = path.strip_prefix(root).map_err(std::io::Error::other)?;

        // Normalize to forward slashes.
        let rel_str = rel_path.to_string_lossy().replace('\\', "/");

        files.push(LocalFile {
            path,
            relative_path: rel_str.trim_start_matches('/').to_string(),
            size: metadata.len(),
        });
    }

    Ok(())
}
