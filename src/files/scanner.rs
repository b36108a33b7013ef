use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::constants::HIDDEN_SYSTEM_FILE;
use crate::error::{BackupError, Result};

/// Resolve `path` into the flat list of regular files to upload.
///
/// A regular file yields itself. A directory is walked recursively, skipping
/// `.DS_Store` files. Symlinks to regular files are included; symlinked
/// directories are not followed. Order follows the filesystem listing and is
/// not stable across platforms.
///
/// Any stat or listing failure aborts the scan.
pub fn list_files(path: &Path) -> Result<Vec<PathBuf>> {
    let root = fs::canonicalize(path).map_err(|e| BackupError::filesystem(path, e))?;
    let metadata = fs::metadata(&root).map_err(|e| BackupError::filesystem(&root, e))?;

    if metadata.is_file() {
        return Ok(vec![root]);
    }
    if !metadata.is_dir() {
        return Err(BackupError::filesystem(
            &root,
            io::Error::new(io::ErrorKind::InvalidInput, "not a regular file or directory"),
        ));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&root).follow_links(false) {
        let entry = entry.map_err(|e| walk_error(&root, e))?;

        if entry.file_name() == HIDDEN_SYSTEM_FILE {
            continue;
        }

        let is_file = if entry.path_is_symlink() {
            fs::metadata(entry.path())
                .map_err(|e| BackupError::filesystem(entry.path(), e))?
                .is_file()
        } else {
            entry.file_type().is_file()
        };

        if is_file {
            files.push(entry.into_path());
        }
    }

    debug!("Found {} files under {}", files.len(), root.display());
    Ok(files)
}

fn walk_error(root: &Path, error: walkdir::Error) -> BackupError {
    let path = error
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    let message = error.to_string();
    let source = error
        .into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, message));
    BackupError::Filesystem { path, source }
}
