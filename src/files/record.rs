use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::error::{BackupError, Result};

/// Base name of `path`, lossily converted to UTF-8.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Lowercase extension without the leading dot, or empty.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// A whole file read into memory.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub data: Bytes,
    pub name: String,
    pub extension: String,
}

impl FileRecord {
    pub async fn read(path: &Path) -> Result<Self> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| BackupError::filesystem(path, e))?;

        Ok(FileRecord {
            data: Bytes::from(data),
            name: file_name(path),
            extension: extension_of(path),
        })
    }
}

/// A file uploaded as a sequence of bounded parts.
///
/// Chunks are read lazily, in order, so only one part is held in memory.
#[derive(Debug, Clone)]
pub struct ChunkedFileRecord {
    pub path: PathBuf,
    pub name: String,
    pub extension: String,
    pub size: u64,
    pub part_size: u64,
}

impl ChunkedFileRecord {
    pub async fn open(path: &Path, part_size: u64) -> Result<Self> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| BackupError::filesystem(path, e))?;

        Ok(ChunkedFileRecord {
            path: path.to_path_buf(),
            name: file_name(path),
            extension: extension_of(path),
            size: metadata.len(),
            part_size: part_size.max(1),
        })
    }

    /// Number of parts the file splits into; the last may be short.
    pub fn part_count(&self) -> u64 {
        self.size.div_ceil(self.part_size)
    }

    pub async fn chunks(&self) -> Result<ChunkReader> {
        let file = File::open(&self.path)
            .await
            .map_err(|e| BackupError::filesystem(&self.path, e))?;

        Ok(ChunkReader {
            file,
            path: self.path.clone(),
            part_size: self.part_size,
            remaining: self.size,
        })
    }
}

/// Sequential reader yielding one part at a time.
pub struct ChunkReader {
    file: File,
    path: PathBuf,
    part_size: u64,
    remaining: u64,
}

impl ChunkReader {
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        if self.remaining == 0 {
            return Ok(None);
        }

        let len = self.part_size.min(self.remaining) as usize;
        let mut buffer = vec![0u8; len];
        self.file
            .read_exact(&mut buffer)
            .await
            .map_err(|e| BackupError::filesystem(&self.path, e))?;
        self.remaining -= len as u64;

        Ok(Some(Bytes::from(buffer)))
    }
}
