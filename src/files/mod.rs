//! Local filesystem side of a backup: what to upload and how to read it.

/// Recursive source path expansion
pub mod scanner;

/// Whole-file and chunked file readers
pub mod record;

pub use record::{extension_of, file_name, ChunkReader, ChunkedFileRecord, FileRecord};
pub use scanner::list_files;
