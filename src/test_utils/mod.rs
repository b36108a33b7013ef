//! Test utilities for benten
//!
//! Fixture trees and canned B2 responses shared by the unit tests.

#![cfg(test)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::config::Credentials;

/// Relative paths of the regular files created by [`create_media_tree`].
pub const MEDIA_TREE_FILES: [&str; 3] = ["a.mp3", "sub/b.png", "sub/deeper/c.flac"];

/// Creates a small media library with `.DS_Store` noise and an empty folder
pub fn create_media_tree() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    fs::create_dir_all(root.join("sub/deeper")).unwrap();
    fs::create_dir_all(root.join("empty")).unwrap();
    for name in MEDIA_TREE_FILES {
        write_file(root, name, name.as_bytes());
    }
    write_file(root, ".DS_Store", b"junk");
    write_file(root, "sub/.DS_Store", b"junk");

    temp_dir
}

/// Writes `content` to `root/relative`, creating parent directories
pub fn write_file(root: &Path, relative: &str, content: &[u8]) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Credentials for a bucket named `media`
pub fn test_credentials() -> Credentials {
    Credentials {
        key_id: "id".to_string(),
        key: "key".to_string(),
        bucket_id: "bucket-123".to_string(),
        bucket_name: "media".to_string(),
    }
}

/// Successful `b2_authorize_account` body with the given part size
pub fn authorize_body(part_size: u64) -> String {
    format!(
        r#"{{"apiUrl":"https://api.test","authorizationToken":"session-token","downloadUrl":"https://dl.test","recommendedPartSize":{},"absoluteMinimumPartSize":{}}}"#,
        part_size, part_size
    )
}
