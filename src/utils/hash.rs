use sha1::{Digest, Sha1};

/// Hex-encoded SHA-1 of `data`, computed in a single pass.
///
/// B2 requires this digest in `X-Bz-Content-Sha1` for every upload and
/// for every part of a large file.
pub fn sha1_hex(data: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha1_known_vectors() {
        assert_eq!(sha1_hex(b""), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
        assert_eq!(sha1_hex(b"abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    #[test]
    fn test_sha1_is_lowercase_hex() {
        let hash = sha1_hex(b"The quick brown fox jumps over the lazy dog");
        assert_eq!(hash, "2fd4e1c67a2d28fced849ee1bb76e7391b93eb12");
        assert_eq!(hash.len(), 40);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
