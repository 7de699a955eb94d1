//! MB-010: BLAKE3 hashing of generated artifacts.

use crate::core::error::{BuildError, Result};
use std::io::Read;
use std::path::Path;

const STREAM_BUF_SIZE: usize = 65536;

/// Hash a file's contents. Returns `"blake3:{hex}"`.
pub fn hash_file(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path).map_err(|e| BuildError::io(path, e))?;
    let mut hasher = blake3::Hasher::new();
    let mut buf = [0u8; STREAM_BUF_SIZE];
    loop {
        let n = file.read(&mut buf).map_err(|e| BuildError::io(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("blake3:{}", hasher.finalize().to_hex()))
}

/// Hash a string. Returns `"blake3:{hex}"`.
pub fn hash_string(s: &str) -> String {
    format!("blake3:{}", blake3::hash(s.as_bytes()).to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mb010_hash_file_matches_string() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("muffin.grammar");
        std::fs::write(&path, "@top Recipe { }").unwrap();
        let h = hash_file(&path).unwrap();
        assert_eq!(h, hash_string("@top Recipe { }"));
        assert_eq!(h.len(), 7 + 64);
    }

    #[test]
    fn test_mb010_hash_string_distinguishes() {
        assert_eq!(hash_string("a"), hash_string("a"));
        assert_ne!(hash_string("a"), hash_string("b"));
    }

    #[test]
    fn test_mb010_hash_file_not_found() {
        let result = hash_file(Path::new("/nonexistent/bundle.js"));
        assert!(matches!(result, Err(BuildError::Io { .. })));
    }
}
