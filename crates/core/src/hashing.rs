//! Shared SHA-256 hex digest utility.
//!
//! Upload handlers digest incoming image bytes with this before calling
//! the de-duplication lookup, so every stored `content_hash` has the same
//! 64-character lowercase hex shape.

use sha2::{Digest, Sha256};

/// Compute a SHA-256 hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_64_lowercase_hex_chars() {
        let hash = sha256_hex(b"fake png bytes");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn same_bytes_same_digest() {
        assert_eq!(sha256_hex(b"logo.png"), sha256_hex(b"logo.png"));
    }

    #[test]
    fn different_bytes_different_digest() {
        assert_ne!(sha256_hex(b"logo.png"), sha256_hex(b"logo2.png"));
    }
}
