//! Shared digest helpers.
//!
//! Used by the qualification resolver to fingerprint resolved output so
//! callers can detect stale criteria.

use sha2::{Digest, Sha256};

/// Compute a SHA-256 hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

/// Short base36 digest of `data`: the first 8 bytes of its SHA-256 hash
/// read as a big-endian integer.
pub fn base36_digest(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&hash[..8]);
    to_base36(u64::from_be_bytes(prefix))
}

fn to_base36(mut n: u64) -> String {
    const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(ALPHABET[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_produces_known_hash() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn base36_digest_is_deterministic() {
        assert_eq!(base36_digest(b"hello"), base36_digest(b"hello"));
        assert_ne!(base36_digest(b"hello"), base36_digest(b"world"));
    }

    #[test]
    fn base36_digest_uses_lowercase_alphanumerics() {
        let digest = base36_digest(b"episode");
        assert!(!digest.is_empty());
        assert!(digest
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn base36_encodes_small_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }
}
