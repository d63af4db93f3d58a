//! Hashing helpers

use sha2::{Digest, Sha256};

/// SHA-256 hex digest of a string (migration checksums)
pub fn sha256_hex(input: &str) -> String {
    format!("{:x}", Sha256::digest(input.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex_known_value() {
        // echo -n "abc" | sha256sum
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256_hex_is_stable() {
        assert_eq!(sha256_hex("tally"), sha256_hex("tally"));
        assert_ne!(sha256_hex("tally"), sha256_hex("Tally"));
    }
}
