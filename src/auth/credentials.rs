//! Password hashing
//!
//! Passwords are stored as the lower-case hex SHA-256 digest of their UTF-8
//! bytes, with no salt and no work factor. Identical passwords produce
//! identical hashes across users; existing databases depend on this format.

use sha2::{Digest, Sha256};

/// Length of a stored hash in hex characters.
pub const HASH_HEX_LEN: usize = 64;

/// Hash a password into its stored form.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check a password attempt against a stored hash.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    hashes_match(&hash_password(password), stored_hash)
}

/// Compares two hex digests without stopping at the first differing
/// character. Anything that is not a full-length digest never matches.
fn hashes_match(attempt: &str, stored: &str) -> bool {
    if attempt.len() != HASH_HEX_LEN || stored.len() != HASH_HEX_LEN {
        return false;
    }
    attempt
        .bytes()
        .zip(stored.bytes())
        .fold(0u8, |diff, (a, s)| diff | (a ^ s))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_matches_known_digest() {
        assert_eq!(
            hash_password(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            hash_password("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn hashing_is_deterministic_and_input_sensitive() {
        let first = hash_password("secret1");
        assert_eq!(first, hash_password("secret1"));
        assert_ne!(first, hash_password("secret2"));
        assert_ne!(first, hash_password("Secret1"));
        assert_eq!(first.len(), HASH_HEX_LEN);
        assert!(first.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn verify_accepts_only_the_original_password() {
        let stored = hash_password("secret1");
        assert!(verify_password("secret1", &stored));
        assert!(!verify_password("wrong", &stored));
        assert!(!verify_password("secret1", "not-a-hash"));
    }

    #[test]
    fn digest_comparison_needs_every_character() {
        let stored = hash_password("secret1");
        assert!(hashes_match(&stored, &hash_password("secret1")));

        let mut last_flipped = stored.clone();
        let last = if stored.ends_with('0') { "1" } else { "0" };
        last_flipped.replace_range(HASH_HEX_LEN - 1.., last);
        assert!(!hashes_match(&stored, &last_flipped));

        assert!(!hashes_match(&stored, &stored[..HASH_HEX_LEN - 1]));
        assert!(!hashes_match(&stored, &stored.to_uppercase()));
        assert!(!hashes_match("", ""));
    }
}
