//! Legacy password scheme, preserved for compatibility with existing
//! stored credentials:
//!
//! - salt = hex(SHA-256("{creation time}--{password}")), fixed per user;
//! - stored hash = hex(SHA-256("{salt}--{password}")).
//!
//! Verification recomputes the hash and compares in constant time.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Derive the per-user salt at account creation.
pub fn make_salt(created_at: &DateTime<Utc>, password: &str) -> String {
    secure_hash(&format!("{}--{}", created_at.to_rfc3339(), password))
}

/// Hash a password against a salt.
pub fn encrypt(salt: &str, password: &str) -> String {
    secure_hash(&format!("{salt}--{password}"))
}

/// Check a submitted password against the stored hash.
pub fn verify(stored_hash: &str, salt: &str, submitted: &str) -> bool {
    let candidate = encrypt(salt, submitted);
    // ct_eq requires equal lengths; a malformed stored hash can never match.
    stored_hash.len() == candidate.len()
        && stored_hash.as_bytes().ct_eq(candidate.as_bytes()).into()
}

fn secure_hash(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salt_is_stable_for_same_inputs() {
        let t = Utc::now();
        assert_eq!(make_salt(&t, "foobar"), make_salt(&t, "foobar"));
    }

    #[test]
    fn salt_depends_on_password_and_time() {
        let t = Utc::now();
        assert_ne!(make_salt(&t, "foobar"), make_salt(&t, "other"));
        let later = t + chrono::Duration::seconds(1);
        assert_ne!(make_salt(&t, "foobar"), make_salt(&later, "foobar"));
    }

    #[test]
    fn verify_accepts_matching_password() {
        let t = Utc::now();
        let salt = make_salt(&t, "foobar");
        let hash = encrypt(&salt, "foobar");
        assert!(verify(&hash, &salt, "foobar"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let t = Utc::now();
        let salt = make_salt(&t, "foobar");
        let hash = encrypt(&salt, "foobar");
        assert!(!verify(&hash, &salt, "barfoo"));
        assert!(!verify(&hash, &salt, ""));
    }

    #[test]
    fn verify_rejects_malformed_stored_hash() {
        let t = Utc::now();
        let salt = make_salt(&t, "foobar");
        assert!(!verify("not-a-hash", &salt, "foobar"));
    }

    #[test]
    fn hash_is_hex_sha256() {
        let hash = encrypt("somesalt", "foobar");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
