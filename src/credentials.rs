//! # Credential Handling
//!
//! Salt generation, salted SHA-256 password digests, verification and secure
//! password generation.
//!
//! Salts are 16 bytes from the operating system's CSPRNG, Base64 encoded.
//! Digests are `SHA-256(salt_text || password)`, Base64 encoded. Verification
//! recomputes the digest and compares in constant time.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use sha2::{Digest, Sha256};
use std::fmt;
use subtle::ConstantTimeEq;

use crate::constants::credentials::{
    ACCEPTED_SYMBOLS, DIGITS, GENERATED_PASSWORD_LENGTH, LOWERCASE, MIN_PASSWORD_LENGTH,
    SALT_BYTES, SYMBOLS, UPPERCASE,
};

/// Text-encoded random salt
#[derive(Clone, PartialEq, Eq)]
pub struct Salt(String);

impl Salt {
    /// Wrap an existing encoded salt, e.g. one read back from the store
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Salt([REDACTED])")
    }
}

/// Base64 SHA-256 digest of a salted password
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest([REDACTED])")
    }
}

/// Stateless credential hasher.
///
/// Every random value comes from [`OsRng`]; nothing here accepts a seed.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialHasher;

impl CredentialHasher {
    pub fn new() -> Self {
        Self
    }

    /// Generate a fresh 16-byte salt
    pub fn generate_salt(&self) -> Salt {
        let mut bytes = [0u8; SALT_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Salt(BASE64.encode(bytes))
    }

    /// Digest `password` bound to `salt`
    pub fn hash(&self, password: &str, salt: &Salt) -> PasswordDigest {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_str().as_bytes());
        hasher.update(password.as_bytes());
        PasswordDigest(BASE64.encode(hasher.finalize()))
    }

    /// Recompute the digest for `password` and compare it with `digest`.
    ///
    /// The comparison is constant-time over the encoded digests; digests of
    /// different length compare unequal without inspecting content.
    pub fn verify(&self, password: &str, digest: &PasswordDigest, salt: &Salt) -> bool {
        let candidate = self.hash(password, salt);
        candidate
            .as_str()
            .as_bytes()
            .ct_eq(digest.as_str().as_bytes())
            .into()
    }

    /// Generate a 12-character password containing every character class.
    ///
    /// One character is drawn from each class, the rest uniformly from the full
    /// alphabet, then the whole buffer is shuffled (Fisher-Yates) so the
    /// guaranteed classes carry no positional signal.
    pub fn generate_secure_password(&self) -> String {
        let mut rng = OsRng;
        let alphabet: Vec<u8> = [UPPERCASE, LOWERCASE, DIGITS, SYMBOLS].concat();

        let mut password = Vec::with_capacity(GENERATED_PASSWORD_LENGTH);
        for class in [UPPERCASE, LOWERCASE, DIGITS, SYMBOLS] {
            password.push(class[rng.gen_range(0..class.len())]);
        }
        while password.len() < GENERATED_PASSWORD_LENGTH {
            password.push(alphabet[rng.gen_range(0..alphabet.len())]);
        }
        password.shuffle(&mut rng);

        // Every byte comes from an ASCII table
        password.into_iter().map(char::from).collect()
    }

    /// True when `password` is at least 8 characters and has an uppercase
    /// letter, a lowercase letter, a digit and a symbol.
    pub fn is_valid_password(&self, password: &str) -> bool {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return false;
        }

        let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
        let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        let has_symbol = password.chars().any(|c| ACCEPTED_SYMBOLS.contains(c));

        has_upper && has_lower && has_digit && has_symbol
    }
}

/// Mask a secret for logging: first and last character around `***`.
///
/// Secrets of two characters or fewer are fully masked.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 2 {
        return "***".to_string();
    }
    format!("{}***{}", chars[0], chars[chars.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic_for_fixed_salt() {
        let hasher = CredentialHasher::new();
        let salt = Salt::from_encoded("c2FsdHNhbHRzYWx0c2FsdA==");
        assert_eq!(hasher.hash("Secret#123", &salt), hasher.hash("Secret#123", &salt));
    }

    #[test]
    fn test_hash_matches_known_construction() {
        // SHA-256("salt" || "password"), Base64
        let hasher = CredentialHasher::new();
        let digest = hasher.hash("password", &Salt::from_encoded("salt"));
        assert_eq!(
            digest.as_str(),
            "E2Ab2k6njlWge5iGbSvmvgdE44ZvE8AMgRyrYIoo8yI="
        );
    }

    #[test]
    fn test_different_salts_produce_different_digests() {
        let hasher = CredentialHasher::new();
        let first = hasher.generate_salt();
        let second = hasher.generate_salt();
        assert_ne!(first, second);
        assert_ne!(hasher.hash("Secret#123", &first), hasher.hash("Secret#123", &second));
    }

    #[test]
    fn test_salt_encodes_sixteen_bytes() {
        let salt = CredentialHasher::new().generate_salt();
        let decoded = BASE64.decode(salt.as_str()).expect("salt is valid base64");
        assert_eq!(decoded.len(), SALT_BYTES);
    }

    #[test]
    fn test_verify_accepts_matching_and_rejects_other_password() {
        let hasher = CredentialHasher::new();
        let salt = hasher.generate_salt();
        let digest = hasher.hash("Correct#Horse1", &salt);

        assert!(hasher.verify("Correct#Horse1", &digest, &salt));
        assert!(!hasher.verify("Correct#Horse2", &digest, &salt));
        assert!(!hasher.verify("Correct#Horse1", &digest, &hasher.generate_salt()));
    }

    #[test]
    fn test_verify_rejects_truncated_digest() {
        let hasher = CredentialHasher::new();
        let salt = hasher.generate_salt();
        let digest = hasher.hash("Correct#Horse1", &salt);
        let truncated = PasswordDigest::from_encoded(&digest.as_str()[..10]);
        assert!(!hasher.verify("Correct#Horse1", &truncated, &salt));
    }

    #[test]
    fn test_generated_password_shape() {
        let hasher = CredentialHasher::new();
        for _ in 0..200 {
            let password = hasher.generate_secure_password();
            assert_eq!(password.len(), GENERATED_PASSWORD_LENGTH);
            assert!(hasher.is_valid_password(&password), "invalid: {password}");
            assert!(password.bytes().all(|b| b.is_ascii_graphic()));
        }
    }

    #[test]
    fn test_password_validation_rules() {
        let hasher = CredentialHasher::new();
        assert!(hasher.is_valid_password("Abcdef1!"));
        assert!(!hasher.is_valid_password("Abcde1!"), "too short");
        assert!(!hasher.is_valid_password("abcdefg1!"), "no uppercase");
        assert!(!hasher.is_valid_password("ABCDEFG1!"), "no lowercase");
        assert!(!hasher.is_valid_password("Abcdefgh!"), "no digit");
        assert!(!hasher.is_valid_password("Abcdefgh1"), "no symbol");
        assert!(!hasher.is_valid_password(""));
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret(""), "***");
        assert_eq!(mask_secret("ab"), "***");
        assert_eq!(mask_secret("hunter2"), "h***2");
    }

    #[test]
    fn test_debug_output_is_redacted() {
        let hasher = CredentialHasher::new();
        let salt = hasher.generate_salt();
        let digest = hasher.hash("Secret#123", &salt);
        assert!(!format!("{salt:?}").contains(salt.as_str()));
        assert!(!format!("{digest:?}").contains(digest.as_str()));
    }
}
